//! Async repository contract and latency adapter.
//!
//! # Responsibility
//! - Mirror the repository contract for latency-bearing stores.
//! - Wrap any synchronous store with a simulated I/O delay.
//! - Keep blocking store calls off the async runtime's worker threads.
//!
//! # Invariants
//! - Semantics match the synchronous contract operation for operation.
//! - The simulated delay elapses before the wrapped store is touched.

use super::contract::{RepoError, RepoResult, Repository};
use crate::model::Record;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Asynchronous counterpart of `Repository`.
#[async_trait]
pub trait AsyncRepository<T: Record>: Send + Sync {
    async fn add(&self, entity: T) -> RepoResult<T>;
    async fn get_by_id(&self, id: T::Key) -> RepoResult<Option<T>>;
    async fn list_all(&self) -> RepoResult<Vec<T>>;
    async fn update(&self, entity: T) -> RepoResult<bool>;
    async fn remove(&self, id: T::Key) -> RepoResult<bool>;
}

#[async_trait]
impl<T: Record, R: AsyncRepository<T> + ?Sized> AsyncRepository<T> for Arc<R> {
    async fn add(&self, entity: T) -> RepoResult<T> {
        (**self).add(entity).await
    }

    async fn get_by_id(&self, id: T::Key) -> RepoResult<Option<T>> {
        (**self).get_by_id(id).await
    }

    async fn list_all(&self) -> RepoResult<Vec<T>> {
        (**self).list_all().await
    }

    async fn update(&self, entity: T) -> RepoResult<bool> {
        (**self).update(entity).await
    }

    async fn remove(&self, id: T::Key) -> RepoResult<bool> {
        (**self).remove(id).await
    }
}

/// Default simulated I/O delay.
pub const DEFAULT_IO_DELAY: Duration = Duration::from_millis(50);

/// Async adapter that sleeps `io_delay` before delegating to a sync store.
///
/// The wrapped store runs on tokio's blocking pool, so file-backed stores
/// and their locks never stall a runtime worker.
pub struct LatencyRepository<R> {
    inner: Arc<R>,
    io_delay: Duration,
}

impl<R> LatencyRepository<R> {
    pub fn new(inner: R) -> Self {
        Self::with_delay(inner, DEFAULT_IO_DELAY)
    }

    pub fn with_delay(inner: R, io_delay: Duration) -> Self {
        Self::shared(Arc::new(inner), io_delay)
    }

    /// Wraps a store that other callers keep using synchronously.
    pub fn shared(inner: Arc<R>, io_delay: Duration) -> Self {
        Self { inner, io_delay }
    }

    pub fn io_delay(&self) -> Duration {
        self.io_delay
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    async fn simulate_io(&self) {
        if !self.io_delay.is_zero() {
            tokio::time::sleep(self.io_delay).await;
        }
    }
}

impl<R: Send + Sync + 'static> LatencyRepository<R> {
    async fn run<O, F>(&self, op: F) -> RepoResult<O>
    where
        O: Send + 'static,
        F: FnOnce(&R) -> RepoResult<O> + Send + 'static,
    {
        self.simulate_io().await;
        let inner = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || op(&inner))
            .await
            .map_err(|err| RepoError::TaskFailed(err.to_string()))?
    }
}

#[async_trait]
impl<T, R> AsyncRepository<T> for LatencyRepository<R>
where
    T: Record,
    R: Repository<T> + 'static,
{
    async fn add(&self, entity: T) -> RepoResult<T> {
        self.run(move |repo| repo.add(entity)).await
    }

    async fn get_by_id(&self, id: T::Key) -> RepoResult<Option<T>> {
        self.run(move |repo| repo.get_by_id(id)).await
    }

    async fn list_all(&self) -> RepoResult<Vec<T>> {
        self.run(|repo| repo.list_all()).await
    }

    async fn update(&self, entity: T) -> RepoResult<bool> {
        self.run(move |repo| repo.update(entity)).await
    }

    async fn remove(&self, id: T::Key) -> RepoResult<bool> {
        self.run(move |repo| repo.remove(id)).await
    }
}
