//! Book use-case service over the async contract.
//!
//! # Responsibility
//! - Offer the validating book API for latency-bearing stores.
//! - Fan out independent reads and join on all of them.
//!
//! # Invariants
//! - `find_many` reports one outcome per requested id, in request order.
//! - A failed read never cancels or hides the other reads of a batch.

use crate::model::book::{Book, BookId};
use crate::repo::async_repo::AsyncRepository;
use crate::repo::contract::RepoResult;
use crate::service::book_service::{validate_for, ServiceResult};
use futures::future::join_all;
use log::debug;
use std::time::Instant;

/// Async read/write service for books.
pub struct AsyncBookService<R: AsyncRepository<Book>> {
    repo: R,
}

impl<R: AsyncRepository<Book>> AsyncBookService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub async fn register(&self, book: Book) -> ServiceResult<Book> {
        validate_for("register", &book)?;
        Ok(self.repo.add(book).await?)
    }

    pub async fn update_book(&self, book: Book) -> ServiceResult<bool> {
        validate_for("update", &book)?;
        Ok(self.repo.update(book).await?)
    }

    pub async fn remove_book(&self, id: BookId) -> ServiceResult<bool> {
        Ok(self.repo.remove(id).await?)
    }

    pub async fn find_by_id(&self, id: BookId) -> ServiceResult<Option<Book>> {
        Ok(self.repo.get_by_id(id).await?)
    }

    pub async fn list_all(&self) -> ServiceResult<Vec<Book>> {
        Ok(self.repo.list_all().await?)
    }

    pub async fn count_books(&self) -> ServiceResult<usize> {
        Ok(self.repo.list_all().await?.len())
    }

    /// Looks up every id concurrently and waits for all lookups.
    ///
    /// Each entry pairs the requested id with its own outcome, so the caller
    /// chooses whether one failure fails the batch.
    pub async fn find_many(&self, ids: &[BookId]) -> Vec<(BookId, RepoResult<Option<Book>>)> {
        let started_at = Instant::now();
        let lookups = ids.iter().map(|&id| async move {
            let outcome = self.repo.get_by_id(id).await;
            (id, outcome)
        });
        let results = join_all(lookups).await;

        debug!(
            "event=book_find_many module=service status=ok requested={} failed={} duration_ms={}",
            results.len(),
            results.iter().filter(|(_, outcome)| outcome.is_err()).count(),
            started_at.elapsed().as_millis()
        );
        results
    }
}
