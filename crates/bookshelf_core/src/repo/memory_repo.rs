//! Process-local repository backed by a hash map.

use super::contract::{ReadRepository, RepoError, RepoResult, WriteRepository};
use crate::model::Record;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// In-memory store. Contents live only as long as the instance.
///
/// Mutations are serialized by an internal mutex; `list_all` sorts a
/// snapshot taken under the same lock.
pub struct InMemoryRepository<T: Record> {
    records: Mutex<HashMap<T::Key, T>>,
}

impl<T: Record> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
        }
    }
}

impl<T: Record> InMemoryRepository<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with `records`; later duplicates win.
    pub fn with_records(records: impl IntoIterator<Item = T>) -> Self {
        let map = records
            .into_iter()
            .map(|record| (record.key(), record))
            .collect();
        Self {
            records: Mutex::new(map),
        }
    }

    fn guard(&self) -> RepoResult<MutexGuard<'_, HashMap<T::Key, T>>> {
        self.records
            .lock()
            .map_err(|_| RepoError::LockPoisoned("memory"))
    }
}

impl<T: Record> ReadRepository<T> for InMemoryRepository<T> {
    fn get_by_id(&self, id: T::Key) -> RepoResult<Option<T>> {
        Ok(self.guard()?.get(&id).cloned())
    }

    fn list_all(&self) -> RepoResult<Vec<T>> {
        let mut snapshot: Vec<T> = self.guard()?.values().cloned().collect();
        snapshot.sort_by_key(|record| record.key());
        Ok(snapshot)
    }
}

impl<T: Record> WriteRepository<T> for InMemoryRepository<T> {
    fn add(&self, entity: T) -> RepoResult<T> {
        self.guard()?.insert(entity.key(), entity.clone());
        Ok(entity)
    }

    fn update(&self, entity: T) -> RepoResult<bool> {
        let mut records = self.guard()?;
        match records.get_mut(&entity.key()) {
            Some(slot) => {
                *slot = entity;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn remove(&self, id: T::Key) -> RepoResult<bool> {
        Ok(self.guard()?.remove(&id).is_some())
    }
}
