//! JSON file repository.
//!
//! # Responsibility
//! - Persist the whole store as one pretty-printed JSON array.
//! - Run every operation as a full load-modify-save cycle.
//!
//! # Invariants
//! - The array is written sorted ascending by key.
//! - Missing, blank or `null` files are an empty store under every policy.
//! - Unparsable files are an empty store under `LoadPolicy::FailSoft`.

use super::contract::{into_listing, ReadRepository, RepoError, RepoResult, WriteRepository};
use super::file_store::{FileStore, LoadPolicy};
use crate::model::Record;
use log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

/// Repository persisting records to a JSON document.
pub struct JsonFileRepository<T> {
    store: FileStore,
    _records: PhantomData<fn() -> T>,
}

impl<T> JsonFileRepository<T>
where
    T: Record + Serialize + DeserializeOwned,
{
    /// Creates a fail-soft store at `path`.
    ///
    /// # Errors
    /// - `RepoError::InvalidPath` when `path` is empty or whitespace-only.
    pub fn new(path: impl Into<PathBuf>) -> RepoResult<Self> {
        Self::with_policy(path, LoadPolicy::FailSoft)
    }

    pub fn with_policy(path: impl Into<PathBuf>, policy: LoadPolicy) -> RepoResult<Self> {
        Ok(Self {
            store: FileStore::new("json", path.into(), policy)?,
            _records: PhantomData,
        })
    }

    pub fn path(&self) -> &Path {
        self.store.path()
    }

    pub fn load_policy(&self) -> LoadPolicy {
        self.store.policy()
    }

    fn load(&self) -> RepoResult<Vec<T>> {
        let Some(text) = self.store.read()? else {
            return Ok(Vec::new());
        };
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        // `null` is an empty store, like a blank file.
        match serde_json::from_str::<Option<Vec<T>>>(&text) {
            Ok(records) => Ok(into_listing(records.unwrap_or_default())),
            Err(err) => {
                self.store.reject(err.to_string())?;
                Ok(Vec::new())
            }
        }
    }

    fn save(&self, records: Vec<T>) -> RepoResult<()> {
        let records = into_listing(records);
        let json = serde_json::to_string_pretty(&records)
            .map_err(|err| RepoError::Encode(err.to_string()))?;
        self.store.write(&json, records.len())
    }
}

impl<T> ReadRepository<T> for JsonFileRepository<T>
where
    T: Record + Serialize + DeserializeOwned,
{
    fn get_by_id(&self, id: T::Key) -> RepoResult<Option<T>> {
        let _guard = self.store.lock()?;
        Ok(self.load()?.into_iter().find(|record| record.key() == id))
    }

    fn list_all(&self) -> RepoResult<Vec<T>> {
        let _guard = self.store.lock()?;
        self.load()
    }
}

impl<T> WriteRepository<T> for JsonFileRepository<T>
where
    T: Record + Serialize + DeserializeOwned,
{
    fn add(&self, entity: T) -> RepoResult<T> {
        let _guard = self.store.lock()?;
        let key = entity.key();
        let mut records = self.load()?;
        records.retain(|record| record.key() != key);
        records.push(entity.clone());
        self.save(records)?;
        debug!("event=repo_add module=repo backend=json status=ok key={key}");
        Ok(entity)
    }

    fn update(&self, entity: T) -> RepoResult<bool> {
        let _guard = self.store.lock()?;
        let key = entity.key();
        let mut records = self.load()?;
        let Some(index) = records.iter().position(|record| record.key() == key) else {
            debug!("event=repo_update module=repo backend=json status=not_found key={key}");
            return Ok(false);
        };
        records[index] = entity;
        self.save(records)?;
        debug!("event=repo_update module=repo backend=json status=ok key={key}");
        Ok(true)
    }

    fn remove(&self, id: T::Key) -> RepoResult<bool> {
        let _guard = self.store.lock()?;
        let mut records = self.load()?;
        let before = records.len();
        records.retain(|record| record.key() != id);
        if records.len() == before {
            return Ok(false);
        }
        self.save(records)?;
        debug!("event=repo_remove module=repo backend=json status=ok key={id}");
        Ok(true)
    }
}
