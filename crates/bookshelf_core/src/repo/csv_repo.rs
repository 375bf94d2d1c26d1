//! CSV file repository.
//!
//! # Responsibility
//! - Persist records as one comma-separated line each.
//! - Run every operation as a full load-modify-save cycle.
//!
//! # Invariants
//! - File content is rewritten sorted ascending by key.
//! - No header row is written unless `CsvOptions::has_header` is set.
//! - A first line is skipped as a header only when it matches `CsvRecord::HEADER`.
//! - A missing file behaves as an empty store.

use super::contract::{into_listing, ReadRepository, RepoError, RepoResult, WriteRepository};
use super::csv_codec::{decode_line, encode_line};
use super::file_store::{FileStore, LoadPolicy};
use crate::model::book::{Book, BookId};
use crate::model::Record;
use log::debug;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

/// Mapping between a record and its ordered CSV fields.
pub trait CsvRecord: Sized {
    /// Column names, used when a header row is enabled.
    const HEADER: &'static [&'static str];

    /// Returns field values in declared column order.
    fn to_fields(&self) -> Vec<String>;

    /// Rebuilds a record from decoded fields.
    fn from_fields(fields: &[String]) -> Result<Self, String>;
}

impl CsvRecord for Book {
    const HEADER: &'static [&'static str] = &["Id", "Title", "Author"];

    fn to_fields(&self) -> Vec<String> {
        vec![
            self.id().to_string(),
            self.title().to_string(),
            self.author().to_string(),
        ]
    }

    fn from_fields(fields: &[String]) -> Result<Self, String> {
        let [id, title, author] = fields else {
            return Err(format!("expected 3 fields, found {}", fields.len()));
        };
        let id = id
            .trim()
            .parse::<BookId>()
            .map_err(|_| format!("invalid book id `{id}`"))?;
        Ok(Book::new(id, title.as_str(), author.as_str()))
    }
}

/// Options for CSV-backed stores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CsvOptions {
    pub load_policy: LoadPolicy,
    /// Write a header row on save and skip the first line on load.
    pub has_header: bool,
}

/// Repository persisting records to a CSV file.
pub struct CsvFileRepository<T> {
    store: FileStore,
    has_header: bool,
    _records: PhantomData<fn() -> T>,
}

impl<T: Record + CsvRecord> CsvFileRepository<T> {
    /// Creates a fail-soft, header-less store at `path`.
    ///
    /// # Errors
    /// - `RepoError::InvalidPath` when `path` is empty or whitespace-only.
    pub fn new(path: impl Into<PathBuf>) -> RepoResult<Self> {
        Self::with_options(path, CsvOptions::default())
    }

    pub fn with_options(path: impl Into<PathBuf>, options: CsvOptions) -> RepoResult<Self> {
        Ok(Self {
            store: FileStore::new("csv", path.into(), options.load_policy)?,
            has_header: options.has_header,
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

        let mut records = Vec::new();
        for (index, raw) in text.lines().enumerate() {
            if raw.trim().is_empty() {
                continue;
            }
            let fields = decode_line(raw).map_err(|err| err.to_string());
            if index == 0 && self.has_header && fields.as_deref().is_ok_and(is_header::<T>) {
                continue;
            }
            let parsed = fields.and_then(|fields| T::from_fields(&fields));
            match parsed {
                Ok(record) => records.push(record),
                Err(detail) => self.store.reject(format!("line {}: {detail}", index + 1))?,
            }
        }
        Ok(into_listing(records))
    }

    fn save(&self, records: Vec<T>) -> RepoResult<()> {
        let records = into_listing(records);
        let mut contents = String::new();
        if self.has_header {
            let header =
                encode_line(T::HEADER).map_err(|err| RepoError::Encode(err.to_string()))?;
            contents.push_str(&header);
            contents.push('\n');
        }
        for record in &records {
            let line = encode_line(record.to_fields().as_slice())
                .map_err(|err| RepoError::Encode(format!("record {}: {err}", record.key())))?;
            contents.push_str(&line);
            contents.push('\n');
        }
        self.store.write(&contents, records.len())
    }
}

/// A first line that is not the header is treated as data, so files written
/// without a header keep their first record.
fn is_header<T: CsvRecord>(fields: &[String]) -> bool {
    fields.len() == T::HEADER.len()
        && fields
            .iter()
            .zip(T::HEADER)
            .all(|(field, name)| field.trim().eq_ignore_ascii_case(name))
}

impl<T: Record + CsvRecord> ReadRepository<T> for CsvFileRepository<T> {
    fn get_by_id(&self, id: T::Key) -> RepoResult<Option<T>> {
        let _guard = self.store.lock()?;
        Ok(self.load()?.into_iter().find(|record| record.key() == id))
    }

    fn list_all(&self) -> RepoResult<Vec<T>> {
        let _guard = self.store.lock()?;
        self.load()
    }
}

impl<T: Record + CsvRecord> WriteRepository<T> for CsvFileRepository<T> {
    fn add(&self, entity: T) -> RepoResult<T> {
        let _guard = self.store.lock()?;
        let key = entity.key();
        let mut records = self.load()?;
        records.retain(|record| record.key() != key);
        records.push(entity.clone());
        self.save(records)?;
        debug!("event=repo_add module=repo backend=csv status=ok key={key}");
        Ok(entity)
    }

    fn update(&self, entity: T) -> RepoResult<bool> {
        let _guard = self.store.lock()?;
        let key = entity.key();
        let mut records = self.load()?;
        let Some(slot) = records.iter_mut().find(|record| record.key() == key) else {
            debug!("event=repo_update module=repo backend=csv status=not_found key={key}");
            return Ok(false);
        };
        *slot = entity;
        self.save(records)?;
        debug!("event=repo_update module=repo backend=csv status=ok key={key}");
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
        debug!("event=repo_remove module=repo backend=csv status=ok key={id}");
        Ok(true)
    }
}
