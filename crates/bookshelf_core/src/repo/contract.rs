//! Generic repository contracts.
//!
//! # Responsibility
//! - Split storage capabilities into read-only and write-only contracts.
//! - Define the error surface shared by every backend.
//!
//! # Invariants
//! - Any type implementing both narrower contracts is a `Repository`.
//! - `update` never inserts; `remove` of an absent key returns `false`.

use crate::model::Record;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::sync::Arc;

pub type RepoResult<T> = Result<T, RepoError>;

/// Storage-level failure raised by a backend.
#[derive(Debug)]
pub enum RepoError {
    /// Backing file could not be read or written.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Backing file content is invalid. Only raised under `LoadPolicy::Strict`.
    Corrupt { path: PathBuf, detail: String },
    /// Record value cannot be represented in the backend's format.
    Encode(String),
    /// Backing file path is empty or whitespace-only.
    InvalidPath(PathBuf),
    /// A previous holder of the store lock panicked.
    LockPoisoned(&'static str),
    /// Blocking store task panicked or was cancelled.
    TaskFailed(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "store io failed at `{}`: {source}", path.display()),
            Self::Corrupt { path, detail } => {
                write!(f, "store file `{}` is corrupt: {detail}", path.display())
            }
            Self::Encode(detail) => write!(f, "record cannot be encoded: {detail}"),
            Self::InvalidPath(path) => write!(f, "invalid store path `{}`", path.display()),
            Self::LockPoisoned(store) => write!(f, "{store} store lock poisoned"),
            Self::TaskFailed(detail) => write!(f, "store task failed: {detail}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Read-only capability over a keyed record store.
pub trait ReadRepository<T: Record>: Send + Sync {
    /// Returns the record stored under `id`, or `None`.
    fn get_by_id(&self, id: T::Key) -> RepoResult<Option<T>>;

    /// Returns every record, ascending by key.
    fn list_all(&self) -> RepoResult<Vec<T>>;
}

/// Write-only capability over a keyed record store.
pub trait WriteRepository<T: Record>: Send + Sync {
    /// Inserts or replaces `entity` under its key and returns it unchanged.
    fn add(&self, entity: T) -> RepoResult<T>;

    /// Replaces the record under `entity`'s key only when one exists.
    fn update(&self, entity: T) -> RepoResult<bool>;

    /// Deletes the record under `id`. Returns whether a record was removed.
    fn remove(&self, id: T::Key) -> RepoResult<bool>;
}

/// Full read/write contract.
///
/// Implemented automatically for every type providing both capabilities.
pub trait Repository<T: Record>: ReadRepository<T> + WriteRepository<T> {}

impl<T: Record, R: ReadRepository<T> + WriteRepository<T> + ?Sized> Repository<T> for R {}

/// Type-erased full repository, as built from runtime configuration.
pub type BoxedRepository<T> = Box<dyn Repository<T>>;

macro_rules! forward_repository {
    ($($wrapper:ty),+) => {
        $(
            impl<T: Record, R: ReadRepository<T> + ?Sized> ReadRepository<T> for $wrapper {
                fn get_by_id(&self, id: T::Key) -> RepoResult<Option<T>> {
                    (**self).get_by_id(id)
                }

                fn list_all(&self) -> RepoResult<Vec<T>> {
                    (**self).list_all()
                }
            }

            impl<T: Record, R: WriteRepository<T> + ?Sized> WriteRepository<T> for $wrapper {
                fn add(&self, entity: T) -> RepoResult<T> {
                    (**self).add(entity)
                }

                fn update(&self, entity: T) -> RepoResult<bool> {
                    (**self).update(entity)
                }

                fn remove(&self, id: T::Key) -> RepoResult<bool> {
                    (**self).remove(id)
                }
            }
        )+
    };
}

forward_repository!(&R, Box<R>, Arc<R>);

/// Orders records ascending by key, keeping the last record seen per key.
pub(crate) fn into_listing<T: Record>(records: Vec<T>) -> Vec<T> {
    records
        .into_iter()
        .map(|record| (record.key(), record))
        .collect::<BTreeMap<_, _>>()
        .into_values()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::into_listing;
    use crate::model::book::Book;

    #[test]
    fn listing_is_sorted_and_last_duplicate_wins() {
        let listing = into_listing(vec![
            Book::new(3, "c", "z"),
            Book::new(1, "a", "x"),
            Book::new(3, "c2", "z2"),
        ]);
        let ids: Vec<_> = listing.iter().map(Book::id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(listing[1].title(), "c2");
    }
}
