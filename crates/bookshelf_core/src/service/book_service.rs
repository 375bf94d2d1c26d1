//! Book use-case services over the synchronous contracts.
//!
//! # Responsibility
//! - Validate required fields on register/update.
//! - Delegate storage to a full or read-only repository.
//!
//! # Invariants
//! - Invalid input never reaches the repository.
//! - Repository outcomes (`None`, `false`) are returned unchanged.

use crate::model::book::{Book, BookId, BookValidationError};
use crate::repo::contract::{ReadRepository, RepoError, Repository};
use log::{debug, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, BookServiceError>;

/// Service error for book use-cases.
#[derive(Debug)]
pub enum BookServiceError {
    /// Input failed field validation; nothing was written.
    Validation(BookValidationError),
    /// Backend failure.
    Repo(RepoError),
}

impl Display for BookServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for BookServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<BookValidationError> for BookServiceError {
    fn from(value: BookValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for BookServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Validates `book` and logs the rejection without field contents.
pub(crate) fn validate_for(op: &str, book: &Book) -> Result<(), BookValidationError> {
    book.validate().map_err(|err| {
        warn!(
            "event=book_{op} module=service status=rejected id={} reason={err:?}",
            book.id()
        );
        err
    })
}

/// Read/write service for books.
pub struct BookService<R: Repository<Book>> {
    repo: R,
}

impl<R: Repository<Book>> BookService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Validates and stores a book, replacing any book with the same id.
    pub fn register(&self, book: Book) -> ServiceResult<Book> {
        validate_for("register", &book)?;
        let stored = self.repo.add(book)?;
        debug!(
            "event=book_register module=service status=ok id={}",
            stored.id()
        );
        Ok(stored)
    }

    pub fn find_by_id(&self, id: BookId) -> ServiceResult<Option<Book>> {
        Ok(self.repo.get_by_id(id)?)
    }

    /// Lists all books ascending by id.
    pub fn list_all(&self) -> ServiceResult<Vec<Book>> {
        Ok(self.repo.list_all()?)
    }

    /// Validates and replaces an existing book.
    ///
    /// Returns `false` when no book with that id exists.
    pub fn update_book(&self, book: Book) -> ServiceResult<bool> {
        validate_for("update", &book)?;
        let id = book.id();
        let updated = self.repo.update(book)?;
        debug!("event=book_update module=service status=ok id={id} updated={updated}");
        Ok(updated)
    }

    /// Removes a book. Returns `false` when it did not exist.
    pub fn remove_book(&self, id: BookId) -> ServiceResult<bool> {
        let removed = self.repo.remove(id)?;
        debug!("event=book_remove module=service status=ok id={id} removed={removed}");
        Ok(removed)
    }

    /// Borrows the underlying repository.
    pub fn repository(&self) -> &R {
        &self.repo
    }
}

/// Query-only service; cannot mutate the store it wraps.
pub struct ReadOnlyBookService<R: ReadRepository<Book>> {
    repo: R,
}

impl<R: ReadRepository<Book>> ReadOnlyBookService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn find_by_id(&self, id: BookId) -> ServiceResult<Option<Book>> {
        Ok(self.repo.get_by_id(id)?)
    }

    pub fn list_all(&self) -> ServiceResult<Vec<Book>> {
        Ok(self.repo.list_all()?)
    }

    pub fn count_books(&self) -> ServiceResult<usize> {
        Ok(self.repo.list_all()?.len())
    }

    pub fn book_exists(&self, id: BookId) -> ServiceResult<bool> {
        Ok(self.repo.get_by_id(id)?.is_some())
    }
}
