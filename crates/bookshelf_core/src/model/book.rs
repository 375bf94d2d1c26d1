//! Book domain model.
//!
//! # Responsibility
//! - Define the immutable `Book` record and its validation rules.
//! - Fix the external wire shape used by file-backed stores.
//!
//! # Invariants
//! - `id` is the unique store key.
//! - A valid book has non-blank `title` and `author`.
//! - Construction does not validate; services call `validate()` before writes.

use crate::model::Record;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Integer key for books.
pub type BookId = i64;

/// Immutable book record.
///
/// Serialized with lower-camel-case property names (`id`, `title`, `author`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    id: BookId,
    title: String,
    author: String,
}

/// Validation errors for book fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookValidationError {
    /// `title` is empty or whitespace-only.
    EmptyTitle,
    /// `author` is empty or whitespace-only.
    EmptyAuthor,
}

impl Display for BookValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "book title cannot be empty"),
            Self::EmptyAuthor => write!(f, "book author cannot be empty"),
        }
    }
}

impl Error for BookValidationError {}

impl Book {
    /// Creates a book value without validating its fields.
    pub fn new(id: BookId, title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            author: author.into(),
        }
    }

    pub fn id(&self) -> BookId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    /// Returns a copy of this book with a replaced title.
    pub fn with_title(&self, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..self.clone()
        }
    }

    /// Returns a copy of this book with a replaced author.
    pub fn with_author(&self, author: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            ..self.clone()
        }
    }

    /// Checks required text fields.
    ///
    /// # Errors
    /// - `EmptyTitle` when the title is blank.
    /// - `EmptyAuthor` when the author is blank.
    pub fn validate(&self) -> Result<(), BookValidationError> {
        if self.title.trim().is_empty() {
            return Err(BookValidationError::EmptyTitle);
        }
        if self.author.trim().is_empty() {
            return Err(BookValidationError::EmptyAuthor);
        }
        Ok(())
    }
}

impl Record for Book {
    type Key = BookId;

    fn key(&self) -> BookId {
        self.id
    }
}
