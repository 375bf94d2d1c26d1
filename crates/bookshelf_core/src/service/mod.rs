//! Book use-case services.
//!
//! # Responsibility
//! - Validate book input before it reaches a repository.
//! - Keep callers decoupled from the storage backend in use.

pub mod async_book_service;
pub mod book_service;
