//! Core library for bookshelf.
//! Keyed record storage behind swappable backends, plus validating book services.

pub mod config;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{open_book_repository, BackendKind, ConfigError, StoreConfig};
pub use logging::{init_logging, logging_status, LogLevel, LoggingError};
pub use model::book::{Book, BookId, BookValidationError};
pub use model::Record;
pub use repo::async_repo::{AsyncRepository, LatencyRepository, DEFAULT_IO_DELAY};
pub use repo::contract::{
    BoxedRepository, ReadRepository, RepoError, RepoResult, Repository, WriteRepository,
};
pub use repo::csv_repo::{CsvFileRepository, CsvOptions, CsvRecord};
pub use repo::json_repo::JsonFileRepository;
pub use repo::memory_repo::InMemoryRepository;
pub use repo::LoadPolicy;
pub use service::async_book_service::AsyncBookService;
pub use service::book_service::{
    BookService, BookServiceError, ReadOnlyBookService, ServiceResult,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
