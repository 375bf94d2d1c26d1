//! Store configuration and backend bootstrap.
//!
//! # Responsibility
//! - Describe which backend a process uses and where it persists.
//! - Build a ready-to-use book repository from that description.
//!
//! # Invariants
//! - Invalid configuration fails at construction, never on first use.
//! - File backends require a path whose parent directory exists.

use crate::model::book::Book;
use crate::repo::contract::{BoxedRepository, RepoError};
use crate::repo::csv_repo::{CsvFileRepository, CsvOptions};
use crate::repo::json_repo::JsonFileRepository;
use crate::repo::memory_repo::InMemoryRepository;
use crate::repo::LoadPolicy;
use log::{error, info};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Persistence backend selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    #[default]
    Memory,
    Csv,
    Json,
}

impl BackendKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }

    fn is_file_backed(self) -> bool {
        !matches!(self, Self::Memory)
    }
}

/// Declarative store configuration.
///
/// ```json
/// { "backend": "csv", "path": "/var/lib/bookshelf/books.csv", "load_policy": "strict" }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    pub backend: BackendKind,
    /// Backing file. Required for `csv` and `json`, ignored for `memory`.
    pub path: Option<PathBuf>,
    pub load_policy: LoadPolicy,
    /// CSV only: write and expect a header row.
    pub csv_has_header: bool,
}

/// Configuration errors raised before any store is opened.
#[derive(Debug)]
pub enum ConfigError {
    Parse(serde_json::Error),
    MissingPath(BackendKind),
    MissingParentDir(PathBuf),
    Store(RepoError),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "invalid store config: {err}"),
            Self::MissingPath(kind) => {
                write!(f, "backend `{}` requires a file path", kind.as_str())
            }
            Self::MissingParentDir(path) => {
                write!(f, "parent directory of `{}` does not exist", path.display())
            }
            Self::Store(err) => write!(f, "store cannot be opened: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

impl From<RepoError> for ConfigError {
    fn from(value: RepoError) -> Self {
        Self::Store(value)
    }
}

impl StoreConfig {
    pub fn memory() -> Self {
        Self::default()
    }

    pub fn csv(path: impl Into<PathBuf>) -> Self {
        Self {
            backend: BackendKind::Csv,
            path: Some(path.into()),
            ..Self::default()
        }
    }

    pub fn json(path: impl Into<PathBuf>) -> Self {
        Self {
            backend: BackendKind::Json,
            path: Some(path.into()),
            ..Self::default()
        }
    }

    pub fn with_load_policy(mut self, policy: LoadPolicy) -> Self {
        self.load_policy = policy;
        self
    }

    /// Parses and validates a JSON config document.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that file backends have a usable path.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.backend.is_file_backed() {
            return Ok(());
        }
        let path = self
            .path
            .as_deref()
            .filter(|path| !path.as_os_str().to_string_lossy().trim().is_empty())
            .ok_or(ConfigError::MissingPath(self.backend))?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.is_dir() {
                return Err(ConfigError::MissingParentDir(path.to_path_buf()));
            }
        }
        Ok(())
    }

    fn file_path(&self) -> Result<&Path, ConfigError> {
        self.path
            .as_deref()
            .ok_or(ConfigError::MissingPath(self.backend))
    }
}

/// Builds the configured book repository.
///
/// # Side effects
/// - Emits `store_open` logging events with duration and status.
/// - Does not touch the backing file; it is created on first write.
pub fn open_book_repository(config: &StoreConfig) -> Result<BoxedRepository<Book>, ConfigError> {
    let started_at = Instant::now();
    let backend = config.backend.as_str();
    info!("event=store_open module=config status=start backend={backend}");

    match config.validate().and_then(|()| build_book_repository(config)) {
        Ok(repo) => {
            info!(
                "event=store_open module=config status=ok backend={backend} load_policy={:?} duration_ms={}",
                config.load_policy,
                started_at.elapsed().as_millis()
            );
            Ok(repo)
        }
        Err(err) => {
            error!(
                "event=store_open module=config status=error backend={backend} duration_ms={} error={err}",
                started_at.elapsed().as_millis()
            );
            Err(err)
        }
    }
}

fn build_book_repository(config: &StoreConfig) -> Result<BoxedRepository<Book>, ConfigError> {
    Ok(match config.backend {
        BackendKind::Memory => Box::new(InMemoryRepository::<Book>::new()),
        BackendKind::Csv => Box::new(CsvFileRepository::<Book>::with_options(
            config.file_path()?,
            CsvOptions {
                load_policy: config.load_policy,
                has_header: config.csv_has_header,
            },
        )?),
        BackendKind::Json => Box::new(JsonFileRepository::<Book>::with_policy(
            config.file_path()?,
            config.load_policy,
        )?),
    })
}
