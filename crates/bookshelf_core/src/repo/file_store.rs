//! Shared file plumbing for whole-file backends.
//!
//! # Responsibility
//! - Serialize load-modify-save cycles behind one lock per store.
//! - Apply the configured load policy to unreadable or invalid content.
//! - Replace the backing file atomically on save.
//!
//! # Invariants
//! - A missing file is an empty store under every policy.
//! - Saves never leave a partially written target file behind.

use super::contract::{RepoError, RepoResult};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::time::Instant;
use tempfile::NamedTempFile;

/// How a file-backed store reacts to content it cannot read or parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadPolicy {
    /// Treat unreadable content as an empty store and log a warning.
    #[default]
    FailSoft,
    /// Surface `RepoError::Io` / `RepoError::Corrupt` to the caller.
    Strict,
}

pub(crate) struct FileStore {
    backend: &'static str,
    path: PathBuf,
    policy: LoadPolicy,
    lock: Mutex<()>,
}

impl FileStore {
    /// Rejects blank paths so misconfiguration surfaces before any I/O.
    pub(crate) fn new(
        backend: &'static str,
        path: PathBuf,
        policy: LoadPolicy,
    ) -> RepoResult<Self> {
        if path.as_os_str().to_string_lossy().trim().is_empty() {
            return Err(RepoError::InvalidPath(path));
        }
        Ok(Self {
            backend,
            path,
            policy,
            lock: Mutex::new(()),
        })
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn policy(&self) -> LoadPolicy {
        self.policy
    }

    /// Enters the store's critical section.
    ///
    /// The guard must be held across the whole read-mutate-write cycle.
    pub(crate) fn lock(&self) -> RepoResult<MutexGuard<'_, ()>> {
        self.lock
            .lock()
            .map_err(|_| RepoError::LockPoisoned(self.backend))
    }

    /// Reads the whole backing file.
    ///
    /// Returns `None` when the file does not exist, or when it cannot be
    /// read under `LoadPolicy::FailSoft`.
    pub(crate) fn read(&self) -> RepoResult<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => match self.policy {
                LoadPolicy::FailSoft => {
                    warn!(
                        "event=store_load module=repo backend={} status=degraded reason=read_failed path={} error={}",
                        self.backend,
                        self.path.display(),
                        err
                    );
                    Ok(None)
                }
                LoadPolicy::Strict => Err(RepoError::Io {
                    path: self.path.clone(),
                    source: err,
                }),
            },
        }
    }

    /// Reports invalid content according to the load policy.
    ///
    /// Returns `Ok(())` when the caller should carry on without the invalid
    /// part.
    pub(crate) fn reject(&self, detail: String) -> RepoResult<()> {
        match self.policy {
            LoadPolicy::FailSoft => {
                warn!(
                    "event=store_load module=repo backend={} status=degraded reason=invalid_content path={} detail={}",
                    self.backend,
                    self.path.display(),
                    detail
                );
                Ok(())
            }
            LoadPolicy::Strict => Err(RepoError::Corrupt {
                path: self.path.clone(),
                detail,
            }),
        }
    }

    /// Replaces the backing file with `contents`.
    ///
    /// Writes a sibling temporary file and renames it over the target.
    pub(crate) fn write(&self, contents: &str, records: usize) -> RepoResult<()> {
        let started_at = Instant::now();
        let io_err = |source: std::io::Error| RepoError::Io {
            path: self.path.clone(),
            source,
        };

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut staged = NamedTempFile::new_in(dir).map_err(io_err)?;
        staged.write_all(contents.as_bytes()).map_err(io_err)?;
        staged.as_file().sync_all().map_err(io_err)?;
        staged
            .persist(&self.path)
            .map_err(|err| io_err(err.error))?;

        debug!(
            "event=store_save module=repo backend={} status=ok records={} duration_ms={}",
            self.backend,
            records,
            started_at.elapsed().as_millis()
        );
        Ok(())
    }
}
