use std::path::{Path, PathBuf};

use crate::{
    foundation::error::MaskgenResult,
    guard::log::{CombinationKey, DuplicateLog},
    select::record::TraitRecord,
};

/// Gatekeeper over the persisted duplicate log.
///
/// `accept_or_reject` takes `&mut self`, so the check and the append happen under one exclusive
/// borrow.
#[derive(Debug)]
pub struct DuplicateGuard {
    log: DuplicateLog,
    path: PathBuf,
}

impl DuplicateGuard {
    /// Guard backed by the log at `path`, loading any prior history.
    pub fn open(path: impl Into<PathBuf>) -> MaskgenResult<Self> {
        let path = path.into();
        let log = DuplicateLog::load(&path)?;
        tracing::debug!(entries = log.len(), path = %path.display(), "duplicate log loaded");
        Ok(Self { log, path })
    }

    /// Guard over an already-loaded log.
    pub fn with_log(log: DuplicateLog, path: impl Into<PathBuf>) -> Self {
        Self {
            log,
            path: path.into(),
        }
    }

    /// Accept `record` if its combination is new.
    ///
    /// Rejection leaves the log untouched. Acceptance rewrites the whole log on disk; if that write
    /// fails the in-memory entry is rolled back and the error propagated.
    pub fn accept_or_reject(&mut self, record: &TraitRecord) -> MaskgenResult<bool> {
        self.accept_key(record.combination_key())
    }

    /// Key-level form of [`DuplicateGuard::accept_or_reject`].
    pub fn accept_key(&mut self, key: CombinationKey) -> MaskgenResult<bool> {
        if !self.log.push(key) {
            return Ok(false);
        }
        if let Err(e) = self.log.save(&self.path) {
            self.log.pop();
            return Err(e);
        }
        Ok(true)
    }

    /// Whether `key` was accepted before.
    pub fn is_duplicate(&self, key: &CombinationKey) -> bool {
        self.log.contains(key)
    }

    /// Current log.
    pub fn log(&self) -> &DuplicateLog {
        &self.log
    }

    /// Backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
#[path = "../../tests/unit/guard/duplicate.rs"]
mod tests;
