use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::Path;

use anyhow::Context;

use crate::foundation::{
    error::{MaskgenError, MaskgenResult},
    json::write_pretty_json,
};

/// Ordered `(background, mask, eyes, band)` tuple identifying a base combination.
///
/// Serialized as a four-element JSON array.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct CombinationKey(String, String, String, String);

impl CombinationKey {
    /// Build a key from the four uniqueness traits.
    pub fn new(background: &str, mask: &str, eyes: &str, band: &str) -> Self {
        Self(
            background.to_string(),
            mask.to_string(),
            eyes.to_string(),
            band.to_string(),
        )
    }

    /// Background identifier.
    pub fn background(&self) -> &str {
        &self.0
    }

    /// Mask identifier.
    pub fn mask(&self) -> &str {
        &self.1
    }

    /// Eyes identifier or `"None"`.
    pub fn eyes(&self) -> &str {
        &self.2
    }

    /// Band identifier.
    pub fn band(&self) -> &str {
        &self.3
    }
}

/// Accepted combinations in acceptance order, with a set index for lookups.
#[derive(Clone, Debug, Default)]
pub struct DuplicateLog {
    entries: Vec<CombinationKey>,
    index: HashSet<CombinationKey>,
}

impl DuplicateLog {
    /// Empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Log holding `keys` in order. Repeated keys are kept once.
    pub fn from_keys(keys: impl IntoIterator<Item = CombinationKey>) -> Self {
        let mut log = Self::new();
        for k in keys {
            log.push(k);
        }
        log
    }

    /// Load a persisted log.
    ///
    /// A missing file is a fresh start. A file that exists but does not parse is an error: the
    /// history is never silently discarded.
    pub fn load(path: &Path) -> MaskgenResult<Self> {
        let bytes = match std::fs::read(path) {
            Ok(b) => b,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::new()),
            Err(e) => {
                return Err(anyhow::Error::new(e)
                    .context(format!("read duplicate log '{}'", path.display()))
                    .into());
            }
        };
        let keys: Vec<CombinationKey> =
            serde_json::from_slice(&bytes).map_err(|e| MaskgenError::CorruptLog {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        Ok(Self::from_keys(keys))
    }

    /// Overwrite `path` with the full log.
    pub fn save(&self, path: &Path) -> MaskgenResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create log dir '{}'", parent.display()))?;
        }
        write_pretty_json(path, &self.entries)
    }

    /// Whether `key` was accepted before.
    pub fn contains(&self, key: &CombinationKey) -> bool {
        self.index.contains(key)
    }

    /// Append `key`; returns `false` when it is already present.
    pub fn push(&mut self, key: CombinationKey) -> bool {
        if !self.index.insert(key.clone()) {
            return false;
        }
        self.entries.push(key);
        true
    }

    /// Remove the most recent entry.
    pub(crate) fn pop(&mut self) -> Option<CombinationKey> {
        let key = self.entries.pop()?;
        self.index.remove(&key);
        Some(key)
    }

    /// Accepted keys in order.
    pub fn entries(&self) -> &[CombinationKey] {
        &self.entries
    }

    /// Number of accepted keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been accepted yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/guard/log.rs"]
mod tests;
