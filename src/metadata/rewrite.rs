use std::path::Path;

use anyhow::Context;

use crate::foundation::{
    error::{MaskgenError, MaskgenResult},
    json::{ensure_dir, write_pretty_json},
};

/// Outcome of a rewrite pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RewriteSummary {
    /// Item documents inspected.
    pub files_scanned: usize,
    /// Documents whose `image` changed and were written back.
    pub files_changed: usize,
    /// Placeholder occurrences replaced across all documents.
    pub substitutions: usize,
}

/// Whether `file_name` follows the item document naming (`item_*.json`).
pub fn is_item_document(file_name: &str) -> bool {
    file_name.starts_with("item_") && file_name.ends_with(".json")
}

/// Replace `old_prefix` with `new_prefix` in the `image` field of every item document in `dir`.
///
/// Plain substring substitution. Documents without an occurrence are left untouched, so a second
/// pass with the same prefixes changes nothing. The rest of each document keeps its key order.
#[tracing::instrument(skip(dir), fields(dir = %dir.display()))]
pub fn rewrite_image_urls(
    dir: &Path,
    old_prefix: &str,
    new_prefix: &str,
) -> MaskgenResult<RewriteSummary> {
    if old_prefix.is_empty() {
        return Err(MaskgenError::config("rewrite placeholder must not be empty"));
    }
    if new_prefix.contains(old_prefix) {
        return Err(MaskgenError::config(format!(
            "new prefix '{new_prefix}' contains placeholder '{old_prefix}'"
        )));
    }
    ensure_dir(dir)?;

    let mut names = Vec::new();
    let rd = std::fs::read_dir(dir).with_context(|| format!("list '{}'", dir.display()))?;
    for entry in rd {
        let entry = entry.with_context(|| format!("read entry of '{}'", dir.display()))?;
        if let Ok(name) = entry.file_name().into_string()
            && is_item_document(&name)
        {
            names.push(name);
        }
    }
    names.sort();

    let mut summary = RewriteSummary::default();
    for name in names {
        let path = dir.join(&name);
        summary.files_scanned += 1;

        let bytes = std::fs::read(&path).with_context(|| format!("read '{}'", path.display()))?;
        let mut doc: serde_json::Value = serde_json::from_slice(&bytes)
            .map_err(|e| MaskgenError::serde(format!("parse '{}': {e}", path.display())))?;

        let Some(serde_json::Value::String(image)) = doc.get_mut("image") else {
            tracing::debug!(file = %name, "no image field");
            continue;
        };
        let hits = image.matches(old_prefix).count();
        if hits == 0 {
            continue;
        }
        *image = image.replace(old_prefix, new_prefix);

        write_pretty_json(&path, &doc)?;
        summary.files_changed += 1;
        summary.substitutions += hits;
    }

    tracing::info!(
        scanned = summary.files_scanned,
        changed = summary.files_changed,
        "image urls rewritten"
    );
    Ok(summary)
}

#[cfg(test)]
#[path = "../../tests/unit/metadata/rewrite.rs"]
mod tests;
