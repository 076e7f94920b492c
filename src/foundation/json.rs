use std::path::Path;

use anyhow::Context;
use serde::Serialize;

use crate::foundation::error::{MaskgenError, MaskgenResult};

/// Serialize `value` as JSON indented with four spaces.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> MaskgenResult<Vec<u8>> {
    let mut buf = Vec::new();
    let fmt = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, fmt);
    value
        .serialize(&mut ser)
        .map_err(|e| MaskgenError::serde(e.to_string()))?;
    Ok(buf)
}

/// Overwrite `path` with the pretty JSON form of `value`.
pub fn write_pretty_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> MaskgenResult<()> {
    let bytes = to_pretty_json(value)?;
    std::fs::write(path, bytes)
        .with_context(|| format!("write json '{}'", path.display()))
        .map_err(MaskgenError::from)
}

/// Create `dir` and any missing parents.
pub fn ensure_dir(dir: &Path) -> MaskgenResult<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("create directory '{}'", dir.display()))
        .map_err(MaskgenError::from)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/json.rs"]
mod tests;
