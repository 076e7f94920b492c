use std::path::PathBuf;

/// Convenience result type used across maskgen.
pub type MaskgenResult<T> = Result<T, MaskgenError>;

/// Top-level error taxonomy used by generator APIs.
#[derive(thiserror::Error, Debug)]
pub enum MaskgenError {
    /// Invalid configuration values or layer tree layout.
    #[error("configuration error: {0}")]
    Config(String),

    /// A layer category directory does not exist.
    #[error("configuration error: layer directory '{}' is missing", path.display())]
    MissingCategory {
        /// Directory that was expected on disk.
        path: PathBuf,
    },

    /// A category (or a filtered subset of it) has nothing to choose from.
    #[error("configuration error: no eligible assets in '{category}'{}", filter_suffix(filter))]
    EmptyCategory {
        /// Category or nested folder that was searched.
        category: String,
        /// Filter that was applied, if any.
        filter: Option<String>,
    },

    /// Every regeneration attempt for an item collided with the duplicate log.
    #[error("item {item_id}: {attempts} attempts all produced duplicate combinations")]
    RetriesExhausted {
        /// Item that could not be generated.
        item_id: u32,
        /// Number of attempts made.
        attempts: u32,
    },

    /// The persisted duplicate log exists but cannot be parsed.
    #[error("duplicate log '{}' is corrupt: {reason}", path.display())]
    CorruptLog {
        /// Log file path.
        path: PathBuf,
        /// Parser diagnostic.
        reason: String,
    },

    /// Layer rasters cannot be composited together.
    #[error("composition error: {0}")]
    Compose(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

fn filter_suffix(filter: &Option<String>) -> String {
    match filter {
        Some(f) => format!(" matching '{f}'"),
        None => String::new(),
    }
}

impl MaskgenError {
    /// Build a [`MaskgenError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`MaskgenError::EmptyCategory`] value.
    pub fn empty_category(category: impl Into<String>, filter: Option<&str>) -> Self {
        Self::EmptyCategory {
            category: category.into(),
            filter: filter.map(str::to_owned),
        }
    }

    /// Build a [`MaskgenError::Compose`] value.
    pub fn compose(msg: impl Into<String>) -> Self {
        Self::Compose(msg.into())
    }

    /// Build a [`MaskgenError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Whether this error stems from the layer tree or configuration rather than from IO.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            Self::Config(_) | Self::MissingCategory { .. } | Self::EmptyCategory { .. }
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
