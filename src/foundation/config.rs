use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::foundation::error::{MaskgenError, MaskgenResult};

/// Number of items generated by a default run.
pub const DEFAULT_COLLECTION_SIZE: u32 = 200;
/// Side length, in pixels, of every persisted raster.
pub const DEFAULT_OUTPUT_SIZE: u32 = 3000;
/// Regeneration cap for a single item before it is reported as failed.
pub const DEFAULT_MAX_ATTEMPTS_PER_ITEM: u32 = 64;
/// Literal written in front of every `image` URI until the rewrite step replaces it.
pub const DEFAULT_IMAGE_PLACEHOLDER: &str = "blank";
/// URI prefix substituted for the placeholder by `rewrite-urls`.
pub const DEFAULT_IMAGE_BASE_URI: &str =
    "https://tan-labour-roundworm-161.mypinata.cloud/ipfs/bafybeiavz2i3hx43spsjwltgmdzyrnsyvlbdjjzgd4y37ihsmhsjd3wzg4";

/// Generator settings.
///
/// Every field has a compiled-in default, so a run with no configuration file behaves exactly like
/// `GeneratorConfig::default()`. A JSON file only needs the keys it overrides.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Root of the layer tree (`backgrounds/`, `masks/`, `eyes/`, `bands/`, `tears/`, `blush/`).
    pub layers_dir: PathBuf,
    /// Directory receiving one `item_<id>/` folder of rasters per item.
    pub output_dir: PathBuf,
    /// Directory receiving `item_<id>.json` documents and the duplicate log.
    pub metadata_dir: PathBuf,
    /// Number of items in a run; ids go from 1 to this value inclusive.
    pub collection_size: u32,
    /// Square output resolution in pixels.
    pub output_size: u32,
    /// Attempts per item before giving up on duplicate collisions.
    pub max_attempts_per_item: u32,
    /// Seed for reproducible runs; OS entropy when absent.
    pub seed: Option<u64>,
    /// Metadata `name` prefix, rendered as `"<prefix> #<id>"`.
    pub name_prefix: String,
    /// Metadata `description`.
    pub description: String,
    /// Placeholder prefix of the metadata `image` field.
    pub image_placeholder: String,
    /// Final URI prefix used by the rewrite step.
    pub image_base_uri: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            layers_dir: PathBuf::from("layers"),
            output_dir: PathBuf::from("output_items"),
            metadata_dir: PathBuf::from("output_metadata"),
            collection_size: DEFAULT_COLLECTION_SIZE,
            output_size: DEFAULT_OUTPUT_SIZE,
            max_attempts_per_item: DEFAULT_MAX_ATTEMPTS_PER_ITEM,
            seed: None,
            name_prefix: "Masked".to_string(),
            description: "A mysterious mask NFT reflecting wallet activity.".to_string(),
            image_placeholder: DEFAULT_IMAGE_PLACEHOLDER.to_string(),
            image_base_uri: DEFAULT_IMAGE_BASE_URI.to_string(),
        }
    }
}

impl GeneratorConfig {
    /// Parse a configuration from a JSON reader and validate it.
    pub fn from_reader<R: std::io::Read>(r: R) -> MaskgenResult<Self> {
        let cfg: Self = serde_json::from_reader(r)
            .map_err(|e| MaskgenError::config(format!("parse generator config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse a configuration from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> MaskgenResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            MaskgenError::config(format!("open generator config '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Reject values that would make a run meaningless.
    pub fn validate(&self) -> MaskgenResult<()> {
        if self.collection_size == 0 {
            return Err(MaskgenError::config("collection_size must be >= 1"));
        }
        if self.output_size == 0 {
            return Err(MaskgenError::config("output_size must be >= 1"));
        }
        if self.max_attempts_per_item == 0 {
            return Err(MaskgenError::config("max_attempts_per_item must be >= 1"));
        }
        if self.image_placeholder.is_empty() {
            return Err(MaskgenError::config("image_placeholder must not be empty"));
        }
        // A base URI carrying the placeholder would be rewritten again on every pass.
        if self.image_base_uri.contains(&self.image_placeholder) {
            return Err(MaskgenError::config(format!(
                "image_base_uri must not contain image_placeholder '{}'",
                self.image_placeholder
            )));
        }
        Ok(())
    }

    /// Path of the persisted duplicate log.
    pub fn attribute_log_path(&self) -> PathBuf {
        self.metadata_dir.join("attributes.json")
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/config.rs"]
mod tests;
