use std::path::{Path, PathBuf};

use crate::{
    foundation::{config::GeneratorConfig, error::MaskgenResult, json::write_pretty_json},
    select::record::TraitRecord,
};

/// File stem shared by every artifact of item `id`.
pub fn item_stem(id: u32) -> String {
    format!("item_{id}")
}

/// `{ trait_type, value }` entry of a metadata document.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Attribute {
    /// Trait name (`Background`, `Mask`, ...).
    pub trait_type: String,
    /// Selected asset identifier.
    pub value: String,
}

/// Per-item metadata document.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MetadataDocument {
    /// Display name.
    pub name: String,
    /// Collection description.
    pub description: String,
    /// Image URI; starts with the placeholder until rewritten.
    pub image: String,
    /// One entry per trait, in attribute order.
    pub attributes: Vec<Attribute>,
}

impl MetadataDocument {
    /// Document for item `id` built from its accepted `record`.
    pub fn for_item(id: u32, record: &TraitRecord, cfg: &GeneratorConfig) -> Self {
        Self {
            name: format!("{} #{id}", cfg.name_prefix),
            description: cfg.description.clone(),
            image: format!("{}/{}.png", cfg.image_placeholder, item_stem(id)),
            attributes: record
                .traits()
                .map(|(trait_type, value)| Attribute {
                    trait_type: trait_type.to_string(),
                    value: value.to_string(),
                })
                .collect(),
        }
    }

    /// Path of item `id`'s document inside `metadata_dir`.
    pub fn path_for(metadata_dir: &Path, id: u32) -> PathBuf {
        metadata_dir.join(format!("{}.json", item_stem(id)))
    }

    /// Write the document, replacing any previous one.
    pub fn write(&self, path: &Path) -> MaskgenResult<()> {
        write_pretty_json(path, self)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/metadata/document.rs"]
mod tests;
