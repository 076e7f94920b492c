use std::path::{Path, PathBuf};

use anyhow::Context;
use rand::Rng;
use rand::seq::SliceRandom;

use crate::{
    catalog::tag::{CompatTag, LayerCategory},
    foundation::error::{MaskgenError, MaskgenResult},
};

/// Directory entries that operating systems drop next to user files.
const PLATFORM_NOISE: &[&str] = &["Thumbs.db", "desktop.ini"];

/// A selectable layer asset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetRef {
    /// Identifier recorded in metadata: a file name, or `"<folder>/<file>"` for nested categories.
    pub id: String,
    /// Location on disk.
    pub path: PathBuf,
}

/// Read-only view over the layer tree.
#[derive(Clone, Debug)]
pub struct AssetCatalog {
    root: PathBuf,
}

impl AssetCatalog {
    /// Open the layer tree rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> MaskgenResult<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(MaskgenError::MissingCategory { path: root });
        }
        Ok(Self { root })
    }

    /// Root of the layer tree.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory backing `category`.
    pub fn category_dir(&self, category: LayerCategory) -> PathBuf {
        self.root.join(category.dir_name())
    }

    /// Entries of `category`: asset files for flat categories, sub-folders for nested ones.
    pub fn list(&self, category: LayerCategory) -> MaskgenResult<Vec<String>> {
        read_entries(&self.category_dir(category), category.is_nested())
    }

    /// Entries of `category` whose name contains `token`.
    pub fn list_filtered(&self, category: LayerCategory, token: &str) -> MaskgenResult<Vec<String>> {
        let mut names = self.list(category)?;
        names.retain(|n| n.contains(token));
        Ok(names)
    }

    /// Entries of `category` carrying `tag`.
    pub fn list_tagged(&self, category: LayerCategory, tag: CompatTag) -> MaskgenResult<Vec<String>> {
        self.list_filtered(category, tag.token())
    }

    /// Asset files inside the sub-folder `folder` of a nested category.
    pub fn list_in(&self, category: LayerCategory, folder: &str) -> MaskgenResult<Vec<String>> {
        read_entries(&self.category_dir(category).join(folder), false)
    }

    /// Uniform pick over every asset file of a flat category.
    pub fn pick_random<R: Rng + ?Sized>(
        &self,
        category: LayerCategory,
        rng: &mut R,
    ) -> MaskgenResult<AssetRef> {
        let names = self.list(category)?;
        let name = choose(&names, rng, category.dir_name(), None)?;
        Ok(self.asset(category, name))
    }

    /// Uniform pick over the files of a flat category carrying `tag`.
    pub fn pick_tagged<R: Rng + ?Sized>(
        &self,
        category: LayerCategory,
        tag: CompatTag,
        rng: &mut R,
    ) -> MaskgenResult<AssetRef> {
        let names = self.list_tagged(category, tag)?;
        let name = choose(&names, rng, category.dir_name(), Some(tag.token()))?;
        Ok(self.asset(category, name))
    }

    /// Two-level pick for nested categories: a sub-folder first, then a file within it.
    pub fn pick_nested<R: Rng + ?Sized>(
        &self,
        category: LayerCategory,
        rng: &mut R,
    ) -> MaskgenResult<AssetRef> {
        let folders = self.list(category)?;
        let folder = choose(&folders, rng, category.dir_name(), None)?;
        let files = self.list_in(category, folder)?;
        let file = choose(&files, rng, &nested_label(category, folder), None)?;
        Ok(self.nested_asset(category, folder, file))
    }

    /// Reference to the flat asset `name` of `category`.
    pub fn asset(&self, category: LayerCategory, name: &str) -> AssetRef {
        AssetRef {
            id: name.to_string(),
            path: self.category_dir(category).join(name),
        }
    }

    /// Reference to `folder/file` of a nested category.
    pub fn nested_asset(&self, category: LayerCategory, folder: &str, file: &str) -> AssetRef {
        AssetRef {
            id: format!("{folder}/{file}"),
            path: self.category_dir(category).join(folder).join(file),
        }
    }
}

/// Uniform choice that reports an empty candidate list as a configuration error.
pub(crate) fn choose<'a, R: Rng + ?Sized>(
    names: &'a [String],
    rng: &mut R,
    category: &str,
    filter: Option<&str>,
) -> MaskgenResult<&'a String> {
    names
        .choose(rng)
        .ok_or_else(|| MaskgenError::empty_category(category, filter))
}

pub(crate) fn nested_label(category: LayerCategory, folder: &str) -> String {
    format!("{}/{folder}", category.dir_name())
}

fn is_platform_noise(name: &str) -> bool {
    name.starts_with('.') || PLATFORM_NOISE.contains(&name)
}

fn read_entries(dir: &Path, want_dirs: bool) -> MaskgenResult<Vec<String>> {
    if !dir.is_dir() {
        return Err(MaskgenError::MissingCategory {
            path: dir.to_path_buf(),
        });
    }

    let rd = std::fs::read_dir(dir).with_context(|| format!("list '{}'", dir.display()))?;
    let mut out = Vec::new();
    for entry in rd {
        let entry = entry.with_context(|| format!("read entry of '{}'", dir.display()))?;
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        if is_platform_noise(&name) {
            continue;
        }
        let is_dir = entry.path().is_dir();
        if is_dir == want_dirs {
            out.push(name);
        }
    }
    out.sort();
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/catalog/store.rs"]
mod tests;
