use std::fmt;

/// Colour family shared by backgrounds, masks and eye sets.
///
/// Asset file names carry the tag as a substring (`bg_red_1.png`, `mask_red.png`), which is how
/// the catalog filters candidates for a given tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CompatTag {
    /// `gray`
    Gray,
    /// `purp`
    Purp,
    /// `red`
    Red,
    /// `white`
    White,
}

impl CompatTag {
    /// Every background tag, in table order.
    pub const ALL: [Self; 4] = [Self::Gray, Self::Purp, Self::Red, Self::White];

    /// File-name token for this tag.
    pub fn token(self) -> &'static str {
        match self {
            Self::Gray => "gray",
            Self::Purp => "purp",
            Self::Red => "red",
            Self::White => "white",
        }
    }

    /// Whether `name` carries this tag.
    pub fn matches(self, name: &str) -> bool {
        name.contains(self.token())
    }
}

impl fmt::Display for CompatTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Layer categories in bottom-to-top compositing order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LayerCategory {
    /// Full-bleed backdrop.
    Background,
    /// Mask body.
    Mask,
    /// Eye set, nested by eye folder.
    Eyes,
    /// Head band, nested by sub-style.
    Band,
    /// Tear overlay for the `_tears` variant.
    Tear,
    /// Blush overlay for the `_blush` variant.
    Blush,
}

impl LayerCategory {
    /// All categories, in metadata attribute order.
    pub const ALL: [Self; 6] = [
        Self::Background,
        Self::Mask,
        Self::Eyes,
        Self::Band,
        Self::Tear,
        Self::Blush,
    ];

    /// Directory name under the layers root.
    pub fn dir_name(self) -> &'static str {
        match self {
            Self::Background => "backgrounds",
            Self::Mask => "masks",
            Self::Eyes => "eyes",
            Self::Band => "bands",
            Self::Tear => "tears",
            Self::Blush => "blush",
        }
    }

    /// `trait_type` value used in metadata documents.
    pub fn trait_name(self) -> &'static str {
        match self {
            Self::Background => "Background",
            Self::Mask => "Mask",
            Self::Eyes => "Eyes",
            Self::Band => "Band",
            Self::Tear => "Tear",
            Self::Blush => "Blush",
        }
    }

    /// Nested categories hold one level of sub-folders, then the asset files.
    pub fn is_nested(self) -> bool {
        matches!(self, Self::Eyes | Self::Band)
    }
}
