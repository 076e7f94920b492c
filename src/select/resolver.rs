use crate::catalog::tag::CompatTag;

/// Masks whose identifier contains this marker are drawn without an eyes layer.
pub const EXEMPT_MASK_MARKER: &str = "mask4";
/// Eye folder eligible under every background.
pub const UNIVERSAL_EYE_FOLDER: &str = "mask";
/// Eye files carrying this marker are eligible regardless of background tag.
pub const UNIVERSAL_EYE_MARKER: &str = "mask_";

/// Canonical mask family derived from a background tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MaskFamily {
    /// `mask_gray`
    Gray,
    /// `mask_purple`
    Purple,
    /// `mask_red`
    Red,
    /// `mask_white`
    White,
}

impl MaskFamily {
    /// Family token as it appears in asset names.
    pub fn token(self) -> &'static str {
        match self {
            Self::Gray => "mask_gray",
            Self::Purple => "mask_purple",
            Self::Red => "mask_red",
            Self::White => "mask_white",
        }
    }

    /// Eye folders compatible with this family. The universal folder is always last.
    pub fn eye_folders(self) -> &'static [&'static str] {
        match self {
            // Gray masks reuse the white eye set.
            Self::Gray | Self::White => &["mask_white", UNIVERSAL_EYE_FOLDER],
            Self::Purple => &["mask_purp", UNIVERSAL_EYE_FOLDER],
            Self::Red => &["mask_red", UNIVERSAL_EYE_FOLDER],
        }
    }
}

/// Outcome of eye resolution for a chosen mask.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EyeRule {
    /// Pick a folder uniformly from these, then a file matching [`EyeRule::file_eligible`].
    Folders {
        /// Candidate eye folders, in table order.
        folders: &'static [&'static str],
        /// Background tag the eye file must carry (unless universal).
        tag: CompatTag,
    },
    /// The mask is the exempt variant: no eyes layer at all.
    NoEyes,
}

impl EyeRule {
    /// Whether an eye file may be drawn under this rule.
    pub fn file_eligible(&self, name: &str) -> bool {
        match self {
            Self::Folders { tag, .. } => tag.matches(name) || name.contains(UNIVERSAL_EYE_MARKER),
            Self::NoEyes => false,
        }
    }
}

/// Static pairing table between backgrounds, masks and eyes.
#[derive(Clone, Copy, Debug, Default)]
pub struct CompatibilityResolver;

impl CompatibilityResolver {
    /// Mask family paired with a background tag.
    pub fn mask_family(&self, tag: CompatTag) -> MaskFamily {
        match tag {
            CompatTag::Gray => MaskFamily::Gray,
            CompatTag::Purp => MaskFamily::Purple,
            CompatTag::Red => MaskFamily::Red,
            CompatTag::White => MaskFamily::White,
        }
    }

    /// Whether `mask_id` names the exempt variant.
    pub fn is_exempt_mask(&self, mask_id: &str) -> bool {
        mask_id.contains(EXEMPT_MASK_MARKER)
    }

    /// Eye rule for a mask chosen under background tag `tag`.
    pub fn resolve_eyes(&self, tag: CompatTag, mask_id: &str) -> EyeRule {
        if self.is_exempt_mask(mask_id) {
            return EyeRule::NoEyes;
        }
        EyeRule::Folders {
            folders: self.mask_family(tag).eye_folders(),
            tag,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/select/resolver.rs"]
mod tests;
