use crate::{
    catalog::{
        store::AssetRef,
        tag::{CompatTag, LayerCategory},
    },
    guard::log::CombinationKey,
};

/// Eyes value recorded when the mask is drawn without an eyes layer.
pub const NO_EYES: &str = "None";

/// One complete set of picks for an item.
///
/// Built by [`crate::TraitSelector::select`]; never mutated afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TraitRecord {
    /// Background tag that drove the compatible picks.
    pub tag: CompatTag,
    /// Background asset.
    pub background: AssetRef,
    /// Mask asset.
    pub mask: AssetRef,
    /// Eye asset; `None` for the exempt mask variant.
    pub eyes: Option<AssetRef>,
    /// Band asset (`"<style>/<file>"`).
    pub band: AssetRef,
    /// Tear overlay.
    pub tear: AssetRef,
    /// Blush overlay.
    pub blush: AssetRef,
}

impl TraitRecord {
    /// Recorded Eyes value: the eye file name, or [`NO_EYES`].
    pub fn eyes_value(&self) -> &str {
        self.eyes.as_ref().map_or(NO_EYES, |e| e.id.as_str())
    }

    /// Recorded value for `category`.
    pub fn value(&self, category: LayerCategory) -> &str {
        match category {
            LayerCategory::Background => &self.background.id,
            LayerCategory::Mask => &self.mask.id,
            LayerCategory::Eyes => self.eyes_value(),
            LayerCategory::Band => &self.band.id,
            LayerCategory::Tear => &self.tear.id,
            LayerCategory::Blush => &self.blush.id,
        }
    }

    /// `(trait name, value)` pairs in attribute order.
    pub fn traits(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        LayerCategory::ALL
            .into_iter()
            .map(move |c| (c.trait_name(), self.value(c)))
    }

    /// Uniqueness key: background, mask, eyes and band. Tear and blush are excluded.
    pub fn combination_key(&self) -> CombinationKey {
        CombinationKey::new(
            &self.background.id,
            &self.mask.id,
            self.eyes_value(),
            &self.band.id,
        )
    }

    /// Base layers, bottom to top. The eyes layer is skipped for the exempt mask.
    pub fn base_layers(&self) -> Vec<&AssetRef> {
        let mut layers = vec![&self.background, &self.mask];
        if let Some(eyes) = &self.eyes {
            layers.push(eyes);
        }
        layers.push(&self.band);
        layers
    }
}
