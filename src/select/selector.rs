use rand::Rng;
use rand::seq::SliceRandom;

use crate::{
    catalog::{
        store::{AssetCatalog, AssetRef, choose, nested_label},
        tag::{CompatTag, LayerCategory},
    },
    foundation::error::{MaskgenError, MaskgenResult},
    select::{
        record::TraitRecord,
        resolver::{CompatibilityResolver, EyeRule, UNIVERSAL_EYE_MARKER},
    },
};

/// Random trait picker honouring the compatibility table.
///
/// Selection reads the layer tree and consumes entropy from the caller's generator; it never
/// touches persisted state.
#[derive(Clone, Copy, Debug)]
pub struct TraitSelector<'a> {
    catalog: &'a AssetCatalog,
    resolver: CompatibilityResolver,
}

impl<'a> TraitSelector<'a> {
    /// Selector over `catalog` using the built-in compatibility table.
    pub fn new(catalog: &'a AssetCatalog) -> Self {
        Self {
            catalog,
            resolver: CompatibilityResolver,
        }
    }

    /// Draw a full trait record for `item_id`.
    ///
    /// 1. tag, then a background carrying it
    /// 2. a mask carrying the same tag
    /// 3. eyes per [`CompatibilityResolver::resolve_eyes`]
    /// 4. a band (style folder, then file)
    /// 5. tear and blush, unconstrained
    #[tracing::instrument(level = "debug", skip(self, rng))]
    pub fn select<R: Rng + ?Sized>(&self, item_id: u32, rng: &mut R) -> MaskgenResult<TraitRecord> {
        let (tag, background) = self.pick_background(rng)?;
        let mask = self
            .catalog
            .pick_tagged(LayerCategory::Mask, tag, rng)?;

        let rule = self.resolver.resolve_eyes(tag, &mask.id);
        let eyes = self.pick_eyes(&rule, rng)?;

        let band = self.catalog.pick_nested(LayerCategory::Band, rng)?;
        let tear = self.catalog.pick_random(LayerCategory::Tear, rng)?;
        let blush = self.catalog.pick_random(LayerCategory::Blush, rng)?;

        Ok(TraitRecord {
            tag,
            background,
            mask,
            eyes,
            band,
            tear,
            blush,
        })
    }

    // Tags without a single background on disk are not offered, so a tree holding only red
    // backgrounds always yields red.
    fn pick_background<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> MaskgenResult<(CompatTag, AssetRef)> {
        let backgrounds = self.catalog.list(LayerCategory::Background)?;
        let tags: Vec<CompatTag> = CompatTag::ALL
            .into_iter()
            .filter(|t| backgrounds.iter().any(|b| t.matches(b)))
            .collect();
        let tag = *tags.choose(rng).ok_or_else(|| {
            MaskgenError::empty_category(LayerCategory::Background.dir_name(), Some("any tag"))
        })?;

        let tagged: Vec<String> = backgrounds.into_iter().filter(|b| tag.matches(b)).collect();
        let name = choose(
            &tagged,
            rng,
            LayerCategory::Background.dir_name(),
            Some(tag.token()),
        )?;
        Ok((tag, self.catalog.asset(LayerCategory::Background, name)))
    }

    fn pick_eyes<R: Rng + ?Sized>(
        &self,
        rule: &EyeRule,
        rng: &mut R,
    ) -> MaskgenResult<Option<AssetRef>> {
        let EyeRule::Folders { folders, tag } = rule else {
            return Ok(None);
        };

        let present = self.catalog.list(LayerCategory::Eyes)?;
        let candidates: Vec<String> = folders
            .iter()
            .filter(|f| present.iter().any(|p| p == *f))
            .map(|f| f.to_string())
            .collect();
        let folder = choose(
            &candidates,
            rng,
            LayerCategory::Eyes.dir_name(),
            Some(folders.join(" | ").as_str()),
        )?;

        let mut files = self.catalog.list_in(LayerCategory::Eyes, folder)?;
        files.retain(|f| rule.file_eligible(f));
        let filter = format!("{} | {UNIVERSAL_EYE_MARKER}", tag.token());
        let file = choose(
            &files,
            rng,
            &nested_label(LayerCategory::Eyes, folder),
            Some(filter.as_str()),
        )?;

        Ok(Some(AssetRef {
            id: file.clone(),
            path: self
                .catalog
                .category_dir(LayerCategory::Eyes)
                .join(folder)
                .join(file),
        }))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/select/selector.rs"]
mod tests;
