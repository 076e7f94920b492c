use std::path::PathBuf;

use crate::{
    catalog::store::AssetCatalog,
    collection::context::GenerationContext,
    foundation::{
        config::GeneratorConfig,
        error::{MaskgenError, MaskgenResult},
        json::ensure_dir,
    },
    guard::duplicate::DuplicateGuard,
    metadata::document::{MetadataDocument, item_stem},
    render::compose::{Compositor, CpuCompositor, render_item, save_png},
    select::{record::TraitRecord, selector::TraitSelector},
};

/// Files written for one item.
#[derive(Clone, Debug)]
pub struct GeneratedItem {
    /// Sequential item id.
    pub id: u32,
    /// Accepted trait picks.
    pub record: TraitRecord,
    /// Rejected attempts before acceptance.
    pub duplicate_retries: u32,
    /// Base, tears and blush PNGs.
    pub images: [PathBuf; 3],
    /// Metadata document.
    pub metadata: PathBuf,
}

/// Item that could not be produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ItemFailure {
    /// Item id.
    pub id: u32,
    /// Human-readable cause.
    pub reason: String,
}

/// Outcome of [`CollectionDriver::run`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Ids written, in order.
    pub generated: Vec<u32>,
    /// Ids given up on after exhausting their attempts.
    pub failed: Vec<ItemFailure>,
    /// Duplicate rejections across the whole run.
    pub duplicate_retries: u32,
}

/// Sequential generator of a whole collection.
pub struct CollectionDriver {
    cfg: GeneratorConfig,
    catalog: AssetCatalog,
    compositor: Box<dyn Compositor>,
    ctx: GenerationContext,
}

impl std::fmt::Debug for CollectionDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectionDriver")
            .field("cfg", &self.cfg)
            .field("catalog", &self.catalog)
            .field("ctx", &self.ctx)
            .finish()
    }
}

impl CollectionDriver {
    /// Driver for `cfg`: opens the layer tree and loads the duplicate log.
    pub fn new(cfg: GeneratorConfig) -> MaskgenResult<Self> {
        cfg.validate()?;
        let catalog = AssetCatalog::open(&cfg.layers_dir)?;
        let guard = DuplicateGuard::open(cfg.attribute_log_path())?;
        let ctx = GenerationContext::new(cfg.seed, guard);
        Ok(Self::with_parts(cfg, catalog, Box::new(CpuCompositor), ctx))
    }

    /// Driver from explicit parts.
    pub fn with_parts(
        cfg: GeneratorConfig,
        catalog: AssetCatalog,
        compositor: Box<dyn Compositor>,
        ctx: GenerationContext,
    ) -> Self {
        Self {
            cfg,
            catalog,
            compositor,
            ctx,
        }
    }

    /// Configuration in use.
    pub fn config(&self) -> &GeneratorConfig {
        &self.cfg
    }

    /// Run state.
    pub fn context(&self) -> &GenerationContext {
        &self.ctx
    }

    /// Generate items `1..=count` in order.
    ///
    /// Items that keep colliding with the duplicate log are reported in the summary and the run
    /// moves on. Any other error aborts the run.
    #[tracing::instrument(skip(self))]
    pub fn run(&mut self, count: u32) -> MaskgenResult<RunSummary> {
        ensure_dir(&self.cfg.output_dir)?;
        ensure_dir(&self.cfg.metadata_dir)?;

        let mut summary = RunSummary::default();
        for id in 1..=count {
            match self.generate_item(id) {
                Ok(item) => {
                    summary.duplicate_retries += item.duplicate_retries;
                    summary.generated.push(id);
                }
                Err(e @ MaskgenError::RetriesExhausted { attempts, .. }) => {
                    summary.duplicate_retries += attempts;
                    tracing::warn!(item = id, error = %e, "item skipped");
                    summary.failed.push(ItemFailure {
                        id,
                        reason: e.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }
        }

        tracing::info!(
            generated = summary.generated.len(),
            failed = summary.failed.len(),
            duplicate_retries = summary.duplicate_retries,
            "collection run finished"
        );
        Ok(summary)
    }

    /// Select, guard, composite and persist item `id`.
    pub fn generate_item(&mut self, id: u32) -> MaskgenResult<GeneratedItem> {
        let (record, duplicate_retries) = self.select_unique(id)?;

        let rasters = render_item(self.compositor.as_ref(), &record, self.cfg.output_size)?;

        let stem = item_stem(id);
        let item_dir = self.cfg.output_dir.join(&stem);
        ensure_dir(&item_dir)?;
        let images = [
            item_dir.join(format!("{stem}.png")),
            item_dir.join(format!("{stem}_tears.png")),
            item_dir.join(format!("{stem}_blush.png")),
        ];
        save_png(&rasters.base, &images[0])?;
        save_png(&rasters.tears, &images[1])?;
        save_png(&rasters.blush, &images[2])?;
        tracing::info!(item = id, path = %item_dir.display(), "images saved");

        let metadata = MetadataDocument::path_for(&self.cfg.metadata_dir, id);
        MetadataDocument::for_item(id, &record, &self.cfg).write(&metadata)?;
        tracing::info!(item = id, path = %metadata.display(), "metadata saved");

        Ok(GeneratedItem {
            id,
            record,
            duplicate_retries,
            images,
            metadata,
        })
    }

    // Every attempt redraws all categories, not just the colliding one.
    fn select_unique(&mut self, id: u32) -> MaskgenResult<(TraitRecord, u32)> {
        let selector = TraitSelector::new(&self.catalog);
        let max = self.cfg.max_attempts_per_item;
        for attempt in 1..=max {
            let (rng, guard) = self.ctx.split();
            let record = selector.select(id, rng)?;
            if guard.accept_or_reject(&record)? {
                return Ok((record, attempt - 1));
            }
            tracing::warn!(item = id, attempt, "duplicate combination, regenerating");
        }
        Err(MaskgenError::RetriesExhausted {
            item_id: id,
            attempts: max,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/collection/driver.rs"]
mod tests;
