//! maskgen builds a collection of layered artwork from a folder of trait assets.
//!
//! Each item is drawn from six layer categories (background, mask, eyes, band, tear, blush),
//! subject to a fixed compatibility table, and is written as three PNG variants plus one JSON
//! metadata document.
//!
//! # Pipeline overview
//!
//! 1. **Select**: [`TraitSelector`] picks a background tag, then compatible assets for every
//!    category, producing a [`TraitRecord`].
//! 2. **Guard**: [`DuplicateGuard`] rejects records whose `(background, mask, eyes, band)`
//!    combination was produced before; the item is redrawn from scratch a bounded number of times.
//! 3. **Composite**: a [`Compositor`] blends the layers bottom to top and the result is scaled
//!    to a square output size.
//! 4. **Persist**: [`CollectionDriver`] writes `item_<id>.png`, `item_<id>_tears.png`,
//!    `item_<id>_blush.png` and `item_<id>.json`.
//!
//! [`rewrite_image_urls`] later swaps the placeholder prefix of every `image` field for the final
//! URI prefix.
//!
//! Runs are strictly sequential. All mutable run state (random source, duplicate log) lives in a
//! [`GenerationContext`]; seeding it makes a run reproducible.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod catalog;
mod collection;
mod foundation;
mod guard;
mod metadata;
mod render;
mod select;

pub use catalog::store::{AssetCatalog, AssetRef};
pub use catalog::tag::{CompatTag, LayerCategory};
pub use collection::context::GenerationContext;
pub use collection::driver::{CollectionDriver, GeneratedItem, ItemFailure, RunSummary};
pub use foundation::config::{
    DEFAULT_COLLECTION_SIZE, DEFAULT_IMAGE_BASE_URI, DEFAULT_IMAGE_PLACEHOLDER,
    DEFAULT_MAX_ATTEMPTS_PER_ITEM, DEFAULT_OUTPUT_SIZE, GeneratorConfig,
};
pub use foundation::error::{MaskgenError, MaskgenResult};
pub use foundation::json::{ensure_dir, to_pretty_json, write_pretty_json};
pub use guard::duplicate::DuplicateGuard;
pub use guard::log::{CombinationKey, DuplicateLog};
pub use metadata::document::{Attribute, MetadataDocument, item_stem};
pub use metadata::rewrite::{RewriteSummary, is_item_document, rewrite_image_urls};
pub use render::blend::{PremulRgba8, over, over_in_place};
pub use render::compose::{
    Compositor, CpuCompositor, ItemRasters, load_layer, render_item, resize_square, save_png,
};
pub use select::record::{NO_EYES, TraitRecord};
pub use select::resolver::{
    CompatibilityResolver, EXEMPT_MASK_MARKER, EyeRule, MaskFamily, UNIVERSAL_EYE_FOLDER,
    UNIVERSAL_EYE_MARKER,
};
pub use select::selector::TraitSelector;
