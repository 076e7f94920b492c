use std::path::Path;

use anyhow::Context;
use image::RgbaImage;
use image::imageops::FilterType;

use crate::{
    foundation::error::{MaskgenError, MaskgenResult},
    render::blend::{over_in_place, premultiply_rgba8_in_place, unpremultiply_rgba8_in_place},
    select::record::TraitRecord,
};

/// Layer blender.
///
/// `compose` alpha-blends `base_layers` bottom to top, then `overlay` if given. All rasters are
/// straight-alpha RGBA8 and must share dimensions.
pub trait Compositor {
    /// Blend layers into a new raster.
    fn compose(
        &self,
        base_layers: &[&RgbaImage],
        overlay: Option<&RgbaImage>,
    ) -> MaskgenResult<RgbaImage>;
}

/// CPU compositor using premultiplied source-over.
#[derive(Clone, Copy, Debug, Default)]
pub struct CpuCompositor;

impl Compositor for CpuCompositor {
    fn compose(
        &self,
        base_layers: &[&RgbaImage],
        overlay: Option<&RgbaImage>,
    ) -> MaskgenResult<RgbaImage> {
        let Some((first, rest)) = base_layers.split_first() else {
            return Err(MaskgenError::compose("no base layers to compose"));
        };
        let (width, height) = first.dimensions();

        let mut acc = first.as_raw().clone();
        premultiply_rgba8_in_place(&mut acc);

        for layer in rest.iter().copied().chain(overlay) {
            if layer.dimensions() != (width, height) {
                let (w, h) = layer.dimensions();
                return Err(MaskgenError::compose(format!(
                    "layer is {w}x{h}, expected {width}x{height}"
                )));
            }
            let mut src = layer.as_raw().clone();
            premultiply_rgba8_in_place(&mut src);
            over_in_place(&mut acc, &src)?;
        }

        unpremultiply_rgba8_in_place(&mut acc);
        RgbaImage::from_raw(width, height, acc)
            .ok_or_else(|| MaskgenError::compose("composited buffer has wrong length"))
    }
}

/// The three persisted rasters of one item.
#[derive(Clone, Debug)]
pub struct ItemRasters {
    /// Background, mask, eyes and band.
    pub base: RgbaImage,
    /// Base plus tear overlay.
    pub tears: RgbaImage,
    /// Base plus blush overlay.
    pub blush: RgbaImage,
}

/// Decode a layer file as straight-alpha RGBA8.
pub fn load_layer(path: &Path) -> MaskgenResult<RgbaImage> {
    let img = image::open(path).with_context(|| format!("decode layer '{}'", path.display()))?;
    Ok(img.to_rgba8())
}

/// Scale to a `size` x `size` square, ignoring aspect ratio.
pub fn resize_square(img: RgbaImage, size: u32) -> RgbaImage {
    if img.dimensions() == (size, size) {
        return img;
    }
    image::imageops::resize(&img, size, size, FilterType::CatmullRom)
}

/// Load the record's layers and produce base, tears and blush rasters at `output_size`.
pub fn render_item(
    compositor: &dyn Compositor,
    record: &TraitRecord,
    output_size: u32,
) -> MaskgenResult<ItemRasters> {
    let layers = record
        .base_layers()
        .into_iter()
        .map(|a| load_layer(&a.path))
        .collect::<MaskgenResult<Vec<_>>>()?;
    let layer_refs: Vec<&RgbaImage> = layers.iter().collect();
    let tear = load_layer(&record.tear.path)?;
    let blush = load_layer(&record.blush.path)?;

    let base = compositor.compose(&layer_refs, None)?;
    let tears = compositor.compose(&[&base], Some(&tear))?;
    let blushed = compositor.compose(&[&base], Some(&blush))?;

    Ok(ItemRasters {
        base: resize_square(base, output_size),
        tears: resize_square(tears, output_size),
        blush: resize_square(blushed, output_size),
    })
}

/// Write `img` as PNG.
pub fn save_png(img: &RgbaImage, path: &Path) -> MaskgenResult<()> {
    img.save_with_format(path, image::ImageFormat::Png)
        .with_context(|| format!("write png '{}'", path.display()))
        .map_err(MaskgenError::from)
}

#[cfg(test)]
#[path = "../../tests/unit/render/compose.rs"]
mod tests;
