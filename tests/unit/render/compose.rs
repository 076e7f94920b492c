use std::path::PathBuf;

use image::Rgba;

use super::*;
use crate::catalog::{store::AssetRef, tag::CompatTag};

fn solid(w: u32, h: u32, px: [u8; 4]) -> RgbaImage {
    RgbaImage::from_pixel(w, h, Rgba(px))
}

fn write_png(dir: &Path, name: &str, img: &RgbaImage) -> AssetRef {
    let path = dir.join(name);
    img.save_with_format(&path, image::ImageFormat::Png).unwrap();
    AssetRef {
        id: name.to_string(),
        path,
    }
}

#[test]
fn opaque_top_layer_wins() {
    let bottom = solid(2, 2, [0, 0, 255, 255]);
    let top = solid(2, 2, [255, 0, 0, 255]);
    let out = CpuCompositor.compose(&[&bottom, &top], None).unwrap();
    assert_eq!(out.get_pixel(1, 1).0, [255, 0, 0, 255]);
}

#[test]
fn transparent_layers_leave_base_untouched() {
    let bottom = solid(3, 1, [10, 20, 30, 255]);
    let clear = solid(3, 1, [255, 255, 255, 0]);
    let out = CpuCompositor
        .compose(&[&bottom, &clear], Some(&clear))
        .unwrap();
    assert_eq!(out, bottom);
}

#[test]
fn overlay_goes_on_top_of_base_layers() {
    let bottom = solid(1, 1, [0, 0, 0, 255]);
    let band = solid(1, 1, [0, 255, 0, 255]);
    let tear = solid(1, 1, [0, 0, 255, 255]);
    let out = CpuCompositor.compose(&[&bottom, &band], Some(&tear)).unwrap();
    assert_eq!(out.get_pixel(0, 0).0, [0, 0, 255, 255]);
}

#[test]
fn size_mismatch_is_a_compose_error() {
    let a = solid(2, 2, [0, 0, 0, 255]);
    let b = solid(3, 2, [0, 0, 0, 255]);
    let err = CpuCompositor.compose(&[&a, &b], None).unwrap_err();
    assert!(matches!(err, MaskgenError::Compose(_)));
    assert!(CpuCompositor.compose(&[], None).is_err());
}

#[test]
fn resize_always_lands_on_square_target() {
    let out = resize_square(solid(7, 5, [1, 2, 3, 255]), 16);
    assert_eq!(out.dimensions(), (16, 16));

    let out = resize_square(solid(2, 3, [1, 2, 3, 255]), 3000);
    assert_eq!(out.dimensions(), (3000, 3000));

    let same = solid(4, 4, [9, 9, 9, 9]);
    assert_eq!(resize_square(same.clone(), 4), same);
}

#[test]
fn render_item_builds_three_variants() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path();
    let record = TraitRecord {
        tag: CompatTag::Red,
        background: write_png(dir, "bg_red_1.png", &solid(4, 4, [200, 0, 0, 255])),
        mask: write_png(dir, "mask_red_1.png", &solid(4, 4, [0, 0, 0, 0])),
        eyes: Some(write_png(dir, "eye_red_1.png", &solid(4, 4, [0, 0, 0, 0]))),
        band: write_png(dir, "band1.png", &solid(4, 4, [0, 0, 0, 0])),
        tear: write_png(dir, "tear1.png", &solid(4, 4, [0, 0, 255, 255])),
        blush: write_png(dir, "blush1.png", &solid(4, 4, [0, 255, 0, 255])),
    };

    let out = render_item(&CpuCompositor, &record, 8).unwrap();
    assert_eq!(out.base.dimensions(), (8, 8));
    assert_eq!(out.base.get_pixel(3, 3).0, [200, 0, 0, 255]);
    assert_eq!(out.tears.get_pixel(3, 3).0, [0, 0, 255, 255]);
    assert_eq!(out.blush.get_pixel(3, 3).0, [0, 255, 0, 255]);
}

#[test]
fn exempt_mask_never_loads_an_eye_raster() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path();
    let record = TraitRecord {
        tag: CompatTag::Red,
        background: write_png(dir, "bg_red_1.png", &solid(2, 2, [1, 1, 1, 255])),
        mask: write_png(dir, "mask4_red.png", &solid(2, 2, [0, 0, 0, 0])),
        eyes: None,
        band: write_png(dir, "band1.png", &solid(2, 2, [0, 0, 0, 0])),
        tear: write_png(dir, "tear1.png", &solid(2, 2, [0, 0, 0, 0])),
        blush: write_png(dir, "blush1.png", &solid(2, 2, [0, 0, 0, 0])),
    };
    assert_eq!(record.base_layers().len(), 3);
    let out = render_item(&CpuCompositor, &record, 2).unwrap();
    assert_eq!(out.base.get_pixel(0, 0).0, [1, 1, 1, 255]);
}

#[test]
fn unreadable_layer_propagates() {
    let err = load_layer(&PathBuf::from("no/such/layer.png")).unwrap_err();
    assert!(err.to_string().contains("decode layer"));
}
