use std::collections::HashSet;
use std::path::Path;

use image::{Rgba, RgbaImage};

use super::*;
use crate::guard::log::{CombinationKey, DuplicateLog};

fn png(root: &Path, rel: &str, px: [u8; 4]) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    RgbaImage::from_pixel(2, 2, Rgba(px))
        .save_with_format(&path, image::ImageFormat::Png)
        .unwrap();
}

fn config(tmp: &Path) -> GeneratorConfig {
    GeneratorConfig {
        layers_dir: tmp.join("layers"),
        output_dir: tmp.join("out"),
        metadata_dir: tmp.join("meta"),
        collection_size: 3,
        output_size: 4,
        max_attempts_per_item: 50,
        seed: Some(17),
        ..GeneratorConfig::default()
    }
}

fn rich_tree(root: &Path) {
    let l = root.join("layers");
    for n in 1..=3 {
        png(&l, &format!("backgrounds/bg_red_{n}.png"), [200, 0, 0, 255]);
        png(&l, &format!("backgrounds/bg_white_{n}.png"), [250, 250, 250, 255]);
    }
    png(&l, "masks/mask_red.png", [0, 0, 0, 0]);
    png(&l, "masks/mask4_red.png", [0, 0, 0, 0]);
    png(&l, "masks/mask_white.png", [0, 0, 0, 0]);
    png(&l, "eyes/mask_red/eye_red_1.png", [0, 0, 0, 0]);
    png(&l, "eyes/mask_white/eye_white_1.png", [0, 0, 0, 0]);
    png(&l, "eyes/mask/mask_eyes_1.png", [0, 0, 0, 0]);
    png(&l, "bands/styleA/band1.png", [0, 0, 0, 0]);
    png(&l, "bands/styleB/band2.png", [0, 0, 0, 0]);
    png(&l, "tears/tear1.png", [0, 0, 255, 255]);
    png(&l, "blush/blush1.png", [0, 255, 0, 255]);
}

fn single_combination_tree(root: &Path) {
    let l = root.join("layers");
    png(&l, "backgrounds/bg_red_1.png", [200, 0, 0, 255]);
    png(&l, "masks/mask_red_1.png", [0, 0, 0, 0]);
    png(&l, "eyes/mask_red/eye_red_1.png", [0, 0, 0, 0]);
    png(&l, "bands/styleA/band1.png", [0, 0, 0, 0]);
    png(&l, "tears/tear1.png", [0, 0, 0, 0]);
    png(&l, "blush/blush1.png", [0, 0, 0, 0]);
}

#[test]
fn run_writes_all_artifacts_with_distinct_keys() {
    let tmp = tempfile::tempdir().unwrap();
    rich_tree(tmp.path());
    let cfg = config(tmp.path());
    let mut driver = CollectionDriver::new(cfg.clone()).unwrap();

    let summary = driver.run(3).unwrap();
    assert_eq!(summary.generated, vec![1, 2, 3]);
    assert!(summary.failed.is_empty());

    for id in 1..=3 {
        let dir = cfg.output_dir.join(format!("item_{id}"));
        for suffix in ["", "_tears", "_blush"] {
            let path = dir.join(format!("item_{id}{suffix}.png"));
            let img = image::open(&path).unwrap();
            assert_eq!((img.width(), img.height()), (4, 4));
        }
        assert!(cfg.metadata_dir.join(format!("item_{id}.json")).is_file());
    }

    let log = DuplicateLog::load(&cfg.attribute_log_path()).unwrap();
    assert_eq!(log.len(), 3);
    let unique: HashSet<&CombinationKey> = log.entries().iter().collect();
    assert_eq!(unique.len(), 3);
}

#[test]
fn same_seed_reproduces_metadata() {
    let a = tempfile::tempdir().unwrap();
    let b = tempfile::tempdir().unwrap();
    rich_tree(a.path());
    rich_tree(b.path());

    CollectionDriver::new(config(a.path())).unwrap().run(3).unwrap();
    CollectionDriver::new(config(b.path())).unwrap().run(3).unwrap();

    for id in 1..=3 {
        let name = format!("item_{id}.json");
        assert_eq!(
            std::fs::read(a.path().join("meta").join(&name)).unwrap(),
            std::fs::read(b.path().join("meta").join(&name)).unwrap()
        );
    }
}

#[test]
fn exhausted_item_is_reported_and_run_continues() {
    let tmp = tempfile::tempdir().unwrap();
    single_combination_tree(tmp.path());
    let cfg = GeneratorConfig {
        max_attempts_per_item: 4,
        ..config(tmp.path())
    };
    let mut driver = CollectionDriver::new(cfg.clone()).unwrap();

    let summary = driver.run(3).unwrap();
    assert_eq!(summary.generated, vec![1]);
    let failed: Vec<u32> = summary.failed.iter().map(|f| f.id).collect();
    assert_eq!(failed, vec![2, 3]);
    assert_eq!(summary.duplicate_retries, 8);
    assert!(!cfg.output_dir.join("item_2").exists());
    assert_eq!(driver.context().guard().log().len(), 1);
}

#[test]
fn prior_log_entry_forces_regeneration() {
    let tmp = tempfile::tempdir().unwrap();
    single_combination_tree(tmp.path());
    let cfg = GeneratorConfig {
        max_attempts_per_item: 5,
        ..config(tmp.path())
    };
    std::fs::create_dir_all(&cfg.metadata_dir).unwrap();
    DuplicateLog::from_keys([CombinationKey::new(
        "bg_red_1.png",
        "mask_red_1.png",
        "eye_red_1.png",
        "styleA/band1.png",
    )])
    .save(&cfg.attribute_log_path())
    .unwrap();

    let mut driver = CollectionDriver::new(cfg).unwrap();
    let err = driver.generate_item(1).unwrap_err();
    assert!(matches!(
        err,
        MaskgenError::RetriesExhausted {
            item_id: 1,
            attempts: 5
        }
    ));
}

fn two_band_tree(root: &Path) {
    single_combination_tree(root);
    png(&root.join("layers"), "bands/styleA/band2.png", [0, 0, 0, 0]);
}

#[test]
fn rejected_item_is_redrawn_until_a_new_combination() {
    let tmp = tempfile::tempdir().unwrap();
    two_band_tree(tmp.path());
    let taken = CombinationKey::new(
        "bg_red_1.png",
        "mask_red_1.png",
        "eye_red_1.png",
        "styleA/band1.png",
    );

    // Half of all first draws hit the logged key; over 32 seeds some must.
    let mut collided = 0;
    for seed in 0..32 {
        let cfg = GeneratorConfig {
            seed: Some(seed),
            ..config(tmp.path())
        };
        DuplicateLog::from_keys([taken.clone()])
            .save(&cfg.attribute_log_path())
            .unwrap();

        let mut driver = CollectionDriver::new(cfg).unwrap();
        let item = driver.generate_item(1).unwrap();
        let key = item.record.combination_key();
        assert_ne!(key, taken, "seed {seed}");
        assert_eq!(key.band(), "styleA/band2.png");
        if item.duplicate_retries >= 1 {
            collided += 1;
        }

        let log = driver.context().guard().log();
        assert_eq!(log.entries(), &[taken.clone(), key][..]);
    }
    assert!(collided > 0);
}

#[test]
fn config_errors_abort_the_run() {
    let tmp = tempfile::tempdir().unwrap();
    single_combination_tree(tmp.path());
    std::fs::remove_dir_all(tmp.path().join("layers").join("blush")).unwrap();

    let mut driver = CollectionDriver::new(config(tmp.path())).unwrap();
    let err = driver.run(2).unwrap_err();
    assert!(err.is_config());
}

#[test]
fn corrupt_log_refuses_to_start() {
    let tmp = tempfile::tempdir().unwrap();
    single_combination_tree(tmp.path());
    let cfg = config(tmp.path());
    std::fs::create_dir_all(&cfg.metadata_dir).unwrap();
    std::fs::write(cfg.attribute_log_path(), b"not json").unwrap();

    let err = CollectionDriver::new(cfg).unwrap_err();
    assert!(matches!(err, MaskgenError::CorruptLog { .. }));
}
