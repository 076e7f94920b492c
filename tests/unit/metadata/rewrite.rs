use super::*;

const NEW: &str = "ipfs://cid";

fn write(dir: &Path, name: &str, body: &str) {
    std::fs::write(dir.join(name), body).unwrap();
}

#[test]
fn naming_filter() {
    assert!(is_item_document("item_1.json"));
    assert!(!is_item_document("attributes.json"));
    assert!(!is_item_document("item_1.png"));
}

#[test]
fn rewrites_image_and_preserves_key_order() {
    let tmp = tempfile::tempdir().unwrap();
    write(
        tmp.path(),
        "item_1.json",
        r#"{"name": "Masked #1", "description": "d", "image": "blank/item_1.png", "attributes": []}"#,
    );

    let s = rewrite_image_urls(tmp.path(), "blank", NEW).unwrap();
    assert_eq!(
        s,
        RewriteSummary {
            files_scanned: 1,
            files_changed: 1,
            substitutions: 1
        }
    );

    let v: serde_json::Value =
        serde_json::from_slice(&std::fs::read(tmp.path().join("item_1.json")).unwrap()).unwrap();
    assert_eq!(v["image"], "ipfs://cid/item_1.png");
    let keys: Vec<&str> = v.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["name", "description", "image", "attributes"]);
}

#[test]
fn second_pass_is_a_noop() {
    let tmp = tempfile::tempdir().unwrap();
    write(tmp.path(), "item_1.json", r#"{"image": "blank/item_1.png"}"#);
    write(tmp.path(), "item_2.json", r#"{"image": "blank/item_2.png"}"#);

    let first = rewrite_image_urls(tmp.path(), "blank", NEW).unwrap();
    assert_eq!(first.substitutions, 2);
    let after_first = std::fs::read(tmp.path().join("item_2.json")).unwrap();

    let second = rewrite_image_urls(tmp.path(), "blank", NEW).unwrap();
    assert_eq!(second.files_scanned, 2);
    assert_eq!(second.files_changed, 0);
    assert_eq!(second.substitutions, 0);
    assert_eq!(std::fs::read(tmp.path().join("item_2.json")).unwrap(), after_first);
}

#[test]
fn prefix_containing_placeholder_is_refused() {
    let tmp = tempfile::tempdir().unwrap();
    let body = r#"{"image": "blank/item_1.png"}"#;
    write(tmp.path(), "item_1.json", body);

    let err =
        rewrite_image_urls(tmp.path(), "blank", "https://blank.mypinata.cloud/ipfs/cid").unwrap_err();
    assert!(err.is_config());
    assert_eq!(
        std::fs::read_to_string(tmp.path().join("item_1.json")).unwrap(),
        body
    );
}

#[test]
fn other_files_and_fields_are_untouched() {
    let tmp = tempfile::tempdir().unwrap();
    let log = r#"[["blank", "b", "c", "d"]]"#;
    write(tmp.path(), "attributes.json", log);
    write(tmp.path(), "item_5.json", r#"{"name": "blank", "description": "x"}"#);

    let s = rewrite_image_urls(tmp.path(), "blank", NEW).unwrap();
    assert_eq!(s.files_scanned, 1);
    assert_eq!(s.files_changed, 0);
    assert_eq!(
        std::fs::read_to_string(tmp.path().join("attributes.json")).unwrap(),
        log
    );
}

#[test]
fn missing_directory_is_created() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().join("output_metadata");
    let s = rewrite_image_urls(&dir, "blank", NEW).unwrap();
    assert_eq!(s, RewriteSummary::default());
    assert!(dir.is_dir());
}

#[test]
fn malformed_document_is_reported() {
    let tmp = tempfile::tempdir().unwrap();
    write(tmp.path(), "item_1.json", "{");
    let err = rewrite_image_urls(tmp.path(), "blank", NEW).unwrap_err();
    assert!(matches!(err, MaskgenError::Serde(_)));
}
