use serde_json::json;
use session_inbox::shared::fs_atomic::{atomic_write_file, atomic_write_json};
use std::fs;

#[test]
fn shared_fs_atomic_replaces_existing_content() {
    let temp = tempfile::tempdir().expect("tempdir");
    let target = temp.path().join("nested/output.txt");

    fs::create_dir_all(target.parent().expect("parent")).expect("mkdir");
    atomic_write_file(&target, b"first").expect("write first");
    assert_eq!(fs::read_to_string(&target).expect("read first"), "first");

    atomic_write_file(&target, b"second").expect("write second");
    assert_eq!(fs::read_to_string(&target).expect("read second"), "second");

    let leftovers: Vec<_> = fs::read_dir(target.parent().expect("parent"))
        .expect("read dir")
        .filter_map(Result::ok)
        .filter(|entry| entry.file_name().to_string_lossy().contains(".tmp-"))
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn shared_fs_atomic_json_is_pretty_and_keeps_non_ascii() {
    let temp = tempfile::tempdir().expect("tempdir");
    let target = temp.path().join("result.json");

    atomic_write_json(&target, &json!({"name": "腿部训练"})).expect("write json");

    let raw = fs::read_to_string(&target).expect("read json");
    assert_eq!(raw, "{\n  \"name\": \"腿部训练\"\n}");
}

#[test]
fn shared_fs_atomic_fails_when_parent_is_missing() {
    let temp = tempfile::tempdir().expect("tempdir");
    let target = temp.path().join("missing/output.txt");
    assert!(atomic_write_file(&target, b"data").is_err());
    assert!(!target.exists());
}
