use assert_fs::prelude::*;
use pretty_assertions::assert_eq;
use resync_fs::checksum::{compute_content_checksum, compute_tree_checksums};

#[test]
fn test_tree_checksums_cover_files_and_directories() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("Resources/layout/Main.axml").write_str("<LinearLayout />").unwrap();
    temp.child("Resources/values").create_dir_all().unwrap();

    let sums = compute_tree_checksums(temp.path()).unwrap();

    let keys: Vec<_> = sums.keys().map(String::as_str).collect();
    assert_eq!(
        keys,
        vec![
            "Resources",
            "Resources/layout",
            "Resources/layout/Main.axml",
            "Resources/values",
        ]
    );
    assert_eq!(sums["Resources/values"], "");
    assert_eq!(
        sums["Resources/layout/Main.axml"],
        compute_content_checksum(b"<LinearLayout />")
    );
}

#[test]
fn test_tree_checksums_see_case_only_renames() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("Resources/Main.axml").write_str("x").unwrap();
    let before = compute_tree_checksums(temp.path()).unwrap();

    std::fs::rename(
        temp.child("Resources/Main.axml").path(),
        temp.child("Resources/main.axml").path(),
    )
    .unwrap();
    let after = compute_tree_checksums(temp.path()).unwrap();

    assert_ne!(before, after);
}

#[test]
fn test_tree_checksums_detect_content_change() {
    let temp = assert_fs::TempDir::new().unwrap();
    let file = temp.child("App.android.toml");
    file.write_str("[resources]\n").unwrap();
    let before = compute_tree_checksums(temp.path()).unwrap();

    file.write_str("[resources]\nroot = \"resources\"\n").unwrap();

    assert_ne!(before, compute_tree_checksums(temp.path()).unwrap());
}
