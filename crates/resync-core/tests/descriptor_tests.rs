//! ProjectDescriptorSync::merge against files on disk

use std::fs;

use pretty_assertions::assert_eq;
use resync_core::{ProjectDescriptorSync, ResourceTreeNode, SyncError};
use resync_fs::NormalizedPath;
use resync_test_utils::TestProject;

fn scanned(project: &TestProject) -> ResourceTreeNode {
    ResourceTreeNode::scan(
        &NormalizedPath::new(project.root()),
        &NormalizedPath::new("resources"),
    )
    .unwrap()
}

#[test]
fn merge_creates_then_reports_unchanged() {
    let project = TestProject::new()
        .with_file("resources/layout/main.xml", "")
        .with_file("resources/values/strings.xml", "");
    let tree = scanned(&project);
    let sync = ProjectDescriptorSync::new("studio");

    assert!(sync.merge(&project.descriptor(), &tree, None).unwrap());
    let written = project.read_file("App.android.toml");

    assert!(!sync.merge(&project.descriptor(), &tree, None).unwrap());
    assert_eq!(project.read_file("App.android.toml"), written);
}

#[test]
fn new_file_with_hint_is_inserted_in_place() {
    let project = TestProject::new().with_file("resources/layout/main.xml", "");
    let sync = ProjectDescriptorSync::new("studio");
    sync.merge(&project.descriptor(), &scanned(&project), None)
        .unwrap();

    project.write_file("resources/layout/about.xml", "");
    let hint = NormalizedPath::new("resources/layout/about.xml");
    assert!(
        sync.merge(&project.descriptor(), &scanned(&project), Some(&hint))
            .unwrap()
    );

    let doc: toml::Table = toml::from_str(&project.read_file("App.android.toml")).unwrap();
    let files: Vec<_> = doc["resources"]["files"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    assert_eq!(files, vec!["resources/layout/about.xml", "resources/layout/main.xml"]);
    assert_eq!(
        doc["resources"]["last_changed"].as_str(),
        Some("resources/layout/about.xml")
    );
}

#[test]
fn tool_path_change_is_written() {
    let project = TestProject::new().with_file("resources/layout/main.xml", "");
    let tree = scanned(&project);
    ProjectDescriptorSync::new("old")
        .merge(&project.descriptor(), &tree, None)
        .unwrap();

    let changed = ProjectDescriptorSync::new("new")
        .merge(&project.descriptor(), &tree, None)
        .unwrap();

    assert!(changed);
    project.assert_file_contains("App.android.toml", "tool_path = \"new\"");
}

#[test]
fn unreadable_descriptor_is_a_descriptor_error() {
    let project = TestProject::new()
        .with_file("resources/layout/main.xml", "")
        .with_dir("App.android.toml");

    let err = ProjectDescriptorSync::new("studio")
        .merge(&project.descriptor(), &scanned(&project), None)
        .unwrap_err();

    assert!(matches!(err, SyncError::DescriptorEditFailed { .. }));
    assert!(fs::metadata(project.path("App.android.toml")).unwrap().is_dir());
}
