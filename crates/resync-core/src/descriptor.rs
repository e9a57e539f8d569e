//! External build descriptor maintenance
//!
//! The descriptor is a TOML document next to the project file that tells the
//! native toolchain where the resources live:
//!
//! ```toml
//! [external]
//! tool_path = "/opt/android-studio/bin/studio.sh"
//!
//! [resources]
//! root = "resources"
//! last_changed = "resources/layout/main.xml"
//! files = [
//!     "resources/drawable/icon.png",
//!     "resources/layout/main.xml",
//! ]
//! ```
//!
//! Edits go through `toml_edit`, so comments, unknown tables and key order
//! written by people or other tools survive a merge.

use resync_fs::{NormalizedPath, io};
use toml_edit::{Array, DocumentMut, Item, Table, Value};
use tracing::{debug, info};

use crate::error::{Result, SyncError};
use crate::tree::ResourceTreeNode;

/// Merges a resource tree into the external descriptor.
#[derive(Debug, Clone)]
pub struct ProjectDescriptorSync {
    tool_path: String,
}

impl ProjectDescriptorSync {
    pub fn new(tool_path: impl Into<String>) -> Self {
        Self {
            tool_path: tool_path.into(),
        }
    }

    /// Bring the descriptor at `descriptor_path` in line with `tree`.
    ///
    /// A missing descriptor is created. `changed_hint` names the entry touched
    /// last, relative to the project directory; when it is the only file the
    /// descriptor does not list yet, it is inserted without rebuilding the
    /// list.
    ///
    /// Returns whether the file on disk changed.
    ///
    /// # Errors
    ///
    /// Any read, parse or write failure is [`SyncError::DescriptorEditFailed`].
    /// Writes are atomic, so a failed merge leaves the previous document.
    pub fn merge(
        &self,
        descriptor_path: &NormalizedPath,
        tree: &ResourceTreeNode,
        changed_hint: Option<&NormalizedPath>,
    ) -> Result<bool> {
        let current = read_existing(descriptor_path)?;
        let rendered = self
            .render(current.as_deref(), tree, changed_hint)
            .map_err(|e| match e {
                SyncError::DescriptorEditFailed { reason, .. } => {
                    SyncError::descriptor(format!("{descriptor_path}: {reason}"))
                }
                other => other,
            })?;

        if current.as_deref() == Some(rendered.as_str()) {
            debug!(path = %descriptor_path, "Descriptor already up to date");
            return Ok(false);
        }

        io::write_text(descriptor_path, &rendered)
            .map_err(|e| SyncError::descriptor(e.to_string()))?;
        info!(path = %descriptor_path, files = tree.files().len(), "Descriptor updated");
        Ok(true)
    }

    /// Produce the merged document without writing it.
    ///
    /// `current` is the existing descriptor text, if any.
    pub fn render(
        &self,
        current: Option<&str>,
        tree: &ResourceTreeNode,
        changed_hint: Option<&NormalizedPath>,
    ) -> Result<String> {
        let mut doc = match current {
            Some(text) => text.parse::<DocumentMut>().map_err(|e| {
                SyncError::descriptor(format!("not a valid TOML document: {}", e.message()))
            })?,
            None => DocumentMut::new(),
        };

        let external = table_mut(&mut doc, "external")?;
        set_string(external, "tool_path", &self.tool_path);

        let desired: Vec<String> = tree
            .files()
            .into_iter()
            .map(String::from)
            .collect();

        let resources = table_mut(&mut doc, "resources")?;
        set_string(resources, "root", tree.relative_path.as_str());
        if let Some(hint) = changed_hint {
            set_string(resources, "last_changed", hint.as_str());
        }
        update_files(resources, &desired, changed_hint);

        Ok(doc.to_string())
    }
}

fn read_existing(path: &NormalizedPath) -> Result<Option<String>> {
    if !path.exists() {
        return Ok(None);
    }
    io::read_text(path)
        .map(Some)
        .map_err(|e| SyncError::descriptor(e.to_string()))
}

fn table_mut<'a>(doc: &'a mut DocumentMut, key: &str) -> Result<&'a mut Table> {
    doc.entry(key)
        .or_insert(toml_edit::table())
        .as_table_mut()
        .ok_or_else(|| SyncError::descriptor(format!("`{key}` must be a table")))
}

/// Only touch the key when the value differs, so its decor survives.
fn set_string(table: &mut Table, key: &str, value: &str) {
    if table.get(key).and_then(Item::as_str) != Some(value) {
        table.insert(key, toml_edit::value(value));
    }
}

fn update_files(resources: &mut Table, desired: &[String], hint: Option<&NormalizedPath>) {
    let existing: Option<Vec<String>> = resources
        .get("files")
        .and_then(Item::as_array)
        .and_then(|array| {
            array
                .iter()
                .map(|v| v.as_str().map(str::to_owned))
                .collect()
        });

    if existing.as_deref() == Some(desired) {
        return;
    }

    if let (Some(hint), Some(listed)) = (hint, &existing)
        && let Some(index) = incremental_insert_index(listed, desired, hint.as_str())
        && let Some(array) = resources.get_mut("files").and_then(Item::as_array_mut)
    {
        let neighbour = array.get(index.min(array.len().saturating_sub(1)));
        let prefix = neighbour.and_then(|v| v.decor().prefix()).cloned();
        let mut value = Value::from(hint.as_str());
        if let Some(prefix) = prefix {
            value.decor_mut().set_prefix(prefix);
        }
        array.insert_formatted(index, value);
        debug!(file = %hint, "Inserted changed resource into descriptor");
        return;
    }

    resources.insert("files", toml_edit::value(files_array(desired)));
}

/// Position at which inserting `hint` into `listed` yields `desired`, if
/// that single insertion is all that is missing.
fn incremental_insert_index(listed: &[String], desired: &[String], hint: &str) -> Option<usize> {
    if listed.iter().any(|f| f == hint) || listed.len() + 1 != desired.len() {
        return None;
    }
    let index = listed.partition_point(|f| f.as_str() < hint);
    let matches = desired[..index] == listed[..index]
        && desired[index] == hint
        && desired[index + 1..] == listed[index..];
    matches.then_some(index)
}

fn files_array(files: &[String]) -> Array {
    let mut array: Array = files.iter().map(String::as_str).collect();
    if !array.is_empty() {
        for value in array.iter_mut() {
            value.decor_mut().set_prefix("\n    ");
        }
        array.set_trailing("\n");
        array.set_trailing_comma(true);
    }
    array
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tree() -> ResourceTreeNode {
        ResourceTreeNode::directory(
            "resources",
            vec![
                ResourceTreeNode::directory(
                    "resources/drawable",
                    vec![ResourceTreeNode::file("resources/drawable/icon.png")],
                ),
                ResourceTreeNode::directory(
                    "resources/layout",
                    vec![ResourceTreeNode::file("resources/layout/main.xml")],
                ),
            ],
        )
    }

    fn listed_files(rendered: &str) -> Vec<String> {
        let doc: toml::Table = toml::from_str(rendered).unwrap();
        doc["resources"]["files"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn render_creates_a_new_document() {
        let sync = ProjectDescriptorSync::new("/opt/studio/bin/studio.sh");
        let rendered = sync.render(None, &tree(), None).unwrap();

        let doc: toml::Table = toml::from_str(&rendered).unwrap();
        assert_eq!(
            doc["external"]["tool_path"].as_str(),
            Some("/opt/studio/bin/studio.sh")
        );
        assert_eq!(doc["resources"]["root"].as_str(), Some("resources"));
        assert_eq!(
            listed_files(&rendered),
            vec!["resources/drawable/icon.png", "resources/layout/main.xml"]
        );
        assert!(doc["resources"].get("last_changed").is_none());
    }

    #[test]
    fn render_preserves_comments_and_unknown_tables() {
        let current = "# managed by hand\n[gradle]\nplugin = \"com.android.application\"\n";
        let sync = ProjectDescriptorSync::new("studio");
        let rendered = sync.render(Some(current), &tree(), None).unwrap();

        assert!(rendered.starts_with("# managed by hand\n[gradle]\n"));
        assert!(rendered.contains("plugin = \"com.android.application\""));
    }

    #[test]
    fn render_is_stable_once_merged() {
        let sync = ProjectDescriptorSync::new("studio");
        let first = sync.render(None, &tree(), None).unwrap();
        let second = sync.render(Some(&first), &tree(), None).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn hint_is_inserted_incrementally() {
        let current = "[external]\ntool_path = \"studio\"\n\n[resources]\nroot = \"resources\"\nfiles = [\"resources/drawable/icon.png\"] # keep\n";
        let hint = NormalizedPath::new("resources/layout/main.xml");
        let sync = ProjectDescriptorSync::new("studio");

        let rendered = sync.render(Some(current), &tree(), Some(&hint)).unwrap();

        assert!(rendered.contains("# keep"), "array decor was rebuilt:\n{rendered}");
        assert_eq!(
            listed_files(&rendered),
            vec!["resources/drawable/icon.png", "resources/layout/main.xml"]
        );
        assert!(rendered.contains("last_changed = \"resources/layout/main.xml\""));
    }

    #[test]
    fn stale_listing_is_rebuilt_from_the_tree() {
        let current = "[resources]\nfiles = [\"Resources/Layout/Main.axml\"]\n";
        let hint = NormalizedPath::new("resources/layout/main.xml");
        let sync = ProjectDescriptorSync::new("studio");

        let rendered = sync.render(Some(current), &tree(), Some(&hint)).unwrap();
        assert_eq!(
            listed_files(&rendered),
            vec!["resources/drawable/icon.png", "resources/layout/main.xml"]
        );
    }

    #[test]
    fn invalid_document_is_a_descriptor_error() {
        let sync = ProjectDescriptorSync::new("studio");
        let result = sync.render(Some("[resources\nfiles = "), &tree(), None);
        assert!(matches!(result, Err(SyncError::DescriptorEditFailed { .. })));
    }

    #[test]
    fn non_table_section_is_a_descriptor_error() {
        let sync = ProjectDescriptorSync::new("studio");
        let result = sync.render(Some("resources = 3\n"), &tree(), None);
        assert!(matches!(result, Err(SyncError::DescriptorEditFailed { reason, .. }) if reason.contains("resources")));
    }

    #[test]
    fn incremental_index_requires_a_single_gap() {
        let desired = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let listed = vec!["a".to_string(), "c".to_string()];
        assert_eq!(incremental_insert_index(&listed, &desired, "b"), Some(1));
        assert_eq!(incremental_insert_index(&listed, &desired, "z"), None);
        assert_eq!(incremental_insert_index(&desired, &desired, "b"), None);
    }
}
