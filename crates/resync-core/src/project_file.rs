//! Keeps resource references in the host project file pointing at the disk
//!
//! MSBuild-style project files list resources as `Include="Resources\layout\Main.axml"`
//! attributes. Every `Include`, `Update` and `Remove` attribute is looked up
//! in the scanned resource tree, component by component and ignoring case,
//! and rewritten to the spelling found on disk. The lookup runs on every
//! sync, so references to entries renamed by an earlier interrupted run are
//! repaired as well.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use resync_fs::{NormalizedPath, io};
use tracing::{debug, info};

use crate::error::{Result, SyncError};
use crate::normalizer::normalized_name;
use crate::tree::ResourceTreeNode;

static ITEM_REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\b(Include|Update|Remove)="([^"]*)""#).unwrap());

/// Rewrite references in `source` to the names in `tree`.
///
/// `tree` must be scanned from the project directory, the directory the
/// references are relative to.
pub fn rewrite_source(source: &str, tree: &ResourceTreeNode) -> String {
    ITEM_REFERENCE
        .replace_all(source, |caps: &Captures| {
            let attribute = &caps[1];
            let reference = &caps[2];
            match rewrite_reference(reference, tree) {
                Some(updated) => {
                    debug!(from = reference, to = %updated, "Rewrote project reference");
                    format!(r#"{attribute}="{updated}""#)
                }
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

fn rewrite_reference(reference: &str, tree: &ResourceTreeNode) -> Option<String> {
    if reference.is_empty() || reference.contains(|c: char| matches!(c, '*' | '$' | ';')) {
        return None;
    }
    let is_separator = |c: char| c == '/' || c == '\\';
    let backslashes = reference.contains('\\');
    let trailing = reference.ends_with(is_separator);

    let components: Vec<&str> = reference
        .split(is_separator)
        .filter(|c| !c.is_empty() && *c != ".")
        .collect();
    let node = locate(tree, &components)?;

    let lead = if reference.starts_with("./") || reference.starts_with(".\\") {
        &reference[..2]
    } else {
        ""
    };
    let mut updated = format!("{lead}{}", node.relative_path);
    if trailing {
        updated.push('/');
    }
    if backslashes {
        updated = updated.replace('/', "\\");
    }
    (updated != reference).then_some(updated)
}

/// Walk `components` down from the tree root.
fn locate<'a>(tree: &'a ResourceTreeNode, components: &[&str]) -> Option<&'a ResourceTreeNode> {
    let (first, rest) = components.split_first()?;
    if !refers_to(tree, first) {
        return None;
    }
    rest.iter().try_fold(tree, |node, component| {
        node.children
            .iter()
            .find(|child| child.name() == *component)
            .or_else(|| node.children.iter().find(|child| refers_to(child, component)))
    })
}

/// Whether `component` names `node`, ignoring case and the legacy extension.
fn refers_to(node: &ResourceTreeNode, component: &str) -> bool {
    let name = node.name();
    name == component
        || name.to_lowercase() == component.to_lowercase()
        || normalized_name(component, node.kind) == name
}

/// Rewrite the project file on disk. Returns whether it changed.
///
/// A missing project file is not an error; there is nothing to keep in sync.
///
/// # Errors
///
/// Read or write failures are [`SyncError::DescriptorEditFailed`].
pub fn rewrite_references(
    project_file: &NormalizedPath,
    tree: &ResourceTreeNode,
) -> Result<bool> {
    if !project_file.is_file() {
        return Ok(false);
    }

    let source = io::read_text(project_file)
        .map_err(|e| SyncError::descriptor(format!("project file edit failed: {e}")))?;
    let updated = rewrite_source(&source, tree);
    if updated == source {
        return Ok(false);
    }

    io::write_text(project_file, &updated)
        .map_err(|e| SyncError::descriptor(format!("project file edit failed: {e}")))?;
    info!(path = %project_file, "Updated resource references in project file");
    Ok(true)
}
