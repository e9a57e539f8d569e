//! Lowercase and canonical-extension renames for a resource tree
//!
//! The native toolchain only accepts lowercase resource names and the `.xml`
//! extension. [`CaseNormalizer::plan`] computes every rename needed to get
//! there without touching the disk; [`CaseNormalizer::apply`] performs them.

use std::collections::HashMap;
use std::fmt;

use resync_fs::{NormalizedPath, io};
use tracing::{debug, info};

use crate::constants::{CANONICAL_EXTENSION, LEGACY_EXTENSION};
use crate::entry::EntryKind;
use crate::error::{RenamePhase, Result, SyncError};
use crate::tree::ResourceTreeNode;

/// One planned rename within a single parent directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameOp {
    pub from: NormalizedPath,
    pub to: NormalizedPath,
    pub kind: EntryKind,
}

/// Renames computed before any mutation, ordered deepest first.
///
/// Every `from` path is expressed with the original names of its ancestors;
/// applying the operations in order keeps those paths valid because a
/// parent is only renamed after all of its descendants.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenamePlan {
    ops: Vec<RenameOp>,
}

impl RenamePlan {
    pub fn new(mut ops: Vec<RenameOp>) -> Self {
        // Stable sort keeps the walk order among entries of equal depth.
        ops.sort_by(|a, b| b.from.depth().cmp(&a.from.depth()));
        Self { ops }
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RenameOp> {
        self.ops.iter()
    }

    /// Number of planned file renames.
    pub fn file_count(&self) -> usize {
        self.ops.iter().filter(|op| op.kind == EntryKind::File).count()
    }

    /// Number of planned directory renames.
    pub fn directory_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| op.kind == EntryKind::Directory)
            .count()
    }

    /// Where `path` ends up once the whole plan has been applied.
    ///
    /// Paths outside the plan come back unchanged.
    pub fn resolve(&self, path: &NormalizedPath) -> NormalizedPath {
        let mut current = path.clone();
        for op in &self.ops {
            if let Some(rest) = current.strip_prefix(&op.from) {
                current = if rest.as_str().is_empty() {
                    op.to.clone()
                } else {
                    op.to.join(rest.as_str())
                };
            }
        }
        current
    }

    /// The tree as it will look once the plan has been applied.
    ///
    /// `base` is the directory `tree` was scanned from.
    pub fn rename_tree(&self, base: &NormalizedPath, tree: &ResourceTreeNode) -> ResourceTreeNode {
        let resolved = self.resolve(&base.join(tree.relative_path.as_str()));
        let relative_path = resolved
            .strip_prefix(base)
            .unwrap_or_else(|| tree.relative_path.clone());
        if tree.kind == EntryKind::Directory {
            let children = tree
                .children
                .iter()
                .map(|child| self.rename_tree(base, child))
                .collect();
            ResourceTreeNode::directory(relative_path, children)
        } else {
            ResourceTreeNode {
                relative_path,
                kind: tree.kind,
                children: Vec::new(),
            }
        }
    }
}

impl<'a> IntoIterator for &'a RenamePlan {
    type Item = &'a RenameOp;
    type IntoIter = std::slice::Iter<'a, RenameOp>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.iter()
    }
}

impl fmt::Display for RenamePlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for op in &self.ops {
            let marker = if op.kind == EntryKind::Directory { "/" } else { "" };
            writeln!(f, "{}{} -> {}{}", op.from, marker, op.to, marker)?;
        }
        Ok(())
    }
}

/// The name an entry must have for the native toolchain.
///
/// Names are lowercased; files with the legacy markup extension also get the
/// canonical one.
pub fn normalized_name(name: &str, kind: EntryKind) -> String {
    let lower = name.to_lowercase();
    if kind != EntryKind::File {
        return lower;
    }
    match lower.rfind('.') {
        Some(idx) if idx > 0 && lower[idx + 1..].eq_ignore_ascii_case(LEGACY_EXTENSION) => {
            format!("{}.{}", &lower[..idx], CANONICAL_EXTENSION)
        }
        _ => lower,
    }
}

/// Plans and applies resource renames.
#[derive(Debug, Default, Clone)]
pub struct CaseNormalizer;

impl CaseNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Compute the renames needed under `resource_root`, the root included.
    ///
    /// # Errors
    ///
    /// Returns a planning-phase [`SyncError::RenameFailed`] when the tree
    /// cannot be read (non-UTF-8 entry names included) or when two siblings
    /// would end up with the same name.
    pub fn plan(&self, resource_root: &NormalizedPath) -> Result<RenamePlan> {
        let root_name = resource_root.file_name().ok_or_else(|| {
            SyncError::collision(resource_root.clone(), "resource root has no name")
        })?;
        let base = resource_root.parent().unwrap_or_else(|| NormalizedPath::new(""));

        let tree = ResourceTreeNode::scan(&base, &NormalizedPath::new(root_name)).map_err(|e| {
            SyncError::RenameFailed {
                path: e
                    .path()
                    .map(NormalizedPath::new)
                    .unwrap_or_else(|| resource_root.clone()),
                reason: e.to_string(),
                phase: RenamePhase::Planning,
            }
        })?;

        let target = normalized_name(root_name, tree.kind);
        if target != root_name && sibling_exists(&base, &target) {
            return Err(SyncError::collision(
                resource_root.clone(),
                format!("{} already exists next to it", base.join(&target)),
            ));
        }

        self.plan_tree(&base, &tree)
    }

    /// Compute renames for an already scanned tree rooted at `base`.
    pub fn plan_tree(&self, base: &NormalizedPath, tree: &ResourceTreeNode) -> Result<RenamePlan> {
        let mut ops = Vec::new();
        if let Some(op) = rename_for(base, tree) {
            ops.push(op);
        }

        for node in tree.walk() {
            let mut targets: HashMap<String, &NormalizedPath> = HashMap::new();
            for child in &node.children {
                let target = normalized_name(child.name(), child.kind);
                if let Some(existing) = targets.insert(target.clone(), &child.relative_path) {
                    return Err(SyncError::collision(
                        base.join(child.relative_path.as_str()),
                        format!("{} would also be renamed to {}", existing, target),
                    ));
                }
                if let Some(op) = rename_for(base, child) {
                    ops.push(op);
                }
            }
        }

        let plan = RenamePlan::new(ops);
        debug!(renames = plan.len(), root = %tree.relative_path, "Planned resource renames");
        Ok(plan)
    }

    /// Apply a plan in order.
    ///
    /// Stops at the first failure. Renames already applied are left in place
    /// and counted in the returned error's phase.
    pub fn apply(&self, plan: &RenamePlan) -> Result<usize> {
        let mut applied = 0;
        for op in plan {
            io::rename_entry(&op.from, &op.to).map_err(|e| SyncError::RenameFailed {
                path: op.from.clone(),
                reason: e.to_string(),
                phase: RenamePhase::Applying { applied },
            })?;
            debug!(from = %op.from, to = %op.to, "Renamed");
            applied += 1;
        }
        info!(applied, "Applied resource renames");
        Ok(applied)
    }
}

fn rename_for(base: &NormalizedPath, node: &ResourceTreeNode) -> Option<RenameOp> {
    if node.kind == EntryKind::Other {
        return None;
    }
    let name = node.name();
    let target = normalized_name(name, node.kind);
    if target == name {
        return None;
    }
    let from = base.join(node.relative_path.as_str());
    let to = from.with_file_name(&target);
    Some(RenameOp {
        from,
        to,
        kind: node.kind,
    })
}

fn sibling_exists(dir: &NormalizedPath, name: &str) -> bool {
    let native = if dir.as_str().is_empty() {
        std::path::PathBuf::from(".")
    } else {
        dir.to_native()
    };
    std::fs::read_dir(native)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .any(|e| e.file_name().to_string_lossy() == name)
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("Main.axml", EntryKind::File, "main.xml")]
    #[case("Main.AXML", EntryKind::File, "main.xml")]
    #[case("Icon.PNG", EntryKind::File, "icon.png")]
    #[case("strings.xml", EntryKind::File, "strings.xml")]
    #[case("archive.axml.bak", EntryKind::File, "archive.axml.bak")]
    #[case(".axml", EntryKind::File, ".axml")]
    #[case("Layout", EntryKind::Directory, "layout")]
    #[case("Folder.axml", EntryKind::Directory, "folder.axml")]
    fn normalized_names(#[case] name: &str, #[case] kind: EntryKind, #[case] expected: &str) {
        assert_eq!(normalized_name(name, kind), expected);
    }

    fn sample_tree() -> ResourceTreeNode {
        ResourceTreeNode::directory(
            "Resources",
            vec![
                ResourceTreeNode::directory(
                    "Resources/Layout",
                    vec![ResourceTreeNode::file("Resources/Layout/Main.axml")],
                ),
                ResourceTreeNode::directory(
                    "Resources/values",
                    vec![ResourceTreeNode::file("Resources/values/strings.xml")],
                ),
            ],
        )
    }

    #[test]
    fn plan_tree_orders_deepest_first() {
        let plan = CaseNormalizer::new()
            .plan_tree(&NormalizedPath::new("p"), &sample_tree())
            .unwrap();

        let froms: Vec<_> = plan.iter().map(|op| op.from.as_str()).collect();
        assert_eq!(
            froms,
            vec!["p/Resources/Layout/Main.axml", "p/Resources/Layout", "p/Resources"]
        );
        assert_eq!(plan.file_count(), 1);
        assert_eq!(plan.directory_count(), 2);
    }

    #[test]
    fn plan_display_lists_every_rename() {
        let plan = CaseNormalizer::new()
            .plan_tree(&NormalizedPath::new("p"), &sample_tree())
            .unwrap();

        insta::assert_snapshot!(plan.to_string().trim_end(), @r"
        p/Resources/Layout/Main.axml -> p/Resources/Layout/main.xml
        p/Resources/Layout/ -> p/Resources/layout/
        p/Resources/ -> p/resources/
        ");
    }

    #[test]
    fn resolve_follows_every_ancestor_rename() {
        let plan = CaseNormalizer::new()
            .plan_tree(&NormalizedPath::new("p"), &sample_tree())
            .unwrap();

        assert_eq!(
            plan.resolve(&NormalizedPath::new("p/Resources/Layout/Main.axml")).as_str(),
            "p/resources/layout/main.xml"
        );
        assert_eq!(
            plan.resolve(&NormalizedPath::new("p/Resources/values/strings.xml")).as_str(),
            "p/resources/values/strings.xml"
        );
        assert_eq!(
            plan.resolve(&NormalizedPath::new("p/Other/Thing.axml")).as_str(),
            "p/Other/Thing.axml"
        );
    }

    #[test]
    fn plan_tree_reports_sibling_collisions() {
        let tree = ResourceTreeNode::directory(
            "resources",
            vec![ResourceTreeNode::directory(
                "resources/drawable",
                vec![
                    ResourceTreeNode::file("resources/drawable/Icon.png"),
                    ResourceTreeNode::file("resources/drawable/icon.PNG"),
                ],
            )],
        );

        let err = CaseNormalizer::new()
            .plan_tree(&NormalizedPath::new("p"), &tree)
            .unwrap_err();
        match err {
            SyncError::RenameFailed { path, phase, .. } => {
                assert_eq!(phase, RenamePhase::Planning);
                assert_eq!(path.as_str(), "p/resources/drawable/icon.PNG");
            }
            other => panic!("expected RenameFailed, got {other:?}"),
        }
    }

    #[test]
    fn legacy_and_canonical_siblings_collide() {
        let tree = ResourceTreeNode::directory(
            "resources",
            vec![ResourceTreeNode::directory(
                "resources/layout",
                vec![
                    ResourceTreeNode::file("resources/layout/main.axml"),
                    ResourceTreeNode::file("resources/layout/main.xml"),
                ],
            )],
        );

        let result = CaseNormalizer::new().plan_tree(&NormalizedPath::new("p"), &tree);
        assert!(matches!(
            result,
            Err(SyncError::RenameFailed { phase: RenamePhase::Planning, .. })
        ));
    }
}
