//! In-memory snapshot of a resource tree

use std::fs;

use resync_fs::NormalizedPath;

use crate::entry::EntryKind;

/// A node of the resource tree.
///
/// `relative_path` is relative to the directory the scan started from (the
/// project directory), so the root node's path is the resources folder name.
/// Children are ordered by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceTreeNode {
    pub relative_path: NormalizedPath,
    pub kind: EntryKind,
    pub children: Vec<ResourceTreeNode>,
}

impl ResourceTreeNode {
    /// Scan `base/relative` recursively.
    ///
    /// Symlinks are recorded as [`EntryKind::Other`] and not followed. Entry
    /// names must be valid UTF-8.
    pub fn scan(base: &NormalizedPath, relative: &NormalizedPath) -> resync_fs::Result<Self> {
        let native = base.join(relative.as_str()).to_native();
        let metadata =
            fs::symlink_metadata(&native).map_err(|e| resync_fs::Error::io(&native, e))?;
        Self::scan_entry(base, relative.clone(), metadata.file_type().into())
    }

    fn scan_entry(
        base: &NormalizedPath,
        relative: NormalizedPath,
        kind: EntryKind,
    ) -> resync_fs::Result<Self> {
        let mut children = Vec::new();

        if kind == EntryKind::Directory {
            let native = base.join(relative.as_str()).to_native();
            let mut entries = Vec::new();
            for entry in fs::read_dir(&native).map_err(|e| resync_fs::Error::io(&native, e))? {
                let entry = entry.map_err(|e| resync_fs::Error::io(&native, e))?;
                let file_type = entry
                    .file_type()
                    .map_err(|e| resync_fs::Error::io(entry.path(), e))?;
                let name = entry
                    .file_name()
                    .into_string()
                    .map_err(|_| resync_fs::Error::NonUtf8Name { path: entry.path() })?;
                entries.push((name, EntryKind::from(file_type)));
            }
            entries.sort_by(|a, b| a.0.cmp(&b.0));

            for (name, child_kind) in entries {
                children.push(Self::scan_entry(base, relative.join(&name), child_kind)?);
            }
        }

        Ok(Self {
            relative_path: relative,
            kind,
            children,
        })
    }

    /// Build a leaf node; useful for assembling trees without touching disk.
    pub fn file(relative_path: impl Into<NormalizedPath>) -> Self {
        Self {
            relative_path: relative_path.into(),
            kind: EntryKind::File,
            children: Vec::new(),
        }
    }

    /// Build a directory node from already-built children.
    pub fn directory(relative_path: impl Into<NormalizedPath>, mut children: Vec<Self>) -> Self {
        children.sort_by(|a, b| a.name().cmp(b.name()));
        Self {
            relative_path: relative_path.into(),
            kind: EntryKind::Directory,
            children,
        }
    }

    /// Last component of the relative path.
    pub fn name(&self) -> &str {
        self.relative_path.file_name().unwrap_or_default()
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    /// All nodes, parents before their children.
    pub fn walk(&self) -> Vec<&ResourceTreeNode> {
        let mut out = vec![self];
        for child in &self.children {
            out.extend(child.walk());
        }
        out
    }

    /// Relative paths of every regular file in the tree, sorted.
    pub fn files(&self) -> Vec<NormalizedPath> {
        let mut files: Vec<_> = self
            .walk()
            .into_iter()
            .filter(|node| node.kind == EntryKind::File)
            .map(|node| node.relative_path.clone())
            .collect();
        files.sort();
        files
    }

    /// Look up a node by relative path.
    pub fn find(&self, relative: &NormalizedPath) -> Option<&ResourceTreeNode> {
        self.walk()
            .into_iter()
            .find(|node| &node.relative_path == relative)
    }
}
