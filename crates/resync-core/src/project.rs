//! Where a project keeps its resources and its external descriptor

use std::fs;

use resync_fs::NormalizedPath;

use crate::constants::{DESCRIPTOR_SUFFIX, RESOURCES_DIR};
use crate::error::{Result, SyncError};

/// Locations derived from the host project file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    project_file: NormalizedPath,
    project_dir: NormalizedPath,
}

impl ProjectLayout {
    pub fn new(project_file: impl Into<NormalizedPath>) -> Self {
        let project_file = project_file.into();
        let project_dir = project_file
            .parent()
            .unwrap_or_else(|| NormalizedPath::new("."));
        Self {
            project_file,
            project_dir,
        }
    }

    pub fn project_file(&self) -> &NormalizedPath {
        &self.project_file
    }

    pub fn project_dir(&self) -> &NormalizedPath {
        &self.project_dir
    }

    /// `<project stem>.android.toml`, next to the project file.
    pub fn descriptor_path(&self) -> NormalizedPath {
        let name = self.project_file.file_name().unwrap_or_default();
        let stem = match name.rfind('.') {
            Some(idx) if idx > 0 => &name[..idx],
            _ => name,
        };
        self.project_dir.join(&format!("{stem}{DESCRIPTOR_SUFFIX}"))
    }

    /// Find the resources directory next to the project file.
    ///
    /// The name is matched ASCII case-insensitively so a tree that was
    /// already normalized to `resources` is found again.
    ///
    /// # Errors
    ///
    /// Two directories matching in different case are a planning-time
    /// [`SyncError::RenameFailed`]: they would collide once lowercased.
    pub fn find_resources_root(&self) -> Result<Option<NormalizedPath>> {
        let native = self.project_dir.to_native();
        let entries = fs::read_dir(&native).map_err(|e| {
            SyncError::unknown(format!("cannot read project directory {}: {}", native.display(), e))
        })?;

        let mut found: Option<NormalizedPath> = None;
        let mut names: Vec<String> = entries
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().map(|t| t.is_dir()).unwrap_or(false))
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .filter(|name| name.eq_ignore_ascii_case(RESOURCES_DIR))
            .collect();
        names.sort();

        for name in names {
            let candidate = self.project_dir.join(&name);
            if let Some(existing) = &found {
                return Err(SyncError::collision(
                    candidate,
                    format!("{} is also a resources directory", existing),
                ));
            }
            found = Some(candidate);
        }
        Ok(found)
    }

    /// Express `path` relative to the project directory.
    pub fn relative(&self, path: &NormalizedPath) -> Option<NormalizedPath> {
        path.strip_prefix(&self.project_dir)
            .filter(|rel| !rel.as_str().is_empty())
    }
}
