//! Selected filesystem entries

use std::fs;

use resync_fs::NormalizedPath;
use serde::{Deserialize, Serialize};

/// Kind of a filesystem entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Directory,
    /// Symlinks, sockets and anything else that is neither of the above
    Other,
}

impl From<fs::FileType> for EntryKind {
    fn from(file_type: fs::FileType) -> Self {
        if file_type.is_file() {
            Self::File
        } else if file_type.is_dir() {
            Self::Directory
        } else {
            Self::Other
        }
    }
}

/// A single entry the caller selected, e.g. in a project tree view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceEntry {
    pub path: NormalizedPath,
    pub kind: EntryKind,
    pub name: String,
}

impl ResourceEntry {
    /// Create an entry; the name is the last path component.
    pub fn new(path: impl Into<NormalizedPath>, kind: EntryKind) -> Self {
        let path = path.into();
        let name = path.file_name().unwrap_or_default().to_string();
        Self { path, kind, name }
    }

    pub fn file(path: impl Into<NormalizedPath>) -> Self {
        Self::new(path, EntryKind::File)
    }

    pub fn directory(path: impl Into<NormalizedPath>) -> Self {
        Self::new(path, EntryKind::Directory)
    }

    /// Build an entry from what is on disk at `path`.
    ///
    /// Symlinks are followed, so a link to a layout file counts as a file.
    pub fn from_path(path: impl Into<NormalizedPath>) -> resync_fs::Result<Self> {
        let path = path.into();
        let native = path.to_native();
        let metadata = fs::metadata(&native).map_err(|e| resync_fs::Error::io(&native, e))?;
        Ok(Self::new(path, metadata.file_type().into()))
    }
}
