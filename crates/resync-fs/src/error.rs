//! Error types for resync-fs

use std::path::PathBuf;

/// Result type for resync-fs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in resync-fs operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {format} config at {path}: {message}")]
    ConfigParse {
        path: PathBuf,
        format: String,
        message: String,
    },

    #[error("Unsupported config format: {extension}")]
    UnsupportedFormat { extension: String },

    #[error("Rename target already exists: {path}")]
    TargetExists { path: PathBuf },

    #[error("Lock acquisition failed for {path}")]
    LockFailed { path: PathBuf },

    #[error("File name is not valid UTF-8: {}", path.display())]
    NonUtf8Name { path: PathBuf },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// The path this error refers to, when there is one.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::Io { path, .. }
            | Self::ConfigParse { path, .. }
            | Self::TargetExists { path }
            | Self::LockFailed { path }
            | Self::NonUtf8Name { path } => Some(path),
            Self::UnsupportedFormat { .. } => None,
        }
    }
}
