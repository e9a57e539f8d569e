//! Error types for resync-core

use resync_fs::NormalizedPath;

/// Result type for resync-core operations
pub type Result<T> = std::result::Result<T, SyncError>;

/// When a rename failure was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenamePhase {
    /// Detected while planning; nothing on disk was touched.
    Planning,
    /// Detected while applying; `applied` renames already happened and stay.
    Applying { applied: usize },
}

/// Errors that can end a synchronization run
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// The external build descriptor (or the project file) could not be edited.
    ///
    /// `renames_applied` counts the renames this run had already made on disk.
    #[error("Descriptor edit failed: {reason}")]
    DescriptorEditFailed {
        reason: String,
        renames_applied: usize,
    },

    /// A resource entry could not be renamed to its normalized form
    #[error("Renaming {path} to lowercase failed: {reason}")]
    RenameFailed {
        path: NormalizedPath,
        reason: String,
        phase: RenamePhase,
    },

    /// The user declined or aborted the run
    #[error("Synchronization cancelled")]
    Cancelled,

    /// No external tool path was configured
    #[error("External tool path is not configured")]
    MissingToolPath,

    /// Anything not covered above
    #[error("General failure: {reason}")]
    Unknown { reason: String },
}

impl SyncError {
    pub fn descriptor(reason: impl Into<String>) -> Self {
        Self::DescriptorEditFailed {
            reason: reason.into(),
            renames_applied: 0,
        }
    }

    pub fn collision(path: NormalizedPath, reason: impl Into<String>) -> Self {
        Self::RenameFailed {
            path,
            reason: reason.into(),
            phase: RenamePhase::Planning,
        }
    }

    pub fn unknown(reason: impl Into<String>) -> Self {
        Self::Unknown {
            reason: reason.into(),
        }
    }

    /// Mark a descriptor failure as happening after `applied` renames.
    pub fn after_renames(self, applied: usize) -> Self {
        match self {
            Self::DescriptorEditFailed { reason, .. } if applied > 0 => {
                Self::DescriptorEditFailed {
                    reason,
                    renames_applied: applied,
                }
            }
            other => other,
        }
    }

    /// Whether the run stopped before touching anything on disk, so running
    /// it again (after fixing the cause) starts from a clean state.
    ///
    /// Rename failures during application leave a partially renamed resource
    /// tree behind. Descriptor or project file failures after renames leave
    /// renamed files whose references have not caught up yet.
    pub fn is_retry_safe(&self) -> bool {
        match self {
            Self::RenameFailed {
                phase: RenamePhase::Applying { .. },
                ..
            } => false,
            Self::DescriptorEditFailed {
                renames_applied, ..
            } => *renames_applied == 0,
            _ => true,
        }
    }
}

impl From<resync_fs::Error> for SyncError {
    fn from(err: resync_fs::Error) -> Self {
        Self::unknown(err.to_string())
    }
}
