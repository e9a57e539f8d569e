//! Resource synchronization between IDE projects and native Android projects
//!
//! When a resource file under a project's `Resources` directory changes, the
//! native Android toolchain needs two things before it can pick it up:
//!
//! - **Normalized names**: every file and directory name lowercase, and
//!   `.axml` layouts renamed to `.xml`
//! - **An up-to-date descriptor**: the external build descriptor next to the
//!   project file lists the resource tree
//!
//! # Architecture
//!
//! ```text
//!                  SyncOrchestrator
//!                         |
//!     +----------+--------+-------+--------------+
//!     |          |                |              |
//! classifier  normalizer     ConsentGate   ProjectDescriptorSync
//!                 |                              |
//!             project_file                   resync-fs
//! ```
//!
//! # Example
//!
//! ```no_run
//! use resync_core::{ResourceEntry, StaticConsent, SyncConfig, SyncOrchestrator, SyncRequest};
//!
//! # async fn run() -> resync_core::Result<()> {
//! let orchestrator = SyncOrchestrator::new(
//!     SyncConfig::new("/opt/android-studio/bin/studio.sh"),
//!     StaticConsent::granted(),
//! );
//! let request = SyncRequest::new(
//!     "/work/App/App.csproj",
//!     ResourceEntry::file("/work/App/Resources/layout/Main.axml"),
//! );
//! let outcome = orchestrator.execute(&request).await?;
//! println!("{outcome:?}");
//! # Ok(())
//! # }
//! ```

pub mod classifier;
pub mod consent;
pub mod constants;
pub mod descriptor;
pub mod entry;
pub mod error;
pub mod normalizer;
pub mod orchestrator;
pub mod project;
pub mod project_file;
pub mod tree;

pub use classifier::{is_sync_candidate, is_sync_selection};
pub use consent::{ConsentGate, StaticConsent};
pub use descriptor::ProjectDescriptorSync;
pub use entry::{EntryKind, ResourceEntry};
pub use error::{RenamePhase, Result, SyncError};
pub use normalizer::{CaseNormalizer, RenameOp, RenamePlan, normalized_name};
pub use orchestrator::{
    SyncConfig, SyncOrchestrator, SyncOutcome, SyncPreview, SyncRequest, SyncResult, SyncState,
};
pub use project::ProjectLayout;
pub use tree::ResourceTreeNode;
