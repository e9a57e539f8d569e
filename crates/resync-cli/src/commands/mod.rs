//! Command implementations

pub mod check;
pub mod plan;
pub mod sync;

pub use check::run_check;
pub use plan::run_plan;
pub use sync::{SyncArgs, run_sync};

use std::path::Path;

use resync_core::SyncConfig;
use resync_fs::{ConfigStore, NormalizedPath};

use crate::error::{CliError, Result};

/// Resolve a user-supplied path to an absolute, normalized one.
pub(crate) fn resolve_path(path: &Path) -> Result<NormalizedPath> {
    let canonical = dunce::canonicalize(path)
        .map_err(|e| CliError::user(format!("{}: {}", path.display(), e)))?;
    Ok(NormalizedPath::new(canonical))
}

/// Settings from `--config`, with `--tool` taking precedence.
pub(crate) fn load_config(config: Option<&Path>, tool: Option<String>) -> Result<SyncConfig> {
    let mut loaded = match config {
        Some(path) => ConfigStore::new().load::<SyncConfig>(&NormalizedPath::new(path))?,
        None => SyncConfig::default(),
    };
    if let Some(tool) = tool {
        loaded.tool_path = tool;
    }
    tracing::debug!(tool_path = %loaded.tool_path, "Resolved configuration");
    Ok(loaded)
}
