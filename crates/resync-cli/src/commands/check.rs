//! Check command implementation

use std::path::Path;

use colored::Colorize;
use resync_core::{ResourceEntry, is_sync_candidate};

use super::resolve_path;
use crate::error::Result;

/// Report whether `path` would trigger a synchronization.
pub fn run_check(path: &Path) -> Result<bool> {
    let entry = ResourceEntry::from_path(resolve_path(path)?)?;
    let candidate = is_sync_candidate(&entry);

    if candidate {
        println!("{} {} is a resource sync candidate", "OK".green().bold(), entry.path);
    } else {
        println!("{} {} is not a resource sync candidate", "--".dimmed(), entry.path);
    }
    Ok(candidate)
}
