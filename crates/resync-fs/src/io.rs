//! Atomic I/O operations with file locking

use std::fs::{self, OpenOptions};
use std::io::Write;
use fs2::FileExt;
use crate::{Error, NormalizedPath, Result};

/// Write content atomically to a file with locking.
///
/// Uses write-to-temp-then-rename strategy to prevent partial writes.
/// Acquires an advisory lock to prevent concurrent access.
pub fn write_atomic(path: &NormalizedPath, content: &[u8]) -> Result<()> {
    let native_path = path.to_native();

    // Ensure parent directory exists
    if let Some(parent) = native_path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    // Generate temp file path in same directory (ensures same filesystem)
    let temp_name = format!(
        ".{}.{}.tmp",
        native_path.file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default(),
        std::process::id()
    );
    let temp_path = native_path.with_file_name(&temp_name);

    let mut temp_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&temp_path)
        .map_err(|e| Error::io(&temp_path, e))?;

    temp_file.lock_exclusive()
        .map_err(|_| Error::LockFailed { path: native_path.clone() })?;

    let written = temp_file
        .write_all(content)
        .and_then(|_| temp_file.sync_all())
        .map_err(|e| Error::io(&temp_path, e));
    if let Err(e) = written {
        drop(temp_file);
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }

    temp_file.unlock()
        .map_err(|_| Error::LockFailed { path: native_path.clone() })?;
    drop(temp_file);

    // Atomic rename
    if let Err(e) = fs::rename(&temp_path, &native_path) {
        let _ = fs::remove_file(&temp_path);
        return Err(Error::io(&native_path, e));
    }

    Ok(())
}

/// Read text content from a file.
pub fn read_text(path: &NormalizedPath) -> Result<String> {
    let native_path = path.to_native();
    fs::read_to_string(&native_path)
        .map_err(|e| Error::io(&native_path, e))
}

/// Write text content to a file atomically.
pub fn write_text(path: &NormalizedPath, content: &str) -> Result<()> {
    write_atomic(path, content.as_bytes())
}

/// Rename a file or directory within its parent directory.
///
/// Renames that only change letter case go through a temporary sibling so
/// that case-insensitive filesystems actually apply them. Any other rename
/// refuses to replace an existing entry.
pub fn rename_entry(from: &NormalizedPath, to: &NormalizedPath) -> Result<()> {
    if from == to {
        return Ok(());
    }

    let from_native = from.to_native();
    let to_native = to.to_native();

    if !is_case_only(from, to) {
        if to_native.exists() {
            return Err(Error::TargetExists { path: to_native });
        }
        return fs::rename(&from_native, &to_native).map_err(|e| Error::io(&from_native, e));
    }

    let temp_name = format!(
        ".{}.{}.rename",
        to.file_name().unwrap_or_default(),
        std::process::id()
    );
    let temp_native = to.with_file_name(&temp_name).to_native();

    fs::rename(&from_native, &temp_native).map_err(|e| Error::io(&from_native, e))?;
    if let Err(e) = fs::rename(&temp_native, &to_native) {
        // Put the entry back under its old name; the caller sees the failure.
        let _ = fs::rename(&temp_native, &from_native);
        return Err(Error::io(&from_native, e));
    }

    tracing::trace!(from = %from, to = %to, "Case-only rename via temporary name");
    Ok(())
}

/// Whether `to` differs from `from` only in letter case, within the same
/// directory. Unicode-aware so that `Ä.png` and `ä.png` count as the same name.
fn is_case_only(from: &NormalizedPath, to: &NormalizedPath) -> bool {
    match (from.file_name(), to.file_name()) {
        (Some(a), Some(b)) => a.to_lowercase() == b.to_lowercase() && from.parent() == to.parent(),
        _ => false,
    }
}
