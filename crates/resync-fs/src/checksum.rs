//! SHA-256 checksum utilities
//!
//! Checksums use the canonical `sha256:<hex>` form. Tree checksums snapshot
//! every entry name and file body under a directory, which lets callers
//! assert that a run left the tree untouched.

use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Prefix for all checksums produced by this module
const PREFIX: &str = "sha256:";

/// Compute the SHA-256 checksum of byte content.
pub fn compute_content_checksum(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("{}{:x}", PREFIX, hasher.finalize())
}

/// Compute the SHA-256 checksum of a file's contents.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn compute_file_checksum(path: &Path) -> std::io::Result<String> {
    let content = fs::read(path)?;
    Ok(compute_content_checksum(&content))
}

/// Checksum every entry below `root`, keyed by forward-slash relative path.
///
/// Directories map to the empty string so that renamed or added directories
/// show up in a comparison as well.
pub fn compute_tree_checksums(root: &Path) -> std::io::Result<BTreeMap<String, String>> {
    let mut out = BTreeMap::new();
    collect(root, root, &mut out)?;
    Ok(out)
}

fn collect(root: &Path, dir: &Path, out: &mut BTreeMap<String, String>) -> std::io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let relative = path
            .strip_prefix(root)
            .unwrap_or(&path)
            .to_string_lossy()
            .replace('\\', "/");
        if entry.file_type()?.is_dir() {
            out.insert(relative, String::new());
            collect(root, &path, out)?;
        } else {
            out.insert(relative, compute_file_checksum(&path)?);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_checksum_known_value() {
        let checksum = compute_content_checksum(b"hello world");
        assert_eq!(
            checksum,
            "sha256:b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }

    #[test]
    fn file_checksum_matches_content_checksum() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.txt");
        std::fs::write(&path, "hello world").unwrap();

        let file_cs = compute_file_checksum(&path).unwrap();
        let content_cs = compute_content_checksum(b"hello world");
        assert_eq!(file_cs, content_cs);
    }

    #[test]
    fn tree_checksums_include_directories() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("a/b")).unwrap();
        std::fs::write(dir.path().join("a/b/c.txt"), "c").unwrap();

        let sums = compute_tree_checksums(dir.path()).unwrap();
        assert_eq!(sums.get("a").map(String::as_str), Some(""));
        assert_eq!(sums.get("a/b").map(String::as_str), Some(""));
        assert!(sums["a/b/c.txt"].starts_with("sha256:"));
    }
}
