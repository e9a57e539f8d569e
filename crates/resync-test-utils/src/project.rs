//! [`TestProject`] builder for synchronization scenarios.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use resync_fs::NormalizedPath;
use resync_fs::checksum::compute_tree_checksums;
use tempfile::TempDir;

/// Default name of the project file written by [`TestProject::with_project_file`].
pub const PROJECT_FILE: &str = "App.csproj";

/// A temporary project directory with helpers for setup and assertion.
///
/// # Example
///
/// ```rust,no_run
/// use resync_test_utils::TestProject;
///
/// let project = TestProject::new()
///     .with_project_file("<Project />")
///     .with_file("Resources/layout/Main.axml", "<LinearLayout />");
/// project.assert_exists("Resources/layout/Main.axml");
/// ```
pub struct TestProject {
    temp_dir: TempDir,
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

impl TestProject {
    /// Create an empty temporary project directory.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// The classic single-layout project: `Resources/layout/Main.axml` and
    /// `Resources/drawable/Icon.png`.
    pub fn sample() -> Self {
        Self::new()
            .with_project_file(
                "<Project>\n  <ItemGroup>\n    <AndroidResource Include=\"Resources\\layout\\Main.axml\" />\n    <AndroidResource Include=\"Resources\\drawable\\Icon.png\" />\n  </ItemGroup>\n</Project>\n",
            )
            .with_file("Resources/layout/Main.axml", "<LinearLayout />")
            .with_file("Resources/drawable/Icon.png", "png")
    }

    /// Root of the temporary directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// `relative` below the root, as a native path.
    pub fn path(&self, relative: &str) -> PathBuf {
        self.root().join(relative)
    }

    /// `relative` below the root, normalized.
    pub fn normalized(&self, relative: &str) -> NormalizedPath {
        NormalizedPath::new(self.path(relative))
    }

    /// Path of the project file, whether or not it was written.
    pub fn project_file(&self) -> NormalizedPath {
        self.normalized(PROJECT_FILE)
    }

    /// Path of the descriptor that belongs to [`PROJECT_FILE`].
    pub fn descriptor(&self) -> NormalizedPath {
        self.normalized("App.android.toml")
    }

    /// Write the project file.
    pub fn with_project_file(self, content: &str) -> Self {
        self.write_file(PROJECT_FILE, content);
        self
    }

    /// Write a file, creating parent directories.
    pub fn with_file(self, relative: &str, content: &str) -> Self {
        self.write_file(relative, content);
        self
    }

    /// Create a directory and its parents.
    pub fn with_dir(self, relative: &str) -> Self {
        fs::create_dir_all(self.path(relative)).unwrap();
        self
    }

    pub fn write_file(&self, relative: &str, content: &str) {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
    }

    pub fn read_file(&self, relative: &str) -> String {
        let path = self.path(relative);
        fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("Could not read {}: {e}", path.display()))
    }

    /// Checksums of every entry in the project, keyed by relative path.
    ///
    /// Two equal snapshots mean the tree is byte-identical, names included.
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        compute_tree_checksums(self.root()).unwrap()
    }

    /// Names of the entries directly inside `relative`, sorted.
    ///
    /// Unlike [`Path::exists`] this sees the exact case on case-insensitive
    /// filesystems.
    pub fn list(&self, relative: &str) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(self.path(relative))
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    /// Assert that `relative` exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_exists(&self, relative: &str) {
        let path = self.path(relative);
        assert!(path.exists(), "Expected path to exist: {}", path.display());
    }

    /// Assert that the file at `relative` contains `content`.
    ///
    /// # Panics
    /// Panics if the file cannot be read or does not contain `content`.
    pub fn assert_file_contains(&self, relative: &str, content: &str) {
        let actual = self.read_file(relative);
        assert!(
            actual.contains(content),
            "File {relative} does not contain expected content.\nExpected: {content}\nActual: {actual}"
        );
    }
}
