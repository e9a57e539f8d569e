//! Names and extensions shared by the resource workflow.

/// Resource root directory, relative to the project file's directory.
pub const RESOURCES_DIR: &str = "Resources";

/// IDE-specific layout extension that the native toolchain does not accept.
pub const LEGACY_EXTENSION: &str = "axml";

/// Extension the native toolchain expects for markup resources.
pub const CANONICAL_EXTENSION: &str = "xml";

/// Suffix appended to the project file stem to name the external descriptor.
pub const DESCRIPTOR_SUFFIX: &str = ".android.toml";

/// File extensions that make a selected file a sync candidate.
pub const MARKUP_EXTENSIONS: &[&str] = &[LEGACY_EXTENSION, CANONICAL_EXTENSION];

/// Directory names that make a selected directory a sync candidate.
pub const RESOURCE_FOLDERS: &[&str] = &[
    RESOURCES_DIR,
    "drawable",
    "layout",
    "values",
    "animator",
    "anim",
    "color",
    "menu",
    "raw",
    "xml",
];
