//! Filesystem primitives for resource synchronization
//!
//! Provides forward-slash normalized paths, atomic writes, case-safe renames
//! and read-only configuration loading.

pub mod checksum;
pub mod config;
pub mod error;
pub mod io;
pub mod path;

pub use config::ConfigStore;
pub use error::{Error, Result};
pub use path::NormalizedPath;
