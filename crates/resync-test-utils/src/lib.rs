//! Shared test fixtures for the resync workspace.
//!
//! A dev-dependency only, never published.
//!
//! - [`project`]: [`TestProject`] builder for an IDE project with a resource tree

pub mod project;

pub use project::TestProject;
