//! Core data types for the pack dependency engine.
//!
//! This module provides the fundamental types used throughout pack:
//! - Version types for semantic versioning
//! - Pack manifest and installed-pack structures
//! - Dependency specifications

pub mod dependency;
pub mod installed;
pub mod manifest;
pub mod version;

// Re-export all public types
pub use dependency::{Dependency, DependencyKind};
pub use installed::InstalledPack;
pub use manifest::PackManifest;
pub use version::{RangeKind, Version, VersionError, VersionRange};
