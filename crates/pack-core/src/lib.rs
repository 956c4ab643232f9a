//! # pack-core
//!
//! Core types and utilities shared across all pack crates.
//!
//! This crate provides:
//! - `Version` and `VersionRange` types with semver 2.0.0 ordering
//! - `PackManifest`, `InstalledPack` and `Dependency` types
//! - `PackError` enum for unified error handling
//! - Path helpers for locating packs on disk
//!
//! ## Architecture
//!
//! The crate is organized into modules:
//! - `types`: Core data types (Version, PackManifest, etc.)
//! - `error`: Error types and result aliases
//! - `utils`: Utility functions and helpers

pub mod error;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use error::{PackError, PackResult};
pub use types::{
    Dependency, DependencyKind, InstalledPack, PackManifest, RangeKind, Version, VersionError,
    VersionRange,
};
