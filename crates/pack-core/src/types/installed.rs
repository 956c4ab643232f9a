//! Installed pack view.
//!
//! An `InstalledPack` is a read-only observation of a pack directory found
//! under the installation root. It is built by scanning the disk and never
//! mutated by the resolver.

use super::{PackManifest, Version};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;

/// A manifest observed on disk under the installation root
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstalledPack {
    pub name: String,
    pub version: Version,
    /// Pack directory
    pub path: PathBuf,
    pub manifest: PackManifest,
    /// Modification time of the manifest file, when the filesystem reports one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub installed_at: Option<DateTime<Utc>>,
}

impl InstalledPack {
    /// Wrap a manifest found in `path`
    pub fn new(manifest: PackManifest, path: PathBuf, installed_at: Option<DateTime<Utc>>) -> Self {
        Self {
            name: manifest.name.clone(),
            version: manifest.version.clone(),
            path,
            manifest,
            installed_at,
        }
    }
}
