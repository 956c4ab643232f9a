//! On-disk pack store
//!
//! Packs live one per directory, each with a manifest file at its root:
//!
//! ```text
//! <install_root>/<name>/pack.json   installed packs
//! <source>/<name>/pack.json         available, not yet installed
//! ```
//!
//! Every lookup re-reads the manifest from disk. Nothing is cached between
//! calls so results always reflect the current state of the directories.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use pack_core::types::manifest::MANIFEST_FILE;
use pack_core::types::{InstalledPack, PackManifest};
use pack_core::utils::{is_valid_pack_name, pack_dir};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::ResolverResult;

/// Read-only view over the install root and the pack source directories
#[derive(Debug, Clone)]
pub struct PackStore {
    install_root: PathBuf,
    sources: Vec<PathBuf>,
    manifest_file: String,
}

/// A manifest found in a source directory
#[derive(Debug, Clone, PartialEq)]
pub struct SourcePack {
    pub manifest: PackManifest,
    /// Pack directory inside the source
    pub path: PathBuf,
}

impl PackStore {
    /// Create a store over an install root with no sources
    pub fn new(install_root: impl Into<PathBuf>) -> Self {
        Self {
            install_root: install_root.into(),
            sources: Vec::new(),
            manifest_file: MANIFEST_FILE.to_string(),
        }
    }

    /// Set the source directories, searched in order
    pub fn with_sources<I, P>(mut self, sources: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.sources = sources.into_iter().map(Into::into).collect();
        self
    }

    /// Use a manifest file name other than `pack.json`
    pub fn with_manifest_file(mut self, manifest_file: impl Into<String>) -> Self {
        self.manifest_file = manifest_file.into();
        self
    }

    pub fn install_root(&self) -> &Path {
        &self.install_root
    }

    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }

    pub fn manifest_file(&self) -> &str {
        &self.manifest_file
    }

    /// Directory a pack is (or would be) installed in
    pub fn install_path(&self, name: &str) -> ResolverResult<PathBuf> {
        pack_dir(&self.install_root, name)
    }

    /// Load an installed pack.
    ///
    /// Returns `None` when the pack is absent, its manifest is unreadable or
    /// invalid, or the manifest names a different pack.
    pub fn get_installed(&self, name: &str) -> Option<InstalledPack> {
        if !is_valid_pack_name(name) {
            debug!("Ignoring invalid pack name '{}'", name);
            return None;
        }
        let dir = self.install_root.join(name);
        let manifest_path = dir.join(&self.manifest_file);
        let manifest = self.read_manifest(&manifest_path, name)?;
        let installed_at = modified_time(&manifest_path);

        Some(InstalledPack::new(manifest, dir, installed_at))
    }

    /// All installed packs, sorted by name
    pub fn list_installed(&self) -> Vec<InstalledPack> {
        if !self.install_root.is_dir() {
            debug!("Install root {} does not exist", self.install_root.display());
            return Vec::new();
        }

        let mut packs: Vec<InstalledPack> = WalkDir::new(&self.install_root)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_dir())
            .filter_map(|entry| {
                let name = entry.file_name().to_str()?.to_string();
                self.get_installed(&name)
            })
            .collect();

        packs.sort_by(|a, b| a.name.cmp(&b.name));
        packs
    }

    /// Manifests for `name` across all source directories, in source order
    pub fn source_manifests(&self, name: &str) -> ResolverResult<Vec<SourcePack>> {
        let mut found = Vec::new();
        for source in &self.sources {
            let dir = pack_dir(source, name)?;
            let manifest_path = dir.join(&self.manifest_file);
            if let Some(manifest) = self.read_manifest(&manifest_path, name) {
                found.push(SourcePack { manifest, path: dir });
            }
        }
        Ok(found)
    }

    fn read_manifest(&self, path: &Path, expected_name: &str) -> Option<PackManifest> {
        if !path.is_file() {
            return None;
        }

        let manifest = match PackManifest::load(path) {
            Ok(manifest) => manifest,
            Err(e) => {
                warn!("Skipping {}: {}", path.display(), e);
                return None;
            },
        };

        if manifest.name != expected_name {
            warn!(
                "Skipping {}: manifest names '{}' but directory is '{}'",
                path.display(),
                manifest.name,
                expected_name
            );
            return None;
        }

        Some(manifest)
    }
}

fn modified_time(path: &Path) -> Option<DateTime<Utc>> {
    fs::metadata(path)
        .and_then(|meta| meta.modified())
        .ok()
        .map(DateTime::<Utc>::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pack_core::types::Version;
    use pack_core::PackError;
    use tempfile::TempDir;

    fn write_pack(root: &Path, manifest: &PackManifest) {
        let dir = root.join(&manifest.name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(MANIFEST_FILE), manifest.to_json().unwrap()).unwrap();
    }

    #[test]
    fn test_get_installed() {
        let root = TempDir::new().unwrap();
        write_pack(root.path(), &PackManifest::new("theme", Version::new(1, 2, 0)));

        let store = PackStore::new(root.path());
        let pack = store.get_installed("theme").unwrap();
        assert_eq!(pack.version, Version::new(1, 2, 0));
        assert_eq!(pack.path, root.path().join("theme"));
        assert!(pack.installed_at.is_some());

        assert!(store.get_installed("missing").is_none());
        assert!(store.get_installed("../theme").is_none());
    }

    #[test]
    fn test_get_installed_rejects_bad_manifests() {
        let root = TempDir::new().unwrap();
        let broken = root.path().join("broken");
        fs::create_dir_all(&broken).unwrap();
        fs::write(broken.join(MANIFEST_FILE), "{ not json").unwrap();

        write_pack(root.path(), &PackManifest::new("other", Version::new(1, 0, 0)));
        fs::rename(root.path().join("other"), root.path().join("renamed")).unwrap();

        let store = PackStore::new(root.path());
        assert!(store.get_installed("broken").is_none());
        assert!(store.get_installed("renamed").is_none());
    }

    #[test]
    fn test_list_installed_sorted_and_filtered() {
        let root = TempDir::new().unwrap();
        write_pack(root.path(), &PackManifest::new("zeta", Version::new(0, 1, 0)));
        write_pack(root.path(), &PackManifest::new("alpha", Version::new(2, 0, 0)));
        fs::create_dir_all(root.path().join("empty")).unwrap();
        fs::write(root.path().join("stray.txt"), "not a pack").unwrap();

        let store = PackStore::new(root.path());
        let names: Vec<_> = store.list_installed().into_iter().map(|p| p.name).collect();
        assert_eq!(names, ["alpha", "zeta"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_list_installed_follows_linked_packs() {
        let root = TempDir::new().unwrap();
        let elsewhere = TempDir::new().unwrap();
        write_pack(elsewhere.path(), &PackManifest::new("theme", Version::new(1, 0, 0)));
        write_pack(root.path(), &PackManifest::new("icons", Version::new(2, 0, 0)));
        std::os::unix::fs::symlink(elsewhere.path().join("theme"), root.path().join("theme"))
            .unwrap();

        let store = PackStore::new(root.path());
        assert!(store.get_installed("theme").is_some());

        let listed: Vec<_> = store
            .list_installed()
            .into_iter()
            .map(|p| (p.name, p.version.to_string()))
            .collect();
        assert_eq!(
            listed,
            [
                ("icons".to_string(), "2.0.0".to_string()),
                ("theme".to_string(), "1.0.0".to_string())
            ]
        );
    }

    #[test]
    fn test_list_installed_missing_root() {
        let root = TempDir::new().unwrap();
        let store = PackStore::new(root.path().join("nowhere"));
        assert!(store.list_installed().is_empty());
    }

    #[test]
    fn test_source_manifests_in_order() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        write_pack(first.path(), &PackManifest::new("theme", Version::new(1, 0, 0)));
        write_pack(second.path(), &PackManifest::new("theme", Version::new(2, 0, 0)));

        let store = PackStore::new("/unused").with_sources([first.path(), second.path()]);
        let found = store.source_manifests("theme").unwrap();
        let versions: Vec<_> = found.iter().map(|s| s.manifest.version.to_string()).collect();
        assert_eq!(versions, ["1.0.0", "2.0.0"]);
        assert_eq!(found[1].path, second.path().join("theme"));

        assert!(store.source_manifests("missing").unwrap().is_empty());
        let err = store.source_manifests("a/b").unwrap_err();
        assert!(matches!(err, PackError::InvalidPackName { .. }));
    }

    #[test]
    fn test_custom_manifest_file() {
        let root = TempDir::new().unwrap();
        let dir = root.path().join("theme");
        fs::create_dir_all(&dir).unwrap();
        let manifest = PackManifest::new("theme", Version::new(1, 0, 0));
        fs::write(dir.join("manifest.json"), manifest.to_json().unwrap()).unwrap();

        let store = PackStore::new(root.path());
        assert!(store.get_installed("theme").is_none());

        let store = store.with_manifest_file("manifest.json");
        assert_eq!(store.manifest_file(), "manifest.json");
        assert!(store.get_installed("theme").is_some());
    }
}
