//! Pack manifest types.
//!
//! A manifest is the `pack.json` file at the root of every pack directory.
//! It declares the pack's identity and what it requires from other packs.

use super::{Dependency, DependencyKind, Version};
use crate::error::{PackError, PackResult};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default manifest file name inside a pack directory
pub const MANIFEST_FILE: &str = "pack.json";

/// Declared identity and requirements of a pack
///
/// Dependency maps keep declaration order so that resolution visits edges
/// in the order the author wrote them. Unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackManifest {
    /// Pack name (required)
    pub name: String,

    /// Pack version (required)
    pub version: Version,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Required dependencies: name -> range
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub dependencies: IndexMap<String, String>,

    /// Peer dependencies: name -> range
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub peer_dependencies: IndexMap<String, String>,

    /// Optional dependencies: name -> range
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub optional_dependencies: IndexMap<String, String>,

    /// Declared incompatibilities: name -> conflicting range
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub conflicts: IndexMap<String, String>,

    /// Capabilities contributed by this pack, by category
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub provides: IndexMap<String, Vec<String>>,

    /// Runtime requirements: runtime name -> range
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub engines: IndexMap<String, String>,
}

impl PackManifest {
    /// Create a manifest with required fields only
    pub fn new(name: impl Into<String>, version: Version) -> Self {
        Self {
            name: name.into(),
            version,
            description: None,
            dependencies: IndexMap::new(),
            peer_dependencies: IndexMap::new(),
            optional_dependencies: IndexMap::new(),
            conflicts: IndexMap::new(),
            provides: IndexMap::new(),
            engines: IndexMap::new(),
        }
    }

    /// Parse manifest JSON; `origin` names the source in error messages
    pub fn from_json(content: &str, origin: &str) -> PackResult<Self> {
        let manifest: PackManifest =
            serde_json::from_str(content).map_err(|e| PackError::ManifestParse {
                path: origin.to_string(),
                message: e.to_string(),
            })?;

        if manifest.name.trim().is_empty() {
            return Err(PackError::ManifestParse {
                path: origin.to_string(),
                message: "field 'name' must not be empty".to_string(),
            });
        }

        Ok(manifest)
    }

    /// Read and parse a manifest file
    pub fn load(path: &Path) -> PackResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| PackError::io(format!("Failed to read {}", path.display()), e))?;
        Self::from_json(&content, &path.display().to_string())
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json(&self) -> PackResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| PackError::ManifestParse {
            path: self.name.clone(),
            message: e.to_string(),
        })
    }

    /// Raw declaration map for a dependency section
    pub fn section(&self, kind: DependencyKind) -> &IndexMap<String, String> {
        match kind {
            DependencyKind::Required => &self.dependencies,
            DependencyKind::Optional => &self.optional_dependencies,
            DependencyKind::Peer => &self.peer_dependencies,
        }
    }

    /// Dependencies declared in one section, in declaration order
    pub fn declared(&self, kind: DependencyKind) -> impl Iterator<Item = Dependency> + '_ {
        self.section(kind)
            .iter()
            .map(move |(name, range)| Dependency::with_kind(name.as_str(), range.as_str(), kind))
    }

    /// Builder-style helper to declare a required dependency
    pub fn with_dependency(mut self, name: impl Into<String>, range: impl Into<String>) -> Self {
        self.dependencies.insert(name.into(), range.into());
        self
    }

    /// Builder-style helper to declare an optional dependency
    pub fn with_optional(mut self, name: impl Into<String>, range: impl Into<String>) -> Self {
        self.optional_dependencies.insert(name.into(), range.into());
        self
    }

    /// Builder-style helper to declare a peer dependency
    pub fn with_peer(mut self, name: impl Into<String>, range: impl Into<String>) -> Self {
        self.peer_dependencies.insert(name.into(), range.into());
        self
    }

    /// Builder-style helper to declare an incompatibility
    pub fn with_conflict(mut self, name: impl Into<String>, range: impl Into<String>) -> Self {
        self.conflicts.insert(name.into(), range.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_parse_full_manifest() {
        let json = r#"{
            "name": "ui-kit",
            "version": "2.1.0",
            "description": "Shared components",
            "dependencies": { "tokens": "^1.0.0", "icons": "~3.2.0" },
            "peerDependencies": { "runtime": ">=4.0.0" },
            "optionalDependencies": { "charts": "*" },
            "conflicts": { "legacy-ui": "<2.0.0" },
            "provides": { "skills": ["layout", "forms"], "agents": [] },
            "engines": { "node": ">=18.0.0" },
            "homepage": "ignored"
        }"#;

        let manifest = PackManifest::from_json(json, "ui-kit/pack.json").unwrap();
        assert_eq!(manifest.name, "ui-kit");
        assert_eq!(manifest.version, Version::from_str("2.1.0").unwrap());
        assert_eq!(manifest.dependencies.len(), 2);
        assert_eq!(manifest.conflicts["legacy-ui"], "<2.0.0");
        assert_eq!(manifest.provides["skills"], ["layout", "forms"]);
        assert!(!manifest.provides.contains_key("hooks"));
        assert_eq!(manifest.engines["node"], ">=18.0.0");

        // Declaration order is preserved
        let names: Vec<_> = manifest
            .declared(DependencyKind::Required)
            .map(|d| d.name)
            .collect();
        assert_eq!(names, ["tokens", "icons"]);

        let peers: Vec<_> = manifest.declared(DependencyKind::Peer).collect();
        assert_eq!(peers, [Dependency::peer("runtime", ">=4.0.0")]);
    }

    #[test]
    fn test_minimal_manifest() {
        let manifest = PackManifest::from_json(r#"{"name":"a","version":"0.1.0"}"#, "a").unwrap();
        assert!(manifest.dependencies.is_empty());
        assert!(manifest.peer_dependencies.is_empty());
        assert!(manifest.description.is_none());
    }

    #[test]
    fn test_invalid_manifests() {
        let cases = [
            r#"{"version":"1.0.0"}"#,
            r#"{"name":"a"}"#,
            r#"{"name":"a","version":"1.0"}"#,
            r#"{"name":"","version":"1.0.0"}"#,
            r#"{"name":"a","version":"1.0.0","dependencies":["b"]}"#,
            "not json",
        ];
        for json in cases {
            let err = PackManifest::from_json(json, "pack.json").unwrap_err();
            assert!(matches!(err, PackError::ManifestParse { .. }), "{}", json);
        }
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(MANIFEST_FILE);
        let manifest = PackManifest::new("writer", Version::new(1, 0, 0))
            .with_dependency("reader", "^1.0.0")
            .with_peer("host", ">=2.0.0");
        std::fs::write(&path, manifest.to_json().unwrap()).unwrap();

        let loaded = PackManifest::load(&path).unwrap();
        assert_eq!(loaded, manifest);

        let missing = PackManifest::load(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(missing, PackError::Io { .. }));
    }
}
