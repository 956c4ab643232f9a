//! Installed dependency tree
//!
//! Tree building is a traversal separate from resolution. It only follows
//! packs that are installed and never consults pack sources.
//!
//! Cycles are cut per branch: every child receives its own copy of the set
//! of names on the path from the root, so a pack reachable from two siblings
//! is rendered in full under both, while a pack that reappears below itself
//! becomes a leaf marked `circular`.

use std::collections::HashSet;

use pack_core::error::PackError;
use pack_core::types::{DependencyKind, InstalledPack, Version};
use serde::Serialize;
use tracing::debug;

use crate::resolver::DependencyResolver;
use crate::ResolverResult;

/// A node of the installed dependency tree
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DependencyNode {
    pub name: String,
    pub version: Version,
    pub children: Vec<DependencyNode>,
    /// Distance from the root (root is 0)
    pub depth: usize,
    /// Declared under `optionalDependencies` by the parent
    pub optional: bool,
    /// Declared under `peerDependencies` by the parent; never expanded
    pub peer: bool,
    /// Already on the path from the root; not expanded again
    pub circular: bool,
}

impl DependencyNode {
    fn leaf(pack: &InstalledPack, depth: usize) -> Self {
        Self {
            name: pack.name.clone(),
            version: pack.version.clone(),
            children: Vec::new(),
            depth,
            optional: false,
            peer: false,
            circular: false,
        }
    }

    /// Number of nodes in this subtree, including itself
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(DependencyNode::node_count).sum::<usize>()
    }

    /// Depth of the deepest node in this subtree
    pub fn max_depth(&self) -> usize {
        self.children
            .iter()
            .map(DependencyNode::max_depth)
            .max()
            .unwrap_or(self.depth)
    }

    /// Direct child by name
    pub fn child(&self, name: &str) -> Option<&DependencyNode> {
        self.children.iter().find(|child| child.name == name)
    }
}

impl DependencyResolver {
    /// Build the dependency tree of an installed pack.
    ///
    /// Dependencies that are not installed are left out. Fails with
    /// `NotInstalled` when `name` itself is not installed.
    pub fn build_tree(&self, name: &str) -> ResolverResult<DependencyNode> {
        let root = self
            .get_installed(name)
            .ok_or_else(|| PackError::NotInstalled {
                name: name.to_string(),
            })?;

        Ok(self.build_node(&root, 0, HashSet::new()))
    }

    fn build_node(
        &self,
        pack: &InstalledPack,
        depth: usize,
        mut path: HashSet<String>,
    ) -> DependencyNode {
        let mut node = DependencyNode::leaf(pack, depth);

        if !path.insert(pack.name.clone()) {
            debug!("Cycle at {}, not expanding", pack.name);
            node.circular = true;
            return node;
        }

        for kind in [DependencyKind::Required, DependencyKind::Optional] {
            for dep_name in pack.manifest.section(kind).keys() {
                let Some(child) = self.get_installed(dep_name) else {
                    debug!("{} is not installed, omitted from tree", dep_name);
                    continue;
                };
                let mut child_node = self.build_node(&child, depth + 1, path.clone());
                child_node.optional = kind.is_optional();
                node.children.push(child_node);
            }
        }

        for dep_name in pack.manifest.peer_dependencies.keys() {
            if let Some(peer) = self.get_installed(dep_name) {
                let mut peer_node = DependencyNode::leaf(&peer, depth + 1);
                peer_node.peer = true;
                node.children.push(peer_node);
            }
        }

        node
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::installed::PackStore;
    use pack_core::types::manifest::MANIFEST_FILE;
    use pack_core::types::PackManifest;
    use std::fs;
    use tempfile::TempDir;

    fn install(root: &TempDir, manifest: PackManifest) {
        let dir = root.path().join(&manifest.name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(MANIFEST_FILE), manifest.to_json().unwrap()).unwrap();
    }

    fn pack(name: &str) -> PackManifest {
        PackManifest::new(name, Version::new(1, 0, 0))
    }

    fn resolver(root: &TempDir) -> DependencyResolver {
        DependencyResolver::new(PackStore::new(root.path()))
    }

    #[test]
    fn test_build_tree() {
        let root = TempDir::new().unwrap();
        install(
            &root,
            pack("app")
                .with_dependency("ui", "^1.0.0")
                .with_optional("charts", "*")
                .with_dependency("missing", "*")
                .with_peer("host", "*"),
        );
        install(&root, pack("ui").with_dependency("tokens", "*"));
        install(&root, pack("charts"));
        install(&root, pack("tokens"));
        install(&root, pack("host").with_dependency("tokens", "*"));

        let tree = resolver(&root).build_tree("app").unwrap();

        assert_eq!(tree.depth, 0);
        let names: Vec<_> = tree.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["ui", "charts", "host"]);

        let ui = tree.child("ui").unwrap();
        assert_eq!(ui.depth, 1);
        assert_eq!(ui.child("tokens").unwrap().depth, 2);
        assert!(tree.child("charts").unwrap().optional);

        let host = tree.child("host").unwrap();
        assert!(host.peer);
        assert!(host.children.is_empty());

        assert_eq!(tree.node_count(), 5);
        assert_eq!(tree.max_depth(), 2);
    }

    #[test]
    fn test_cycle_cut_per_branch() {
        let root = TempDir::new().unwrap();
        install(&root, pack("a").with_dependency("b", "*").with_dependency("c", "*"));
        install(&root, pack("b").with_dependency("shared", "*"));
        install(&root, pack("c").with_dependency("shared", "*"));
        install(&root, pack("shared").with_dependency("a", "*"));

        let tree = resolver(&root).build_tree("a").unwrap();

        // shared is expanded under both siblings
        for parent in ["b", "c"] {
            let shared = tree.child(parent).unwrap().child("shared").unwrap();
            let back = shared.child("a").unwrap();
            assert!(back.circular);
            assert!(back.children.is_empty());
            assert_eq!(back.depth, 3);
        }
        assert!(!tree.circular);
        assert_eq!(tree.node_count(), 7);
    }

    #[test]
    fn test_self_dependency() {
        let root = TempDir::new().unwrap();
        install(&root, pack("loop").with_dependency("loop", "*"));

        let tree = resolver(&root).build_tree("loop").unwrap();
        assert_eq!(tree.children.len(), 1);
        assert!(tree.children[0].circular);
    }

    #[test]
    fn test_not_installed() {
        let root = TempDir::new().unwrap();
        let err = resolver(&root).build_tree("ghost").unwrap_err();
        assert!(matches!(err, PackError::NotInstalled { ref name } if name == "ghost"));
    }

    #[test]
    fn test_tree_serializes() {
        let root = TempDir::new().unwrap();
        install(&root, pack("app"));

        let tree = resolver(&root).build_tree("app").unwrap();
        let json = serde_json::to_value(&tree).unwrap();
        assert_eq!(json["version"], "1.0.0");
        assert_eq!(json["children"].as_array().unwrap().len(), 0);
    }
}
