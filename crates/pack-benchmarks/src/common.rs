//! Common utilities for benchmarks

use std::fs;
use std::path::Path;

use criterion::Criterion;
use pack_core::types::manifest::MANIFEST_FILE;
use pack_core::types::{PackManifest, Version};
use pack_resolver::{DependencyResolver, PackStore};
use tempfile::TempDir;

/// Shared criterion settings
pub fn criterion_config() -> Criterion {
    Criterion::default()
        .warm_up_time(std::time::Duration::from_secs(3))
        .measurement_time(std::time::Duration::from_secs(10))
        .sample_size(100)
}

/// A generated pack graph on disk
pub struct PackGraph {
    pub installed: TempDir,
    pub source: TempDir,
}

impl PackGraph {
    pub fn resolver(&self) -> DependencyResolver {
        DependencyResolver::new(
            PackStore::new(self.installed.path()).with_sources([self.source.path()]),
        )
    }
}

/// Name of the `index`th generated pack
pub fn pack_name(index: usize) -> String {
    format!("pack-{:04}", index)
}

/// Layered graph: `root` depends on the first layer, and every pack in a
/// layer depends on every pack of the next one. Every other pack is
/// installed; the rest only exist in the source.
pub fn layered_graph(layers: usize, width: usize) -> std::io::Result<PackGraph> {
    let graph = PackGraph {
        installed: TempDir::new()?,
        source: TempDir::new()?,
    };

    let layer_names = |layer: usize| -> Vec<String> {
        (0..width).map(|i| pack_name(layer * width + i)).collect()
    };

    let mut root = PackManifest::new("root", Version::new(1, 0, 0));
    if layers > 0 {
        for name in layer_names(0) {
            root = root.with_dependency(name, "^1.0.0");
        }
    }
    write_manifest(graph.source.path(), &root)?;

    for layer in 0..layers {
        for (i, name) in layer_names(layer).into_iter().enumerate() {
            let mut manifest = PackManifest::new(name, Version::new(1, (layer % 5) as u64, i as u64));
            if layer + 1 < layers {
                for dep in layer_names(layer + 1) {
                    manifest = manifest.with_dependency(dep, "^1.0.0");
                }
            }
            let dir = if i % 2 == 0 {
                graph.installed.path()
            } else {
                graph.source.path()
            };
            write_manifest(dir, &manifest)?;
        }
    }

    Ok(graph)
}

pub fn write_manifest(root: &Path, manifest: &PackManifest) -> std::io::Result<()> {
    let dir = root.join(&manifest.name);
    fs::create_dir_all(&dir)?;
    let json = serde_json::to_string_pretty(manifest)?;
    fs::write(dir.join(MANIFEST_FILE), json)
}

/// Version strings with a mix of prereleases and build metadata
pub fn sample_versions(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| match i % 4 {
            0 => format!("{}.{}.{}", i % 7, i % 13, i),
            1 => format!("{}.{}.{}-alpha.{}", i % 7, i % 13, i, i % 3),
            2 => format!("{}.{}.{}-rc.{}+build.{}", i % 7, i % 13, i, i % 5, i),
            _ => format!("{}.0.{}-beta", i % 7, i),
        })
        .collect()
}
