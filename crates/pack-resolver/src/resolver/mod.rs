//! Dependency resolution
//!
//! Walks the manifest graph depth-first from a target pack. Resolution state
//! lives in a [`ResolutionContext`] threaded through the recursion and is
//! created fresh for every call.
//!
//! A pack name is resolved at most once per call. Later requests for the same
//! name are only checked for compatibility with the first one (first wins),
//! and its manifest is not expanded a second time, which is what keeps cyclic
//! graphs finite.

use std::path::PathBuf;

use indexmap::IndexSet;
use pack_core::error::PackError;
use pack_core::types::{Dependency, DependencyKind, InstalledPack, PackManifest, Version};
use tracing::{debug, info, warn};

use crate::installed::PackStore;
use crate::plan::{
    ConflictKind, InstallationAction, InstallationPlan, ResolvedDependency, VersionConflict,
};
use crate::semver::Requirement;
use crate::ResolverResult;

/// Options controlling a single resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Resolve `optionalDependencies`
    pub allow_optional: bool,
    /// Check `peerDependencies` against installed packs
    pub allow_peer: bool,
    /// Manifests deeper than this are not expanded
    pub max_depth: usize,
    /// Check duplicate requests by exact range intersection
    pub strict_ranges: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            allow_optional: true,
            allow_peer: true,
            max_depth: 10,
            strict_ranges: false,
        }
    }
}

/// Resolves packs from a [`PackStore`] into installation plans
#[derive(Debug, Clone)]
pub struct DependencyResolver {
    store: PackStore,
}

/// Where a pack was found and which manifest to use
#[derive(Debug)]
struct Located {
    manifest: PackManifest,
    path: PathBuf,
    installed_version: Option<Version>,
    is_installed: bool,
}

/// Mutable state of one resolution call
#[derive(Debug)]
struct ResolutionContext {
    root_name: String,
    root_version: Version,
    resolved: Vec<ResolvedDependency>,
    conflicts: Vec<VersionConflict>,
    visited: IndexSet<String>,
}

#[derive(Debug, Clone, Copy)]
struct Checkpoint {
    resolved: usize,
    conflicts: usize,
    visited: usize,
}

impl ResolutionContext {
    fn new(root_name: &str, root_version: Version) -> Self {
        let mut visited = IndexSet::new();
        visited.insert(root_name.to_string());
        Self {
            root_name: root_name.to_string(),
            root_version,
            resolved: Vec::new(),
            conflicts: Vec::new(),
            visited,
        }
    }

    fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            resolved: self.resolved.len(),
            conflicts: self.conflicts.len(),
            visited: self.visited.len(),
        }
    }

    /// Discard everything recorded since `checkpoint`
    fn rollback(&mut self, checkpoint: Checkpoint) {
        self.resolved.truncate(checkpoint.resolved);
        self.conflicts.truncate(checkpoint.conflicts);
        self.visited.truncate(checkpoint.visited);
    }
}

impl DependencyResolver {
    pub fn new(store: PackStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &PackStore {
        &self.store
    }

    /// Load one installed pack; `None` when absent or unreadable
    pub fn get_installed(&self, name: &str) -> Option<InstalledPack> {
        self.store.get_installed(name)
    }

    /// All installed packs with a valid manifest, sorted by name
    pub fn list_installed(&self) -> Vec<InstalledPack> {
        self.store.list_installed()
    }

    /// Conflicts recorded while the plan was resolved
    pub fn check_conflicts<'a>(&self, plan: &'a InstallationPlan) -> &'a [VersionConflict] {
        &plan.conflicts
    }

    /// Resolve `name` at `range` (`*` for any version) into an installation plan.
    ///
    /// Fails when a range is malformed, or when the target or a required
    /// dependency cannot be found at an acceptable version. Everything else
    /// is recorded in [`InstallationPlan::conflicts`].
    pub fn resolve(
        &self,
        name: &str,
        range: &str,
        options: &ResolveOptions,
    ) -> ResolverResult<InstallationPlan> {
        let requirement = Requirement::parse(range)?;
        let target = self.locate(name, &requirement)?;
        debug!(
            "Resolving {}@{} from {}",
            name,
            target.manifest.version,
            target.path.display()
        );

        let mut ctx = ResolutionContext::new(name, target.manifest.version.clone());
        self.resolve_manifest(&target.manifest, 0, options, &mut ctx)?;

        let mut actions = Vec::with_capacity(ctx.resolved.len() + 1);
        actions.push(InstallationAction::new(
            name,
            target.manifest.version.clone(),
            target.installed_version,
            target.path,
        ));
        actions.extend(ctx.resolved.iter().map(|dep| {
            InstallationAction::new(
                dep.name.as_str(),
                dep.version.clone(),
                dep.installed_version.clone(),
                dep.path.clone(),
            )
        }));

        info!(
            "Resolved {}@{}: {} dependencies, {} conflicts",
            name,
            target.manifest.version,
            ctx.resolved.len(),
            ctx.conflicts.len()
        );

        Ok(InstallationPlan {
            target: name.to_string(),
            version: target.manifest.version,
            dependencies: ctx.resolved,
            conflicts: ctx.conflicts,
            actions,
        })
    }

    /// Find a manifest for `name` whose version satisfies `requirement`.
    /// The installed pack is preferred, then each source in order.
    fn locate(&self, name: &str, requirement: &Requirement) -> ResolverResult<Located> {
        let install_path = self.store.install_path(name)?;
        let installed = self.store.get_installed(name);

        if let Some(pack) = &installed {
            if requirement.matches(&pack.version) {
                return Ok(Located {
                    manifest: pack.manifest.clone(),
                    path: pack.path.clone(),
                    installed_version: Some(pack.version.clone()),
                    is_installed: true,
                });
            }
        }

        let sources = self.store.source_manifests(name)?;
        let installed_version = installed.map(|pack| pack.version);

        let found: Vec<String> = installed_version
            .iter()
            .chain(sources.iter().map(|source| &source.manifest.version))
            .map(ToString::to_string)
            .collect();

        if let Some(source) = sources
            .into_iter()
            .find(|source| requirement.matches(&source.manifest.version))
        {
            debug!("Found {}@{} in {}", name, source.manifest.version, source.path.display());
            return Ok(Located {
                manifest: source.manifest,
                path: install_path,
                installed_version,
                is_installed: false,
            });
        }

        if found.is_empty() {
            Err(PackError::PackNotFound {
                name: name.to_string(),
            })
        } else {
            Err(PackError::VersionMismatch {
                name: name.to_string(),
                required: requirement.to_string(),
                found: found.join(", "),
            })
        }
    }

    /// Resolve every edge declared by `manifest`, which sits at `depth`
    fn resolve_manifest(
        &self,
        manifest: &PackManifest,
        depth: usize,
        options: &ResolveOptions,
        ctx: &mut ResolutionContext,
    ) -> ResolverResult<()> {
        if depth > options.max_depth {
            if !manifest.dependencies.is_empty() || !manifest.optional_dependencies.is_empty() {
                warn!(
                    "Maximum depth {} exceeded at {}@{}, not resolving its dependencies",
                    options.max_depth, manifest.name, manifest.version
                );
            }
            return Ok(());
        }

        for dep in manifest.declared(DependencyKind::Required) {
            self.resolve_edge(manifest, &dep, depth, options, ctx)?;
        }

        if options.allow_optional {
            for dep in manifest.declared(DependencyKind::Optional) {
                let checkpoint = ctx.checkpoint();
                if let Err(e) = self.resolve_edge(manifest, &dep, depth, options, ctx) {
                    warn!("Skipping optional dependency {} of {}: {}", dep, manifest.name, e);
                    ctx.rollback(checkpoint);
                }
            }
        }

        if options.allow_peer {
            for dep in manifest.declared(DependencyKind::Peer) {
                self.check_peer(manifest, &dep, ctx)?;
            }
        }

        for (name, range) in &manifest.conflicts {
            self.check_declared_conflict(manifest, name, range, ctx)?;
        }

        Ok(())
    }

    fn resolve_edge(
        &self,
        parent: &PackManifest,
        dep: &Dependency,
        depth: usize,
        options: &ResolveOptions,
        ctx: &mut ResolutionContext,
    ) -> ResolverResult<()> {
        let requirement = Requirement::parse(&dep.range)?;

        if dep.name == ctx.root_name {
            if !requirement.matches(&ctx.root_version) {
                ctx.conflicts.push(VersionConflict {
                    package: dep.name.clone(),
                    requested_by: parent.name.clone(),
                    requested_range: dep.range.clone(),
                    conflicts_with: ctx.root_name.clone(),
                    conflicting_version: Some(ctx.root_version.clone()),
                    kind: ConflictKind::Cycle,
                    reason: format!("resolution target is {}", ctx.root_version),
                });
            }
            return Ok(());
        }

        if let Some(existing) = ctx.resolved.iter().find(|resolved| resolved.name == dep.name) {
            let first = Requirement::parse(&existing.requested)?;
            let compatible = if options.strict_ranges {
                requirement.matches(&existing.version) && first.intersects(&requirement)
            } else {
                first.overlaps(&requirement)
            };

            if !compatible {
                let conflict = VersionConflict {
                    package: dep.name.clone(),
                    requested_by: parent.name.clone(),
                    requested_range: dep.range.clone(),
                    conflicts_with: existing.required_by.clone(),
                    conflicting_version: Some(existing.version.clone()),
                    kind: ConflictKind::RangeMismatch,
                    reason: format!(
                        "already resolved to {} for {} ({})",
                        existing.version, existing.required_by, existing.requested
                    ),
                };
                debug!("Conflict on {}: {}", dep.name, conflict.reason);
                ctx.conflicts.push(conflict);
            }
            return Ok(());
        }

        let located = self.locate(&dep.name, &requirement)?;
        debug!(
            "{} -> {}@{} ({})",
            parent.name,
            dep.name,
            located.manifest.version,
            if located.is_installed { "installed" } else { "available" }
        );

        ctx.resolved.push(ResolvedDependency {
            name: dep.name.clone(),
            requested: dep.range.clone(),
            version: located.manifest.version.clone(),
            is_installed: located.is_installed,
            installed_version: located.installed_version,
            path: located.path,
            required_by: parent.name.clone(),
            kind: dep.kind,
        });

        if ctx.visited.insert(dep.name.clone()) {
            self.resolve_manifest(&located.manifest, depth + 1, options, ctx)?;
        }

        Ok(())
    }

    /// Peers are never resolved, only checked against installed packs
    fn check_peer(
        &self,
        manifest: &PackManifest,
        dep: &Dependency,
        ctx: &mut ResolutionContext,
    ) -> ResolverResult<()> {
        let requirement = Requirement::parse(&dep.range)?;

        let conflict = match self.store.get_installed(&dep.name) {
            None => Some(VersionConflict {
                package: dep.name.clone(),
                requested_by: manifest.name.clone(),
                requested_range: dep.range.clone(),
                conflicts_with: "installed packs".to_string(),
                conflicting_version: None,
                kind: ConflictKind::UnmetPeer,
                reason: "peer dependency is not installed".to_string(),
            }),
            Some(installed) if !requirement.matches(&installed.version) => Some(VersionConflict {
                package: dep.name.clone(),
                requested_by: manifest.name.clone(),
                requested_range: dep.range.clone(),
                conflicts_with: installed.name.clone(),
                reason: format!("installed version {} does not satisfy the peer range", installed.version),
                conflicting_version: Some(installed.version),
                kind: ConflictKind::PeerMismatch,
            }),
            Some(_) => None,
        };

        if let Some(conflict) = conflict {
            debug!("Peer conflict: {}", conflict);
            ctx.conflicts.push(conflict);
        }
        Ok(())
    }

    fn check_declared_conflict(
        &self,
        manifest: &PackManifest,
        name: &str,
        range: &str,
        ctx: &mut ResolutionContext,
    ) -> ResolverResult<()> {
        let requirement = Requirement::parse(range)?;

        if let Some(installed) = self.store.get_installed(name) {
            if requirement.matches(&installed.version) {
                ctx.conflicts.push(VersionConflict {
                    package: name.to_string(),
                    requested_by: manifest.name.clone(),
                    requested_range: range.to_string(),
                    conflicts_with: installed.name.clone(),
                    reason: format!(
                        "{} declares a conflict with installed {}@{}",
                        manifest.name, installed.name, installed.version
                    ),
                    conflicting_version: Some(installed.version),
                    kind: ConflictKind::Declared,
                });
            }
        }
        Ok(())
    }
}
