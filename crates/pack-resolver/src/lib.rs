//! Dependency resolution engine for pack
//!
//! Given a pack name and a requested version range, this crate computes a
//! conflict-checked installation plan: transitive dependencies are resolved
//! against installed packs and pack sources, peer and optional dependencies
//! are validated, and every touched pack gets an install, upgrade, downgrade
//! or skip action.
//!
//! Incompatibilities that do not prevent a plan (unmet peers, declared
//! conflicts, mismatched duplicate requests) are returned as data in
//! [`InstallationPlan::conflicts`]; only syntax errors and unresolvable
//! required packs abort with a [`PackError`].

pub mod installed;
pub mod plan;
pub mod resolver;
pub mod semver;
pub mod tree;

// Re-export main types
pub use installed::{PackStore, SourcePack};
pub use plan::{
    ActionKind, ConflictKind, InstallationAction, InstallationPlan, ResolvedDependency,
    VersionConflict,
};
pub use resolver::{DependencyResolver, ResolveOptions};
pub use semver::{Requirement, VersionSelector};
pub use tree::DependencyNode;

use pack_core::error::PackError;

/// Result type for resolver operations
pub type ResolverResult<T> = Result<T, PackError>;
