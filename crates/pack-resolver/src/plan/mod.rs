//! Installation plan types
//!
//! Everything `DependencyResolver::resolve` returns: the resolved dependency
//! list, the recorded conflicts and the ordered actions an installer would
//! carry out. All types serialize so the CLI can emit plans as JSON.

use std::cmp::Ordering;
use std::fmt;
use std::path::PathBuf;

use pack_core::types::{DependencyKind, Version};
use serde::Serialize;

/// Outcome of resolving one dependency edge
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedDependency {
    pub name: String,
    /// Range of the first request that resolved this pack
    pub requested: String,
    pub version: Version,
    /// Whether the resolved version is the one already installed
    pub is_installed: bool,
    /// Currently installed version, if any, even when it was not selected
    #[serde(skip_serializing_if = "Option::is_none")]
    pub installed_version: Option<Version>,
    /// Install location
    pub path: PathBuf,
    /// Pack whose manifest declared the edge
    pub required_by: String,
    pub kind: DependencyKind,
}

/// Category of a recorded incompatibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConflictKind {
    /// A second request for an already-resolved pack is incompatible with it
    RangeMismatch,
    /// A peer dependency is not installed
    UnmetPeer,
    /// A peer dependency is installed at an unacceptable version
    PeerMismatch,
    /// An installed pack matches a range declared under `conflicts`
    Declared,
    /// An edge back to the resolution target does not accept its version
    Cycle,
}

/// A recorded incompatibility; never aborts resolution
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VersionConflict {
    /// Pack the conflict is about
    pub package: String,
    /// Pack whose manifest made the request
    pub requested_by: String,
    pub requested_range: String,
    /// What the request collides with
    pub conflicts_with: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conflicting_version: Option<Version>,
    pub kind: ConflictKind,
    pub reason: String,
}

/// What an installer has to do for one pack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Install,
    Upgrade,
    Downgrade,
    Skip,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstallationAction {
    pub kind: ActionKind,
    pub name: String,
    pub version: Version,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub installed_version: Option<Version>,
    pub path: PathBuf,
}

/// Result of one resolution call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstallationPlan {
    pub target: String,
    pub version: Version,
    /// Resolved dependencies in resolution order, one per pack name
    pub dependencies: Vec<ResolvedDependency>,
    pub conflicts: Vec<VersionConflict>,
    /// Target first, then dependencies in resolution order
    pub actions: Vec<InstallationAction>,
}

impl ActionKind {
    /// Classify a resolved version against what is installed
    pub fn classify(resolved: &Version, installed: Option<&Version>) -> Self {
        match installed {
            None => ActionKind::Install,
            Some(installed) => match resolved.cmp(installed) {
                Ordering::Equal => ActionKind::Skip,
                Ordering::Greater => ActionKind::Upgrade,
                Ordering::Less => ActionKind::Downgrade,
            },
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ActionKind::Install => "install",
            ActionKind::Upgrade => "upgrade",
            ActionKind::Downgrade => "downgrade",
            ActionKind::Skip => "skip",
        };
        f.write_str(s)
    }
}

impl fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConflictKind::RangeMismatch => "range mismatch",
            ConflictKind::UnmetPeer => "unmet peer",
            ConflictKind::PeerMismatch => "peer mismatch",
            ConflictKind::Declared => "declared conflict",
            ConflictKind::Cycle => "cycle",
        };
        f.write_str(s)
    }
}

impl InstallationAction {
    pub fn new(
        name: impl Into<String>,
        version: Version,
        installed_version: Option<Version>,
        path: PathBuf,
    ) -> Self {
        Self {
            kind: ActionKind::classify(&version, installed_version.as_ref()),
            name: name.into(),
            version,
            installed_version,
            path,
        }
    }

    /// Whether the installer has nothing to do
    pub fn is_noop(&self) -> bool {
        self.kind == ActionKind::Skip
    }
}

impl fmt::Display for InstallationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.kind, &self.installed_version) {
            (ActionKind::Upgrade | ActionKind::Downgrade, Some(from)) => {
                write!(f, "{} {} {} -> {}", self.kind, self.name, from, self.version)
            },
            _ => write!(f, "{} {}@{}", self.kind, self.name, self.version),
        }
    }
}

impl fmt::Display for VersionConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} requires {}@{}, {}",
            self.kind, self.requested_by, self.package, self.requested_range, self.reason
        )
    }
}

impl InstallationPlan {
    pub fn has_conflicts(&self) -> bool {
        !self.conflicts.is_empty()
    }

    /// Look up a resolved dependency by name
    pub fn dependency(&self, name: &str) -> Option<&ResolvedDependency> {
        self.dependencies.iter().find(|dep| dep.name == name)
    }

    /// Actions that require the installer to change something
    pub fn pending_actions(&self) -> impl Iterator<Item = &InstallationAction> {
        self.actions.iter().filter(|action| !action.is_noop())
    }

    /// Number of actions of each kind, in `install, upgrade, downgrade, skip` order
    pub fn action_counts(&self) -> [(ActionKind, usize); 4] {
        let count = |kind| self.actions.iter().filter(|a| a.kind == kind).count();
        [
            (ActionKind::Install, count(ActionKind::Install)),
            (ActionKind::Upgrade, count(ActionKind::Upgrade)),
            (ActionKind::Downgrade, count(ActionKind::Downgrade)),
            (ActionKind::Skip, count(ActionKind::Skip)),
        ]
    }
}
