//! Dependency specification types.
//!
//! Defines a single dependency edge declared by a manifest together with the
//! section it was declared in.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A dependency edge as declared in a manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    pub name: String,
    /// Raw range string; `*` accepts any version
    pub range: String,
    pub kind: DependencyKind,
}

/// Manifest section a dependency was declared in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyKind {
    /// `dependencies`: must resolve or the whole resolution fails
    Required,
    /// `optionalDependencies`: dropped when it cannot be resolved
    Optional,
    /// `peerDependencies`: must already be installed, never installed for you
    Peer,
}

impl Dependency {
    /// Create a new required dependency
    pub fn new(name: impl Into<String>, range: impl Into<String>) -> Self {
        Self::with_kind(name, range, DependencyKind::Required)
    }

    /// Create an optional dependency
    pub fn optional(name: impl Into<String>, range: impl Into<String>) -> Self {
        Self::with_kind(name, range, DependencyKind::Optional)
    }

    /// Create a peer dependency
    pub fn peer(name: impl Into<String>, range: impl Into<String>) -> Self {
        Self::with_kind(name, range, DependencyKind::Peer)
    }

    pub fn with_kind(
        name: impl Into<String>,
        range: impl Into<String>,
        kind: DependencyKind,
    ) -> Self {
        Self {
            name: name.into(),
            range: range.into(),
            kind,
        }
    }
}

impl DependencyKind {
    /// Check if a failure to resolve this dependency is tolerated
    pub fn is_optional(&self) -> bool {
        matches!(self, DependencyKind::Optional)
    }

    /// Check if this dependency must be provided by the environment
    pub fn is_peer(&self) -> bool {
        matches!(self, DependencyKind::Peer)
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dependency_creation() {
        let dep = Dependency::new("core-utils", "^1.0.0");

        assert_eq!(dep.name, "core-utils");
        assert_eq!(dep.range, "^1.0.0");
        assert_eq!(dep.kind, DependencyKind::Required);
        assert_eq!(dep.to_string(), "core-utils@^1.0.0");
    }

    #[test]
    fn test_dependency_kinds() {
        assert!(!DependencyKind::Required.is_optional());
        assert!(!DependencyKind::Required.is_peer());

        assert!(Dependency::optional("a", "*").kind.is_optional());
        assert!(Dependency::peer("a", "*").kind.is_peer());
    }
}
