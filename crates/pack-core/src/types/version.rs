//! Semantic version types.
//!
//! Provides `Version` and `VersionRange` types that follow the semantic
//! versioning 2.0.0 grammar and precedence rules. Ranges are deliberately a
//! single comparator each: `1.2.3`, `^1.2.3`, `~1.2.3`, `>=1.2.3`, `<=1.2.3`,
//! `>1.2.3` or `<1.2.3`.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use thiserror::Error;

/// Semantic version (major.minor.patch-prerelease+build)
#[derive(Debug, Clone)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub prerelease: Option<String>,
    pub build: Option<String>,
}

/// Comparison operator of a version range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RangeKind {
    Exact, // 1.0.0
    Caret, // ^1.0.0
    Tilde, // ~1.0.0
    Gte,   // >=1.0.0
    Lte,   // <=1.0.0
    Gt,    // >1.0.0
    Lt,    // <1.0.0
}

/// A single-comparator version range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRange {
    pub kind: RangeKind,
    pub version: Version,
}

/// Version parsing and validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VersionError {
    #[error("Invalid version '{input}': {reason}")]
    InvalidVersion { input: String, reason: String },

    #[error("Invalid version range '{input}'")]
    InvalidRange { input: String },
}

impl Version {
    /// Create a new release version
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
            prerelease: None,
            build: None,
        }
    }

    /// Check if this version satisfies a range
    pub fn satisfies(&self, range: &VersionRange) -> bool {
        range.matches(self)
    }

    /// Check if this is a prerelease version
    pub fn is_prerelease(&self) -> bool {
        self.prerelease.is_some()
    }

    /// Smallest version of the next major line (`1.4.2-rc.1` -> `2.0.0`),
    /// `None` when the major component is already `u64::MAX`
    pub fn next_major(&self) -> Option<Self> {
        self.major.checked_add(1).map(|major| Self::new(major, 0, 0))
    }

    /// Smallest version of the next minor line (`1.4.2-rc.1` -> `1.5.0`).
    /// A saturated minor carries into the major; `None` when both are `u64::MAX`
    pub fn next_minor(&self) -> Option<Self> {
        match self.minor.checked_add(1) {
            Some(minor) => Some(Self::new(self.major, minor, 0)),
            None => self.next_major(),
        }
    }

    /// Precedence comparison; build metadata is ignored
    fn precedence_cmp(&self, other: &Self) -> Ordering {
        match (self.major, self.minor, self.patch).cmp(&(other.major, other.minor, other.patch)) {
            Ordering::Equal => match (&self.prerelease, &other.prerelease) {
                (None, None) => Ordering::Equal,
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (Some(a), Some(b)) => compare_prerelease(a, b),
            },
            other => other,
        }
    }
}

/// Compare dot-separated prerelease sequences field by field
fn compare_prerelease(a: &str, b: &str) -> Ordering {
    let mut left = a.split('.');
    let mut right = b.split('.');

    loop {
        match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => {
                let ord = compare_identifier(x, y);
                if ord != Ordering::Equal {
                    return ord;
                }
            },
        }
    }
}

fn compare_identifier(a: &str, b: &str) -> Ordering {
    match (is_numeric(a), is_numeric(b)) {
        (true, true) => {
            // Digit strings of any length: compare by magnitude without parsing
            let a = a.trim_start_matches('0');
            let b = b.trim_start_matches('0');
            a.len().cmp(&b.len()).then_with(|| a.cmp(b))
        },
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => a.cmp(b),
    }
}

fn is_numeric(identifier: &str) -> bool {
    !identifier.is_empty() && identifier.bytes().all(|b| b.is_ascii_digit())
}

/// Strictly below an exclusive upper limit; no limit admits everything
fn below(version: &Version, limit: Option<Version>) -> bool {
    limit.map_or(true, |limit| *version < limit)
}

fn invalid(input: &str, reason: impl Into<String>) -> VersionError {
    VersionError::InvalidVersion {
        input: input.to_string(),
        reason: reason.into(),
    }
}

fn parse_numeric(input: &str, component: &str, name: &str) -> Result<u64, VersionError> {
    if !is_numeric(component) {
        return Err(invalid(input, format!("{} '{}' is not a number", name, component)));
    }
    if component.len() > 1 && component.starts_with('0') {
        return Err(invalid(input, format!("{} '{}' has a leading zero", name, component)));
    }
    component
        .parse()
        .map_err(|_| invalid(input, format!("{} '{}' is too large", name, component)))
}

fn validate_identifiers(input: &str, sequence: &str, what: &str) -> Result<(), VersionError> {
    for identifier in sequence.split('.') {
        if identifier.is_empty() {
            return Err(invalid(input, format!("empty {} identifier", what)));
        }
        if !identifier
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-')
        {
            return Err(invalid(
                input,
                format!("{} identifier '{}' has invalid characters", what, identifier),
            ));
        }
    }
    Ok(())
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        if input.is_empty() {
            return Err(invalid(s, "empty version"));
        }

        // Split on '+' for build metadata
        let (version_part, build) = match input.split_once('+') {
            Some((v, b)) => {
                validate_identifiers(input, b, "build")?;
                (v, Some(b.to_string()))
            },
            None => (input, None),
        };

        // Split on the first '-' for prerelease; later hyphens belong to it
        let (core_part, prerelease) = match version_part.split_once('-') {
            Some((c, p)) => {
                validate_identifiers(input, p, "prerelease")?;
                for identifier in p.split('.') {
                    if is_numeric(identifier) && identifier.len() > 1 && identifier.starts_with('0')
                    {
                        return Err(invalid(
                            input,
                            format!("prerelease identifier '{}' has a leading zero", identifier),
                        ));
                    }
                }
                (c, Some(p.to_string()))
            },
            None => (version_part, None),
        };

        // Parse major.minor.patch
        let parts: Vec<&str> = core_part.split('.').collect();
        if parts.len() != 3 {
            return Err(invalid(input, "expected MAJOR.MINOR.PATCH"));
        }

        Ok(Version {
            major: parse_numeric(input, parts[0], "major")?,
            minor: parse_numeric(input, parts[1], "minor")?,
            patch: parse_numeric(input, parts[2], "patch")?,
            prerelease,
            build,
        })
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;

        if let Some(ref pre) = self.prerelease {
            write!(f, "-{}", pre)?;
        }

        if let Some(ref build) = self.build {
            write!(f, "+{}", build)?;
        }

        Ok(())
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.precedence_cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl Hash for Version {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (self.major, self.minor, self.patch).hash(state);
        self.prerelease.hash(state);
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.precedence_cmp(other)
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

impl RangeKind {
    /// Leading operator token for this kind
    pub fn operator(&self) -> &'static str {
        match self {
            RangeKind::Exact => "",
            RangeKind::Caret => "^",
            RangeKind::Tilde => "~",
            RangeKind::Gte => ">=",
            RangeKind::Lte => "<=",
            RangeKind::Gt => ">",
            RangeKind::Lt => "<",
        }
    }
}

impl VersionRange {
    /// Parse a range string; detection is by leading token
    pub fn parse(input: &str) -> Result<Self, VersionError> {
        let trimmed = input.trim();

        // Two-character operators must be tried before their prefixes
        let (kind, version_str) = if let Some(rest) = trimmed.strip_prefix(">=") {
            (RangeKind::Gte, rest)
        } else if let Some(rest) = trimmed.strip_prefix("<=") {
            (RangeKind::Lte, rest)
        } else if let Some(rest) = trimmed.strip_prefix('>') {
            (RangeKind::Gt, rest)
        } else if let Some(rest) = trimmed.strip_prefix('<') {
            (RangeKind::Lt, rest)
        } else if let Some(rest) = trimmed.strip_prefix('^') {
            (RangeKind::Caret, rest)
        } else if let Some(rest) = trimmed.strip_prefix('~') {
            (RangeKind::Tilde, rest)
        } else {
            (RangeKind::Exact, trimmed)
        };

        let version = Version::from_str(version_str.trim_start()).map_err(|_| {
            VersionError::InvalidRange {
                input: input.to_string(),
            }
        })?;

        Ok(Self { kind, version })
    }

    /// Check if a version satisfies this range
    pub fn matches(&self, version: &Version) -> bool {
        let base = &self.version;
        match self.kind {
            RangeKind::Exact => version == base,
            RangeKind::Caret => version >= base && below(version, base.next_major()),
            RangeKind::Tilde => version >= base && below(version, base.next_minor()),
            RangeKind::Gte => version >= base,
            RangeKind::Lte => version <= base,
            RangeKind::Gt => version > base,
            RangeKind::Lt => version < base,
        }
    }

    /// Whether this range pins a single version
    pub fn is_exact(&self) -> bool {
        self.kind == RangeKind::Exact
    }
}

impl FromStr for VersionRange {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind.operator(), self.version)
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    fn version_strategy() -> impl Strategy<Value = Version> {
        (
            0u64..50,
            0u64..50,
            0u64..50,
            prop::option::of("(alpha|beta|rc|[1-9][0-9]?)(\\.(0|[1-9]|[a-z]{1,3}))?"),
        )
            .prop_map(|(major, minor, patch, prerelease)| Version {
                major,
                minor,
                patch,
                prerelease,
                build: None,
            })
    }

    proptest! {
        #[test]
        fn version_satisfies_its_own_caret_and_tilde(version in version_strategy()) {
            let caret = VersionRange::parse(&format!("^{}", version)).unwrap();
            let tilde = VersionRange::parse(&format!("~{}", version)).unwrap();
            prop_assert!(caret.matches(&version));
            prop_assert!(tilde.matches(&version));
        }

        #[test]
        fn comparison_is_antisymmetric(a in version_strategy(), b in version_strategy()) {
            prop_assert_eq!(a.cmp(&b), b.cmp(&a).reverse());
            prop_assert_eq!(a.cmp(&b) == Ordering::Equal, a == b);
        }

        #[test]
        fn comparison_is_transitive(
            a in version_strategy(),
            b in version_strategy(),
            c in version_strategy(),
        ) {
            if a < b && b < c {
                prop_assert!(a < c, "Transitivity violated: {} < {} < {}", a, b, c);
            }
        }
    }
}
