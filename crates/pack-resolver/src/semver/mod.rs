//! Semantic version resolution helpers
//!
//! String-level version operations used by the resolver and the CLI:
//! parsing, precedence comparison, range satisfaction, best-match selection,
//! and the range compatibility checks applied to duplicate requests.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use pack_core::types::{RangeKind, Version, VersionError, VersionRange};
use tracing::debug;

use crate::ResolverResult;

/// Range string accepted in manifests that matches every version
pub const WILDCARD: &str = "*";

/// A manifest range: either the wildcard or a single-comparator range
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement {
    Any,
    Range(VersionRange),
}

/// One end of a version interval
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Bound {
    Unbounded,
    Inclusive(Version),
    Exclusive(Version),
}

/// The set of versions a requirement admits, as `lower..upper`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interval {
    pub lower: Bound,
    pub upper: Bound,
}

/// Version selector for finding best matching versions
#[derive(Debug, Clone)]
pub struct VersionSelector {
    /// Available versions in ascending precedence order
    available_versions: BTreeSet<Version>,
}

/// Parse a semantic version string
pub fn parse_version(input: &str) -> ResolverResult<Version> {
    Ok(Version::from_str(input)?)
}

/// Parse a single-comparator range string (`*` is rejected here)
pub fn parse_range(input: &str) -> ResolverResult<VersionRange> {
    Ok(VersionRange::parse(input)?)
}

/// Compare two version strings by semver precedence
pub fn compare_versions(a: &str, b: &str) -> ResolverResult<Ordering> {
    Ok(parse_version(a)?.cmp(&parse_version(b)?))
}

/// Check whether `version` satisfies `range`
pub fn satisfies(version: &str, range: &str) -> ResolverResult<bool> {
    let version = parse_version(version)?;
    Ok(parse_range(range)?.matches(&version))
}

/// Highest candidate satisfying `range`; prereleases only when allowed.
/// Candidates that are not valid versions are skipped.
pub fn find_best_match<I, S>(
    range: &str,
    candidates: I,
    allow_prerelease: bool,
) -> ResolverResult<Option<Version>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let range = parse_range(range)?;
    let versions = candidates
        .into_iter()
        .filter_map(|candidate| match Version::from_str(candidate.as_ref()) {
            Ok(version) => Some(version),
            Err(e) => {
                debug!("Ignoring candidate: {}", e);
                None
            },
        })
        .collect();

    Ok(VersionSelector::new(versions).select_best(&range, allow_prerelease))
}

/// Conservative compatibility check: two exact ranges overlap only when they
/// pin the same version; every other pair is assumed to overlap.
pub fn ranges_overlap(a: &VersionRange, b: &VersionRange) -> bool {
    if a.is_exact() && b.is_exact() {
        return a.version == b.version;
    }
    true
}

/// Prefer whichever range is exact, else the first one
pub fn merge_ranges(a: &VersionRange, b: &VersionRange) -> VersionRange {
    if a.is_exact() {
        a.clone()
    } else if b.is_exact() {
        b.clone()
    } else {
        a.clone()
    }
}

/// Exact check: does some version satisfy both ranges?
pub fn ranges_intersect(a: &VersionRange, b: &VersionRange) -> bool {
    !Interval::from(a).intersect(&Interval::from(b)).is_empty()
}

impl Requirement {
    /// Parse a manifest range, accepting `*`
    pub fn parse(input: &str) -> Result<Self, VersionError> {
        if input.trim() == WILDCARD {
            Ok(Requirement::Any)
        } else {
            VersionRange::parse(input).map(Requirement::Range)
        }
    }

    /// Check if a version satisfies this requirement
    pub fn matches(&self, version: &Version) -> bool {
        match self {
            Requirement::Any => true,
            Requirement::Range(range) => range.matches(version),
        }
    }

    /// Conservative overlap; the wildcard overlaps everything
    pub fn overlaps(&self, other: &Requirement) -> bool {
        match (self, other) {
            (Requirement::Range(a), Requirement::Range(b)) => ranges_overlap(a, b),
            _ => true,
        }
    }

    /// Exact interval intersection
    pub fn intersects(&self, other: &Requirement) -> bool {
        !self.interval().intersect(&other.interval()).is_empty()
    }

    pub fn interval(&self) -> Interval {
        match self {
            Requirement::Any => Interval::unbounded(),
            Requirement::Range(range) => Interval::from(range),
        }
    }
}

impl FromStr for Requirement {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Requirement::Any => f.write_str(WILDCARD),
            Requirement::Range(range) => write!(f, "{}", range),
        }
    }
}

impl Interval {
    /// Interval containing every version
    pub fn unbounded() -> Self {
        Self {
            lower: Bound::Unbounded,
            upper: Bound::Unbounded,
        }
    }

    /// Check if a version lies inside the interval
    pub fn contains(&self, version: &Version) -> bool {
        let above_lower = match &self.lower {
            Bound::Unbounded => true,
            Bound::Inclusive(v) => version >= v,
            Bound::Exclusive(v) => version > v,
        };
        let below_upper = match &self.upper {
            Bound::Unbounded => true,
            Bound::Inclusive(v) => version <= v,
            Bound::Exclusive(v) => version < v,
        };
        above_lower && below_upper
    }

    /// Intersection of two intervals (tightest bound on each side)
    pub fn intersect(&self, other: &Interval) -> Interval {
        let lower = if compare_lower(&self.lower, &other.lower) == Ordering::Less {
            other.lower.clone()
        } else {
            self.lower.clone()
        };
        let upper = if compare_upper(&self.upper, &other.upper) == Ordering::Greater {
            other.upper.clone()
        } else {
            self.upper.clone()
        };
        Interval { lower, upper }
    }

    /// Check if no version can lie inside the interval
    pub fn is_empty(&self) -> bool {
        match (&self.lower, &self.upper) {
            (Bound::Unbounded, _) | (_, Bound::Unbounded) => false,
            (Bound::Inclusive(low), Bound::Inclusive(high)) => low > high,
            (Bound::Inclusive(low), Bound::Exclusive(high))
            | (Bound::Exclusive(low), Bound::Inclusive(high))
            | (Bound::Exclusive(low), Bound::Exclusive(high)) => low >= high,
        }
    }
}

/// Order lower bounds from loosest to tightest
fn compare_lower(a: &Bound, b: &Bound) -> Ordering {
    match (a, b) {
        (Bound::Unbounded, Bound::Unbounded) => Ordering::Equal,
        (Bound::Unbounded, _) => Ordering::Less,
        (_, Bound::Unbounded) => Ordering::Greater,
        (Bound::Inclusive(x), Bound::Inclusive(y)) | (Bound::Exclusive(x), Bound::Exclusive(y)) => {
            x.cmp(y)
        },
        (Bound::Inclusive(x), Bound::Exclusive(y)) => x.cmp(y).then(Ordering::Less),
        (Bound::Exclusive(x), Bound::Inclusive(y)) => x.cmp(y).then(Ordering::Greater),
    }
}

/// Order upper bounds from tightest to loosest
fn compare_upper(a: &Bound, b: &Bound) -> Ordering {
    match (a, b) {
        (Bound::Unbounded, Bound::Unbounded) => Ordering::Equal,
        (Bound::Unbounded, _) => Ordering::Greater,
        (_, Bound::Unbounded) => Ordering::Less,
        (Bound::Inclusive(x), Bound::Inclusive(y)) | (Bound::Exclusive(x), Bound::Exclusive(y)) => {
            x.cmp(y)
        },
        (Bound::Inclusive(x), Bound::Exclusive(y)) => x.cmp(y).then(Ordering::Greater),
        (Bound::Exclusive(x), Bound::Inclusive(y)) => x.cmp(y).then(Ordering::Less),
    }
}

impl From<&VersionRange> for Interval {
    fn from(range: &VersionRange) -> Self {
        let v = range.version.clone();
        let (lower, upper) = match range.kind {
            RangeKind::Exact => (Bound::Inclusive(v.clone()), Bound::Inclusive(v)),
            RangeKind::Caret => {
                let upper = v.next_major().map_or(Bound::Unbounded, Bound::Exclusive);
                (Bound::Inclusive(v), upper)
            },
            RangeKind::Tilde => {
                let upper = v.next_minor().map_or(Bound::Unbounded, Bound::Exclusive);
                (Bound::Inclusive(v), upper)
            },
            RangeKind::Gte => (Bound::Inclusive(v), Bound::Unbounded),
            RangeKind::Gt => (Bound::Exclusive(v), Bound::Unbounded),
            RangeKind::Lte => (Bound::Unbounded, Bound::Inclusive(v)),
            RangeKind::Lt => (Bound::Unbounded, Bound::Exclusive(v)),
        };
        Interval { lower, upper }
    }
}

impl VersionSelector {
    /// Create new version selector with available versions
    pub fn new(versions: Vec<Version>) -> Self {
        let available_versions = versions.into_iter().collect();
        Self { available_versions }
    }

    /// Select highest version matching the range
    pub fn select_best(&self, range: &VersionRange, allow_prerelease: bool) -> Option<Version> {
        self.available_versions
            .iter()
            .rev() // Start with highest versions
            .filter(|version| allow_prerelease || !version.is_prerelease())
            .find(|version| range.matches(version))
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(s: &str) -> VersionRange {
        VersionRange::parse(s).unwrap()
    }

    #[test]
    fn test_compare_versions() {
        assert_eq!(compare_versions("1.0.0-alpha", "1.0.0").unwrap(), Ordering::Less);
        assert_eq!(
            compare_versions("1.0.0-alpha.1", "1.0.0-alpha.beta").unwrap(),
            Ordering::Less
        );
        assert_eq!(compare_versions("1.0.0+a", "1.0.0+b").unwrap(), Ordering::Equal);
        assert_eq!(compare_versions("2.0.0", "1.99.99").unwrap(), Ordering::Greater);
        assert!(compare_versions("1.0", "1.0.0").is_err());
    }

    #[test]
    fn test_satisfies_boundaries() {
        assert!(!satisfies("2.0.0", "^1.9.9").unwrap());
        assert!(satisfies("1.9.9", "^1.9.9").unwrap());
        assert!(!satisfies("1.3.0", "~1.2.9").unwrap());
        assert!(satisfies("1.2.9", "~1.2.0").unwrap());
    }

    #[test]
    fn test_satisfies_at_component_limit() {
        let max_major = "18446744073709551615.0.0";
        assert!(satisfies(max_major, &format!("^{}", max_major)).unwrap());
        assert!(satisfies(max_major, &format!("~{}", max_major)).unwrap());

        let max_minor = "0.18446744073709551615.0";
        assert!(satisfies(max_minor, &format!("~{}", max_minor)).unwrap());
        assert!(!satisfies("1.0.0", &format!("~{}", max_minor)).unwrap());

        let interval = Interval::from(&r("^18446744073709551615.0.0"));
        assert_eq!(interval.upper, Bound::Unbounded);
        assert!(interval.contains(&Version::new(u64::MAX, 3, 1)));
        assert_eq!(
            Interval::from(&r("~0.18446744073709551615.0")).upper,
            Bound::Exclusive(Version::new(1, 0, 0))
        );
        let saturated = "18446744073709551615.18446744073709551615.4";
        assert!(satisfies(saturated, &format!("~{}", saturated)).unwrap());
        assert!(ranges_intersect(&r("^18446744073709551615.0.0"), &r(">=18446744073709551615.2.0")));
    }

    #[test]
    fn test_satisfies_errors() {
        let err = satisfies("1.0.0", ">=1.0.0 <2.0.0").unwrap_err();
        assert!(matches!(err, pack_core::PackError::InvalidRange { .. }));

        let err = satisfies("one", "^1.0.0").unwrap_err();
        assert!(matches!(err, pack_core::PackError::InvalidVersion { .. }));
    }

    #[test]
    fn test_find_best_match() {
        let best = find_best_match("^1.0.0", ["1.0.0", "1.2.0", "1.1.0"], false).unwrap();
        assert_eq!(best, Some(Version::new(1, 2, 0)));
    }

    #[test]
    fn test_find_best_match_prerelease() {
        let candidates = ["1.0.0", "1.1.0-beta.1", "not-a-version"];

        let best = find_best_match("^1.0.0", candidates, false).unwrap();
        assert_eq!(best, Some(Version::new(1, 0, 0)));

        let best = find_best_match("^1.0.0", candidates, true).unwrap();
        assert_eq!(best.map(|v| v.to_string()), Some("1.1.0-beta.1".to_string()));

        assert_eq!(find_best_match("^3.0.0", candidates, true).unwrap(), None);
        assert_eq!(find_best_match("^1.0.0", Vec::<String>::new(), false).unwrap(), None);
    }

    #[test]
    fn test_ranges_overlap_is_conservative() {
        assert!(ranges_overlap(&r("1.0.0"), &r("1.0.0+build")));
        assert!(!ranges_overlap(&r("1.0.0"), &r("1.0.1")));
        // Disjoint in reality, but only exact pairs are compared
        assert!(ranges_overlap(&r("^1.0.0"), &r("^2.0.0")));
        assert!(ranges_overlap(&r("<1.0.0"), &r("1.5.0")));
    }

    #[test]
    fn test_merge_ranges() {
        assert_eq!(merge_ranges(&r("^1.0.0"), &r("1.2.0")), r("1.2.0"));
        assert_eq!(merge_ranges(&r("1.1.0"), &r("1.2.0")), r("1.1.0"));
        assert_eq!(merge_ranges(&r("~1.0.0"), &r(">=1.0.0")), r("~1.0.0"));
    }

    #[test]
    fn test_ranges_intersect() {
        assert!(!ranges_intersect(&r("^1.0.0"), &r("^2.0.0")));
        assert!(ranges_intersect(&r("^1.0.0"), &r("~1.4.0")));
        assert!(!ranges_intersect(&r("<1.0.0"), &r(">=1.0.0")));
        assert!(ranges_intersect(&r("<=1.0.0"), &r(">=1.0.0")));
        assert!(!ranges_intersect(&r("<1.0.0"), &r(">1.0.0")));
        assert!(ranges_intersect(&r("1.4.2"), &r("^1.0.0")));
        assert!(!ranges_intersect(&r("2.0.0"), &r("^1.0.0")));
    }

    #[test]
    fn test_requirement_wildcard() {
        let any = Requirement::parse("*").unwrap();
        assert!(any.matches(&Version::new(0, 0, 1)));
        assert!(any.overlaps(&Requirement::parse("1.0.0").unwrap()));
        assert!(any.intersects(&Requirement::parse("<0.1.0").unwrap()));
        assert_eq!(any.to_string(), "*");

        let exact = Requirement::parse("1.0.0").unwrap();
        assert!(!exact.overlaps(&Requirement::parse("2.0.0").unwrap()));
        assert!(Requirement::parse("latest").is_err());
    }

    #[test]
    fn test_version_selector() {
        let selector = VersionSelector::new(vec![
            Version::new(1, 0, 0),
            Version::new(2, 1, 0),
            Version::from_str("3.0.0-rc.1").unwrap(),
        ]);
        assert_eq!(
            selector.select_best(&r(">=2.0.0"), false),
            Some(Version::new(2, 1, 0))
        );
        assert_eq!(
            selector.select_best(&r(">=2.0.0"), true).map(|v| v.to_string()),
            Some("3.0.0-rc.1".to_string())
        );
    }
}
