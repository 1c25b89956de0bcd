//! Version specification types for requirements entries
//!
//! Handles PEP 440 version constraints like:
//! - Exact: `==1.2.3`, `===1.2.3`
//! - Wildcard: `==1.2.*`, `!=1.3.*`
//! - Comparison: `>=1.2.3`, `>1.2.3`, `<=1.2.3`, `<1.2.3`, `!=1.2.3`
//! - Compatible release: `~=1.2.3`
//! - Range: `>=1.28.0,<2.0.0`

use super::Version;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Comparison operator of a single clause
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparator {
    /// `==`
    Equal,
    /// `!=`
    NotEqual,
    /// `>=`
    GreaterOrEqual,
    /// `<=`
    LessOrEqual,
    /// `>`
    Greater,
    /// `<`
    Less,
    /// `~=`
    Compatible,
    /// `===`
    Arbitrary,
}

impl Comparator {
    /// Parses an operator token
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "==" => Some(Comparator::Equal),
            "!=" => Some(Comparator::NotEqual),
            ">=" => Some(Comparator::GreaterOrEqual),
            "<=" => Some(Comparator::LessOrEqual),
            ">" => Some(Comparator::Greater),
            "<" => Some(Comparator::Less),
            "~=" => Some(Comparator::Compatible),
            "===" => Some(Comparator::Arbitrary),
            _ => None,
        }
    }

    /// Returns the operator token
    pub fn as_str(&self) -> &'static str {
        match self {
            Comparator::Equal => "==",
            Comparator::NotEqual => "!=",
            Comparator::GreaterOrEqual => ">=",
            Comparator::LessOrEqual => "<=",
            Comparator::Greater => ">",
            Comparator::Less => "<",
            Comparator::Compatible => "~=",
            Comparator::Arbitrary => "===",
        }
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One end of the interval a specifier admits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bound {
    /// The boundary version
    pub version: Version,
    /// Whether the boundary version itself is admitted
    pub inclusive: bool,
}

impl Bound {
    fn inclusive(version: Version) -> Self {
        Self {
            version,
            inclusive: true,
        }
    }

    fn exclusive(version: Version) -> Self {
        Self {
            version,
            inclusive: false,
        }
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.version)
    }
}

/// A single `<comparator><version>` clause
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clause {
    /// The comparison operator
    pub comparator: Comparator,
    /// The version operand (without a trailing `.*`)
    pub version: Version,
    /// Whether the operand ended in `.*` (only for `==` and `!=`)
    pub wildcard: bool,
}

impl Clause {
    /// Creates a clause without wildcard
    pub fn new(comparator: Comparator, version: Version) -> Self {
        Self {
            comparator,
            version,
            wildcard: false,
        }
    }

    /// Creates a `==X.*` or `!=X.*` clause
    pub fn wildcard(comparator: Comparator, version: Version) -> Self {
        Self {
            comparator,
            version,
            wildcard: true,
        }
    }

    /// Returns true if `candidate` satisfies this clause
    pub fn matches(&self, candidate: &Version) -> bool {
        let target = &self.version;
        match self.comparator {
            Comparator::Equal if self.wildcard => candidate.has_release_prefix(target),
            Comparator::NotEqual if self.wildcard => !candidate.has_release_prefix(target),
            Comparator::Equal => self.equals(candidate),
            Comparator::NotEqual => !self.equals(candidate),
            Comparator::GreaterOrEqual => candidate >= target,
            Comparator::LessOrEqual => candidate <= target,
            // `>1.7` admits neither `1.7.post1` nor `1.7+local`
            Comparator::Greater => {
                candidate > target
                    && !(candidate.is_postrelease()
                        && !target.is_postrelease()
                        && candidate.base() == target.base())
                    && !(target.local.is_none() && candidate.without_local() == *target)
            }
            // `<2.0` does not admit `2.0rc1`
            Comparator::Less => {
                candidate < target
                    && !(candidate.is_prerelease()
                        && !target.is_prerelease()
                        && candidate.base() == target.base())
            }
            Comparator::Compatible => {
                let prefix_len = target.release.len().saturating_sub(1).max(1);
                let prefix = Version {
                    epoch: target.epoch,
                    ..Version::from_release(target.release[..prefix_len].to_vec())
                };
                candidate >= target && candidate.has_release_prefix(&prefix)
            }
            Comparator::Arbitrary => candidate.to_string() == target.to_string(),
        }
    }

    fn equals(&self, candidate: &Version) -> bool {
        // a specifier without a local label ignores the candidate's label
        if self.version.local.is_none() {
            candidate.without_local() == self.version
        } else {
            *candidate == self.version
        }
    }

    /// Lower and upper bounds implied by this clause alone
    pub fn bounds(&self) -> (Option<Bound>, Option<Bound>) {
        let target = &self.version;
        match self.comparator {
            Comparator::Equal if self.wildcard => (
                Some(Bound::inclusive(target.clone())),
                target.bump_prefix(target.release.len()).map(Bound::exclusive),
            ),
            Comparator::Equal | Comparator::Arbitrary => (
                Some(Bound::inclusive(target.clone())),
                Some(Bound::inclusive(target.clone())),
            ),
            Comparator::NotEqual => (None, None),
            Comparator::GreaterOrEqual => (Some(Bound::inclusive(target.clone())), None),
            Comparator::Greater => (Some(Bound::exclusive(target.clone())), None),
            Comparator::LessOrEqual => (None, Some(Bound::inclusive(target.clone()))),
            Comparator::Less => (None, Some(Bound::exclusive(target.clone()))),
            Comparator::Compatible => {
                let prefix_len = target.release.len().saturating_sub(1).max(1);
                (
                    Some(Bound::inclusive(target.clone())),
                    target.bump_prefix(prefix_len).map(Bound::exclusive),
                )
            }
        }
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let star = if self.wildcard { ".*" } else { "" };
        write!(f, "{}{}{}", self.comparator, self.version, star)
    }
}

/// The shape of a version specification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionSpecKind {
    /// No constraint at all
    Any,
    /// Pinned to one version (`==1.2.3`)
    Exact,
    /// Bounded on both sides (`>=1.0,<2.0`, `==1.*`)
    Range,
    /// Only a lower bound (`>=1.0`)
    LowerBound,
    /// Only an upper bound (`<2.0`)
    UpperBound,
    /// Compatible release (`~=1.4`)
    Compatible,
    /// Only exclusions (`!=1.3`)
    Exclusion,
}

impl VersionSpecKind {
    /// Returns true if this version spec kind represents a pinned/exact version
    pub fn is_pinned(&self) -> bool {
        matches!(self, VersionSpecKind::Exact)
    }
}

/// A version specification: a conjunction of clauses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionSpec {
    /// The raw version string as it appears in the manifest
    pub raw: String,
    /// Clauses that must all hold
    pub clauses: Vec<Clause>,
}

impl VersionSpec {
    /// Creates a new VersionSpec
    pub fn new(raw: impl Into<String>, clauses: Vec<Clause>) -> Self {
        Self {
            raw: raw.into(),
            clauses,
        }
    }

    /// A specification that admits every version
    pub fn any() -> Self {
        Self::new("", Vec::new())
    }

    /// Returns true if no clause constrains the version
    pub fn is_any(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Returns true if `version` satisfies every clause
    pub fn matches(&self, version: &Version) -> bool {
        self.clauses.iter().all(|clause| clause.matches(version))
    }

    /// Returns the tightest lower bound across all clauses
    pub fn lower_bound(&self) -> Option<Bound> {
        self.clauses
            .iter()
            .filter_map(|clause| clause.bounds().0)
            .reduce(|best, next| match next.version.cmp(&best.version) {
                Ordering::Greater => next,
                Ordering::Equal if !next.inclusive => next,
                _ => best,
            })
    }

    /// Returns the tightest upper bound across all clauses
    pub fn upper_bound(&self) -> Option<Bound> {
        self.clauses
            .iter()
            .filter_map(|clause| clause.bounds().1)
            .reduce(|best, next| match next.version.cmp(&best.version) {
                Ordering::Less => next,
                Ordering::Equal if !next.inclusive => next,
                _ => best,
            })
    }

    /// Returns false when no version can satisfy the clauses together
    ///
    /// A two-sided range needs its lower bound strictly below its upper bound;
    /// equal bounds are only satisfiable when both are inclusive and no
    /// exclusion removes that single version.
    pub fn is_satisfiable(&self) -> bool {
        match (self.lower_bound(), self.upper_bound()) {
            (Some(lower), Some(upper)) => match lower.version.cmp(&upper.version) {
                Ordering::Less => true,
                Ordering::Greater => false,
                Ordering::Equal => {
                    lower.inclusive && upper.inclusive && self.matches(&lower.version)
                }
            },
            _ => true,
        }
    }

    /// Returns the shape of this specification
    pub fn kind(&self) -> VersionSpecKind {
        if self.clauses.is_empty() {
            return VersionSpecKind::Any;
        }
        if self.is_pinned() {
            return VersionSpecKind::Exact;
        }
        if let [clause] = self.clauses.as_slice() {
            if clause.comparator == Comparator::Compatible {
                return VersionSpecKind::Compatible;
            }
        }
        match (self.lower_bound(), self.upper_bound()) {
            (Some(_), Some(_)) => VersionSpecKind::Range,
            (Some(_), None) => VersionSpecKind::LowerBound,
            (None, Some(_)) => VersionSpecKind::UpperBound,
            (None, None) => VersionSpecKind::Exclusion,
        }
    }

    /// Returns true if this version is pinned to exactly one release
    pub fn is_pinned(&self) -> bool {
        match self.clauses.as_slice() {
            [clause] => {
                matches!(clause.comparator, Comparator::Equal | Comparator::Arbitrary)
                    && !clause.wildcard
            }
            _ => false,
        }
    }

    /// Returns the pinned version, if any
    pub fn pinned_version(&self) -> Option<&Version> {
        if self.is_pinned() {
            self.clauses.first().map(|clause| &clause.version)
        } else {
            None
        }
    }

    /// Returns true if any clause names a pre-release
    pub fn mentions_prerelease(&self) -> bool {
        self.clauses
            .iter()
            .any(|clause| clause.version.is_prerelease())
    }
}

impl Default for VersionSpec {
    fn default() -> Self {
        Self::any()
    }
}

impl fmt::Display for VersionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.raw.is_empty() {
            let clauses: Vec<String> = self.clauses.iter().map(|c| c.to_string()).collect();
            write!(f, "{}", clauses.join(","))
        } else {
            write!(f, "{}", self.raw)
        }
    }
}
