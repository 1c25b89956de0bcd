//! Resolution decision result types

use super::Dependency;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reason why a dependency was not resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Package was excluded via --exclude or configuration
    Excluded,
    /// Package not in --only list
    NotInOnlyList,
    /// Entry has validation errors
    Invalid,
    /// Entry is a direct URL reference
    DirectReference,
    /// Failed to fetch version info from registry
    FetchFailed(String),
    /// No published version satisfies the constraint and filters
    NoMatchingVersion,
}

impl SkipReason {
    /// Returns true if the skip means the entry could not be resolved
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            SkipReason::FetchFailed(_) | SkipReason::NoMatchingVersion
        )
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Excluded => write!(f, "excluded"),
            SkipReason::NotInOnlyList => write!(f, "not in --only list"),
            SkipReason::Invalid => write!(f, "invalid entry"),
            SkipReason::DirectReference => write!(f, "direct reference"),
            SkipReason::FetchFailed(msg) => write!(f, "fetch failed: {}", msg),
            SkipReason::NoMatchingVersion => write!(f, "no matching version"),
        }
    }
}

/// Result of resolving a single dependency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResolveResult {
    /// A concrete version was selected
    Resolved {
        /// The dependency being resolved
        dependency: Dependency,
        /// The selected version
        version: String,
        /// When the selected version was published
        released_at: DateTime<Utc>,
    },
    /// The dependency was not resolved
    Skipped {
        /// The dependency that was skipped
        dependency: Dependency,
        /// The reason for skipping
        reason: SkipReason,
    },
}

impl ResolveResult {
    /// Creates a Resolved result
    pub fn resolved(
        dependency: Dependency,
        version: impl Into<String>,
        released_at: DateTime<Utc>,
    ) -> Self {
        ResolveResult::Resolved {
            dependency,
            version: version.into(),
            released_at,
        }
    }

    /// Creates a Skipped result
    pub fn skip(dependency: Dependency, reason: SkipReason) -> Self {
        ResolveResult::Skipped { dependency, reason }
    }

    /// Creates a Skipped result for fetch failure
    pub fn skip_fetch_failed(dependency: Dependency, message: impl Into<String>) -> Self {
        Self::skip(dependency, SkipReason::FetchFailed(message.into()))
    }

    /// Returns true if a version was selected
    pub fn is_resolved(&self) -> bool {
        matches!(self, ResolveResult::Resolved { .. })
    }

    /// Returns true if this is a skip result
    pub fn is_skip(&self) -> bool {
        matches!(self, ResolveResult::Skipped { .. })
    }

    /// Returns true if the dependency should have resolved but did not
    pub fn is_failure(&self) -> bool {
        match self {
            ResolveResult::Skipped { reason, .. } => reason.is_failure(),
            ResolveResult::Resolved { .. } => false,
        }
    }

    /// Returns the dependency reference
    pub fn dependency(&self) -> &Dependency {
        match self {
            ResolveResult::Resolved { dependency, .. } => dependency,
            ResolveResult::Skipped { dependency, .. } => dependency,
        }
    }

    /// Returns the package name
    pub fn package_name(&self) -> &str {
        &self.dependency().name
    }
}

impl fmt::Display for ResolveResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveResult::Resolved {
                dependency,
                version,
                ..
            } => {
                write!(
                    f,
                    "{}: {} → {}",
                    dependency.name, dependency.version_spec, version
                )
            }
            ResolveResult::Skipped { dependency, reason } => {
                write!(f, "{}: skipped ({})", dependency.name, reason)
            }
        }
    }
}
