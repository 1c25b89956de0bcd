//! Version resolution for declared dependencies
//!
//! This module provides:
//! - Resolution filter configuration from CLI args and configuration
//! - Version info from registry with release date and yank state
//! - The resolver that picks the highest published version satisfying a constraint

mod filter;
mod version_info;

pub use filter::ResolveFilter;
pub use version_info::VersionInfo;

use crate::domain::{Dependency, ResolveResult, SkipReason};
use chrono::{DateTime, Utc};
use tracing::debug;

/// Resolution engine that picks a version for each dependency
pub struct Resolver {
    /// Filter configuration
    filter: ResolveFilter,
    /// Current time for age calculations
    now: DateTime<Utc>,
}

impl Resolver {
    /// Create a new Resolver with the given filter
    pub fn new(filter: ResolveFilter) -> Self {
        Self {
            filter,
            now: Utc::now(),
        }
    }

    /// Create a new Resolver with a custom current time (for testing)
    pub fn with_time(filter: ResolveFilter, now: DateTime<Utc>) -> Self {
        Self { filter, now }
    }

    /// Check if a dependency should be looked up at all
    /// Returns Some(SkipReason) if it should be skipped, None if it should be processed
    pub fn should_skip(&self, dependency: &Dependency) -> Option<SkipReason> {
        if !self.filter.should_process_package(&dependency.name) {
            if !self.filter.only.is_empty() {
                return Some(SkipReason::NotInOnlyList);
            } else {
                return Some(SkipReason::Excluded);
            }
        }

        if dependency.is_direct_reference() {
            return Some(SkipReason::DirectReference);
        }

        None
    }

    /// Pick the highest published version that satisfies the dependency
    ///
    /// Yanked releases are only eligible when the constraint pins them exactly.
    /// Pre-releases are eligible with `--pre` or when the constraint names one.
    pub fn resolve(
        &self,
        dependency: &Dependency,
        available_versions: &[VersionInfo],
    ) -> ResolveResult {
        if let Some(reason) = self.should_skip(dependency) {
            return ResolveResult::skip(dependency.clone(), reason);
        }

        if available_versions.is_empty() {
            return ResolveResult::skip(
                dependency.clone(),
                SkipReason::FetchFailed("no versions available".to_string()),
            );
        }

        let spec = &dependency.version_spec;
        let allow_prereleases = self.filter.include_prereleases || spec.mentions_prerelease();
        let pinned = spec.pinned_version();

        let cutoff = self
            .filter
            .min_age
            .and_then(|age| chrono::Duration::from_std(age).ok())
            .map(|age| self.now - age);

        let latest = available_versions
            .iter()
            .filter(|v| !v.yanked || pinned == Some(&v.version))
            .filter(|v| allow_prereleases || !v.is_prerelease())
            .filter(|v| cutoff.is_none_or(|cutoff| v.released_at <= cutoff))
            .filter(|v| spec.matches(&v.version))
            .max();

        match latest {
            Some(latest) => {
                debug!(
                    package = %dependency.name,
                    constraint = %spec,
                    version = %latest.version,
                    "resolved"
                );
                ResolveResult::resolved(
                    dependency.clone(),
                    latest.version.to_string(),
                    latest.released_at,
                )
            }
            None => ResolveResult::skip(dependency.clone(), SkipReason::NoMatchingVersion),
        }
    }
}
