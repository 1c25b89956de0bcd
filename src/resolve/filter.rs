//! Resolution filter configuration
//!
//! This module provides the ResolveFilter struct that encapsulates
//! all filter options for choosing a version.

use crate::domain::normalize_name;
use std::time::Duration;

/// Filter configuration for resolution
#[derive(Debug, Clone, Default)]
pub struct ResolveFilter {
    /// Packages to leave unresolved
    pub exclude: Vec<String>,
    /// If non-empty, only resolve these packages
    pub only: Vec<String>,
    /// Consider pre-releases even when the constraint does not name one
    pub include_prereleases: bool,
    /// Minimum age for versions to be considered
    pub min_age: Option<Duration>,
}

impl ResolveFilter {
    /// Create a new ResolveFilter with default settings (resolve all)
    pub fn new() -> Self {
        Self::default()
    }

    /// Set packages to exclude
    pub fn with_exclude(mut self, exclude: Vec<String>) -> Self {
        self.exclude = exclude;
        self
    }

    /// Set packages to resolve (only list)
    pub fn with_only(mut self, only: Vec<String>) -> Self {
        self.only = only;
        self
    }

    /// Set whether pre-releases are candidates
    pub fn with_prereleases(mut self, include: bool) -> Self {
        self.include_prereleases = include;
        self
    }

    /// Set minimum age for versions
    pub fn with_min_age(mut self, age: Duration) -> Self {
        self.min_age = Some(age);
        self
    }

    /// Check if a package should be resolved based on filters
    ///
    /// Names are compared after normalization, so `--only Google_Auth` matches `google-auth`.
    pub fn should_process_package(&self, name: &str) -> bool {
        let name = normalize_name(name);
        if !self.only.is_empty() {
            return self.only.iter().any(|p| normalize_name(p) == name);
        }
        !self.exclude.iter().any(|p| normalize_name(p) == name)
    }
}
