//! Version information from registry
//!
//! This module provides the VersionInfo struct that represents
//! a published release with its upload date and yank state.

use crate::domain::Version;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Information about a package version from the registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionInfo {
    /// The release version
    pub version: Version,
    /// When this version was uploaded
    pub released_at: DateTime<Utc>,
    /// Whether the release was yanked (PEP 592)
    #[serde(default)]
    pub yanked: bool,
}

impl VersionInfo {
    /// Create a new VersionInfo
    pub fn new(version: Version, released_at: DateTime<Utc>) -> Self {
        Self {
            version,
            released_at,
            yanked: false,
        }
    }

    /// Parse a registry version string; None if it is not a PEP 440 version
    pub fn parse(version: &str, released_at: DateTime<Utc>) -> Option<Self> {
        version
            .parse()
            .ok()
            .map(|version| Self::new(version, released_at))
    }

    /// Mark the release as yanked (builder pattern)
    pub fn with_yanked(mut self, yanked: bool) -> Self {
        self.yanked = yanked;
        self
    }

    /// Returns true if this is a pre-release (including dev releases)
    pub fn is_prerelease(&self) -> bool {
        self.version.is_prerelease()
    }
}

impl Ord for VersionInfo {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.version
            .cmp(&other.version)
            .then(self.released_at.cmp(&other.released_at))
    }
}

impl PartialOrd for VersionInfo {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
