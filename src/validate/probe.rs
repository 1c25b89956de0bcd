//! `--probe NAME=VERSION` evaluation

use crate::domain::{Manifest, ProbeOutcome, Version};
use crate::error::ConfigError;
use std::fmt;
use std::str::FromStr;

/// A candidate version to test against a declared constraint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Probe {
    /// Package name as given on the command line
    pub package: String,
    /// Candidate version
    pub version: Version,
}

impl FromStr for Probe {
    type Err = ConfigError;

    /// Accepts `NAME=VERSION` and `NAME==VERSION`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidProbe {
            value: s.to_string(),
        };

        let (package, version) = s.split_once('=').ok_or_else(invalid)?;
        let version = version.strip_prefix('=').unwrap_or(version);
        let package = package.trim();
        // `foo>=1.0` would otherwise split into the package `foo>`
        if package.is_empty() || package.contains(['<', '>', '!', '~', ' ']) {
            return Err(invalid());
        }
        let version = version.trim().parse::<Version>().map_err(|_| invalid())?;

        Ok(Self {
            package: package.to_string(),
            version,
        })
    }
}

impl fmt::Display for Probe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.package, self.version)
    }
}

/// Evaluate a probe against the first declaration of its package in `manifest`
///
/// Returns None if the manifest does not declare the package.
pub fn evaluate_probe(probe: &Probe, manifest: &Manifest) -> Option<ProbeOutcome> {
    let entry = manifest.find(&probe.package)?;
    Some(ProbeOutcome {
        manifest: manifest.path.clone(),
        package: entry.name.clone(),
        version: probe.version.clone(),
        constraint: entry.version_spec.to_string(),
        satisfied: entry.version_spec.matches(&probe.version),
    })
}
