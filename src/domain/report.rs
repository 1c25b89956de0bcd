//! Check result summary types
//!
//! Provides structures for tracking validation and resolution results at file and overall levels.

use super::{Issue, Manifest, ResolveResult, Severity, Version};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Check result for a single manifest file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestReport {
    /// The parsed manifest
    pub manifest: Manifest,
    /// Parse and validation findings, ordered by origin and line
    pub issues: Vec<Issue>,
    /// Per-entry resolution results (empty unless resolution ran)
    pub resolutions: Vec<ResolveResult>,
}

impl ManifestReport {
    /// Creates a report without resolution results
    pub fn new(manifest: Manifest, issues: Vec<Issue>) -> Self {
        Self {
            manifest,
            issues,
            resolutions: Vec::new(),
        }
    }

    /// Path to the manifest file
    pub fn path(&self) -> &Path {
        &self.manifest.path
    }

    /// Returns the number of error findings
    pub fn error_count(&self) -> usize {
        self.issues.iter().filter(|i| i.is_error()).count()
    }

    /// Returns the number of warning findings
    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Warning)
            .count()
    }

    /// Returns true if the manifest is well-formed
    ///
    /// In strict mode any warning also fails the manifest.
    pub fn passed(&self, strict: bool) -> bool {
        self.error_count() == 0 && (!strict || self.warning_count() == 0)
    }

    /// Returns true if an entry declared on `line` of `origin` has an error
    pub fn has_error_at(&self, origin: &Path, line: usize) -> bool {
        self.issues
            .iter()
            .any(|i| i.is_error() && i.line == line && i.origin == origin)
    }

    /// Returns the number of resolved entries
    pub fn resolved_count(&self) -> usize {
        self.resolutions.iter().filter(|r| r.is_resolved()).count()
    }

    /// Returns the number of entries that failed to resolve
    pub fn unresolved_count(&self) -> usize {
        self.resolutions.iter().filter(|r| r.is_failure()).count()
    }
}

/// Outcome of evaluating `--probe NAME=VERSION`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeOutcome {
    /// Manifest whose constraint was evaluated
    pub manifest: PathBuf,
    /// Package name as declared
    pub package: String,
    /// Candidate version
    pub version: Version,
    /// Declared constraint, as written
    pub constraint: String,
    /// Whether the candidate satisfies the constraint
    pub satisfied: bool,
}

/// Overall summary of a check run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckSummary {
    /// Results for each manifest file processed
    pub reports: Vec<ManifestReport>,
    /// Probe evaluations
    pub probes: Vec<ProbeOutcome>,
    /// Whether warnings fail the run
    pub strict: bool,
}

impl CheckSummary {
    /// Creates a new CheckSummary
    pub fn new(strict: bool) -> Self {
        Self {
            reports: Vec::new(),
            probes: Vec::new(),
            strict,
        }
    }

    /// Adds a manifest report
    pub fn add_report(&mut self, report: ManifestReport) {
        self.reports.push(report);
    }

    /// Returns the total number of files checked
    pub fn files_checked(&self) -> usize {
        self.reports.len()
    }

    /// Returns the total number of entries across all manifests
    pub fn total_entries(&self) -> usize {
        self.reports.iter().map(|r| r.manifest.len()).sum()
    }

    /// Returns the total number of errors
    pub fn total_errors(&self) -> usize {
        self.reports.iter().map(|r| r.error_count()).sum()
    }

    /// Returns the total number of warnings
    pub fn total_warnings(&self) -> usize {
        self.reports.iter().map(|r| r.warning_count()).sum()
    }

    /// Returns the total number of resolved entries
    pub fn total_resolved(&self) -> usize {
        self.reports.iter().map(|r| r.resolved_count()).sum()
    }

    /// Returns the total number of entries that failed to resolve
    pub fn total_unresolved(&self) -> usize {
        self.reports.iter().map(|r| r.unresolved_count()).sum()
    }

    /// Returns true if every manifest passed and every probe was satisfied
    pub fn passed(&self) -> bool {
        self.reports.iter().all(|r| r.passed(self.strict))
            && self.probes.iter().all(|p| p.satisfied)
    }

    /// Returns all issues across all manifests
    pub fn all_issues(&self) -> impl Iterator<Item = &Issue> {
        self.reports.iter().flat_map(|r| r.issues.iter())
    }
}

impl Default for CheckSummary {
    fn default() -> Self {
        Self::new(false)
    }
}
