//! JSON output formatter for machine processing
//!
//! This module provides:
//! - JSON serialization of check results
//! - Structured file-by-file findings and resolutions

use crate::domain::{CheckSummary, Dependency, Issue, ManifestReport, ProbeOutcome, ResolveResult};
use crate::orchestrator::OrchestratorResult;
use crate::output::{OutputFormatter, Verbosity};
use serde::Serialize;
use std::io::Write;

/// JSON formatter for machine-readable output
pub struct JsonFormatter {
    /// Verbosity level affects detail in output
    verbosity: Verbosity,
}

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }
}

/// JSON representation of the full result
#[derive(Serialize)]
struct JsonOutput<'a> {
    /// Overall verdict
    passed: bool,
    /// Whether warnings fail the run
    strict: bool,
    /// Summary statistics
    summary: JsonSummary,
    /// Per-manifest results
    manifests: Vec<JsonManifest<'a>>,
    /// Probe evaluations
    #[serde(skip_serializing_if = "Vec::is_empty")]
    probes: Vec<&'a ProbeOutcome>,
    /// Errors encountered
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<String>,
}

/// JSON representation of summary statistics
#[derive(Serialize)]
struct JsonSummary {
    files: usize,
    entries: usize,
    errors: usize,
    warnings: usize,
    resolved: usize,
    unresolved: usize,
}

impl JsonSummary {
    fn from_summary(summary: &CheckSummary) -> Self {
        Self {
            files: summary.files_checked(),
            entries: summary.total_entries(),
            errors: summary.total_errors(),
            warnings: summary.total_warnings(),
            resolved: summary.total_resolved(),
            unresolved: summary.total_unresolved(),
        }
    }
}

fn is_empty_slice<T>(items: &&[T]) -> bool {
    items.is_empty()
}

/// JSON representation of a manifest report
#[derive(Serialize)]
struct JsonManifest<'a> {
    /// Path to the manifest file
    path: String,
    /// Whether the manifest passed on its own
    passed: bool,
    /// Number of entries
    entries: usize,
    /// Group comments in order of appearance
    #[serde(skip_serializing_if = "Vec::is_empty")]
    groups: Vec<&'a str>,
    /// Files pulled in through `-r`
    #[serde(skip_serializing_if = "Vec::is_empty")]
    includes: Vec<String>,
    /// Findings
    issues: &'a [Issue],
    /// Resolution results
    #[serde(skip_serializing_if = "is_empty_slice")]
    resolutions: &'a [ResolveResult],
    /// Parsed entries (only in verbose mode)
    #[serde(skip_serializing_if = "Option::is_none")]
    dependencies: Option<&'a [Dependency]>,
}

impl JsonFormatter {
    /// Convert a manifest report to its JSON representation
    fn report_to_json<'a>(&self, report: &'a ManifestReport, strict: bool) -> JsonManifest<'a> {
        let manifest = &report.manifest;
        JsonManifest {
            path: report.path().display().to_string(),
            passed: report.passed(strict),
            entries: manifest.len(),
            groups: manifest.groups(),
            includes: manifest
                .includes
                .iter()
                .map(|p| p.display().to_string())
                .collect(),
            issues: &report.issues,
            resolutions: &report.resolutions,
            dependencies: (self.verbosity == Verbosity::Verbose).then_some(&manifest.entries[..]),
        }
    }

    fn write_json<T: Serialize>(&self, value: &T, writer: &mut dyn Write) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(value).map_err(std::io::Error::other)?;
        writeln!(writer, "{}", json)
    }
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, result: &OrchestratorResult, writer: &mut dyn Write) -> std::io::Result<()> {
        let summary = &result.summary;
        let output = JsonOutput {
            passed: summary.passed() && !result.has_fatal_error(),
            strict: summary.strict,
            summary: JsonSummary::from_summary(summary),
            manifests: summary
                .reports
                .iter()
                .map(|r| self.report_to_json(r, summary.strict))
                .collect(),
            probes: summary.probes.iter().collect(),
            errors: result.errors.iter().map(|e| e.to_string()).collect(),
        };

        self.write_json(&output, writer)
    }

    fn format_summary(
        &self,
        summary: &CheckSummary,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        self.write_json(&JsonSummary::from_summary(summary), writer)
    }

    fn format_report(
        &self,
        report: &ManifestReport,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        self.write_json(&self.report_to_json(report, false), writer)
    }
}
