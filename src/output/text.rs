//! Text output formatter for human-readable display
//!
//! This module provides:
//! - Per-manifest findings with line locations and colors
//! - Entry listing by group in verbose mode
//! - Resolution results with release dates
//! - Probe outcomes and an overall PASSED/FAILED summary

use crate::domain::{CheckSummary, Issue, ManifestReport, ResolveResult, Severity};
use crate::orchestrator::OrchestratorResult;
use crate::output::{OutputFormatter, Verbosity};
use colored::Colorize;
use std::io::Write;

/// Text formatter for human-readable output
pub struct TextFormatter {
    /// Verbosity level
    verbosity: Verbosity,
    /// Whether to use colors
    color: bool,
}

fn plural(count: usize, singular: &'static str, plural: &'static str) -> &'static str {
    if count == 1 {
        singular
    } else {
        plural
    }
}

impl TextFormatter {
    /// Create a new text formatter
    pub fn new(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            color: true,
        }
    }

    /// Create a new text formatter with color option
    pub fn with_color(verbosity: Verbosity, color: bool) -> Self {
        Self { verbosity, color }
    }

    /// Location of an issue, relative to the report it belongs to
    fn issue_location(&self, report: &ManifestReport, issue: &Issue) -> String {
        if issue.origin == report.path() {
            format!("line {}", issue.line)
        } else {
            format!("{}:{}", issue.origin.display(), issue.line)
        }
    }

    /// Format a single finding
    fn format_issue_line(
        &self,
        report: &ManifestReport,
        issue: &Issue,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let location = self.issue_location(report, issue);
        let package = issue
            .package
            .as_deref()
            .map(|p| format!("{}: ", p))
            .unwrap_or_default();

        if self.color {
            let severity = match issue.severity {
                Severity::Error => "error".red().bold(),
                Severity::Warning => "warning".yellow(),
            };
            writeln!(
                writer,
                "  {} {} {}{}",
                location.dimmed(),
                severity,
                package.bright_white().bold(),
                issue.kind
            )
        } else {
            writeln!(
                writer,
                "  {} {} {}{}",
                location, issue.severity, package, issue.kind
            )
        }
    }

    /// List entries by group, then directives
    fn format_entries(
        &self,
        report: &ManifestReport,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let manifest = &report.manifest;
        let mut groups: Vec<Option<&str>> = vec![None];
        groups.extend(manifest.groups().into_iter().map(Some));

        for group in groups {
            let entries: Vec<_> = manifest
                .entries
                .iter()
                .filter(|e| e.group.as_deref() == group)
                .collect();
            if entries.is_empty() {
                continue;
            }

            if let Some(name) = group {
                if self.color {
                    writeln!(writer, "  {}", format!("# {}", name).dimmed())?;
                } else {
                    writeln!(writer, "  # {}", name)?;
                }
            }
            for entry in entries {
                writeln!(writer, "    {}", entry)?;
            }
        }

        if !manifest.directives.is_empty() {
            if self.color {
                writeln!(writer, "  {}", "Options:".dimmed())?;
            } else {
                writeln!(writer, "  Options:")?;
            }
            for directive in &manifest.directives {
                writeln!(writer, "    {} {}", directive.option, directive.value)?;
            }
        }

        Ok(())
    }

    /// Format a single resolution line
    fn format_resolution_line(
        &self,
        result: &ResolveResult,
        max_name_len: usize,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        match result {
            ResolveResult::Resolved {
                dependency,
                version,
                released_at,
            } => {
                let spec = if dependency.version_spec.is_any() {
                    "*".to_string()
                } else {
                    dependency.version_spec.to_string()
                };
                let date = released_at.format("%Y/%m/%d").to_string();
                if self.color {
                    let name = format!("{:width$}", dependency.name, width = max_name_len);
                    writeln!(
                        writer,
                        "  {} {} → {} {}",
                        name.bright_white().bold(),
                        spec,
                        version.green(),
                        format!("({})", date).dimmed()
                    )
                } else {
                    writeln!(
                        writer,
                        "  {:width$} {} → {} ({})",
                        dependency.name,
                        spec,
                        version,
                        date,
                        width = max_name_len
                    )
                }
            }
            ResolveResult::Skipped { dependency, reason } => {
                if self.color {
                    let name = format!("{:width$}", dependency.name, width = max_name_len);
                    let reason = format!("({})", reason);
                    if result.is_failure() {
                        writeln!(writer, "  {} {}", name.bright_white().bold(), reason.red())
                    } else {
                        writeln!(writer, "  {} {}", name.dimmed(), reason.dimmed())
                    }
                } else {
                    writeln!(
                        writer,
                        "  {:width$} ({})",
                        dependency.name,
                        reason,
                        width = max_name_len
                    )
                }
            }
        }
    }

    /// Format resolution results; plain skips only appear in verbose mode
    fn format_resolutions(
        &self,
        report: &ManifestReport,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let shown: Vec<&ResolveResult> = report
            .resolutions
            .iter()
            .filter(|r| {
                self.verbosity == Verbosity::Verbose || r.is_resolved() || r.is_failure()
            })
            .collect();
        if shown.is_empty() {
            return Ok(());
        }

        let max_name_len = shown
            .iter()
            .map(|r| r.package_name().len())
            .max()
            .unwrap_or(0)
            .max(20);

        writeln!(writer)?;
        if self.color {
            writeln!(writer, "  {}", "Resolved:".dimmed())?;
        } else {
            writeln!(writer, "  Resolved:")?;
        }
        for result in shown {
            self.format_resolution_line(result, max_name_len, writer)?;
        }
        Ok(())
    }

    fn format_probes(&self, summary: &CheckSummary, writer: &mut dyn Write) -> std::io::Result<()> {
        if summary.probes.is_empty() {
            return Ok(());
        }

        if self.color {
            writeln!(writer, "{}:", "Probes".bold())?;
        } else {
            writeln!(writer, "Probes:")?;
        }
        for probe in &summary.probes {
            let verdict = if probe.satisfied {
                "satisfies"
            } else {
                "does not satisfy"
            };
            let constraint = if probe.constraint.is_empty() {
                "*"
            } else {
                probe.constraint.as_str()
            };
            if self.color {
                let mark = if probe.satisfied {
                    "✓".green()
                } else {
                    "✗".red()
                };
                writeln!(
                    writer,
                    "  {} {} {} {} {} {}",
                    mark,
                    probe.package.bright_white().bold(),
                    probe.version,
                    verdict,
                    constraint,
                    format!("({})", probe.manifest.display()).dimmed()
                )?;
            } else {
                let mark = if probe.satisfied { "+" } else { "-" };
                writeln!(
                    writer,
                    "  {} {} {} {} {} ({})",
                    mark,
                    probe.package,
                    probe.version,
                    verdict,
                    constraint,
                    probe.manifest.display()
                )?;
            }
        }
        writeln!(writer)
    }

    fn status_label(&self, passed: bool) -> String {
        match (passed, self.color) {
            (true, true) => "PASSED".green().bold().to_string(),
            (false, true) => "FAILED".red().bold().to_string(),
            (true, false) => "PASSED".to_string(),
            (false, false) => "FAILED".to_string(),
        }
    }

    /// Write the summary with an explicit overall verdict
    fn write_summary(
        &self,
        summary: &CheckSummary,
        passed: bool,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let files = summary.files_checked();
        let errors = summary.total_errors();
        let warnings = summary.total_warnings();
        let status = self.status_label(passed);
        let strict = if summary.strict { " (strict)" } else { "" };

        if self.verbosity == Verbosity::Quiet {
            return writeln!(
                writer,
                "{}{}: {} {}, {} {}, {} {}",
                status,
                strict,
                files,
                plural(files, "file", "files"),
                errors,
                plural(errors, "error", "errors"),
                warnings,
                plural(warnings, "warning", "warnings")
            );
        }

        if self.color {
            writeln!(writer, "{}:", "Summary".bold())?;
        } else {
            writeln!(writer, "Summary:")?;
        }
        writeln!(
            writer,
            "  {} {} checked, {} {}",
            files,
            plural(files, "file", "files"),
            summary.total_entries(),
            plural(summary.total_entries(), "entry", "entries")
        )?;
        if self.color {
            writeln!(
                writer,
                "  {} {}, {} {}",
                errors.to_string().red(),
                plural(errors, "error", "errors"),
                warnings.to_string().yellow(),
                plural(warnings, "warning", "warnings")
            )?;
        } else {
            writeln!(
                writer,
                "  {} {}, {} {}",
                errors,
                plural(errors, "error", "errors"),
                warnings,
                plural(warnings, "warning", "warnings")
            )?;
        }

        if summary.reports.iter().any(|r| !r.resolutions.is_empty()) {
            writeln!(
                writer,
                "  {} resolved, {} unresolved",
                summary.total_resolved(),
                summary.total_unresolved()
            )?;
        }

        writeln!(writer, "  Result: {}{}", status, strict)
    }
}

impl OutputFormatter for TextFormatter {
    fn format(&self, result: &OrchestratorResult, writer: &mut dyn Write) -> std::io::Result<()> {
        let passed = result.summary.passed() && !result.has_fatal_error();

        // In quiet mode, only show summary
        if self.verbosity == Verbosity::Quiet {
            return self.write_summary(&result.summary, passed, writer);
        }

        for report in &result.summary.reports {
            self.format_report(report, writer)?;
        }

        self.format_probes(&result.summary, writer)?;

        if !result.errors.is_empty() {
            if self.color {
                writeln!(writer, "{}:", "Errors".red().bold())?;
            } else {
                writeln!(writer, "Errors:")?;
            }
            for error in &result.errors {
                if self.color {
                    writeln!(writer, "  {} {}", "✗".red(), error)?;
                } else {
                    writeln!(writer, "  - {}", error)?;
                }
            }
            writeln!(writer)?;
        }

        self.write_summary(&result.summary, passed, writer)
    }

    fn format_summary(
        &self,
        summary: &CheckSummary,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        self.write_summary(summary, summary.passed(), writer)
    }

    fn format_report(
        &self,
        report: &ManifestReport,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let entries = report.manifest.len();
        let errors = report.error_count();
        let warnings = report.warning_count();
        let path_display = report.path().display().to_string();

        if self.color {
            write!(writer, "{}", path_display.bold())?;
            writeln!(
                writer,
                " — {} {}, {} {}, {} {}",
                entries,
                plural(entries, "entry", "entries"),
                errors.to_string().red(),
                plural(errors, "error", "errors"),
                warnings.to_string().yellow(),
                plural(warnings, "warning", "warnings")
            )?;
        } else {
            writeln!(
                writer,
                "{} — {} {}, {} {}, {} {}",
                path_display,
                entries,
                plural(entries, "entry", "entries"),
                errors,
                plural(errors, "error", "errors"),
                warnings,
                plural(warnings, "warning", "warnings")
            )?;
        }

        if self.verbosity == Verbosity::Verbose {
            self.format_entries(report, writer)?;
        }

        for issue in &report.issues {
            self.format_issue_line(report, issue, writer)?;
        }

        self.format_resolutions(report, writer)?;

        writeln!(writer)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        Dependency, Directive, IssueKind, Manifest, ProbeOutcome, SkipReason, VersionSpec,
    };
    use crate::orchestrator::OrchestratorError;
    use crate::parser::parse_specifier;
    use chrono::{TimeZone, Utc};
    use std::path::PathBuf;

    fn dependency(name: &str, spec: &str, line: usize) -> Dependency {
        let version_spec = if spec.is_empty() {
            VersionSpec::any()
        } else {
            parse_specifier(spec).unwrap()
        };
        Dependency::new(name, version_spec, "requirements.txt", line)
    }

    fn sample_report() -> ManifestReport {
        let mut manifest = Manifest::new("requirements.txt");
        manifest
            .entries
            .push(dependency("streamlit", ">=1.28.0,<2.0.0", 2).with_group(Some("UI".to_string())));
        manifest.entries.push(dependency("openai", "==0.28.1", 3));
        manifest.entries.push(dependency("rich", "", 4));
        manifest.directives.push(Directive {
            origin: PathBuf::from("requirements.txt"),
            line: 1,
            option: "--index-url".to_string(),
            value: "https://example.org/simple".to_string(),
        });

        let issues = vec![
            Issue::new("requirements.txt", 4, IssueKind::Unpinned).with_package("rich"),
            Issue::new(
                "requirements-dev.txt",
                7,
                IssueKind::InvalidSpecifier {
                    message: "invalid version '1..0' in '==1..0'".to_string(),
                },
            )
            .with_package("pytest"),
        ];
        ManifestReport::new(manifest, issues)
    }

    fn create_test_result() -> OrchestratorResult {
        let mut summary = CheckSummary::new(false);
        summary.add_report(sample_report());
        OrchestratorResult {
            summary,
            errors: Vec::new(),
        }
    }

    fn render(formatter: &TextFormatter, result: &OrchestratorResult) -> String {
        let mut output = Vec::new();
        formatter.format(result, &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_format_report_header_and_issues() {
        let formatter = TextFormatter::with_color(Verbosity::Normal, false);
        let output = render(&formatter, &create_test_result());

        assert!(output.contains("requirements.txt — 3 entries, 1 error, 1 warning"));
        assert!(output.contains("  line 4 warning rich: no version constraint"));
        assert!(output.contains(
            "  requirements-dev.txt:7 error pytest: invalid version '1..0' in '==1..0'"
        ));
        assert!(!output.contains("Options:"));
        assert!(output.contains("Result: FAILED"));
    }

    #[test]
    fn test_format_verbose_lists_entries() {
        let formatter = TextFormatter::with_color(Verbosity::Verbose, false);
        let output = render(&formatter, &create_test_result());

        assert!(output.contains("    openai==0.28.1"));
        assert!(output.contains("  # UI"));
        assert!(output.contains("    streamlit>=1.28.0,<2.0.0"));
        assert!(output.contains("    --index-url https://example.org/simple"));
        let ungrouped = output.find("openai==0.28.1").unwrap();
        let grouped = output.find("# UI").unwrap();
        assert!(ungrouped < grouped);
    }

    #[test]
    fn test_format_quiet_only_summary() {
        let formatter = TextFormatter::with_color(Verbosity::Quiet, false);
        let output = render(&formatter, &create_test_result());

        assert_eq!(output, "FAILED: 1 file, 1 error, 1 warning\n");
    }

    #[test]
    fn test_format_passed_summary() {
        let mut summary = CheckSummary::new(true);
        summary.add_report(ManifestReport::new(Manifest::new("requirements.txt"), Vec::new()));
        let formatter = TextFormatter::with_color(Verbosity::Normal, false);
        let mut output = Vec::new();
        formatter.format_summary(&summary, &mut output).unwrap();
        let output = String::from_utf8(output).unwrap();

        assert!(output.contains("1 file checked, 0 entries"));
        assert!(output.contains("0 errors, 0 warnings"));
        assert!(output.contains("Result: PASSED (strict)"));
        assert!(!output.contains("resolved"));
    }

    #[test]
    fn test_format_resolutions() {
        let mut result = create_test_result();
        let released = Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap();
        let report = &mut result.summary.reports[0];
        report.resolutions = vec![
            ResolveResult::resolved(
                dependency("streamlit", ">=1.28.0,<2.0.0", 2),
                "1.39.0",
                released,
            ),
            ResolveResult::skip(dependency("openai", "==0.28.1", 3), SkipReason::Excluded),
            ResolveResult::skip(dependency("rich", "", 4), SkipReason::NoMatchingVersion),
        ];

        let formatter = TextFormatter::with_color(Verbosity::Normal, false);
        let output = render(&formatter, &result);
        assert!(output.contains("streamlit            >=1.28.0,<2.0.0 → 1.39.0 (2024/01/15)"));
        assert!(output.contains("(no matching version)"));
        assert!(!output.contains("(excluded)"));
        assert!(output.contains("1 resolved, 1 unresolved"));

        let formatter = TextFormatter::with_color(Verbosity::Verbose, false);
        assert!(render(&formatter, &result).contains("(excluded)"));
    }

    #[test]
    fn test_format_probes_and_errors() {
        let mut result = create_test_result();
        result.summary.probes.push(ProbeOutcome {
            manifest: PathBuf::from("requirements.txt"),
            package: "streamlit".to_string(),
            version: "1.30.0".parse().unwrap(),
            constraint: ">=1.28.0,<2.0.0".to_string(),
            satisfied: true,
        });
        result
            .errors
            .push(OrchestratorError::ProbeError("package 'numpy' is not declared".to_string()));

        let formatter = TextFormatter::with_color(Verbosity::Normal, false);
        let output = render(&formatter, &result);
        assert!(output.contains(
            "  + streamlit 1.30.0 satisfies >=1.28.0,<2.0.0 (requirements.txt)"
        ));
        assert!(output.contains("Errors:"));
        assert!(output.contains("  - Probe error: package 'numpy' is not declared"));
    }

    #[test]
    fn test_fatal_error_fails_run() {
        let result = OrchestratorResult {
            summary: CheckSummary::new(false),
            errors: vec![OrchestratorError::ManifestDetectionError("missing".to_string())],
        };
        let formatter = TextFormatter::with_color(Verbosity::Quiet, false);
        assert!(render(&formatter, &result).starts_with("FAILED"));
    }

    #[test]
    fn test_format_with_color_does_not_panic() {
        let formatter = TextFormatter::new(Verbosity::Verbose);
        let output = render(&formatter, &create_test_result());
        assert!(output.contains("streamlit"));
    }
}
