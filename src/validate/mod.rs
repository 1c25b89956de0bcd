//! Manifest validation
//!
//! This module provides:
//! - Validation options from CLI args and configuration
//! - The validator that checks names, uniqueness, satisfiability and pinning
//! - `--probe` evaluation of a candidate version against a declared constraint

mod probe;

pub use probe::{evaluate_probe, Probe};

use crate::domain::{Dependency, Issue, IssueKind, Manifest, ManifestReport, VersionSpecKind};
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

// PEP 508 distribution names
static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^([a-z0-9]|[a-z0-9][a-z0-9._-]*[a-z0-9])$").unwrap());

/// Options controlling which advisories are reported
#[derive(Debug, Clone, Default)]
pub struct ValidateOptions {
    /// Suppress Unpinned and MissingUpperBound warnings
    pub allow_unpinned: bool,
}

impl ValidateOptions {
    /// Create options with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether unpinned entries are acceptable
    pub fn with_allow_unpinned(mut self, allow: bool) -> Self {
        self.allow_unpinned = allow;
        self
    }
}

/// Checks a loaded manifest and produces its report
pub struct Validator {
    options: ValidateOptions,
}

impl Validator {
    /// Create a new Validator with the given options
    pub fn new(options: ValidateOptions) -> Self {
        Self { options }
    }

    /// Validate a manifest
    ///
    /// Parse problems recorded while loading are carried into the report.
    /// Issues are ordered by file (top-level file first) and line.
    pub fn validate(&self, manifest: Manifest) -> ManifestReport {
        let mut issues = manifest.parse_issues.clone();
        let mut seen: HashMap<&str, Vec<&Dependency>> = HashMap::new();

        for entry in &manifest.entries {
            if let Some(issue) = self.check_name(entry) {
                issues.push(issue);
                // Nothing else is meaningful for an entry without a usable name
                continue;
            }

            let earlier = seen.entry(entry.normalized_name.as_str()).or_default();
            if let Some(first) = earlier.iter().find(|first| conflicts(first, entry)) {
                issues.push(
                    issue_for(
                        entry,
                        IssueKind::DuplicateDeclaration {
                            first_origin: first.origin.clone(),
                            first_line: first.line,
                        },
                    ),
                );
            }
            earlier.push(entry);

            if let Some(issue) = self.check_constraint(entry) {
                issues.push(issue);
            }
            issues.extend(self.check_advisories(entry));
        }

        let top = manifest.path.clone();
        issues.sort_by_key(|issue| (issue.origin != top, issue.origin.clone(), issue.line));

        ManifestReport::new(manifest, issues)
    }

    /// Check that the entry has a well-formed package name
    pub fn check_name(&self, entry: &Dependency) -> Option<Issue> {
        if entry.name.is_empty() {
            return Some(Issue::new(&entry.origin, entry.line, IssueKind::EmptyName));
        }
        if !NAME_RE.is_match(&entry.name) {
            return Some(Issue::new(
                &entry.origin,
                entry.line,
                IssueKind::InvalidName {
                    name: entry.name.clone(),
                },
            ));
        }
        None
    }

    /// Check that some version can satisfy the entry's constraint
    pub fn check_constraint(&self, entry: &Dependency) -> Option<Issue> {
        if entry.version_spec.is_satisfiable() {
            return None;
        }
        Some(issue_for(
            entry,
            IssueKind::UnsatisfiableConstraint {
                constraint: entry.version_spec.to_string(),
            },
        ))
    }

    /// Warnings about loosely constrained entries
    pub fn check_advisories(&self, entry: &Dependency) -> Vec<Issue> {
        if self.options.allow_unpinned || entry.is_direct_reference() {
            return Vec::new();
        }
        match entry.version_spec.kind() {
            VersionSpecKind::Any | VersionSpecKind::Exclusion => {
                vec![issue_for(entry, IssueKind::Unpinned)]
            }
            VersionSpecKind::LowerBound => vec![issue_for(entry, IssueKind::MissingUpperBound)],
            _ => Vec::new(),
        }
    }
}

// Declarations under different, explicit markers target different environments
fn conflicts(first: &Dependency, entry: &Dependency) -> bool {
    match (&first.marker, &entry.marker) {
        (Some(a), Some(b)) => a == b,
        _ => true,
    }
}

fn issue_for(entry: &Dependency, kind: IssueKind) -> Issue {
    Issue::new(&entry.origin, entry.line, kind).with_package(entry.name.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_specifier;
    use std::path::PathBuf;

    fn entry(name: &str, spec: &str, line: usize) -> Dependency {
        Dependency::new(name, parse_specifier(spec).unwrap(), "requirements.txt", line)
    }

    fn manifest(entries: Vec<Dependency>) -> Manifest {
        let mut manifest = Manifest::new("requirements.txt");
        manifest.entries = entries;
        manifest
    }

    fn validate(entries: Vec<Dependency>) -> ManifestReport {
        Validator::new(ValidateOptions::new()).validate(manifest(entries))
    }

    fn codes(report: &ManifestReport) -> Vec<&'static str> {
        report.issues.iter().map(|i| i.kind.code()).collect()
    }

    #[test]
    fn test_valid_manifest_passes() {
        let report = validate(vec![
            entry("streamlit", ">=1.28.0,<2.0.0", 2),
            entry("openai", "==0.28.1", 3),
            entry("pandas", "~=2.1", 4),
        ]);
        assert!(report.issues.is_empty());
        assert!(report.passed(true));
    }

    #[test]
    fn test_duplicate_declaration() {
        let report = validate(vec![
            entry("openai", "==0.28.1", 3),
            entry("rich", "==13.7.0", 4),
            entry("openai", ">=1.0,<2", 9),
        ]);
        assert_eq!(codes(&report), vec!["duplicate_declaration"]);
        let issue = &report.issues[0];
        assert_eq!(issue.line, 9);
        assert_eq!(issue.package.as_deref(), Some("openai"));
        assert_eq!(
            issue.kind,
            IssueKind::DuplicateDeclaration {
                first_origin: PathBuf::from("requirements.txt"),
                first_line: 3
            }
        );
        assert!(!report.passed(false));
    }

    #[test]
    fn test_duplicate_after_normalization() {
        let report = validate(vec![
            entry("google_auth", "==2.0.0", 1),
            entry("Google-Auth", "==2.0.0", 2),
        ]);
        assert_eq!(codes(&report), vec!["duplicate_declaration"]);
    }

    #[test]
    fn test_disjoint_markers_are_not_duplicates() {
        let report = validate(vec![
            entry("numpy", "==1.24.4", 1).with_marker("python_version < \"3.9\""),
            entry("numpy", "==1.26.4", 2).with_marker("python_version >= \"3.9\""),
        ]);
        assert!(report.issues.is_empty());

        let report = validate(vec![
            entry("numpy", "==1.24.4", 1),
            entry("numpy", "==1.26.4", 2).with_marker("python_version >= \"3.9\""),
        ]);
        assert_eq!(codes(&report), vec!["duplicate_declaration"]);
    }

    #[test]
    fn test_empty_and_invalid_names() {
        let report = validate(vec![entry("", ">=1.0", 1), entry("my package", ">=1.0,<2", 2)]);
        assert_eq!(codes(&report), vec!["empty_name", "invalid_name"]);
        assert!(report.issues.iter().all(|i| i.is_error()));
    }

    #[test]
    fn test_name_edge_characters() {
        let validator = Validator::new(ValidateOptions::new());
        assert!(validator.check_name(&entry("zope.interface", "", 1)).is_none());
        assert!(validator.check_name(&entry("a", "", 1)).is_none());
        assert!(validator.check_name(&entry("-leading", "", 1)).is_some());
        assert!(validator.check_name(&entry("trailing_", "", 1)).is_some());
    }

    #[test]
    fn test_unsatisfiable_constraint() {
        let report = validate(vec![entry("pandas", ">=2.0,<1.0", 5)]);
        assert_eq!(codes(&report), vec!["unsatisfiable_constraint"]);
        assert_eq!(
            report.issues[0].kind,
            IssueKind::UnsatisfiableConstraint {
                constraint: ">=2.0,<1.0".to_string()
            }
        );
    }

    #[test]
    fn test_equal_bounds() {
        assert!(validate(vec![entry("pandas", ">=2.0,<=2.0", 1)]).issues.is_empty());
        assert_eq!(
            codes(&validate(vec![entry("pandas", ">=2.0,<2.0", 1)])),
            vec!["unsatisfiable_constraint"]
        );
    }

    #[test]
    fn test_wildcard_at_segment_limit_is_checked() {
        let report = validate(vec![
            entry("foo", "==18446744073709551615.*", 1),
            entry("bar", "~=18446744073709551615.0", 2),
        ]);
        assert!(codes(&report).iter().all(|c| *c != "unsatisfiable_constraint"));
    }

    #[test]
    fn test_advisories() {
        let report = validate(vec![
            entry("requests", "", 1),
            entry("numpy", ">=1.24", 2),
            entry("rich", "!=13.0", 3),
        ]);
        assert_eq!(codes(&report), vec!["unpinned", "missing_upper_bound", "unpinned"]);
        assert!(report.passed(false));
        assert!(!report.passed(true));
    }

    #[test]
    fn test_allow_unpinned_suppresses_advisories() {
        let validator = Validator::new(ValidateOptions::new().with_allow_unpinned(true));
        let report = validator.validate(manifest(vec![
            entry("requests", "", 1),
            entry("numpy", ">=1.24", 2),
        ]));
        assert!(report.issues.is_empty());
    }

    #[test]
    fn test_direct_reference_is_not_unpinned() {
        let report = validate(vec![Dependency::new(
            "mypkg",
            Default::default(),
            "requirements.txt",
            1,
        )
        .with_url("https://example.com/mypkg.whl")]);
        assert!(report.issues.is_empty());
    }

    #[test]
    fn test_parse_issues_merged_in_line_order() {
        let mut m = manifest(vec![entry("requests", "", 4)]);
        m.parse_issues.push(Issue::new(
            "requirements.txt",
            2,
            IssueKind::MalformedLine {
                message: "bad".to_string(),
            },
        ));
        let report = Validator::new(ValidateOptions::new()).validate(m);
        let lines: Vec<_> = report.issues.iter().map(|i| i.line).collect();
        assert_eq!(lines, vec![2, 4]);
    }

    #[test]
    fn test_top_level_issues_sort_before_included() {
        let mut m = manifest(vec![
            Dependency::new("rich", Default::default(), "base.txt", 1),
            entry("tqdm", "", 5),
        ]);
        m.path = PathBuf::from("requirements.txt");
        let report = Validator::new(ValidateOptions::new()).validate(m);
        assert_eq!(report.issues[0].origin, PathBuf::from("requirements.txt"));
        assert_eq!(report.issues[1].origin, PathBuf::from("base.txt"));
    }
}
