//! Validation findings

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// How serious a finding is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Advisory; only fails the run in strict mode
    Warning,
    /// The manifest is malformed
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// What is wrong with a line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IssueKind {
    /// Requirement line with no package name
    EmptyName,
    /// Package name with whitespace or characters outside PEP 508 names
    InvalidName { name: String },
    /// Malformed version specifier
    InvalidSpecifier { message: String },
    /// Line that is not a requirement, option or comment
    MalformedLine { message: String },
    /// Package declared more than once
    DuplicateDeclaration {
        first_origin: PathBuf,
        first_line: usize,
    },
    /// No version can satisfy the constraint
    UnsatisfiableConstraint { constraint: String },
    /// `-r` include chain loops back on itself
    IncludeCycle { target: PathBuf },
    /// `-r` include target does not exist or cannot be read
    IncludeNotFound { target: PathBuf },
    /// Entry without any version constraint
    Unpinned,
    /// Entry with only a lower bound
    MissingUpperBound,
    /// Option line pip does not recognize
    UnsupportedDirective { directive: String },
}

impl IssueKind {
    /// Default severity of this kind of finding
    pub fn severity(&self) -> Severity {
        match self {
            IssueKind::Unpinned
            | IssueKind::MissingUpperBound
            | IssueKind::UnsupportedDirective { .. } => Severity::Warning,
            _ => Severity::Error,
        }
    }

    /// Short machine-friendly code
    pub fn code(&self) -> &'static str {
        match self {
            IssueKind::EmptyName => "empty_name",
            IssueKind::InvalidName { .. } => "invalid_name",
            IssueKind::InvalidSpecifier { .. } => "invalid_specifier",
            IssueKind::MalformedLine { .. } => "malformed_line",
            IssueKind::DuplicateDeclaration { .. } => "duplicate_declaration",
            IssueKind::UnsatisfiableConstraint { .. } => "unsatisfiable_constraint",
            IssueKind::IncludeCycle { .. } => "include_cycle",
            IssueKind::IncludeNotFound { .. } => "include_not_found",
            IssueKind::Unpinned => "unpinned",
            IssueKind::MissingUpperBound => "missing_upper_bound",
            IssueKind::UnsupportedDirective { .. } => "unsupported_directive",
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueKind::EmptyName => write!(f, "requirement has no package name"),
            IssueKind::InvalidName { name } => write!(f, "invalid package name '{}'", name),
            IssueKind::InvalidSpecifier { message } => write!(f, "{}", message),
            IssueKind::MalformedLine { message } => write!(f, "{}", message),
            IssueKind::DuplicateDeclaration {
                first_origin,
                first_line,
            } => write!(
                f,
                "duplicate declaration (first declared at {}:{})",
                first_origin.display(),
                first_line
            ),
            IssueKind::UnsatisfiableConstraint { constraint } => {
                write!(f, "constraint '{}' cannot be satisfied", constraint)
            }
            IssueKind::IncludeCycle { target } => {
                write!(f, "include cycle through {}", target.display())
            }
            IssueKind::IncludeNotFound { target } => {
                write!(f, "included file not found: {}", target.display())
            }
            IssueKind::Unpinned => write!(f, "no version constraint"),
            IssueKind::MissingUpperBound => write!(f, "no upper bound"),
            IssueKind::UnsupportedDirective { directive } => {
                write!(f, "unsupported option '{}'", directive)
            }
        }
    }
}

/// A finding attached to a manifest line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// File the line belongs to
    pub origin: PathBuf,
    /// 1-based line number
    pub line: usize,
    /// Package the finding concerns, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
    /// What is wrong
    #[serde(flatten)]
    pub kind: IssueKind,
    /// How serious it is
    pub severity: Severity,
}

impl Issue {
    /// Creates an issue with the kind's default severity
    pub fn new(origin: impl Into<PathBuf>, line: usize, kind: IssueKind) -> Self {
        Self {
            origin: origin.into(),
            line,
            package: None,
            severity: kind.severity(),
            kind,
        }
    }

    /// Attaches the package name (builder pattern)
    pub fn with_package(mut self, package: impl Into<String>) -> Self {
        self.package = Some(package.into());
        self
    }

    /// Returns true for error-severity findings
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}: ", self.origin.display(), self.line, self.severity)?;
        if let Some(ref package) = self.package {
            write!(f, "{}: ", package)?;
        }
        write!(f, "{}", self.kind)
    }
}
