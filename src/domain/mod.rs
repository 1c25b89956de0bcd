//! Core domain models for reqlint
//!
//! This module contains the fundamental types used throughout the application:
//! - PEP 440 versions and version specifications
//! - Dependency entries and the manifest that declares them
//! - Validation findings
//! - Resolution results
//! - Report and summary structures

mod dependency;
mod issue;
mod manifest;
mod report;
mod resolve_result;
mod version;
mod version_spec;

pub use dependency::{normalize_name, Dependency};
pub use issue::{Issue, IssueKind, Severity};
pub use manifest::{Directive, Manifest};
pub use report::{CheckSummary, ManifestReport, ProbeOutcome};
pub use resolve_result::{ResolveResult, SkipReason};
pub use version::{PreRelease, Version};
pub use version_spec::{Bound, Clause, Comparator, VersionSpec, VersionSpecKind};
