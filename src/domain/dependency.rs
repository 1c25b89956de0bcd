//! Dependency entry structures

use super::VersionSpec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Normalizes a package name the way package indexes compare them (PEP 503)
///
/// Lowercases and collapses runs of `-`, `_` and `.` into a single `-`.
pub fn normalize_name(name: &str) -> String {
    let mut normalized = String::with_capacity(name.len());
    let mut in_separator = false;
    for c in name.chars() {
        if matches!(c, '-' | '_' | '.') {
            if !in_separator {
                normalized.push('-');
            }
            in_separator = true;
        } else {
            normalized.extend(c.to_lowercase());
            in_separator = false;
        }
    }
    normalized
}

/// A single requirement declared in a manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    /// Package name as written
    pub name: String,
    /// PEP 503 normalized name, used for uniqueness
    pub normalized_name: String,
    /// Requested extras (`name[extra1,extra2]`)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extras: Vec<String>,
    /// Version specification
    pub version_spec: VersionSpec,
    /// Environment marker after `;`, kept verbatim
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker: Option<String>,
    /// Direct reference URL (`name @ url`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Group comment heading the block this entry belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    /// File that declared this entry
    pub origin: PathBuf,
    /// 1-based line number of the entry
    pub line: usize,
}

impl Dependency {
    /// Creates a new dependency
    pub fn new(
        name: impl Into<String>,
        version_spec: VersionSpec,
        origin: impl Into<PathBuf>,
        line: usize,
    ) -> Self {
        let name = name.into();
        Self {
            normalized_name: normalize_name(&name),
            name,
            extras: Vec::new(),
            version_spec,
            marker: None,
            url: None,
            group: None,
            origin: origin.into(),
            line,
        }
    }

    /// Sets the extras (builder pattern)
    pub fn with_extras(mut self, extras: Vec<String>) -> Self {
        self.extras = extras;
        self
    }

    /// Sets the environment marker (builder pattern)
    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = Some(marker.into());
        self
    }

    /// Sets the direct reference URL (builder pattern)
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Sets the group comment (builder pattern)
    pub fn with_group(mut self, group: Option<String>) -> Self {
        self.group = group;
        self
    }

    /// Returns true if this dependency is pinned
    pub fn is_pinned(&self) -> bool {
        self.version_spec.is_pinned()
    }

    /// Returns true if this entry points at a URL instead of an index release
    pub fn is_direct_reference(&self) -> bool {
        self.url.is_some()
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.extras.is_empty() {
            write!(f, "[{}]", self.extras.join(","))?;
        }
        if let Some(ref url) = self.url {
            write!(f, " @ {}", url)?;
        } else {
            write!(f, "{}", self.version_spec)?;
        }
        if let Some(ref marker) = self.marker {
            write!(f, "; {}", marker)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Clause, Comparator};

    fn pinned(version: &str) -> VersionSpec {
        VersionSpec::new(
            format!("=={}", version),
            vec![Clause::new(Comparator::Equal, version.parse().unwrap())],
        )
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("Streamlit"), "streamlit");
        assert_eq!(normalize_name("google_auth"), "google-auth");
        assert_eq!(normalize_name("zope.interface"), "zope-interface");
        assert_eq!(normalize_name("Foo__-.Bar"), "foo-bar");
    }

    #[test]
    fn test_dependency_new() {
        let dep = Dependency::new("PyPDF2", pinned("3.0.1"), "requirements.txt", 4);
        assert_eq!(dep.name, "PyPDF2");
        assert_eq!(dep.normalized_name, "pypdf2");
        assert_eq!(dep.line, 4);
        assert!(dep.is_pinned());
        assert!(!dep.is_direct_reference());
    }

    #[test]
    fn test_dependency_display() {
        let dep = Dependency::new("openai", pinned("0.28.1"), "requirements.txt", 1);
        assert_eq!(dep.to_string(), "openai==0.28.1");
    }

    #[test]
    fn test_dependency_display_with_extras_and_marker() {
        let dep = Dependency::new("requests", pinned("2.31.0"), "requirements.txt", 1)
            .with_extras(vec!["socks".to_string()])
            .with_marker("python_version >= \"3.8\"");
        assert_eq!(
            dep.to_string(),
            "requests[socks]==2.31.0; python_version >= \"3.8\""
        );
    }

    #[test]
    fn test_dependency_display_url() {
        let dep = Dependency::new("pkg", VersionSpec::any(), "requirements.txt", 1)
            .with_url("https://example.com/pkg.whl");
        assert!(dep.is_direct_reference());
        assert_eq!(dep.to_string(), "pkg @ https://example.com/pkg.whl");
    }

    #[test]
    fn test_serde_dependency() {
        let dep = Dependency::new("pandas", pinned("2.1.0"), "requirements.txt", 7)
            .with_group(Some("Data processing".to_string()));
        let json = serde_json::to_string(&dep).unwrap();
        assert!(json.contains("\"group\":\"Data processing\""));
        assert!(!json.contains("\"url\""));
        let parsed: Dependency = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, dep);
    }
}
