//! Parsed requirements manifest

use super::{Dependency, Issue};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A pip option line (`--index-url ...`, `-e ...`) kept for reporting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Directive {
    /// File the line belongs to
    pub origin: PathBuf,
    /// 1-based line number
    pub line: usize,
    /// The option as written, e.g. `--index-url`
    pub option: String,
    /// Everything after the option
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub value: String,
}

/// A requirements manifest after parsing, with `-r` includes expanded
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Manifest {
    /// Path of the top-level file
    pub path: PathBuf,
    /// Entries in declaration order, included files spliced in place
    pub entries: Vec<Dependency>,
    /// Option lines
    pub directives: Vec<Directive>,
    /// Problems found while reading lines
    pub parse_issues: Vec<Issue>,
    /// Files pulled in through `-r`
    pub includes: Vec<PathBuf>,
}

impl Manifest {
    /// Creates an empty manifest for `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Finds the first entry with the given name (compared after normalization)
    pub fn find(&self, name: &str) -> Option<&Dependency> {
        let normalized = super::normalize_name(name);
        self.entries
            .iter()
            .find(|entry| entry.normalized_name == normalized)
    }

    /// Returns the group comments in order of first appearance
    pub fn groups(&self) -> Vec<&str> {
        let mut groups: Vec<&str> = Vec::new();
        for group in self.entries.iter().filter_map(|e| e.group.as_deref()) {
            if !groups.contains(&group) {
                groups.push(group);
            }
        }
        groups
    }

    /// Returns the number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the manifest declares nothing
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
