//! Manifest file detection and loading
//!
//! This module provides functionality to:
//! - Detect requirements files for a file or directory target
//! - Load a requirements file into a [`Manifest`], following `-r` includes

mod detector;

pub use detector::{config_dir, detect_manifests};

use crate::domain::{Issue, IssueKind, Manifest};
use crate::error::ManifestError;
use crate::parser::{parse_requirements, RequirementLine};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Load a requirements file, splicing included files in place
///
/// Include problems (missing targets, cycles) are recorded as issues on the
/// including line rather than failing the load.
pub fn load_manifest(path: &Path) -> Result<Manifest, ManifestError> {
    if !path.exists() {
        return Err(ManifestError::not_found(path));
    }
    let content = std::fs::read_to_string(path).map_err(|e| ManifestError::read_error(path, e))?;

    let mut loader = IncludeLoader {
        manifest: Manifest::new(path),
        stack: vec![canonical(path)],
        visited: HashSet::new(),
    };
    loader.visited.insert(canonical(path));
    loader.expand(path, &content);

    debug!(
        path = %path.display(),
        entries = loader.manifest.entries.len(),
        includes = loader.manifest.includes.len(),
        "loaded manifest"
    );
    Ok(loader.manifest)
}

struct IncludeLoader {
    manifest: Manifest,
    // Files currently being expanded, outermost first
    stack: Vec<PathBuf>,
    visited: HashSet<PathBuf>,
}

impl IncludeLoader {
    fn expand(&mut self, origin: &Path, content: &str) {
        for line in parse_requirements(content, origin) {
            match line {
                RequirementLine::Entry(dependency) => self.manifest.entries.push(dependency),
                RequirementLine::Directive(directive) => self.manifest.directives.push(directive),
                RequirementLine::Issue(issue) => self.manifest.parse_issues.push(issue),
                RequirementLine::Include { line, target } => self.include(origin, line, &target),
            }
        }
    }

    fn include(&mut self, origin: &Path, line: usize, target: &Path) {
        let path = match origin.parent() {
            Some(parent) => parent.join(target),
            None => target.to_path_buf(),
        };
        let key = canonical(&path);

        if self.stack.contains(&key) {
            self.manifest.parse_issues.push(Issue::new(
                origin,
                line,
                IssueKind::IncludeCycle {
                    target: target.to_path_buf(),
                },
            ));
            return;
        }
        // Already spliced in through another branch
        if self.visited.contains(&key) {
            debug!(path = %path.display(), "skipping include seen earlier");
            return;
        }

        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "include not readable");
                self.manifest.parse_issues.push(Issue::new(
                    origin,
                    line,
                    IssueKind::IncludeNotFound {
                        target: target.to_path_buf(),
                    },
                ));
                return;
            }
        };

        self.visited.insert(key.clone());
        self.manifest.includes.push(path.clone());
        self.stack.push(key);
        self.expand(&path, &content);
        self.stack.pop();
    }
}

fn canonical(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}
