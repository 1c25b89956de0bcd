//! Requirements file detection
//!
//! Features:
//! - Accepts a single file or a directory
//! - In a directory, finds `requirements.txt`, `requirements-*.txt`, `*-requirements.txt`
//! - Also looks inside a `requirements/` subdirectory

use crate::error::ManifestError;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static REQUIREMENTS_FILE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:requirements(?:[-_.][\w.-]+)?|[\w.-]+[-_]requirements)\.txt$").unwrap()
});

/// Subdirectory conventionally holding split requirements files
const REQUIREMENTS_DIR: &str = "requirements";

/// Resolve the manifests to check for `target`
///
/// A file is returned as-is. For a directory, matching files are returned with
/// `requirements.txt` first and the rest sorted by path.
pub fn detect_manifests(target: &Path) -> Result<Vec<PathBuf>, ManifestError> {
    if target.is_file() {
        return Ok(vec![target.to_path_buf()]);
    }
    if !target.is_dir() {
        return Err(ManifestError::not_found(target));
    }

    let mut manifests = requirements_files_in(target, false)?;

    let nested = target.join(REQUIREMENTS_DIR);
    if nested.is_dir() {
        manifests.extend(requirements_files_in(&nested, true)?);
    }

    if manifests.is_empty() {
        return Err(ManifestError::no_manifests(target));
    }

    let primary = target.join("requirements.txt");
    manifests.sort_by(|a, b| (a != &primary, a).cmp(&(b != &primary, b)));
    Ok(manifests)
}

fn requirements_files_in(dir: &Path, any_txt: bool) -> Result<Vec<PathBuf>, ManifestError> {
    let entries = std::fs::read_dir(dir).map_err(|e| ManifestError::read_error(dir, e))?;

    let mut files = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let matches = if any_txt {
            name.ends_with(".txt")
        } else {
            REQUIREMENTS_FILE_RE.is_match(name)
        };
        if matches {
            files.push(path);
        }
    }
    Ok(files)
}

/// Directory that holds the configuration for `target`
pub fn config_dir(target: &Path) -> PathBuf {
    if target.is_dir() {
        return target.to_path_buf();
    }
    match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
