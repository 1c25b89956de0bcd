//! Configuration from `[tool.reqlint]` and the command line
//!
//! A `pyproject.toml` next to the checked manifest may carry defaults:
//!
//! ```toml
//! [tool.reqlint]
//! strict = true
//! allow-unpinned = false
//! exclude = ["torch"]
//! pre = false
//! minimum-release-age = "2w"
//! ```
//!
//! Command-line flags take priority over file values.

use crate::cli::CliArgs;
use crate::error::ConfigError;
use crate::resolve::ResolveFilter;
use crate::validate::{Probe, ValidateOptions};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// File that may hold a `[tool.reqlint]` table
pub const CONFIG_FILE: &str = "pyproject.toml";

/// Parse duration string in format: Nd (days), Nw (weeks), Nm (months)
pub fn parse_duration(s: &str) -> Result<Duration, ConfigError> {
    let invalid = || ConfigError::InvalidDuration {
        value: s.to_string(),
    };

    let trimmed = s.trim();
    let (num_str, days_per_unit) = if let Some(n) = trimmed.strip_suffix('d') {
        (n, 1)
    } else if let Some(n) = trimmed.strip_suffix('w') {
        (n, 7)
    } else if let Some(n) = trimmed.strip_suffix('m') {
        // months are 30 days
        (n, 30)
    } else {
        return Err(invalid());
    };

    let num: u64 = num_str.parse().map_err(|_| invalid())?;
    let seconds = num
        .checked_mul(days_per_unit * 24 * 60 * 60)
        .ok_or_else(invalid)?;

    Ok(Duration::from_secs(seconds))
}

/// Values read from `[tool.reqlint]`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileConfig {
    pub strict: Option<bool>,
    pub allow_unpinned: Option<bool>,
    #[serde(default)]
    pub exclude: Vec<String>,
    pub pre: Option<bool>,
    pub minimum_release_age: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct PyProject {
    #[serde(default)]
    tool: Tool,
}

#[derive(Debug, Default, Deserialize)]
struct Tool {
    reqlint: Option<FileConfig>,
}

impl FileConfig {
    /// Parse `[tool.reqlint]` out of pyproject.toml content
    ///
    /// Content without the table yields the defaults.
    pub fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let pyproject: PyProject = toml::from_str(content)
            .map_err(|e| ConfigError::invalid_config_file(path, e.to_string()))?;
        Ok(pyproject.tool.reqlint.unwrap_or_default())
    }

    /// Load the configuration from `dir`, if a pyproject.toml exists there
    pub fn from_dir(dir: &Path) -> Result<Self, ConfigError> {
        let path = dir.join(CONFIG_FILE);
        if !path.is_file() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::invalid_config_file(&path, e.to_string()))?;
        let config = Self::parse(&content, &path)?;
        debug!(path = %path.display(), ?config, "loaded configuration");
        Ok(config)
    }
}

/// Effective settings for one run
#[derive(Debug, Clone, Default)]
pub struct Settings {
    /// Warnings fail the run
    pub strict: bool,
    /// Validation options
    pub validate: ValidateOptions,
    /// Look up versions on the registry
    pub resolve: bool,
    /// Resolution filters
    pub filter: ResolveFilter,
    /// Candidate versions to evaluate
    pub probes: Vec<Probe>,
}

impl Settings {
    /// Merge command-line arguments over file configuration
    pub fn from_sources(args: &CliArgs, file: &FileConfig) -> Result<Self, ConfigError> {
        if args.quiet && args.verbose {
            return Err(ConfigError::ConflictingOptions {
                message: "--quiet and --verbose cannot be used together".to_string(),
            });
        }

        let min_age = match (args.age, file.minimum_release_age.as_deref()) {
            (Some(age), _) => Some(age),
            (None, Some(text)) => Some(parse_duration(text)?),
            (None, None) => None,
        };

        let exclude = if args.exclude.is_empty() {
            file.exclude.clone()
        } else {
            args.exclude.clone()
        };

        let mut filter = ResolveFilter::new()
            .with_exclude(exclude)
            .with_only(args.only.clone())
            .with_prereleases(args.pre || file.pre.unwrap_or(false));
        if let Some(age) = min_age {
            filter = filter.with_min_age(age);
        }

        Ok(Self {
            strict: args.strict || file.strict.unwrap_or(false),
            validate: ValidateOptions::new()
                .with_allow_unpinned(args.allow_unpinned || file.allow_unpinned.unwrap_or(false)),
            resolve: args.resolve,
            filter,
            probes: args.probes.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;
    use tempfile::TempDir;

    fn args(extra: &[&str]) -> CliArgs {
        let mut argv = vec!["reqlint"];
        argv.extend_from_slice(extra);
        CliArgs::parse_from(argv)
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("1d").unwrap(), Duration::from_secs(86400));
        assert_eq!(parse_duration("2w").unwrap(), Duration::from_secs(14 * 86400));
        assert_eq!(parse_duration("1m").unwrap(), Duration::from_secs(30 * 86400));
        assert_eq!(parse_duration(" 10d ").unwrap(), Duration::from_secs(10 * 86400));
    }

    #[test]
    fn test_parse_duration_invalid() {
        for value in ["", "abc", "10", "10x", "d", "-1d", "99999999999999999w"] {
            assert!(
                matches!(parse_duration(value), Err(ConfigError::InvalidDuration { .. })),
                "{}",
                value
            );
        }
    }

    #[test]
    fn test_parse_file_config() {
        let config = FileConfig::parse(
            r#"
[project]
name = "demo"

[tool.reqlint]
strict = true
allow-unpinned = true
exclude = ["torch", "tensorflow"]
pre = true
minimum-release-age = "2w"
"#,
            Path::new("pyproject.toml"),
        )
        .unwrap();
        assert_eq!(config.strict, Some(true));
        assert_eq!(config.allow_unpinned, Some(true));
        assert_eq!(config.exclude, vec!["torch", "tensorflow"]);
        assert_eq!(config.pre, Some(true));
        assert_eq!(config.minimum_release_age.as_deref(), Some("2w"));
    }

    #[test]
    fn test_parse_without_table() {
        let config =
            FileConfig::parse("[tool.black]\nline-length = 88\n", Path::new("pyproject.toml"))
                .unwrap();
        assert_eq!(config, FileConfig::default());
    }

    #[test]
    fn test_parse_rejects_unknown_key() {
        let err = FileConfig::parse("[tool.reqlint]\nstrictt = true\n", Path::new("pyproject.toml"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidConfigFile { .. }));
    }

    #[test]
    fn test_parse_rejects_wrong_type() {
        let content = "[tool.reqlint]\nstrict = \"yes\"\n";
        assert!(FileConfig::parse(content, Path::new("pyproject.toml")).is_err());
    }

    #[test]
    fn test_from_dir() {
        let dir = TempDir::new().unwrap();
        assert_eq!(FileConfig::from_dir(dir.path()).unwrap(), FileConfig::default());

        fs::write(dir.path().join("pyproject.toml"), "[tool.reqlint]\nstrict = true\n").unwrap();
        assert_eq!(FileConfig::from_dir(dir.path()).unwrap().strict, Some(true));
    }

    #[test]
    fn test_settings_defaults() {
        let settings = Settings::from_sources(&args(&[]), &FileConfig::default()).unwrap();
        assert!(!settings.strict);
        assert!(!settings.validate.allow_unpinned);
        assert!(!settings.resolve);
        assert!(settings.filter.exclude.is_empty());
        assert!(settings.filter.min_age.is_none());
        assert!(settings.probes.is_empty());
    }

    #[test]
    fn test_settings_file_values_apply() {
        let file = FileConfig {
            strict: Some(true),
            allow_unpinned: Some(true),
            exclude: vec!["torch".to_string()],
            pre: Some(true),
            minimum_release_age: Some("1w".to_string()),
        };
        let settings = Settings::from_sources(&args(&[]), &file).unwrap();
        assert!(settings.strict);
        assert!(settings.validate.allow_unpinned);
        assert_eq!(settings.filter.exclude, vec!["torch"]);
        assert!(settings.filter.include_prereleases);
        assert_eq!(settings.filter.min_age, Some(Duration::from_secs(7 * 86400)));
    }

    #[test]
    fn test_settings_cli_overrides_file() {
        let file = FileConfig {
            exclude: vec!["torch".to_string()],
            minimum_release_age: Some("1w".to_string()),
            ..FileConfig::default()
        };
        let settings =
            Settings::from_sources(&args(&["--exclude", "numpy", "--age", "3d"]), &file).unwrap();
        assert_eq!(settings.filter.exclude, vec!["numpy"]);
        assert_eq!(settings.filter.min_age, Some(Duration::from_secs(3 * 86400)));
    }

    #[test]
    fn test_settings_invalid_file_age() {
        let file = FileConfig {
            minimum_release_age: Some("soon".to_string()),
            ..FileConfig::default()
        };
        assert!(matches!(
            Settings::from_sources(&args(&[]), &file),
            Err(ConfigError::InvalidDuration { .. })
        ));
    }

    #[test]
    fn test_settings_quiet_and_verbose_conflict() {
        let err = Settings::from_sources(&args(&["--quiet", "--verbose"]), &FileConfig::default())
            .unwrap_err();
        assert!(matches!(err, ConfigError::ConflictingOptions { .. }));
    }

    #[test]
    fn test_settings_probes() {
        let settings = Settings::from_sources(
            &args(&["--probe", "streamlit=1.30.0", "--probe", "openai=0.28.1"]),
            &FileConfig::default(),
        )
        .unwrap();
        assert_eq!(settings.probes.len(), 2);
        assert_eq!(settings.probes[1].package, "openai");
    }
}
