//! CLI argument parsing module for reqlint

use crate::config::parse_duration;
use crate::validate::Probe;
use clap::{ArgAction, Parser};
use std::path::PathBuf;
use std::time::Duration;

fn parse_age(s: &str) -> Result<Duration, String> {
    parse_duration(s).map_err(|e| e.to_string())
}

fn parse_probe(s: &str) -> Result<Probe, String> {
    s.parse::<Probe>().map_err(|e| e.to_string())
}

/// Validator and resolver for requirements.txt manifests
#[derive(Parser, Debug, Clone)]
#[command(
    name = "reqlint",
    version,
    about = "Validate and resolve requirements.txt dependency manifests"
)]
pub struct CliArgs {
    /// Requirements file, or a directory to search for requirements*.txt
    /// (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    // General options
    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Enable quiet mode - minimal output
    #[arg(short, long)]
    pub quiet: bool,

    // Validation options
    /// Treat warnings as failures
    #[arg(long)]
    pub strict: bool,

    /// Do not warn about entries without a version constraint or upper bound
    #[arg(long)]
    pub allow_unpinned: bool,

    /// Check whether VERSION satisfies the declared constraint of NAME
    /// (can be specified multiple times)
    #[arg(
        long = "probe",
        value_name = "NAME=VERSION",
        action = ArgAction::Append,
        value_parser = parse_probe
    )]
    pub probes: Vec<Probe>,

    // Resolution options
    /// Look up the newest published version satisfying each constraint on PyPI
    #[arg(long)]
    pub resolve: bool,

    /// Exclude specific packages from resolution (can be specified multiple times)
    #[arg(long, action = ArgAction::Append)]
    pub exclude: Vec<String>,

    /// Resolve only specific packages (can be specified multiple times)
    #[arg(long, action = ArgAction::Append)]
    pub only: Vec<String>,

    /// Consider pre-releases during resolution
    #[arg(long)]
    pub pre: bool,

    // Age filter
    /// Only resolve to versions released at least this long ago (e.g., 2w, 10d, 1m)
    #[arg(long, value_parser = parse_age)]
    pub age: Option<Duration>,

    // Output options
    /// Output results in JSON format
    #[arg(long)]
    pub json: bool,
}

impl CliArgs {
    /// Check if any resolution-only option was given
    pub fn has_resolve_filter(&self) -> bool {
        !self.exclude.is_empty() || !self.only.is_empty() || self.pre || self.age.is_some()
    }
}
