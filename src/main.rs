//! reqlint - requirements.txt validator and resolver CLI tool
//!
//! Checks pip requirements manifests for malformed lines, invalid names and
//! specifiers, duplicates and unsatisfiable constraints, and optionally looks
//! up the newest matching release of every entry on PyPI.

use clap::Parser;
use reqlint::cli::CliArgs;
use reqlint::config::{FileConfig, Settings};
use reqlint::manifest::config_dir;
use reqlint::orchestrator::Orchestrator;
use reqlint::output::{create_formatter, OutputConfig};
use std::io::{self, Write};
use std::process::ExitCode;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

/// Exit code when registry lookups failed or entries could not be resolved
const EXIT_UNRESOLVED: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();

    let default_filter = if args.verbose { "reqlint=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    // Run the main logic and handle errors
    match run(args).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Main application logic
async fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    debug!(version = env!("CARGO_PKG_VERSION"), target = %args.path.display(), "starting");

    let file_config = FileConfig::from_dir(&config_dir(&args.path))?;
    let settings = Settings::from_sources(&args, &file_config)?;

    if args.has_resolve_filter() && !args.resolve {
        warn!("--exclude, --only, --pre and --age have no effect without --resolve");
    }

    // Create and run the orchestrator
    let show_progress = settings.resolve && !args.quiet && !args.json;
    let orchestrator = Orchestrator::new(args.path.clone(), settings)?;
    let result = orchestrator.run_with_progress(show_progress).await;

    // Create output formatter based on CLI options
    let output_config = OutputConfig::from_cli(args.json, args.verbose, args.quiet);
    let formatter = create_formatter(output_config);

    let mut stdout = io::stdout().lock();
    formatter.format(&result, &mut stdout)?;
    stdout.flush()?;

    // Quiet and JSON output leave errors out of the human summary
    if (args.quiet || args.json) && !result.errors.is_empty() {
        for error in &result.errors {
            eprintln!("Error: {}", error);
        }
    }

    let has_registry_errors = result.errors.iter().any(|e| !e.is_fatal());

    if result.has_fatal_error() || !result.summary.passed() {
        Ok(ExitCode::FAILURE)
    } else if has_registry_errors || result.summary.total_unresolved() > 0 {
        Ok(ExitCode::from(EXIT_UNRESOLVED))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
