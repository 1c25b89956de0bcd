//! Check orchestrator for coordinating the entire workflow
//!
//! This module provides:
//! - Workflow coordination: detect → load → validate → probe → resolve
//! - Parallel registry queries with a concurrency limit
//! - Error handling with partial continuation

use crate::config::Settings;
use crate::domain::{CheckSummary, ManifestReport, ResolveResult, SkipReason};
use crate::error::ConfigError;
use crate::manifest::{detect_manifests, load_manifest};
use crate::progress::Progress;
use crate::registry::{HttpClient, PyPIAdapter, RegistryAdapter};
use crate::resolve::Resolver;
use crate::validate::{evaluate_probe, Validator};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Default concurrency limit for registry requests
const DEFAULT_CONCURRENCY: usize = 10;

/// Orchestrator for coordinating the check workflow
pub struct Orchestrator {
    /// File or directory to check
    target: PathBuf,
    /// Effective settings
    settings: Settings,
    /// Registry used for resolution
    adapter: Arc<dyn RegistryAdapter>,
    /// Semaphore for concurrency control
    semaphore: Arc<Semaphore>,
}

/// Result of running the orchestrator
pub struct OrchestratorResult {
    /// Check summary with all reports
    pub summary: CheckSummary,
    /// Errors encountered during processing
    pub errors: Vec<OrchestratorError>,
}

impl OrchestratorResult {
    /// Returns true if any error prevented a complete check
    pub fn has_fatal_error(&self) -> bool {
        self.errors.iter().any(|e| e.is_fatal())
    }
}

/// Errors that can occur during orchestration
#[derive(Debug)]
pub enum OrchestratorError {
    /// Failed to create HTTP client
    HttpClientError(String),
    /// Failed to detect manifests
    ManifestDetectionError(String),
    /// Failed to load manifest
    ManifestLoadError { path: String, message: String },
    /// A probe could not be evaluated
    ProbeError(String),
    /// Failed to fetch versions from registry
    RegistryError { package: String, message: String },
}

impl OrchestratorError {
    /// Registry failures degrade resolution; everything else makes the run unusable
    pub fn is_fatal(&self) -> bool {
        !matches!(self, OrchestratorError::RegistryError { .. })
    }
}

impl std::fmt::Display for OrchestratorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrchestratorError::HttpClientError(msg) => write!(f, "HTTP client error: {}", msg),
            OrchestratorError::ManifestDetectionError(msg) => {
                write!(f, "Manifest detection error: {}", msg)
            }
            OrchestratorError::ManifestLoadError { path, message } => {
                write!(f, "Failed to load {}: {}", path, message)
            }
            OrchestratorError::ProbeError(msg) => write!(f, "Probe error: {}", msg),
            OrchestratorError::RegistryError { package, message } => {
                write!(f, "Failed to fetch {}: {}", package, message)
            }
        }
    }
}

impl std::error::Error for OrchestratorError {}

impl Orchestrator {
    /// Create a new orchestrator that resolves against PyPI
    pub fn new(target: impl Into<PathBuf>, settings: Settings) -> Result<Self, OrchestratorError> {
        let client =
            HttpClient::new().map_err(|e| OrchestratorError::HttpClientError(e.to_string()))?;
        Ok(Self::with_adapter(
            target,
            settings,
            Arc::new(PyPIAdapter::new(client)),
        ))
    }

    /// Create an orchestrator with a custom registry adapter (for testing)
    pub fn with_adapter(
        target: impl Into<PathBuf>,
        settings: Settings,
        adapter: Arc<dyn RegistryAdapter>,
    ) -> Self {
        Self {
            target: target.into(),
            settings,
            adapter,
            semaphore: Arc::new(Semaphore::new(DEFAULT_CONCURRENCY)),
        }
    }

    /// Run the workflow without progress display
    pub async fn run(&self) -> OrchestratorResult {
        self.run_with_progress(false).await
    }

    /// Run the workflow with optional progress display
    pub async fn run_with_progress(&self, show_progress: bool) -> OrchestratorResult {
        let mut progress = Progress::new(show_progress);
        let mut summary = CheckSummary::new(self.settings.strict);
        let mut errors = Vec::new();

        // Step 1: Detect manifest files
        let manifests = match detect_manifests(&self.target) {
            Ok(manifests) => manifests,
            Err(e) => {
                errors.push(OrchestratorError::ManifestDetectionError(e.to_string()));
                return OrchestratorResult { summary, errors };
            }
        };
        debug!(count = manifests.len(), "detected manifests");

        // Step 2: Load and validate
        progress.spinner("Validating manifests...");
        let validator = Validator::new(self.settings.validate.clone());
        for path in &manifests {
            match load_manifest(path) {
                Ok(manifest) => summary.add_report(validator.validate(manifest)),
                Err(e) => errors.push(OrchestratorError::ManifestLoadError {
                    path: path.display().to_string(),
                    message: e.to_string(),
                }),
            }
        }
        progress.finish_and_clear();

        // Step 3: Probes
        for probe in &self.settings.probes {
            let outcome = summary
                .reports
                .iter()
                .find_map(|report| evaluate_probe(probe, &report.manifest));
            match outcome {
                Some(outcome) => summary.probes.push(outcome),
                None => errors.push(OrchestratorError::ProbeError(
                    ConfigError::UnknownPackage {
                        package: probe.package.clone(),
                    }
                    .to_string(),
                )),
            }
        }

        // Step 4: Resolve
        if self.settings.resolve {
            let total: usize = summary.reports.iter().map(|r| r.manifest.len()).sum();
            progress.start(total as u64, "Resolving dependencies");
            let resolver = Resolver::new(self.settings.filter.clone());
            for report in &mut summary.reports {
                self.resolve_report(report, &resolver, &progress, &mut errors)
                    .await;
            }
            progress.finish_and_clear();
        }

        info!(
            files = summary.files_checked(),
            errors = summary.total_errors(),
            warnings = summary.total_warnings(),
            "check finished"
        );
        OrchestratorResult { summary, errors }
    }

    /// Resolve every entry of one report, keeping declaration order
    async fn resolve_report(
        &self,
        report: &mut ManifestReport,
        resolver: &Resolver,
        progress: &Progress,
        errors: &mut Vec<OrchestratorError>,
    ) {
        let entries = &report.manifest.entries;
        let mut results: Vec<Option<ResolveResult>> = vec![None; entries.len()];
        let mut tasks = JoinSet::new();

        for (index, dep) in entries.iter().enumerate() {
            if report.has_error_at(&dep.origin, dep.line) {
                results[index] = Some(ResolveResult::skip(dep.clone(), SkipReason::Invalid));
                progress.inc();
                continue;
            }
            if let Some(reason) = resolver.should_skip(dep) {
                results[index] = Some(ResolveResult::skip(dep.clone(), reason));
                progress.inc();
                continue;
            }

            let adapter = Arc::clone(&self.adapter);
            let semaphore = Arc::clone(&self.semaphore);
            let package = dep.normalized_name.clone();
            tasks.spawn(async move {
                // A closed semaphore only lifts the limit
                let _permit = semaphore.acquire_owned().await.ok();
                (index, adapter.fetch_versions(&package).await)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            progress.inc();
            let (index, fetched) = match joined {
                Ok(pair) => pair,
                Err(e) => {
                    warn!(error = %e, "resolution task failed");
                    continue;
                }
            };
            let dep = &entries[index];
            progress.set_message(&format!("Resolved {}", dep.name));

            results[index] = Some(match fetched {
                Ok(versions) => resolver.resolve(dep, &versions),
                Err(e) => {
                    errors.push(OrchestratorError::RegistryError {
                        package: dep.name.clone(),
                        message: e.to_string(),
                    });
                    ResolveResult::skip_fetch_failed(dep.clone(), e.to_string())
                }
            });
        }

        let resolutions: Vec<ResolveResult> = results
            .into_iter()
            .zip(entries.iter())
            .map(|(result, dep)| {
                result.unwrap_or_else(|| {
                    ResolveResult::skip_fetch_failed(dep.clone(), "resolution task aborted")
                })
            })
            .collect();
        report.resolutions = resolutions;
    }
}
