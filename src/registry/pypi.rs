//! PyPI JSON API adapter
//!
//! Fetches package version information from PyPI.
//! API endpoint: https://pypi.org/pypi/{package}/json

use crate::domain::normalize_name;
use crate::error::RegistryError;
use crate::registry::{HttpClient, RegistryAdapter};
use crate::resolve::VersionInfo;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashMap;
use tracing::debug;

/// PyPI API base URL
const PYPI_API_URL: &str = "https://pypi.org/pypi";

/// PyPI adapter
pub struct PyPIAdapter {
    client: HttpClient,
    base_url: String,
}

/// PyPI package metadata response
#[derive(Debug, Deserialize)]
struct PyPIResponse {
    /// Release information keyed by version
    releases: HashMap<String, Vec<ReleaseFile>>,
}

/// Release file information
#[derive(Debug, Deserialize)]
struct ReleaseFile {
    /// Upload time for the release file
    upload_time_iso_8601: Option<String>,
    /// Whether this file was yanked
    #[serde(default)]
    yanked: bool,
}

impl PyPIAdapter {
    /// Create a new PyPI adapter
    pub fn new(client: HttpClient) -> Self {
        Self::with_base_url(client, PYPI_API_URL)
    }

    /// Create an adapter for a PyPI-compatible JSON API at `base_url`
    pub fn with_base_url(client: HttpClient, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Build the URL for a package
    fn build_url(&self, package: &str) -> String {
        format!("{}/{}/json", self.base_url, normalize_name(package))
    }
}

#[async_trait]
impl RegistryAdapter for PyPIAdapter {
    fn registry_name(&self) -> &'static str {
        "PyPI"
    }

    async fn fetch_versions(&self, package: &str) -> Result<Vec<VersionInfo>, RegistryError> {
        let url = self.build_url(package);
        let response: PyPIResponse = self
            .client
            .get_json(&url, package, self.registry_name())
            .await?;

        let versions = versions_from_releases(response.releases);
        debug!(package, count = versions.len(), "fetched versions");
        Ok(versions)
    }
}

/// Convert the `releases` table into sorted version infos
///
/// A release is dated by its earliest file upload and counts as yanked only
/// when every file is yanked. Releases without files or with versions that
/// are not PEP 440 are dropped.
fn versions_from_releases(releases: HashMap<String, Vec<ReleaseFile>>) -> Vec<VersionInfo> {
    let mut versions: Vec<VersionInfo> = releases
        .into_iter()
        .filter_map(|(version, files)| {
            let released_at = files
                .iter()
                .filter_map(|f| f.upload_time_iso_8601.as_deref())
                .filter_map(|t| t.parse::<DateTime<Utc>>().ok())
                .min()?;
            let yanked = files.iter().all(|f| f.yanked);
            VersionInfo::parse(&version, released_at).map(|info| info.with_yanked(yanked))
        })
        .collect();

    versions.sort();
    versions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adapter() -> PyPIAdapter {
        PyPIAdapter::new(HttpClient::new().unwrap())
    }

    fn releases(json: &str) -> Vec<VersionInfo> {
        let response: PyPIResponse = serde_json::from_str(json).unwrap();
        versions_from_releases(response.releases)
    }

    #[test]
    fn test_pypi_adapter_registry_name() {
        assert_eq!(adapter().registry_name(), "PyPI");
    }

    #[test]
    fn test_build_url() {
        assert_eq!(
            adapter().build_url("requests"),
            "https://pypi.org/pypi/requests/json"
        );
    }

    #[test]
    fn test_build_url_normalizes_name() {
        assert_eq!(
            adapter().build_url("Flask_RESTful"),
            "https://pypi.org/pypi/flask-restful/json"
        );
    }

    #[test]
    fn test_custom_base_url() {
        let adapter =
            PyPIAdapter::with_base_url(HttpClient::new().unwrap(), "https://mirror.example/pypi/");
        assert_eq!(
            adapter.build_url("rich"),
            "https://mirror.example/pypi/rich/json"
        );
    }

    #[test]
    fn test_versions_from_releases() {
        let versions = releases(
            r#"{
                "info": {"name": "streamlit"},
                "releases": {
                    "1.30.0": [
                        {"upload_time_iso_8601": "2024-01-11T18:00:00.000000Z", "yanked": false},
                        {"upload_time_iso_8601": "2024-01-11T17:00:00.000000Z", "yanked": false}
                    ],
                    "1.28.0": [
                        {"upload_time_iso_8601": "2023-10-25T10:00:00.000000Z"}
                    ],
                    "0.1": [],
                    "2004d": [
                        {"upload_time_iso_8601": "2004-01-01T00:00:00.000000Z"}
                    ]
                }
            }"#,
        );

        let names: Vec<String> = versions.iter().map(|v| v.version.to_string()).collect();
        assert_eq!(names, vec!["1.28.0", "1.30.0"]);
        assert_eq!(
            versions[1].released_at,
            "2024-01-11T17:00:00Z".parse::<DateTime<Utc>>().unwrap()
        );
        assert!(versions.iter().all(|v| !v.yanked));
    }

    #[test]
    fn test_yanked_when_all_files_yanked() {
        let versions = releases(
            r#"{
                "releases": {
                    "1.0.0": [
                        {"upload_time_iso_8601": "2024-01-01T00:00:00Z", "yanked": true},
                        {"upload_time_iso_8601": "2024-01-01T00:00:00Z", "yanked": true}
                    ],
                    "1.0.1": [
                        {"upload_time_iso_8601": "2024-02-01T00:00:00Z", "yanked": true},
                        {"upload_time_iso_8601": "2024-02-01T00:00:00Z", "yanked": false}
                    ]
                }
            }"#,
        );
        assert!(versions[0].yanked);
        assert!(!versions[1].yanked);
    }
}
