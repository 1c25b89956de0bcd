//! Application error types using thiserror
//!
//! Error hierarchy:
//! - ManifestError: Issues with reading requirements manifests
//! - SpecifierError: Malformed versions and version specifiers
//! - RegistryError: Issues with package registry communication
//! - ConfigError: Issues with CLI or `[tool.reqlint]` configuration

use std::path::PathBuf;
use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Manifest file related errors
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// Version or specifier syntax errors
    #[error(transparent)]
    Specifier(#[from] SpecifierError),

    /// Package registry related errors
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Configuration related errors
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors related to manifest file operations
#[derive(Error, Debug)]
pub enum ManifestError {
    /// Manifest file not found
    #[error("manifest file not found: {path}")]
    NotFound { path: PathBuf },

    /// Failed to read manifest file
    #[error("failed to read manifest file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No requirements files in the target directory
    #[error("no requirements files found in {path}")]
    NoManifests { path: PathBuf },
}

/// Errors produced while parsing versions and version specifiers
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpecifierError {
    /// The text is not a valid PEP 440 version
    #[error("invalid version '{value}'")]
    InvalidVersion { value: String },

    /// The text is not a valid version specifier
    #[error("invalid version specifier '{value}': {message}")]
    InvalidSpecifier { value: String, message: String },
}

/// Errors related to package registry communication
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Package not found in registry
    #[error("package '{package}' not found in {registry} registry")]
    PackageNotFound { package: String, registry: String },

    /// Network request failed
    #[error("failed to fetch package '{package}' from {registry}: {message}")]
    NetworkError {
        package: String,
        registry: String,
        message: String,
    },

    /// Rate limit exceeded
    #[error("rate limit exceeded for {registry} registry")]
    RateLimitExceeded { registry: String },

    /// Invalid response from registry
    #[error("invalid response from {registry} for '{package}': {message}")]
    InvalidResponse {
        package: String,
        registry: String,
        message: String,
    },

    /// Timeout
    #[error("timeout while fetching '{package}' from {registry}")]
    Timeout { package: String, registry: String },
}

/// Errors related to configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Invalid duration format
    #[error("invalid duration format '{value}': expected format like '2w', '10d', '1m'")]
    InvalidDuration { value: String },

    /// Malformed `--probe` argument
    #[error("invalid probe '{value}': expected NAME=VERSION")]
    InvalidProbe { value: String },

    /// Probe names a package the manifest does not declare
    #[error("package '{package}' is not declared in any manifest")]
    UnknownPackage { package: String },

    /// Conflicting options
    #[error("conflicting options: {message}")]
    ConflictingOptions { message: String },

    /// `[tool.reqlint]` could not be read
    #[error("invalid configuration in {path}: {message}")]
    InvalidConfigFile { path: PathBuf, message: String },
}

impl ManifestError {
    /// Creates a new NotFound error
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        ManifestError::NotFound { path: path.into() }
    }

    /// Creates a new ReadError
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ManifestError::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new NoManifests error
    pub fn no_manifests(path: impl Into<PathBuf>) -> Self {
        ManifestError::NoManifests { path: path.into() }
    }
}

impl SpecifierError {
    /// Creates a new InvalidVersion error
    pub fn invalid_version(value: impl Into<String>) -> Self {
        SpecifierError::InvalidVersion {
            value: value.into(),
        }
    }

    /// Creates a new InvalidSpecifier error
    pub fn invalid_specifier(value: impl Into<String>, message: impl Into<String>) -> Self {
        SpecifierError::InvalidSpecifier {
            value: value.into(),
            message: message.into(),
        }
    }
}

impl RegistryError {
    /// Creates a new PackageNotFound error
    pub fn package_not_found(package: impl Into<String>, registry: impl Into<String>) -> Self {
        RegistryError::PackageNotFound {
            package: package.into(),
            registry: registry.into(),
        }
    }

    /// Creates a new NetworkError
    pub fn network_error(
        package: impl Into<String>,
        registry: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        RegistryError::NetworkError {
            package: package.into(),
            registry: registry.into(),
            message: message.into(),
        }
    }

    /// Creates a new RateLimitExceeded error
    pub fn rate_limit_exceeded(registry: impl Into<String>) -> Self {
        RegistryError::RateLimitExceeded {
            registry: registry.into(),
        }
    }

    /// Creates a new Timeout error
    pub fn timeout(package: impl Into<String>, registry: impl Into<String>) -> Self {
        RegistryError::Timeout {
            package: package.into(),
            registry: registry.into(),
        }
    }
}

impl ConfigError {
    /// Creates a new InvalidConfigFile error
    pub fn invalid_config_file(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ConfigError::InvalidConfigFile {
            path: path.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_error_not_found() {
        let err = ManifestError::not_found("/path/to/requirements.txt");
        let msg = format!("{}", err);
        assert!(msg.contains("manifest file not found"));
        assert!(msg.contains("requirements.txt"));
    }

    #[test]
    fn test_manifest_error_read_error() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = ManifestError::read_error("/path/to/requirements.txt", io);
        let msg = format!("{}", err);
        assert!(msg.contains("failed to read manifest file"));
        assert!(msg.contains("denied"));
    }

    #[test]
    fn test_manifest_error_no_manifests() {
        let err = ManifestError::no_manifests("/empty");
        assert!(err.to_string().contains("no requirements files found"));
    }

    #[test]
    fn test_specifier_error_invalid_version() {
        let err = SpecifierError::invalid_version("one.two");
        assert_eq!(err.to_string(), "invalid version 'one.two'");
    }

    #[test]
    fn test_specifier_error_invalid_specifier() {
        let err = SpecifierError::invalid_specifier(">>1.0", "unknown comparator");
        let msg = format!("{}", err);
        assert!(msg.contains("invalid version specifier"));
        assert!(msg.contains(">>1.0"));
        assert!(msg.contains("unknown comparator"));
    }

    #[test]
    fn test_registry_error_package_not_found() {
        let err = RegistryError::package_not_found("nonexistent-package", "PyPI");
        let msg = format!("{}", err);
        assert!(msg.contains("package 'nonexistent-package' not found"));
        assert!(msg.contains("PyPI"));
    }

    #[test]
    fn test_registry_error_network() {
        let err = RegistryError::network_error("requests", "PyPI", "connection refused");
        let msg = format!("{}", err);
        assert!(msg.contains("failed to fetch"));
        assert!(msg.contains("connection refused"));
    }

    #[test]
    fn test_registry_error_rate_limit() {
        let err = RegistryError::rate_limit_exceeded("PyPI");
        let msg = format!("{}", err);
        assert!(msg.contains("rate limit exceeded"));
        assert!(msg.contains("PyPI"));
    }

    #[test]
    fn test_registry_error_timeout() {
        let err = RegistryError::timeout("pandas", "PyPI");
        let msg = format!("{}", err);
        assert!(msg.contains("timeout"));
        assert!(msg.contains("pandas"));
    }

    #[test]
    fn test_config_error_invalid_duration() {
        let err = ConfigError::InvalidDuration {
            value: "abc".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("invalid duration format"));
        assert!(msg.contains("abc"));
    }

    #[test]
    fn test_config_error_invalid_probe() {
        let err = ConfigError::InvalidProbe {
            value: "streamlit".to_string(),
        };
        assert!(err.to_string().contains("expected NAME=VERSION"));
    }

    #[test]
    fn test_config_error_unknown_package() {
        let err = ConfigError::UnknownPackage {
            package: "numpy".to_string(),
        };
        assert!(err.to_string().contains("'numpy' is not declared"));
    }

    #[test]
    fn test_config_error_invalid_config_file() {
        let err = ConfigError::invalid_config_file("pyproject.toml", "expected a boolean");
        let msg = err.to_string();
        assert!(msg.contains("pyproject.toml"));
        assert!(msg.contains("expected a boolean"));
    }

    #[test]
    fn test_app_error_from_manifest_error() {
        let app_err: AppError = ManifestError::not_found("/path").into();
        assert!(app_err.to_string().contains("manifest file not found"));
    }

    #[test]
    fn test_app_error_from_specifier_error() {
        let app_err: AppError = SpecifierError::invalid_version("x").into();
        assert!(app_err.to_string().contains("invalid version"));
    }

    #[test]
    fn test_app_error_from_registry_error() {
        let app_err: AppError = RegistryError::package_not_found("pkg", "PyPI").into();
        assert!(app_err.to_string().contains("package 'pkg' not found"));
    }

    #[test]
    fn test_app_error_from_config_error() {
        let config_err = ConfigError::ConflictingOptions {
            message: "--quiet and --verbose cannot be used together".to_string(),
        };
        let app_err: AppError = config_err.into();
        assert!(app_err.to_string().contains("conflicting options"));
    }
}
