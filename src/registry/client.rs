//! HTTP client shared foundation
//!
//! This module provides a shared HTTP client with:
//! - Configurable timeout and User-Agent
//! - Exponential backoff retry logic (max 3 retries) for transport errors,
//!   rate limiting and undecodable bodies
//! - Mapping of HTTP status codes onto registry errors

use crate::error::RegistryError;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, warn};

/// Default timeout for HTTP requests (30 seconds)
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default User-Agent header
const DEFAULT_USER_AGENT: &str = concat!("reqlint/", env!("CARGO_PKG_VERSION"));

/// Maximum number of retry attempts
const MAX_RETRIES: u32 = 3;

/// Base delay for exponential backoff
const BASE_DELAY: Duration = Duration::from_millis(100);

/// HTTP client wrapper with retry logic
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    max_retries: u32,
    base_delay: Duration,
}

/// Outcome of one request attempt
enum Attempt<T> {
    Done(T),
    Retry(RegistryError),
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self, RegistryError> {
        Self::with_config(DEFAULT_TIMEOUT, DEFAULT_USER_AGENT)
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(timeout: Duration, user_agent: &str) -> Result<Self, RegistryError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| {
                RegistryError::network_error(
                    "",
                    "HTTP client",
                    format!("failed to create HTTP client: {}", e),
                )
            })?;

        Ok(Self {
            client,
            max_retries: MAX_RETRIES,
            base_delay: BASE_DELAY,
        })
    }

    /// Set the maximum number of retries
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the delay before the first retry; later retries double it
    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    /// GET `url` and decode the JSON body
    ///
    /// `package` and `registry` only label errors.
    pub async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        package: &str,
        registry: &str,
    ) -> Result<T, RegistryError> {
        let mut delay = self.base_delay;
        let mut attempt = 0;

        loop {
            let error = match self.try_get_json(url, package, registry).await? {
                Attempt::Done(parsed) => return Ok(parsed),
                Attempt::Retry(error) => error,
            };

            if attempt >= self.max_retries {
                warn!(%url, attempts = attempt + 1, error = %error, "giving up");
                return Err(error);
            }

            debug!(
                %url,
                attempt,
                delay_ms = delay.as_millis() as u64,
                error = %error,
                "retrying"
            );
            tokio::time::sleep(delay).await;
            delay *= 2;
            attempt += 1;
        }
    }

    /// One request; Err for failures that retrying cannot fix
    async fn try_get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        package: &str,
        registry: &str,
    ) -> Result<Attempt<T>, RegistryError> {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                return Ok(Attempt::Retry(RegistryError::timeout(package, registry)));
            }
            Err(e) => {
                return Ok(Attempt::Retry(RegistryError::network_error(
                    package,
                    registry,
                    e.to_string(),
                )));
            }
        };

        match response.status() {
            StatusCode::TOO_MANY_REQUESTS => {
                return Ok(Attempt::Retry(RegistryError::rate_limit_exceeded(registry)));
            }
            StatusCode::NOT_FOUND => {
                return Err(RegistryError::package_not_found(package, registry));
            }
            status if status.is_server_error() => {
                return Ok(Attempt::Retry(RegistryError::network_error(
                    package,
                    registry,
                    format!("HTTP {}", status),
                )));
            }
            status if !status.is_success() => {
                return Err(RegistryError::network_error(
                    package,
                    registry,
                    format!("HTTP {}", status),
                ));
            }
            _ => {}
        }

        match response.json::<T>().await {
            Ok(parsed) => Ok(Attempt::Done(parsed)),
            Err(e) => Ok(Attempt::Retry(RegistryError::InvalidResponse {
                package: package.to_string(),
                registry: registry.to_string(),
                message: format!("failed to parse JSON: {}", e),
            })),
        }
    }
}
