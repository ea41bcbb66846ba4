//! NCBI E-utilities `efetch` client.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::StatusCode;
use tracing::{debug, info, warn};

use crate::config::RegistryConfig;
use crate::core::types::Identifier;
use crate::registry::{RecordSource, RegistryError};

/// Bounded exponential backoff for transient failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts after the first one
    pub max_retries: u32,
    /// Delay before the first retry
    pub backoff: Duration,
}

impl RetryPolicy {
    #[must_use]
    pub fn from_config(config: &RegistryConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            backoff: Duration::from_millis(config.backoff_ms),
        }
    }

    /// Delay before retry number `retry` (1-based): backoff, 2x, 4x, ...
    #[must_use]
    pub fn delay(&self, retry: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry.saturating_sub(1));
        self.backoff.saturating_mul(factor)
    }

    /// Run `op`, retrying only errors for which [`RegistryError::is_transient`] holds
    ///
    /// # Errors
    ///
    /// Returns the first non-transient error, or the last transient error
    /// once retries are exhausted.
    pub fn run<T, F>(&self, identifier: &Identifier, mut op: F) -> Result<T, RegistryError>
    where
        F: FnMut() -> Result<T, RegistryError>,
    {
        let mut retry = 0;
        loop {
            match op() {
                Ok(value) => return Ok(value),
                Err(e) if e.is_transient() && retry < self.max_retries => {
                    retry += 1;
                    let delay = self.delay(retry);
                    warn!(
                        "Fetch of {identifier} failed (retry {retry}/{}): {e}",
                        self.max_retries
                    );
                    if !delay.is_zero() {
                        info!("Retrying in {} ms...", delay.as_millis());
                        std::thread::sleep(delay);
                    }
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Fetches plain-text records from an E-utilities endpoint
pub struct EntrezClient {
    client: Client,
    efetch_url: String,
    database: String,
    email: String,
    tool: String,
    retry: RetryPolicy,
}

impl EntrezClient {
    /// # Errors
    ///
    /// Returns `RegistryError::Client` if the HTTP client cannot be built.
    pub fn new(config: &RegistryConfig, email: &str) -> Result<Self, RegistryError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RegistryError::Client(e.to_string()))?;

        Ok(Self {
            client,
            efetch_url: format!("{}/efetch.fcgi", config.base_url.trim_end_matches('/')),
            database: config.database.clone(),
            email: email.to_string(),
            tool: config.tool.clone(),
            retry: RetryPolicy::from_config(config),
        })
    }

    fn fetch_once(&self, identifier: &Identifier) -> Result<String, RegistryError> {
        let network = |e: reqwest::Error| RegistryError::Network {
            identifier: identifier.clone(),
            message: e.to_string(),
        };

        debug!("efetch db={} id={identifier}", self.database);
        let response = self
            .client
            .get(&self.efetch_url)
            .query(&[
                ("db", self.database.as_str()),
                ("id", identifier.as_str()),
                ("retmode", "text"),
                ("tool", self.tool.as_str()),
                ("email", self.email.as_str()),
            ])
            .send()
            .map_err(network)?;

        let status = response.status();
        if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
            return Err(RegistryError::Network {
                identifier: identifier.clone(),
                message: format!("HTTP {status}"),
            });
        }
        if !status.is_success() {
            return Err(RegistryError::Status {
                identifier: identifier.clone(),
                status: status.as_u16(),
            });
        }

        response.text().map_err(network)
    }
}

impl RecordSource for EntrezClient {
    fn fetch(&self, identifier: &Identifier) -> Result<String, RegistryError> {
        self.retry.run(identifier, || self.fetch_once(identifier))
    }
}
