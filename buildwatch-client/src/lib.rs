//! Buildwatch HTTP Client
//!
//! A type-safe HTTP client for observing builds on a flow build service.
//!
//! The build service has no bidirectional streaming transport in polling
//! mode: the client repeatedly polls a build's events endpoint, decodes the
//! newline-delimited JSON body into events and hands each batch to an
//! [`EventBatchProcessor`](buildwatch_core::EventBatchProcessor).
//!
//! # Example
//!
//! ```no_run
//! use buildwatch_client::BuildClient;
//! use buildwatch_core::{BuildCallbacks, BuildResults, NoopEventSink, StandardBatchProcessor};
//! use tokio_util::sync::CancellationToken;
//! use uuid::Uuid;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = BuildClient::new("http://localhost:7860");
//!     let job = client.start_build(Uuid::new_v4(), &Default::default()).await?;
//!
//!     let mut results = BuildResults::new();
//!     let mut callbacks = BuildCallbacks::new()
//!         .with_build_complete(|valid| println!("Build finished, valid = {valid}"));
//!
//!     client
//!         .watch_build(
//!             job.job_id,
//!             &mut results,
//!             &mut callbacks,
//!             &CancellationToken::new(),
//!             &NoopEventSink,
//!             &mut StandardBatchProcessor::new(),
//!         )
//!         .await?;
//!     Ok(())
//! }
//! ```

mod builds;
pub mod config;
pub mod error;
mod poller;

// Re-export commonly used types
pub use config::PollSettings;
pub use error::{ClientError, Result};
pub use poller::SessionOutcome;

use reqwest::Client;
use serde::de::DeserializeOwned;

/// HTTP client for the build service API
///
/// This client provides:
/// - Build lifecycle (start, cancel)
/// - Build event polling
#[derive(Debug, Clone)]
pub struct BuildClient {
    /// Base URL of the build service (e.g., "http://localhost:7860")
    base_url: String,
    /// HTTP client instance
    client: Client,
    /// Poller timing
    settings: PollSettings,
}

impl BuildClient {
    /// Create a new build client with default poll settings
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the build service (e.g., "http://localhost:7860")
    ///
    /// # Example
    /// ```
    /// use buildwatch_client::BuildClient;
    ///
    /// let client = BuildClient::new("http://localhost:7860");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new build client with a custom HTTP client
    ///
    /// This is where credentials, timeouts, proxies and TLS settings go:
    /// every request, polls included, is issued through this client.
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the build service
    /// * `client` - A configured reqwest Client
    ///
    /// # Example
    /// ```
    /// use buildwatch_client::BuildClient;
    /// use reqwest::Client;
    /// use std::time::Duration;
    ///
    /// let http_client = Client::builder()
    ///     .timeout(Duration::from_secs(30))
    ///     .build()
    ///     .unwrap();
    ///
    /// let client = BuildClient::with_client("http://localhost:7860", http_client);
    /// ```
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            settings: PollSettings::default(),
        }
    }

    /// Replace the poll settings
    pub fn with_settings(mut self, settings: PollSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Get the base URL of the build service
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the poll settings
    pub fn settings(&self) -> &PollSettings {
        &self.settings
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    ///
    /// This method checks the status code and returns an appropriate error if
    /// the request failed, or deserializes the response body if successful.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_client_creation() {
        let client = BuildClient::new("http://localhost:7860");
        assert_eq!(client.base_url(), "http://localhost:7860");
        assert_eq!(client.settings(), &PollSettings::default());
    }

    #[test]
    fn test_client_trims_trailing_slash() {
        let client = BuildClient::new("http://localhost:7860/");
        assert_eq!(client.base_url(), "http://localhost:7860");
    }

    #[test]
    fn test_client_with_custom_settings() {
        let settings = PollSettings::new(Duration::from_millis(5), Duration::from_millis(10));
        let client = BuildClient::with_client("http://localhost:7860", Client::new())
            .with_settings(settings);
        assert_eq!(client.settings().poll_interval, Duration::from_millis(10));
    }
}
