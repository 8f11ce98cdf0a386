//! Harvest Forge Client
//!
//! An async HTTP client for the forge's Actions REST API.
//!
//! Every per-run call returns a [`Result`] whose error is the reason the
//! value is absent. Failures are logged here with the run id and status, so
//! callers only need to branch on presence.
//!
//! # Example
//!
//! ```no_run
//! use harvest_client::ForgeClient;
//! use harvest_core::domain::repo::RepoRef;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = ForgeClient::new("https://api.github.com", "ghp_example")?;
//!     let repo = RepoRef::new("acme", "widget");
//!
//!     let runs = client.list_workflow_runs(&repo, Some(10)).await;
//!     println!("Fetched {} runs", runs.len());
//!     Ok(())
//! }
//! ```

mod api;
mod contents;
pub mod error;
mod runs;

#[cfg(test)]
mod test_support;

pub use api::ForgeApi;
pub use error::{ClientError, Result};
pub use runs::PAGE_SIZE;

use std::time::Duration;

use harvest_core::domain::repo::RepoRef;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

/// Default timeout for metadata calls
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Default timeout for log archive downloads
pub const DEFAULT_LOG_TIMEOUT: Duration = Duration::from_secs(60);

const ACCEPT_JSON: &str = "application/vnd.github+json";
const API_VERSION_HEADER: &str = "x-github-api-version";
const API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = concat!("harvest/", env!("CARGO_PKG_VERSION"));

/// HTTP client for the forge API
///
/// Holds the bearer credential and the per-call timeouts. Cloning is cheap;
/// the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct ForgeClient {
    /// Base URL of the API (e.g., "https://api.github.com")
    base_url: String,
    /// Bearer credential sent with every request
    token: String,
    /// HTTP client instance
    client: Client,
    request_timeout: Duration,
    log_timeout: Duration,
}

impl ForgeClient {
    /// Create a new forge client
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the API (e.g., "https://api.github.com")
    /// * `token` - Bearer credential
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_JSON));
        headers.insert(API_VERSION_HEADER, HeaderValue::from_static(API_VERSION));

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?;

        Ok(Self::with_client(base_url, token, client))
    }

    /// Create a new forge client with a custom HTTP client
    ///
    /// The caller is responsible for the `Accept` and `User-Agent` headers.
    pub fn with_client(
        base_url: impl Into<String>,
        token: impl Into<String>,
        client: Client,
    ) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.into(),
            client,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            log_timeout: DEFAULT_LOG_TIMEOUT,
        }
    }

    /// Override the metadata and log download timeouts
    pub fn with_timeouts(mut self, request_timeout: Duration, log_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self.log_timeout = log_timeout;
        self
    }

    /// Get the base URL of the API
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of an endpoint below `/repos/{owner}/{repo}`
    fn repo_url(&self, repo: &RepoRef, suffix: &str) -> String {
        format!(
            "{}/repos/{}/{}/{}",
            self.base_url, repo.owner, repo.name, suffix
        )
    }

    /// Authenticated GET request
    fn get(&self, url: &str) -> RequestBuilder {
        self.client.get(url).bearer_auth(&self.token)
    }

    /// GET a metadata endpoint and deserialize its JSON body
    async fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self.get(url).timeout(self.request_timeout).send().await?;
        self.handle_response(response).await
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let response = Self::check_status(response).await?;

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }

    /// Handle an API response whose body is returned as raw bytes
    async fn handle_bytes_response(&self, response: reqwest::Response) -> Result<Vec<u8>> {
        let response = Self::check_status(response).await?;
        let body = response.bytes().await?;
        Ok(body.to_vec())
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = ForgeClient::new("https://api.github.com", "token").unwrap();
        assert_eq!(client.base_url(), "https://api.github.com");
        assert_eq!(client.request_timeout, DEFAULT_REQUEST_TIMEOUT);
        assert_eq!(client.log_timeout, DEFAULT_LOG_TIMEOUT);
    }

    #[test]
    fn test_client_trims_trailing_slash() {
        let client = ForgeClient::new("https://api.github.com/", "token").unwrap();
        assert_eq!(client.base_url(), "https://api.github.com");
    }

    #[test]
    fn test_repo_url() {
        let client = ForgeClient::with_client("http://localhost:9000", "token", Client::new());
        let repo = RepoRef::new("acme", "widget");
        assert_eq!(
            client.repo_url(&repo, "actions/runs/7/jobs"),
            "http://localhost:9000/repos/acme/widget/actions/runs/7/jobs"
        );
    }

    #[test]
    fn test_with_timeouts() {
        let client = ForgeClient::with_client("http://localhost:9000", "token", Client::new())
            .with_timeouts(Duration::from_secs(5), Duration::from_secs(10));
        assert_eq!(client.request_timeout, Duration::from_secs(5));
        assert_eq!(client.log_timeout, Duration::from_secs(10));
    }
}
