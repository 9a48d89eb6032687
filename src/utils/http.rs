//! HTTP client utilities.

use reqwest::Client;
use std::sync::Arc;

use crate::scholar::ScrapeError;

/// Shared HTTP client carrying the configured User-Agent
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Arc<Client>,
}

impl HttpClient {
    /// Create a new HTTP client with a custom user agent.
    ///
    /// No request timeout is set; the transport defaults apply.
    pub fn with_user_agent(user_agent: &str) -> Result<Self, ScrapeError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .gzip(true)
            .build()
            .map_err(|e| ScrapeError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client: Arc::new(client),
        })
    }

    /// Get the underlying client
    pub fn client(&self) -> &Client {
        &self.client
    }
}
