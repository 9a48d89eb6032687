//! HTTP page fetcher for the live Scholar site.

use async_trait::async_trait;
use reqwest::header::ACCEPT;

use super::{PageFetcher, ScrapeError};
use crate::config::ScholarConfig;
use crate::utils::HttpClient;

/// Fetches profile pages over HTTP
#[derive(Debug, Clone)]
pub struct ScholarClient {
    client: HttpClient,
}

impl ScholarClient {
    /// Create a client sending the configured User-Agent
    pub fn new(config: &ScholarConfig) -> Result<Self, ScrapeError> {
        Ok(Self {
            client: HttpClient::with_user_agent(&config.user_agent)?,
        })
    }
}

#[async_trait]
impl PageFetcher for ScholarClient {
    async fn fetch(&self, url: &str) -> Result<String, ScrapeError> {
        tracing::debug!(url, "Requesting page");

        let response = self
            .client
            .client()
            .get(url)
            .header(ACCEPT, "text/html")
            .send()
            .await
            .map_err(|e| ScrapeError::Network(format!("Failed to fetch {}: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| ScrapeError::Network(format!("Failed to read response: {}", e)))?;

        tracing::debug!(url, bytes = body.len(), "Received page");
        Ok(body)
    }
}
