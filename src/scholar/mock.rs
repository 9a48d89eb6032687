//! Mock page fetcher for testing purposes.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use super::{PageFetcher, ScrapeError};

#[derive(Debug, Clone)]
enum MockPage {
    Body(String),
    Status(u16),
}

/// A fetcher that serves predefined pages by URL.
///
/// Unknown URLs answer with status 404. Every requested URL is recorded.
#[derive(Debug, Default)]
pub struct MockFetcher {
    pages: Mutex<HashMap<String, MockPage>>,
    requests: Mutex<Vec<String>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` for `url`.
    pub fn with_page(self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.set(url.into(), MockPage::Body(body.into()));
        self
    }

    /// Answer `url` with a non-success status.
    pub fn with_status(self, url: impl Into<String>, status: u16) -> Self {
        self.set(url.into(), MockPage::Status(status));
        self
    }

    /// URLs requested so far, in order
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    fn set(&self, url: String, page: MockPage) {
        self.pages.lock().unwrap().insert(url, page);
    }
}

#[async_trait]
impl PageFetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> Result<String, ScrapeError> {
        self.requests.lock().unwrap().push(url.to_string());

        let page = self.pages.lock().unwrap().get(url).cloned();
        match page {
            Some(MockPage::Body(body)) => Ok(body),
            Some(MockPage::Status(status)) => Err(ScrapeError::Status {
                url: url.to_string(),
                status,
            }),
            None => Err(ScrapeError::Status {
                url: url.to_string(),
                status: 404,
            }),
        }
    }
}
