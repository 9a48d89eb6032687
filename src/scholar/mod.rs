//! Google Scholar profile scraping.
//!
//! A profile is read in two independent steps. [`MetricsExtractor`] turns the
//! profile page into a [`MetricsRecord`](crate::models::MetricsRecord) and
//! [`PublicationExtractor`] turns the listing page into a sequence of
//! [`PublicationRecord`](crate::models::PublicationRecord). Pages are
//! retrieved through the [`PageFetcher`] trait so extraction can be driven
//! from the network ([`ScholarClient`]), from saved files, or from
//! [`MockFetcher`] in tests.
//!
//! Scholar has no public API and its markup changes without notice. The class
//! names used here (`gsc_rsb_std`, `gsc_a_tr`, ...) reflect the current layout.

mod client;
mod metrics;
pub mod mock;
mod publications;
mod urls;

pub use client::ScholarClient;
pub use metrics::{MetricsExtractor, StatLookup, STAT_LABELS};
pub use mock::MockFetcher;
pub use publications::{Listing, PublicationExtractor};
pub use urls::ProfileUrls;

use async_trait::async_trait;
use scraper::{ElementRef, Selector};

/// Retrieves the raw markup of a page.
#[async_trait]
pub trait PageFetcher: Send + Sync + std::fmt::Debug {
    /// Fetch `url` and return the response body.
    ///
    /// Non-2xx responses are errors.
    async fn fetch(&self, url: &str) -> Result<String, ScrapeError>;
}

/// Errors that abort one extraction step
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    /// Network or HTTP transport error
    #[error("Network error: {0}")]
    Network(String),

    /// The server answered with a non-success status
    #[error("{url} returned status {status}")]
    Status { url: String, status: u16 },

    /// A configured URL could not be parsed
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The page layout is not what the extractor expects
    #[error("Unexpected page structure: {0}")]
    Structure(String),

    /// A statistic could not be read as a number
    #[error("Invalid number: {0}")]
    Number(String),

    /// The listing page produced no valid rows
    #[error("No publications found")]
    NoPublications,

    /// IO error (file system)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("Serialize error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl From<reqwest::Error> for ScrapeError {
    fn from(err: reqwest::Error) -> Self {
        ScrapeError::Network(err.to_string())
    }
}

/// Errors that cause a single publication row to be skipped
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RowError {
    #[error("row has no title element")]
    MissingTitle,

    #[error("row title is empty")]
    EmptyTitle,
}

/// Parse a displayed count such as `"1,234"`.
///
/// Counts are whole numbers, so every thousands separator a locale may use
/// (`,` `.` and spaces, including non-breaking ones) is removed. Anything else
/// that is not an ASCII digit is rejected.
pub fn parse_count(text: &str) -> Result<u64, ScrapeError> {
    let trimmed = text.trim();
    let digits: String = trimmed
        .chars()
        .filter(|c| !matches!(c, ',' | '.' | ' ' | '\u{a0}' | '\u{202f}'))
        .collect();

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ScrapeError::Number(format!("'{}' is not a count", trimmed)));
    }

    digits
        .parse::<u64>()
        .map_err(|e| ScrapeError::Number(format!("'{}': {}", trimmed, e)))
}

pub(crate) fn selector(css: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(css)
        .map_err(|e| ScrapeError::Structure(format!("invalid selector '{}': {:?}", css, e)))
}

pub(crate) fn element_text(element: &ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}
