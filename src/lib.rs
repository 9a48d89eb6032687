//! # Scholar Sync
//!
//! Fetches the citation metrics and publication list of one Google Scholar
//! profile and saves them as JSON documents for a personal website.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`models`]: The records written to disk ([`MetricsRecord`], [`PublicationRecord`])
//! - [`scholar`]: Page fetching and the metrics/publication extractors
//! - [`runner`]: The fetch, parse and write pipeline
//! - [`config`]: Configuration management
//! - [`ui`]: Status lines and the run summary
//! - [`utils`]: HTTP client and JSON output helpers

pub mod config;
pub mod models;
pub mod runner;
pub mod scholar;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use models::{MetricsRecord, PublicationRecord};
pub use runner::{RunSummary, Runner};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
