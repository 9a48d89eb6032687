//! Utility modules supporting the fetch pipeline.
//!
//! - [`HttpClient`]: HTTP client carrying the configured User-Agent
//! - [`write_json`]: Write a pretty-printed JSON document, creating directories

mod http;
mod output;

pub use http::HttpClient;
pub use output::write_json;
