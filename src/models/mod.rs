//! Core data models for profile metrics and publications.

mod metrics;
mod publication;

pub use metrics::MetricsRecord;
pub use publication::PublicationRecord;
