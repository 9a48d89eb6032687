//! Aggregate citation statistics for one profile.

use serde::{Deserialize, Serialize};

/// Citation metrics shown in the profile sidebar.
///
/// The three values are only ever produced together; a page that yields fewer
/// than three statistics produces no record at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsRecord {
    /// Total citation count
    pub citations: u64,

    /// h-index
    pub h_index: u64,

    /// Number of publications with at least ten citations
    pub i10_index: u64,
}

impl MetricsRecord {
    pub fn new(citations: u64, h_index: u64, i10_index: u64) -> Self {
        Self {
            citations,
            h_index,
            i10_index,
        }
    }
}

impl std::fmt::Display for MetricsRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "citations={}, h_index={}, i10_index={}",
            self.citations, self.h_index, self.i10_index
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_keys() {
        let record = MetricsRecord::new(1234, 56, 7);
        let value = serde_json::to_value(record).unwrap();

        assert_eq!(
            value,
            serde_json::json!({ "citations": 1234, "h_index": 56, "i10_index": 7 })
        );
    }

    #[test]
    fn test_display() {
        let record = MetricsRecord::new(10, 2, 1);
        assert_eq!(record.to_string(), "citations=10, h_index=2, i10_index=1");
    }
}
