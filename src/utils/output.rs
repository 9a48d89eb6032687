//! JSON document output.

use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::scholar::ScrapeError;

/// Write `value` to `path` as pretty-printed JSON.
///
/// Missing parent directories are created. The document is written to a
/// sibling temporary file first and then renamed over `path`, so a failed
/// write never leaves a truncated document behind.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), ScrapeError> {
    let content = serde_json::to_string_pretty(value)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    fs::write(&tmp_path, content)?;
    fs::rename(&tmp_path, path)?;

    tracing::debug!(path = %path.display(), "Wrote JSON document");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MetricsRecord, PublicationRecord};
    use tempfile::tempdir;

    #[test]
    fn test_write_creates_directory() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data").join("metrics.json");

        write_json(&path, &MetricsRecord::new(1234, 56, 7)).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "{\n  \"citations\": 1234,\n  \"h_index\": 56,\n  \"i10_index\": 7\n}"
        );
        assert!(!dir.path().join("data").join("metrics.json.tmp").exists());
    }

    #[test]
    fn test_write_overwrites_existing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("publications.json");
        fs::write(&path, "stale").unwrap();

        let publications = vec![PublicationRecord::new("Only Paper").year("2022")];
        write_json(&path, &publications).unwrap();

        let loaded: Vec<PublicationRecord> =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded, publications);
    }
}
