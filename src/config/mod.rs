//! Configuration management.
//!
//! Configuration is read from an optional TOML file and layered with
//! `SCHOLAR_SYNC_*` environment variables. Nested keys use a double
//! underscore, e.g. `SCHOLAR_SYNC_SCHOLAR__USER_ID`.
//!
//! # Configuration File Format
//!
//! ```toml
//! [scholar]
//! user_id = "tMmhq2MAAAAJ"
//! base_url = "https://scholar.google.com"
//! language = "en"
//! page_size = 100
//! request_delay_ms = 2000
//! stat_lookup = "positional"
//!
//! [output]
//! directory = "data"
//! metrics_file = "metrics.json"
//! publications_file = "publications.json"
//!
//! [logging]
//! level = "info"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::scholar::StatLookup;

/// File name looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "scholar-sync.toml";

/// Prefix for environment variable overrides
pub const ENV_PREFIX: &str = "SCHOLAR_SYNC";

/// Browser-like user agent; Scholar is quick to block obvious bots
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Profile and request settings
    #[serde(default)]
    pub scholar: ScholarConfig,

    /// Where the JSON documents are written
    #[serde(default)]
    pub output: OutputConfig,

    /// Logging section
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Settings for the remote profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScholarConfig {
    /// Scholar profile identifier (the `user=` query parameter)
    #[serde(default)]
    pub user_id: String,

    /// Scheme and host of the profile service
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Interface language (`hl=`)
    #[serde(default = "default_language")]
    pub language: String,

    /// Number of rows requested from the listing page.
    ///
    /// Only the first page is fetched, so profiles with more publications
    /// than this are truncated.
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Fixed pause between the two requests, in milliseconds
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,

    /// User-Agent header sent with both requests
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// How the three statistics are located on the profile page
    #[serde(default)]
    pub stat_lookup: StatLookup,
}

impl Default for ScholarConfig {
    fn default() -> Self {
        Self {
            user_id: String::new(),
            base_url: default_base_url(),
            language: default_language(),
            page_size: default_page_size(),
            request_delay_ms: default_request_delay_ms(),
            user_agent: default_user_agent(),
            stat_lookup: StatLookup::default(),
        }
    }
}

impl ScholarConfig {
    /// Politeness delay between the metrics and listing requests
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    /// Check that the settings can produce valid requests
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.user_id.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "scholar.user_id is not set (use --user or SCHOLAR_SYNC_SCHOLAR__USER_ID)"
                    .to_string(),
            ));
        }
        if self.page_size == 0 {
            return Err(ConfigError::Invalid(
                "scholar.page_size must be greater than zero".to_string(),
            ));
        }
        url::Url::parse(&self.base_url).map_err(|e| {
            ConfigError::Invalid(format!("scholar.base_url '{}': {}", self.base_url, e))
        })?;
        Ok(())
    }
}

fn default_base_url() -> String {
    "https://scholar.google.com".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

fn default_page_size() -> u32 {
    100
}

fn default_request_delay_ms() -> u64 {
    2000
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

/// Output file configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory for the JSON documents, relative to the working directory
    #[serde(default = "default_output_dir")]
    pub directory: PathBuf,

    #[serde(default = "default_metrics_file")]
    pub metrics_file: String,

    #[serde(default = "default_publications_file")]
    pub publications_file: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_dir(),
            metrics_file: default_metrics_file(),
            publications_file: default_publications_file(),
        }
    }
}

impl OutputConfig {
    pub fn metrics_path(&self) -> PathBuf {
        self.directory.join(&self.metrics_file)
    }

    pub fn publications_path(&self) -> PathBuf {
        self.directory.join(&self.publications_file)
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_metrics_file() -> String {
    "metrics.json".to_string()
}

fn default_publications_file() -> String {
    "publications.json".to_string()
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Save configuration to a TOML file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| ConfigError::Io(e.to_string()))?;
            }
        }

        std::fs::write(path, content).map_err(|e| ConfigError::Io(e.to_string()))
    }
}

/// Load configuration from a file, with environment overrides
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::from(path))
        .add_source(environment())
        .build()?;

    Ok(settings.try_deserialize()?)
}

/// Build configuration from defaults and environment variables only
pub fn get_config() -> Result<Config, ConfigError> {
    let settings = config::Config::builder().add_source(environment()).build()?;

    Ok(settings.try_deserialize()?)
}

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

/// Find a configuration file in the usual locations
///
/// Checks `./scholar-sync.toml` first, then `<config dir>/scholar-sync/config.toml`.
pub fn find_config_file() -> Option<PathBuf> {
    find_config_file_in(Path::new(""), dirs::config_dir().as_deref())
}

fn find_config_file_in(working_dir: &Path, config_dir: Option<&Path>) -> Option<PathBuf> {
    let local = working_dir.join(CONFIG_FILE_NAME);
    if local.is_file() {
        return Some(local);
    }

    config_dir
        .map(|dir| dir.join("scholar-sync").join("config.toml"))
        .filter(|path| path.is_file())
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Parse error: {0}")]
    Parse(#[from] config::ConfigError),

    #[error("Serialize error: {0}")]
    Serialize(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, MutexGuard};
    use tempfile::tempdir;

    /// Serializes tests that read or write `SCHOLAR_SYNC_*` variables
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn env_lock() -> MutexGuard<'static, ()> {
        ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner())
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.scholar.base_url, "https://scholar.google.com");
        assert_eq!(config.scholar.page_size, 100);
        assert_eq!(config.scholar.request_delay(), Duration::from_secs(2));
        assert_eq!(config.scholar.stat_lookup, StatLookup::Positional);
        assert_eq!(config.output.metrics_path(), PathBuf::from("data/metrics.json"));
        assert_eq!(
            config.output.publications_path(),
            PathBuf::from("data/publications.json")
        );
    }

    #[test]
    fn test_config_file_load() {
        let _env = env_lock();
        let dir = tempdir().unwrap();
        let path = dir.path().join("scholar-sync.toml");

        std::fs::write(
            &path,
            r#"
[scholar]
user_id = "abcDEF123"
request_delay_ms = 500
stat_lookup = "labeled"

[output]
directory = "site/data"
"#,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.scholar.user_id, "abcDEF123");
        assert_eq!(config.scholar.request_delay_ms, 500);
        assert_eq!(config.scholar.stat_lookup, StatLookup::Labeled);
        assert_eq!(config.scholar.language, "en");
        assert_eq!(config.output.directory, PathBuf::from("site/data"));
        assert_eq!(config.output.metrics_file, "metrics.json");
    }

    #[test]
    fn test_config_save_load() {
        let _env = env_lock();
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.scholar.user_id = "saved-id".to_string();
        config.scholar.page_size = 20;
        config.save(&path).unwrap();

        let loaded = load_config(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_env_overrides() {
        let _env = env_lock();
        std::env::set_var("SCHOLAR_SYNC_SCHOLAR__USER_ID", "envUser42");
        std::env::set_var("SCHOLAR_SYNC_SCHOLAR__REQUEST_DELAY_MS", "750");

        let from_env = get_config();

        let dir = tempdir().unwrap();
        let path = dir.path().join("scholar-sync.toml");
        std::fs::write(
            &path,
            r#"
[scholar]
user_id = "fileUser"
request_delay_ms = 500
page_size = 20
"#,
        )
        .unwrap();
        let layered = load_config(&path);

        std::env::remove_var("SCHOLAR_SYNC_SCHOLAR__USER_ID");
        std::env::remove_var("SCHOLAR_SYNC_SCHOLAR__REQUEST_DELAY_MS");

        let from_env = from_env.unwrap();
        assert_eq!(from_env.scholar.user_id, "envUser42");
        assert_eq!(from_env.scholar.request_delay_ms, 750);
        assert_eq!(from_env.scholar.page_size, 100);

        let layered = layered.unwrap();
        assert_eq!(layered.scholar.user_id, "envUser42");
        assert_eq!(layered.scholar.request_delay_ms, 750);
        assert_eq!(layered.scholar.page_size, 20);
    }

    #[test]
    fn test_find_config_file_order() {
        let work = tempdir().unwrap();
        let config_home = tempdir().unwrap();
        assert_eq!(find_config_file_in(work.path(), Some(config_home.path())), None);

        let user_file = config_home.path().join("scholar-sync").join("config.toml");
        std::fs::create_dir_all(user_file.parent().unwrap()).unwrap();
        std::fs::write(&user_file, "").unwrap();
        assert_eq!(
            find_config_file_in(work.path(), Some(config_home.path())),
            Some(user_file)
        );

        let local_file = work.path().join(CONFIG_FILE_NAME);
        std::fs::write(&local_file, "").unwrap();
        assert_eq!(
            find_config_file_in(work.path(), Some(config_home.path())),
            Some(local_file)
        );
        assert_eq!(
            find_config_file_in(work.path(), None),
            Some(work.path().join(CONFIG_FILE_NAME))
        );
    }

    #[test]
    fn test_config_file_invalid_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("invalid.toml");
        std::fs::write(&path, "invalid = toml = content").unwrap();

        assert!(load_config(&path).is_err());
    }

    #[test]
    fn test_validate() {
        let mut scholar = ScholarConfig::default();
        assert!(matches!(scholar.validate(), Err(ConfigError::Invalid(_))));

        scholar.user_id = "abc".to_string();
        assert!(scholar.validate().is_ok());

        scholar.page_size = 0;
        assert!(scholar.validate().is_err());

        scholar.page_size = 100;
        scholar.base_url = "not a url".to_string();
        assert!(scholar.validate().is_err());
    }
}
