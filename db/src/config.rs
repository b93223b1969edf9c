//! Configuration for the search front-end.
//!
//! Defines the YAML-serializable settings that locate the database, name
//! its tables, bound how long the driver may wait, and pick an output
//! format.
//!
//! # Example YAML
//!
//! ```yaml
//! version: "1.0"
//! database:
//!   path: bookstore.db
//!   table_prefix: ""
//!   busy_timeout_ms: 5000
//!   query_timeout_ms: 2000
//! output:
//!   format: table
//! ```
//!
//! Every section is optional; missing keys fall back to [`Default`].

use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::time::Duration;

use bookstore_core::OutputFormat;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Configuration format version written by [`SearchConfig::default`].
pub const CONFIG_VERSION: &str = "1.0";

/// Default time the driver waits on a locked database.
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Where the database lives and how to talk to it.
///
/// # Examples
///
/// ```
/// # use bookstore_db::DatabaseConfig;
/// use std::time::Duration;
///
/// let db = DatabaseConfig {
///     query_timeout_ms: Some(250),
///     ..DatabaseConfig::default()
/// };
/// assert_eq!(db.query_timeout(), Some(Duration::from_millis(250)));
/// assert_eq!(db.busy_timeout(), Some(Duration::from_secs(5)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    pub path: PathBuf,
    /// Prefix prepended to every table name (empty by default).
    pub table_prefix: String,
    /// Milliseconds to wait on a locked database; `None` or `0` keeps the
    /// driver default.
    pub busy_timeout_ms: Option<u64>,
    /// Milliseconds a single search may run before it is interrupted;
    /// `None` or `0` disables the limit.
    pub query_timeout_ms: Option<u64>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("bookstore.db"),
            table_prefix: String::new(),
            busy_timeout_ms: Some(DEFAULT_BUSY_TIMEOUT_MS),
            query_timeout_ms: None,
        }
    }
}

impl DatabaseConfig {
    /// Config pointing at `path` with default settings otherwise.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Lock wait as a [`Duration`]; `None` when unset or zero.
    pub fn busy_timeout(&self) -> Option<Duration> {
        non_zero_millis(self.busy_timeout_ms)
    }

    /// Per-search time limit as a [`Duration`]; `None` when unset or zero.
    pub fn query_timeout(&self) -> Option<Duration> {
        non_zero_millis(self.query_timeout_ms)
    }
}

fn non_zero_millis(ms: Option<u64>) -> Option<Duration> {
    ms.filter(|ms| *ms > 0).map(Duration::from_millis)
}

/// Presentation settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
}

/// Top-level configuration.
///
/// # Examples
///
/// ```no_run
/// use bookstore_db::SearchConfig;
///
/// let config = SearchConfig::load("book-search.yml").unwrap();
/// println!("searching {}", config.database.path.display());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Configuration format version (e.g., `"1.0"`).
    pub version: String,
    pub database: DatabaseConfig,
    pub output: OutputConfig,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION.to_string(),
            database: DatabaseConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl SearchConfig {
    /// Loads and validates configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](ConfigError::IoError) if the file cannot be read,
    /// [`YamlError`](ConfigError::YamlError) if parsing fails, or
    /// [`Invalid`](ConfigError::Invalid) if validation fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config: Self = serde_yaml::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    /// Saves the configuration as YAML.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    /// Checks values that deserialize fine but cannot be used.
    pub fn validate(&self) -> Result<()> {
        if self.version.trim().is_empty() {
            return Err(ConfigError::Invalid("version cannot be empty".into()));
        }
        if self.database.path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("database.path cannot be empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_yaml() -> &'static str {
        r#"
version: "1.0"
database:
  path: /var/lib/bookstore/shop.db
  table_prefix: shop_
  busy_timeout_ms: 1000
  query_timeout_ms: 250
output:
  format: json
"#
    }

    #[test]
    fn test_deserialize_complete() {
        let config: SearchConfig = serde_yaml::from_str(sample_yaml()).unwrap();
        assert_eq!(config.version, "1.0");
        assert_eq!(
            config.database.path,
            PathBuf::from("/var/lib/bookstore/shop.db")
        );
        assert_eq!(config.database.table_prefix, "shop_");
        assert_eq!(config.database.busy_timeout(), Some(Duration::from_secs(1)));
        assert_eq!(
            config.database.query_timeout(),
            Some(Duration::from_millis(250))
        );
        assert_eq!(config.output.format, OutputFormat::Json);
    }

    #[test]
    fn test_deserialize_partial_uses_defaults() {
        let config: SearchConfig = serde_yaml::from_str("database:\n  path: x.db\n").unwrap();
        assert_eq!(config.version, CONFIG_VERSION);
        assert_eq!(config.database.path, PathBuf::from("x.db"));
        assert_eq!(config.database.table_prefix, "");
        assert_eq!(
            config.database.busy_timeout_ms,
            Some(DEFAULT_BUSY_TIMEOUT_MS)
        );
        assert_eq!(config.database.query_timeout(), None);
        assert_eq!(config.output.format, OutputFormat::Table);
    }

    #[test]
    fn test_zero_timeouts_mean_driver_default() {
        let db = DatabaseConfig {
            busy_timeout_ms: Some(0),
            query_timeout_ms: Some(0),
            ..DatabaseConfig::default()
        };
        assert_eq!(db.busy_timeout(), None);
        assert_eq!(db.query_timeout(), None);
    }

    #[test]
    fn test_validate_rejects_empty_values() {
        let mut config = SearchConfig::default();
        assert!(config.validate().is_ok());

        config.version = " ".into();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = SearchConfig::default();
        config.database.path = PathBuf::new();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_load_save_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book-search.yml");

        let original: SearchConfig = serde_yaml::from_str(sample_yaml()).unwrap();
        original.save(&path).unwrap();

        let loaded = SearchConfig::load(&path).unwrap();
        assert_eq!(loaded, original);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = SearchConfig::load(dir.path().join("missing.yml")).unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }

    #[test]
    fn test_load_bad_yaml_is_yaml_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.yml");
        std::fs::write(&path, "database: [unterminated").unwrap();
        let err = SearchConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::YamlError(_)));
    }
}
