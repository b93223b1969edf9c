//! Configuration for bookstore title search.
//!
//! Loads and saves the YAML file that tells the search front-end which
//! database to open, how its tables are prefixed, which timeouts apply and
//! how to present results.
//!
//! # Quick start
//!
//! ```no_run
//! use bookstore_db::SearchConfig;
//!
//! let mut config = SearchConfig::load("book-search.yml").unwrap();
//! config.database.query_timeout_ms = Some(2_000);
//! config.save("book-search.yml").unwrap();
//! ```

mod config;
mod error;

pub use config::{
    CONFIG_VERSION, DEFAULT_BUSY_TIMEOUT_MS, DatabaseConfig, OutputConfig, SearchConfig,
};
pub use error::{ConfigError, Result};
