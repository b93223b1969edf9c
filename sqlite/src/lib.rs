//! Read-only SQLite backend for bookstore title search.
//!
//! This crate runs the one query the search front-end needs: a substring
//! match on book titles, left-joined to inventory and stores, ordered by
//! title. The search term is always passed as a bound parameter.
//!
//! # Architecture
//!
//! - **`schema`** — table naming with an optional prefix, the search
//!   statement, and fixture DDL
//! - **`convert`** — query rows to [`SearchResult`](bookstore_core::SearchResult)
//! - **`search`** — [`SearchService`] and the [`BookSearch`] seam
//!
//! # Quick start
//!
//! ```no_run
//! use bookstore_db::DatabaseConfig;
//! use bookstore_sqlite::{BookSearch, SearchService};
//!
//! let service = SearchService::open(&DatabaseConfig::at("bookstore.db")).unwrap();
//! match service.search("Stranger").unwrap() {
//!     bookstore_core::SearchOutcome::Matches(rows) => println!("{} rows", rows.len()),
//!     bookstore_core::SearchOutcome::NoMatches => println!("no hits"),
//! }
//! ```
//!
//! # Table prefix customization
//!
//! Table names may carry a prefix (`shop_Books`, `shop_Store`, ...).
//! Prefixes must contain only ASCII alphanumeric characters and underscores.

mod convert;
mod error;
mod schema;
mod search;

pub use error::{ErrorKind, Result, SearchError};
pub use schema::{PATTERN_PARAM, generate_schema_sql, search_sql};
pub use search::{BookSearch, SearchService};
