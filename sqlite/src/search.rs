//! The title search service.
//!
//! [`SearchService`] owns one read-only connection for its whole lifetime
//! and runs a single parameterized statement per search. Callers that only
//! need to search should depend on the [`BookSearch`] trait so a fake can
//! stand in for the database.
//!
//! # Example
//!
//! ```no_run
//! use bookstore_db::DatabaseConfig;
//! use bookstore_sqlite::{BookSearch, SearchService};
//!
//! let service = SearchService::open(&DatabaseConfig::at("bookstore.db")).unwrap();
//! let outcome = service.search("Stranger").unwrap();
//! for row in outcome.rows() {
//!     println!("{} at {:?}", row.title, row.store_name);
//! }
//! service.close().unwrap();
//! ```

use std::path::Path;
use std::time::{Duration, Instant};

use bookstore_core::{SearchOutcome, SearchPattern};
use bookstore_db::DatabaseConfig;
use rusqlite::{Connection, OpenFlags, ToSql};
use tracing::{debug, info, warn};

use crate::convert;
use crate::error::{Result, SearchError};
use crate::schema::{PATTERN_PARAM, search_sql};

/// Virtual machine instructions between deadline checks.
const PROGRESS_CHECK_OPS: i32 = 1_000;

/// Something that can run a title search.
pub trait BookSearch {
    /// Returns every row whose title contains `query`, ordered by title.
    fn search(&self, query: &str) -> Result<SearchOutcome>;
}

/// Read-only title search over a SQLite database.
///
/// # Examples
///
/// ```
/// use bookstore_sqlite::{BookSearch, SearchService, generate_schema_sql};
/// use rusqlite::Connection;
///
/// let conn = Connection::open_in_memory().unwrap();
/// conn.execute_batch(&generate_schema_sql("").unwrap()).unwrap();
///
/// let service = SearchService::from_connection(conn, "").unwrap();
/// assert!(service.search("Camus").unwrap().is_empty());
/// ```
pub struct SearchService {
    conn: Connection,
    sql: String,
    query_timeout: Option<Duration>,
}

impl SearchService {
    /// Opens the configured database read-only.
    ///
    /// The file must already exist. The schema catalog is read once so
    /// that a file which is not a database fails here rather than on the
    /// first search.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidPrefix`] for a bad table prefix and
    /// [`SearchError::ConnectionError`] if the file cannot be opened or read.
    pub fn open(config: &DatabaseConfig) -> Result<Self> {
        let sql = search_sql(&config.table_prefix)?;
        let conn = open_read_only(&config.path)?;

        if let Some(timeout) = config.busy_timeout() {
            conn.busy_timeout(timeout)
                .map_err(SearchError::ConnectionError)?;
        }
        conn.query_row("SELECT COUNT(*) FROM sqlite_master", [], |row| {
            row.get::<_, i64>(0)
        })
        .map_err(SearchError::ConnectionError)?;

        info!(path = %config.path.display(), prefix = %config.table_prefix, "opened bookstore database");
        Ok(Self {
            conn,
            sql,
            query_timeout: config.query_timeout(),
        })
    }

    /// Wraps an existing connection.
    ///
    /// The connection is switched to `query_only` mode; populate it before
    /// handing it over.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidPrefix`] if the prefix is invalid.
    pub fn from_connection(conn: Connection, prefix: &str) -> Result<Self> {
        let sql = search_sql(prefix)?;
        conn.execute_batch("PRAGMA query_only = ON;")
            .map_err(SearchError::ConnectionError)?;
        Ok(Self {
            conn,
            sql,
            query_timeout: None,
        })
    }

    /// Sets the per-search time limit. `None` removes it.
    pub fn with_query_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.query_timeout = timeout;
        self
    }

    /// Returns the per-search time limit, if any.
    pub fn query_timeout(&self) -> Option<Duration> {
        self.query_timeout
    }

    /// Returns a reference to the underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Closes the connection.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::ConnectionError`] if SQLite refuses to close
    /// the handle.
    pub fn close(self) -> Result<()> {
        self.conn
            .close()
            .map_err(|(_, e)| SearchError::ConnectionError(e))
    }

    fn run(&self, pattern: &SearchPattern) -> Result<SearchOutcome> {
        let mut stmt = self
            .conn
            .prepare_cached(&self.sql)
            .map_err(SearchError::classify)?;

        let rows = stmt
            .query_map(
                &[(PATTERN_PARAM, &pattern.as_str() as &dyn ToSql)],
                convert::row_to_result,
            )
            .map_err(SearchError::classify)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(SearchError::classify)?;

        Ok(SearchOutcome::from_rows(rows))
    }

    fn arm_deadline(&self) {
        if let Some(limit) = self.query_timeout {
            let deadline = Instant::now() + limit;
            self.conn
                .progress_handler(PROGRESS_CHECK_OPS, Some(move || Instant::now() >= deadline));
        }
    }

    fn disarm_deadline(&self) {
        if self.query_timeout.is_some() {
            self.conn.progress_handler(0, None::<fn() -> bool>);
        }
    }
}

impl BookSearch for SearchService {
    fn search(&self, query: &str) -> Result<SearchOutcome> {
        let pattern = SearchPattern::contains(query);
        if pattern.has_wildcards() {
            warn!(
                query,
                wildcards = ?pattern.wildcards(),
                "search term contains LIKE wildcards; they match as patterns, not literally"
            );
        }

        self.arm_deadline();
        let started = Instant::now();
        let outcome = self.run(&pattern);
        self.disarm_deadline();

        match &outcome {
            Ok(outcome) => debug!(
                query,
                rows = outcome.len(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "search finished"
            ),
            Err(e) => debug!(query, error = %e, "search failed"),
        }
        outcome
    }
}

fn open_read_only(path: &Path) -> Result<Connection> {
    let flags = OpenFlags::SQLITE_OPEN_READ_ONLY
        | OpenFlags::SQLITE_OPEN_URI
        | OpenFlags::SQLITE_OPEN_NO_MUTEX;
    Connection::open_with_flags(path, flags).map_err(SearchError::ConnectionError)
}
