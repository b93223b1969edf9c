//! Error types for search operations.
//!
//! Database failures fall into two kinds: the connection could not be
//! established or maintained, or the statement was rejected or returned
//! rows of an unexpected shape. Neither is retried.

use rusqlite::ErrorCode;
use thiserror::Error;

/// Errors that can occur while opening the store or running a search.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The database is unreachable, unreadable or not a database.
    #[error("connection error: {0}")]
    ConnectionError(#[source] rusqlite::Error),

    /// The statement failed or the rows did not match the expected schema.
    #[error("query error: {0}")]
    QueryError(#[source] rusqlite::Error),

    /// Table prefix contains invalid characters.
    #[error("invalid prefix '{0}': must contain only alphanumeric characters and underscores")]
    InvalidPrefix(String),

    /// Configuration could not be loaded or is unusable.
    #[error("config error: {0}")]
    Config(#[from] bookstore_db::ConfigError),
}

/// Coarse classification of a [`SearchError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Connection,
    Query,
    Config,
}

impl SearchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ConnectionError(_) => ErrorKind::Connection,
            Self::QueryError(_) => ErrorKind::Query,
            Self::InvalidPrefix(_) | Self::Config(_) => ErrorKind::Config,
        }
    }

    /// Classifies a driver error raised after the connection was opened.
    ///
    /// Result codes describing the file or the link to it map to
    /// [`ConnectionError`](Self::ConnectionError); everything else,
    /// including missing tables and conversion failures, maps to
    /// [`QueryError`](Self::QueryError).
    pub(crate) fn classify(err: rusqlite::Error) -> Self {
        let connection_level = matches!(
            err.sqlite_error_code(),
            Some(
                ErrorCode::CannotOpen
                    | ErrorCode::NotADatabase
                    | ErrorCode::PermissionDenied
                    | ErrorCode::SystemIoFailure
                    | ErrorCode::DatabaseBusy
                    | ErrorCode::DatabaseLocked
                    | ErrorCode::DatabaseCorrupt
            )
        );
        if connection_level {
            Self::ConnectionError(err)
        } else {
            Self::QueryError(err)
        }
    }
}

/// Convenience alias for results with [`SearchError`].
pub type Result<T> = std::result::Result<T, SearchError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn failure(code: std::os::raw::c_int) -> rusqlite::Error {
        rusqlite::Error::SqliteFailure(rusqlite::ffi::Error::new(code), None)
    }

    #[test]
    fn test_classify_connection_codes() {
        let err = SearchError::classify(failure(rusqlite::ffi::SQLITE_NOTADB));
        assert_eq!(err.kind(), ErrorKind::Connection);

        let err = SearchError::classify(failure(rusqlite::ffi::SQLITE_BUSY));
        assert_eq!(err.kind(), ErrorKind::Connection);
    }

    #[test]
    fn test_classify_query_codes() {
        let err = SearchError::classify(failure(rusqlite::ffi::SQLITE_ERROR));
        assert_eq!(err.kind(), ErrorKind::Query);

        let err = SearchError::classify(failure(rusqlite::ffi::SQLITE_INTERRUPT));
        assert_eq!(err.kind(), ErrorKind::Query);

        let err = SearchError::classify(rusqlite::Error::InvalidColumnType(
            3,
            "price".into(),
            rusqlite::types::Type::Blob,
        ));
        assert_eq!(err.kind(), ErrorKind::Query);
    }

    #[test]
    fn test_prefix_is_config_kind() {
        let err = SearchError::InvalidPrefix("a;b".into());
        assert_eq!(err.kind(), ErrorKind::Config);
        assert!(err.to_string().contains("a;b"));
    }
}
