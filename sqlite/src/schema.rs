//! Table naming and statement text.
//!
//! The search reads three tables:
//!
//! - `{prefix}Books` — `id` (ISBN-13), `title`, `language`, `price`, `pub_date`
//! - `{prefix}InventoryEntry` — `book_id`, `store_id`, `quantity`
//! - `{prefix}Store` — `id`, `store_name`
//!
//! The prefix is the only value ever interpolated into SQL text, so it is
//! validated first. Search terms are always bound as parameters.

use crate::error::{Result, SearchError};

/// Name of the bound parameter carrying the `LIKE` pattern.
pub const PATTERN_PARAM: &str = ":pattern";

/// Validates that a table prefix contains only alphanumeric characters and
/// underscores. The empty prefix is allowed and selects the bare table names.
pub(crate) fn validate_prefix(prefix: &str) -> Result<()> {
    if !prefix.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(SearchError::InvalidPrefix(prefix.to_string()));
    }
    Ok(())
}

/// Builds the title search statement for the given prefix.
///
/// Rows are ordered by title. Book id and store id break ties so that a
/// repeated search over unchanged data returns rows in the same order.
///
/// # Errors
///
/// Returns [`SearchError::InvalidPrefix`] if the prefix is invalid.
pub fn search_sql(prefix: &str) -> Result<String> {
    validate_prefix(prefix)?;

    Ok(format!(
        r#"
SELECT b.id, b.title, b.language, b.price, b.pub_date,
       i.store_id, i.quantity, s.store_name
FROM {prefix}Books AS b
LEFT JOIN {prefix}InventoryEntry AS i ON b.id = i.book_id
LEFT JOIN {prefix}Store AS s ON i.store_id = s.id
WHERE b.title LIKE {PATTERN_PARAM}
ORDER BY b.title, b.id, i.store_id
"#
    ))
}

/// Generates `CREATE TABLE` statements matching the tables a search reads.
///
/// Intended for provisioning fixture and demo databases. Prices are stored
/// as decimal text and publication dates as `YYYY-MM-DD` text.
///
/// # Errors
///
/// Returns [`SearchError::InvalidPrefix`] if the prefix is invalid.
pub fn generate_schema_sql(prefix: &str) -> Result<String> {
    validate_prefix(prefix)?;

    Ok(format!(
        r#"
CREATE TABLE IF NOT EXISTS {prefix}Books (
    id TEXT PRIMARY KEY CHECK (length(id) = 13),
    title TEXT NOT NULL,
    language TEXT NOT NULL,
    price TEXT NOT NULL,
    pub_date TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS {prefix}Store (
    id INTEGER PRIMARY KEY,
    store_name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS {prefix}InventoryEntry (
    book_id TEXT NOT NULL,
    store_id INTEGER NOT NULL,
    quantity INTEGER NOT NULL DEFAULT 0 CHECK (quantity >= 0),
    PRIMARY KEY (book_id, store_id),
    FOREIGN KEY (book_id) REFERENCES {prefix}Books(id),
    FOREIGN KEY (store_id) REFERENCES {prefix}Store(id)
);

CREATE INDEX IF NOT EXISTS idx_{prefix}Books_title ON {prefix}Books(title);
CREATE INDEX IF NOT EXISTS idx_{prefix}InventoryEntry_store ON {prefix}InventoryEntry(store_id);
"#
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_prefix() {
        assert!(validate_prefix("").is_ok());
        assert!(validate_prefix("shop_").is_ok());
        assert!(validate_prefix("A_B_C9").is_ok());
    }

    #[test]
    fn test_invalid_prefix_special_chars() {
        assert!(validate_prefix("drop;--").is_err());
        assert!(validate_prefix("hello world").is_err());
        assert!(validate_prefix("test-prefix").is_err());
        assert!(validate_prefix("bök_").is_err());
    }

    #[test]
    fn test_search_sql_binds_pattern() {
        let sql = search_sql("").unwrap();
        assert!(sql.contains("FROM Books AS b"));
        assert!(sql.contains("LEFT JOIN InventoryEntry AS i ON b.id = i.book_id"));
        assert!(sql.contains("LEFT JOIN Store AS s ON i.store_id = s.id"));
        assert!(sql.contains("WHERE b.title LIKE :pattern"));
        assert!(sql.contains("ORDER BY b.title"));
    }

    #[test]
    fn test_search_sql_applies_prefix() {
        let sql = search_sql("shop_").unwrap();
        assert!(sql.contains("shop_Books"));
        assert!(sql.contains("shop_InventoryEntry"));
        assert!(sql.contains("shop_Store"));
        assert!(search_sql("x'; DROP TABLE Books; --").is_err());
    }

    #[test]
    fn test_generate_schema_sql_executes() {
        let sql = generate_schema_sql("t_").unwrap();
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        conn.execute_batch(&sql).unwrap();
        // Idempotent
        conn.execute_batch(&sql).unwrap();

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name LIKE 't\\_%' ESCAPE '\\'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 3);
    }

    #[test]
    fn test_quantity_check_constraint() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        conn.execute_batch(&generate_schema_sql("").unwrap()).unwrap();
        assert!(conn
            .execute(
                "INSERT INTO InventoryEntry (book_id, store_id, quantity) VALUES ('9780141182506', 1, -1)",
                [],
            )
            .is_err());
    }
}
