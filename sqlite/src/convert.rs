//! Row-level conversion from query rows to [`SearchResult`]s.
//!
//! Columns are read by position, in the order the search statement selects
//! them. Any value of an unexpected type surfaces as a conversion error,
//! which the caller reports as a query failure.

use std::str::FromStr;

use bookstore_core::{SearchResult, validate_isbn13};
use chrono::NaiveDate;
use rusqlite::Row;
use rusqlite::types::{FromSqlError, Type, ValueRef};
use rust_decimal::Decimal;
use tracing::debug;

const COL_ID: usize = 0;
const COL_TITLE: usize = 1;
const COL_LANGUAGE: usize = 2;
const COL_PRICE: usize = 3;
const COL_PUB_DATE: usize = 4;
const COL_STORE_ID: usize = 5;
const COL_QUANTITY: usize = 6;
const COL_STORE_NAME: usize = 7;

/// Maps one search row.
pub(crate) fn row_to_result(row: &Row<'_>) -> rusqlite::Result<SearchResult> {
    let isbn13: String = row.get(COL_ID)?;
    if let Err(e) = validate_isbn13(&isbn13) {
        debug!(isbn13 = %isbn13, error = %e, "book identifier is not a valid ISBN-13");
    }

    Ok(SearchResult {
        isbn13,
        title: row.get(COL_TITLE)?,
        language: row.get(COL_LANGUAGE)?,
        price: decimal_column(row, COL_PRICE)?,
        published: row.get::<_, NaiveDate>(COL_PUB_DATE)?,
        store_id: row.get(COL_STORE_ID)?,
        quantity: row.get::<_, Option<u32>>(COL_QUANTITY)?,
        store_name: row.get(COL_STORE_NAME)?,
    })
}

/// Reads a decimal stored as TEXT, INTEGER or REAL.
fn decimal_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Decimal> {
    let value = row.get_ref(idx)?;
    let converted = match value {
        ValueRef::Text(bytes) => std::str::from_utf8(bytes)
            .map_err(|e| FromSqlError::Other(Box::new(e)))
            .and_then(|s| Decimal::from_str(s.trim()).map_err(|e| FromSqlError::Other(Box::new(e)))),
        ValueRef::Integer(i) => Ok(Decimal::from(i)),
        ValueRef::Real(f) => Decimal::try_from(f).map_err(|e| FromSqlError::Other(Box::new(e))),
        ValueRef::Null => {
            return Err(rusqlite::Error::InvalidColumnType(
                idx,
                "price".to_string(),
                Type::Null,
            ));
        }
        ValueRef::Blob(_) => Err(FromSqlError::InvalidType),
    };

    converted.map_err(|e| match e {
        FromSqlError::InvalidType => {
            rusqlite::Error::InvalidColumnType(idx, "price".to_string(), value.data_type())
        }
        other => rusqlite::Error::FromSqlConversionFailure(idx, value.data_type(), Box::new(other)),
    })
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use super::*;

    fn select(sql: &str) -> rusqlite::Result<SearchResult> {
        let conn = Connection::open_in_memory().unwrap();
        conn.query_row(sql, [], row_to_result)
    }

    #[test]
    fn test_full_row() {
        let row = select(
            "SELECT '9780141182506', 'The Stranger', 'English', '10.99', '2000-09-28', 2, 0, 'Store B'",
        )
        .unwrap();
        assert_eq!(row.isbn13, "9780141182506");
        assert_eq!(row.price, Decimal::new(1099, 2));
        assert_eq!(row.published, NaiveDate::from_ymd_opt(2000, 9, 28).unwrap());
        assert_eq!(row.store_id, Some(2));
        assert_eq!(row.quantity, Some(0));
        assert_eq!(row.store_name.as_deref(), Some("Store B"));
    }

    #[test]
    fn test_left_join_nulls() {
        let row = select(
            "SELECT '9780141182506', 'The Stranger', 'English', '10.99', '2000-09-28', NULL, NULL, NULL",
        )
        .unwrap();
        assert!(!row.is_stocked());
        assert_eq!(row.quantity, None);
        assert_eq!(row.store_name, None);
    }

    #[test]
    fn test_price_integer_and_real() {
        let row = select("SELECT 'x', 't', 'l', 12, '2000-01-01', NULL, NULL, NULL").unwrap();
        assert_eq!(row.price, Decimal::from(12));

        let row = select("SELECT 'x', 't', 'l', 12.5, '2000-01-01', NULL, NULL, NULL").unwrap();
        assert_eq!(row.price, Decimal::new(125, 1));
    }

    #[test]
    fn test_bad_price_is_conversion_failure() {
        let err = select("SELECT 'x', 't', 'l', 'cheap', '2000-01-01', NULL, NULL, NULL").unwrap_err();
        assert!(matches!(err, rusqlite::Error::FromSqlConversionFailure(COL_PRICE, _, _)));

        let err = select("SELECT 'x', 't', 'l', NULL, '2000-01-01', NULL, NULL, NULL").unwrap_err();
        assert!(matches!(err, rusqlite::Error::InvalidColumnType(COL_PRICE, _, Type::Null)));

        let err = select("SELECT 'x', 't', 'l', x'00', '2000-01-01', NULL, NULL, NULL").unwrap_err();
        assert!(matches!(err, rusqlite::Error::InvalidColumnType(COL_PRICE, _, Type::Blob)));
    }

    #[test]
    fn test_negative_quantity_rejected() {
        let err = select("SELECT 'x', 't', 'l', '1', '2000-01-01', 1, -1, 'A'").unwrap_err();
        assert!(matches!(
            err,
            rusqlite::Error::IntegralValueOutOfRange(COL_QUANTITY, -1)
                | rusqlite::Error::FromSqlConversionFailure(COL_QUANTITY, _, _)
        ));
    }

    #[test]
    fn test_bad_date_rejected() {
        assert!(select("SELECT 'x', 't', 'l', '1', 'someday', NULL, NULL, NULL").is_err());
    }
}
