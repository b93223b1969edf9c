//! Data model for bookstore title search.
//!
//! The store keeps three relations: books, inventory entries linking a book
//! to a store, and stores. A search returns a denormalized projection of the
//! three, one [`SearchResult`] per (book, inventory entry) pair, with the
//! inventory and store fields absent for books that are not stocked
//! anywhere.
//!
//! All types are read-only snapshots of database rows and round-trip
//! through [`serde`].

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A book, keyed by its ISBN-13.
///
/// # Examples
///
/// ```
/// use bookstore_core::Book;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let book = Book {
///     isbn13: "9780141182506".into(),
///     title: "The Stranger".into(),
///     language: "English".into(),
///     price: Decimal::new(1099, 2),
///     published: NaiveDate::from_ymd_opt(2000, 9, 28).unwrap(),
/// };
/// assert_eq!(book.price.to_string(), "10.99");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// 13-character identifier.
    pub isbn13: String,
    pub title: String,
    pub language: String,
    pub price: Decimal,
    /// Publication date.
    pub published: NaiveDate,
}

/// Stock of one book at one store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryEntry {
    pub isbn13: String,
    pub store_id: i64,
    /// Quantity on hand.
    pub quantity: u32,
}

/// A physical store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Store {
    pub id: i64,
    pub name: String,
}

/// One row of a title search.
///
/// The book columns are always present. `store_id` and `quantity` come from
/// the inventory relation and `store_name` from the store relation; each is
/// `None` when the corresponding left join found no match.
///
/// # Examples
///
/// ```
/// use bookstore_core::{Book, SearchResult};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let book = Book {
///     isbn13: "9780141182506".into(),
///     title: "The Stranger".into(),
///     language: "English".into(),
///     price: Decimal::new(1099, 2),
///     published: NaiveDate::from_ymd_opt(2000, 9, 28).unwrap(),
/// };
///
/// let unstocked = SearchResult::unstocked(book.clone());
/// assert!(!unstocked.is_stocked());
/// assert!(unstocked.store().is_none());
///
/// let stocked = SearchResult::stocked(book, 1, "Central", 3);
/// assert_eq!(stocked.inventory().unwrap().quantity, 3);
/// assert_eq!(stocked.store().unwrap().name, "Central");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub isbn13: String,
    pub title: String,
    pub language: String,
    pub price: Decimal,
    pub published: NaiveDate,
    pub store_id: Option<i64>,
    pub store_name: Option<String>,
    pub quantity: Option<u32>,
}

impl SearchResult {
    /// Row for a book with no inventory entries.
    pub fn unstocked(book: Book) -> Self {
        Self {
            isbn13: book.isbn13,
            title: book.title,
            language: book.language,
            price: book.price,
            published: book.published,
            store_id: None,
            store_name: None,
            quantity: None,
        }
    }

    /// Row for a book stocked at a named store.
    pub fn stocked(book: Book, store_id: i64, store_name: &str, quantity: u32) -> Self {
        Self {
            store_id: Some(store_id),
            store_name: Some(store_name.to_string()),
            quantity: Some(quantity),
            ..Self::unstocked(book)
        }
    }

    /// Returns the book columns of this row.
    pub fn book(&self) -> Book {
        Book {
            isbn13: self.isbn13.clone(),
            title: self.title.clone(),
            language: self.language.clone(),
            price: self.price,
            published: self.published,
        }
    }

    /// Returns the inventory entry, if the row carries one.
    pub fn inventory(&self) -> Option<InventoryEntry> {
        Some(InventoryEntry {
            isbn13: self.isbn13.clone(),
            store_id: self.store_id?,
            quantity: self.quantity?,
        })
    }

    /// Returns the store, if the inventory entry resolved to one.
    ///
    /// An inventory row pointing at a missing store yields `None` here while
    /// [`inventory`](Self::inventory) still returns the entry.
    pub fn store(&self) -> Option<Store> {
        Some(Store {
            id: self.store_id?,
            name: self.store_name.clone()?,
        })
    }

    /// Whether the left join to inventory matched.
    pub fn is_stocked(&self) -> bool {
        self.store_id.is_some()
    }
}

/// Outcome of a title search.
///
/// "No matches" is a successful outcome of its own rather than an empty
/// vector, so callers cannot confuse it with a failure or forget to report
/// it. A [`Matches`](SearchOutcome::Matches) value never holds an empty
/// vector when built through [`from_rows`](SearchOutcome::from_rows).
///
/// # Examples
///
/// ```
/// use bookstore_core::SearchOutcome;
///
/// let outcome = SearchOutcome::from_rows(Vec::new());
/// assert_eq!(outcome, SearchOutcome::NoMatches);
/// assert!(outcome.is_empty());
/// assert_eq!(outcome.len(), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "rows", rename_all = "snake_case")]
pub enum SearchOutcome {
    /// One or more rows, ordered by title.
    Matches(Vec<SearchResult>),
    /// The search ran and nothing matched.
    NoMatches,
}

impl SearchOutcome {
    /// Builds an outcome from collected rows.
    pub fn from_rows(rows: Vec<SearchResult>) -> Self {
        if rows.is_empty() {
            Self::NoMatches
        } else {
            Self::Matches(rows)
        }
    }

    /// Returns the matched rows (empty for [`NoMatches`](Self::NoMatches)).
    pub fn rows(&self) -> &[SearchResult] {
        match self {
            Self::Matches(rows) => rows,
            Self::NoMatches => &[],
        }
    }

    /// Consumes the outcome and returns the rows.
    pub fn into_rows(self) -> Vec<SearchResult> {
        match self {
            Self::Matches(rows) => rows,
            Self::NoMatches => Vec::new(),
        }
    }

    /// Number of result rows; zero for `NoMatches`.
    pub fn len(&self) -> usize {
        self.rows().len()
    }

    /// True when nothing matched.
    pub fn is_empty(&self) -> bool {
        self.rows().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stranger() -> Book {
        Book {
            isbn13: "9780141182506".to_string(),
            title: "The Stranger".to_string(),
            language: "English".to_string(),
            price: Decimal::new(1099, 2),
            published: NaiveDate::from_ymd_opt(2000, 9, 28).unwrap(),
        }
    }

    #[test]
    fn test_unstocked_row_has_no_store_fields() {
        let row = SearchResult::unstocked(stranger());
        assert_eq!(row.store_id, None);
        assert_eq!(row.store_name, None);
        assert_eq!(row.quantity, None);
        assert!(row.inventory().is_none());
        assert_eq!(row.book(), stranger());
    }

    #[test]
    fn test_dangling_store_keeps_inventory() {
        let mut row = SearchResult::stocked(stranger(), 7, "Gone", 2);
        row.store_name = None;
        assert!(row.is_stocked());
        assert!(row.store().is_none());
        assert_eq!(
            row.inventory(),
            Some(InventoryEntry {
                isbn13: "9780141182506".to_string(),
                store_id: 7,
                quantity: 2,
            })
        );
    }

    #[test]
    fn test_outcome_from_rows() {
        let rows = vec![SearchResult::unstocked(stranger())];
        let outcome = SearchOutcome::from_rows(rows.clone());
        assert_eq!(outcome, SearchOutcome::Matches(rows));
        assert_eq!(outcome.len(), 1);
        assert!(!outcome.is_empty());
    }

    #[test]
    fn test_outcome_serializes_with_status_tag() {
        let json = serde_json::to_value(SearchOutcome::NoMatches).unwrap();
        assert_eq!(json["status"], "no_matches");

        let outcome = SearchOutcome::from_rows(vec![SearchResult::stocked(stranger(), 1, "A", 3)]);
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "matches");
        assert_eq!(json["rows"][0]["price"], "10.99");
        assert_eq!(json["rows"][0]["published"], "2000-09-28");
        assert_eq!(json["rows"][0]["quantity"], 3);
    }
}
