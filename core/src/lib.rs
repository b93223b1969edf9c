//! Core types for bookstore title search.
//!
//! This crate defines the data shared by the storage backend and the
//! command-line front-end:
//!
//! - [`Book`], [`InventoryEntry`], [`Store`] — the three relations a search
//!   reads.
//! - [`SearchResult`] — one denormalized result row, with the left-joined
//!   inventory and store fields optional.
//! - [`SearchOutcome`] — either ordered matches or an explicit "no matches".
//! - [`SearchPattern`] — the `%term%` pattern bound to the query.
//!
//! Presentation ([`format_outcome`], [`Presenter`]) renders an outcome after
//! the search has finished. Identifier checks live in [`validate_isbn13`].
//!
//! # Example
//!
//! ```
//! use bookstore_core::*;
//! use chrono::NaiveDate;
//! use rust_decimal::Decimal;
//!
//! let book = Book {
//!     isbn13: "9780141182506".into(),
//!     title: "The Stranger".into(),
//!     language: "English".into(),
//!     price: Decimal::new(1099, 2),
//!     published: NaiveDate::from_ymd_opt(2000, 9, 28).unwrap(),
//! };
//! assert!(validate_isbn13(&book.isbn13).is_ok());
//!
//! let outcome = SearchOutcome::from_rows(vec![SearchResult::unstocked(book)]);
//! let text = format_outcome("Stranger", &outcome, OutputFormat::Table).unwrap();
//! assert!(text.contains("Title: The Stranger"));
//! ```

mod output;
mod pattern;
mod types;
mod validate;

pub use output::{OutputFormat, Presenter, SearchReport, WriterPresenter, format_outcome};
pub use pattern::{LIKE_WILDCARDS, SearchPattern};
pub use types::*;
pub use validate::{ISBN13_LEN, ValidationError, validate_isbn13};
