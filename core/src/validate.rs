//! Identifier validation.
//!
//! Checks ISBN-13 identifiers for length, digit content and check digit.
//!
//! # Examples
//!
//! ```
//! use bookstore_core::{ValidationError, validate_isbn13};
//!
//! assert!(validate_isbn13("9780141182506").is_ok());
//! assert_eq!(
//!     validate_isbn13("9780141182507"),
//!     Err(ValidationError::BadCheckDigit { expected: 6, found: 7 })
//! );
//! ```

use thiserror::Error;

/// Number of characters in an ISBN-13.
pub const ISBN13_LEN: usize = 13;

/// ISBN-13 validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Identifier does not have exactly 13 characters.
    #[error("ISBN-13 must have 13 characters, found {0}")]
    BadLength(usize),
    /// Identifier contains something other than ASCII digits.
    #[error("ISBN-13 must contain only digits: {0}")]
    NonDigit(String),
    /// Weighted digit sum is not a multiple of 10.
    #[error("ISBN-13 check digit mismatch: expected {expected}, found {found}")]
    BadCheckDigit { expected: u32, found: u32 },
}

/// Validates an ISBN-13 identifier.
///
/// Digits are weighted 1 and 3 alternately from the left; the check digit
/// makes the weighted sum a multiple of 10.
pub fn validate_isbn13(isbn: &str) -> Result<(), ValidationError> {
    let len = isbn.chars().count();
    if len != ISBN13_LEN {
        return Err(ValidationError::BadLength(len));
    }

    let digits: Vec<u32> = isbn
        .chars()
        .map(|c| c.to_digit(10))
        .collect::<Option<_>>()
        .ok_or_else(|| ValidationError::NonDigit(isbn.to_string()))?;

    let sum: u32 = digits[..ISBN13_LEN - 1]
        .iter()
        .enumerate()
        .map(|(i, d)| if i % 2 == 0 { *d } else { d * 3 })
        .sum();
    let expected = (10 - sum % 10) % 10;
    let found = digits[ISBN13_LEN - 1];

    if expected != found {
        return Err(ValidationError::BadCheckDigit { expected, found });
    }
    Ok(())
}
