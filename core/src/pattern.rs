//! `LIKE` patterns built from free-text search terms.
//!
//! The term is wrapped as `%term%` and passed to the database as a bound
//! parameter. Pattern characters typed by the user (`%` and `_`) are not
//! escaped, so they keep their wildcard meaning. [`SearchPattern::wildcards`]
//! reports them so callers can surface the behavior.

/// Characters with special meaning inside a `LIKE` pattern.
pub const LIKE_WILDCARDS: [char; 2] = ['%', '_'];

/// A substring pattern for a title search.
///
/// # Examples
///
/// ```
/// use bookstore_core::SearchPattern;
///
/// let pattern = SearchPattern::contains("Stranger");
/// assert_eq!(pattern.as_str(), "%Stranger%");
/// assert!(!pattern.has_wildcards());
///
/// let pattern = SearchPattern::contains("100%_pure");
/// assert_eq!(pattern.as_str(), "%100%_pure%");
/// assert_eq!(pattern.wildcards(), vec!['%', '_']);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPattern {
    term: String,
    pattern: String,
}

impl SearchPattern {
    /// Builds a pattern matching any title containing `term`.
    pub fn contains(term: &str) -> Self {
        Self {
            term: term.to_string(),
            pattern: format!("%{term}%"),
        }
    }

    /// The raw search term.
    pub fn term(&self) -> &str {
        &self.term
    }

    /// The pattern to bind.
    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// Wildcard characters present in the raw term, in order of appearance.
    pub fn wildcards(&self) -> Vec<char> {
        self.term
            .chars()
            .filter(|c| LIKE_WILDCARDS.contains(c))
            .collect()
    }

    pub fn has_wildcards(&self) -> bool {
        self.term.contains(LIKE_WILDCARDS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_term_matches_everything() {
        let pattern = SearchPattern::contains("");
        assert_eq!(pattern.as_str(), "%%");
        assert_eq!(pattern.term(), "");
        assert!(!pattern.has_wildcards());
    }

    #[test]
    fn test_sql_metacharacters_are_kept_verbatim() {
        let pattern = SearchPattern::contains("' OR '1'='1");
        assert_eq!(pattern.as_str(), "%' OR '1'='1%");
        assert!(!pattern.has_wildcards());
    }

    #[test]
    fn test_wildcards_are_reported_not_escaped() {
        let pattern = SearchPattern::contains("a_b");
        assert_eq!(pattern.as_str(), "%a_b%");
        assert!(pattern.has_wildcards());
        assert_eq!(pattern.wildcards(), vec!['_']);
    }
}
