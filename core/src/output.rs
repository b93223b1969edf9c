//! Output formatting for search outcomes.
//!
//! Searching and presenting are separate steps: a search produces a
//! [`SearchOutcome`], and a [`Presenter`] renders it afterwards.

use std::io::{self, Write};

use serde::{Deserialize, Serialize};

use crate::types::{SearchOutcome, SearchResult};

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One line per row, `field: value` pairs separated by `|`.
    #[default]
    Table,
    Json,
    Yaml,
    Markdown,
}

/// Serializable envelope for machine-readable formats.
#[derive(Debug, Serialize)]
pub struct SearchReport<'a> {
    pub query: &'a str,
    pub total: usize,
    pub rows: &'a [SearchResult],
}

impl<'a> SearchReport<'a> {
    pub fn new(query: &'a str, outcome: &'a SearchOutcome) -> Self {
        Self {
            query,
            total: outcome.len(),
            rows: outcome.rows(),
        }
    }
}

/// Formats a search outcome in the requested output format.
///
/// # Examples
///
/// ```
/// use bookstore_core::{OutputFormat, SearchOutcome, format_outcome};
///
/// let text = format_outcome("Camus", &SearchOutcome::NoMatches, OutputFormat::Table).unwrap();
/// assert_eq!(text, "No books with a title matching 'Camus' were found.\n");
/// ```
pub fn format_outcome(
    query: &str,
    outcome: &SearchOutcome,
    format: OutputFormat,
) -> Result<String, String> {
    let report = SearchReport::new(query, outcome);
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(&report)
            .map(|mut s| {
                s.push('\n');
                s
            })
            .map_err(|e| format!("JSON serialization failed: {e}")),
        OutputFormat::Yaml => {
            serde_yaml::to_string(&report).map_err(|e| format!("YAML serialization failed: {e}"))
        }
        OutputFormat::Markdown => Ok(outcome_to_markdown(query, outcome)),
        OutputFormat::Table => Ok(outcome_to_table(query, outcome)),
    }
}

fn no_matches_line(query: &str) -> String {
    format!("No books with a title matching '{query}' were found.\n")
}

fn or_dash<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

fn outcome_to_table(query: &str, outcome: &SearchOutcome) -> String {
    let rows = match outcome {
        SearchOutcome::NoMatches => return no_matches_line(query),
        SearchOutcome::Matches(rows) => rows,
    };

    let mut out = String::new();
    for row in rows {
        out.push_str(&format!(
            "ISBN: {} | Title: {} | Language: {} | Price: {} | Published: {} | Store: {} (ID: {}) | Quantity: {}\n",
            row.isbn13,
            row.title,
            row.language,
            row.price,
            row.published,
            or_dash(row.store_name.as_deref()),
            or_dash(row.store_id),
            or_dash(row.quantity),
        ));
    }
    out
}

fn outcome_to_markdown(query: &str, outcome: &SearchOutcome) -> String {
    let mut out = format!("# Search results for `{query}`\n\n");

    let rows = match outcome {
        SearchOutcome::NoMatches => {
            out.push_str(&no_matches_line(query));
            return out;
        }
        SearchOutcome::Matches(rows) => rows,
    };

    out.push_str("| ISBN | Title | Language | Price | Published | Store | Quantity |\n");
    out.push_str("|------|-------|----------|-------|-----------|-------|----------|\n");
    for row in rows {
        let store = match (&row.store_name, row.store_id) {
            (Some(name), Some(id)) => format!("{} ({id})", escape_cell(name)),
            (None, Some(id)) => format!("? ({id})"),
            _ => "-".to_string(),
        };
        out.push_str(&format!(
            "| {} | {} | {} | {} | {} | {store} | {} |\n",
            row.isbn13,
            escape_cell(&row.title),
            escape_cell(&row.language),
            row.price,
            row.published,
            or_dash(row.quantity),
        ));
    }
    out.push_str(&format!("\n{} row(s)\n", rows.len()));
    out
}

fn escape_cell(raw: &str) -> String {
    raw.replace('|', "\\|")
}

/// Renders a finished search for the user.
pub trait Presenter {
    fn present(&mut self, query: &str, outcome: &SearchOutcome) -> io::Result<()>;
}

/// Presenter writing formatted output to any [`Write`] sink.
///
/// # Examples
///
/// ```
/// use bookstore_core::{OutputFormat, Presenter, SearchOutcome, WriterPresenter};
///
/// let mut presenter = WriterPresenter::new(Vec::new(), OutputFormat::Table);
/// presenter.present("Camus", &SearchOutcome::NoMatches).unwrap();
/// let text = String::from_utf8(presenter.into_inner()).unwrap();
/// assert!(text.starts_with("No books"));
/// ```
pub struct WriterPresenter<W: Write> {
    writer: W,
    format: OutputFormat,
}

impl<W: Write> WriterPresenter<W> {
    pub fn new(writer: W, format: OutputFormat) -> Self {
        Self { writer, format }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Presenter for WriterPresenter<W> {
    fn present(&mut self, query: &str, outcome: &SearchOutcome) -> io::Result<()> {
        let text = format_outcome(query, outcome, self.format).map_err(io::Error::other)?;
        self.writer.write_all(text.as_bytes())?;
        self.writer.flush()
    }
}
