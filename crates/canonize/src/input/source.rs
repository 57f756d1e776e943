//! Raw table model and source metadata.

use std::borrow::Cow;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Literal text the extraction sources use for a missing value.
pub const NULL_TEXT: &str = "NULL";

/// Tokens read as missing when no parser configuration says otherwise.
pub const DEFAULT_NULL_TOKENS: &[&str] = &["", NULL_TEXT];

/// Metadata about the source data file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// File name without path.
    pub file: String,
    /// Full path to the file.
    pub path: PathBuf,
    /// SHA-256 hash of the file contents.
    pub hash: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Detected format (csv, tsv, json, etc.).
    pub format: String,
    /// Number of data rows (excluding header).
    pub row_count: usize,
    /// Number of columns.
    pub column_count: usize,
    /// When the file was loaded.
    pub loaded_at: DateTime<Utc>,
}

impl SourceMetadata {
    /// Create metadata for a file that has been loaded.
    pub fn new(
        path: PathBuf,
        hash: String,
        size_bytes: u64,
        format: String,
        row_count: usize,
        column_count: usize,
    ) -> Self {
        let file = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            file,
            path,
            hash,
            size_bytes,
            format,
            row_count,
            column_count,
            loaded_at: Utc::now(),
        }
    }
}

/// A single untyped cell as delivered by an extraction source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    /// True missing marker or a configured null token such as `"NULL"`.
    Missing,
    /// Integral number.
    Integer(i64),
    /// Floating-point number.
    Float(f64),
    /// Free text.
    Text(String),
}

impl Cell {
    /// Build a text cell, mapping configured null tokens to [`Cell::Missing`].
    pub fn from_text<S: AsRef<str>>(value: &str, null_tokens: &[S]) -> Self {
        if null_tokens.iter().any(|t| t.as_ref() == value) {
            Cell::Missing
        } else {
            Cell::Text(value.to_string())
        }
    }

    /// Build a cell from a decoded JSON value.
    pub fn from_json<S: AsRef<str>>(value: &serde_json::Value, null_tokens: &[S]) -> Self {
        match value {
            serde_json::Value::Null => Cell::Missing,
            serde_json::Value::String(s) => Cell::from_text(s, null_tokens),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Cell::Integer(i),
                None => n.as_f64().map(Cell::Float).unwrap_or(Cell::Missing),
            },
            serde_json::Value::Bool(b) => Cell::Text(b.to_string()),
            other => Cell::Text(other.to_string()),
        }
    }

    /// Whether this cell carries no value. A text cell holding the literal
    /// `"NULL"` counts as missing even if it bypassed the null tokens.
    pub fn is_missing(&self) -> bool {
        match self {
            Cell::Missing => true,
            Cell::Text(s) => s == NULL_TEXT,
            Cell::Integer(_) | Cell::Float(_) => false,
        }
    }

    /// Text rendering of the cell; `None` for missing cells.
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Cell::Missing => None,
            Cell::Text(s) if s == NULL_TEXT => None,
            Cell::Text(s) => Some(Cow::Borrowed(s.as_str())),
            Cell::Integer(i) => Some(Cow::Owned(i.to_string())),
            Cell::Float(f) => Some(Cow::Owned(f.to_string())),
        }
    }

    /// Coerce the cell to its text form, keeping missing cells missing.
    pub fn to_text_cell(&self) -> Cell {
        match self {
            Cell::Text(_) if !self.is_missing() => self.clone(),
            other => other
                .as_text()
                .map(|s| Cell::Text(s.into_owned()))
                .unwrap_or(Cell::Missing),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::from_text(value, DEFAULT_NULL_TOKENS)
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::from_text(&value, DEFAULT_NULL_TOKENS)
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Integer(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Float(value)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Cell::Missing)
    }
}

/// Represents an extracted table before cleaning.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    /// Column headers.
    pub headers: Vec<String>,
    /// Row data (row-major order).
    pub rows: Vec<Vec<Cell>>,
}

impl RawTable {
    /// Create a new raw table. Short rows are padded with missing cells and
    /// long rows truncated to the header width.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, Cell::Missing);
                row
            })
            .collect();
        Self { headers, rows }
    }

    /// Build a table from string literals using the default null tokens.
    pub fn from_strings(headers: &[&str], rows: &[&[&str]]) -> Self {
        Self::new(
            headers.iter().map(|h| h.to_string()).collect(),
            rows.iter()
                .map(|row| row.iter().map(|v| Cell::from(*v)).collect())
                .collect(),
        )
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Get the number of rows (excluding header).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Position of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Get all values for a column by index.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &Cell> {
        self.rows.iter().filter_map(move |row| row.get(index))
    }

    /// Get a column by name.
    pub fn column_by_name(&self, name: &str) -> Option<Vec<&Cell>> {
        let index = self.column_index(name)?;
        Some(self.column_values(index).collect())
    }

    /// Get a specific cell.
    pub fn get(&self, row: usize, col: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.get(col))
    }
}
