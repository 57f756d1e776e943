//! Cleaned table representation.

use serde::Serialize;

use super::types::Value;
use crate::input::RawTable;

/// A canonical, typed table produced by one cleaner call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleanTable {
    /// Column headers in output order.
    pub headers: Vec<String>,
    /// Typed row data (row-major order).
    pub rows: Vec<Vec<Value>>,
}

impl CleanTable {
    /// Create a new clean table.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self { headers, rows }
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Get all values for a column by index.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &Value> {
        self.rows.iter().filter_map(move |row| row.get(index))
    }

    /// Get a column by name.
    pub fn column_by_name(&self, name: &str) -> Option<Vec<&Value>> {
        let index = self.column_index(name)?;
        Some(self.column_values(index).collect())
    }

    /// Get a specific value.
    pub fn get(&self, row: usize, col: usize) -> Option<&Value> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Get a value by row index and column name.
    pub fn value(&self, row: usize, column: &str) -> Option<&Value> {
        let col = self.column_index(column)?;
        self.get(row, col)
    }

    /// Render the table back into raw cells.
    ///
    /// Dates become `YYYY-MM-DD` text and booleans `true`/`false` text, so
    /// the result can be fed through the same cleaner again.
    pub fn to_raw(&self) -> RawTable {
        RawTable::new(
            self.headers.clone(),
            self.rows
                .iter()
                .map(|row| row.iter().map(Value::to_cell).collect())
                .collect(),
        )
    }
}
