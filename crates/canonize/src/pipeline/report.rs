//! Cleaning report returned alongside every cleaned table.

use indexmap::IndexMap;
use serde::Serialize;

use super::rules::Rule;
use crate::schema::EntityKind;

/// What happened to one output column.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ColumnChange {
    /// Rule applied to the column, `None` for pass-through columns.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule: Option<Rule>,
    /// Present values that failed conversion and became null.
    pub values_nulled: usize,
    /// Nulls in the column after conversion, before row filtering.
    pub null_count: usize,
}

/// Distinct-value counts for the entity's key column.
#[derive(Debug, Clone, Serialize)]
pub struct DistinctKeys {
    /// Column counted.
    pub column: String,
    /// Distinct non-missing values in the raw table.
    pub before: usize,
    /// Distinct non-null values in the cleaned table.
    pub after: usize,
}

/// Row and column accounting for one cleaner call.
#[derive(Debug, Clone, Serialize)]
pub struct CleaningReport {
    /// Entity that was cleaned.
    pub entity: EntityKind,
    /// Rows in the raw table.
    pub rows_in: usize,
    /// Rows in the cleaned table.
    pub rows_out: usize,
    /// Rows removed because a required field was null.
    pub dropped_missing_required: usize,
    /// Rows removed as exact duplicates.
    pub dropped_duplicates: usize,
    /// Columns removed from the output.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub dropped_columns: Vec<String>,
    /// Columns named by a rule or requirement but absent from the input.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub absent_columns: Vec<String>,
    /// Per-column conversion counts, in output order.
    pub columns: IndexMap<String, ColumnChange>,
    /// Key column distinct counts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distinct_keys: Option<DistinctKeys>,
}

impl CleaningReport {
    /// Create an empty report.
    pub fn new(entity: EntityKind, rows_in: usize) -> Self {
        Self {
            entity,
            rows_in,
            rows_out: 0,
            dropped_missing_required: 0,
            dropped_duplicates: 0,
            dropped_columns: Vec::new(),
            absent_columns: Vec::new(),
            columns: IndexMap::new(),
            distinct_keys: None,
        }
    }

    /// Total rows removed.
    pub fn rows_dropped(&self) -> usize {
        self.dropped_missing_required + self.dropped_duplicates
    }

    /// Total values nulled by failed conversions.
    pub fn values_nulled(&self) -> usize {
        self.columns.values().map(|c| c.values_nulled).sum()
    }

    /// Fraction of raw rows kept (1.0 for an empty input).
    pub fn retention(&self) -> f64 {
        if self.rows_in == 0 {
            1.0
        } else {
            self.rows_out as f64 / self.rows_in as f64
        }
    }

    /// One-line summary.
    pub fn summary(&self) -> String {
        format!(
            "{}: {} → {} rows ({} missing required, {} duplicates, {} values nulled)",
            self.entity.label(),
            self.rows_in,
            self.rows_out,
            self.dropped_missing_required,
            self.dropped_duplicates,
            self.values_nulled()
        )
    }
}
