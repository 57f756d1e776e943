//! Primitive coercibility checks for raw cells.
//!
//! Every function here is total: a value that cannot be converted yields
//! `false` or `None`, never an error.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::input::Cell;

static STRICT_DATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());

/// Largest magnitude at which every whole `f64` is an exact integer.
const EXACT_FLOAT_LIMIT: f64 = 9_007_199_254_740_992.0;

/// Whether the cell converts to a finite float.
pub fn is_valid_float(cell: &Cell) -> bool {
    parse_float(cell).is_some()
}

/// Whether the cell converts to an integer.
pub fn is_valid_int(cell: &Cell) -> bool {
    parse_int(cell).is_some()
}

/// Whether the cell is text in strict `YYYY-MM-DD` form naming a real date.
pub fn is_valid_date(cell: &Cell) -> bool {
    match cell {
        Cell::Text(s) => parse_strict_date(s).is_some(),
        Cell::Missing | Cell::Integer(_) | Cell::Float(_) => false,
    }
}

/// Parse `YYYY-MM-DD` exactly (zero-padded, no surrounding text).
pub fn parse_strict_date(value: &str) -> Option<NaiveDate> {
    if !STRICT_DATE.is_match(value) {
        return None;
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// Convert a cell to a finite float.
pub fn parse_float(cell: &Cell) -> Option<f64> {
    let value = match cell {
        Cell::Missing => return None,
        Cell::Integer(i) => *i as f64,
        Cell::Float(f) => *f,
        Cell::Text(s) => s.trim().parse::<f64>().ok()?,
    };
    value.is_finite().then_some(value)
}

/// Convert a cell to an integer. Floats qualify only when whole.
pub fn parse_int(cell: &Cell) -> Option<i64> {
    match cell {
        Cell::Missing => None,
        Cell::Integer(i) => Some(*i),
        Cell::Float(f) => whole_float(*f),
        Cell::Text(s) => s.trim().parse::<i64>().ok(),
    }
}

/// Parse a `true`/`false` text cell (case-insensitive).
pub fn parse_bool(cell: &Cell) -> Option<bool> {
    let text = cell.as_text()?;
    let trimmed = text.trim();
    if trimmed.eq_ignore_ascii_case("true") {
        Some(true)
    } else if trimmed.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// An integral float within the exactly representable range, as `i64`.
pub(crate) fn whole_float(value: f64) -> Option<i64> {
    (value.is_finite() && value.fract() == 0.0 && value.abs() < EXACT_FLOAT_LIMIT)
        .then_some(value as i64)
}
