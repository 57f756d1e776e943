//! Multi-format date normalization.
//!
//! Dates arrive in whatever shape the source system produced: ISO strings,
//! day-first European forms, spelled-out months in several orders. The
//! normalizer tries a fixed list of patterns in priority order and returns the
//! first one that yields a real calendar date.
//!
//! # Example
//!
//! ```
//! use canonize::normalize::convert_to_date;
//! use chrono::NaiveDate;
//!
//! assert_eq!(
//!     convert_to_date("15-Mar-2022"),
//!     NaiveDate::from_ymd_opt(2022, 3, 15)
//! );
//! assert_eq!(convert_to_date("not a date"), None);
//! ```

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::input::Cell;

/// Every pattern writes the year as four digits. `%Y` alone would also take
/// one to three.
static FOUR_DIGIT_YEAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|\D)\d{4}(?:\D|$)").unwrap());

/// A date pattern in the priority list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatePattern {
    /// `chrono` format string.
    pub format: &'static str,
    /// Human-readable shape.
    pub shape: &'static str,
}

/// Patterns in priority order. Earlier entries win when a value fits more
/// than one.
pub const DATE_PATTERNS: &[DatePattern] = &[
    DatePattern { format: "%Y/%m/%d", shape: "YYYY/MM/DD" },
    DatePattern { format: "%Y-%m-%d", shape: "YYYY-MM-DD" },
    DatePattern { format: "%d-%m-%Y", shape: "DD-MM-YYYY" },
    DatePattern { format: "%d/%m/%Y", shape: "DD/MM/YYYY" },
    DatePattern { format: "%B %Y %d", shape: "Month YYYY DD" },
    DatePattern { format: "%Y %B %d", shape: "YYYY Month DD" },
    DatePattern { format: "%d %B %Y", shape: "DD Month YYYY" },
    DatePattern { format: "%d %b %Y", shape: "DD Mon YYYY" },
    DatePattern { format: "%Y.%m.%d", shape: "YYYY.MM.DD" },
    DatePattern { format: "%d.%m.%Y", shape: "DD.MM.YYYY" },
    DatePattern { format: "%d-%b-%Y", shape: "DD-Mon-YYYY" },
];

/// Parse a raw date string using the first matching pattern.
pub fn convert_to_date(raw: &str) -> Option<NaiveDate> {
    match_date(raw).map(|(date, _)| date)
}

/// Parse a raw date string and report which pattern matched.
pub fn match_date(raw: &str) -> Option<(NaiveDate, &'static DatePattern)> {
    let trimmed = raw.trim();
    if !FOUR_DIGIT_YEAR.is_match(trimmed) {
        return None;
    }
    DATE_PATTERNS.iter().find_map(|pattern| {
        NaiveDate::parse_from_str(trimmed, pattern.format)
            .ok()
            .map(|date| (date, pattern))
    })
}

/// Parse a cell as a date via its text form.
pub fn date_from_cell(cell: &Cell) -> Option<NaiveDate> {
    cell.as_text().and_then(|text| convert_to_date(&text))
}
