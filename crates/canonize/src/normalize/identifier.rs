//! Shape checks for identifiers: UUIDs, card numbers and expiry dates.
//!
//! These confirm structure only. A 36-character string passes the UUID check
//! whether or not its hex digits and hyphens are in the right places, and an
//! expiry of `"13/99"` passes because no calendar validation is done.

use super::fields::whole_float;
use crate::input::Cell;

/// Length of a canonical hyphenated UUID.
pub const UUID_LENGTH: usize = 36;

/// Maximum number of digits in a card number.
pub const MAX_CARD_DIGITS: usize = 16;

/// Length of an `MM/YY` expiry token.
pub const EXPIRY_LENGTH: usize = 5;

/// Accept a text cell of exactly 36 characters.
pub fn clean_uuid(cell: &Cell) -> Option<String> {
    match cell {
        Cell::Text(s) if s.chars().count() == UUID_LENGTH => Some(s.clone()),
        Cell::Text(_) | Cell::Missing | Cell::Integer(_) | Cell::Float(_) => None,
    }
}

/// Coerce a cell to an integer and accept its decimal form when it has at
/// most 16 digits. Negative numbers are rejected.
pub fn clean_card_number(cell: &Cell) -> Option<String> {
    let number = match cell {
        Cell::Missing => return None,
        Cell::Integer(i) => *i,
        Cell::Float(f) => whole_float(*f)?,
        Cell::Text(s) => {
            let trimmed = s.trim();
            match trimmed.parse::<i64>() {
                Ok(i) => i,
                Err(_) => trimmed.parse::<f64>().ok().and_then(whole_float)?,
            }
        }
    };

    if number < 0 {
        return None;
    }
    let digits = number.to_string();
    (digits.len() <= MAX_CARD_DIGITS).then_some(digits)
}

/// Accept a 5-character text cell containing a `/` separator.
pub fn clean_expiry_date(cell: &Cell) -> Option<String> {
    match cell {
        Cell::Text(s) if s.chars().count() == EXPIRY_LENGTH && s.contains('/') => Some(s.clone()),
        Cell::Text(_) | Cell::Missing | Cell::Integer(_) | Cell::Float(_) => None,
    }
}
