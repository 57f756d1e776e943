//! Currency-prefixed price parsing.

use super::fields::parse_float;
use crate::input::Cell;

/// Strip a leading currency symbol (e.g. `£`, `$`, `€`, `GBP `) and parse the
/// remainder as a float.
pub fn parse_price(cell: &Cell) -> Option<f64> {
    match cell {
        Cell::Text(s) => {
            let amount = s
                .trim()
                .trim_start_matches(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-'));
            parse_float(&Cell::Text(amount.to_string()))
        }
        other => parse_float(other),
    }
}
