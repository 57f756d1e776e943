//! Column rules: the typed conversion applied to one raw cell.

use serde::Serialize;

use crate::input::Cell;
use crate::normalize::{
    clean_card_number, clean_expiry_date, clean_uuid, date_from_cell, parse_bool, parse_float,
    parse_int, parse_price, weight_from_cell,
};
use crate::schema::Value;

/// Source text that marks a product as still on sale.
const STILL_AVAILABLE: &str = "still_available";

/// Source text that marks a product as withdrawn.
const REMOVED: &str = "removed";

/// A conversion from a raw cell to a canonical value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    /// Text rendering of the cell.
    Text,
    /// 36-character identifier.
    Uuid,
    /// Calendar date from any supported pattern.
    Date,
    /// Finite float.
    Float,
    /// Integer.
    Int,
    /// Card number of at most 16 digits.
    CardNumber,
    /// 5-character expiry token with a `/`.
    ExpiryDate,
    /// Float with any currency prefix stripped.
    Price,
    /// Quantity text converted to kilograms.
    Weight,
    /// `still_available` / `removed` flag as a boolean.
    Availability,
    /// `true` / `false` text as a boolean.
    Boolean,
}

impl Rule {
    /// Apply the rule. Anything that fails to convert becomes [`Value::Null`].
    pub fn apply(&self, cell: &Cell) -> Value {
        if cell.is_missing() {
            return Value::Null;
        }
        let value = match self {
            Rule::Text => cell.as_text().map(|s| Value::Text(s.into_owned())),
            Rule::Uuid => clean_uuid(cell).map(Value::Text),
            Rule::Date => date_from_cell(cell).map(Value::Date),
            Rule::Float => parse_float(cell).map(Value::float),
            Rule::Int => parse_int(cell).map(Value::Int),
            Rule::CardNumber => clean_card_number(cell).map(Value::Text),
            Rule::ExpiryDate => clean_expiry_date(cell).map(Value::Text),
            Rule::Price => parse_price(cell).map(Value::float),
            Rule::Weight => weight_from_cell(cell).map(Value::float),
            Rule::Availability => availability(cell).map(Value::Bool),
            Rule::Boolean => parse_bool(cell).map(Value::Bool),
        };
        value.unwrap_or(Value::Null)
    }

    /// Short name used in reports and listings.
    pub fn label(&self) -> &'static str {
        match self {
            Rule::Text => "text",
            Rule::Uuid => "uuid",
            Rule::Date => "date",
            Rule::Float => "float",
            Rule::Int => "int",
            Rule::CardNumber => "card_number",
            Rule::ExpiryDate => "expiry_date",
            Rule::Price => "price",
            Rule::Weight => "weight_kg",
            Rule::Availability => "availability",
            Rule::Boolean => "boolean",
        }
    }
}

/// Map a raw cell with no rule onto the closest canonical value.
pub fn passthrough(cell: &Cell) -> Value {
    if cell.is_missing() {
        return Value::Null;
    }
    match cell {
        Cell::Missing => Value::Null,
        Cell::Integer(i) => Value::Int(*i),
        Cell::Float(f) => Value::float(*f),
        Cell::Text(s) => Value::Text(s.clone()),
    }
}

fn availability(cell: &Cell) -> Option<bool> {
    let text = cell.as_text()?;
    if text.eq_ignore_ascii_case(STILL_AVAILABLE) {
        Some(true)
    } else if text.eq_ignore_ascii_case(REMOVED) {
        Some(false)
    } else {
        None
    }
}
