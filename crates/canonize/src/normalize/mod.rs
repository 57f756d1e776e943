//! Per-field parsers and validators.
//!
//! Every function in this module is pure and total. Conversion failures are
//! reported as `false` or `None` and become nulls in the cleaned table.

mod date;
mod fields;
mod identifier;
mod price;
mod weight;

pub use date::{DATE_PATTERNS, DatePattern, convert_to_date, date_from_cell, match_date};
pub use fields::{
    is_valid_date, is_valid_float, is_valid_int, parse_bool, parse_float, parse_int,
    parse_strict_date,
};
pub use identifier::{
    EXPIRY_LENGTH, MAX_CARD_DIGITS, UUID_LENGTH, clean_card_number, clean_expiry_date, clean_uuid,
};
pub use price::parse_price;
pub use weight::{Quantity, WeightUnit, parse_quantity, to_kilograms, weight_from_cell};
