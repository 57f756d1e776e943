//! Free-text quantity to kilogram conversion.
//!
//! Product weights come in as text such as `"1.6kg"`, `"500 g"`, `"12 x 100g"`
//! or `"1L"`. The text is compacted (lower-case, no whitespace, trailing full
//! stops dropped) and split by a grammar anchored at the end of the string
//! into a magnitude and an optional unit symbol. The unit symbol is looked up
//! in [`WeightUnit::ALL`] rather than found by substring search, so `"kg"` can
//! never be mistaken for `"g"`. The magnitude keeps only its digits and `.`,
//! so `"12 x 100g"` reads as 12100 grams.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::input::Cell;

static QUANTITY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<magnitude>.*?)(?P<unit>[a-z]*)$").unwrap());

/// A recognised unit symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeightUnit {
    Kilogram,
    Gram,
    Millilitre,
    Litre,
    Ounce,
}

impl WeightUnit {
    /// Every unit, used for symbol lookup.
    pub const ALL: [WeightUnit; 5] = [
        WeightUnit::Kilogram,
        WeightUnit::Gram,
        WeightUnit::Millilitre,
        WeightUnit::Litre,
        WeightUnit::Ounce,
    ];

    /// The lower-case symbol this unit is written with.
    pub fn symbol(&self) -> &'static str {
        match self {
            WeightUnit::Kilogram => "kg",
            WeightUnit::Gram => "g",
            WeightUnit::Millilitre => "ml",
            WeightUnit::Litre => "l",
            WeightUnit::Ounce => "oz",
        }
    }

    /// Look up a unit by its exact symbol.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|u| u.symbol() == symbol)
    }

    /// Convert an amount in this unit to kilograms.
    ///
    /// Millilitres assume the density of water. Litres are passed through
    /// unscaled, which matches the values already loaded downstream.
    pub fn to_kilograms(&self, amount: f64) -> f64 {
        match self {
            WeightUnit::Kilogram | WeightUnit::Litre => amount,
            WeightUnit::Gram | WeightUnit::Millilitre => amount / 1000.0,
            WeightUnit::Ounce => amount * 0.028_349_523_125,
        }
    }
}

/// A parsed quantity such as `500g`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quantity {
    /// Magnitude in the stated unit.
    pub magnitude: f64,
    /// Unit symbol, `None` for a bare number.
    pub unit: Option<WeightUnit>,
}

impl Quantity {
    /// Weight in kilograms. Bare numbers are taken as kilograms.
    pub fn kilograms(&self) -> f64 {
        match self.unit {
            Some(unit) => unit.to_kilograms(self.magnitude),
            None => self.magnitude,
        }
    }
}

/// Parse quantity text against the anchored grammar.
///
/// Returns `None` when the trailing letters are not a known unit (`"5lb"`,
/// `"1.5kg pack"`) or when letters other than an `x` separator appear before
/// the unit (`"9GO7KH4A"`).
pub fn parse_quantity(raw: &str) -> Option<Quantity> {
    let compact = compact(raw);
    let caps = QUANTITY.captures(&compact)?;

    let body = &caps["magnitude"];
    if body.chars().any(|c| c.is_alphabetic() && c != 'x') {
        return None;
    }
    let digits: String = body
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    let magnitude = digits.parse::<f64>().ok()?;

    let unit = match &caps["unit"] {
        "" => None,
        symbol => Some(WeightUnit::from_symbol(symbol)?),
    };

    Some(Quantity { magnitude, unit })
}

/// Convert free-text quantity to kilograms. Anything unparseable yields `None`.
pub fn to_kilograms(raw: &str) -> Option<f64> {
    let kg = parse_quantity(raw)?.kilograms();
    kg.is_finite().then_some(kg)
}

/// Convert a cell to kilograms; numeric cells are already kilograms.
pub fn weight_from_cell(cell: &Cell) -> Option<f64> {
    match cell {
        Cell::Missing => None,
        Cell::Integer(i) => Some(*i as f64),
        Cell::Float(f) => f.is_finite().then_some(*f),
        Cell::Text(s) => to_kilograms(s),
    }
}

fn compact(raw: &str) -> String {
    let lowered: String = raw
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect();
    lowered.trim_end_matches('.').to_string()
}
