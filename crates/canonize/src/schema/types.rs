//! Typed canonical values and entity kinds.

use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::CanonizeError;
use crate::input::Cell;

/// Canonical date rendering used for output and round trips.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A typed value in a cleaned table.
///
/// Floats compare and hash by bit pattern (with `-0.0` folded into `0.0`) so
/// rows can be deduplicated with a hash set.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    #[serde(serialize_with = "serialize_date")]
    Date(NaiveDate),
    Text(String),
}

fn serialize_date<S: serde::Serializer>(date: &NaiveDate, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(&date.format(DATE_FORMAT))
}

impl Value {
    /// Wrap a float, mapping non-finite values to [`Value::Null`].
    pub fn float(value: f64) -> Self {
        if value.is_finite() {
            Value::Float(value)
        } else {
            Value::Null
        }
    }

    /// Whether this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Numeric view of the value.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Text view of the value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Date view of the value.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// Boolean view of the value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Convert back into a raw cell, the inverse of cleaning.
    pub fn to_cell(&self) -> Cell {
        match self {
            Value::Null => Cell::Missing,
            Value::Int(i) => Cell::Integer(*i),
            Value::Float(f) => Cell::Float(*f),
            Value::Text(s) => Cell::Text(s.clone()),
            other => Cell::Text(other.to_string()),
        }
    }

    fn float_key(f: f64) -> u64 {
        if f == 0.0 { 0 } else { f.to_bits() }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => Value::float_key(*a) == Value::float_key(*b),
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Null => {}
            Value::Bool(b) => b.hash(state),
            Value::Int(i) => i.hash(state),
            Value::Float(f) => Value::float_key(*f).hash(state),
            Value::Date(d) => d.hash(state),
            Value::Text(s) => s.hash(state),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Date(d) => write!(f, "{}", d.format(DATE_FORMAT)),
            Value::Text(s) => f.write_str(s),
        }
    }
}

/// The entity tables the engine knows how to clean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    User,
    Card,
    Store,
    Product,
    Order,
    DateTime,
}

impl EntityKind {
    /// All entity kinds in pipeline order.
    pub const ALL: [EntityKind; 6] = [
        EntityKind::User,
        EntityKind::Card,
        EntityKind::Store,
        EntityKind::Product,
        EntityKind::Order,
        EntityKind::DateTime,
    ];

    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::User => "User",
            EntityKind::Card => "Card",
            EntityKind::Store => "Store",
            EntityKind::Product => "Product",
            EntityKind::Order => "Order",
            EntityKind::DateTime => "Date/Time",
        }
    }

    /// Conventional destination table for the cleaned output.
    pub fn table_name(&self) -> &'static str {
        match self {
            EntityKind::User => "dim_users",
            EntityKind::Card => "dim_card_details",
            EntityKind::Store => "dim_store_details",
            EntityKind::Product => "dim_products",
            EntityKind::Order => "orders_table",
            EntityKind::DateTime => "dim_date_times",
        }
    }
}

impl std::str::FromStr for EntityKind {
    type Err = CanonizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "user" | "users" | "dim_users" => Ok(EntityKind::User),
            "card" | "cards" | "card_details" | "dim_card_details" => Ok(EntityKind::Card),
            "store" | "stores" | "store_details" | "dim_store_details" => Ok(EntityKind::Store),
            "product" | "products" | "dim_products" => Ok(EntityKind::Product),
            "order" | "orders" | "orders_table" => Ok(EntityKind::Order),
            "date_time" | "date_times" | "datetime" | "date_details" | "dim_date_times" => {
                Ok(EntityKind::DateTime)
            }
            _ => Err(CanonizeError::UnknownEntity(s.to_string())),
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::User => write!(f, "user"),
            EntityKind::Card => write!(f, "card"),
            EntityKind::Store => write!(f, "store"),
            EntityKind::Product => write!(f, "product"),
            EntityKind::Order => write!(f, "order"),
            EntityKind::DateTime => write!(f, "date_time"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_float_constructor_rejects_non_finite() {
        assert_eq!(Value::float(f64::NAN), Value::Null);
        assert_eq!(Value::float(f64::INFINITY), Value::Null);
        assert_eq!(Value::float(1.5), Value::Float(1.5));
    }

    #[test]
    fn test_signed_zero_hashes_equal() {
        let mut set = HashSet::new();
        set.insert(Value::Float(0.0));
        assert!(set.contains(&Value::Float(-0.0)));
    }

    #[test]
    fn test_to_cell_renders_dates() {
        let date = NaiveDate::from_ymd_opt(2023, 2, 15).unwrap();
        assert_eq!(Value::Date(date).to_cell(), Cell::Text("2023-02-15".to_string()));
        assert_eq!(Value::Bool(false).to_cell(), Cell::Text("false".to_string()));
        assert_eq!(Value::Null.to_cell(), Cell::Missing);
    }

    #[test]
    fn test_serialize_untagged() {
        let date = NaiveDate::from_ymd_opt(2001, 9, 11).unwrap();
        let json = serde_json::to_string(&vec![
            Value::Null,
            Value::Int(3),
            Value::Date(date),
            Value::Text("x".into()),
        ])
        .unwrap();
        assert_eq!(json, r#"[null,3,"2001-09-11","x"]"#);
    }

    #[test]
    fn test_entity_kind_from_str() {
        assert_eq!("orders_table".parse::<EntityKind>().unwrap(), EntityKind::Order);
        assert_eq!("date-times".parse::<EntityKind>().unwrap(), EntityKind::DateTime);
        assert_eq!("Card".parse::<EntityKind>().unwrap(), EntityKind::Card);
        assert!("invoice".parse::<EntityKind>().is_err());
    }

    #[test]
    fn test_entity_kind_display_round_trips() {
        for kind in EntityKind::ALL {
            assert_eq!(kind.to_string().parse::<EntityKind>().unwrap(), kind);
        }
    }
}
