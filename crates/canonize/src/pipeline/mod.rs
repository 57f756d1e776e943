//! Per-entity cleaning pipelines.
//!
//! Each entity is described once as an [`EntitySpec`] and run by the shared
//! [`CleaningEngine`]. The `clean_*` functions are convenience entry points
//! that pair a raw table with the right description.

mod engine;
mod entity;
mod report;
mod rules;

pub use engine::{CleanResult, CleaningEngine};
pub use entity::{ColumnRule, Derivation, EntitySpec, Requirement};
pub use report::{CleaningReport, ColumnChange, DistinctKeys};
pub use rules::{Rule, passthrough};

use crate::input::RawTable;
use crate::schema::EntityKind;

/// Clean any entity table.
pub fn clean(kind: EntityKind, raw: &RawTable) -> CleanResult {
    CleaningEngine::new().clean(EntitySpec::for_kind(kind), raw)
}

/// Clean the users table.
pub fn clean_user_data(raw: &RawTable) -> CleanResult {
    clean(EntityKind::User, raw)
}

/// Clean the card details table.
pub fn clean_card_data(raw: &RawTable) -> CleanResult {
    clean(EntityKind::Card, raw)
}

/// Clean the store details table.
pub fn clean_store_data(raw: &RawTable) -> CleanResult {
    clean(EntityKind::Store, raw)
}

/// Clean the products table.
pub fn clean_products_data(raw: &RawTable) -> CleanResult {
    clean(EntityKind::Product, raw)
}

/// Clean the orders table.
pub fn clean_orders_data(raw: &RawTable) -> CleanResult {
    clean(EntityKind::Order, raw)
}

/// Clean the date/time dimension table.
pub fn clean_date_times_data(raw: &RawTable) -> CleanResult {
    clean(EntityKind::DateTime, raw)
}
