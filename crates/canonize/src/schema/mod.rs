//! Canonical value types and the cleaned table.

mod table;
mod types;

pub use table::CleanTable;
pub use types::{DATE_FORMAT, EntityKind, Value};
