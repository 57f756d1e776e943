//! Canonize: normalization and validation engine for extracted business tables.
//!
//! Canonize turns loosely typed, inconsistently formatted records (users,
//! payment cards, stores, products, orders and date/time dimensions) into
//! canonical, typed, deduplicated tables ready for a replace-whole-table load.
//!
//! # Core Principles
//!
//! - **Total conversions**: a value that cannot be converted becomes null,
//!   never an error
//! - **Declarative pipelines**: each entity is a list of column rules run by one
//!   engine
//! - **Idempotent**: cleaning an already-clean table changes nothing
//!
//! # Example
//!
//! ```no_run
//! use canonize::{Canonizer, EntityKind};
//!
//! let canonizer = Canonizer::new();
//! let outcome = canonizer.clean_file(EntityKind::Card, "card_details.csv").unwrap();
//!
//! println!("{}", outcome.report.summary());
//! ```

pub mod error;
pub mod input;
pub mod normalize;
pub mod output;
pub mod pipeline;
pub mod schema;

mod canonizer;

pub use crate::canonizer::{Canonizer, CanonizerConfig, CleanOutcome};
pub use error::{CanonizeError, Result};
pub use input::{Cell, Parser, ParserConfig, RawTable, SourceMetadata};
pub use output::{OutputFormat, Writer};
pub use pipeline::{CleanResult, CleaningReport, EntitySpec, Rule};
pub use schema::{CleanTable, EntityKind, Value};
