//! Input parsing and raw table model.

mod parser;
mod source;

pub use parser::{Parser, ParserConfig, parse_delimiter};
pub use source::{Cell, DEFAULT_NULL_TOKENS, NULL_TEXT, RawTable, SourceMetadata};
