//! Writing cleaned tables back to disk.

mod writer;

pub use writer::{OutputFormat, Writer};
