//! Main Canonizer struct and public API.

use std::path::Path;

use serde::Serialize;

use crate::error::{CanonizeError, Result};
use crate::input::{Parser, ParserConfig, RawTable, SourceMetadata};
use crate::output::{OutputFormat, Writer};
use crate::pipeline::{self, CleanResult, CleaningReport};
use crate::schema::{CleanTable, EntityKind};

/// Configuration for a Canonizer.
#[derive(Debug, Clone, Default)]
pub struct CanonizerConfig {
    /// Parser configuration.
    pub parser: ParserConfig,
    /// Output encoding (None = infer from the destination extension).
    pub output_format: Option<OutputFormat>,
}

impl CanonizerConfig {
    /// Use a custom parser configuration.
    pub fn with_parser(mut self, parser: ParserConfig) -> Self {
        self.parser = parser;
        self
    }

    /// Force an output format.
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = Some(format);
        self
    }
}

/// Result of cleaning one data file.
#[derive(Debug, Clone, Serialize)]
pub struct CleanOutcome {
    /// Metadata about the source file.
    pub source: SourceMetadata,
    /// The canonical table.
    pub table: CleanTable,
    /// What the cleaner did.
    pub report: CleaningReport,
}

/// Loads raw tables, cleans them and writes the canonical result.
pub struct Canonizer {
    config: CanonizerConfig,
    parser: Parser,
}

impl Canonizer {
    /// Create a new Canonizer with default configuration.
    pub fn new() -> Self {
        Self::with_config(CanonizerConfig::default())
    }

    /// Create a Canonizer with custom configuration.
    pub fn with_config(config: CanonizerConfig) -> Self {
        let parser = Parser::with_config(config.parser.clone());
        Self { config, parser }
    }

    /// Clean an in-memory raw table.
    pub fn clean_table(&self, kind: EntityKind, raw: &RawTable) -> CleanResult {
        pipeline::clean(kind, raw)
    }

    /// Load and clean a data file.
    pub fn clean_file(&self, kind: EntityKind, path: impl AsRef<Path>) -> Result<CleanOutcome> {
        let (raw, source) = self.parser.parse_file(path)?;
        let CleanResult { table, report } = self.clean_table(kind, &raw);

        Ok(CleanOutcome {
            source,
            table,
            report,
        })
    }

    /// Load, clean and write a data file, replacing `output` if it exists.
    pub fn clean_file_to(
        &self,
        kind: EntityKind,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
    ) -> Result<CleanOutcome> {
        let input = input.as_ref();
        let output = output.as_ref();
        if same_file(input, output) {
            return Err(CanonizeError::Config(format!(
                "Refusing to overwrite the input file '{}'",
                input.display()
            )));
        }

        let outcome = self.clean_file(kind, input)?;
        self.writer_for(output).write(&outcome.table, output)?;
        Ok(outcome)
    }

    /// Writer for a destination, honouring a forced output format.
    pub fn writer_for(&self, output: impl AsRef<Path>) -> Writer {
        Writer::new(
            self.config
                .output_format
                .unwrap_or_else(|| OutputFormat::from_path(output)),
        )
    }
}

/// Whether two paths name the same file. Spellings such as `./a.csv` and
/// `a.csv` are resolved when the output already exists.
fn same_file(input: &Path, output: &Path) -> bool {
    if input == output {
        return true;
    }
    match (input.canonicalize(), output.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

impl Default for Canonizer {
    fn default() -> Self {
        Self::new()
    }
}
