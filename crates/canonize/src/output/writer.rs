//! Serialise a [`CleanTable`] as CSV, TSV or JSON.
//!
//! Writing to a path replaces the whole destination file, mirroring the
//! replace-whole-table semantics of the relational sink the output feeds.

use std::fmt;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use indexmap::IndexMap;

use crate::error::{CanonizeError, Result};
use crate::schema::{CleanTable, Value};

/// Supported output encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Csv,
    Tsv,
    Json,
}

impl OutputFormat {
    /// Infer the format from a file extension, defaulting to CSV.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        match path
            .as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("json") => OutputFormat::Json,
            Some("tsv") | Some("tab") => OutputFormat::Tsv,
            _ => OutputFormat::Csv,
        }
    }

    /// Conventional file extension.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Tsv => "tsv",
            OutputFormat::Json => "json",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = CanonizeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "tsv" | "tab" => Ok(OutputFormat::Tsv),
            "json" => Ok(OutputFormat::Json),
            other => Err(CanonizeError::UnsupportedFormat(other.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Writes cleaned tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct Writer {
    format: OutputFormat,
}

impl Writer {
    /// Create a writer for the given format.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Format this writer produces.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Write `table` to `path`, replacing any existing file.
    pub fn write(&self, table: &CleanTable, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| CanonizeError::Io {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        let file = File::create(path).map_err(|e| CanonizeError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let mut writer = BufWriter::new(file);
        self.write_to(table, &mut writer)?;
        writer.flush().map_err(|e| CanonizeError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        tracing::debug!(
            file = %path.display(),
            rows = table.row_count(),
            format = %self.format,
            "wrote cleaned table"
        );
        Ok(())
    }

    /// Write `table` to any writer.
    pub fn write_to<W: Write>(&self, table: &CleanTable, writer: W) -> Result<()> {
        match self.format {
            OutputFormat::Csv => write_delimited(table, writer, b','),
            OutputFormat::Tsv => write_delimited(table, writer, b'\t'),
            OutputFormat::Json => write_json(table, writer),
        }
    }

    /// Render `table` into a string.
    pub fn render(&self, table: &CleanTable) -> Result<String> {
        let mut buffer = Vec::new();
        self.write_to(table, &mut buffer)?;
        String::from_utf8(buffer)
            .map_err(|e| CanonizeError::Persistence(format!("Output is not valid UTF-8: {}", e)))
    }
}

fn write_delimited<W: Write>(table: &CleanTable, writer: W, delimiter: u8) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(writer);

    csv_writer.write_record(&table.headers)?;
    for row in &table.rows {
        csv_writer.write_record(row.iter().map(Value::to_string))?;
    }
    csv_writer
        .flush()
        .map_err(|e| CanonizeError::Persistence(format!("Failed to flush output: {}", e)))?;
    Ok(())
}

fn write_json<W: Write>(table: &CleanTable, writer: W) -> Result<()> {
    let records: Vec<IndexMap<&str, &Value>> = table
        .rows
        .iter()
        .map(|row| {
            table
                .headers
                .iter()
                .map(String::as_str)
                .zip(row.iter())
                .collect()
        })
        .collect();

    serde_json::to_writer_pretty(writer, &records)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample() -> CleanTable {
        CleanTable::new(
            vec!["card_number".into(), "date_payment_confirmed".into(), "lat".into()],
            vec![
                vec![
                    Value::Text("4971858637664481".into()),
                    Value::Date(NaiveDate::from_ymd_opt(2015, 11, 25).unwrap()),
                    Value::Null,
                ],
                vec![Value::Text("30060773296197".into()), Value::Null, Value::Float(45.5)],
            ],
        )
    }

    #[test]
    fn test_csv_nulls_are_empty() {
        let out = Writer::new(OutputFormat::Csv).render(&sample()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "card_number,date_payment_confirmed,lat");
        assert_eq!(lines[1], "4971858637664481,2015-11-25,");
        assert_eq!(lines[2], "30060773296197,,45.5");
    }

    #[test]
    fn test_tsv() {
        let out = Writer::new(OutputFormat::Tsv).render(&sample()).unwrap();
        assert!(out.starts_with("card_number\tdate_payment_confirmed\tlat\n"));
    }

    #[test]
    fn test_json_records() {
        let out = Writer::new(OutputFormat::Json).render(&sample()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed[0]["date_payment_confirmed"], "2015-11-25");
        assert!(parsed[0]["lat"].is_null());
        assert_eq!(parsed[1]["lat"], 45.5);
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("parquet".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::from_path("out/dim_users.tsv"), OutputFormat::Tsv);
        assert_eq!(OutputFormat::from_path("dim_users"), OutputFormat::Csv);
    }
}
