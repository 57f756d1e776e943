//! Loads extracted tables from delimited or JSON files.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;
use sha2::{Digest, Sha256};

use super::source::{Cell, DEFAULT_NULL_TOKENS, RawTable, SourceMetadata};
use crate::error::{CanonizeError, Result};

/// Delimiters to try when auto-detecting.
const DELIMITERS: &[u8] = &[b'\t', b',', b';', b'|'];

/// Parser configuration.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Delimiter to use (None = auto-detect).
    pub delimiter: Option<u8>,
    /// Whether the file has a header row.
    pub has_header: bool,
    /// Maximum rows to read (None = all).
    pub max_rows: Option<usize>,
    /// Quote character.
    pub quote: u8,
    /// Exact cell texts that are read as missing values.
    pub null_tokens: Vec<String>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            has_header: true,
            max_rows: None,
            quote: b'"',
            null_tokens: DEFAULT_NULL_TOKENS.iter().map(|t| t.to_string()).collect(),
        }
    }
}

impl ParserConfig {
    /// Force a delimiter instead of auto-detecting one.
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    /// Stop reading after `max_rows` data rows.
    pub fn with_max_rows(mut self, max_rows: usize) -> Self {
        self.max_rows = Some(max_rows);
        self
    }

    /// Treat an additional exact text as missing.
    pub fn with_null_token(mut self, token: impl Into<String>) -> Self {
        let token = token.into();
        if !self.null_tokens.contains(&token) {
            self.null_tokens.push(token);
        }
        self
    }
}

/// JSON layouts produced by the extraction layer.
#[derive(Deserialize)]
#[serde(untagged)]
enum JsonTable {
    /// `[{"col": value, ...}, ...]`
    Records(Vec<IndexMap<String, serde_json::Value>>),
    /// `{"col": {"0": value, "1": value}, ...}`
    Columns(IndexMap<String, IndexMap<String, serde_json::Value>>),
}

/// Parses tabular data files.
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    /// Create a new parser with default configuration.
    pub fn new() -> Self {
        Self {
            config: ParserConfig::default(),
        }
    }

    /// Create a parser with custom configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Parse a file and return the raw table and metadata.
    ///
    /// Files ending in `.json` are read as JSON; everything else is treated
    /// as delimited text.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<(RawTable, SourceMetadata)> {
        let path = path.as_ref();

        let mut file = File::open(path).map_err(|e| CanonizeError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut contents = Vec::new();
        file.read_to_end(&mut contents).map_err(|e| CanonizeError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let size_bytes = contents.len() as u64;

        let mut hasher = Sha256::new();
        hasher.update(&contents);
        let hash = format!("sha256:{:x}", hasher.finalize());

        let is_json = path
            .extension()
            .map(|e| e.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let (table, format) = if is_json {
            (self.parse_json(&contents)?, "json".to_string())
        } else {
            let delimiter = match self.config.delimiter {
                Some(d) => d,
                None => detect_delimiter(&contents)?,
            };
            let format = match delimiter {
                b'\t' => "tsv",
                b',' => "csv",
                b';' => "csv-semicolon",
                b'|' => "psv",
                _ => "delimited",
            }
            .to_string();
            (self.parse_bytes(&contents, delimiter)?, format)
        };

        tracing::debug!(
            file = %path.display(),
            rows = table.row_count(),
            columns = table.column_count(),
            format = %format,
            "loaded raw table"
        );

        let metadata = SourceMetadata::new(
            path.to_path_buf(),
            hash,
            size_bytes,
            format,
            table.row_count(),
            table.column_count(),
        );

        Ok((table, metadata))
    }

    /// Parse delimited bytes with a known delimiter.
    pub fn parse_bytes(&self, bytes: &[u8], delimiter: u8) -> Result<RawTable> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(self.config.has_header)
            .quote(self.config.quote)
            .flexible(true)
            .from_reader(bytes);

        let tokens = self.config.null_tokens.as_slice();
        let mut rows: Vec<Vec<Cell>> = Vec::new();
        for (row_idx, result) in reader.records().enumerate() {
            if self.config.max_rows.is_some_and(|max| row_idx >= max) {
                break;
            }
            let record = result?;
            rows.push(record.iter().map(|s| Cell::from_text(s, tokens)).collect());
        }

        let headers: Vec<String> = if self.config.has_header {
            reader.headers()?.iter().map(|s| s.to_string()).collect()
        } else {
            let width = rows.iter().map(Vec::len).max().unwrap_or(0);
            (0..width).map(|i| format!("column_{}", i + 1)).collect()
        };

        if headers.is_empty() {
            return Err(CanonizeError::EmptyData("No columns found".to_string()));
        }

        Ok(RawTable::new(headers, rows))
    }

    /// Parse a JSON document in record or column orientation.
    pub fn parse_json(&self, bytes: &[u8]) -> Result<RawTable> {
        let tokens = self.config.null_tokens.as_slice();
        let limit = self.config.max_rows.unwrap_or(usize::MAX);

        let table = match serde_json::from_slice::<JsonTable>(bytes)? {
            JsonTable::Records(records) => {
                let mut headers: Vec<String> = Vec::new();
                for record in &records {
                    for key in record.keys() {
                        if !headers.contains(key) {
                            headers.push(key.clone());
                        }
                    }
                }
                let rows = records
                    .iter()
                    .take(limit)
                    .map(|record| {
                        headers
                            .iter()
                            .map(|h| {
                                record
                                    .get(h)
                                    .map(|v| Cell::from_json(v, tokens))
                                    .unwrap_or(Cell::Missing)
                            })
                            .collect()
                    })
                    .collect();
                RawTable::new(headers, rows)
            }
            JsonTable::Columns(columns) => {
                let mut index: Vec<&String> = Vec::new();
                for values in columns.values() {
                    for key in values.keys() {
                        if !index.contains(&key) {
                            index.push(key);
                        }
                    }
                }
                let rows = index
                    .iter()
                    .take(limit)
                    .map(|key| {
                        columns
                            .values()
                            .map(|values| {
                                values
                                    .get(*key)
                                    .map(|v| Cell::from_json(v, tokens))
                                    .unwrap_or(Cell::Missing)
                            })
                            .collect()
                    })
                    .collect();
                RawTable::new(columns.keys().cloned().collect(), rows)
            }
        };

        if table.headers.is_empty() {
            return Err(CanonizeError::EmptyData("No columns found".to_string()));
        }

        Ok(table)
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a delimiter given on the command line or in configuration.
pub fn parse_delimiter(value: &str) -> Result<u8> {
    match value {
        "\\t" | "tab" | "\t" => Ok(b'\t'),
        "comma" => Ok(b','),
        "semicolon" => Ok(b';'),
        "pipe" => Ok(b'|'),
        other if other.len() == 1 && other.is_ascii() => Ok(other.as_bytes()[0]),
        other => Err(CanonizeError::InvalidDelimiter(other.to_string())),
    }
}

/// Detect the delimiter by analyzing the first few lines.
fn detect_delimiter(bytes: &[u8]) -> Result<u8> {
    let reader = BufReader::new(bytes);
    let lines: Vec<String> = reader
        .lines()
        .take(10)
        .map_while(|l| l.ok())
        .filter(|l| !l.trim().is_empty())
        .collect();

    if lines.is_empty() {
        return Err(CanonizeError::EmptyData("No lines to analyze".to_string()));
    }

    let mut best_delimiter = b',';
    let mut best_score = 0;

    for &delim in DELIMITERS {
        let counts: Vec<usize> = lines
            .iter()
            .map(|line| count_delimiter_in_line(line, delim))
            .collect();

        let first_count = counts[0];
        if first_count == 0 {
            continue;
        }

        let consistent = counts.iter().all(|&c| c == first_count);
        let variance: f64 = if counts.len() > 1 {
            let mean = counts.iter().sum::<usize>() as f64 / counts.len() as f64;
            counts.iter().map(|&c| (c as f64 - mean).powi(2)).sum::<f64>() / counts.len() as f64
        } else {
            0.0
        };

        // Tab gets a small bonus; it rarely appears inside values.
        let score = if consistent {
            first_count * 1000 + (if delim == b'\t' { 100 } else { 0 })
        } else if variance < 1.0 {
            first_count * 100
        } else {
            first_count
        };

        if score > best_score {
            best_score = score;
            best_delimiter = delim;
        }
    }

    Ok(best_delimiter)
}

/// Count delimiter occurrences in a line, respecting quotes.
fn count_delimiter_in_line(line: &str, delimiter: u8) -> usize {
    let delim_char = delimiter as char;
    let mut count = 0;
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            c if c == delim_char && !in_quotes => count += 1,
            _ => {}
        }
    }

    count
}
