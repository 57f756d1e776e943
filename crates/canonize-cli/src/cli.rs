//! CLI argument definitions using clap.

use canonize::{EntityKind, OutputFormat};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Canonize: clean extracted business tables into canonical form
#[derive(Parser)]
#[command(name = "canonize")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Clean a raw table for one entity
    Clean {
        /// Entity to clean (user, card, store, product, order, date_time)
        #[arg(value_name = "ENTITY")]
        entity: EntityKind,

        /// Path to the raw data file (CSV/TSV/JSON)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output path for the cleaned table (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format (csv, tsv, json; default: from output extension)
        #[arg(short, long)]
        format: Option<OutputFormat>,

        /// Input delimiter (e.g. ",", "tab", "semicolon"; default: auto-detect)
        #[arg(long)]
        delimiter: Option<String>,

        /// Maximum rows to read
        #[arg(long)]
        max_rows: Option<usize>,

        /// Extra cell text to treat as missing (repeatable)
        #[arg(long = "null-token", value_name = "TOKEN")]
        null_tokens: Vec<String>,

        /// Print the cleaning report as JSON
        #[arg(long)]
        report: bool,
    },

    /// Run a single field normalizer on a value
    Check {
        /// Normalizer to run (date, weight, card, expiry, uuid, float, int)
        #[arg(value_name = "KIND")]
        kind: CheckKind,

        /// Raw value to check
        #[arg(value_name = "VALUE", allow_hyphen_values = true)]
        value: String,
    },

    /// List the entity pipelines
    Entities {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Field normalizers exposed by `check`.
#[derive(Clone, Copy, Debug)]
pub enum CheckKind {
    Date,
    Weight,
    Card,
    Expiry,
    Uuid,
    Float,
    Int,
}

impl std::str::FromStr for CheckKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "date" => Ok(CheckKind::Date),
            "weight" | "kg" => Ok(CheckKind::Weight),
            "card" | "card_number" => Ok(CheckKind::Card),
            "expiry" | "expiry_date" => Ok(CheckKind::Expiry),
            "uuid" => Ok(CheckKind::Uuid),
            "float" => Ok(CheckKind::Float),
            "int" | "integer" => Ok(CheckKind::Int),
            _ => Err(format!(
                "Unknown check: {}. Use date, weight, card, expiry, uuid, float, or int.",
                s
            )),
        }
    }
}

impl std::fmt::Display for CheckKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckKind::Date => write!(f, "date"),
            CheckKind::Weight => write!(f, "weight"),
            CheckKind::Card => write!(f, "card"),
            CheckKind::Expiry => write!(f, "expiry"),
            CheckKind::Uuid => write!(f, "uuid"),
            CheckKind::Float => write!(f, "float"),
            CheckKind::Int => write!(f, "int"),
        }
    }
}
