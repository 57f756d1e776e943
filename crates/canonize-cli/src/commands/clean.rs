//! Clean command - run an entity cleaner over a data file.

use std::io::{self, Write};
use std::path::PathBuf;

use canonize::input::parse_delimiter;
use canonize::{
    Canonizer, CanonizerConfig, CleanOutcome, CleaningReport, EntityKind, OutputFormat,
    ParserConfig, Writer,
};
use colored::Colorize;

/// Arguments of the `clean` subcommand.
pub struct CleanArgs {
    pub entity: EntityKind,
    pub file: PathBuf,
    pub output: Option<PathBuf>,
    pub format: Option<OutputFormat>,
    pub delimiter: Option<String>,
    pub max_rows: Option<usize>,
    pub null_tokens: Vec<String>,
    pub report: bool,
}

pub fn run(args: CleanArgs, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    if !args.file.exists() {
        return Err(format!("Data file not found: {}", args.file.display()).into());
    }

    let mut parser = ParserConfig::default();
    if let Some(delimiter) = &args.delimiter {
        parser = parser.with_delimiter(parse_delimiter(delimiter)?);
    }
    if let Some(max_rows) = args.max_rows {
        parser = parser.with_max_rows(max_rows);
    }
    for token in &args.null_tokens {
        parser = parser.with_null_token(token.as_str());
    }

    let mut config = CanonizerConfig::default().with_parser(parser);
    if let Some(format) = args.format {
        config = config.with_output_format(format);
    }
    let canonizer = Canonizer::with_config(config);
    tracing::debug!(
        "Cleaning {} as {} ({} extra null tokens)",
        args.file.display(),
        args.entity,
        args.null_tokens.len()
    );

    match &args.output {
        Some(output) => {
            let outcome = canonizer.clean_file_to(args.entity, &args.file, output)?;
            tracing::info!(
                "Wrote {} rows to {}",
                outcome.report.rows_out,
                output.display()
            );
            print_summary(&outcome, verbose);
            println!(
                "{} {}",
                "Saved to:".green().bold(),
                output.display().to_string().cyan()
            );
            if args.report {
                println!("{}", serde_json::to_string_pretty(&outcome.report)?);
            }
        }
        None => {
            // The table owns stdout; everything else goes to stderr.
            let outcome = canonizer.clean_file(args.entity, &args.file)?;
            let writer = Writer::new(args.format.unwrap_or_default());
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            writer.write_to(&outcome.table, &mut handle)?;
            handle.flush()?;

            if args.report {
                eprintln!("{}", serde_json::to_string_pretty(&outcome.report)?);
            } else if verbose {
                eprintln!("{}", outcome.report.summary());
            }
        }
    }

    Ok(())
}

fn print_summary(outcome: &CleanOutcome, verbose: bool) {
    let report = &outcome.report;
    println!(
        "{} {} {}",
        "Cleaned".cyan().bold(),
        report.entity.label().white().bold(),
        format!("({})", outcome.source.file).dimmed()
    );
    println!();
    println!("  Rows in:            {}", report.rows_in);
    println!(
        "  Rows out:           {} ({:.1}%)",
        report.rows_out.to_string().green().bold(),
        report.retention() * 100.0
    );
    print_drop_line("Missing required:", report.dropped_missing_required);
    print_drop_line("Duplicates:", report.dropped_duplicates);

    if let Some(keys) = &report.distinct_keys {
        println!(
            "  Distinct {}: {} → {}",
            keys.column, keys.before, keys.after
        );
    }
    if !report.dropped_columns.is_empty() {
        println!("  Dropped columns:    {}", report.dropped_columns.join(", "));
    }
    if !report.absent_columns.is_empty() {
        println!(
            "  {} {}",
            "Absent columns:".yellow(),
            report.absent_columns.join(", ")
        );
    }

    if verbose {
        print_columns(report);
        println!();
        println!("  Source hash: {}", outcome.source.hash.dimmed());
    }
    println!();
}

fn print_drop_line(label: &str, count: usize) {
    let count = if count > 0 {
        count.to_string().yellow().to_string()
    } else {
        count.to_string()
    };
    println!("  {:<19} {}", label, count);
}

fn print_columns(report: &CleaningReport) {
    println!();
    println!("  {}", "Columns:".bold());
    for (name, change) in &report.columns {
        let rule = change.rule.map(|r| r.label()).unwrap_or("-");
        let nulled = if change.values_nulled > 0 {
            format!("{} nulled", change.values_nulled).yellow().to_string()
        } else {
            String::new()
        };
        println!(
            "    {:<28} {:<14} {:>6} null {}",
            name, rule, change.null_count, nulled
        );
    }
}
