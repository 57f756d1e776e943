//! Canonize CLI - clean extracted business tables into canonical form.

mod cli;
mod commands;
mod logger;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    logger::init(cli.verbose);

    let result = match cli.command {
        Commands::Clean {
            entity,
            file,
            output,
            format,
            delimiter,
            max_rows,
            null_tokens,
            report,
        } => commands::clean::run(
            commands::clean::CleanArgs {
                entity,
                file,
                output,
                format,
                delimiter,
                max_rows,
                null_tokens,
                report,
            },
            cli.verbose,
        ),

        Commands::Check { kind, value } => commands::check::run(kind, &value, cli.verbose),

        Commands::Entities { json } => commands::entities::run(json, cli.verbose),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
