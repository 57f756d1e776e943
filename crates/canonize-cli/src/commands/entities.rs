//! Entities command - list the cleaning pipeline for each entity.

use canonize::{EntityKind, EntitySpec};
use colored::Colorize;
use serde::Serialize;

#[derive(Serialize)]
struct EntityListing<'a> {
    entity: EntityKind,
    table: &'static str,
    requirement: String,
    spec: &'a EntitySpec,
}

pub fn run(json_output: bool, _verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json_output {
        let listings: Vec<EntityListing> = EntityKind::ALL
            .into_iter()
            .map(|kind| {
                let spec = EntitySpec::for_kind(kind);
                EntityListing {
                    entity: kind,
                    table: kind.table_name(),
                    requirement: spec.required.describe(),
                    spec,
                }
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&listings)?);
        return Ok(());
    }

    for kind in EntityKind::ALL {
        let spec = EntitySpec::for_kind(kind);
        println!(
            "{} {} {}",
            kind.to_string().cyan().bold(),
            "→".dimmed(),
            kind.table_name().white()
        );
        println!("  Required: {}", spec.required.describe());

        if !spec.drop_columns.is_empty() {
            println!("  Drops:    {}", spec.drop_columns.join(", "));
        }
        if let Some(derive) = &spec.derive {
            println!(
                "  Derives:  {} from {} ({})",
                derive.into,
                derive.from,
                derive.rule.label()
            );
        }
        for rule in spec.rules {
            let note = if rule.text_first { " (as text)" } else { "" };
            println!(
                "    {:<24} {}{}",
                rule.column,
                rule.rule.label().green(),
                note.dimmed()
            );
        }
        println!();
    }

    Ok(())
}
