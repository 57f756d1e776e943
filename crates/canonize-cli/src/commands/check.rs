//! Check command - run one field normalizer on a single value.

use canonize::Cell;
use canonize::normalize::{
    clean_card_number, clean_expiry_date, clean_uuid, match_date, parse_float, parse_int,
    parse_quantity, to_kilograms,
};
use colored::Colorize;

use crate::cli::CheckKind;

pub fn run(kind: CheckKind, value: &str, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let cell = Cell::from(value);

    let (result, detail) = match kind {
        CheckKind::Date => match match_date(value) {
            Some((date, pattern)) => (
                Some(date.format(canonize::schema::DATE_FORMAT).to_string()),
                Some(format!("matched {}", pattern.shape)),
            ),
            None => (None, None),
        },
        CheckKind::Weight => {
            let detail = parse_quantity(value).map(|q| match q.unit {
                Some(unit) => format!("{}{}", q.magnitude, unit.symbol()),
                None => "bare number".to_string(),
            });
            (to_kilograms(value).map(|kg| format!("{} kg", kg)), detail)
        }
        CheckKind::Card => (clean_card_number(&cell), None),
        CheckKind::Expiry => (clean_expiry_date(&cell), None),
        CheckKind::Uuid => (
            clean_uuid(&cell),
            Some(format!("{} characters", value.chars().count())),
        ),
        CheckKind::Float => (parse_float(&cell).map(|f| f.to_string()), None),
        CheckKind::Int => (parse_int(&cell).map(|i| i.to_string()), None),
    };

    match result {
        Some(normalized) => {
            println!(
                "{} {} {} {}",
                "✓".green().bold(),
                format!("{:?}", value).white(),
                "→".dimmed(),
                normalized.green()
            );
        }
        None => {
            println!(
                "{} {} {} {}",
                "✗".red().bold(),
                format!("{:?}", value).white(),
                "→".dimmed(),
                "null".red()
            );
        }
    }

    if let Some(detail) = detail.filter(|_| verbose) {
        println!("  {} {}", format!("{}:", kind).dimmed(), detail);
    }

    Ok(())
}
