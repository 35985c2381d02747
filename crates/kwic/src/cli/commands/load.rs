//! Implementation of `kwic load`.

use std::{collections::BTreeMap, process::ExitCode};

use kwic_search::{Record, count_by_source};

use crate::cli::{
    args::LoadCommand,
    context::CommandContext,
    output::{SourceCounts, counts_table, print_json},
};

/// Reads previously written tables and prints window counts per source.
pub fn run(ctx: &CommandContext, cmd: &LoadCommand) -> ExitCode {
    let tables = ctx.output_tables(cmd.name.as_deref());
    let imported = match tables.load(!cmd.no_random) {
        Ok(imported) => imported,
        Err(e) => {
            eprintln!("error: failed to load tables: {e}");
            return ExitCode::FAILURE;
        }
    };

    let rows = source_counts(&imported.matches, imported.random.as_deref());
    if cmd.json {
        return print_json(&rows);
    }

    if rows.is_empty() {
        println!("No windows in {}", tables.match_path().display());
        return ExitCode::SUCCESS;
    }
    println!("{}", counts_table(&rows));
    println!(
        "{} matched windows from {} documents",
        imported.matches.len(),
        rows.len()
    );
    if let Some(random) = &imported.random {
        println!("{} random windows", random.len());
    }
    ExitCode::SUCCESS
}

/// Aggregates both tables into one row per source.
fn source_counts(matches: &[Record], random: Option<&[Record]>) -> Vec<SourceCounts> {
    let mut dates: BTreeMap<&str, Option<i32>> = BTreeMap::new();
    for record in matches.iter().chain(random.unwrap_or_default()) {
        let date = dates.entry(record.source.as_str()).or_default();
        if date.is_none() {
            *date = record.date;
        }
    }

    let matched = count_by_source(matches);
    let sampled = random.map(count_by_source);
    dates
        .into_iter()
        .map(|(source, date)| SourceCounts {
            source: source.to_string(),
            date,
            matches: matched.get(source).copied().unwrap_or(0),
            random: sampled
                .as_ref()
                .map(|counts| counts.get(source).copied().unwrap_or(0)),
        })
        .collect()
}
