//! Rendering and JSON serialization for CLI output.

use std::process::ExitCode;

use comfy_table::{Cell, Table, presets::UTF8_FULL_CONDENSED};
use kwic_search::JobSummary;
use serde::Serialize;

/// Prints `value` as pretty JSON.
pub fn print_json<T: Serialize>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(json_str) => {
            println!("{json_str}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: failed to serialize JSON: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Prints a human-readable job summary.
pub fn print_summary(summary: &JobSummary) {
    println!("Scanned {} documents, {} matched.", summary.scanned, summary.matched_documents);
    println!(
        "Wrote {} matched windows to {}",
        summary.windows,
        summary.match_table.display()
    );
    if let (Some(windows), Some(path)) = (summary.random_windows, &summary.random_table) {
        println!("Wrote {windows} random windows to {}", path.display());
    }

    if summary.shortfall > 0 {
        println!();
        println!(
            "warning: {} random windows could not be drawn from:",
            summary.shortfall
        );
        for name in &summary.exhausted {
            println!("  - {name}");
        }
    }
    if !summary.skipped.is_empty() {
        println!();
        println!("warning: skipped {} unreadable documents:", summary.skipped.len());
        for name in &summary.skipped {
            println!("  - {name}");
        }
    }
}

/// One row of the per-source table printed by `kwic load`.
#[derive(Debug, Serialize)]
pub struct SourceCounts {
    /// Document identifier.
    pub source: String,
    /// Composition date, if recorded.
    pub date: Option<i32>,
    /// Matched windows.
    pub matches: usize,
    /// Random windows, if the random table was loaded.
    pub random: Option<usize>,
}

/// Renders per-source counts as a table.
pub fn counts_table(rows: &[SourceCounts]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec!["Source", "Date", "Matches", "Random"]);
    for row in rows {
        table.add_row(vec![
            Cell::new(&row.source),
            Cell::new(row.date.map_or_else(String::new, |d| d.to_string())),
            Cell::new(row.matches.to_string()),
            Cell::new(row.random.map_or_else(|| "-".to_string(), |r| r.to_string())),
        ]);
    }
    table
}
