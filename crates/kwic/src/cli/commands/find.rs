//! Implementation of `kwic find`.

use std::process::ExitCode;

use serde::Serialize;

use crate::cli::{args::FindCommand, context::CommandContext, output::print_json};

/// JSON output for `kwic find`.
#[derive(Serialize)]
struct JsonFindOutput {
    /// Documents containing a term, sorted.
    matches: Vec<String>,
    /// Documents that could not be read.
    skipped: Vec<String>,
    /// Documents tested.
    scanned: usize,
}

/// Lists the documents whose text contains any of the terms.
pub fn run(ctx: &CommandContext, cmd: &FindCommand) -> ExitCode {
    let mut repo = match ctx.open_corpus(&cmd.corpus) {
        Ok(repo) => repo,
        Err(code) => return code,
    };

    let report = match repo.find(&cmd.terms, ctx.parallelism(&cmd.corpus)) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("error: scan failed: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut matches = report.matches;
    matches.sort_unstable();

    if cmd.json {
        return print_json(&JsonFindOutput {
            matches,
            skipped: report.skipped.into_iter().map(|s| s.name).collect(),
            scanned: report.scanned,
        });
    }

    for name in &matches {
        println!("{name}");
    }
    for skipped in &report.skipped {
        eprintln!("warning: skipped {}: {}", skipped.name, skipped.reason);
    }
    ExitCode::SUCCESS
}
