//! Implementation of `kwic search`.

use std::process::ExitCode;

use kwic_search::{JobParams, SearchJob};

use crate::cli::{
    args::SearchCommand,
    context::CommandContext,
    output::{print_json, print_summary},
};

/// Runs a search job and writes its tables.
pub fn run(ctx: &CommandContext, cmd: &SearchCommand) -> ExitCode {
    let params = build_params(ctx, cmd);
    if let Err(e) = params.validate() {
        eprintln!("error: {e}");
        if params.targets.is_empty() {
            eprintln!("Pass target terms or set search.targets in .kwic.toml.");
        }
        return ExitCode::FAILURE;
    }

    let repo = match ctx.open_corpus(&cmd.corpus) {
        Ok(repo) => repo,
        Err(code) => return code,
    };
    let mut job = match SearchJob::new(repo, params) {
        Ok(job) => job,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let tables = ctx.output_tables(cmd.output.as_deref());
    let with_random = ctx.config.search.with_random && !cmd.no_random;
    let summary = match job.export(&tables, with_random) {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("error: search failed: {e}");
            return ExitCode::FAILURE;
        }
    };

    if cmd.json {
        return print_json(&summary);
    }
    print_summary(&summary);
    ExitCode::SUCCESS
}

/// Builds job parameters by applying CLI overrides to config defaults.
fn build_params(ctx: &CommandContext, cmd: &SearchCommand) -> JobParams {
    let defaults = &ctx.config.search;
    let targets = if cmd.terms.is_empty() {
        defaults.targets.clone()
    } else {
        cmd.terms.clone()
    };

    JobParams {
        targets,
        window: cmd.window.unwrap_or(defaults.window),
        ignore_center: defaults.ignore_center && !cmd.keep_center,
        parallelism: ctx.parallelism(&cmd.corpus),
        memory_efficient: defaults.memory_efficient,
        max_attempts: defaults.max_attempts,
        seed: cmd.seed.or(defaults.seed),
    }
}
