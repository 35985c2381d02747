//! Command implementations and dispatch.

pub mod check;
pub mod date;
pub mod find;
pub mod init;
pub mod load;
pub mod search;

use std::process::ExitCode;

use super::{CommandContext, args::Commands};

/// Loads the command context and dispatches to the selected subcommand.
///
/// `init` and `check` run without parsing configuration so they work when an existing
/// config file is invalid.
pub fn run(command: Commands) -> ExitCode {
    let ctx = match command {
        Commands::Init(_) | Commands::Check => CommandContext::load_cwd_only(),
        _ => CommandContext::load(),
    };
    let ctx = match ctx {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };

    match command {
        Commands::Search(cmd) => search::run(&ctx, &cmd),
        Commands::Find(cmd) => find::run(&ctx, &cmd),
        Commands::Date(cmd) => date::run(&ctx, &cmd),
        Commands::Load(cmd) => load::run(&ctx, &cmd),
        Commands::Init(cmd) => init::run(&ctx, &cmd),
        Commands::Check => check::run(&ctx),
    }
}
