//! Implementation of `kwic date`.

use std::process::ExitCode;

use crate::cli::{args::DateCommand, context::CommandContext};

/// Prints the composition date of a document.
pub fn run(ctx: &CommandContext, cmd: &DateCommand) -> ExitCode {
    let index = match ctx.metadata() {
        Ok(Some(index)) => index,
        Ok(None) => {
            eprintln!("error: no metadata file defined in configuration");
            return ExitCode::FAILURE;
        }
        Err(code) => return code,
    };

    match index.date_of(&cmd.id) {
        Ok(date) => {
            println!("{date}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
