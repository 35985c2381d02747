//! Command-line interface for the `kwic` corpus window extractor.

mod cli;

use std::{io, process::ExitCode};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{args::Cli, commands};

/// Environment variable holding a log filter directive.
const LOG_ENV: &str = "KWIC_LOG";

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    commands::run(cli.command)
}

/// Installs the stderr log subscriber.
///
/// `-v` and `-vv` select `info` and `debug`; otherwise `KWIC_LOG` is honored, falling
/// back to `warn`.
fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}
