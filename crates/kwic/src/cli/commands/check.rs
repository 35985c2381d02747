//! Implementation of `kwic check`.

use std::process::ExitCode;

use kwic_config::{Config, ConfigWarning, discover_config_files};

use crate::cli::context::CommandContext;

/// Exit codes for `kwic check`.
mod exit_codes {
    use std::process::ExitCode;

    /// Configuration is valid with no warnings.
    pub const OK: ExitCode = ExitCode::SUCCESS;
    /// Configuration has warnings but is usable.
    pub const WARNINGS: ExitCode = ExitCode::FAILURE;
    /// Configuration has errors and cannot be used.
    pub const ERROR: ExitCode = ExitCode::FAILURE;
}

/// Validates configuration and reports issues.
pub fn run(ctx: &CommandContext) -> ExitCode {
    let config_files = discover_config_files(&ctx.cwd);

    println!("Checking configuration...");
    println!();

    if config_files.is_empty() {
        println!("No configuration files found.");
        println!();
        println!("Run 'kwic init' to create a configuration file.");
        return exit_codes::OK;
    }

    println!("Config files:");
    for path in &config_files {
        println!("  {}", path.display());
    }
    println!();

    let config = match Config::load_from_files(&config_files) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return exit_codes::ERROR;
        }
    };
    if let Err(e) = config.compile_patterns() {
        eprintln!("error: {e}");
        return exit_codes::ERROR;
    }

    print_sources(&config);

    let warnings = config.validate();
    if warnings.is_empty() {
        println!("No issues found.");
        return exit_codes::OK;
    }

    println!("Warnings ({}):", warnings.len());
    for warning in &warnings {
        println!("  - {warning}");
    }
    println!();

    print_hints(&warnings);

    exit_codes::WARNINGS
}

/// Prints the corpus and metadata locations with their status.
fn print_sources(config: &Config) {
    println!("Corpus:");
    match &config.corpus.path {
        Some(path) => {
            let status = if path.is_dir() { "ok" } else { "missing" };
            println!("  [{status}] {}", path.display());
        }
        None => println!("  (none defined)"),
    }
    println!();

    println!("Metadata:");
    match &config.metadata {
        Some(metadata) => {
            let status = if metadata.path.is_file() { "ok" } else { "missing" };
            println!("  [{status}] {}", metadata.path.display());
        }
        None => println!("  (none defined)"),
    }
    println!();
}

/// Prints hints for resolving common warnings.
fn print_hints(warnings: &[ConfigWarning]) {
    let mut hints = Vec::new();

    for warning in warnings {
        let hint = match warning {
            ConfigWarning::NoCorpusDefined => "Set corpus.path to the directory holding the texts.",
            ConfigWarning::CorpusPathMissing { .. } => {
                "Create the missing directory or update corpus.path."
            }
            ConfigWarning::CorpusPathNotDirectory { .. } => {
                "corpus.path must point to a directory, not a file."
            }
            ConfigWarning::IncludePatternMatchesNothing { .. } => {
                "Check that the pattern matches files under the corpus directory."
            }
            ConfigWarning::MetadataPathMissing { .. } => {
                "Fix metadata.path or remove the [metadata] section."
            }
            ConfigWarning::ZeroWindow
            | ConfigWarning::ZeroParallelism
            | ConfigWarning::ZeroBatchSize
            | ConfigWarning::ZeroMaxAttempts => "Use a positive value or remove the setting.",
        };
        hints.push(hint);
    }

    hints.sort_unstable();
    hints.dedup();

    if !hints.is_empty() {
        println!("Hints:");
        for hint in hints {
            println!("  - {hint}");
        }
    }
}
