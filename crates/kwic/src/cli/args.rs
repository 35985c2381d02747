//! Clap argument definitions for the `kwic` CLI.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

/// Top-level CLI options.
#[derive(Parser)]
#[command(name = "kwic", version)]
#[command(about = "Keyword-in-context windows and matched random controls for text corpora")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Shared flags selecting and scanning the corpus.
#[derive(Args, Debug, Clone, Default)]
pub struct CorpusArgs {
    /// Corpus directory, overriding the configured one
    #[arg(long)]
    pub corpus: Option<PathBuf>,

    /// Number of scan workers; 0 scans sequentially [default: from config]
    #[arg(short = 'j', long)]
    pub jobs: Option<usize>,
}

/// Arguments for `kwic search`.
#[derive(Args, Debug, Clone)]
pub struct SearchCommand {
    /// Target terms [default: search.targets from config]
    pub terms: Vec<String>,

    #[command(flatten)]
    /// Corpus selection.
    pub corpus: CorpusArgs,

    /// Base name of the output tables [default: output.name from config, or "results"]
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,

    /// Tokens kept on each side of a match [default: 50]
    #[arg(short = 'w', long)]
    pub window: Option<usize>,

    /// Keep the matched token in each window
    #[arg(long)]
    pub keep_center: bool,

    /// Skip the random control pass
    #[arg(long)]
    pub no_random: bool,

    /// Seed for the random control pass
    #[arg(long)]
    pub seed: Option<u64>,

    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `kwic find`.
#[derive(Args, Debug, Clone)]
pub struct FindCommand {
    /// Terms to look for
    #[arg(required = true)]
    pub terms: Vec<String>,

    #[command(flatten)]
    /// Corpus selection.
    pub corpus: CorpusArgs,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `kwic date`.
#[derive(Args, Debug, Clone)]
pub struct DateCommand {
    /// Document identifier or path
    pub id: String,
}

/// Arguments for `kwic load`.
#[derive(Args, Debug, Clone)]
pub struct LoadCommand {
    /// Base name of the tables [default: output.name from config, or "results"]
    pub name: Option<PathBuf>,

    /// Ignore the random control table
    #[arg(long)]
    pub no_random: bool,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `kwic init`.
#[derive(Args, Debug, Clone)]
pub struct InitCommand {
    /// Overwrite existing configuration file
    #[arg(long)]
    pub force: bool,
}

/// Supported `kwic` subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Extract matched and random windows into tables
    Search(SearchCommand),

    /// List documents containing any of the terms
    Find(FindCommand),

    /// Print the composition date of a document
    Date(DateCommand),

    /// Summarize previously written tables
    Load(LoadCommand),

    /// Initialize kwic configuration in current directory
    Init(InitCommand),

    /// Validate configuration and diagnose issues
    Check,
}
