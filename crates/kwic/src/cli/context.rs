//! Shared context for running CLI commands.

use std::{
    env,
    num::NonZeroUsize,
    path::{Path, PathBuf},
    process::ExitCode,
    sync::Arc,
};

use kwic_config::{Config, DEFAULT_OUTPUT_NAME};
use kwic_corpus::{CorpusOptions, CorpusRepository};
use kwic_metadata::{MetadataIndex, MetadataOptions};
use kwic_search::OutputTables;

use super::args::CorpusArgs;

/// Command execution context built once per CLI invocation.
pub struct CommandContext {
    /// Current working directory.
    pub cwd: PathBuf,
    /// Loaded configuration (may be default if no config files found).
    pub config: Config,
}

impl CommandContext {
    /// Loads the current directory and configuration.
    pub fn load() -> Result<Self, ExitCode> {
        let cwd = current_dir_or_failure()?;
        let config = Config::load(&cwd).map_err(|e| {
            eprintln!("error: failed to load configuration: {e}");
            ExitCode::FAILURE
        })?;
        Ok(Self { cwd, config })
    }

    /// Loads only the current directory, skipping configuration parsing.
    pub fn load_cwd_only() -> Result<Self, ExitCode> {
        let cwd = current_dir_or_failure()?;
        Ok(Self {
            cwd,
            config: Config::default(),
        })
    }

    /// Number of scan workers: the CLI flag, else the configured value.
    ///
    /// Zero means sequential.
    pub fn parallelism(&self, args: &CorpusArgs) -> Option<NonZeroUsize> {
        args.jobs
            .or(self.config.search.parallelism)
            .and_then(NonZeroUsize::new)
    }

    /// Loads the configured metadata index, if any.
    pub fn metadata(&self) -> Result<Option<Arc<MetadataIndex>>, ExitCode> {
        let Some(settings) = &self.config.metadata else {
            return Ok(None);
        };
        let options = MetadataOptions {
            delimiter: settings.delimiter,
            date_column: settings.date_column.clone(),
        };
        match MetadataIndex::load(&settings.path, &options) {
            Ok(index) => Ok(Some(Arc::new(index))),
            Err(e) => {
                eprintln!("error: failed to load metadata: {e}");
                Err(ExitCode::FAILURE)
            }
        }
    }

    /// Opens the corpus selected by `args` or the configuration.
    pub fn open_corpus(&self, args: &CorpusArgs) -> Result<CorpusRepository, ExitCode> {
        let root = self.corpus_root(args.corpus.as_deref())?;
        let patterns = self.config.compile_patterns().map_err(|e| {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        })?;
        let metadata = self.metadata()?;
        let options = CorpusOptions {
            lowercase: self.config.corpus.lowercase,
        };

        CorpusRepository::open(&root, &options, &patterns, metadata).map_err(|e| {
            eprintln!("error: failed to open corpus: {e}");
            ExitCode::FAILURE
        })
    }

    /// Output tables named on the command line, in the configuration, or `results`.
    pub fn output_tables(&self, name: Option<&Path>) -> OutputTables {
        let base = name
            .map(|n| self.cwd.join(n))
            .or_else(|| self.config.output.name.clone())
            .unwrap_or_else(|| self.cwd.join(DEFAULT_OUTPUT_NAME));
        OutputTables {
            base,
            delimiter: self.config.output.delimiter,
            batch_size: self.config.output.batch_size,
        }
    }

    /// Resolves the corpus root, preferring an explicit path.
    fn corpus_root(&self, explicit: Option<&Path>) -> Result<PathBuf, ExitCode> {
        if let Some(path) = explicit {
            return Ok(self.cwd.join(path));
        }
        self.config.corpus.path.clone().ok_or_else(|| {
            eprintln!("error: no corpus path defined in configuration");
            eprintln!("Run 'kwic init' to create a configuration file, or pass --corpus.");
            ExitCode::FAILURE
        })
    }
}

/// Returns the current working directory or exits with a consistent error.
fn current_dir_or_failure() -> Result<PathBuf, ExitCode> {
    env::current_dir().map_err(|e| {
        eprintln!("error: could not determine current directory: {e}");
        ExitCode::FAILURE
    })
}
