//! Configuration system for kwic.
//!
//! kwic uses TOML configuration files named `.kwic.toml`. Configuration is resolved by
//! walking up the directory tree from the current working directory, collecting any
//! `.kwic.toml` files found until one sets `root = true`. Closer files take precedence.

#![warn(missing_docs)]

mod discovery;
mod error;
mod merge;
mod parse;
mod patterns;
mod resolve;
mod templates;
#[cfg(test)]
mod test_support;
mod validate;

use std::path::{Path, PathBuf};

pub use discovery::{CONFIG_FILENAME, discover_config_files};
pub use error::ConfigError;
pub use merge::{ParsedConfig, merge_configs};
pub use parse::{
    RawConfig, RawCorpusSettings, RawMetadataSettings, RawOutputSettings, RawSearchSettings,
    parse_config_file, parse_config_str,
};
pub use patterns::CompiledPatterns;
pub use resolve::{parse_delimiter, resolve_path};
pub use templates::local_template;
pub use validate::ConfigWarning;
use validate::validate_config;

/// Default include patterns when none are specified.
pub const DEFAULT_INCLUDE_PATTERNS: &[&str] = &["**/*"];

/// Default table base name.
pub const DEFAULT_OUTPUT_NAME: &str = "results";

/// Top-level merged configuration for kwic.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Corpus location and normalization.
    pub corpus: CorpusSettings,
    /// Metadata file, if one is configured.
    pub metadata: Option<MetadataSettings>,
    /// Search job parameters.
    pub search: SearchSettings,
    /// Output table settings.
    pub output: OutputSettings,
    /// Directory containing the most specific config file.
    pub config_root: Option<PathBuf>,
}

impl Config {
    /// Loads configuration by discovering and merging all relevant `.kwic.toml` files.
    ///
    /// Returns `Ok(Config::default())` if no configuration files are found.
    pub fn load(cwd: &Path) -> Result<Self, ConfigError> {
        let config_files = discover_config_files(cwd);
        Self::load_from_files(&config_files)
    }

    /// Loads configuration from a specific list of config file paths.
    ///
    /// Files should be provided in precedence order: highest precedence first.
    pub fn load_from_files(files: &[PathBuf]) -> Result<Self, ConfigError> {
        if files.is_empty() {
            return Ok(Self::default());
        }

        let parsed: Vec<ParsedConfig> = files
            .iter()
            .map(|path| {
                let config = parse_config_file(path)?;
                Ok(ParsedConfig {
                    path: path.clone(),
                    config,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        merge_configs(&parsed)
    }

    /// Compiles the corpus include/exclude patterns.
    pub fn compile_patterns(&self) -> Result<CompiledPatterns, ConfigError> {
        CompiledPatterns::compile(&self.corpus.include, &self.corpus.exclude)
    }

    /// Validates the configuration and returns any warnings.
    pub fn validate(&self) -> Vec<ConfigWarning> {
        validate_config(self)
    }
}

/// Corpus settings.
#[derive(Debug, Clone)]
pub struct CorpusSettings {
    /// Resolved corpus root.
    pub path: Option<PathBuf>,
    /// Whether clean tokens are lowercased.
    pub lowercase: bool,
    /// Include patterns, relative to the corpus root.
    pub include: Vec<String>,
    /// Exclude patterns, relative to the corpus root.
    pub exclude: Vec<String>,
}

impl Default for CorpusSettings {
    fn default() -> Self {
        Self {
            path: None,
            lowercase: false,
            include: DEFAULT_INCLUDE_PATTERNS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            exclude: Vec::new(),
        }
    }
}

/// Metadata file settings.
#[derive(Debug, Clone)]
pub struct MetadataSettings {
    /// Resolved metadata file path.
    pub path: PathBuf,
    /// Field delimiter byte.
    pub delimiter: u8,
    /// Header of the composition date column.
    pub date_column: String,
}

impl MetadataSettings {
    /// Default date column header.
    pub const DEFAULT_DATE_COLUMN: &'static str = "date of composition";

    /// Creates metadata settings with default delimiter and column.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            delimiter: b'\t',
            date_column: Self::DEFAULT_DATE_COLUMN.to_string(),
        }
    }
}

/// Search job settings.
#[derive(Debug, Clone)]
pub struct SearchSettings {
    /// Target terms.
    pub targets: Vec<String>,
    /// Window radius.
    pub window: usize,
    /// Drop the matched token from emitted windows.
    pub ignore_center: bool,
    /// Number of scan workers; `None` scans sequentially.
    pub parallelism: Option<usize>,
    /// Purge document caches as soon as a pass is done with them.
    pub memory_efficient: bool,
    /// Run the random pass after the match pass.
    pub with_random: bool,
    /// Consecutive rejected candidates allowed per random window.
    pub max_attempts: usize,
    /// Seed for the random pass.
    pub seed: Option<u64>,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            targets: Vec::new(),
            window: 50,
            ignore_center: true,
            parallelism: None,
            memory_efficient: true,
            with_random: true,
            max_attempts: 1_000,
            seed: None,
        }
    }
}

/// Output table settings.
#[derive(Debug, Clone)]
pub struct OutputSettings {
    /// Resolved table base name (without extension).
    pub name: Option<PathBuf>,
    /// Field delimiter byte.
    pub delimiter: u8,
    /// Records buffered between flushes.
    pub batch_size: usize,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            name: None,
            delimiter: b'\t',
            batch_size: 50,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_settings_defaults() {
        let search = SearchSettings::default();
        assert!(search.targets.is_empty());
        assert_eq!(search.window, 50);
        assert!(search.ignore_center);
        assert!(search.parallelism.is_none());
        assert!(search.memory_efficient);
        assert!(search.with_random);
        assert_eq!(search.max_attempts, 1_000);
    }

    #[test]
    fn test_corpus_settings_defaults() {
        let corpus = CorpusSettings::default();
        assert!(corpus.path.is_none());
        assert!(!corpus.lowercase);
        assert_eq!(corpus.include, vec!["**/*"]);
        assert!(corpus.exclude.is_empty());
    }

    #[test]
    fn test_output_settings_defaults() {
        let output = OutputSettings::default();
        assert!(output.name.is_none());
        assert_eq!(output.delimiter, b'\t');
        assert_eq!(output.batch_size, 50);
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.metadata.is_none());
        assert!(config.config_root.is_none());
    }

    #[test]
    fn test_metadata_settings_new() {
        let settings = MetadataSettings::new(PathBuf::from("meta.tsv"));
        assert_eq!(settings.delimiter, b'\t');
        assert_eq!(settings.date_column, "date of composition");
    }
}
