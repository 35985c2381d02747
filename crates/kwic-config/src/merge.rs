//! Configuration merging.
//!
//! Merges multiple `RawConfig` files into a single resolved `Config`,
//! applying precedence rules and resolving paths.

use std::path::{Path, PathBuf};

use crate::{
    Config, ConfigError, CorpusSettings, MetadataSettings, OutputSettings, SearchSettings,
    parse::{
        RawConfig, RawCorpusSettings, RawMetadataSettings, RawOutputSettings, RawSearchSettings,
    },
    resolve::{parse_delimiter, resolve_path},
};

/// A parsed config file with its source path.
pub struct ParsedConfig {
    /// Path to the config file.
    pub path: PathBuf,
    /// Parsed raw configuration.
    pub config: RawConfig,
}

impl ParsedConfig {
    /// Directory holding the config file; relative paths resolve against it.
    fn dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("."))
    }
}

/// Merges multiple configuration files into a single resolved `Config`.
///
/// Configs should be provided in precedence order: highest precedence first (closest to
/// CWD). Every field takes the first defined value; list fields are replaced wholesale,
/// never concatenated.
pub fn merge_configs(configs: &[ParsedConfig]) -> Result<Config, ConfigError> {
    if configs.is_empty() {
        return Ok(Config::default());
    }

    let mut corpus = CorpusSettings::default();
    let mut metadata = MetadataMerge::default();
    let mut search = SearchSettings::default();
    let mut output = OutputSettings::default();

    // Iterate in reverse (lowest precedence first) so higher precedence overwrites
    for parsed in configs.iter().rev() {
        let dir = parsed.dir();
        if let Some(ref raw) = parsed.config.corpus {
            apply_raw_corpus(&mut corpus, raw, dir);
        }
        if let Some(ref raw) = parsed.config.metadata {
            apply_raw_metadata(&mut metadata, raw, parsed)?;
        }
        if let Some(ref raw) = parsed.config.search {
            apply_raw_search(&mut search, raw);
        }
        if let Some(ref raw) = parsed.config.output {
            apply_raw_output(&mut output, raw, parsed)?;
        }
    }

    let config_root = configs.first().map(|c| c.dir().to_path_buf());

    Ok(Config {
        corpus,
        metadata: metadata.finish(),
        search,
        output,
        config_root,
    })
}

/// Accumulates metadata fields; a path must be defined somewhere for the section to apply.
#[derive(Default)]
struct MetadataMerge {
    /// Resolved metadata path.
    path: Option<PathBuf>,
    /// Delimiter byte.
    delimiter: Option<u8>,
    /// Date column header.
    date_column: Option<String>,
}

impl MetadataMerge {
    /// Produces settings when a path was configured.
    fn finish(self) -> Option<MetadataSettings> {
        let mut settings = MetadataSettings::new(self.path?);
        if let Some(delimiter) = self.delimiter {
            settings.delimiter = delimiter;
        }
        if let Some(column) = self.date_column {
            settings.date_column = column;
        }
        Some(settings)
    }
}

/// Applies raw corpus settings to result.
fn apply_raw_corpus(result: &mut CorpusSettings, raw: &RawCorpusSettings, dir: &Path) {
    if let Some(ref v) = raw.path {
        result.path = Some(resolve_path(v, dir));
    }
    if let Some(v) = raw.lowercase {
        result.lowercase = v;
    }
    if let Some(ref v) = raw.include {
        result.include = v.clone();
    }
    if let Some(ref v) = raw.exclude {
        result.exclude = v.clone();
    }
}

/// Applies raw metadata settings to result.
fn apply_raw_metadata(
    result: &mut MetadataMerge,
    raw: &RawMetadataSettings,
    parsed: &ParsedConfig,
) -> Result<(), ConfigError> {
    if let Some(ref v) = raw.path {
        result.path = Some(resolve_path(v, parsed.dir()));
    }
    if let Some(ref v) = raw.delimiter {
        result.delimiter = Some(parse_delimiter(v, &parsed.path)?);
    }
    if let Some(ref v) = raw.date_column {
        result.date_column = Some(v.clone());
    }
    Ok(())
}

/// Applies raw search settings to result.
fn apply_raw_search(result: &mut SearchSettings, raw: &RawSearchSettings) {
    if let Some(ref v) = raw.targets {
        result.targets = v.clone();
    }
    if let Some(v) = raw.window {
        result.window = v;
    }
    if let Some(v) = raw.ignore_center {
        result.ignore_center = v;
    }
    if let Some(v) = raw.parallelism {
        result.parallelism = Some(v);
    }
    if let Some(v) = raw.memory_efficient {
        result.memory_efficient = v;
    }
    if let Some(v) = raw.with_random {
        result.with_random = v;
    }
    if let Some(v) = raw.max_attempts {
        result.max_attempts = v;
    }
    if let Some(v) = raw.seed {
        result.seed = Some(v);
    }
}

/// Applies raw output settings to result.
fn apply_raw_output(
    result: &mut OutputSettings,
    raw: &RawOutputSettings,
    parsed: &ParsedConfig,
) -> Result<(), ConfigError> {
    if let Some(ref v) = raw.name {
        result.name = Some(resolve_path(v, parsed.dir()));
    }
    if let Some(ref v) = raw.delimiter {
        result.delimiter = parse_delimiter(v, &parsed.path)?;
    }
    if let Some(v) = raw.batch_size {
        result.batch_size = v;
    }
    Ok(())
}
