//! Configuration file parsing.
//!
//! Parses individual `.kwic.toml` files into intermediate `RawConfig` structures
//! that preserve the optional nature of all fields before merging.

use std::{fs, path::Path};

use serde::Deserialize;
use serde_with::{OneOrMany, serde_as};
#[cfg(test)]
use toml::de::Error as TomlError;

use crate::ConfigError;

/// Raw configuration as parsed directly from a TOML file.
///
/// All fields are optional to support partial configs that will be merged.
/// This mirrors the TOML schema exactly.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// When true, stop discovery here - ignore parent configs.
    pub root: Option<bool>,
    /// Corpus section.
    pub corpus: Option<RawCorpusSettings>,
    /// Metadata section.
    pub metadata: Option<RawMetadataSettings>,
    /// Search section.
    pub search: Option<RawSearchSettings>,
    /// Output section.
    pub output: Option<RawOutputSettings>,
}

/// Raw corpus settings.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawCorpusSettings {
    /// Corpus root directory, relative to the config file.
    pub path: Option<String>,
    /// Lowercase clean tokens.
    pub lowercase: Option<bool>,
    /// Include patterns. Accepts a single string or an array.
    #[serde_as(as = "Option<OneOrMany<_>>")]
    pub include: Option<Vec<String>>,
    /// Exclude patterns. Accepts a single string or an array.
    #[serde_as(as = "Option<OneOrMany<_>>")]
    pub exclude: Option<Vec<String>>,
}

/// Raw metadata settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawMetadataSettings {
    /// Metadata file, relative to the config file.
    pub path: Option<String>,
    /// Field delimiter.
    pub delimiter: Option<String>,
    /// Header of the composition date column.
    pub date_column: Option<String>,
}

/// Raw search settings.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawSearchSettings {
    /// Target terms. Accepts a single string or an array.
    #[serde_as(as = "Option<OneOrMany<_>>")]
    pub targets: Option<Vec<String>>,
    /// Window radius.
    pub window: Option<usize>,
    /// Drop the matched token from emitted windows.
    pub ignore_center: Option<bool>,
    /// Number of scan workers.
    pub parallelism: Option<usize>,
    /// Purge document caches as soon as a pass is done with them.
    pub memory_efficient: Option<bool>,
    /// Run the random pass after the match pass.
    pub with_random: Option<bool>,
    /// Consecutive rejected candidates allowed per random window.
    pub max_attempts: Option<usize>,
    /// Seed for the random pass.
    pub seed: Option<u64>,
}

/// Raw output settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawOutputSettings {
    /// Table base name, relative to the config file.
    pub name: Option<String>,
    /// Field delimiter.
    pub delimiter: Option<String>,
    /// Records buffered between flushes.
    pub batch_size: Option<usize>,
}

/// Parses a configuration file from disk.
///
/// Returns a `RawConfig` with all fields as optionals, ready for merging.
pub fn parse_config_file(path: &Path) -> Result<RawConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;

    parse_config_str(&contents, path)
}

/// Parses configuration from a TOML string.
///
/// The `path` parameter is used for error reporting.
pub fn parse_config_str(contents: &str, path: &Path) -> Result<RawConfig, ConfigError> {
    toml::from_str(contents).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })
}

/// Parses configuration from a TOML string without path context (tests only).
#[cfg(test)]
pub fn parse_config(contents: &str) -> Result<RawConfig, TomlError> {
    toml::from_str(contents)
}

/// Checks if a config file has `root = true` set.
///
/// Returns false if the file cannot be read or parsed.
pub fn is_root_config(path: &Path) -> bool {
    let Ok(contents) = fs::read_to_string(path) else {
        return false;
    };
    let Ok(config) = toml::from_str::<RawConfig>(&contents) else {
        return false;
    };
    config.root == Some(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_config() {
        let config = parse_config_str("", Path::new("test.toml")).unwrap();
        assert!(config.corpus.is_none());
        assert!(config.metadata.is_none());
        assert!(config.search.is_none());
        assert!(config.output.is_none());
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[corpus]
path = "./latin"
lowercase = true
include = ["**/*.txt"]

[metadata]
path = "meta.tsv"
delimiter = "\t"

[search]
targets = ["ecclesia", "ecclesiis"]
window = 3
ignore_center = false
parallelism = 4
seed = 11

[output]
name = "ecclesia"
batch_size = 10
"#;
        let config = parse_config_str(toml, Path::new("test.toml")).unwrap();
        let corpus = config.corpus.unwrap();
        assert_eq!(corpus.path.as_deref(), Some("./latin"));
        assert_eq!(corpus.lowercase, Some(true));
        assert_eq!(corpus.include, Some(vec!["**/*.txt".to_string()]));
        assert!(corpus.exclude.is_none());

        let metadata = config.metadata.unwrap();
        assert_eq!(metadata.delimiter.as_deref(), Some("\t"));
        assert!(metadata.date_column.is_none());

        let search = config.search.unwrap();
        assert_eq!(search.targets.unwrap().len(), 2);
        assert_eq!(search.window, Some(3));
        assert_eq!(search.ignore_center, Some(false));
        assert_eq!(search.parallelism, Some(4));
        assert_eq!(search.seed, Some(11));
        assert!(search.max_attempts.is_none());

        let output = config.output.unwrap();
        assert_eq!(output.name.as_deref(), Some("ecclesia"));
        assert_eq!(output.batch_size, Some(10));
    }

    #[test]
    fn test_parse_single_string_lists() {
        let toml = r#"
[corpus]
exclude = "**/drafts/**"

[search]
targets = "ecclesia"
"#;
        let config = parse_config(toml).unwrap();
        assert_eq!(
            config.corpus.unwrap().exclude,
            Some(vec!["**/drafts/**".to_string()])
        );
        assert_eq!(
            config.search.unwrap().targets,
            Some(vec!["ecclesia".to_string()])
        );
    }

    #[test]
    fn test_parse_invalid_toml() {
        let result = parse_config_str("[search\nwindow = 3", Path::new("bad.toml"));
        assert!(matches!(result, Err(ConfigError::ParseToml { .. })));
    }

    #[test]
    fn test_parse_wrong_type() {
        let result = parse_config("[search]\nwindow = \"wide\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_is_root_config() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("root.toml");
        let plain = dir.path().join("plain.toml");
        fs::write(&root, "root = true\n").unwrap();
        fs::write(&plain, "[search]\nwindow = 2\n").unwrap();

        assert!(is_root_config(&root));
        assert!(!is_root_config(&plain));
        assert!(!is_root_config(&dir.path().join("missing.toml")));
    }
}
