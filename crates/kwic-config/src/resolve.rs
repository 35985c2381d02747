//! Resolution of raw config values.
//!
//! Paths in a config file are relative to the directory holding that file. Delimiters are
//! written as strings in TOML but used as single bytes by the table readers and writers.

use std::path::{Path, PathBuf};

use crate::ConfigError;

/// Resolves a configured path against the directory of the config file declaring it.
///
/// Absolute paths are returned unchanged. The path is not required to exist; validation
/// reports missing paths as warnings.
pub fn resolve_path(path: &str, config_dir: &Path) -> PathBuf {
    let path = Path::new(path);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        config_dir.join(path)
    }
}

/// Parses a delimiter setting into a single byte.
///
/// Accepts exactly one ASCII character, plus the escapes `\t` and `tab` for a tab.
pub fn parse_delimiter(value: &str, config_path: &Path) -> Result<u8, ConfigError> {
    let delimiter = match value {
        "\\t" | "tab" => "\t",
        other => other,
    };
    match delimiter.as_bytes() {
        [byte] if byte.is_ascii() => Ok(*byte),
        _ => Err(ConfigError::InvalidDelimiter {
            path: config_path.to_path_buf(),
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_relative_path() {
        let resolved = resolve_path("./corpus", Path::new("/work/project"));
        assert_eq!(resolved, PathBuf::from("/work/project/./corpus"));
    }

    #[test]
    fn test_resolve_absolute_path() {
        let resolved = resolve_path("/data/latin", Path::new("/work/project"));
        assert_eq!(resolved, PathBuf::from("/data/latin"));
    }

    #[test]
    fn test_parse_delimiter_variants() {
        let path = Path::new("cfg.toml");
        assert_eq!(parse_delimiter("\t", path).unwrap(), b'\t');
        assert_eq!(parse_delimiter("\\t", path).unwrap(), b'\t');
        assert_eq!(parse_delimiter("tab", path).unwrap(), b'\t');
        assert_eq!(parse_delimiter(",", path).unwrap(), b',');
    }

    #[test]
    fn test_parse_delimiter_rejects_multichar() {
        let path = Path::new("cfg.toml");
        assert!(matches!(
            parse_delimiter(";;", path),
            Err(ConfigError::InvalidDelimiter { .. })
        ));
        assert!(parse_delimiter("", path).is_err());
        assert!(parse_delimiter("§", path).is_err());
    }
}
