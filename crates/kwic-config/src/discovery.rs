//! Configuration file discovery.
//!
//! Discovers `.kwic.toml` files by walking up the directory tree from a starting point.

use std::path::{Path, PathBuf};

use crate::parse::is_root_config;

/// The configuration filename.
pub const CONFIG_FILENAME: &str = ".kwic.toml";

/// Discovers all configuration files relevant to the given directory.
///
/// Returns paths in precedence order: closest to `cwd` first. Files closer to `cwd` have
/// higher precedence during merging. The walk stops at the first file with `root = true`.
///
/// Returns an empty vector if no configuration files are found.
pub fn discover_config_files(cwd: &Path) -> Vec<PathBuf> {
    let mut configs = Vec::new();

    let mut current = Some(cwd);
    while let Some(dir) = current {
        let config_path = dir.join(CONFIG_FILENAME);
        if config_path.is_file() {
            let is_root = is_root_config(&config_path);
            configs.push(config_path);
            if is_root {
                break;
            }
        }
        current = dir.parent();
    }

    configs
}
