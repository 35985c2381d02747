//! Include/exclude pattern compilation and matching.
//!
//! Compiles the corpus glob patterns into matchers that decide which files under the
//! corpus root become documents.

use std::path::Path;

use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::{ConfigError, DEFAULT_INCLUDE_PATTERNS};

/// Compiled glob patterns for efficient file matching.
#[derive(Debug)]
pub struct CompiledPatterns {
    /// Compiled include patterns.
    include: GlobSet,
    /// Compiled exclude patterns.
    exclude: GlobSet,
}

impl CompiledPatterns {
    /// Compiles include/exclude patterns into matchers.
    pub fn compile(include: &[String], exclude: &[String]) -> Result<Self, ConfigError> {
        Ok(Self {
            include: build_set(include, "include")?,
            exclude: build_set(exclude, "exclude")?,
        })
    }

    /// Patterns matching every file.
    pub fn match_all() -> Result<Self, ConfigError> {
        let include: Vec<String> = DEFAULT_INCLUDE_PATTERNS
            .iter()
            .map(|s| (*s).to_string())
            .collect();
        Self::compile(&include, &[])
    }

    /// Checks if a path relative to the corpus root is selected.
    ///
    /// A file matches if it matches at least one include pattern
    /// and does not match any exclude pattern.
    pub fn matches(&self, path: &Path) -> bool {
        self.include.is_match(path) && !self.exclude.is_match(path)
    }
}

/// Builds a glob set from a list of patterns.
fn build_set(patterns: &[String], label: &str) -> Result<GlobSet, ConfigError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(compile_glob(pattern)?);
    }
    builder.build().map_err(|e| ConfigError::InvalidPattern {
        pattern: format!("<combined {label} patterns>"),
        source: e,
    })
}

/// Compiles a single glob pattern.
fn compile_glob(pattern: &str) -> Result<Glob, ConfigError> {
    Glob::new(pattern).map_err(|e| ConfigError::InvalidPattern {
        pattern: pattern.to_string(),
        source: e,
    })
}
