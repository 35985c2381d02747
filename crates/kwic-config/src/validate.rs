//! Configuration validation.
//!
//! Validates a loaded configuration and reports warnings for potential issues.

use std::{fmt, fs, path::Path};

use globset::{Glob, GlobMatcher};

use crate::Config;

/// A non-fatal warning about the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    /// No corpus path is configured.
    NoCorpusDefined,
    /// The corpus path does not exist.
    CorpusPathMissing {
        /// Path that doesn't exist.
        path: String,
    },
    /// The corpus path exists but is not a directory.
    CorpusPathNotDirectory {
        /// Path that is not a directory.
        path: String,
    },
    /// An include pattern doesn't match any files.
    IncludePatternMatchesNothing {
        /// Pattern that matched nothing.
        pattern: String,
    },
    /// The metadata file does not exist.
    MetadataPathMissing {
        /// Path that doesn't exist.
        path: String,
    },
    /// A window radius of zero yields single-token windows.
    ZeroWindow,
    /// A parallelism of zero is treated as sequential scanning.
    ZeroParallelism,
    /// A batch size of zero is treated as one.
    ZeroBatchSize,
    /// A sampling ceiling of zero makes every random window fail.
    ZeroMaxAttempts,
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCorpusDefined => write!(f, "no corpus path is defined in configuration"),
            Self::CorpusPathMissing { path } => write!(f, "corpus path does not exist: {path}"),
            Self::CorpusPathNotDirectory { path } => {
                write!(f, "corpus path is not a directory: {path}")
            }
            Self::IncludePatternMatchesNothing { pattern } => {
                write!(f, "include pattern '{pattern}' matches no files")
            }
            Self::MetadataPathMissing { path } => {
                write!(f, "metadata file does not exist: {path}")
            }
            Self::ZeroWindow => write!(f, "search.window is 0: windows hold a single token"),
            Self::ZeroParallelism => {
                write!(f, "search.parallelism is 0: scanning sequentially")
            }
            Self::ZeroBatchSize => write!(f, "output.batch_size is 0: flushing every record"),
            Self::ZeroMaxAttempts => {
                write!(f, "search.max_attempts is 0: random sampling cannot succeed")
            }
        }
    }
}

/// Validates the configuration and returns any warnings.
pub fn validate_config(config: &Config) -> Vec<ConfigWarning> {
    let mut warnings = validate_corpus(config);

    if let Some(metadata) = &config.metadata
        && !metadata.path.is_file()
    {
        warnings.push(ConfigWarning::MetadataPathMissing {
            path: metadata.path.display().to_string(),
        });
    }

    if config.search.window == 0 {
        warnings.push(ConfigWarning::ZeroWindow);
    }
    if config.search.parallelism == Some(0) {
        warnings.push(ConfigWarning::ZeroParallelism);
    }
    if config.search.max_attempts == 0 {
        warnings.push(ConfigWarning::ZeroMaxAttempts);
    }
    if config.output.batch_size == 0 {
        warnings.push(ConfigWarning::ZeroBatchSize);
    }

    warnings
}

/// Validates the corpus root and its include patterns.
fn validate_corpus(config: &Config) -> Vec<ConfigWarning> {
    let Some(path) = &config.corpus.path else {
        return vec![ConfigWarning::NoCorpusDefined];
    };

    if !path.exists() {
        return vec![ConfigWarning::CorpusPathMissing {
            path: path.display().to_string(),
        }];
    }

    if !path.is_dir() {
        return vec![ConfigWarning::CorpusPathNotDirectory {
            path: path.display().to_string(),
        }];
    }

    config
        .corpus
        .include
        .iter()
        .filter(|pattern| !pattern_matches_any_file(path, pattern))
        .map(|pattern| ConfigWarning::IncludePatternMatchesNothing {
            pattern: pattern.clone(),
        })
        .collect()
}

/// Checks if a glob pattern matches any files in a directory.
fn pattern_matches_any_file(root: &Path, pattern: &str) -> bool {
    let Ok(glob) = Glob::new(pattern) else {
        return false; // Invalid pattern, reported when compiling
    };
    let matcher = glob.compile_matcher();

    walk_and_match(root, root, &matcher)
}

/// Recursively walks a directory and checks if any file matches the pattern.
fn walk_and_match(root: &Path, current: &Path, matcher: &GlobMatcher) -> bool {
    let Ok(entries) = fs::read_dir(current) else {
        return false;
    };

    for entry in entries.flatten() {
        let path = entry.path();

        let Ok(relative) = path.strip_prefix(root) else {
            continue;
        };

        if path.is_file() && matcher.is_match(relative) {
            return true;
        }

        if path.is_dir() && walk_and_match(root, &path, matcher) {
            return true;
        }
    }

    false
}
