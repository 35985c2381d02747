//! Integration tests for kwic-config.
//!
//! Tests the full configuration loading pipeline: discovery -> parse -> merge -> validate.

// Integration tests live outside cfg(test) by design
#![allow(clippy::tests_outside_test_module)]

use std::{
    fs,
    path::{Path, PathBuf},
};

use kwic_config::{Config, ConfigError, ConfigWarning};

/// Test helper to create a temporary directory structure for tests.
struct TestEnv {
    root: tempfile::TempDir,
}

impl TestEnv {
    fn new() -> Self {
        Self {
            root: tempfile::tempdir().unwrap(),
        }
    }

    fn path(&self) -> &Path {
        self.root.path()
    }

    /// Creates a directory and returns its path.
    fn create_dir(&self, rel_path: &str) -> PathBuf {
        let path = self.root.path().join(rel_path);
        fs::create_dir_all(&path).unwrap();
        path
    }

    /// Creates a file with content and returns its path.
    fn create_file(&self, rel_path: &str, content: &str) -> PathBuf {
        let path = self.root.path().join(rel_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }
}

#[test]
fn test_load_single_config() {
    let env = TestEnv::new();
    env.create_file("corpus/cicero.txt", "Gallia est omnis divisa");
    env.create_file("meta.tsv", "identifier\tdate of composition\ncicero.txt\t44 BCE\n");
    env.create_file(
        ".kwic.toml",
        r#"
root = true

[corpus]
path = "corpus"
lowercase = true

[metadata]
path = "meta.tsv"

[search]
targets = ["gallia"]
window = 2
"#,
    );

    let config = Config::load(env.path()).unwrap();
    assert_eq!(config.corpus.path, Some(env.path().join("corpus")));
    assert!(config.corpus.lowercase);
    assert_eq!(config.search.targets, vec!["gallia"]);
    assert_eq!(config.search.window, 2);
    assert!(config.validate().is_empty());
}

#[test]
fn test_nested_config_overrides_parent() {
    let env = TestEnv::new();
    env.create_file(
        ".kwic.toml",
        r#"
root = true

[search]
window = 10
parallelism = 4
"#,
    );
    let project = env.create_dir("project");
    env.create_file("project/.kwic.toml", "[search]\nwindow = 3\n");

    let config = Config::load(&project).unwrap();
    assert_eq!(config.search.window, 3);
    assert_eq!(config.search.parallelism, Some(4));
    assert_eq!(config.config_root, Some(project));
}

#[test]
fn test_load_reports_parse_error() {
    let env = TestEnv::new();
    env.create_file(".kwic.toml", "root = true\n[search\n");

    let result = Config::load(env.path());
    assert!(matches!(result, Err(ConfigError::ParseToml { .. })));
}

#[test]
fn test_load_from_files_empty_is_default() {
    let config = Config::load_from_files(&[]).unwrap();
    assert!(config.corpus.path.is_none());
    assert_eq!(config.validate(), vec![ConfigWarning::NoCorpusDefined]);
}

#[test]
fn test_compile_patterns_from_config() {
    let env = TestEnv::new();
    env.create_file(
        ".kwic.toml",
        r#"
root = true

[corpus]
path = "."
include = "**/*.txt"
exclude = ["drafts/**"]
"#,
    );

    let config = Config::load(env.path()).unwrap();
    let patterns = config.compile_patterns().unwrap();
    assert!(patterns.matches(Path::new("cicero.txt")));
    assert!(!patterns.matches(Path::new("drafts/cicero.txt")));
}
