//! Fixture trees for kwic-config unit tests.

use std::{
    fs,
    path::{Path, PathBuf},
};

use tempfile::TempDir;

use crate::discovery::CONFIG_FILENAME;

/// A temporary project holding config files and corpus documents.
pub struct TestDir {
    /// Owned temporary root.
    root: TempDir,
}

impl TestDir {
    /// Creates an empty project.
    pub fn new() -> Self {
        Self {
            root: tempfile::tempdir().unwrap(),
        }
    }

    /// Project root.
    pub fn path(&self) -> &Path {
        self.root.path()
    }

    /// Creates a directory below the root.
    pub fn create_dir(&self, rel_path: &str) -> PathBuf {
        let path = self.root.path().join(rel_path);
        fs::create_dir_all(&path).unwrap();
        path
    }

    /// Writes a document (or any other file) below the root.
    pub fn create_document(&self, rel_path: &str, text: &str) -> PathBuf {
        let path = self.root.path().join(rel_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, text).unwrap();
        path
    }

    /// Writes a `.kwic.toml` into `rel_dir`; an empty `rel_dir` is the root.
    pub fn write_config(&self, rel_dir: &str, content: &str) -> PathBuf {
        let config = self.create_dir(rel_dir).join(CONFIG_FILENAME);
        fs::write(&config, content).unwrap();
        config
    }

    /// Writes a `.kwic.toml` that stops discovery into `rel_dir`.
    pub fn write_root_config(&self, rel_dir: &str) -> PathBuf {
        self.write_config(rel_dir, "root = true\n")
    }
}
