//! Error types for document access.

use std::{io, path::PathBuf};

use kwic_metadata::MetadataError;
use thiserror::Error;

/// Errors that can occur when reading or querying a document.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// Failed to read a file.
    #[error("failed to read file {path}: {source}")]
    ReadFile {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The composition date could not be resolved.
    #[error(transparent)]
    Metadata(#[from] MetadataError),
}
