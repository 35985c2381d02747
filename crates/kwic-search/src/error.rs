//! Error types for search jobs and output tables.

use std::{io, path::PathBuf};

use kwic_corpus::CorpusError;
use kwic_metadata::MetadataError;
use thiserror::Error;

/// Errors that can occur while running a search job or reading its tables.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Corpus scan or lookup failed.
    #[error(transparent)]
    Corpus(#[from] CorpusError),

    /// A composition date could not be resolved.
    #[error(transparent)]
    Metadata(#[from] MetadataError),

    /// An output table could not be written or read.
    #[error("table {path}: {source}")]
    Table {
        /// Path to the table.
        path: PathBuf,
        /// Underlying CSV error.
        source: csv::Error,
    },

    /// An output table could not be flushed to disk.
    #[error("failed to write table {path}: {source}")]
    Io {
        /// Path to the table.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Job parameters are unusable.
    #[error("invalid search parameters: {0}")]
    InvalidParams(String),
}
