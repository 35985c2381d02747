//! Error types for metadata loading and lookup.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Errors that can occur when loading or querying document metadata.
#[derive(Debug, Error)]
pub enum MetadataError {
    /// Failed to read the metadata file.
    #[error("failed to read metadata file {path}: {source}")]
    ReadFile {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The metadata file is not well-formed delimiter-separated data.
    #[error("malformed metadata file {path}: {source}")]
    Csv {
        /// Path to the malformed file.
        path: PathBuf,
        /// Underlying CSV error.
        source: csv::Error,
    },

    /// The header row lacks the composition date column.
    #[error("metadata file {path} has no '{column}' column")]
    MissingColumn {
        /// Path to the metadata file.
        path: PathBuf,
        /// The missing column header.
        column: String,
    },

    /// A date field could not be parsed.
    #[error("cannot parse date {value:?}: {reason}")]
    Parse {
        /// The raw field value.
        value: String,
        /// Why parsing failed.
        reason: String,
    },

    /// A row of the metadata file carries an unparseable date.
    #[error("{path}:{line}: invalid date for '{identifier}': {source}")]
    InvalidRow {
        /// Path to the metadata file.
        path: PathBuf,
        /// One-based line number of the row.
        line: u64,
        /// Identifier of the row.
        identifier: String,
        /// The date parse failure.
        #[source]
        source: Box<Self>,
    },

    /// The identifier is not present in the index.
    #[error("unknown identifier: {identifier}")]
    UnknownIdentifier {
        /// The identifier that was looked up.
        identifier: String,
    },
}
