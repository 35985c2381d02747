//! Error types for corpus construction and scanning.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when building or scanning a corpus.
#[derive(Debug, Error)]
pub enum CorpusError {
    /// The corpus root does not exist.
    #[error("corpus root not found: {path}")]
    RootNotFound {
        /// The missing directory.
        path: PathBuf,
    },

    /// The corpus root could not be traversed.
    #[error("failed to walk corpus root {path}: {source}")]
    Walk {
        /// The corpus root.
        path: PathBuf,
        /// Underlying traversal error.
        source: walkdir::Error,
    },

    /// No document has the requested identifier.
    #[error("unknown document: {name}")]
    UnknownDocument {
        /// The identifier that was looked up.
        name: String,
    },

    /// The scan worker pool could not be started.
    #[error("failed to start scan workers: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}
