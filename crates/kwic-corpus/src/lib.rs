//! Corpus access for kwic.
//!
//! A [`CorpusRepository`] holds one [`TextDocument`](kwic_document::TextDocument) per file
//! under a corpus root and answers which documents mention a set of terms, optionally
//! spreading the scan over a pool of worker threads.

#![warn(missing_docs)]

mod discovery;
mod error;
mod repository;

pub use discovery::discover_files;
pub use error::CorpusError;
pub use repository::{CorpusOptions, CorpusRepository, ScanReport, SkippedDocument};
