//! Search jobs for kwic.
//!
//! A [`SearchJob`] runs two passes over a corpus. The match pass cuts a window around
//! every occurrence of the target terms and counts windows per document. The random pass
//! then draws the same number of term-free, non-overlapping control windows from each of
//! those documents. Both passes push [`Record`]s into a [`RecordSink`], usually a
//! [`TableWriter`].

#![warn(missing_docs)]

mod error;
mod job;
mod record;
mod table;

pub use error::SearchError;
pub use job::{JobParams, JobSummary, MatchReport, RandomReport, SearchJob};
pub use record::{Record, RecordSink};
pub use table::{
    DEFAULT_BATCH_SIZE, ImportedTables, OutputTables, TableWriter, count_by_source, read_table,
};
