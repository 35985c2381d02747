//! Output rows and the sinks that receive them.

use serde::{Deserialize, Serialize};

use crate::SearchError;

/// One row of an output table: a window of one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Composition year of the source document; empty without metadata.
    pub date: Option<i32>,
    /// Identifier of the source document.
    pub source: String,
    /// Window tokens joined by single spaces.
    pub tokens: String,
}

/// Destination for records produced by a job pass.
pub trait RecordSink {
    /// Accepts one record.
    fn push(&mut self, record: Record) -> Result<(), SearchError>;
}

impl RecordSink for Vec<Record> {
    fn push(&mut self, record: Record) -> Result<(), SearchError> {
        Vec::push(self, record);
        Ok(())
    }
}
