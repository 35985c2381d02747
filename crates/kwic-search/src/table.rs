//! Tab-separated output tables.
//!
//! A job writes two tables next to each other: `<name>.csv` with the matched windows and
//! `<name>.rdm.csv` with the random control windows. Both have the header
//! `date  source  tokens`.

use std::{
    collections::BTreeMap,
    ffi::OsString,
    fs::File,
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::{Record, RecordSink, SearchError};

/// Default number of records buffered between flushes.
pub const DEFAULT_BATCH_SIZE: usize = 50;

/// Writes records to a table in batches.
///
/// Records are buffered and written every `batch_size` records. Call
/// [`finish`](Self::finish) to write the final partial batch.
#[derive(Debug)]
pub struct TableWriter {
    /// Destination path.
    path: PathBuf,
    /// Underlying CSV writer.
    writer: csv::Writer<File>,
    /// Records not yet written.
    batch: Vec<Record>,
    /// Records per batch.
    batch_size: usize,
    /// Records written so far.
    written: usize,
}

impl TableWriter {
    /// Creates (or truncates) the table at `path`.
    pub fn create(path: &Path, delimiter: u8, batch_size: usize) -> Result<Self, SearchError> {
        let writer = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .from_path(path)
            .map_err(|source| SearchError::Table {
                path: path.to_path_buf(),
                source,
            })?;
        let batch_size = batch_size.max(1);
        Ok(Self {
            path: path.to_path_buf(),
            writer,
            batch: Vec::with_capacity(batch_size),
            batch_size,
            written: 0,
        })
    }

    /// Path of the table being written.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes every buffered record and flushes the file.
    pub fn flush(&mut self) -> Result<(), SearchError> {
        for record in self.batch.drain(..) {
            self.writer
                .serialize(&record)
                .map_err(|source| SearchError::Table {
                    path: self.path.clone(),
                    source,
                })?;
            self.written += 1;
        }
        self.writer.flush().map_err(|source| SearchError::Io {
            path: self.path.clone(),
            source,
        })?;
        debug!(table = %self.path.display(), rows = self.written, "flushed table");
        Ok(())
    }

    /// Writes the final batch and returns the number of rows in the table.
    pub fn finish(mut self) -> Result<usize, SearchError> {
        self.flush()?;
        Ok(self.written)
    }
}

impl RecordSink for TableWriter {
    fn push(&mut self, record: Record) -> Result<(), SearchError> {
        self.batch.push(record);
        if self.batch.len() >= self.batch_size {
            self.flush()?;
        }
        Ok(())
    }
}

/// Reads every record of a table.
pub fn read_table(path: &Path, delimiter: u8) -> Result<Vec<Record>, SearchError> {
    let table_error = |source| SearchError::Table {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .from_path(path)
        .map_err(table_error)?;
    reader
        .deserialize()
        .collect::<Result<Vec<Record>, _>>()
        .map_err(table_error)
}

/// Location and format of a job's output tables.
#[derive(Debug, Clone)]
pub struct OutputTables {
    /// Base path; the table suffixes are appended to it.
    pub base: PathBuf,
    /// Field delimiter.
    pub delimiter: u8,
    /// Records buffered between flushes.
    pub batch_size: usize,
}

impl OutputTables {
    /// Tables at `base` with tab delimiters and the default batch size.
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self {
            base: base.into(),
            delimiter: b'\t',
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// Path of the matched-window table.
    pub fn match_path(&self) -> PathBuf {
        self.with_suffix(".csv")
    }

    /// Path of the random-window table.
    pub fn random_path(&self) -> PathBuf {
        self.with_suffix(".rdm.csv")
    }

    /// Opens a writer for the matched-window table.
    pub fn match_writer(&self) -> Result<TableWriter, SearchError> {
        TableWriter::create(&self.match_path(), self.delimiter, self.batch_size)
    }

    /// Opens a writer for the random-window table.
    pub fn random_writer(&self) -> Result<TableWriter, SearchError> {
        TableWriter::create(&self.random_path(), self.delimiter, self.batch_size)
    }

    /// Reads the tables back.
    ///
    /// The random table is only read when `with_random` is set, and is `None` if it does
    /// not exist.
    pub fn load(&self, with_random: bool) -> Result<ImportedTables, SearchError> {
        let matches = read_table(&self.match_path(), self.delimiter)?;
        let random_path = self.random_path();
        let random = if with_random && random_path.exists() {
            Some(read_table(&random_path, self.delimiter)?)
        } else {
            None
        };
        Ok(ImportedTables { matches, random })
    }

    /// Appends `suffix` to the base path.
    fn with_suffix(&self, suffix: &str) -> PathBuf {
        let mut path = OsString::from(self.base.as_os_str());
        path.push(suffix);
        PathBuf::from(path)
    }
}

/// Tables read back from disk.
#[derive(Debug, Clone, Default)]
pub struct ImportedTables {
    /// Matched windows.
    pub matches: Vec<Record>,
    /// Random windows, if that table was requested and exists.
    pub random: Option<Vec<Record>>,
}

/// Counts records per source document.
pub fn count_by_source(records: &[Record]) -> BTreeMap<&str, usize> {
    let mut counts = BTreeMap::new();
    for record in records {
        *counts.entry(record.source.as_str()).or_default() += 1;
    }
    counts
}
