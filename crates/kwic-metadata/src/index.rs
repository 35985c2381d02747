//! The metadata index: identifier to composition date.

use std::{
    collections::{BTreeMap, HashMap},
    fs,
    path::Path,
};

use tracing::{debug, warn};

use crate::{MetadataError, parse_period};

/// Options controlling how a metadata file is read.
#[derive(Debug, Clone)]
pub struct MetadataOptions {
    /// Field delimiter byte.
    pub delimiter: u8,
    /// Header of the composition date column.
    pub date_column: String,
}

impl Default for MetadataOptions {
    fn default() -> Self {
        Self {
            delimiter: b'\t',
            date_column: String::from("date of composition"),
        }
    }
}

/// Metadata for one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataRecord {
    /// Composition year; negative for BCE.
    pub date: i32,
    /// Remaining columns of the row, keyed by header.
    pub fields: BTreeMap<String, String>,
}

/// Read-only lookup from document identifier to metadata.
#[derive(Debug, Clone, Default)]
pub struct MetadataIndex {
    /// Records keyed by identifier.
    records: HashMap<String, MetadataRecord>,
}

impl MetadataIndex {
    /// Loads a delimiter-separated metadata file.
    ///
    /// The first column is the identifier; the date column is located by header. Bytes
    /// that are not valid UTF-8 are read as Latin-1. Fails on the first row whose date
    /// cannot be parsed.
    pub fn load(path: &Path, options: &MetadataOptions) -> Result<Self, MetadataError> {
        let bytes = fs::read(path).map_err(|source| MetadataError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        let text = decode(bytes);

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(options.delimiter)
            .flexible(true)
            .from_reader(text.as_bytes());
        let csv_error = |source| MetadataError::Csv {
            path: path.to_path_buf(),
            source,
        };

        let headers = reader.headers().map_err(csv_error)?.clone();
        let date_idx = headers
            .iter()
            .position(|h| h.trim() == options.date_column)
            .ok_or_else(|| MetadataError::MissingColumn {
                path: path.to_path_buf(),
                column: options.date_column.clone(),
            })?;

        let mut records = HashMap::new();
        for row in reader.records() {
            let row = row.map_err(csv_error)?;
            let line = row.position().map_or(0, |p| p.line());
            let Some(identifier) = row.get(0).map(str::trim).filter(|s| !s.is_empty()) else {
                debug!(line, "skipping metadata row without identifier");
                continue;
            };

            let raw_date = row.get(date_idx).unwrap_or_default();
            let date = parse_period(raw_date).map_err(|e| MetadataError::InvalidRow {
                path: path.to_path_buf(),
                line,
                identifier: identifier.to_string(),
                source: Box::new(e),
            })?;

            let fields = headers
                .iter()
                .zip(row.iter())
                .enumerate()
                .filter(|(idx, _)| *idx != 0 && *idx != date_idx)
                .map(|(_, (header, value))| (header.to_string(), value.to_string()))
                .collect();

            if records
                .insert(identifier.to_string(), MetadataRecord { date, fields })
                .is_some()
            {
                warn!(
                    identifier,
                    line, "duplicate metadata identifier, keeping the later row"
                );
            }
        }

        debug!(path = %path.display(), records = records.len(), "loaded metadata");
        Ok(Self { records })
    }

    /// Builds an index from identifier/date pairs.
    pub fn from_dates<I, S>(dates: I) -> Self
    where
        I: IntoIterator<Item = (S, i32)>,
        S: Into<String>,
    {
        let records = dates
            .into_iter()
            .map(|(id, date)| {
                (
                    id.into(),
                    MetadataRecord {
                        date,
                        fields: BTreeMap::new(),
                    },
                )
            })
            .collect();
        Self { records }
    }

    /// Returns the composition date of a document.
    ///
    /// Accepts a bare identifier or a path; only the final `/`-separated component is
    /// used for the lookup.
    pub fn date_of(&self, identifier: &str) -> Result<i32, MetadataError> {
        self.get(identifier)
            .map(|record| record.date)
            .ok_or_else(|| MetadataError::UnknownIdentifier {
                identifier: identifier.to_string(),
            })
    }

    /// Returns the full record of a document, if present.
    pub fn get(&self, identifier: &str) -> Option<&MetadataRecord> {
        self.records.get(basename(identifier))
    }

    /// Number of indexed documents.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the index holds no documents.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Strips any leading directories from an identifier.
fn basename(identifier: &str) -> &str {
    identifier.rsplit(['/', '\\']).next().unwrap_or(identifier)
}

/// Decodes file contents as UTF-8, falling back to Latin-1.
fn decode(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => e.into_bytes().into_iter().map(char::from).collect(),
    }
}
