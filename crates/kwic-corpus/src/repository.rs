//! The corpus repository and its term scan.

use std::{
    collections::BTreeMap,
    num::NonZeroUsize,
    path::{Path, PathBuf},
    sync::Arc,
};

use kwic_config::CompiledPatterns;
use kwic_document::TextDocument;
use kwic_metadata::MetadataIndex;
use rayon::{ThreadPoolBuilder, prelude::*};
use tracing::{debug, info, warn};

use crate::{CorpusError, discover_files};

/// Options applied to every document of a corpus.
#[derive(Debug, Clone, Default)]
pub struct CorpusOptions {
    /// Lowercase clean tokens.
    pub lowercase: bool,
}

/// A document that could not be scanned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedDocument {
    /// Document identifier.
    pub name: String,
    /// Why the document was skipped.
    pub reason: String,
}

/// Result of a term scan over the corpus.
#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    /// Identifiers of documents containing at least one term. Order is unspecified.
    pub matches: Vec<String>,
    /// Documents that failed to read.
    pub skipped: Vec<SkippedDocument>,
    /// Documents tested.
    pub scanned: usize,
}

impl ScanReport {
    /// Appends another shard's results.
    fn merge(mut self, other: Self) -> Self {
        self.matches.extend(other.matches);
        self.skipped.extend(other.skipped);
        self.scanned += other.scanned;
        self
    }
}

/// All documents of a corpus, keyed by basename.
///
/// The set of documents is fixed at construction; only their caches change afterwards.
#[derive(Debug)]
pub struct CorpusRepository {
    /// Corpus root directory.
    root: PathBuf,
    /// Documents keyed by identifier.
    documents: BTreeMap<String, TextDocument>,
    /// Index shared by every document.
    metadata: Option<Arc<MetadataIndex>>,
}

impl CorpusRepository {
    /// Builds a repository from every file under `root` selected by `patterns`.
    ///
    /// When two files share a basename, the later one in path order wins.
    pub fn open(
        root: &Path,
        options: &CorpusOptions,
        patterns: &CompiledPatterns,
        metadata: Option<Arc<MetadataIndex>>,
    ) -> Result<Self, CorpusError> {
        let files = discover_files(root, patterns)?;
        let repo = Self::from_paths(root, files, options, metadata);
        info!(root = %root.display(), documents = repo.len(), "opened corpus");
        Ok(repo)
    }

    /// Builds a repository from an explicit list of files.
    pub fn from_paths<I>(
        root: &Path,
        paths: I,
        options: &CorpusOptions,
        metadata: Option<Arc<MetadataIndex>>,
    ) -> Self
    where
        I: IntoIterator<Item = PathBuf>,
    {
        let mut documents = BTreeMap::new();
        for path in paths {
            let mut doc = TextDocument::new(path).with_lowercase(options.lowercase);
            if let Some(index) = &metadata {
                doc = doc.with_metadata(Arc::clone(index));
            }
            let name = doc.name().to_string();
            if let Some(previous) = documents.insert(name, doc) {
                warn!(
                    name = previous.name(),
                    replaced = %previous.path().display(),
                    "duplicate document name, keeping the later file"
                );
            }
        }

        Self {
            root: root.to_path_buf(),
            documents,
            metadata,
        }
    }

    /// Corpus root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the document with the given identifier.
    pub fn get(&self, name: &str) -> Result<&TextDocument, CorpusError> {
        self.documents
            .get(name)
            .ok_or_else(|| CorpusError::UnknownDocument {
                name: name.to_string(),
            })
    }

    /// Returns the document with the given identifier for cache access.
    pub fn get_mut(&mut self, name: &str) -> Result<&mut TextDocument, CorpusError> {
        self.documents
            .get_mut(name)
            .ok_or_else(|| CorpusError::UnknownDocument {
                name: name.to_string(),
            })
    }

    /// Number of documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Returns true if the corpus holds no documents.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Document identifiers in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.documents.keys().map(String::as_str)
    }

    /// The metadata index attached to every document, if any.
    pub fn metadata(&self) -> Option<&Arc<MetadataIndex>> {
        self.metadata.as_ref()
    }

    /// Drops the caches of every document.
    pub fn purge_all(&mut self) {
        self.documents.values_mut().for_each(TextDocument::purge);
    }

    /// Finds the documents whose raw text contains any of `terms`.
    ///
    /// Without `parallelism` documents are tested one after another. With `Some(n)` the
    /// documents are split into `n` contiguous shards, each scanned by its own worker of
    /// an `n`-thread pool. Every document is purged right after it is tested. Documents
    /// that cannot be read are skipped and listed in the report.
    pub fn find<S>(
        &mut self,
        terms: &[S],
        parallelism: Option<NonZeroUsize>,
    ) -> Result<ScanReport, CorpusError>
    where
        S: AsRef<str> + Sync,
    {
        let mut documents: Vec<&mut TextDocument> = self.documents.values_mut().collect();

        let report = match parallelism {
            None => scan_shard(&mut documents, terms),
            Some(workers) => {
                let shard_len = documents.len().div_ceil(workers.get()).max(1);
                let pool = ThreadPoolBuilder::new()
                    .num_threads(workers.get())
                    .thread_name(|i| format!("kwic-scan-{i}"))
                    .build()?;
                let shards: Vec<ScanReport> = pool.install(|| {
                    documents
                        .par_chunks_mut(shard_len)
                        .map(|shard| scan_shard(shard, terms))
                        .collect()
                });
                shards.into_iter().fold(ScanReport::default(), ScanReport::merge)
            }
        };

        info!(
            scanned = report.scanned,
            matches = report.matches.len(),
            skipped = report.skipped.len(),
            workers = parallelism.map_or(1, NonZeroUsize::get),
            "corpus scan complete"
        );
        Ok(report)
    }
}

/// Tests each document of a shard for the terms, purging it afterwards.
fn scan_shard<S: AsRef<str>>(shard: &mut [&mut TextDocument], terms: &[S]) -> ScanReport {
    let mut report = ScanReport::default();
    for doc in shard.iter_mut() {
        match doc.has_any(terms) {
            Ok(true) => {
                debug!(document = doc.name(), "document matches");
                report.matches.push(doc.name().to_string());
            }
            Ok(false) => {}
            Err(e) => {
                warn!(document = doc.name(), error = %e, "skipping unreadable document");
                report.skipped.push(SkippedDocument {
                    name: doc.name().to_string(),
                    reason: e.to_string(),
                });
            }
        }
        doc.purge();
        report.scanned += 1;
    }
    report
}
