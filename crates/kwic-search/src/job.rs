//! Search jobs: the match pass, the random pass, and table export.

use std::{collections::BTreeMap, num::NonZeroUsize, path::PathBuf};

use kwic_corpus::{CorpusRepository, SkippedDocument};
use kwic_document::{SamplingExhausted, SamplingOptions, WindowOptions};
use rand::{SeedableRng, rngs::StdRng};
use serde::Serialize;
use tracing::{info, warn};

use crate::{OutputTables, Record, RecordSink, SearchError};

/// Parameters of a search job.
#[derive(Debug, Clone)]
pub struct JobParams {
    /// Target terms; a window is cut around every clean token equal to one of them.
    pub targets: Vec<String>,
    /// Tokens kept on each side of a match.
    pub window: usize,
    /// Drop the matched token from its window.
    pub ignore_center: bool,
    /// Scan workers; `None` scans sequentially.
    pub parallelism: Option<NonZeroUsize>,
    /// Purge document caches as soon as each document is processed.
    pub memory_efficient: bool,
    /// Consecutive rejected candidates allowed per random window.
    pub max_attempts: usize,
    /// Seed for the random pass; `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for JobParams {
    fn default() -> Self {
        Self {
            targets: Vec::new(),
            window: 50,
            ignore_center: true,
            parallelism: None,
            memory_efficient: true,
            max_attempts: 1_000,
            seed: None,
        }
    }
}

impl JobParams {
    /// Parameters searching for `targets` with defaults otherwise.
    pub fn new<I, S>(targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            targets: targets.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Checks that the parameters can run a job.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.targets.is_empty() {
            return Err(SearchError::InvalidParams("no target terms given".into()));
        }
        if self.targets.iter().any(|t| t.trim().is_empty()) {
            return Err(SearchError::InvalidParams("target terms must not be blank".into()));
        }
        if self.max_attempts == 0 {
            return Err(SearchError::InvalidParams("max_attempts must be at least 1".into()));
        }
        Ok(())
    }
}

/// Outcome of the match pass.
#[derive(Debug, Clone, Default)]
pub struct MatchReport {
    /// Documents tested by the scan.
    pub scanned: usize,
    /// Documents whose raw text contains a target.
    pub matched_documents: usize,
    /// Matched windows emitted.
    pub windows: usize,
    /// Documents that could not be read.
    pub skipped: Vec<SkippedDocument>,
}

/// Outcome of the random pass.
#[derive(Debug, Clone, Default)]
pub struct RandomReport {
    /// Random windows emitted.
    pub windows: usize,
    /// Documents that yielded fewer random windows than matched windows.
    pub exhausted: Vec<SamplingExhausted>,
    /// Documents that could not be read.
    pub skipped: Vec<SkippedDocument>,
}

impl RandomReport {
    /// Total windows missing across exhausted documents.
    pub fn shortfall(&self) -> usize {
        self.exhausted.iter().map(SamplingExhausted::shortfall).sum()
    }
}

/// Summary of an exported job.
#[derive(Debug, Clone, Serialize)]
pub struct JobSummary {
    /// Documents tested by the scan.
    pub scanned: usize,
    /// Documents whose raw text contains a target.
    pub matched_documents: usize,
    /// Rows in the matched-window table.
    pub windows: usize,
    /// Path of the matched-window table.
    pub match_table: PathBuf,
    /// Rows in the random-window table, if it was written.
    pub random_windows: Option<usize>,
    /// Path of the random-window table, if it was written.
    pub random_table: Option<PathBuf>,
    /// Random windows that could not be produced.
    pub shortfall: usize,
    /// Documents whose random sample came up short.
    pub exhausted: Vec<String>,
    /// Documents skipped because they could not be read.
    pub skipped: Vec<String>,
}

/// A search over one corpus.
///
/// The match pass fills a per-document window counter that the random pass then consumes,
/// so [`random`](Self::random) samples as many control windows per document as
/// [`execute`](Self::execute) found matches.
#[derive(Debug)]
pub struct SearchJob {
    /// Corpus being searched.
    repo: CorpusRepository,
    /// Job parameters.
    params: JobParams,
    /// Matched windows per document from the last match pass.
    counts: BTreeMap<String, usize>,
    /// Generator for random windows.
    rng: StdRng,
}

impl SearchJob {
    /// Creates a job over `repo`.
    pub fn new(repo: CorpusRepository, params: JobParams) -> Result<Self, SearchError> {
        params.validate()?;
        let rng = match params.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Ok(Self {
            repo,
            params,
            counts: BTreeMap::new(),
            rng,
        })
    }

    /// Job parameters.
    pub fn params(&self) -> &JobParams {
        &self.params
    }

    /// The corpus being searched.
    pub fn repository(&self) -> &CorpusRepository {
        &self.repo
    }

    /// Matched windows per document from the last match pass.
    pub fn counts(&self) -> &BTreeMap<String, usize> {
        &self.counts
    }

    /// Runs the match pass, pushing one record per matched window into `sink`.
    ///
    /// Resets the window counter. Documents are processed in identifier order.
    pub fn execute<S: RecordSink>(&mut self, sink: &mut S) -> Result<MatchReport, SearchError> {
        self.counts.clear();
        let scan = self
            .repo
            .find(&self.params.targets, self.params.parallelism)?;

        let mut matched = scan.matches;
        matched.sort_unstable();
        let mut report = MatchReport {
            scanned: scan.scanned,
            matched_documents: matched.len(),
            windows: 0,
            skipped: scan.skipped,
        };

        let options = WindowOptions {
            window: self.params.window,
            ignore_center: self.params.ignore_center,
            release_after: self.params.memory_efficient,
        };
        for name in matched {
            let doc = self.repo.get_mut(&name)?;
            let date = doc.composed()?;
            let windows = match doc.find_windows(&self.params.targets, &options) {
                Ok(windows) => windows,
                Err(e) => {
                    warn!(document = %name, error = %e, "skipping unreadable document");
                    report.skipped.push(SkippedDocument {
                        name,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            if windows.is_empty() {
                continue;
            }
            for window in &windows {
                sink.push(Record {
                    date,
                    source: name.clone(),
                    tokens: window.text(),
                })?;
            }
            report.windows += windows.len();
            *self.counts.entry(name).or_default() += windows.len();
        }

        info!(
            documents = report.matched_documents,
            windows = report.windows,
            skipped = report.skipped.len(),
            "match pass complete"
        );
        Ok(report)
    }

    /// Runs the random pass, pushing one record per random window into `sink`.
    ///
    /// For every document counted by the last match pass, samples as many term-free,
    /// non-overlapping, full-width windows. Shortfalls are reported, never fatal.
    pub fn random<S: RecordSink>(&mut self, sink: &mut S) -> Result<RandomReport, SearchError> {
        let options = SamplingOptions {
            window: self.params.window,
            max_attempts: self.params.max_attempts,
            release_after: self.params.memory_efficient,
        };
        let mut report = RandomReport::default();

        for (name, &count) in self.counts.iter().filter(|(_, c)| **c > 0) {
            let doc = self.repo.get_mut(name)?;
            let date = doc.composed()?;
            let sample =
                match doc.random_windows(count, &self.params.targets, &options, &mut self.rng) {
                    Ok(sample) => sample,
                    Err(e) => {
                        warn!(document = %name, error = %e, "skipping unreadable document");
                        report.skipped.push(SkippedDocument {
                            name: name.clone(),
                            reason: e.to_string(),
                        });
                        continue;
                    }
                };

            for window in &sample.windows {
                sink.push(Record {
                    date,
                    source: name.clone(),
                    tokens: window.text(),
                })?;
            }
            report.windows += sample.windows.len();
            if let Some(exhausted) = sample.exhausted {
                warn!(%exhausted, "random sample short");
                report.exhausted.push(exhausted);
            }
        }

        info!(
            windows = report.windows,
            shortfall = report.shortfall(),
            "random pass complete"
        );
        Ok(report)
    }

    /// Runs the match pass into the matched-window table and, when `with_random` is set,
    /// the random pass into the random-window table.
    pub fn export(
        &mut self,
        tables: &OutputTables,
        with_random: bool,
    ) -> Result<JobSummary, SearchError> {
        let mut writer = tables.match_writer()?;
        let matched = self.execute(&mut writer)?;
        let match_table = writer.path().to_path_buf();
        let windows = writer.finish()?;

        let mut skipped: Vec<String> = matched.skipped.into_iter().map(|s| s.name).collect();
        let mut summary = JobSummary {
            scanned: matched.scanned,
            matched_documents: matched.matched_documents,
            windows,
            match_table,
            random_windows: None,
            random_table: None,
            shortfall: 0,
            exhausted: Vec::new(),
            skipped: Vec::new(),
        };

        if with_random {
            let mut writer = tables.random_writer()?;
            let random = self.random(&mut writer)?;
            summary.random_table = Some(writer.path().to_path_buf());
            summary.random_windows = Some(writer.finish()?);
            summary.shortfall = random.shortfall();
            summary.exhausted = random.exhausted.into_iter().map(|e| e.document).collect();
            skipped.extend(random.skipped.into_iter().map(|s| s.name));
        }

        skipped.sort_unstable();
        skipped.dedup();
        summary.skipped = skipped;
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use std::{fs, path::Path, sync::Arc};

    use kwic_corpus::CorpusOptions;
    use kwic_metadata::MetadataIndex;
    use tempfile::TempDir;

    use super::*;

    fn repo(
        root: &Path,
        docs: &[(&str, &str)],
        metadata: Option<MetadataIndex>,
    ) -> CorpusRepository {
        let paths: Vec<PathBuf> = docs
            .iter()
            .map(|(name, text)| {
                let path = root.join(name);
                fs::write(&path, text).unwrap();
                path
            })
            .collect();
        CorpusRepository::from_paths(
            root,
            paths,
            &CorpusOptions { lowercase: true },
            metadata.map(Arc::new),
        )
    }

    fn params(targets: &[&str], window: usize) -> JobParams {
        JobParams {
            window,
            seed: Some(7),
            ..JobParams::new(targets.iter().copied())
        }
    }

    fn filler(len: usize) -> String {
        (0..len)
            .map(|i| format!("w{}", "x".repeat(i % 5 + 1)))
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn validate_rejects_empty_targets() {
        assert!(matches!(
            JobParams::default().validate(),
            Err(SearchError::InvalidParams(_))
        ));
        assert!(JobParams::new([" "]).validate().is_err());
        assert!(JobParams::new(["ecclesia"]).validate().is_ok());
    }

    #[test]
    fn execute_emits_windows_and_counts() {
        let temp = TempDir::new().unwrap();
        let metadata = MetadataIndex::from_dates([("a.txt", 400), ("b.txt", -50)]);
        let docs = [
            ("a.txt", "in principio ecclesia erat et ecclesia dei"),
            ("b.txt", "nulla hic"),
        ];
        let corpus = repo(temp.path(), &docs, Some(metadata));
        let mut job = SearchJob::new(corpus, params(&["ecclesia"], 1)).unwrap();

        let mut records = Vec::new();
        let report = job.execute(&mut records).unwrap();
        assert_eq!(report.scanned, 2);
        assert_eq!(report.matched_documents, 1);
        assert_eq!(report.windows, 2);
        assert_eq!(job.counts().get("a.txt"), Some(&2));
        assert!(!job.counts().contains_key("b.txt"));

        let texts: Vec<_> = records.iter().map(|r| r.tokens.as_str()).collect();
        assert_eq!(texts, ["principio erat", "et dei"]);
        assert!(records.iter().all(|r| r.date == Some(400) && r.source == "a.txt"));
    }

    #[test]
    fn execute_resets_counts() {
        let temp = TempDir::new().unwrap();
        let corpus = repo(temp.path(), &[("a.txt", "ecclesia")], None);
        let mut job = SearchJob::new(corpus, params(&["ecclesia"], 2)).unwrap();

        job.execute(&mut Vec::new()).unwrap();
        job.execute(&mut Vec::new()).unwrap();
        assert_eq!(job.counts().get("a.txt"), Some(&1));
    }

    #[test]
    fn substring_only_matches_yield_no_count() {
        let temp = TempDir::new().unwrap();
        let corpus = repo(temp.path(), &[("a.txt", "ecclesiae magnae")], None);
        let mut job = SearchJob::new(corpus, params(&["ecclesia"], 2)).unwrap();

        let report = job.execute(&mut Vec::new()).unwrap();
        assert_eq!(report.matched_documents, 1);
        assert_eq!(report.windows, 0);
        assert!(job.counts().is_empty());
    }

    #[test]
    fn random_pass_matches_counts() {
        let temp = TempDir::new().unwrap();
        let text_a = format!("{} ecclesia {} ecclesia {}", filler(200), filler(150), filler(200));
        let text_b = format!("ecclesia {}", filler(300));
        let docs = [("a.txt", text_a.as_str()), ("b.txt", text_b.as_str())];

        for seed in 0..10 {
            let corpus = repo(temp.path(), &docs, None);
            let job_params = JobParams {
                seed: Some(seed),
                ..params(&["ecclesia"], 3)
            };
            let mut job = SearchJob::new(corpus, job_params).unwrap();
            let mut matched = Vec::new();
            job.execute(&mut matched).unwrap();
            let mut random = Vec::new();
            let report = job.random(&mut random).unwrap();

            assert!(report.exhausted.is_empty(), "seed {seed}");
            assert_eq!(random.len(), matched.len());
            for record in &random {
                assert_eq!(record.tokens.split(' ').count(), 7);
                assert!(!record.tokens.split(' ').any(|t| t == "ecclesia"));
            }
            let in_a = random.iter().filter(|r| r.source == "a.txt").count();
            assert_eq!(in_a, 2);
        }
    }

    #[test]
    fn random_pass_reports_shortfall() {
        let temp = TempDir::new().unwrap();
        let corpus = repo(temp.path(), &[("short.txt", "a ecclesia b")], None);
        let mut job = SearchJob::new(corpus, params(&["ecclesia"], 3)).unwrap();

        job.execute(&mut Vec::new()).unwrap();
        let mut random = Vec::new();
        let report = job.random(&mut random).unwrap();
        assert!(random.is_empty());
        assert_eq!(report.exhausted.len(), 1);
        assert_eq!(report.exhausted[0].document, "short.txt");
        assert_eq!(report.shortfall(), 1);
    }

    #[test]
    fn random_without_match_pass_is_empty() {
        let temp = TempDir::new().unwrap();
        let corpus = repo(temp.path(), &[("a.txt", "ecclesia")], None);
        let mut job = SearchJob::new(corpus, params(&["ecclesia"], 0)).unwrap();

        let report = job.random(&mut Vec::new()).unwrap();
        assert_eq!(report.windows, 0);
    }

    #[test]
    fn memory_efficient_jobs_release_documents() {
        let temp = TempDir::new().unwrap();
        let corpus = repo(temp.path(), &[("a.txt", "x ecclesia y")], None);
        let mut job = SearchJob::new(corpus, params(&["ecclesia"], 1)).unwrap();

        job.execute(&mut Vec::new()).unwrap();
        assert!(!job.repository().get("a.txt").unwrap().is_loaded());
    }
}
