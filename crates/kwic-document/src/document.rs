//! A corpus document with lazily computed, purgeable text caches.

use std::{
    collections::HashSet,
    fmt, fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use kwic_metadata::{MetadataError, MetadataIndex};
use rand::Rng;
use tracing::debug;

use crate::{
    ContextWindow, DocumentError, RandomSample, SamplingOptions, WindowOptions,
    find_windows_in, sample_windows, tokenize,
};

/// One plain-text file of a corpus.
///
/// The raw contents and the clean token sequence are loaded on first use and kept until
/// [`purge`](Self::purge) is called. Clean tokens are always derivable from the raw text,
/// so either cache can be dropped at any time.
pub struct TextDocument {
    /// Location of the file.
    path: PathBuf,
    /// Basename of the file; the document identifier.
    name: String,
    /// Lowercase clean tokens.
    lowercase: bool,
    /// Index used to resolve the composition date.
    metadata: Option<Arc<MetadataIndex>>,
    /// Cached file contents.
    raw: Option<String>,
    /// Cached clean tokens.
    clean: Option<Vec<String>>,
    /// Cached composition date.
    composed: Option<i32>,
}

impl TextDocument {
    /// Creates a document for the file at `path`. Nothing is read until needed.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        Self {
            path,
            name,
            lowercase: false,
            metadata: None,
            raw: None,
            clean: None,
            composed: None,
        }
    }

    /// Sets whether clean tokens are lowercased.
    pub fn with_lowercase(mut self, lowercase: bool) -> Self {
        if self.lowercase != lowercase {
            self.clean = None;
        }
        self.lowercase = lowercase;
        self
    }

    /// Attaches the metadata index used by [`composed`](Self::composed).
    pub fn with_metadata(mut self, metadata: Arc<MetadataIndex>) -> Self {
        self.metadata = Some(metadata);
        self.composed = None;
        self
    }

    /// Path of the underlying file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Document identifier: the file's basename.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns true if the raw contents are cached.
    pub fn is_loaded(&self) -> bool {
        self.raw.is_some()
    }

    /// Returns true if the clean tokens are cached.
    pub fn is_cleaned(&self) -> bool {
        self.clean.is_some()
    }

    /// Raw file contents, reading the file on first access.
    ///
    /// Bytes that are not valid UTF-8 are replaced with U+FFFD.
    pub fn raw(&mut self) -> Result<&str, DocumentError> {
        let raw = match self.raw.take() {
            Some(raw) => raw,
            None => {
                let bytes = fs::read(&self.path).map_err(|source| DocumentError::ReadFile {
                    path: self.path.clone(),
                    source,
                })?;
                debug!(document = %self.name, bytes = bytes.len(), "loaded document");
                String::from_utf8_lossy(&bytes).into_owned()
            }
        };
        Ok(self.raw.insert(raw).as_str())
    }

    /// Clean tokens, normalizing the raw text on first access.
    pub fn tokens(&mut self) -> Result<&[String], DocumentError> {
        let clean = match self.clean.take() {
            Some(clean) => clean,
            None => {
                let lowercase = self.lowercase;
                tokenize(self.raw()?, lowercase)
            }
        };
        Ok(self.clean.insert(clean).as_slice())
    }

    /// Composition date from the attached metadata index.
    ///
    /// Returns `None` when no index is attached. The date is cached once resolved.
    pub fn composed(&mut self) -> Result<Option<i32>, MetadataError> {
        if self.composed.is_some() {
            return Ok(self.composed);
        }
        let Some(index) = &self.metadata else {
            return Ok(None);
        };
        let date = index.date_of(&self.name)?;
        self.composed = Some(date);
        Ok(Some(date))
    }

    /// Returns true if any term occurs as a substring of the raw text.
    ///
    /// Never computes clean tokens.
    pub fn has_any<S: AsRef<str>>(&mut self, terms: &[S]) -> Result<bool, DocumentError> {
        let raw = self.raw()?;
        Ok(terms.iter().any(|term| raw.contains(term.as_ref())))
    }

    /// Extracts a window around every clean token equal to one of `terms`.
    pub fn find_windows<S: AsRef<str>>(
        &mut self,
        terms: &[S],
        options: &WindowOptions,
    ) -> Result<Vec<ContextWindow>, DocumentError> {
        let terms: HashSet<&str> = terms.iter().map(AsRef::as_ref).collect();
        let windows = find_windows_in(self.tokens()?, &terms, options);
        debug!(document = %self.name, windows = windows.len(), "extracted matched windows");

        if options.release_after {
            self.purge();
        }
        Ok(windows)
    }

    /// Draws up to `count` random full-width windows free of `avoid` terms.
    ///
    /// See [`sample_windows`] for the guarantees on the returned windows.
    pub fn random_windows<S, R>(
        &mut self,
        count: usize,
        avoid: &[S],
        options: &SamplingOptions,
        rng: &mut R,
    ) -> Result<RandomSample, DocumentError>
    where
        S: AsRef<str>,
        R: Rng + ?Sized,
    {
        let avoid: HashSet<&str> = avoid.iter().map(AsRef::as_ref).collect();
        let name = self.name.clone();
        let sample = sample_windows(&name, self.tokens()?, count, &avoid, options, rng);
        debug!(
            document = %name,
            requested = count,
            produced = sample.windows.len(),
            "sampled random windows"
        );

        if options.release_after {
            self.purge();
        }
        Ok(sample)
    }

    /// Drops the raw and clean caches. The next access reads the file again.
    pub fn purge(&mut self) {
        self.raw = None;
        self.clean = None;
    }

    /// Drops only the clean token cache.
    pub fn purge_clean(&mut self) {
        self.clean = None;
    }
}

impl fmt::Debug for TextDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextDocument")
            .field("path", &self.path)
            .field("name", &self.name)
            .field("lowercase", &self.lowercase)
            .field("loaded", &self.is_loaded())
            .field("cleaned", &self.is_cleaned())
            .field("composed", &self.composed)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};
    use tempfile::TempDir;

    use super::*;

    fn write_doc(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn name_is_basename() {
        let doc = TextDocument::new("corpus/latin/vergil.txt");
        assert_eq!(doc.name(), "vergil.txt");
        assert_eq!(doc.path(), Path::new("corpus/latin/vergil.txt"));
    }

    #[test]
    fn caches_are_lazy() {
        let dir = TempDir::new().unwrap();
        let path = write_doc(&dir, "a.txt", "Arma virumque cano");
        let mut doc = TextDocument::new(path);

        assert!(!doc.is_loaded());
        assert!(!doc.is_cleaned());
        assert_eq!(doc.raw().unwrap(), "Arma virumque cano");
        assert!(doc.is_loaded());
        assert!(!doc.is_cleaned());
        assert_eq!(doc.tokens().unwrap(), ["Arma", "virumque", "cano"]);
        assert!(doc.is_cleaned());
    }

    #[test]
    fn lowercase_applies_to_tokens() {
        let dir = TempDir::new().unwrap();
        let path = write_doc(&dir, "a.txt", "Arma Virumque");
        let mut doc = TextDocument::new(path).with_lowercase(true);
        assert_eq!(doc.tokens().unwrap(), ["arma", "virumque"]);
    }

    #[test]
    fn purge_reloads_from_disk() {
        let dir = TempDir::new().unwrap();
        let path = write_doc(&dir, "a.txt", "prima");
        let mut doc = TextDocument::new(&path);
        assert_eq!(doc.tokens().unwrap(), ["prima"]);

        fs::write(&path, "secunda").unwrap();
        assert_eq!(doc.tokens().unwrap(), ["prima"]);

        doc.purge();
        doc.purge();
        assert!(!doc.is_loaded());
        assert!(!doc.is_cleaned());
        assert_eq!(doc.tokens().unwrap(), ["secunda"]);
    }

    #[test]
    fn purge_clean_keeps_raw() {
        let dir = TempDir::new().unwrap();
        let path = write_doc(&dir, "a.txt", "verbum");
        let mut doc = TextDocument::new(path);
        doc.tokens().unwrap();

        doc.purge_clean();
        assert!(doc.is_loaded());
        assert!(!doc.is_cleaned());
    }

    #[test]
    fn has_any_scans_raw_without_cleaning() {
        let dir = TempDir::new().unwrap();
        let path = write_doc(&dir, "a.txt", "in ecclesia dei");
        let mut doc = TextDocument::new(path);

        assert!(doc.has_any(&["basilica", "ecclesia"]).unwrap());
        assert!(!doc.has_any(&["basilica"]).unwrap());
        assert!(!doc.has_any::<&str>(&[]).unwrap());
        assert!(!doc.is_cleaned());
    }

    #[test]
    fn missing_file_is_read_error() {
        let mut doc = TextDocument::new("/nonexistent/kwic/doc.txt");
        let err = doc.has_any(&["x"]).unwrap_err();
        assert!(matches!(err, DocumentError::ReadFile { .. }));
        assert!(!doc.is_loaded());
    }

    #[test]
    fn invalid_utf8_is_decoded_lossily() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.txt");
        fs::write(&path, b"Caesar \xff dixit").unwrap();
        let mut doc = TextDocument::new(path);
        assert_eq!(doc.tokens().unwrap(), ["Caesar", "dixit"]);
    }

    #[test]
    fn find_windows_releases_when_asked() {
        let dir = TempDir::new().unwrap();
        let path = write_doc(&dir, "a.txt", "a b c TARGET d e f");
        let mut doc = TextDocument::new(path);

        let keep = WindowOptions {
            window: 2,
            ignore_center: false,
            release_after: false,
        };
        let windows = doc.find_windows(&["TARGET"], &keep).unwrap();
        assert_eq!(windows[0].text(), "b c TARGET d e");
        assert!(doc.is_cleaned());

        let release = WindowOptions {
            ignore_center: true,
            release_after: true,
            ..keep
        };
        let windows = doc.find_windows(&["TARGET"], &release).unwrap();
        assert_eq!(windows[0].text(), "b c d e");
        assert!(!doc.is_loaded());
        assert!(!doc.is_cleaned());
    }

    #[test]
    fn random_windows_avoid_terms() {
        let dir = TempDir::new().unwrap();
        let text = (0..400)
            .map(|i| {
                if i % 50 == 0 {
                    "ecclesia".to_string()
                } else {
                    format!("w{}", "x".repeat(i % 7 + 1))
                }
            })
            .collect::<Vec<_>>()
            .join(" ");
        let path = write_doc(&dir, "a.txt", &text);
        let mut doc = TextDocument::new(path);
        let options = SamplingOptions {
            window: 3,
            max_attempts: 1_000,
            release_after: true,
        };
        let mut rng = StdRng::seed_from_u64(11);

        let sample = doc.random_windows(4, &["ecclesia"], &options, &mut rng).unwrap();
        assert!(sample.is_complete());
        assert_eq!(sample.windows.len(), 4);
        for window in &sample.windows {
            assert_eq!(window.len(), 7);
            assert!(window.tokens().iter().all(|t| t != "ecclesia"));
        }
        assert!(!doc.is_loaded());
    }

    #[test]
    fn composed_without_metadata_is_none() {
        let mut doc = TextDocument::new("a.txt");
        assert_eq!(doc.composed().unwrap(), None);
    }

    #[test]
    fn composed_resolves_and_caches() {
        let index = Arc::new(MetadataIndex::from_dates([("livy.txt", -9)]));
        let mut doc = TextDocument::new("corpus/livy.txt").with_metadata(index);
        assert_eq!(doc.composed().unwrap(), Some(-9));
        assert_eq!(doc.composed().unwrap(), Some(-9));

        let index = Arc::new(MetadataIndex::from_dates([("livy.txt", -9)]));
        let mut unknown = TextDocument::new("tacitus.txt").with_metadata(index);
        assert!(matches!(
            unknown.composed().unwrap_err(),
            MetadataError::UnknownIdentifier { .. }
        ));
    }

    #[test]
    fn debug_omits_contents() {
        let dir = TempDir::new().unwrap();
        let path = write_doc(&dir, "a.txt", "secretum");
        let mut doc = TextDocument::new(path);
        doc.raw().unwrap();
        let rendered = format!("{doc:?}");
        assert!(rendered.contains("loaded: true"));
        assert!(!rendered.contains("secretum"));
    }
}
