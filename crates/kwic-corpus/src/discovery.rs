//! Corpus file discovery.
//!
//! Walks the corpus root and selects the files that become documents, applying the
//! configured include/exclude patterns. Dot-prefixed names are ordinary documents;
//! symlinks are not followed and are never documents.

use std::path::{Path, PathBuf};

use kwic_config::CompiledPatterns;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::CorpusError;

/// Returns every regular file under `root` selected by `patterns`, in path order.
///
/// Patterns are matched against the path relative to `root`. Entries that cannot be read
/// below the root are logged and skipped.
pub fn discover_files(
    root: &Path,
    patterns: &CompiledPatterns,
) -> Result<Vec<PathBuf>, CorpusError> {
    if !root.exists() {
        return Err(CorpusError::RootNotFound {
            path: root.to_path_buf(),
        });
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(e) => e,
            Err(source) if source.depth() == 0 => {
                return Err(CorpusError::Walk {
                    path: root.to_path_buf(),
                    source,
                });
            }
            Err(e) => {
                warn!(error = %e, "skipping unreadable corpus entry");
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let Ok(rel_path) = entry.path().strip_prefix(root) else {
            continue;
        };
        if !patterns.matches(rel_path) {
            continue;
        }

        files.push(entry.into_path());
    }

    debug!(root = %root.display(), files = files.len(), "discovered corpus files");
    Ok(files)
}
