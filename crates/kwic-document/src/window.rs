//! Context windows around token positions.

use std::{collections::HashSet, ops::Range};

/// A span of clean tokens centered on one position of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextWindow {
    /// Tokens of the window, in document order.
    tokens: Vec<String>,
    /// Covered token indices.
    range: Range<usize>,
    /// Index of the center token.
    center: usize,
}

impl ContextWindow {
    /// Creates a window over `tokens`, which were taken from `range` of the document.
    pub fn new(tokens: Vec<String>, range: Range<usize>, center: usize) -> Self {
        Self {
            tokens,
            range,
            center,
        }
    }

    /// Tokens of the window.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Consumes the window, returning its tokens.
    pub fn into_tokens(self) -> Vec<String> {
        self.tokens
    }

    /// Covered token indices of the document.
    ///
    /// When the center token was dropped from the window this still includes it.
    pub fn range(&self) -> Range<usize> {
        self.range.clone()
    }

    /// Index of the center token in the document.
    pub fn center(&self) -> usize {
        self.center
    }

    /// Number of tokens in the window.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Returns true if the window holds no tokens.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Returns true if both windows cover at least one common token index.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.range.start < other.range.end && other.range.start < self.range.end
    }

    /// Tokens joined by single spaces.
    pub fn text(&self) -> String {
        self.tokens.join(" ")
    }
}

/// Options for matched-window extraction.
#[derive(Debug, Clone)]
pub struct WindowOptions {
    /// Tokens kept on each side of a match.
    pub window: usize,
    /// Drop the matched token from the window.
    pub ignore_center: bool,
    /// Purge the document's caches once extraction is done.
    pub release_after: bool,
}

impl Default for WindowOptions {
    fn default() -> Self {
        Self {
            window: 50,
            ignore_center: false,
            release_after: true,
        }
    }
}

/// Indices covered by a window of `radius` around `center`, clipped to `len` tokens.
pub fn window_range(len: usize, center: usize, radius: usize) -> Range<usize> {
    let start = center.saturating_sub(radius);
    let end = center.saturating_add(radius).saturating_add(1).min(len);
    start..end
}

/// Extracts a window for every token in `terms`, scanning left to right.
///
/// Windows near either end of the document are truncated. Overlapping windows are all
/// returned.
pub fn find_windows_in(
    tokens: &[String],
    terms: &HashSet<&str>,
    options: &WindowOptions,
) -> Vec<ContextWindow> {
    tokens
        .iter()
        .enumerate()
        .filter(|(_, token)| terms.contains(token.as_str()))
        .map(|(center, _)| {
            let range = window_range(tokens.len(), center, options.window);
            let selected = tokens[range.clone()]
                .iter()
                .enumerate()
                .filter(|(offset, _)| !options.ignore_center || range.start + offset != center)
                .map(|(_, token)| token.clone())
                .collect();
            ContextWindow::new(selected, range, center)
        })
        .collect()
}
