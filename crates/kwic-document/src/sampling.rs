//! Random control windows.
//!
//! Draws full-width windows that avoid a set of terms and never overlap each other. Each
//! candidate center is drawn from a strided grid starting at the window radius; the
//! stride is the window width plus a small random jitter, which spreads candidates
//! across the document. Rejected candidates are retried until the attempt ceiling is
//! reached.

use std::{
    collections::{BTreeMap, HashSet},
    ops::Range,
};

use rand::Rng;
use thiserror::Error;

use crate::{ContextWindow, window::window_range};

/// Largest extra stride added to the window width when drawing a candidate.
const MAX_JITTER: usize = 4;

/// Options for random window sampling.
#[derive(Debug, Clone)]
pub struct SamplingOptions {
    /// Tokens kept on each side of the sample point.
    pub window: usize,
    /// Consecutive rejected candidates allowed before giving up on a window.
    pub max_attempts: usize,
    /// Purge the document's caches once sampling is done.
    pub release_after: bool,
}

impl Default for SamplingOptions {
    fn default() -> Self {
        Self {
            window: 50,
            max_attempts: 1_000,
            release_after: true,
        }
    }
}

/// Random sampling stopped before the requested number of windows was produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "sampling exhausted for {document}: produced {produced} of {requested} windows \
     ({attempts} rejected candidates in a row)"
)]
pub struct SamplingExhausted {
    /// Document being sampled.
    pub document: String,
    /// Windows requested.
    pub requested: usize,
    /// Windows produced before giving up.
    pub produced: usize,
    /// Consecutive rejected candidates when sampling stopped.
    pub attempts: usize,
}

impl SamplingExhausted {
    /// Windows that could not be produced.
    pub fn shortfall(&self) -> usize {
        self.requested.saturating_sub(self.produced)
    }
}

/// Outcome of one random sampling call.
#[derive(Debug, Clone)]
pub struct RandomSample {
    /// Windows produced, in draw order.
    pub windows: Vec<ContextWindow>,
    /// Set when fewer windows than requested could be produced.
    pub exhausted: Option<SamplingExhausted>,
}

impl RandomSample {
    /// Returns true if every requested window was produced.
    pub fn is_complete(&self) -> bool {
        self.exhausted.is_none()
    }
}

/// Disjoint token ranges already handed out during one sampling call.
#[derive(Debug, Default)]
struct Reservations {
    /// Range start to range end, for pairwise disjoint ranges.
    spans: BTreeMap<usize, usize>,
}

impl Reservations {
    /// Returns true if `range` shares an index with any reserved range.
    fn overlaps(&self, range: &Range<usize>) -> bool {
        // Reserved ranges are disjoint, so only the last one starting before `range.end`
        // can reach into it.
        self.spans
            .range(..range.end)
            .next_back()
            .is_some_and(|(_, &end)| end > range.start)
    }

    /// Reserves a range.
    fn insert(&mut self, range: &Range<usize>) {
        self.spans.insert(range.start, range.end);
    }
}

/// Draws up to `count` random windows from `tokens`.
///
/// Every window has exactly `2 * window + 1` tokens, contains no token from `avoid`, and
/// does not overlap any other window of the same call.
pub fn sample_windows<R: Rng + ?Sized>(
    document: &str,
    tokens: &[String],
    count: usize,
    avoid: &HashSet<&str>,
    options: &SamplingOptions,
    rng: &mut R,
) -> RandomSample {
    let radius = options.window;
    let width = radius.saturating_mul(2).saturating_add(1);

    let exhausted = |produced: usize, attempts: usize| SamplingExhausted {
        document: document.to_string(),
        requested: count,
        produced,
        attempts,
    };

    if count > 0 && tokens.len() < width {
        return RandomSample {
            windows: Vec::new(),
            exhausted: Some(exhausted(0, 0)),
        };
    }

    // No more than `len / width` disjoint windows fit.
    let mut windows = Vec::with_capacity(count.min(tokens.len() / width));

    let mut reserved = Reservations::default();
    let mut attempts = 0;
    while windows.len() < count {
        if attempts >= options.max_attempts {
            return RandomSample {
                exhausted: Some(exhausted(windows.len(), attempts)),
                windows,
            };
        }
        attempts += 1;

        let center = draw_center(tokens.len(), radius, width, rng);
        let range = window_range(tokens.len(), center, radius);
        if range.len() != width || reserved.overlaps(&range) {
            continue;
        }
        let candidate = &tokens[range.clone()];
        if candidate.iter().any(|token| avoid.contains(token.as_str())) {
            continue;
        }

        reserved.insert(&range);
        windows.push(ContextWindow::new(candidate.to_vec(), range, center));
        attempts = 0;
    }

    RandomSample {
        windows,
        exhausted: None,
    }
}

/// Draws a candidate center from `{radius, radius + s, radius + 2s, ..} ∩ [radius, len)`
/// where the stride `s` is the window width plus a random jitter.
///
/// `len` must exceed `radius`.
fn draw_center<R: Rng + ?Sized>(len: usize, radius: usize, width: usize, rng: &mut R) -> usize {
    let stride = width.saturating_add(rng.random_range(0..=MAX_JITTER));
    let slots = (len - radius).div_ceil(stride);
    radius + rng.random_range(0..slots) * stride
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    fn numbered_tokens(len: usize) -> Vec<String> {
        (0..len).map(|i| format!("w{i}")).collect()
    }

    fn options(window: usize, max_attempts: usize) -> SamplingOptions {
        SamplingOptions {
            window,
            max_attempts,
            release_after: false,
        }
    }

    fn assert_invariants(
        sample: &RandomSample,
        tokens: &[String],
        avoid: &HashSet<&str>,
        radius: usize,
    ) {
        for (i, window) in sample.windows.iter().enumerate() {
            assert_eq!(window.len(), 2 * radius + 1);
            assert_eq!(window.tokens(), &tokens[window.range()]);
            assert!(window.tokens().iter().all(|t| !avoid.contains(t.as_str())));
            for other in &sample.windows[i + 1..] {
                assert!(!window.overlaps(other), "{window:?} overlaps {other:?}");
            }
        }
    }

    #[test]
    fn reservations_detect_overlap() {
        let mut reserved = Reservations::default();
        reserved.insert(&(10..15));
        reserved.insert(&(20..25));

        assert!(reserved.overlaps(&(14..19)));
        assert!(reserved.overlaps(&(5..11)));
        assert!(reserved.overlaps(&(12..13)));
        assert!(reserved.overlaps(&(0..100)));
        assert!(!reserved.overlaps(&(15..20)));
        assert!(!reserved.overlaps(&(0..10)));
        assert!(!reserved.overlaps(&(25..30)));
    }

    #[test]
    fn produces_requested_count_with_invariants() {
        let tokens = numbered_tokens(2_000);
        let avoid = HashSet::new();

        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let sample = sample_windows("doc", &tokens, 12, &avoid, &options(5, 1_000), &mut rng);
            assert!(sample.is_complete(), "seed {seed}: {:?}", sample.exhausted);
            assert_eq!(sample.windows.len(), 12);
            assert_invariants(&sample, &tokens, &avoid, 5);
        }
    }

    #[test]
    fn avoided_terms_never_appear() {
        let mut tokens = numbered_tokens(1_500);
        for i in (0..tokens.len()).step_by(37) {
            tokens[i] = "ecclesia".to_string();
        }
        let avoid = HashSet::from(["ecclesia"]);

        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let sample = sample_windows("doc", &tokens, 8, &avoid, &options(3, 2_000), &mut rng);
            assert_invariants(&sample, &tokens, &avoid, 3);
            assert_eq!(
                sample.windows.len() + sample.exhausted.as_ref().map_or(0, |e| e.shortfall()),
                8
            );
        }
    }

    #[test]
    fn short_document_is_exhausted_immediately() {
        let tokens = numbered_tokens(4);
        let mut rng = StdRng::seed_from_u64(1);

        let avoid = HashSet::new();
        let sample = sample_windows("short.txt", &tokens, 3, &avoid, &options(2, 10), &mut rng);
        assert!(sample.windows.is_empty());
        let exhausted = sample.exhausted.unwrap();
        assert_eq!(exhausted.document, "short.txt");
        assert_eq!(exhausted.requested, 3);
        assert_eq!(exhausted.produced, 0);
        assert_eq!(exhausted.shortfall(), 3);
    }

    #[test]
    fn over_constrained_document_reports_shortfall() {
        // Room for exactly one full-width window.
        let tokens = numbered_tokens(5);
        let mut rng = StdRng::seed_from_u64(3);

        let avoid = HashSet::new();
        let sample = sample_windows("tight.txt", &tokens, 4, &avoid, &options(2, 50), &mut rng);
        assert_eq!(sample.windows.len(), 1);
        let exhausted = sample.exhausted.unwrap();
        assert_eq!(exhausted.produced, 1);
        assert_eq!(exhausted.attempts, 50);
        assert_eq!(exhausted.shortfall(), 3);
    }

    #[test]
    fn fully_avoided_document_is_exhausted() {
        let tokens = vec!["ecclesia".to_string(); 100];
        let avoid = HashSet::from(["ecclesia"]);
        let mut rng = StdRng::seed_from_u64(9);

        let sample = sample_windows("doc", &tokens, 2, &avoid, &options(1, 100), &mut rng);
        assert!(sample.windows.is_empty());
        assert_eq!(sample.exhausted.unwrap().attempts, 100);
    }

    #[test]
    fn huge_count_is_exhausted_without_panicking() {
        let mut rng = StdRng::seed_from_u64(0);
        let avoid = HashSet::new();

        let sample = sample_windows("d", &[], usize::MAX, &avoid, &options(50, 10), &mut rng);
        assert!(sample.windows.is_empty());
        assert_eq!(sample.exhausted.unwrap().shortfall(), usize::MAX);

        let tokens = numbered_tokens(30);
        let tight = options(2, 1_000);
        let sample = sample_windows("d", &tokens, usize::MAX, &avoid, &tight, &mut rng);
        assert!(!sample.windows.is_empty() && sample.windows.len() <= 6);
        assert_invariants(&sample, &tokens, &avoid, 2);
        assert_eq!(sample.exhausted.unwrap().attempts, 1_000);
    }

    #[test]
    fn zero_count_is_complete() {
        let mut rng = StdRng::seed_from_u64(0);
        let sample = sample_windows("doc", &[], 0, &HashSet::new(), &options(2, 10), &mut rng);
        assert!(sample.is_complete());
        assert!(sample.windows.is_empty());
    }

    #[test]
    fn seeded_sampling_is_reproducible() {
        let tokens = numbered_tokens(500);
        let avoid = HashSet::new();
        let run = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            sample_windows("doc", &tokens, 5, &avoid, &options(4, 1_000), &mut rng)
                .windows
                .iter()
                .map(ContextWindow::range)
                .collect::<Vec<_>>()
        };

        assert_eq!(run(42), run(42));
    }

    #[test]
    fn centers_lie_on_grid() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..1_000 {
            let center = draw_center(100, 3, 7, &mut rng);
            assert!((3..100).contains(&center));
            let offset = center - 3;
            assert!((7..=11).any(|stride| offset % stride == 0));
        }
    }
}
