//! Text documents and context windows for kwic.
//!
//! A [`TextDocument`] owns a lazily loaded copy of one corpus file and its clean token
//! sequence. Matched windows are cut around target tokens with
//! [`TextDocument::find_windows`]; term-free, non-overlapping control windows are drawn
//! with [`TextDocument::random_windows`].

#![warn(missing_docs)]

mod document;
mod error;
mod normalize;
mod sampling;
mod window;

pub use document::TextDocument;
pub use error::DocumentError;
pub use normalize::{normalize, tokenize};
pub use sampling::{RandomSample, SamplingExhausted, SamplingOptions, sample_windows};
pub use window::{ContextWindow, WindowOptions, find_windows_in};
