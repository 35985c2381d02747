//! Text normalization.
//!
//! Turns raw document text into the clean token stream that windows are cut from:
//! hyphenated line-wraps are joined, entity references dropped, every character that is
//! not an ASCII letter becomes a separator, and tokens are optionally lowercased.

use std::sync::LazyLock;

use regex::Regex;

/// A hyphen ending a line, joining a word split across lines.
static LINE_WRAP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-\r?\n").expect("line-wrap pattern is valid"));

/// An SGML/XML entity reference such as `&amp;`.
static ENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&\w+;").expect("entity pattern is valid"));

/// Runs of characters that cannot belong to a token.
static NON_LETTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z]+").expect("non-letter pattern is valid"));

/// Splits raw text into clean tokens.
pub fn tokenize(raw: &str, lowercase: bool) -> Vec<String> {
    let joined = LINE_WRAP.replace_all(raw, "");
    let without_entities = ENTITY.replace_all(&joined, " ");
    let letters = NON_LETTER.replace_all(&without_entities, " ");

    letters
        .split_whitespace()
        .map(|token| {
            if lowercase {
                token.to_ascii_lowercase()
            } else {
                token.to_string()
            }
        })
        .collect()
}

/// Returns the clean text: clean tokens joined by single spaces.
///
/// Normalizing clean text again yields the same text.
pub fn normalize(raw: &str, lowercase: bool) -> String {
    tokenize(raw, lowercase).join(" ")
}
