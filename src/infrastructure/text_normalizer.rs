//! Text normalizer
//!
//! Strips zero-width characters and anything outside the title allow-list,
//! folds non-breaking spaces into plain spaces and collapses whitespace runs.
//! The result is stable: normalizing normalized text returns it unchanged.

use crate::infrastructure::parsing::patterns::{NOISE_CHARS, WHITESPACE_RUN};

const ZERO_WIDTH_SPACE: char = '\u{200b}';
const ZERO_WIDTH_NON_JOINER: char = '\u{200c}';
const NO_BREAK_SPACE: char = '\u{a0}';

/// Normalize a raw scraped string. Empty input yields an empty string.
#[must_use]
pub fn normalize(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let folded: String = text
        .chars()
        .filter(|&c| c != ZERO_WIDTH_SPACE && c != ZERO_WIDTH_NON_JOINER)
        .map(|c| if c == NO_BREAK_SPACE { ' ' } else { c })
        .collect();

    let allowed = NOISE_CHARS.replace_all(&folded, "");
    WHITESPACE_RUN.replace_all(&allowed, " ").trim().to_string()
}

/// Normalize an optional string, treating `None` like empty input.
#[must_use]
pub fn normalize_opt(text: Option<&str>) -> String {
    text.map(normalize).unwrap_or_default()
}

/// Replace non-breaking spaces only; used by extractors that must keep every other character.
pub(crate) fn fold_nbsp(text: &str) -> String {
    text.replace(NO_BREAK_SPACE, " ")
}
