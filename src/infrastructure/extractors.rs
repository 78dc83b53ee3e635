//! Numeric micro-extractors
//!
//! Small single-purpose extractors over free text. Each one returns `None`
//! (or an empty list) when nothing usable is found; none of them fail.
//! Unit suffixes and `,` decimal separators are tolerated.

use crate::infrastructure::parsing::patterns::{
    BATTERY_KEYWORD, BATTERY_UNIT, CAMERA_CONTEXT, DIAGONAL, DIGITS_1_3, FLOAT, INSTALLMENT_ANY,
    INSTALLMENT_RUBLES, INT_ANY, REVIEWS_BEFORE_KEYWORD, REVIEWS_CANDIDATE, REVIEWS_INT, STORAGE,
};
use crate::infrastructure::text_normalizer::{fold_nbsp, normalize};
use regex::Captures;
use serde::{Deserialize, Serialize};

const THOUSANDS: f64 = 1000.0;
const MAX_CAMERA_DIGITS: usize = 3;

/// First run of 1-6 digits anywhere in the text.
#[must_use]
pub fn extract_int_any(text: &str) -> Option<u32> {
    let text = fold_nbsp(text);
    first_group(INT_ANY.captures(&text)?)?.parse().ok()
}

/// First decimal number, accepting `,` or `.` as the separator.
#[must_use]
pub fn extract_float(text: &str) -> Option<f64> {
    parse_decimal(first_group(FLOAT.captures(text)?)?)
}

/// Integer immediately followed by `ГБ`/`GB`.
#[must_use]
pub fn extract_storage(text: &str) -> Option<u32> {
    first_group(STORAGE.captures(text)?)?.parse().ok()
}

/// Battery capacity in mAh.
///
/// A unit-suffixed match (`mAh`, `мАч`, `мач`, `мах`) wins; otherwise a 3-6 digit
/// run directly followed by a battery keyword (`аккум`, `батар`, ...) is accepted.
#[must_use]
pub fn extract_battery(text: &str) -> Option<u32> {
    let text = fold_nbsp(text);
    BATTERY_UNIT
        .captures(&text)
        .or_else(|| BATTERY_KEYWORD.captures(&text))
        .and_then(first_group)
        .and_then(|digits| digits.parse().ok())
}

/// Screen diagonal in inches: the first number, optionally followed by an inch marker.
///
/// The number need not lead the text, so a title without a size picks up the
/// first word-bounded number instead (`"Apple iPhone 13 128ГБ"` gives 13.0).
/// Callers strip the match from a title only when it leads.
#[must_use]
pub fn extract_diagonal(text: &str) -> Option<f64> {
    parse_decimal(first_group(DIAGONAL.captures(text)?)?)
}

/// Camera resolutions in megapixels, in order of appearance (duplicates kept).
///
/// Digit runs of 1-3 digits followed by a megapixel marker, `+` or whitespace are
/// preferred. When none qualify, every 1-3 digit run in the text is returned.
#[must_use]
pub fn extract_camera_list(text: &str) -> Vec<u32> {
    if text.is_empty() {
        return Vec::new();
    }

    let marked = camera_runs_with_context(text);
    if !marked.is_empty() {
        return marked;
    }

    extract_digit_groups(text)
}

/// Every 1-3 digit run in the text, in order.
#[must_use]
pub fn extract_digit_groups(text: &str) -> Vec<u32> {
    DIGITS_1_3
        .find_iter(text)
        .filter_map(|m| m.as_str().parse().ok())
        .collect()
}

// Emulates `\d{1,3}(?=\s*Мп|[+\s])` with leftmost, longest-first scanning.
fn camera_runs_with_context(text: &str) -> Vec<u32> {
    let mut cameras = Vec::new();
    let mut pos = 0;

    while pos < text.len() {
        let rest = &text[pos..];
        let run = rest.bytes().take_while(u8::is_ascii_digit).count();
        if run == 0 {
            pos += rest.chars().next().map_or(1, char::len_utf8);
            continue;
        }

        let accepted = (1..=run.min(MAX_CAMERA_DIGITS))
            .rev()
            .find(|&len| CAMERA_CONTEXT.is_match(&rest[len..]));

        match accepted {
            Some(len) => {
                if let Ok(mp) = rest[..len].parse() {
                    cameras.push(mp);
                }
                pos += len;
            }
            None => pos += 1,
        }
    }

    cameras
}

/// Review count from a rating block such as `"1.2 тыс отзывов"` or `"87 отзывов"`.
///
/// Tries, in order: the number right before an `отз...` keyword; the largest
/// number in the text; the largest 2-6 digit run. A `k`/`к`/`тыс` suffix
/// multiplies by 1000.
#[must_use]
pub fn parse_reviews_count(text: &str) -> Option<u64> {
    if text.is_empty() {
        return None;
    }

    let lowered = fold_nbsp(&text.to_lowercase());
    let s = lowered.trim().replace(',', ".");

    if let Some(caps) = REVIEWS_BEFORE_KEYWORD.captures(&s) {
        if let Ok(value) = caps[1].parse::<f64>() {
            return Some(scale_review_count(value, caps.get(2).is_some()));
        }
    }

    let best_candidate = REVIEWS_CANDIDATE
        .captures_iter(&s)
        .filter_map(|caps| {
            let value = caps[1].parse::<f64>().ok()?;
            Some(scale_review_count(value, caps.get(2).is_some()))
        })
        .max();
    if best_candidate.is_some() {
        return best_candidate;
    }

    REVIEWS_INT
        .find_iter(&s)
        .filter_map(|m| m.as_str().parse::<u64>().ok())
        .max()
}

fn scale_review_count(value: f64, thousands: bool) -> u64 {
    let scaled = if thousands { value * THOUSANDS } else { value };
    scaled.round_ties_even().max(0.0) as u64
}

/// Installment offer split into the monthly amount and a display string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallmentQuote {
    pub monthly: Option<u64>,
    pub text: Option<String>,
}

/// Parse an installment label such as `"от 1 990 ₽/мес"`.
///
/// A ruble-qualified amount renders as `"<amount> ₽/мес"`, a bare number as its
/// digits. Text without digits comes back normalized with no monthly amount.
#[must_use]
pub fn parse_installment(text: &str) -> InstallmentQuote {
    if text.is_empty() {
        return InstallmentQuote::default();
    }

    let folded = fold_nbsp(text);
    let s = folded.trim();

    if let Some(monthly) = INSTALLMENT_RUBLES.captures(s).and_then(concat_digits) {
        return InstallmentQuote {
            monthly: Some(monthly),
            text: Some(format!("{monthly} ₽/мес")),
        };
    }

    if let Some(monthly) = INSTALLMENT_ANY.captures(s).and_then(concat_digits) {
        return InstallmentQuote {
            monthly: Some(monthly),
            text: Some(monthly.to_string()),
        };
    }

    InstallmentQuote {
        monthly: None,
        text: Some(normalize(s)),
    }
}

/// Price text to an integer by concatenating every digit (`"12 999 ₽"` → 12999).
#[must_use]
pub fn extract_price(text: &str) -> Option<u64> {
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// Case-insensitive substring probe over a keyword list.
#[must_use]
pub fn has_feature(text: &str, keywords: &[&str]) -> bool {
    if text.is_empty() {
        return false;
    }
    let lowered = text.to_lowercase();
    keywords
        .iter()
        .any(|keyword| lowered.contains(&keyword.to_lowercase()))
}

fn first_group<'h>(caps: Captures<'h>) -> Option<&'h str> {
    caps.get(1).map(|m| m.as_str())
}

fn parse_decimal(raw: &str) -> Option<f64> {
    raw.replace(',', ".").parse().ok()
}

fn concat_digits(caps: Captures<'_>) -> Option<u64> {
    let digits: String = caps[1].chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        None
    } else {
        digits.parse().ok()
    }
}
