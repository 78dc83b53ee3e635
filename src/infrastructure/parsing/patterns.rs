//! Compiled regex patterns shared by the extractors, segmenter and classifier
//!
//! Every pattern here is a literal, so it is compiled once on first use.
//! The `regex` crate has no look-around; patterns that need a look-ahead
//! either consume the trailing context (only the first capture group is read)
//! or are checked by hand against the remaining haystack.

use once_cell::sync::Lazy;
use regex::Regex;

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("built-in pattern must compile")
}

/// Characters outside the allow-list are dropped by the normalizer.
pub static NOISE_CHARS: Lazy<Regex> =
    Lazy::new(|| compile(r#"[^\w\sА-Яа-яёЁA-Za-z0-9"«».,:+*()\[\]/\-×xº″°%]"#));

pub static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| compile(r"\s+"));

pub static INT_ANY: Lazy<Regex> = Lazy::new(|| compile(r"(\d{1,6})"));

pub static FLOAT: Lazy<Regex> = Lazy::new(|| compile(r"(\d+(?:[.,]\d+)?)"));

pub static STORAGE: Lazy<Regex> = Lazy::new(|| compile(r"(?i)(\d+)\s*(?:ГБ|GB)\b"));

pub static BATTERY_UNIT: Lazy<Regex> =
    Lazy::new(|| compile(r"(?i)(\d{3,6})\s*(?:mAh|mah|mA\W*ch|мА\W*ч|мач|мах|мАч)\b"));

// Keyword is consumed instead of looked-ahead; only group 1 is used.
pub static BATTERY_KEYWORD: Lazy<Regex> =
    Lazy::new(|| compile(r"(?i)(\d{3,6})\s*(?:мА|мач|аккум|батар|mAh|мах)"));

pub static DIAGONAL: Lazy<Regex> =
    Lazy::new(|| compile(r#"\b(\d+(?:[.,]\d+)?)\s*(?:["″]|дюйм|in)?\b"#));

pub static LEADING_DIAGONAL: Lazy<Regex> =
    Lazy::new(|| compile(r#"(?i)^\s*\d+(?:[.,]\d+)?\s*(?:["″]|дюйм|in)?"#));

/// Context that must follow a camera digit run: a megapixel marker, `+`, or whitespace.
pub static CAMERA_CONTEXT: Lazy<Regex> = Lazy::new(|| compile(r"(?i)^(?:\s*(?:Мп|MP|мп|mp)|[+\s])"));

pub static DIGITS_1_3: Lazy<Regex> = Lazy::new(|| compile(r"(\d{1,3})"));

pub static DIGITS_3_6: Lazy<Regex> = Lazy::new(|| compile(r"\d{3,6}"));

pub static REVIEWS_BEFORE_KEYWORD: Lazy<Regex> =
    Lazy::new(|| compile(r"([\d.]+)\s*(k|к|тыс|тыс\.)?\s*отз"));

pub static REVIEWS_CANDIDATE: Lazy<Regex> =
    Lazy::new(|| compile(r"(\d+(?:\.\d+)?)(?:\s*(k|к|тыс|тыс\.)?)"));

pub static REVIEWS_INT: Lazy<Regex> = Lazy::new(|| compile(r"(\d{2,6})"));

pub static INSTALLMENT_RUBLES: Lazy<Regex> = Lazy::new(|| compile(r"(\d[\d\s]*)\s*₽"));

pub static INSTALLMENT_ANY: Lazy<Regex> = Lazy::new(|| compile(r"(\d[\d\s]*)"));

pub static SPECS_BLOCK: Lazy<Regex> = Lazy::new(|| compile(r"\[(.*?)\]"));

pub static SPEC_SEPARATOR: Lazy<Regex> = Lazy::new(|| compile(r",\s*"));

pub static SPEC_CAPACITY_GB: Lazy<Regex> = Lazy::new(|| compile(r"(?i)\d+\s*(?:гб|gb)"));

pub static RAM_HINT: Lazy<Regex> = Lazy::new(|| compile(r"(?i)операт|ram"));

pub static SIM_COUNT: Lazy<Regex> = Lazy::new(|| compile(r"(?i)\d+\s*sim"));

pub static RESOLUTION: Lazy<Regex> = Lazy::new(|| compile(r"\d{3,4}x\d{3,4}"));

/// Builds the whole-word, case-insensitive pattern for words stripped from titles.
pub fn strip_words_pattern(words: &[String]) -> Result<Regex, regex::Error> {
    let alternatives = words
        .iter()
        .map(|word| regex::escape(word.trim()))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b(?:{alternatives})\b"))
}
