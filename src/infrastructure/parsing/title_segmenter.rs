//! Title segmenter
//!
//! Splits a normalized title into the main segment (brand, model, storage,
//! color, diagonal) and the optional bracketed specs block, then pulls the
//! main-segment attributes out in a fixed order: diagonal, storage, then the
//! brand/model/color split around the storage token.

use std::ops::Range;

use tracing::trace;

use super::patterns::{LEADING_DIAGONAL, SPECS_BLOCK, STORAGE};
use crate::infrastructure::extractors::extract_diagonal;

/// A title split around its first `[...]` group
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TitleSegments {
    /// Everything before the bracket, or the whole title when there is none
    pub main: String,

    /// Verbatim content of the bracket, empty when absent
    pub specs_raw: String,
}

/// Attributes found in the main segment
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MainSegment {
    /// Main segment with a leading diagonal token removed
    pub text: String,
    pub diagonal_in: Option<f64>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub storage_gb: Option<u32>,
    pub color: Option<String>,

    /// Byte range of the storage token within `text`
    pub storage_span: Option<Range<usize>>,
}

#[derive(Debug, Clone)]
pub struct TitleSegmenter {
    color_token_limit: usize,
}

impl TitleSegmenter {
    pub fn new(color_token_limit: usize) -> Self {
        Self { color_token_limit }
    }

    /// Split a title into its main segment and raw specs block
    pub fn split(&self, title: &str) -> TitleSegments {
        let Some(caps) = SPECS_BLOCK.captures(title) else {
            return TitleSegments {
                main: title.to_string(),
                specs_raw: String::new(),
            };
        };

        let start = caps.get(0).map_or(0, |m| m.start());
        TitleSegments {
            main: title[..start].trim().to_string(),
            specs_raw: caps.get(1).map_or("", |m| m.as_str()).to_string(),
        }
    }

    /// Extract diagonal, storage, brand, model and color from the main segment
    pub fn extract_main(&self, main: &str) -> MainSegment {
        let diagonal_in = extract_diagonal(main);
        let text = if diagonal_in.is_some_and(|d| d > 0.0) {
            LEADING_DIAGONAL.replace(main, "").trim().to_string()
        } else {
            main.to_string()
        };

        let storage = STORAGE.captures(&text).and_then(|caps| {
            let span = caps.get(0)?.range();
            let value = caps.get(1)?.as_str().parse::<u32>().ok()?;
            Some((span, value))
        });

        let mut segment = MainSegment {
            diagonal_in,
            storage_gb: storage.as_ref().map(|(_, value)| *value),
            ..MainSegment::default()
        };

        match storage {
            Some((span, value)) if value > 0 => {
                let before = text[..span.start].trim();
                let after = text[span.end..].trim();
                if !before.is_empty() {
                    (segment.brand, segment.model) = split_brand_model(before);
                }
                if !after.is_empty() {
                    segment.color = Some(
                        after
                            .split_whitespace()
                            .take(self.color_token_limit)
                            .collect::<Vec<_>>()
                            .join(" "),
                    );
                }
                segment.storage_span = Some(span);
            }
            _ => {
                (segment.brand, segment.model) = split_brand_model(&text);
            }
        }

        trace!(
            "Main segment '{}': brand={:?} model={:?} storage={:?} color={:?}",
            text, segment.brand, segment.model, segment.storage_gb, segment.color
        );
        segment.text = text;
        segment
    }
}

/// First whitespace token is the brand; the rest, if any, is the model.
fn split_brand_model(text: &str) -> (Option<String>, Option<String>) {
    let mut tokens = text.split_whitespace();
    let brand = tokens.next().map(ToString::to_string);
    let rest = tokens.collect::<Vec<_>>();
    let model = if rest.is_empty() { None } else { Some(rest.join(" ")) };
    (brand, model)
}
