//! Title parser
//!
//! Normalizes a marketplace title, strips configured filler words, splits it
//! into main segment and specs block, and classifies both into
//! [`ParsedAttributes`].

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use super::config::ParsingConfig;
use super::error::{ParsingError, ParsingResult};
use super::patterns::strip_words_pattern;
use super::spec_classifier::SpecClassifier;
use super::title_segmenter::TitleSegmenter;
use super::TextParser;
use crate::domain::parsed_attributes::ParsedAttributes;
use crate::infrastructure::text_normalizer::normalize;

static DEFAULT_PARSER: Lazy<TitleParser> =
    Lazy::new(|| TitleParser::new().expect("default parsing config must be valid"));

/// Parser for smartphone listing titles
#[derive(Debug, Clone)]
pub struct TitleParser {
    strip_pattern: Option<Regex>,
    segmenter: TitleSegmenter,
    classifier: SpecClassifier,
    config: ParsingConfig,
}

impl TitleParser {
    /// Create a parser with the default vocabulary
    pub fn new() -> ParsingResult<Self> {
        Self::with_config(&ParsingConfig::default())
    }

    /// Create a parser from a custom configuration
    pub fn with_config(config: &ParsingConfig) -> ParsingResult<Self> {
        if config.screen_types.iter().all(|s| s.trim().is_empty()) {
            return Err(ParsingError::configuration(
                "screen_types",
                "at least one screen type is required",
            ));
        }
        if config.color_token_limit == 0 {
            return Err(ParsingError::configuration(
                "color_token_limit",
                "must be greater than zero",
            ));
        }

        let words = config
            .strip_words
            .iter()
            .map(|w| w.trim().to_string())
            .filter(|w| !w.is_empty())
            .collect::<Vec<_>>();
        let strip_pattern = if words.is_empty() {
            None
        } else {
            Some(strip_words_pattern(&words).map_err(|e| ParsingError::invalid_pattern("strip_words", &e))?)
        };

        let screen_types = config
            .screen_types
            .iter()
            .filter(|s| !s.trim().is_empty())
            .cloned()
            .collect::<Vec<_>>();

        Ok(Self {
            strip_pattern,
            segmenter: TitleSegmenter::new(config.color_token_limit),
            classifier: SpecClassifier::new(&screen_types, config.ram_guard_gb),
            config: config.clone(),
        })
    }

    /// Process-wide parser built from the default configuration
    pub fn shared() -> &'static Self {
        &DEFAULT_PARSER
    }

    pub fn config(&self) -> &ParsingConfig {
        &self.config
    }

    /// Parse a title into attributes. Never fails; unmatched fields stay absent.
    pub fn parse(&self, title: &str) -> ParsedAttributes {
        let mut attrs = ParsedAttributes::default();
        if title.is_empty() {
            return attrs;
        }

        let normalized = normalize(title);
        let cleaned = match &self.strip_pattern {
            Some(pattern) => pattern.replace_all(&normalized, "").trim().to_string(),
            None => normalized,
        };

        let segments = self.segmenter.split(&cleaned);
        let main = self.segmenter.extract_main(&segments.main);

        attrs.diagonal_in = main.diagonal_in;
        attrs.brand.clone_from(&main.brand);
        attrs.model.clone_from(&main.model);
        attrs.storage_gb = main.storage_gb;
        attrs.color.clone_from(&main.color);

        self.classifier.classify(&segments.specs_raw, &mut attrs);
        self.classifier.finish(&main, &mut attrs);
        attrs.specs_raw = Some(segments.specs_raw);

        debug!(
            "Parsed title '{}': brand={:?} model={:?} storage={:?} ram={:?}",
            cleaned, attrs.brand, attrs.model, attrs.storage_gb, attrs.ram_gb
        );
        attrs
    }
}

impl Default for TitleParser {
    fn default() -> Self {
        DEFAULT_PARSER.clone()
    }
}

impl TextParser for TitleParser {
    type Output = ParsedAttributes;

    fn parse_text(&self, text: &str) -> Self::Output {
        self.parse(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_title() {
        let attrs = TitleParser::shared().parse(
            "Смартфон 6.1\" Apple iPhone 13 128ГБ синий [6 ГБ ОЗУ, AMOLED, 1170x2532, 12+12 Мп, 3240 мАч, 5G, NFC]",
        );
        assert_eq!(attrs.diagonal_in, Some(6.1));
        assert_eq!(attrs.brand.as_deref(), Some("Apple"));
        assert_eq!(attrs.model.as_deref(), Some("iPhone 13"));
        assert_eq!(attrs.storage_gb, Some(128));
        assert_eq!(attrs.color.as_deref(), Some("синий"));
        assert_eq!(attrs.ram_gb, Some(6));
        assert_eq!(attrs.screen_type.as_deref(), Some("AMOLED"));
        assert_eq!(attrs.resolution.as_deref(), Some("1170x2532"));
        assert_eq!(attrs.camera_list_mp, vec![12, 12]);
        assert_eq!(attrs.num_cameras, Some(2));
        assert_eq!(attrs.max_camera_mp, Some(12));
        assert_eq!(attrs.battery_mah, Some(3240));
        assert!(attrs.has_nfc);
        assert!(attrs.has_5g);
        assert_eq!(
            attrs.specs_raw.as_deref(),
            Some("6 ГБ ОЗУ, AMOLED, 1170x2532, 12+12 Мп, 3240 мАч, 5G, NFC")
        );
    }

    #[test]
    fn test_empty_title_yields_empty_attributes() {
        assert_eq!(TitleParser::shared().parse(""), ParsedAttributes::default());
    }

    #[test]
    fn test_title_without_specs_block() {
        let attrs = TitleParser::shared().parse("Xiaomi Redmi Note 12 256GB черный");
        assert_eq!(attrs.brand.as_deref(), Some("Xiaomi"));
        assert_eq!(attrs.model.as_deref(), Some("Redmi Note 12"));
        assert_eq!(attrs.storage_gb, Some(256));
        assert_eq!(attrs.color.as_deref(), Some("черный"));
        assert_eq!(attrs.specs_raw.as_deref(), Some(""));
        assert_eq!(attrs.ram_gb, None);
    }

    #[test]
    fn test_strip_word_is_case_insensitive() {
        let attrs = TitleParser::shared().parse("СМАРТФОН Honor X8");
        assert_eq!(attrs.brand.as_deref(), Some("Honor"));
        assert_eq!(attrs.model.as_deref(), Some("X8"));
    }

    #[test]
    fn test_custom_ram_guard() {
        let config = ParsingConfig {
            ram_guard_gb: 4,
            ..ParsingConfig::default()
        };
        let parser = TitleParser::with_config(&config).unwrap();
        let attrs = parser.parse("Realme C55 [6 ГБ, IPS]");
        assert_eq!(attrs.ram_gb, None);
        assert_eq!(attrs.screen_type.as_deref(), Some("IPS"));
    }

    #[test]
    fn test_rejects_empty_screen_vocabulary() {
        let config = ParsingConfig {
            screen_types: Vec::new(),
            ..ParsingConfig::default()
        };
        let err = TitleParser::with_config(&config).unwrap_err();
        assert_eq!(err.field(), "screen_types");
    }

    #[test]
    fn test_rejects_zero_color_limit() {
        let config = ParsingConfig {
            color_token_limit: 0,
            ..ParsingConfig::default()
        };
        assert!(TitleParser::with_config(&config).is_err());
    }

    #[test]
    fn test_empty_strip_words_disable_stripping() {
        let config = ParsingConfig {
            strip_words: Vec::new(),
            ..ParsingConfig::default()
        };
        let parser = TitleParser::with_config(&config).unwrap();
        let attrs = parser.parse("Смартфон Honor X8");
        assert_eq!(attrs.brand.as_deref(), Some("Смартфон"));
    }
}
