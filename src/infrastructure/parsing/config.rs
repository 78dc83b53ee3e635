//! Parsing configuration for title extraction
//!
//! Centralized vocabulary and thresholds used by the title parser.

use serde::{Deserialize, Serialize};

use crate::infrastructure::config::defaults;

/// Main parsing configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsingConfig {
    /// Words removed from titles before segmentation (whole word, any case)
    pub strip_words: Vec<String>,

    /// Screen technology vocabulary matched as substrings of spec tokens
    pub screen_types: Vec<String>,

    /// Largest capacity accepted as RAM without an explicit RAM hint
    pub ram_guard_gb: u32,

    /// Number of tokens after the storage size that form the color
    pub color_token_limit: usize,

    /// Base URL for resolving relative product links from catalog records
    pub base_url: Option<String>,
}

impl Default for ParsingConfig {
    fn default() -> Self {
        Self {
            strip_words: defaults::STRIP_WORDS.iter().map(ToString::to_string).collect(),
            screen_types: defaults::SCREEN_TYPES.iter().map(ToString::to_string).collect(),
            ram_guard_gb: defaults::RAM_GUARD_GB,
            color_token_limit: defaults::COLOR_TOKEN_LIMIT,
            base_url: None,
        }
    }
}

impl ParsingConfig {
    /// Set the base URL used for relative product links
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }
}
