//! Title parsing infrastructure
//!
//! Compiled patterns, the main-segment segmenter, the spec-token classifier
//! and the [`TitleParser`] that ties them together.

pub mod config;
pub mod error;
pub mod patterns;
pub mod spec_classifier;
pub mod title_parser;
pub mod title_segmenter;

// Re-export public types
pub use config::ParsingConfig;
pub use error::{ParsingError, ParsingResult};
pub use spec_classifier::{ConflictPolicy, SpecClassifier, SpecField};
pub use title_parser::TitleParser;
pub use title_segmenter::{MainSegment, TitleSegmenter, TitleSegments};

/// Parser over free text that always yields an output
pub trait TextParser {
    type Output;

    /// Parse text; unrecognized input produces an empty output, never an error
    fn parse_text(&self, text: &str) -> Self::Output;
}
