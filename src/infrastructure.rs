//! Infrastructure layer: text processing, title parsing, configuration and logging

pub mod config;
pub mod extractors;
pub mod logging;
pub mod parsing;
pub mod parsing_error;
pub mod text_normalizer;

// Re-export commonly used items
pub use config::{AppConfig, BatchConfig, ConfigError, LoggingConfig};
pub use logging::{init_logging, init_logging_with_config};
pub use parsing::{ParsingConfig, ParsingError, ParsingResult, TextParser, TitleParser};
pub use text_normalizer::normalize;
