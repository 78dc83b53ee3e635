//! Parsing error types
//!
//! Parsing a title never fails: a missing pattern is an absent field. These
//! errors only surface while building a parser from configuration.

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum ParsingError {
    #[error("Invalid pattern for {field}: {reason}")]
    InvalidPattern { field: String, reason: String },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String, field: String },
}

impl ParsingError {
    /// Create an invalid pattern error for a configured field
    pub fn invalid_pattern(field: &str, source: &regex::Error) -> Self {
        Self::InvalidPattern {
            field: field.to_string(),
            reason: source.to_string(),
        }
    }

    /// Create a configuration error for a field
    pub fn configuration(field: &str, message: &str) -> Self {
        Self::ConfigurationError {
            message: message.to_string(),
            field: field.to_string(),
        }
    }

    /// Name of the configuration field the error refers to
    pub fn field(&self) -> &str {
        match self {
            Self::InvalidPattern { field, .. } | Self::ConfigurationError { field, .. } => field,
        }
    }
}

pub type ParsingResult<T> = Result<T, ParsingError>;
