//! Configuration infrastructure
//!
//! Settings are layered with the `config` crate:
//! 1. Built-in defaults (see [`defaults`])
//! 2. Optional configuration file (`--config <path>`, see [`crate::cli`])
//! 3. Environment variables, e.g. `PHONE_SPECS_PARSING__RAM_GUARD_GB=32`
//!
//! The merged result is validated before use.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use url::Url;

pub use crate::infrastructure::parsing::config::ParsingConfig;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {source}")]
    Load {
        #[from]
        source: config::ConfigError,
    },

    #[error("Configuration validation failed: {message}")]
    Validation { message: String },
}

impl ConfigError {
    fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Title parsing vocabulary and thresholds
    pub parsing: ParsingConfig,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// Batch processing configuration
    pub batch: BatchConfig,
}

/// Logging configuration settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "off", "error", "warn", "info", "debug", "trace"
    pub level: String,

    /// Enable console output (stderr)
    pub console_output: bool,

    /// Enable file output
    pub file_output: bool,

    /// Enable JSON formatted logs
    pub json_format: bool,

    /// Directory for the log file
    pub log_dir: PathBuf,

    /// Log file name inside `log_dir`
    pub file_name: String,

    /// Module-specific log level filters (e.g., "phone_specs_lib::infrastructure": "debug")
    pub module_filters: HashMap<String, String>,
}

/// Batch processing configuration settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Fan records out over a worker pool (output order is preserved)
    pub parallel: bool,

    /// Worker threads for parallel mode; 0 uses the pool default
    pub worker_threads: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::LOG_LEVEL.to_string(),
            console_output: defaults::LOG_CONSOLE_OUTPUT,
            file_output: defaults::LOG_FILE_OUTPUT,
            json_format: defaults::LOG_JSON_FORMAT,
            log_dir: PathBuf::from(defaults::LOG_DIR),
            file_name: defaults::LOG_FILE_NAME.to_string(),
            module_filters: HashMap::new(),
        }
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            parallel: defaults::BATCH_PARALLEL,
            worker_threads: defaults::BATCH_WORKER_THREADS,
        }
    }
}

impl AppConfig {
    /// Load defaults, then the optional file, then environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder().add_source(config::Config::try_from(&Self::default())?);

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let settings = builder
            .add_source(
                config::Environment::with_prefix(defaults::ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("parsing.strip_words")
                    .with_list_parse_key("parsing.screen_types"),
            )
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let parsing = &self.parsing;

        if parsing.ram_guard_gb == 0 {
            return Err(ConfigError::validation("parsing.ram_guard_gb must be greater than 0"));
        }

        if parsing.color_token_limit == 0 {
            return Err(ConfigError::validation(
                "parsing.color_token_limit must be greater than 0",
            ));
        }

        if parsing.screen_types.iter().all(|s| s.trim().is_empty()) {
            return Err(ConfigError::validation("parsing.screen_types must not be empty"));
        }

        if let Some(base_url) = &parsing.base_url {
            Url::parse(base_url).map_err(|e| {
                ConfigError::validation(format!("parsing.base_url '{base_url}' is not an absolute URL: {e}"))
            })?;
        }

        LevelFilter::from_str(&self.logging.level).map_err(|_| {
            ConfigError::validation(format!("logging.level '{}' is not a known level", self.logging.level))
        })?;

        for (module, level) in &self.logging.module_filters {
            LevelFilter::from_str(level).map_err(|_| {
                ConfigError::validation(format!("logging.module_filters.{module} '{level}' is not a known level"))
            })?;
        }

        if self.logging.file_output && self.logging.file_name.trim().is_empty() {
            return Err(ConfigError::validation(
                "logging.file_name must be set when file output is enabled",
            ));
        }

        Ok(())
    }
}

/// Default configuration values
pub mod defaults {
    /// Prefix of environment overrides
    pub const ENV_PREFIX: &str = "PHONE_SPECS";

    // Parsing defaults
    /// Words removed from titles before segmentation
    pub const STRIP_WORDS: &[&str] = &["смартфон"];

    /// Screen-technology vocabulary matched inside spec tokens
    pub const SCREEN_TYPES: &[&str] = &[
        "retina",
        "amoled",
        "oled",
        "ips",
        "lcd",
        "super retina",
        "dynamic amoled",
        "promotion",
        "super amoled",
    ];

    /// Largest capacity read as RAM without an explicit RAM hint
    pub const RAM_GUARD_GB: u32 = 64;

    /// Tokens after the storage size that make up the color
    pub const COLOR_TOKEN_LIMIT: usize = 3;

    // Log configuration defaults
    pub const LOG_LEVEL: &str = "info";
    pub const LOG_CONSOLE_OUTPUT: bool = true;
    pub const LOG_FILE_OUTPUT: bool = false;
    pub const LOG_JSON_FORMAT: bool = false;
    pub const LOG_DIR: &str = "logs";
    pub const LOG_FILE_NAME: &str = "phone-specs.log";

    // Batch configuration defaults
    pub const BATCH_PARALLEL: bool = false;
    pub const BATCH_WORKER_THREADS: usize = 0;
}
