//! Logging system configuration and initialization
//!
//! - Console output on stderr (stdout carries the data stream)
//! - Optional file output through a non-blocking appender
//! - Optional structured JSON formatting
//! - `RUST_LOG` overrides the configured level and module filters
//! - UTC timestamps

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tracing::{debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{
    EnvFilter, Layer, Registry,
    fmt::{self, time::FormatTime},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

// Re-export LoggingConfig from config module
pub use crate::infrastructure::config::LoggingConfig;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

// Global guard to keep the log file writer alive
lazy_static! {
    static ref LOG_GUARDS: Mutex<Vec<WorkerGuard>> = Mutex::new(Vec::new());
}

/// UTC timestamps with millisecond precision
struct UtcTimeFormatter;

impl FormatTime for UtcTimeFormatter {
    fn format_time(&self, w: &mut fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", Utc::now().format("%Y-%m-%d %H:%M:%S%.3f UTC"))
    }
}

/// Initialize the logging system with default configuration
pub fn init_logging() -> Result<()> {
    init_logging_with_config(&LoggingConfig::default())
}

/// Initialize logging with custom configuration.
///
/// Calling this again once a subscriber is installed is a no-op.
pub fn init_logging_with_config(config: &LoggingConfig) -> Result<()> {
    if !config.console_output && !config.file_output {
        return Err(anyhow!("No logging output configured"));
    }

    let (env_filter, rejected) = build_env_filter(config);
    let mut layers: Vec<BoxedLayer> = Vec::new();
    let mut guard = None;

    if config.file_output {
        std::fs::create_dir_all(&config.log_dir)
            .with_context(|| format!("Failed to create log directory {}", config.log_dir.display()))?;
        rotate_existing_log_file(&config.log_dir, &config.file_name)?;

        let (file_writer, file_guard) = non_blocking(rolling::never(&config.log_dir, &config.file_name));
        guard = Some(file_guard);

        let file_layer = fmt::Layer::new()
            .with_writer(file_writer)
            .with_timer(UtcTimeFormatter)
            .with_ansi(false);
        layers.push(if config.json_format {
            file_layer
                .json()
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .boxed()
        } else {
            file_layer.with_target(false).boxed()
        });
    }

    if config.console_output {
        let console_layer = fmt::Layer::new()
            .with_writer(std::io::stderr)
            .with_timer(UtcTimeFormatter);
        layers.push(if config.json_format {
            console_layer.json().boxed()
        } else {
            console_layer.with_target(false).boxed()
        });
    }

    if Registry::default().with(layers).with(env_filter).try_init().is_err() {
        debug!("Logging already initialized; keeping the existing subscriber");
        return Ok(());
    }

    if let Some(file_guard) = guard {
        LOG_GUARDS
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(file_guard);
    }

    for directive in rejected {
        warn!("Ignoring invalid log filter directive '{}'", directive);
    }

    info!("Logging system initialized");
    info!("Log level: {}", config.level);
    info!("JSON format: {}", config.json_format);
    if config.file_output {
        info!("Log file: {:?}", config.log_dir.join(&config.file_name));
    }

    Ok(())
}

/// Environment filter for the configuration; `RUST_LOG` wins when set.
///
/// Also returns module directives that could not be parsed.
pub fn build_env_filter(config: &LoggingConfig) -> (EnvFilter, Vec<String>) {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => (filter, Vec::new()),
        Err(_) => filter_from_config(config),
    }
}

fn filter_from_config(config: &LoggingConfig) -> (EnvFilter, Vec<String>) {
    let mut filter = EnvFilter::new(&config.level);
    let mut rejected = Vec::new();

    let mut modules = config.module_filters.iter().collect::<Vec<_>>();
    modules.sort();

    for (module, level) in modules {
        let directive = format!("{module}={level}");
        match directive.parse() {
            Ok(parsed) => filter = filter.add_directive(parsed),
            Err(_) => rejected.push(directive),
        }
    }

    (filter, rejected)
}

/// Rename an existing log file to `<stem>.<timestamp>.log` so every run starts fresh.
fn rotate_existing_log_file(log_dir: &Path, file_name: &str) -> Result<Option<PathBuf>> {
    let log_file_path = log_dir.join(file_name);
    if !log_file_path.exists() {
        return Ok(None);
    }

    let metadata = std::fs::metadata(&log_file_path)
        .with_context(|| format!("Failed to get log file metadata for {}", log_file_path.display()))?;
    let file_time = metadata
        .modified()
        .unwrap_or_else(|_| std::time::SystemTime::now());
    let datetime: DateTime<Utc> = file_time.into();

    let file_stem = file_name.trim_end_matches(".log");
    let rotated = log_dir.join(format!("{}.{}.log", file_stem, datetime.format("%Y%m%dT%H%M%S%.3f")));

    std::fs::rename(&log_file_path, &rotated).with_context(|| {
        format!(
            "Failed to rotate log file {} to {}",
            log_file_path.display(),
            rotated.display()
        )
    })?;

    Ok(Some(rotated))
}
