//! Batch pipeline errors

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("Line {line}: invalid JSON: {source}")]
    InvalidJson {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Line {line}: expected a JSON object or string, got {kind}")]
    UnsupportedRecord { line: usize, kind: &'static str },

    #[error("Failed to write output: {source}")]
    Output {
        #[from]
        source: serde_json::Error,
    },

    #[error("Failed to build worker pool: {source}")]
    WorkerPool {
        #[from]
        source: rayon::ThreadPoolBuildError,
    },
}

impl PipelineError {
    /// Whether the error concerns a single input line rather than the whole batch
    pub fn is_record_error(&self) -> bool {
        matches!(self, Self::InvalidJson { .. } | Self::UnsupportedRecord { .. })
    }
}

pub type PipelineResult<T> = Result<T, PipelineError>;
