//! Application layer - batch processing of titles and catalog records

pub mod error;
pub mod parsing_service;

// Re-export commonly used items
pub use error::{PipelineError, PipelineResult};
pub use parsing_service::{BatchOutput, BatchSummary, InputRecord, ParsingService};
