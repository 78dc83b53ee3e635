//! Parsing service
//!
//! Turns a stream of input lines into flat product records. Each line is
//! decoded on its own; a malformed line is logged and counted as skipped while
//! the rest of the batch proceeds. In parallel mode records are spread over a
//! worker pool and the output keeps input order.

use anyhow::{Context, Result};
use rayon::prelude::*;
use serde::Serialize;
use serde_json::Value;
use std::io::{BufRead, Write};
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;

use super::error::{PipelineError, PipelineResult};
use crate::domain::catalog_record::CatalogRecord;
use crate::domain::product::{FlatRecord, Product};
use crate::infrastructure::config::{AppConfig, BatchConfig};
use crate::infrastructure::parsing::TitleParser;

/// One decoded input line
#[derive(Debug, Clone, PartialEq)]
pub enum InputRecord {
    /// A bare title
    Title(String),
    /// A catalog record with the title under `title_raw`
    Catalog(CatalogRecord),
}

impl InputRecord {
    /// Decode one line: a JSON object, a JSON string, or plain title text.
    ///
    /// Blank lines decode to `None`.
    pub fn from_line(line_no: usize, line: &str) -> PipelineResult<Option<Self>> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }

        if !trimmed.starts_with(['{', '"', '[']) {
            return Ok(Some(Self::Title(trimmed.to_string())));
        }

        let value: Value = serde_json::from_str(trimmed).map_err(|source| PipelineError::InvalidJson {
            line: line_no,
            source,
        })?;

        match value {
            Value::Object(fields) => Ok(Some(Self::Catalog(CatalogRecord::new(fields)))),
            Value::String(title) => Ok(Some(Self::Title(title))),
            other => Err(PipelineError::UnsupportedRecord {
                line: line_no,
                kind: json_kind(&other),
            }),
        }
    }
}

/// Counts for one batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub processed: usize,
    pub skipped: usize,
}

/// Flat records in input order plus the batch counts
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchOutput {
    pub records: Vec<FlatRecord>,
    pub summary: BatchSummary,
}

/// High-level service that turns titles and catalog records into products
pub struct ParsingService {
    parser: Arc<TitleParser>,
    base_url: Option<Url>,
    pool: Option<rayon::ThreadPool>,
}

impl ParsingService {
    /// Create a service from the application configuration
    pub fn new(config: &AppConfig) -> Result<Self> {
        let parser = TitleParser::with_config(&config.parsing).context("Failed to create title parser")?;

        let base_url = config
            .parsing
            .base_url
            .as_deref()
            .map(Url::parse)
            .transpose()
            .context("Invalid parsing.base_url")?;

        let service = Self::with_parser(parser, base_url, &config.batch).context("Failed to create parsing service")?;
        Ok(service)
    }

    /// Create a service around an existing parser
    pub fn with_parser(parser: TitleParser, base_url: Option<Url>, batch: &BatchConfig) -> PipelineResult<Self> {
        let pool = if batch.parallel {
            Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(batch.worker_threads)
                    .thread_name(|index| format!("phone-specs-worker-{index}"))
                    .build()?,
            )
        } else {
            None
        };

        Ok(Self {
            parser: Arc::new(parser),
            base_url,
            pool,
        })
    }

    pub fn parser(&self) -> &TitleParser {
        &self.parser
    }

    pub fn is_parallel(&self) -> bool {
        self.pool.is_some()
    }

    /// Build the product for one decoded input
    pub fn product(&self, input: &InputRecord) -> Product {
        match input {
            InputRecord::Title(title) => Product::from_title_with(self.parser.as_ref(), title, None),
            InputRecord::Catalog(record) => {
                Product::from_catalog_record_with(self.parser.as_ref(), record, self.base_url.as_ref())
            }
        }
    }

    /// Process input lines into flat records, skipping undecodable lines
    pub fn process_lines<I, S>(&self, lines: I) -> BatchOutput
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut summary = BatchSummary::default();
        let mut inputs = Vec::new();

        for (index, line) in lines.into_iter().enumerate() {
            match InputRecord::from_line(index + 1, line.as_ref()) {
                Ok(Some(input)) => inputs.push(input),
                Ok(None) => {}
                Err(e) => {
                    warn!("Skipping record: {}", e);
                    summary.skipped += 1;
                }
            }
        }

        let records = match &self.pool {
            Some(pool) => pool.install(|| {
                inputs
                    .par_iter()
                    .map(|input| self.product(input).to_record())
                    .collect::<Vec<_>>()
            }),
            None => inputs.iter().map(|input| self.product(input).to_record()).collect(),
        };

        summary.processed = records.len();
        debug!(
            "Batch done: {} processed, {} skipped (parallel: {})",
            summary.processed,
            summary.skipped,
            self.is_parallel()
        );

        BatchOutput { records, summary }
    }

    /// Read every line from `reader` and process them.
    ///
    /// An unreadable stream fails the whole batch; bad lines do not.
    pub fn process_reader<R: BufRead>(&self, reader: R) -> PipelineResult<BatchOutput> {
        let lines = reader.lines().collect::<Result<Vec<_>, _>>()?;
        info!("Read {} input lines", lines.len());
        Ok(self.process_lines(lines))
    }

    /// Write records as JSON lines
    pub fn write_records<W: Write>(records: &[FlatRecord], mut writer: W) -> PipelineResult<()> {
        for record in records {
            serde_json::to_writer(&mut writer, record)?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;
        Ok(())
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
