//! Domain module - product data and derived metrics
//!
//! Pure data types: attributes parsed from a title, the raw catalog record,
//! the merged product and its price segment / value score.

pub mod catalog_record;
pub mod metrics;
pub mod parsed_attributes;
pub mod product;

// Re-export commonly used items for convenience
pub use catalog_record::{is_truthy, try_coerce, CatalogRecord};
pub use metrics::{PriceSegment, ValueCategory, ValueInputs, ValueScore};
pub use parsed_attributes::ParsedAttributes;
pub use product::{FlatRecord, Product};
