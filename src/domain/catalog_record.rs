//! Raw catalog record
//!
//! A loosely-typed mapping of fields scraped from a catalog card. Values may be
//! strings, numbers or nested data; [`try_coerce`] turns them into typed values
//! and keeps the previous value whenever a raw field is absent or malformed.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

/// Key holding the product title inside a catalog record
pub const TITLE_KEY: &str = "title_raw";

/// Raw catalog fields keyed by name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CatalogRecord(Map<String, Value>);

impl CatalogRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// A field only when its value is present (truthy)
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|value| is_truthy(value))
    }

    /// Title text, empty when absent or not a string
    pub fn title(&self) -> &str {
        self.get(TITLE_KEY).and_then(Value::as_str).unwrap_or_default()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Coerce the named field, falling back to `previous`
    pub fn coerce<T>(&self, key: &str, previous: Option<T>, coerce: impl FnOnce(&Value) -> Option<T>) -> Option<T> {
        try_coerce(self.get(key), previous, coerce)
    }
}

impl From<Map<String, Value>> for CatalogRecord {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

impl TryFrom<Value> for CatalogRecord {
    type Error = Value;

    /// Only JSON objects are records; anything else is handed back.
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(fields) => Ok(Self(fields)),
            other => Err(other),
        }
    }
}

impl From<CatalogRecord> for Value {
    fn from(record: CatalogRecord) -> Self {
        Value::Object(record.0)
    }
}

/// Presence test: null, `false`, zero, empty strings and empty containers are absent.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}

/// Coerce a raw value, keeping `previous` when the value is absent or the
/// coercion fails. Never surfaces an error.
pub fn try_coerce<T>(raw: Option<&Value>, previous: Option<T>, coerce: impl FnOnce(&Value) -> Option<T>) -> Option<T> {
    let Some(value) = raw.filter(|value| is_truthy(value)) else {
        return previous;
    };

    match coerce(value) {
        Some(coerced) => Some(coerced),
        None => {
            debug!("Coercion failed for {}, keeping previous value", value);
            previous
        }
    }
}

/// Coercers from raw JSON values to typed fields
pub mod coerce {
    use serde_json::Value;

    use crate::infrastructure::extractors::{extract_digit_groups, extract_price, parse_reviews_count};

    /// Strings verbatim; numbers and booleans rendered as text.
    pub fn text(value: &Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(flag) => Some(flag.to_string()),
            _ => None,
        }
    }

    /// Non-negative number, truncated to an integer
    pub fn whole_number(value: &Value) -> Option<u64> {
        let Value::Number(n) = value else {
            return None;
        };
        n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0)
                .map(|f| f.trunc() as u64)
        })
    }

    /// Price as a number or as price text (`"12 999 ₽"`)
    pub fn price(value: &Value) -> Option<u64> {
        match value {
            Value::String(s) => extract_price(s),
            other => whole_number(other),
        }
    }

    /// Strict integer: a number or a string holding only digits
    pub fn integer(value: &Value) -> Option<u64> {
        match value {
            Value::String(s) => s.trim().parse().ok(),
            other => whole_number(other),
        }
    }

    /// Review count as a number or as rating-block text (`"1.2 тыс отзывов"`)
    pub fn count(value: &Value) -> Option<u64> {
        match value {
            Value::String(s) => parse_reviews_count(s),
            other => whole_number(other),
        }
    }

    /// Rating as a number or decimal string (`"4,8"`); zero means unrated
    pub fn rating(value: &Value) -> Option<f64> {
        let rating = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().replace(',', ".").parse::<f64>().ok(),
            _ => None,
        };
        rating.filter(|f| f.is_finite() && *f != 0.0)
    }

    /// Camera list as an array of numbers, or as text whose digit groups are taken
    pub fn camera_list(value: &Value) -> Option<Vec<u32>> {
        let cameras = match value {
            Value::Array(items) => items
                .iter()
                .filter_map(|item| match item {
                    Value::String(s) => s.trim().parse().ok(),
                    other => whole_number(other).and_then(|n| u32::try_from(n).ok()),
                })
                .collect::<Vec<u32>>(),
            Value::String(s) => extract_digit_groups(s),
            _ => return None,
        };
        (!cameras.is_empty()).then_some(cameras)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn record(value: Value) -> CatalogRecord {
        CatalogRecord::try_from(value).unwrap()
    }

    #[rstest]
    #[case(json!(null), false)]
    #[case(json!(false), false)]
    #[case(json!(0), false)]
    #[case(json!(0.0), false)]
    #[case(json!(""), false)]
    #[case(json!([]), false)]
    #[case(json!({}), false)]
    #[case(json!(" "), true)]
    #[case(json!(-1), true)]
    #[case(json!([0]), true)]
    fn test_truthiness(#[case] value: Value, #[case] expected: bool) {
        assert_eq!(is_truthy(&value), expected);
    }

    #[test]
    fn test_try_coerce_keeps_previous_on_absence_and_failure() {
        assert_eq!(try_coerce(None, Some(5), coerce::integer), Some(5));
        assert_eq!(try_coerce(Some(&json!("")), Some(5), coerce::integer), Some(5));
        assert_eq!(try_coerce(Some(&json!("abc")), Some(5), coerce::integer), Some(5));
        assert_eq!(try_coerce(Some(&json!("12")), Some(5), coerce::integer), Some(12));
    }

    #[test]
    fn test_non_object_is_rejected() {
        assert_eq!(CatalogRecord::try_from(json!("title")), Err(json!("title")));
    }

    #[test]
    fn test_title_defaults_to_empty() {
        assert_eq!(record(json!({"price": 1})).title(), "");
        assert_eq!(record(json!({"title_raw": 42})).title(), "");
        assert_eq!(record(json!({"title_raw": "Honor X8"})).title(), "Honor X8");
    }

    #[rstest]
    #[case(json!(12999), Some(12999))]
    #[case(json!(12999.9), Some(12999))]
    #[case(json!("12 999 ₽"), Some(12999))]
    #[case(json!("нет"), None)]
    #[case(json!(-5), None)]
    fn test_price_coercion(#[case] value: Value, #[case] expected: Option<u64>) {
        assert_eq!(coerce::price(&value), expected);
    }

    #[rstest]
    #[case(json!(4.5), Some(4.5))]
    #[case(json!(" 4.8 "), Some(4.8))]
    #[case(json!("4,7"), Some(4.7))]
    #[case(json!("звезды"), None)]
    #[case(json!("0"), None)]
    #[case(json!(" 0,0 "), None)]
    fn test_rating_coercion(#[case] value: Value, #[case] expected: Option<f64>) {
        assert_eq!(coerce::rating(&value), expected);
    }

    #[test]
    fn test_count_coercion() {
        assert_eq!(coerce::count(&json!(153)), Some(153));
        assert_eq!(coerce::count(&json!("1.2 тыс отзывов")), Some(1200));
        assert_eq!(coerce::count(&json!("нет отзывов")), None);
    }

    #[test]
    fn test_camera_list_coercion() {
        assert_eq!(coerce::camera_list(&json!([50, 8, 2])), Some(vec![50, 8, 2]));
        assert_eq!(coerce::camera_list(&json!("50,8,2")), Some(vec![50, 8, 2]));
        assert_eq!(coerce::camera_list(&json!("нет")), None);
        assert_eq!(coerce::camera_list(&json!({"a": 1})), None);
    }

    #[test]
    fn test_text_coercion() {
        assert_eq!(coerce::text(&json!("abc")).as_deref(), Some("abc"));
        assert_eq!(coerce::text(&json!(123)).as_deref(), Some("123"));
        assert_eq!(coerce::text(&json!([1])), None);
    }
}
