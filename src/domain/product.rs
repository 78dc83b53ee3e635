use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use tracing::debug;
use url::Url;

use super::catalog_record::{coerce, CatalogRecord};
use super::metrics::{PriceSegment, ValueCategory, ValueInputs};
use super::parsed_attributes::ParsedAttributes;
use crate::infrastructure::parsing::{TextParser, TitleParser};

/// Flat field-name to scalar mapping handed to the persistence layer
pub type FlatRecord = Map<String, Value>;

/// Side-channel key holding the raw catalog record
pub const CATALOG_RAW_KEY: &str = "catalog_raw";

/// A smartphone listing: title attributes, catalog fields and derived metrics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub product_url: Option<String>,
    pub product_guid: Option<String>,
    pub product_code: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub color: Option<String>,
    pub price: Option<u64>,
    pub old_price: Option<u64>,
    pub installment_price: Option<String>,
    pub installment_monthly: Option<u64>,
    pub diagonal_in: Option<f64>,
    pub ram_gb: Option<u32>,
    pub storage_gb: Option<u32>,
    pub battery_mah: Option<u32>,
    pub camera_list_mp: Vec<u32>,
    pub num_cameras: Option<u32>,
    pub max_camera_mp: Option<u32>,
    pub screen_type: Option<String>,
    pub resolution: Option<String>,
    pub has_nfc: Option<bool>,
    pub has_5g: Option<bool>,
    pub rating: Option<f64>,
    pub reviews_count: Option<u64>,
    pub availability: Option<String>,
    pub discount: Option<String>,
    pub specs_raw: Option<String>,
    pub img_url: Option<String>,
    pub processor: Option<String>,
    pub sim: Option<String>,
    pub price_segment: Option<PriceSegment>,
    pub value_score: Option<f64>,
    pub value_category: Option<ValueCategory>,

    /// Pass-through data not modeled above
    #[serde(default)]
    pub extra: Map<String, Value>,
}

impl Product {
    /// Build a product from a title alone
    pub fn from_title(title: &str, product_url: Option<&str>) -> Self {
        Self::from_title_with(TitleParser::shared(), title, product_url)
    }

    pub fn from_title_with<P>(parser: &P, title: &str, product_url: Option<&str>) -> Self
    where
        P: TextParser<Output = ParsedAttributes> + ?Sized,
    {
        let parsed = parser.parse_text(title);
        let mut product = Self {
            product_url: product_url.filter(|url| !url.is_empty()).map(ToString::to_string),
            has_nfc: Some(parsed.has_nfc),
            has_5g: Some(parsed.has_5g),
            diagonal_in: parsed.diagonal_in,
            brand: parsed.brand,
            model: parsed.model,
            storage_gb: parsed.storage_gb,
            color: parsed.color,
            ram_gb: parsed.ram_gb,
            battery_mah: parsed.battery_mah,
            screen_type: parsed.screen_type,
            resolution: parsed.resolution,
            camera_list_mp: parsed.camera_list_mp,
            num_cameras: parsed.num_cameras,
            max_camera_mp: parsed.max_camera_mp,
            specs_raw: parsed.specs_raw,
            processor: parsed.processor,
            sim: parsed.sim,
            ..Self::default()
        };
        product.calculate_targets();
        product
    }

    /// Build a product from a raw catalog record (title under `title_raw`)
    pub fn from_catalog_record(record: &CatalogRecord) -> Self {
        Self::from_catalog_record_with(TitleParser::shared(), record, None)
    }

    /// Overlay catalog fields on the title-derived product.
    ///
    /// A field is replaced only when its raw value is present and coerces; a
    /// relative `product_url` is joined onto `base_url` when one is given.
    pub fn from_catalog_record_with<P>(parser: &P, record: &CatalogRecord, base_url: Option<&Url>) -> Self
    where
        P: TextParser<Output = ParsedAttributes> + ?Sized,
    {
        let product_url = record
            .coerce("product_url", None, coerce::text)
            .map(|url| resolve_url(url, base_url));
        let mut product = Self::from_title_with(parser, record.title(), product_url.as_deref());

        product.product_guid = record.coerce("product_guid", product.product_guid.take(), coerce::text);
        product.product_code = record.coerce("product_code", product.product_code.take(), coerce::text);
        product.price = record.coerce("price", product.price, coerce::price);
        product.old_price = record.coerce("old_price", product.old_price, coerce::price);
        product.installment_price = record.coerce("installment", product.installment_price.take(), coerce::text);
        product.installment_monthly = record.coerce("installment_monthly", product.installment_monthly, coerce::integer);
        product.rating = record.coerce("rating", product.rating, coerce::rating);
        product.reviews_count = record.coerce("reviews_count", product.reviews_count, coerce::count);
        product.availability = record.coerce("availability", product.availability.take(), coerce::text);
        product.discount = record.coerce("discount", product.discount.take(), coerce::text);
        product.img_url = record.coerce("img_url", product.img_url.take(), coerce::text);

        if let Some(cameras) = record.coerce("camera_list_mp", None, coerce::camera_list) {
            product.camera_list_mp = cameras;
        }
        product.sync_camera_counts();

        product
            .extra
            .insert(CATALOG_RAW_KEY.to_string(), Value::Object(record.as_map().clone()));

        product.calculate_targets();
        product
    }

    fn sync_camera_counts(&mut self) {
        if self.camera_list_mp.is_empty() {
            return;
        }
        self.num_cameras = Some(self.camera_list_mp.len() as u32);
        self.max_camera_mp = self.camera_list_mp.iter().copied().max();
    }

    /// Recompute price segment and value score from the current fields
    pub fn calculate_targets(&mut self) {
        self.price_segment = PriceSegment::from_price(self.price);

        let value = self.value_inputs().score();
        self.value_score = value.map(|v| v.score);
        self.value_category = value.map(|v| v.category);
    }

    pub fn value_inputs(&self) -> ValueInputs {
        ValueInputs {
            price: self.price,
            old_price: self.old_price,
            rating: self.rating,
            ram_gb: self.ram_gb,
            storage_gb: self.storage_gb,
            max_camera_mp: self.max_camera_mp,
            has_5g: self.has_5g.unwrap_or(false),
        }
    }

    /// Flatten into an order-stable mapping of scalars.
    ///
    /// `camera_list_mp` is comma-joined, flags become 0/1, and non-scalar
    /// side-channel values are rendered as JSON text.
    pub fn to_record(&self) -> FlatRecord {
        let cameras = (!self.camera_list_mp.is_empty()).then(|| {
            self.camera_list_mp
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(",")
        });
        let flag = |value: Option<bool>| value.map(u8::from);

        let mut record = FlatRecord::new();
        let mut put = |key: &str, value: Value| {
            record.insert(key.to_string(), value);
        };
        put("product_url", Value::from(self.product_url.clone()));
        put("product_guid", Value::from(self.product_guid.clone()));
        put("product_code", Value::from(self.product_code.clone()));
        put("brand", Value::from(self.brand.clone()));
        put("model", Value::from(self.model.clone()));
        put("color", Value::from(self.color.clone()));
        put("price", Value::from(self.price));
        put("old_price", Value::from(self.old_price));
        put("installment_price", Value::from(self.installment_price.clone()));
        put("installment_monthly", Value::from(self.installment_monthly));
        put("diagonal_in", Value::from(self.diagonal_in));
        put("ram_gb", Value::from(self.ram_gb));
        put("storage_gb", Value::from(self.storage_gb));
        put("battery_mah", Value::from(self.battery_mah));
        put("num_cameras", Value::from(self.num_cameras));
        put("max_camera_mp", Value::from(self.max_camera_mp));
        put("camera_list_mp", Value::from(cameras));
        put("screen_type", Value::from(self.screen_type.clone()));
        put("resolution", Value::from(self.resolution.clone()));
        put("has_nfc", Value::from(flag(self.has_nfc)));
        put("has_5g", Value::from(flag(self.has_5g)));
        put("rating", Value::from(self.rating));
        put("reviews_count", Value::from(self.reviews_count));
        put("availability", Value::from(self.availability.clone()));
        put("discount", Value::from(self.discount.clone()));
        put("img_url", Value::from(self.img_url.clone()));
        put("specs_raw", Value::from(self.specs_raw.clone()));
        put("price_segment", Value::from(self.price_segment.map(PriceSegment::as_str)));
        put("value_score", Value::from(self.value_score));
        put("value_category", Value::from(self.value_category.map(ValueCategory::as_str)));

        for (key, value) in &self.extra {
            put(key, scalar(value));
        }
        record
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Product({} {}, price: {:?}, segment: {:?}, value: {:?})",
            self.brand.as_deref().unwrap_or("?"),
            self.model.as_deref().unwrap_or("?"),
            self.price,
            self.price_segment.map(PriceSegment::as_str),
            self.value_score
        )
    }
}

fn resolve_url(raw: String, base: Option<&Url>) -> String {
    match (Url::parse(&raw), base) {
        (Ok(_), _) | (Err(_), None) => raw,
        (Err(_), Some(base)) => match base.join(&raw) {
            Ok(joined) => joined.into(),
            Err(e) => {
                debug!("Could not join '{}' onto {}: {}", raw, base, e);
                raw
            }
        },
    }
}

fn scalar(value: &Value) -> Value {
    match value {
        Value::Array(_) | Value::Object(_) => Value::String(value.to_string()),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const REFERENCE_TITLE: &str =
        "6.1 Apple iPhone 13 128ГБ синий [6 ГБ ОЗУ, AMOLED, 1170x2532, 12+12 Мп, 3240 мАч, 5G, NFC]";

    fn record(value: Value) -> CatalogRecord {
        CatalogRecord::try_from(value).unwrap()
    }

    #[test]
    fn test_from_title_copies_attributes() {
        let product = Product::from_title(REFERENCE_TITLE, Some("https://shop.example/p/1"));
        assert_eq!(product.product_url.as_deref(), Some("https://shop.example/p/1"));
        assert_eq!(product.brand.as_deref(), Some("Apple"));
        assert_eq!(product.camera_list_mp, vec![12, 12]);
        assert_eq!(product.has_nfc, Some(true));
        assert_eq!(product.has_5g, Some(true));
        assert_eq!(product.price_segment, None);
        assert_eq!(product.value_score, None);
    }

    #[test]
    fn test_empty_url_is_absent() {
        assert_eq!(Product::from_title("Honor X8", Some("")).product_url, None);
    }

    #[test]
    fn test_catalog_overlay_and_metrics() {
        let rec = record(json!({
            "title_raw": REFERENCE_TITLE,
            "product_guid": "a1b2",
            "price": 54999,
            "old_price": "59 999 ₽",
            "installment": "2750 ₽/мес",
            "rating": "4.8",
            "reviews_count": "1.2 тыс отзывов",
            "availability": "",
        }));
        let product = Product::from_catalog_record(&rec);

        assert_eq!(product.product_guid.as_deref(), Some("a1b2"));
        assert_eq!(product.price, Some(54_999));
        assert_eq!(product.old_price, Some(59_999));
        assert_eq!(product.installment_price.as_deref(), Some("2750 ₽/мес"));
        assert_eq!(product.installment_monthly, None);
        assert_eq!(product.rating, Some(4.8));
        assert_eq!(product.reviews_count, Some(1200));
        assert_eq!(product.availability, None);
        assert_eq!(product.price_segment, Some(PriceSegment::Flagship));
        assert!(product.value_score.is_some());
        assert_eq!(product.extra.get(CATALOG_RAW_KEY), Some(&Value::from(rec)));
    }

    #[test]
    fn test_malformed_values_keep_previous() {
        let rec = record(json!({
            "title_raw": "Honor X8 128GB",
            "reviews_count": "нет",
            "rating": "n/a",
            "installment_monthly": "abc",
            "installment": "2750 ₽/мес",
        }));
        let product = Product::from_catalog_record(&rec);
        assert_eq!(product.reviews_count, None);
        assert_eq!(product.rating, None);
        assert_eq!(product.installment_monthly, None);
        assert_eq!(product.storage_gb, Some(128));
        assert_eq!(product.installment_price.as_deref(), Some("2750 ₽/мес"));
    }

    #[test]
    fn test_zero_rating_is_unrated_in_any_form() {
        let scored = |rating: Value| {
            let rec = record(json!({
                "title_raw": "Honor X8 128GB [8 ГБ]",
                "price": 10000,
                "rating": rating,
            }));
            let product = Product::from_catalog_record(&rec);
            (product.rating, product.value_score)
        };

        let numeric = scored(json!(0));
        assert_eq!(numeric, (None, Some(0.72)));
        assert_eq!(scored(json!("0")), numeric);
        assert_eq!(scored(json!("0,0")), numeric);
    }

    #[test]
    fn test_catalog_camera_string_replaces_title_list() {
        let rec = record(json!({
            "title_raw": REFERENCE_TITLE,
            "camera_list_mp": "50, 12, 12",
        }));
        let product = Product::from_catalog_record(&rec);
        assert_eq!(product.camera_list_mp, vec![50, 12, 12]);
        assert_eq!(product.num_cameras, Some(3));
        assert_eq!(product.max_camera_mp, Some(50));
    }

    #[test]
    fn test_relative_url_is_joined_onto_base() {
        let base = Url::parse("https://www.dns-shop.ru/").unwrap();
        let rec = record(json!({"title_raw": "Honor X8", "product_url": "/product/abc/"}));
        let product = Product::from_catalog_record_with(TitleParser::shared(), &rec, Some(&base));
        assert_eq!(product.product_url.as_deref(), Some("https://www.dns-shop.ru/product/abc/"));

        let absolute = record(json!({"product_url": "https://other.example/x"}));
        let product = Product::from_catalog_record_with(TitleParser::shared(), &absolute, Some(&base));
        assert_eq!(product.product_url.as_deref(), Some("https://other.example/x"));
    }

    #[test]
    fn test_flat_record_shape() {
        let mut product = Product::from_title(REFERENCE_TITLE, None);
        product.extra.insert("source".to_string(), json!("dns"));
        product.extra.insert("tags".to_string(), json!(["a", "b"]));
        let flat = product.to_record();

        let keys = flat.keys().map(String::as_str).collect::<Vec<_>>();
        assert_eq!(keys[..3], ["product_url", "product_guid", "product_code"]);
        assert_eq!(keys[29], "value_category");
        assert_eq!(keys[30..], ["source", "tags"]);

        assert_eq!(flat["camera_list_mp"], json!("12,12"));
        assert_eq!(flat["has_nfc"], json!(1));
        assert_eq!(flat["has_5g"], json!(1));
        assert_eq!(flat["diagonal_in"], json!(6.1));
        assert_eq!(flat["price"], Value::Null);
        assert_eq!(flat["tags"], json!("[\"a\",\"b\"]"));
    }

    #[test]
    fn test_default_product_flags_are_null() {
        let flat = Product::default().to_record();
        assert_eq!(flat["has_nfc"], Value::Null);
        assert_eq!(flat["camera_list_mp"], Value::Null);
    }

    #[test]
    fn test_display() {
        let mut product = Product::from_title("Honor X8", None);
        product.price = Some(15_000);
        product.calculate_targets();
        assert_eq!(
            product.to_string(),
            "Product(Honor X8, price: Some(15000), segment: Some(\"mid-range\"), value: Some(0.0))"
        );
    }
}
