//! Catalog record merging and the batch pipeline
use phone_specs_lib::application::{BatchSummary, ParsingService};
use phone_specs_lib::domain::{CatalogRecord, PriceSegment, Product, ValueCategory};
use phone_specs_lib::infrastructure::AppConfig;
use serde_json::{Value, json};

fn record(value: Value) -> CatalogRecord {
    CatalogRecord::try_from(value).unwrap()
}

#[test]
fn catalog_fields_overlay_title_attributes() {
    let rec = record(json!({
        "product_guid": "8f1c",
        "product_code": "5066554",
        "product_url": "https://www.dns-shop.ru/product/8f1c/",
        "title_raw": "6.7\" Смартфон Samsung Galaxy S23 Ultra 256 ГБ черный [12 ГБ, Dynamic AMOLED, 200+12+10+10 Мп, 5000 мАч, 5G, NFC]",
        "img_url": "https://cdn.example/s23.jpg",
        "price": 99999,
        "old_price": 119999,
        "installment_monthly": 4167,
        "installment": "4167 ₽/мес",
        "rating": 4.9,
        "reviews_count": 153,
        "availability": "В наличии",
        "discount": "-17%"
    }));
    let product = Product::from_catalog_record(&rec);

    assert_eq!(product.brand.as_deref(), Some("Samsung"));
    assert_eq!(product.model.as_deref(), Some("Galaxy S23 Ultra"));
    assert_eq!(product.ram_gb, Some(12));
    assert_eq!(product.camera_list_mp, vec![200, 12, 10, 10]);
    assert_eq!(product.max_camera_mp, Some(200));
    assert_eq!(product.product_code.as_deref(), Some("5066554"));
    assert_eq!(product.installment_monthly, Some(4167));
    assert_eq!(product.reviews_count, Some(153));
    assert_eq!(product.discount.as_deref(), Some("-17%"));
    assert_eq!(product.price_segment, Some(PriceSegment::Flagship));
    assert!(product.value_category.is_some());
    assert_eq!(product.extra["catalog_raw"], Value::from(rec));
}

#[test]
fn malformed_reviews_count_keeps_title_value() {
    let rec = record(json!({
        "title_raw": "Honor X8 128GB",
        "reviews_count": "отзывов пока нет"
    }));
    let product = Product::from_catalog_record(&rec);
    assert_eq!(product.reviews_count, None);
    assert_eq!(product.storage_gb, Some(128));
}

#[test]
fn falsy_values_do_not_overwrite() {
    let rec = record(json!({
        "title_raw": "Honor X8",
        "price": 0,
        "availability": null,
        "discount": ""
    }));
    let product = Product::from_catalog_record(&rec);
    assert_eq!(product.price, None);
    assert_eq!(product.price_segment, None);
    assert_eq!(product.value_score, None);
    assert_eq!(product.availability, None);
    assert_eq!(product.discount, None);
}

#[test]
fn catalog_camera_array_replaces_title_cameras() {
    let rec = record(json!({
        "title_raw": "Apple iPhone 15 128GB [48+12 Мп]",
        "camera_list_mp": [48, 12, 12]
    }));
    let product = Product::from_catalog_record(&rec);
    assert_eq!(product.camera_list_mp, vec![48, 12, 12]);
    assert_eq!(product.num_cameras, Some(3));
}

#[test]
fn flat_record_contract() {
    let rec = record(json!({
        "title_raw": "Apple iPhone 13 128ГБ синий [6 ГБ ОЗУ, 12+12 Мп, NFC]",
        "price": 20000,
        "rating": "4,5"
    }));
    let flat = Product::from_catalog_record(&rec).to_record();

    assert_eq!(flat["camera_list_mp"], json!("12,12"));
    assert_eq!(flat["has_nfc"], json!(1));
    assert_eq!(flat["has_5g"], json!(0));
    assert_eq!(flat["rating"], json!(4.5));
    assert_eq!(flat["price_segment"], json!("premium"));
    assert!(flat["catalog_raw"].is_string());
    assert!(flat.values().all(|v| !v.is_array() && !v.is_object()));
}

#[test]
fn value_category_follows_score() {
    let mut product = Product::from_title("Honor X8 128GB [8 ГБ, 64 Мп]", None);
    product.price = Some(15_000);
    product.calculate_targets();

    // (8000 + 6400 + 6400) / 15000 * 0.5
    assert_eq!(product.value_score, Some(0.693));
    assert_eq!(product.value_category, Some(ValueCategory::ExceptionalValue));
}

#[test]
fn batch_pipeline_end_to_end() {
    let service = ParsingService::new(&AppConfig::default()).unwrap();
    let input = concat!(
        "Apple iPhone 13 128ГБ синий [6 ГБ ОЗУ, NFC]\n",
        "\n",
        "{\"title_raw\": \"Xiaomi Redmi 12 256GB\", \"price\": \"12 999 ₽\"}\n",
        "Nokia 3310\n",
        "[\"not\", \"a record\"]\n",
    );
    let output = service.process_reader(input.as_bytes()).unwrap();

    assert_eq!(output.summary, BatchSummary { processed: 3, skipped: 1 });
    assert_eq!(output.records[1]["price"], json!(12999));
    assert_eq!(output.records[1]["price_segment"], json!("mid-range"));
    assert_eq!(output.records[2]["brand"], json!("Nokia"));
}
