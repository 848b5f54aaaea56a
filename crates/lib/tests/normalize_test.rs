//! # Normalizer Tests
//!
//! Covers text cleanup, price parsing, slug idempotence, list deduplication,
//! and stock-status resolution, including the fail-open defaults.

mod common;

use common::setup_tracing;
use shoprag::ingest::normalize::{
    clean_text, generate_slug, normalize_list, parse_price, parse_stock_status, ProductNormalizer,
};
use shoprag::{RawPrice, RawRecord, StockStatus};

fn normalizer() -> ProductNormalizer {
    setup_tracing();
    ProductNormalizer::new()
}

#[test]
fn test_price_string_with_symbols_and_commas() {
    assert_eq!(parse_price(&RawPrice::Text("$1,299.00".to_string())), 1299.0);
    assert_eq!(parse_price(&RawPrice::Text("USD 49.95".to_string())), 49.95);
    assert_eq!(parse_price(&RawPrice::Text(" 15 ".to_string())), 15.0);
}

#[test]
fn test_price_unparsable_defaults_to_zero() {
    assert_eq!(parse_price(&RawPrice::Text("call for price".to_string())), 0.0);
    assert_eq!(parse_price(&RawPrice::Text(String::new())), 0.0);
    // Negative prices are clamped; the canonical price is non-negative.
    assert_eq!(parse_price(&RawPrice::Number(-5.0)), 0.0);
    assert_eq!(parse_price(&RawPrice::Number(f64::NAN)), 0.0);
}

#[test]
fn test_regular_price_defaults_to_price_when_absent() {
    let raw = RawRecord {
        id: "p1".to_string(),
        name: "Widget".to_string(),
        price: Some(RawPrice::Text("$1,299.00".to_string())),
        regular_price: None,
        ..Default::default()
    };

    let product = normalizer().normalize(&raw, "t1", None).unwrap();
    assert_eq!(product.price, 1299.0);
    assert_eq!(product.regular_price, 1299.0);
    assert_eq!(product.sale_price, None);
}

#[test]
fn test_slug_generation_is_idempotent() {
    let slug = generate_slug("  Blue -- Denim Jacket! (2024) ");
    assert_eq!(slug, "blue-denim-jacket-2024");
    assert_eq!(generate_slug(&slug), slug, "re-slugging must be a no-op");
}

#[test]
fn test_clean_text_strips_markup_and_decodes_entities() {
    let cleaned = clean_text("<p>Soft &amp; warm<br/>wool   sweater</p>");
    assert_eq!(cleaned, "Soft & warm wool sweater");
}

#[test]
fn test_short_description_derived_from_description() {
    let long = "word ".repeat(100); // 500 chars
    let raw = RawRecord {
        id: "p1".to_string(),
        name: "Widget".to_string(),
        description: long,
        short_description: String::new(),
        ..Default::default()
    };

    let product = normalizer().normalize(&raw, "t1", None).unwrap();
    assert!(product.short_description_clean.ends_with("..."));
    // 200 chars plus the ellipsis marker.
    assert_eq!(product.short_description_clean.chars().count(), 203);
}

#[test]
fn test_list_dedupe_preserves_first_seen_order_and_casing() {
    let items = vec![
        "Shoes".to_string(),
        " shoes ".to_string(),
        String::new(),
        "SHOES".to_string(),
        "Boots".to_string(),
    ];
    assert_eq!(normalize_list(&items), vec!["Shoes", "Boots"]);
}

#[test]
fn test_stock_status_synonyms_and_fallback() {
    assert_eq!(parse_stock_status("Out Of Stock"), StockStatus::OutOfStock);
    assert_eq!(parse_stock_status("preorder"), StockStatus::OnBackorder);
    assert_eq!(parse_stock_status("AVAILABLE"), StockStatus::InStock);
    // Unrecognized and empty values fail open to in stock.
    assert_eq!(parse_stock_status("weird"), StockStatus::InStock);
    assert_eq!(parse_stock_status(""), StockStatus::InStock);
}

#[test]
fn test_currency_uppercased_with_usd_default() {
    let mut raw = RawRecord {
        id: "p1".to_string(),
        name: "Widget".to_string(),
        currency: "eur".to_string(),
        ..Default::default()
    };
    let product = normalizer().normalize(&raw, "t1", None).unwrap();
    assert_eq!(product.currency, "EUR");

    raw.currency = String::new();
    let product = normalizer().normalize(&raw, "t1", None).unwrap();
    assert_eq!(product.currency, "USD");
}

#[test]
fn test_record_without_id_fails_normalization() {
    let raw = RawRecord {
        id: "  ".to_string(),
        name: "Orphan".to_string(),
        ..Default::default()
    };
    assert!(normalizer().normalize(&raw, "t1", None).is_err());
}

#[test]
fn test_normalize_batch_keeps_per_record_outcomes() {
    let records = vec![
        RawRecord {
            id: "p1".to_string(),
            name: "First".to_string(),
            ..Default::default()
        },
        RawRecord::default(),
    ];
    let outcomes = normalizer().normalize_batch(&records, "t1", None);
    assert_eq!(outcomes.len(), 2);
    assert!(outcomes[0].is_ok());
    assert!(outcomes[1].is_err());
}

#[test]
fn test_tenant_and_connector_scoping() {
    let raw = RawRecord {
        id: "sku-9".to_string(),
        name: "Widget".to_string(),
        ..Default::default()
    };
    let product = normalizer()
        .normalize(&raw, "tenant-a", Some("woo-1"))
        .unwrap();
    assert_eq!(product.tenant_id, "tenant-a");
    assert_eq!(product.connector_id.as_deref(), Some("woo-1"));
}
