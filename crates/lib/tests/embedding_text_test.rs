//! # Embedding Text Tests
//!
//! The embedding text must be a pure function of (product, attributes) with
//! a stable line-per-section layout, so these tests pin the exact output.

mod common;

use common::setup_tracing;
use shoprag::ingest::{price_tier, EmbeddingTextBuilder};
use shoprag::{CanonicalProduct, ExtractedAttribute, ExtractionMethod, StockStatus};

fn sample_product() -> CanonicalProduct {
    CanonicalProduct {
        id: "p1".to_string(),
        tenant_id: "t1".to_string(),
        name: "Blue Denim Jacket".to_string(),
        brand: "Acme".to_string(),
        categories: vec!["Womens".to_string(), "Jackets".to_string()],
        tags: vec!["casual".to_string(), "spring".to_string()],
        description_clean: "A classic denim jacket.".to_string(),
        price: 79.0,
        stock_status: StockStatus::InStock,
        ..Default::default()
    }
}

fn attribute(name: &str, value: &str) -> ExtractedAttribute {
    ExtractedAttribute {
        name: name.to_string(),
        value: value.to_string(),
        confidence: 0.9,
        source_field: "description".to_string(),
        method: ExtractionMethod::Rule,
    }
}

#[test]
fn test_full_layout() {
    setup_tracing();
    let builder = EmbeddingTextBuilder::new();
    let attributes = vec![attribute("color", "blue"), attribute("material", "denim")];

    let text = builder.build(&sample_product(), &attributes);
    let expected = "Blue Denim Jacket\n\
        Brand: Acme\n\
        Category: Womens, Jackets\n\
        Tags: casual, spring\n\
        Description: A classic denim jacket.\n\
        Attributes: color: blue, material: denim\n\
        Price tier: mid-range\n\
        Availability: instock";
    assert_eq!(text, expected);
}

#[test]
fn test_build_is_pure() {
    let builder = EmbeddingTextBuilder::new();
    let attributes = vec![attribute("color", "blue")];
    let first = builder.build(&sample_product(), &attributes);
    let second = builder.build(&sample_product(), &attributes);
    assert_eq!(first, second, "identical input must yield identical text");
}

#[test]
fn test_changing_tags_changes_only_the_tags_line() {
    let builder = EmbeddingTextBuilder::new();
    let base = builder.build(&sample_product(), &[]);

    let mut changed_product = sample_product();
    changed_product.tags = vec!["casual".to_string(), "summer".to_string()];
    let changed = builder.build(&changed_product, &[]);

    let differing: Vec<(&str, &str)> = base
        .lines()
        .zip(changed.lines())
        .filter(|(a, b)| a != b)
        .collect();
    assert_eq!(differing.len(), 1);
    assert!(differing[0].0.starts_with("Tags: "));
}

#[test]
fn test_empty_sections_are_omitted() {
    let builder = EmbeddingTextBuilder::new();
    let product = CanonicalProduct {
        id: "p2".to_string(),
        name: "Bare Widget".to_string(),
        stock_status: StockStatus::OutOfStock,
        ..Default::default()
    };

    let text = builder.build(&product, &[]);
    assert_eq!(
        text,
        "Bare Widget\nPrice tier: unpriced\nAvailability: outofstock"
    );
}

#[test]
fn test_description_truncated_with_marker() {
    let builder = EmbeddingTextBuilder::new();
    let mut product = sample_product();
    product.description_clean = "x".repeat(600);

    let text = builder.build(&product, &[]);
    let description_line = text
        .lines()
        .find(|l| l.starts_with("Description: "))
        .expect("description line missing");
    assert!(description_line.ends_with("..."));
    // "Description: " + 500 chars + "..."
    assert_eq!(description_line.len(), 13 + 500 + 3);
}

#[test]
fn test_tags_limited_to_five() {
    let builder = EmbeddingTextBuilder::new();
    let mut product = sample_product();
    product.tags = (1..=8).map(|i| format!("tag{i}")).collect();

    let text = builder.build(&product, &[]);
    let tags_line = text.lines().find(|l| l.starts_with("Tags: ")).unwrap();
    assert_eq!(tags_line, "Tags: tag1, tag2, tag3, tag4, tag5");
}

#[test]
fn test_price_tiers() {
    assert_eq!(price_tier(0.0), "unpriced");
    assert_eq!(price_tier(10.0), "budget-friendly");
    assert_eq!(price_tier(49.99), "affordable");
    assert_eq!(price_tier(99.0), "mid-range");
    assert_eq!(price_tier(100.0), "premium");
    assert_eq!(price_tier(300.0), "luxury");
}
