//! # Query Understanding Tests
//!
//! Covers the rule parser's budget/gender/category/color extraction and
//! precedence, the model parse with rule fallback, and the translation of
//! constraints into vector-index filter predicates.

mod common;

use common::{setup_tracing, FailingAiProvider, MockAiProvider};
use shoprag::query::rule_parse;
use shoprag::{FilterPredicate, QueryConstraints, QueryService};

#[test]
fn test_rule_parse_budget_color_category_gender() {
    setup_tracing();
    let constraints = rule_parse("blue dress under $50 for women");

    assert_eq!(constraints.budget_max, Some(50.0));
    assert_eq!(constraints.budget_min, None);
    assert_eq!(constraints.color.as_deref(), Some("blue"));
    assert_eq!(constraints.category.as_deref(), Some("dress"));
    assert_eq!(constraints.gender.as_deref(), Some("women"));
    assert_eq!(constraints.search_intent, "blue dress under $50 for women");
    assert!(constraints.has_filters());
}

#[test]
fn test_rule_parse_budget_min_and_max() {
    let constraints = rule_parse("shoes over $20 and under $80");
    assert_eq!(constraints.budget_min, Some(20.0));
    assert_eq!(constraints.budget_max, Some(80.0));
    assert_eq!(constraints.category.as_deref(), Some("shoes"));
}

#[test]
fn test_rule_parse_range_overrides_other_budget_patterns() {
    // The explicit range wins over the "under" pattern.
    let constraints = rule_parse("jacket under 40, ideally $50 to $100");
    assert_eq!(constraints.budget_min, Some(50.0));
    assert_eq!(constraints.budget_max, Some(100.0));
}

#[test]
fn test_rule_parse_gender_precedence() {
    // "womens" contains "mens"; the women scan must win.
    assert_eq!(
        rule_parse("womens watch").gender.as_deref(),
        Some("women")
    );
    assert_eq!(rule_parse("mens watch").gender.as_deref(), Some("men"));
    assert_eq!(
        rule_parse("gift for children").gender.as_deref(),
        Some("kids")
    );
}

#[test]
fn test_rule_parse_without_filters() {
    let constraints = rule_parse("cozy reading lamp");
    assert!(!constraints.has_filters());
    assert!(constraints.to_filter_predicates().is_empty());
}

#[tokio::test]
async fn test_model_parse_used_when_provider_succeeds() {
    let response = r#"{
        "budget_max": 50,
        "color": "blue",
        "category": "dress",
        "search_intent": "dress"
    }"#;
    let provider = MockAiProvider::new(vec![response.to_string()]);
    let history = provider.call_history.clone();
    let service = QueryService::new(Box::new(provider));

    let result = service.understand("  blue dress under $50  ").await;

    assert_eq!(result.original_query, "blue dress under $50");
    assert_eq!(result.constraints.budget_max, Some(50.0));
    assert_eq!(result.constraints.color.as_deref(), Some("blue"));
    // The extracted intent drives the embedding query.
    assert_eq!(result.embedding_query, "dress");
    assert_eq!(history.read().unwrap().len(), 1);
}

#[tokio::test]
async fn test_provider_failure_falls_back_to_rules() {
    let service = QueryService::new(Box::new(FailingAiProvider));

    let result = service.understand("blue dress under $50 for women").await;

    assert_eq!(result.constraints.budget_max, Some(50.0));
    assert_eq!(result.constraints.gender.as_deref(), Some("women"));
    assert_eq!(result.embedding_query, "blue dress under $50 for women");
}

#[tokio::test]
async fn test_malformed_model_response_falls_back_to_rules() {
    let provider = MockAiProvider::new(vec!["not json at all".to_string()]);
    let service = QueryService::new(Box::new(provider));

    let result = service.understand("red shoes under $30").await;

    assert_eq!(result.constraints.budget_max, Some(30.0));
    assert_eq!(result.constraints.color.as_deref(), Some("red"));
    assert_eq!(result.constraints.category.as_deref(), Some("shoes"));
}

#[tokio::test]
async fn test_rule_only_service_makes_no_calls() {
    let service = QueryService::rule_only();
    let result = service.understand("green bag under $25").await;
    assert_eq!(result.constraints.budget_max, Some(25.0));
    assert_eq!(result.constraints.category.as_deref(), Some("bag"));
}

#[test]
fn test_filter_predicates_translation() {
    let constraints = QueryConstraints {
        budget_min: Some(20.0),
        budget_max: Some(80.0),
        category: Some("Dress".to_string()),
        brand: Some("Acme".to_string()),
        ..Default::default()
    };

    let predicates = constraints.to_filter_predicates();
    assert_eq!(
        predicates,
        vec![
            FilterPredicate::PriceAtMost(80.0),
            FilterPredicate::PriceAtLeast(20.0),
            FilterPredicate::CategoryAnyOf(vec!["dress".to_string()]),
            FilterPredicate::BrandEquals("acme".to_string()),
        ]
    );
}
