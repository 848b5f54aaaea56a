//! # Query Understanding
//!
//! Parses a free-text retail query into structured constraints plus a
//! canonical search string. A model-backed parse is the primary strategy;
//! any failure falls back to the deterministic rule parser, so callers
//! always get constraints back.

use crate::constants::{
    CATEGORY_KEYWORDS, COLOR_KEYWORDS, KIDS_KEYWORDS, MEN_KEYWORDS, WOMEN_KEYWORDS,
};
use crate::errors::ModelError;
use crate::prompts::{
    strip_code_fences, QUERY_ANALYSIS_SYSTEM_PROMPT, QUERY_ANALYSIS_USER_PROMPT,
};
use crate::providers::ai::AiProvider;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use std::time::Instant;
use tracing::{debug, warn};

static BUDGET_MAX_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:under|less than|below|max|<)\s*\$?(\d+)").unwrap());
static BUDGET_MIN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:over|more than|above|min|>)\s*\$?(\d+)").unwrap());
static BUDGET_RANGE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$?(\d+)\s*(?:-|to)\s*\$?(\d+)").unwrap());

/// Structured constraints extracted from a search query.
///
/// Doubles as the deserialization target for the model's JSON response;
/// every field is lenient so a partially valid response still parses.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct QueryConstraints {
    #[serde(default)]
    pub budget_min: Option<f64>,
    #[serde(default)]
    pub budget_max: Option<f64>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub material: Option<String>,
    #[serde(default)]
    pub style: Option<String>,
    #[serde(default)]
    pub occasion: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    /// The core search intent with constraints stripped; what gets embedded.
    #[serde(default)]
    pub search_intent: String,
}

impl QueryConstraints {
    /// True iff any filterable constraint is set, which tells callers
    /// whether post-filtering beyond vector retrieval is required.
    /// Occasion is a ranking hint, not a filter.
    pub fn has_filters(&self) -> bool {
        self.budget_min.is_some()
            || self.budget_max.is_some()
            || self.category.is_some()
            || self.brand.is_some()
            || self.color.is_some()
            || self.material.is_some()
            || self.style.is_some()
            || self.gender.is_some()
    }

    /// Translates the constraints into predicates for the vector-index
    /// collaborator. Text matching is lowercased on the constraint side.
    pub fn to_filter_predicates(&self) -> Vec<FilterPredicate> {
        let mut predicates = Vec::new();

        if let Some(max) = self.budget_max {
            predicates.push(FilterPredicate::PriceAtMost(max));
        }

        if let Some(min) = self.budget_min {
            predicates.push(FilterPredicate::PriceAtLeast(min));
        }

        if let Some(category) = &self.category {
            predicates.push(FilterPredicate::CategoryAnyOf(vec![category.to_lowercase()]));
        }

        if let Some(brand) = &self.brand {
            predicates.push(FilterPredicate::BrandEquals(brand.to_lowercase()));
        }

        predicates
    }
}

/// A single range or match condition for the vector-index collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FilterPredicate {
    /// `price <= limit`
    PriceAtMost(f64),
    /// `price >= limit`
    PriceAtLeast(f64),
    /// Any of the given categories matches (case-insensitive).
    CategoryAnyOf(Vec<String>),
    /// Brand matches exactly, case-insensitive.
    BrandEquals(String),
}

/// The outcome of understanding one query.
#[derive(Debug, Clone)]
pub struct QueryResult {
    pub original_query: String,
    pub constraints: QueryConstraints,
    /// The text to embed: the extracted search intent, or the original
    /// query when no intent was extracted.
    pub embedding_query: String,
    pub latency_ms: u64,
}

/// Understands and processes search queries.
#[derive(Debug, Clone)]
pub struct QueryService {
    provider: Option<Box<dyn AiProvider>>,
}

impl QueryService {
    /// Builds a service that parses with the given provider, falling back to
    /// rules on failure.
    pub fn new(provider: Box<dyn AiProvider>) -> Self {
        Self {
            provider: Some(provider),
        }
    }

    /// Builds a service that only uses the deterministic rule parser.
    pub fn rule_only() -> Self {
        Self { provider: None }
    }

    /// Parses a natural language query and extracts constraints.
    pub async fn understand(&self, query: &str) -> QueryResult {
        let start = Instant::now();
        let query = query.trim();

        let constraints = match &self.provider {
            Some(provider) => match model_parse(provider.as_ref(), query).await {
                Ok(constraints) => constraints,
                Err(e) => {
                    warn!("Model query parsing failed, falling back to rules: {e}");
                    rule_parse(query)
                }
            },
            None => rule_parse(query),
        };

        let embedding_query = if constraints.search_intent.is_empty() {
            query.to_string()
        } else {
            constraints.search_intent.clone()
        };

        QueryResult {
            original_query: query.to_string(),
            constraints,
            embedding_query,
            latency_ms: start.elapsed().as_millis() as u64,
        }
    }
}

/// Asks the model for constraints; any failure propagates so the caller can
/// fall back to rules.
async fn model_parse(provider: &dyn AiProvider, query: &str) -> Result<QueryConstraints, ModelError> {
    let user_prompt = QUERY_ANALYSIS_USER_PROMPT.replace("{query}", query);
    let response = provider
        .generate(QUERY_ANALYSIS_SYSTEM_PROMPT, &user_prompt)
        .await?;

    debug!("Model query analysis response: {response}");

    let mut constraints: QueryConstraints = serde_json::from_str(strip_code_fences(&response))?;
    if constraints.search_intent.is_empty() {
        constraints.search_intent = query.to_string();
    }
    Ok(constraints)
}

/// Deterministic rule-based query parsing.
///
/// Budget precedence: "under"-style patterns set the maximum, "over"-style
/// patterns set the minimum, and an explicit "A-B" or "A to B" range
/// overrides both. Gender, category, and color resolve via first-match
/// keyword scans in a fixed order.
pub fn rule_parse(query: &str) -> QueryConstraints {
    let mut constraints = QueryConstraints {
        search_intent: query.to_string(),
        ..Default::default()
    };
    let query_lower = query.to_lowercase();

    if let Some(caps) = BUDGET_MAX_PATTERN.captures(&query_lower) {
        constraints.budget_max = caps[1].parse().ok();
    }

    if let Some(caps) = BUDGET_MIN_PATTERN.captures(&query_lower) {
        constraints.budget_min = caps[1].parse().ok();
    }

    if let Some(caps) = BUDGET_RANGE_PATTERN.captures(&query_lower) {
        constraints.budget_min = caps[1].parse().ok();
        constraints.budget_max = caps[2].parse().ok();
    }

    // Precedence: women, men, kids. The women scan must run first because
    // the men cues are substrings of the women ones.
    if WOMEN_KEYWORDS.iter().any(|w| query_lower.contains(w)) {
        constraints.gender = Some("women".to_string());
    } else if MEN_KEYWORDS.iter().any(|w| query_lower.contains(w)) {
        constraints.gender = Some("men".to_string());
    } else if KIDS_KEYWORDS.iter().any(|w| query_lower.contains(w)) {
        constraints.gender = Some("kids".to_string());
    }

    if let Some(category) = CATEGORY_KEYWORDS.iter().find(|c| query_lower.contains(*c)) {
        constraints.category = Some(category.to_string());
    }

    if let Some(color) = COLOR_KEYWORDS.iter().find(|c| query_lower.contains(*c)) {
        constraints.color = Some(color.to_string());
    }

    constraints
}
