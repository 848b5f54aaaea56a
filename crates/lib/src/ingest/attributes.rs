//! # Attribute Extractor
//!
//! Derives structured attributes from a canonical product. The strategy is
//! fixed at construction time: a model-backed extractor, a deterministic
//! keyword extractor, or a disabled one for fast ingestion paths.
//!
//! Extraction is strictly best-effort. The model path converts every failure
//! mode (request error, timeout, malformed JSON) into an empty attribute
//! list; nothing here ever fails the record it runs on.

use crate::constants::{
    COLOR_KEYWORDS, EXTRACTABLE_ATTRIBUTES, MATERIAL_KEYWORDS, PROMPT_DESCRIPTION_LIMIT,
    RULE_COLOR_CONFIDENCE, RULE_GENDER_CONFIDENCE, RULE_MATERIAL_CONFIDENCE,
};
use crate::errors::ModelError;
use crate::ingest::normalize::truncate_chars;
use crate::prompts::{
    strip_code_fences, ATTRIBUTE_EXTRACTION_SYSTEM_PROMPT, ATTRIBUTE_EXTRACTION_USER_PROMPT,
};
use crate::providers::ai::AiProvider;
use crate::types::{CanonicalProduct, ExtractedAttribute, ExtractionMethod};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, warn};

/// How attributes are derived, selected once at construction.
#[derive(Debug, Clone)]
pub enum ExtractionStrategy {
    /// Ask an AI provider for a structured JSON object of attributes.
    Model {
        provider: Box<dyn AiProvider>,
        confidence_threshold: f64,
    },
    /// Deterministic keyword tables, no external calls.
    Rule,
    /// Always returns no attributes.
    Disabled,
}

// --- Lenient model response structures ---

#[derive(Deserialize, Debug)]
struct ModelAttributeResponse {
    #[serde(default)]
    attributes: Vec<ModelAttribute>,
}

#[derive(Deserialize, Debug)]
struct ModelAttribute {
    #[serde(default)]
    name: String,
    #[serde(default)]
    value: Value,
    #[serde(default)]
    confidence: f64,
}

/// Extracts structured attributes from canonical products.
#[derive(Debug, Clone)]
pub struct AttributeExtractor {
    strategy: ExtractionStrategy,
}

impl AttributeExtractor {
    pub fn new(strategy: ExtractionStrategy) -> Self {
        Self { strategy }
    }

    /// A model-backed extractor gated by the given confidence threshold.
    pub fn model(provider: Box<dyn AiProvider>, confidence_threshold: f64) -> Self {
        Self::new(ExtractionStrategy::Model {
            provider,
            confidence_threshold,
        })
    }

    /// A keyword-table extractor with fixed conservative confidences.
    pub fn rule() -> Self {
        Self::new(ExtractionStrategy::Rule)
    }

    /// An extractor that returns no attributes and makes no calls.
    pub fn disabled() -> Self {
        Self::new(ExtractionStrategy::Disabled)
    }

    /// Extracts attributes from a single product.
    ///
    /// Never fails: every failure mode yields an empty list.
    pub async fn extract(&self, product: &CanonicalProduct) -> Vec<ExtractedAttribute> {
        match self.try_extract(product).await {
            Ok(attributes) => attributes,
            Err(e) => {
                warn!("Attribute extraction failed for product {}: {e}", product.id);
                Vec::new()
            }
        }
    }

    /// Extracts attributes, surfacing provider and parse failures.
    ///
    /// The orchestrator uses this variant so it can downgrade failures to
    /// warnings on the run result; only the model strategy can fail.
    pub async fn try_extract(
        &self,
        product: &CanonicalProduct,
    ) -> Result<Vec<ExtractedAttribute>, ModelError> {
        match &self.strategy {
            ExtractionStrategy::Model {
                provider,
                confidence_threshold,
            } => extract_with_model(provider.as_ref(), *confidence_threshold, product).await,
            ExtractionStrategy::Rule => Ok(extract_with_rules(product)),
            ExtractionStrategy::Disabled => Ok(Vec::new()),
        }
    }

    /// Extracts attributes for a batch, keyed by product id.
    ///
    /// With `skip` set, every product maps to an empty list and no strategy
    /// is invoked at all.
    pub async fn extract_batch(
        &self,
        products: &[CanonicalProduct],
        skip: bool,
    ) -> HashMap<String, Vec<ExtractedAttribute>> {
        let mut results = HashMap::with_capacity(products.len());

        for product in products {
            let attributes = if skip {
                Vec::new()
            } else {
                self.extract(product).await
            };
            results.insert(product.id.clone(), attributes);
        }

        results
    }
}

/// Runs the model strategy for one product.
async fn extract_with_model(
    provider: &dyn AiProvider,
    confidence_threshold: f64,
    product: &CanonicalProduct,
) -> Result<Vec<ExtractedAttribute>, ModelError> {
    let description = if product.description_clean.is_empty() {
        &product.short_description_clean
    } else {
        &product.description_clean
    };

    // Nothing to prompt with.
    if description.is_empty() && product.name.is_empty() {
        return Ok(Vec::new());
    }

    let categories = if product.categories.is_empty() {
        "N/A".to_string()
    } else {
        product.categories.join(", ")
    };
    let brand = if product.brand.is_empty() {
        "N/A"
    } else {
        &product.brand
    };

    let user_prompt = ATTRIBUTE_EXTRACTION_USER_PROMPT
        .replace("{name}", &product.name)
        .replace(
            "{description}",
            &truncate_chars(description, PROMPT_DESCRIPTION_LIMIT),
        )
        .replace("{categories}", &categories)
        .replace("{brand}", brand);

    let response = provider
        .generate(ATTRIBUTE_EXTRACTION_SYSTEM_PROMPT, &user_prompt)
        .await?;

    debug!("Model attribute response for {}: {response}", product.id);

    let parsed: ModelAttributeResponse = serde_json::from_str(strip_code_fences(&response))?;

    let attributes = parsed
        .attributes
        .into_iter()
        .filter_map(|attr| {
            let value = match &attr.value {
                Value::String(s) => s.trim().to_lowercase(),
                Value::Number(n) => n.to_string(),
                _ => return None,
            };
            let accepted = EXTRACTABLE_ATTRIBUTES.contains(&attr.name.as_str())
                && attr.confidence >= confidence_threshold
                && !value.is_empty();
            accepted.then(|| ExtractedAttribute {
                name: attr.name,
                value,
                confidence: attr.confidence,
                source_field: "description".to_string(),
                method: ExtractionMethod::Model,
            })
        })
        .collect();

    Ok(attributes)
}

/// Runs the keyword-table strategy for one product.
///
/// Color and material scan name + cleaned description in a fixed order and
/// take the first match; gender comes from category tokens with women, men,
/// kids precedence in that order.
fn extract_with_rules(product: &CanonicalProduct) -> Vec<ExtractedAttribute> {
    let mut attributes = Vec::new();
    let text = format!("{} {}", product.name, product.description_clean).to_lowercase();

    if let Some(color) = COLOR_KEYWORDS.iter().find(|c| text.contains(*c)) {
        attributes.push(rule_attribute(
            "color",
            color,
            RULE_COLOR_CONFIDENCE,
            "description",
        ));
    }

    if let Some(material) = MATERIAL_KEYWORDS.iter().find(|m| text.contains(*m)) {
        attributes.push(rule_attribute(
            "material",
            material,
            RULE_MATERIAL_CONFIDENCE,
            "description",
        ));
    }

    let cats = product.categories.join(" ").to_lowercase();
    let gender = if cats.contains("women") {
        Some("women")
    } else if cats.contains("men") {
        Some("men")
    } else if cats.contains("kid") || cats.contains("child") {
        Some("kids")
    } else {
        None
    };
    if let Some(gender) = gender {
        attributes.push(rule_attribute(
            "gender",
            gender,
            RULE_GENDER_CONFIDENCE,
            "categories",
        ));
    }

    attributes
}

fn rule_attribute(
    name: &str,
    value: &str,
    confidence: f64,
    source_field: &str,
) -> ExtractedAttribute {
    ExtractedAttribute {
        name: name.to_string(),
        value: value.to_string(),
        confidence,
        source_field: source_field.to_string(),
        method: ExtractionMethod::Rule,
    }
}
