//! # Embedding Text Builder
//!
//! Renders a canonical product and its attributes into one deterministic
//! "product card" text block for the external embedding process. The layout
//! is append-only and line-per-section so a single changed field produces
//! the smallest possible diff. Output is a pure function of its inputs: no
//! randomness, no timestamps.

use crate::constants::{EMBEDDING_DESCRIPTION_LIMIT, EMBEDDING_TAG_LIMIT};
use crate::ingest::normalize::truncate_chars;
use crate::types::{CanonicalProduct, EnrichedProduct, ExtractedAttribute};
use std::collections::HashMap;

/// Builds deterministic embedding text from product data.
#[derive(Debug, Clone, Default)]
pub struct EmbeddingTextBuilder;

impl EmbeddingTextBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Builds the embedding text for a single product.
    ///
    /// Sections, each on its own line, omitted entirely when empty:
    /// name, brand, categories, tags, description, attributes, price tier,
    /// availability.
    pub fn build(&self, product: &CanonicalProduct, attributes: &[ExtractedAttribute]) -> String {
        let mut parts = Vec::new();

        parts.push(product.name.clone());

        if !product.brand.is_empty() {
            parts.push(format!("Brand: {}", product.brand));
        }

        if !product.categories.is_empty() {
            parts.push(format!("Category: {}", product.categories.join(", ")));
        }

        if !product.tags.is_empty() {
            let tags: Vec<&str> = product
                .tags
                .iter()
                .take(EMBEDDING_TAG_LIMIT)
                .map(String::as_str)
                .collect();
            parts.push(format!("Tags: {}", tags.join(", ")));
        }

        let description = if product.description_clean.is_empty() {
            &product.short_description_clean
        } else {
            &product.description_clean
        };
        if !description.is_empty() {
            let mut rendered = truncate_chars(description, EMBEDDING_DESCRIPTION_LIMIT);
            if description.chars().count() > EMBEDDING_DESCRIPTION_LIMIT {
                rendered.push_str("...");
            }
            parts.push(format!("Description: {rendered}"));
        }

        if !attributes.is_empty() {
            let pairs: Vec<String> = attributes
                .iter()
                .map(|a| format!("{}: {}", a.name, a.value))
                .collect();
            parts.push(format!("Attributes: {}", pairs.join(", ")));
        }

        parts.push(format!("Price tier: {}", price_tier(product.price)));

        parts.push(format!("Availability: {}", product.stock_status));

        parts.join("\n")
    }

    /// Combines a product with its attributes into an [`EnrichedProduct`].
    pub fn build_enriched(
        &self,
        product: CanonicalProduct,
        attributes: Vec<ExtractedAttribute>,
    ) -> EnrichedProduct {
        let embedding_text = self.build(&product, &attributes);
        EnrichedProduct {
            product,
            attributes,
            embedding_text,
        }
    }

    /// Builds enriched products for a batch, looking up each product's
    /// attributes in the given map. Products without an entry get none.
    pub fn build_batch(
        &self,
        products: Vec<CanonicalProduct>,
        attributes_map: &mut HashMap<String, Vec<ExtractedAttribute>>,
    ) -> Vec<EnrichedProduct> {
        products
            .into_iter()
            .map(|product| {
                let attributes = attributes_map.remove(&product.id).unwrap_or_default();
                self.build_enriched(product, attributes)
            })
            .collect()
    }
}

/// Buckets a price into a coarse searchable tier, so queries like
/// "affordable" or "premium" have something to match against.
pub fn price_tier(price: f64) -> &'static str {
    if price <= 0.0 {
        "unpriced"
    } else if price < 25.0 {
        "budget-friendly"
    } else if price < 50.0 {
        "affordable"
    } else if price < 100.0 {
        "mid-range"
    } else if price < 250.0 {
        "premium"
    } else {
        "luxury"
    }
}
