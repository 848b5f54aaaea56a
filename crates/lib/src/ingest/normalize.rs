//! # Product Normalizer
//!
//! Cleans one raw record into a [`CanonicalProduct`]: markup stripped,
//! entities decoded, prices parsed, slug generated, category/tag lists
//! deduplicated, stock status resolved against a synonym table.
//!
//! Field-level problems resolve to fail-open defaults (unparsable price →
//! 0.0, unknown stock status → in stock) and never fail the record; the only
//! hard failure is a record without an id, which cannot be keyed.

use crate::constants::{CURRENCY_SYMBOLS, SHORT_DESCRIPTION_LIMIT};
use crate::types::{CanonicalProduct, RawPrice, RawRecord, StockStatus};
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;
use thiserror::Error;
use tracing::debug;

static HTML_TAG_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());
static WHITESPACE_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static SLUG_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

/// A record-fatal normalization failure.
#[derive(Error, Debug)]
pub enum NormalizeError {
    #[error("record has no id")]
    MissingId,
}

/// Normalizes raw product records into a consistent canonical format.
#[derive(Debug, Clone, Default)]
pub struct ProductNormalizer;

impl ProductNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Normalizes a single raw record for the given tenant.
    pub fn normalize(
        &self,
        raw: &RawRecord,
        tenant_id: &str,
        connector_id: Option<&str>,
    ) -> Result<CanonicalProduct, NormalizeError> {
        if raw.id.trim().is_empty() {
            return Err(NormalizeError::MissingId);
        }

        let description_clean = clean_text(&raw.description);
        let mut short_description_clean = clean_text(&raw.short_description);

        // Derive a short description from the long one when the source
        // provides none.
        if short_description_clean.is_empty() && !description_clean.is_empty() {
            short_description_clean = truncate_chars(&description_clean, SHORT_DESCRIPTION_LIMIT);
            if description_clean.chars().count() > SHORT_DESCRIPTION_LIMIT {
                short_description_clean.push_str("...");
            }
        }

        let price = raw.price.as_ref().map(parse_price).unwrap_or(0.0);
        let regular_price = match &raw.regular_price {
            Some(p) => parse_price(p),
            None => price,
        };
        let sale_price = raw.sale_price.as_ref().map(parse_price);

        let name = clean_text(&raw.name);
        let slug = generate_slug(&raw.name);

        let currency = if raw.currency.trim().is_empty() {
            "USD".to_string()
        } else {
            raw.currency.trim().to_uppercase()
        };

        let short_description = if raw.short_description.is_empty() {
            short_description_clean.clone()
        } else {
            raw.short_description.clone()
        };

        Ok(CanonicalProduct {
            id: raw.id.clone(),
            tenant_id: tenant_id.to_string(),
            connector_id: connector_id.map(String::from),
            name,
            slug,
            description: raw.description.clone(),
            short_description,
            description_clean,
            short_description_clean,
            price,
            regular_price,
            sale_price,
            currency,
            sku: raw.sku.clone(),
            brand: clean_text(&raw.brand),
            categories: normalize_list(&raw.categories),
            tags: normalize_list(&raw.tags),
            image_url: raw.image_url.clone(),
            gallery_urls: raw.gallery_urls.clone(),
            permalink: raw.permalink.clone(),
            stock_status: parse_stock_status(&raw.stock_status),
            stock_quantity: raw.stock_quantity,
            raw_data: raw.raw_data.clone(),
        })
    }

    /// Normalizes a batch, dropping records that fail with their errors.
    pub fn normalize_batch(
        &self,
        records: &[RawRecord],
        tenant_id: &str,
        connector_id: Option<&str>,
    ) -> Vec<Result<CanonicalProduct, NormalizeError>> {
        records
            .iter()
            .map(|raw| self.normalize(raw, tenant_id, connector_id))
            .collect()
    }
}

/// Decodes HTML entities, strips tags, and collapses whitespace.
pub fn clean_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let decoded = html_escape::decode_html_entities(text);
    let without_tags = HTML_TAG_PATTERN.replace_all(&decoded, " ");
    let collapsed = WHITESPACE_PATTERN.replace_all(&without_tags, " ");
    collapsed.trim().to_string()
}

/// Extracts a non-negative numeric price from a raw price value.
///
/// String input may carry currency symbols and thousands separators;
/// anything unparsable resolves to 0.0 rather than an error.
pub fn parse_price(price: &RawPrice) -> f64 {
    let value = match price {
        RawPrice::Number(n) => *n,
        RawPrice::Text(s) => {
            let mut clean = s.trim().to_string();
            for symbol in CURRENCY_SYMBOLS {
                clean = clean.replace(symbol, "");
            }
            let clean = clean.replace(',', "");
            match clean.trim().parse::<f64>() {
                Ok(v) => v,
                Err(_) => {
                    debug!("unparsable price {s:?}, defaulting to 0.0");
                    0.0
                }
            }
        }
    };

    if value.is_finite() && value >= 0.0 {
        value
    } else {
        0.0
    }
}

/// Generates a URL-friendly slug from a product name.
///
/// Lowercases, collapses any run of non-alphanumeric characters to a single
/// hyphen, and trims outer hyphens. Idempotent: re-slugging a slug is a
/// no-op.
pub fn generate_slug(name: &str) -> String {
    let lower = name.to_lowercase();
    let hyphenated = SLUG_PATTERN.replace_all(&lower, "-");
    hyphenated.trim_matches('-').to_string()
}

/// Cleans a list of strings and removes case-insensitive duplicates,
/// preserving first-seen order and original casing.
pub fn normalize_list(items: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut cleaned = Vec::new();

    for item in items {
        let clean = clean_text(item);
        if clean.is_empty() {
            continue;
        }
        if seen.insert(clean.to_lowercase()) {
            cleaned.push(clean);
        }
    }

    cleaned
}

/// Resolves a free-form stock status string against a synonym table.
/// Unrecognized or empty values fail open to in stock.
pub fn parse_stock_status(status: &str) -> StockStatus {
    match status.trim().to_lowercase().as_str() {
        "instock" | "in_stock" | "in stock" | "available" | "true" | "1" => StockStatus::InStock,
        "outofstock" | "out_of_stock" | "out of stock" | "unavailable" | "false" | "0" => {
            StockStatus::OutOfStock
        }
        "onbackorder" | "on_backorder" | "backorder" | "preorder" => StockStatus::OnBackorder,
        _ => StockStatus::InStock,
    }
}

/// Truncates a string to at most `limit` characters on a char boundary.
pub(crate) fn truncate_chars(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}
