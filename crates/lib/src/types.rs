//! # Core Data Model
//!
//! Every shape a product takes on its way through the pipeline lives here:
//! the raw source-keyed record, the canonical form produced by normalization,
//! the enriched form carrying extracted attributes and embedding text, and
//! the flattened storage-ready records handed to the persistence and
//! vector-index collaborators.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// A price as it arrives from a source: either already numeric or a string
/// that may carry currency symbols and thousands separators.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawPrice {
    Number(f64),
    Text(String),
}

/// A raw product record from any source (API, CSV, webhook).
///
/// Every field except `id` is optional on the wire; missing fields default to
/// empty so malformed sources degrade instead of failing deserialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawRecord {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub price: Option<RawPrice>,
    #[serde(default)]
    pub regular_price: Option<RawPrice>,
    #[serde(default)]
    pub sale_price: Option<RawPrice>,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub sku: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub gallery_urls: Vec<String>,
    #[serde(default)]
    pub permalink: String,
    #[serde(default)]
    pub stock_status: String,
    #[serde(default)]
    pub stock_quantity: Option<i64>,
    #[serde(default)]
    pub raw_data: Option<Value>,
}

/// Stock availability of a product.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StockStatus {
    #[default]
    #[serde(rename = "instock")]
    InStock,
    #[serde(rename = "outofstock")]
    OutOfStock,
    #[serde(rename = "onbackorder")]
    OnBackorder,
}

impl StockStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockStatus::InStock => "instock",
            StockStatus::OutOfStock => "outofstock",
            StockStatus::OnBackorder => "onbackorder",
        }
    }
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A product after normalization: cleaned text, parsed prices, slug,
/// deduplicated lists, resolved stock status. Tenant-scoped.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CanonicalProduct {
    pub id: String,
    pub tenant_id: String,
    pub connector_id: Option<String>,
    pub name: String,
    pub slug: String,
    /// Original description as received; the cleaned variant is what the
    /// extractor and synthesizer consume.
    pub description: String,
    pub short_description: String,
    pub description_clean: String,
    pub short_description_clean: String,
    pub price: f64,
    pub regular_price: f64,
    pub sale_price: Option<f64>,
    pub currency: String,
    pub sku: String,
    pub brand: String,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    pub image_url: Option<String>,
    pub gallery_urls: Vec<String>,
    pub permalink: String,
    pub stock_status: StockStatus,
    pub stock_quantity: Option<i64>,
    pub raw_data: Option<Value>,
}

/// How an attribute was derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionMethod {
    Model,
    Rule,
}

impl ExtractionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionMethod::Model => "model",
            ExtractionMethod::Rule => "rule",
        }
    }
}

/// A single structured attribute with a confidence score.
///
/// `name` is always a member of [`crate::constants::EXTRACTABLE_ATTRIBUTES`];
/// entries outside the vocabulary are dropped before this type is built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedAttribute {
    pub name: String,
    pub value: String,
    pub confidence: f64,
    /// Which product field the attribute was derived from.
    pub source_field: String,
    pub method: ExtractionMethod,
}

/// A canonical product together with its attributes and embedding text.
/// Transient: converted to storage-ready form immediately.
#[derive(Debug, Clone)]
pub struct EnrichedProduct {
    pub product: CanonicalProduct,
    pub attributes: Vec<ExtractedAttribute>,
    pub embedding_text: String,
}

/// A flattened product record ready for the persistence collaborator.
///
/// `id` is the deterministic key `{tenant_id}_{external_id}`, which makes
/// repeated ingestion of the same record safe under upsert semantics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageReadyProduct {
    pub id: String,
    pub tenant_id: String,
    pub connector_id: Option<String>,
    pub external_id: String,
    pub name: String,
    pub slug: String,
    pub sku: String,
    pub brand: String,
    pub price: f64,
    pub regular_price: f64,
    pub sale_price: Option<f64>,
    pub currency: String,
    pub stock_status: StockStatus,
    pub stock_quantity: Option<i64>,
    pub description: String,
    pub short_description: String,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    pub image_url: Option<String>,
    pub gallery_urls: Vec<String>,
    pub permalink: String,
    pub raw_data: Option<Value>,
    pub embedding_text: String,
}

/// A flattened attribute record, upserted on `(product_id, attribute_name)`
/// with last-write-wins semantics at the storage collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageReadyAttribute {
    pub product_id: String,
    pub tenant_id: String,
    pub attribute_name: String,
    pub attribute_value: String,
    pub confidence: f64,
    pub extraction_method: ExtractionMethod,
    pub source_field: String,
}

/// The per-product payload handed to the vector-index collaborator.
///
/// The collaborator must enforce `tenant_id` as a mandatory filter on every
/// query; that filter is the tenant-isolation boundary of the whole system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorPayload {
    pub id: String,
    pub tenant_id: String,
    pub name: String,
    pub price: f64,
    pub short_description: String,
    pub image_url: Option<String>,
    pub permalink: String,
    pub categories: Vec<String>,
    pub stock_status: StockStatus,
    pub embedding_text: String,
}

impl From<&StorageReadyProduct> for VectorPayload {
    fn from(product: &StorageReadyProduct) -> Self {
        Self {
            id: product.id.clone(),
            tenant_id: product.tenant_id.clone(),
            name: product.name.clone(),
            price: product.price,
            short_description: product.short_description.clone(),
            image_url: product.image_url.clone(),
            permalink: product.permalink.clone(),
            categories: product.categories.clone(),
            stock_status: product.stock_status,
            embedding_text: product.embedding_text.clone(),
        }
    }
}

/// The pipeline stage a per-record error occurred in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Normalize,
    Extract,
    Prepare,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Normalize => "normalize",
            Stage::Extract => "extract",
            Stage::Prepare => "prepare",
        };
        f.write_str(name)
    }
}

/// A failure localized to one record in one stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageError {
    pub product_id: String,
    pub stage: Stage,
    pub message: String,
}

/// Aggregate result of one ingestion run.
///
/// Invariant: `total == successful + failed + skipped`. Warnings are
/// informational only and never affect the counters.
#[derive(Debug, Default)]
pub struct IngestionRunResult {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    pub skipped: usize,
    pub products: Vec<StorageReadyProduct>,
    pub attributes: Vec<StorageReadyAttribute>,
    pub errors: Vec<StageError>,
    pub warnings: Vec<String>,
}

/// Result of running a single record through the pipeline.
#[derive(Debug)]
pub struct SingleRunResult {
    pub product: Option<StorageReadyProduct>,
    pub attributes: Vec<StorageReadyAttribute>,
    pub error: Option<String>,
}
