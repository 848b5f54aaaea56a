//! # Ingestion Pipeline
//!
//! Drives a batch of raw records through four sequential stages:
//!
//! 1. **Normalize** — clean and standardize every record.
//! 2. **Extract** — derive structured attributes per the configured strategy.
//! 3. **Synthesize** — build deterministic embedding text.
//! 4. **Prepare** — convert to storage-ready records.
//!
//! Failures are isolated per record: a normalize or prepare failure removes
//! only that record and is recorded as a stage error; an extraction failure
//! degrades that product to empty attributes and is recorded as a warning.
//! The run result always satisfies `total == successful + failed + skipped`.

use crate::constants::{DEFAULT_CONFIDENCE_THRESHOLD, PROGRESS_INTERVAL};
use crate::errors::IngestError;
use crate::ingest::attributes::AttributeExtractor;
use crate::ingest::embedding_text::EmbeddingTextBuilder;
use crate::ingest::normalize::ProductNormalizer;
use crate::providers::ai::AiProvider;
use crate::types::{
    CanonicalProduct, EnrichedProduct, ExtractedAttribute, IngestionRunResult, RawRecord,
    SingleRunResult, Stage, StageError, StorageReadyAttribute, StorageReadyProduct,
};
use std::collections::HashMap;
use tracing::{info, warn};

/// Progress callback: `(processed, total)`. Invoked periodically during
/// normalization and exactly once more with `processed == total` at the end.
pub type ProgressFn<'a> = &'a mut dyn FnMut(usize, usize);

/// The full product ingestion pipeline.
///
/// Components are constructed independently and wired together here; the
/// pipeline holds no state beyond its immutable configuration, so separate
/// batches (e.g. different tenants) can run concurrently on clones.
#[derive(Debug, Clone)]
pub struct IngestionPipeline {
    normalizer: ProductNormalizer,
    extractor: AttributeExtractor,
    builder: EmbeddingTextBuilder,
    skip_enrichment: bool,
}

impl IngestionPipeline {
    pub fn new(
        normalizer: ProductNormalizer,
        extractor: AttributeExtractor,
        builder: EmbeddingTextBuilder,
        skip_enrichment: bool,
    ) -> Self {
        Self {
            normalizer,
            extractor,
            builder,
            skip_enrichment,
        }
    }

    /// A fast pipeline: no enrichment at all.
    pub fn fast() -> Self {
        Self::new(
            ProductNormalizer::new(),
            AttributeExtractor::disabled(),
            EmbeddingTextBuilder::new(),
            true,
        )
    }

    /// A pipeline with deterministic rule-based extraction, no model calls.
    pub fn rule_based() -> Self {
        Self::new(
            ProductNormalizer::new(),
            AttributeExtractor::rule(),
            EmbeddingTextBuilder::new(),
            false,
        )
    }

    /// A full pipeline with model-backed extraction at the default
    /// confidence threshold.
    pub fn full(provider: Box<dyn AiProvider>) -> Self {
        Self::with_threshold(provider, DEFAULT_CONFIDENCE_THRESHOLD)
    }

    /// A full pipeline with model-backed extraction at a custom threshold.
    pub fn with_threshold(provider: Box<dyn AiProvider>, confidence_threshold: f64) -> Self {
        Self::new(
            ProductNormalizer::new(),
            AttributeExtractor::model(provider, confidence_threshold),
            EmbeddingTextBuilder::new(),
            false,
        )
    }

    /// Processes a batch of raw records for one tenant.
    ///
    /// Only a structurally invalid batch returns an error; every per-record
    /// problem is recorded on the [`IngestionRunResult`] instead.
    pub async fn process(
        &self,
        raw_records: &[RawRecord],
        tenant_id: &str,
        connector_id: Option<&str>,
        mut progress: Option<ProgressFn<'_>>,
    ) -> Result<IngestionRunResult, IngestError> {
        if tenant_id.trim().is_empty() {
            return Err(IngestError::InvalidBatch(
                "tenant_id must not be empty".to_string(),
            ));
        }

        let mut result = IngestionRunResult {
            total: raw_records.len(),
            ..Default::default()
        };

        info!(
            "Starting ingestion of {} records for tenant {tenant_id}",
            result.total
        );

        // Stage 1: normalize.
        let mut normalized: Vec<CanonicalProduct> = Vec::with_capacity(raw_records.len());
        for (i, raw) in raw_records.iter().enumerate() {
            match self.normalizer.normalize(raw, tenant_id, connector_id) {
                Ok(product) => normalized.push(product),
                Err(e) => {
                    result.failed += 1;
                    result.errors.push(StageError {
                        product_id: raw.id.clone(),
                        stage: Stage::Normalize,
                        message: e.to_string(),
                    });
                    continue;
                }
            }

            if i % PROGRESS_INTERVAL == 0 {
                if let Some(callback) = progress.as_mut() {
                    callback(i, result.total);
                }
            }
        }

        // Stage 2: extract attributes.
        let mut attributes_map: HashMap<String, Vec<ExtractedAttribute>> =
            HashMap::with_capacity(normalized.len());
        if self.skip_enrichment {
            for product in &normalized {
                attributes_map.insert(product.id.clone(), Vec::new());
            }
        } else {
            for product in &normalized {
                let attributes = match self.extractor.try_extract(product).await {
                    Ok(attributes) => attributes,
                    Err(e) => {
                        // Enrichment failure is non-fatal; the product
                        // proceeds with no attributes.
                        warn!("Attribute extraction failed for {}: {e}", product.id);
                        result
                            .warnings
                            .push(format!("Attribute extraction failed for {}: {e}", product.id));
                        Vec::new()
                    }
                };
                attributes_map.insert(product.id.clone(), attributes);
            }
        }

        // Stage 3: synthesize embedding text.
        let enriched = self.builder.build_batch(normalized, &mut attributes_map);

        // Stage 4: prepare for storage.
        for item in enriched {
            let external_id = item.product.id.clone();
            match to_storage_ready(item, tenant_id, connector_id) {
                Ok((product, attributes)) => {
                    result.products.push(product);
                    result.attributes.extend(attributes);
                    result.successful += 1;
                }
                Err(message) => {
                    result.failed += 1;
                    result.errors.push(StageError {
                        product_id: external_id,
                        stage: Stage::Prepare,
                        message,
                    });
                }
            }
        }

        if let Some(callback) = progress.as_mut() {
            callback(result.total, result.total);
        }

        info!(
            "Ingestion finished for tenant {tenant_id}: {} successful, {} failed, {} skipped of {}",
            result.successful, result.failed, result.skipped, result.total
        );

        Ok(result)
    }

    /// Processes a single record, collapsing the run result into the
    /// record's own outcome.
    pub async fn process_single(
        &self,
        raw_record: &RawRecord,
        tenant_id: &str,
        connector_id: Option<&str>,
    ) -> Result<SingleRunResult, IngestError> {
        let mut result = self
            .process(
                std::slice::from_ref(raw_record),
                tenant_id,
                connector_id,
                None,
            )
            .await?;

        if let Some(product) = result.products.pop() {
            Ok(SingleRunResult {
                product: Some(product),
                attributes: result.attributes,
                error: None,
            })
        } else {
            let error = result
                .errors
                .first()
                .map(|e| e.message.clone())
                .unwrap_or_else(|| "No product processed".to_string());
            Ok(SingleRunResult {
                product: None,
                attributes: Vec::new(),
                error: Some(error),
            })
        }
    }
}

/// Flattens an enriched product into storage-ready records.
///
/// The product key is the deterministic `{tenant_id}_{external_id}`, so
/// re-ingesting the same record upserts rather than duplicates.
fn to_storage_ready(
    enriched: EnrichedProduct,
    tenant_id: &str,
    connector_id: Option<&str>,
) -> Result<(StorageReadyProduct, Vec<StorageReadyAttribute>), String> {
    let EnrichedProduct {
        product,
        attributes,
        embedding_text,
    } = enriched;

    if product.id.trim().is_empty() {
        return Err("cannot build storage key for a product without an id".to_string());
    }

    let storage_id = format!("{tenant_id}_{}", product.id);

    let storage_attributes = attributes
        .into_iter()
        .map(|attr| StorageReadyAttribute {
            product_id: storage_id.clone(),
            tenant_id: tenant_id.to_string(),
            attribute_name: attr.name,
            attribute_value: attr.value,
            confidence: attr.confidence,
            extraction_method: attr.method,
            source_field: attr.source_field,
        })
        .collect();

    let storage_product = StorageReadyProduct {
        id: storage_id,
        tenant_id: tenant_id.to_string(),
        connector_id: connector_id.map(String::from),
        external_id: product.id,
        name: product.name,
        slug: product.slug,
        sku: product.sku,
        brand: product.brand,
        price: product.price,
        regular_price: product.regular_price,
        sale_price: product.sale_price,
        currency: product.currency,
        stock_status: product.stock_status,
        stock_quantity: product.stock_quantity,
        description: product.description,
        short_description: product.short_description,
        categories: product.categories,
        tags: product.tags,
        image_url: product.image_url,
        gallery_urls: product.gallery_urls,
        permalink: product.permalink,
        raw_data: product.raw_data,
        embedding_text,
    };

    Ok((storage_product, storage_attributes))
}
