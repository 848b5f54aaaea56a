//! # Ingestion
//!
//! The ingestion-time half of the system: normalization, attribute
//! extraction, embedding-text synthesis, and the pipeline that drives them
//! over a batch with per-record failure isolation.

pub mod attributes;
pub mod embedding_text;
pub mod normalize;
pub mod pipeline;

pub use attributes::{AttributeExtractor, ExtractionStrategy};
pub use embedding_text::{price_tier, EmbeddingTextBuilder};
pub use normalize::{NormalizeError, ProductNormalizer};
pub use pipeline::{IngestionPipeline, ProgressFn};
