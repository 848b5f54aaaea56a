//! # Shoprag
//!
//! This crate turns heterogeneous retail product records and free-text
//! customer queries into a canonical, search-ready representation. The
//! ingestion side cleans raw records, extracts structured attributes via a
//! configurable AI provider (with a deterministic rule fallback), and
//! synthesizes embedding text; the query side parses natural language into
//! structured constraints using the same model/rule dual-strategy pattern.
//!
//! Storage and vector-index clients are external collaborators: the crate
//! emits storage-ready records and filter predicates but performs no I/O
//! beyond the AI provider calls.

pub mod constants;
pub mod errors;
pub mod ingest;
pub mod prompts;
pub mod providers;
pub mod query;
pub mod types;

pub use errors::{IngestError, ModelError};
pub use ingest::{
    AttributeExtractor, EmbeddingTextBuilder, ExtractionStrategy, IngestionPipeline,
    ProductNormalizer,
};
pub use providers::ai::AiProvider;
pub use query::{FilterPredicate, QueryConstraints, QueryResult, QueryService};
pub use types::{
    CanonicalProduct, EnrichedProduct, ExtractedAttribute, ExtractionMethod, IngestionRunResult,
    RawPrice, RawRecord, SingleRunResult, Stage, StageError, StockStatus, StorageReadyAttribute,
    StorageReadyProduct, VectorPayload,
};
