use thiserror::Error;

/// Errors produced while talking to an AI model provider.
///
/// Every variant is caught at the extraction or query-analysis call site and
/// converted into the documented fallback; none of these cross the pipeline
/// boundary.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Failed to build Reqwest client: {0}")]
    ReqwestClientBuild(reqwest::Error),
    #[error("Failed to send request to the AI provider: {0}")]
    AiRequest(reqwest::Error),
    #[error("Failed to deserialize the AI provider response: {0}")]
    AiDeserialization(reqwest::Error),
    #[error("AI provider returned an error: {0}")]
    AiApi(String),
    #[error("AI provider returned an empty response")]
    EmptyResponse,
    #[error("Failed to parse structured model output: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors for the ingestion pipeline as a whole.
///
/// Per-record failures are recorded inside [`crate::types::IngestionRunResult`]
/// and never surface here; this type is reserved for structurally invalid
/// input and unexpected internal failures.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("The ingestion batch is structurally invalid: {0}")]
    InvalidBatch(String),

    #[error("An unexpected internal error occurred: {0}")]
    Internal(#[from] anyhow::Error),
}
