pub mod gemini;
pub mod local;

use crate::errors::ModelError;
use async_trait::async_trait;
use dyn_clone::DynClone;
use std::fmt::Debug;

/// A trait for interacting with an AI provider.
///
/// This defines the one capability the pipeline needs from a model: given a
/// system and user prompt, return the raw text response. The attribute
/// extractor and query analyzer own all JSON parsing and validation, so a
/// provider implementation stays a thin transport wrapper.
#[async_trait]
pub trait AiProvider: Send + Sync + Debug + DynClone {
    /// Generates a response from a given system and user prompt.
    async fn generate(&self, system_prompt: &str, user_prompt: &str)
        -> Result<String, ModelError>;
}

dyn_clone::clone_trait_object!(AiProvider);
