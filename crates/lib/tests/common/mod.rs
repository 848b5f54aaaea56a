#![allow(dead_code)]
//! # Common Test Utilities
//!
//! Shared mocks and setup for the integration tests: a scripted AI provider
//! with call history, a provider that always fails, and fixture builders for
//! raw records.

use async_trait::async_trait;
use dotenvy::dotenv;
use shoprag::providers::ai::AiProvider;
use shoprag::{ModelError, RawPrice, RawRecord};
use std::sync::{Arc, Once, RwLock};

static INIT: Once = Once::new();

/// Initializes the tracing subscriber and loads .env for tests.
pub fn setup_tracing() {
    INIT.call_once(|| {
        dotenv().ok();
        tracing_subscriber::fmt::init();
    });
}

// --- Mock AI Provider ---

/// A scripted AI provider: returns queued responses in order and records
/// every (system, user) prompt pair it receives.
#[derive(Clone, Debug)]
pub struct MockAiProvider {
    pub call_history: Arc<RwLock<Vec<(String, String)>>>,
    pub responses: Arc<RwLock<Vec<String>>>,
}

impl MockAiProvider {
    pub fn new(responses: Vec<String>) -> Self {
        Self {
            call_history: Arc::new(RwLock::new(Vec::new())),
            responses: Arc::new(RwLock::new(responses.into_iter().rev().collect())),
        }
    }
}

#[async_trait]
impl AiProvider for MockAiProvider {
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, ModelError> {
        self.call_history
            .write()
            .unwrap()
            .push((system_prompt.to_string(), user_prompt.to_string()));

        if let Some(response) = self.responses.write().unwrap().pop() {
            Ok(response)
        } else {
            Ok(r#"{"attributes": []}"#.to_string())
        }
    }
}

/// A provider that fails every call, for exercising fallback paths.
#[derive(Clone, Debug)]
pub struct FailingAiProvider;

#[async_trait]
impl AiProvider for FailingAiProvider {
    async fn generate(
        &self,
        _system_prompt: &str,
        _user_prompt: &str,
    ) -> Result<String, ModelError> {
        Err(ModelError::AiApi("mock provider failure".to_string()))
    }
}

// --- Fixtures ---

/// A reasonable raw record with the given id and name.
pub fn raw_record(id: &str, name: &str) -> RawRecord {
    RawRecord {
        id: id.to_string(),
        name: name.to_string(),
        description: "<p>A lovely blue cotton dress for summer evenings.</p>".to_string(),
        price: Some(RawPrice::Number(39.99)),
        currency: "usd".to_string(),
        categories: vec!["Womens".to_string(), "Dresses".to_string()],
        tags: vec!["summer".to_string(), "casual".to_string()],
        stock_status: "instock".to_string(),
        ..Default::default()
    }
}
