use async_trait::async_trait;
use std::sync::Arc;

use crate::config::LLMConfig;
use crate::types::{AppResult, LLMRequest, LLMResponse};

#[async_trait]
pub trait LLMAdapter: Send + Sync {
    async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse>;
}

/// A configured chat model: the adapter that talks to the provider plus the
/// model id every request is sent to.
#[derive(Clone)]
pub struct LLM {
    adapter: Arc<dyn LLMAdapter>,
    model: String,
}

impl LLM {
    pub fn new(adapter: Arc<dyn LLMAdapter>, model: impl Into<String>) -> Self {
        Self {
            adapter,
            model: model.into(),
        }
    }

    /// Build the Groq-backed model from config. Returns `None` when no API key
    /// is configured so callers can answer with a setup hint instead.
    pub fn from_config(config: &LLMConfig) -> Option<Self> {
        let api_key = config.active_api_key()?;
        let adapter = crate::llm::groq::GroqAdapter::with_api_base(&api_key, &config.api_base);
        Some(Self::new(Arc::new(adapter), config.model.clone()))
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse> {
        self.adapter.create_chat_completion(request).await
    }
}
