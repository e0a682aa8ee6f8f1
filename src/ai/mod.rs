//! LLM provider clients
//!
//! Every provider is reduced to one capability, [`CompletionModel::complete`]:
//! a prompt goes in, free-form text comes out. Which implementation backs the
//! enhancement pipeline is decided once per query from [`LlmConfig`].

pub mod claude;
pub mod gemini;
pub mod openai;

use crate::core::config::{LlmConfig, LlmProvider};
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

pub use claude::ClaudeClient;
pub use gemini::GeminiClient;
pub use openai::OpenAiClient;

/// Upper bound on generated tokens for every pipeline prompt
pub const MAX_OUTPUT_TOKENS: u32 = 1024;

/// Low temperature: the pipeline wants parseable JSON, not creativity
pub const TEMPERATURE: f32 = 0.2;

/// A text-completion model
#[async_trait]
pub trait CompletionModel: Send + Sync {
    /// Short provider/model label for logs
    fn name(&self) -> &str;

    /// Send a single prompt and return the model's text reply
    async fn complete(&self, prompt: &str) -> anyhow::Result<String>;
}

/// Build the model for the active provider, or `None` when its key is missing
pub fn build_model(config: &LlmConfig, client: &Client) -> Option<Box<dyn CompletionModel>> {
    let key = match config.active_key() {
        Some(key) => key.to_string(),
        None => {
            debug!(provider = %config.provider, "No API key for LLM provider");
            return None;
        }
    };

    let model: Box<dyn CompletionModel> = match config.provider {
        LlmProvider::Google => Box::new(GeminiClient::new(
            client.clone(),
            key,
            &config.google_model,
            &config.google_base_url,
        )),
        LlmProvider::OpenAi => Box::new(OpenAiClient::new(
            client.clone(),
            key,
            &config.openai_model,
            &config.openai_base_url,
        )),
        LlmProvider::Anthropic => Box::new(ClaudeClient::new(
            client.clone(),
            key,
            &config.anthropic_model,
            &config.anthropic_base_url,
        )),
    };

    debug!(model = model.name(), "Using LLM provider");
    Some(model)
}

/// Shared error text for non-success provider replies
pub(crate) fn api_error(provider: &str, status: reqwest::StatusCode, body: &str) -> anyhow::Error {
    anyhow::anyhow!("{} API error: {} - {}", provider, status, body)
}
