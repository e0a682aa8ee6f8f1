//! OpenAI chat completions client

use super::{api_error, CompletionModel, MAX_OUTPUT_TOKENS, TEMPERATURE};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    /// Null for some reasoning models
    #[serde(default)]
    content: Option<String>,
}

pub struct OpenAiClient {
    client: Client,
    api_key: String,
    model: String,
    endpoint: String,
    label: String,
}

impl OpenAiClient {
    pub fn new(client: Client, api_key: String, model: &str, base_url: &str) -> Self {
        Self {
            client,
            api_key,
            model: model.to_string(),
            endpoint: format!("{}/v1/chat/completions", base_url.trim_end_matches('/')),
            label: format!("openai/{}", model),
        }
    }
}

#[async_trait]
impl CompletionModel for OpenAiClient {
    fn name(&self) -> &str {
        &self.label
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: TEMPERATURE,
            max_tokens: MAX_OUTPUT_TOKENS,
        };

        debug!("Sending request to OpenAI API ({} prompt chars)", prompt.len());

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .context("Failed to send request to OpenAI API")?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(api_error("OpenAI", status, &text));
        }

        let body: ChatResponse = response
            .json()
            .await
            .context("Failed to parse OpenAI API response")?;

        Ok(body
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint() {
        let client = OpenAiClient::new(Client::new(), "sk".to_string(), "gpt-4o-mini", "https://api.openai.com");
        assert_eq!(client.endpoint, "https://api.openai.com/v1/chat/completions");
        assert_eq!(client.name(), "openai/gpt-4o-mini");
    }

    #[test]
    fn test_null_content_parses() {
        let json = r#"{"choices":[{"message":{"content":null}}]}"#;
        let body: ChatResponse = serde_json::from_str(json).unwrap();
        assert!(body.choices[0].message.content.is_none());
    }
}
