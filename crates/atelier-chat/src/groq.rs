//! Groq chat-completions client (OpenAI-compatible REST API).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use atelier_core::config::LlmConfig;

use crate::error::ChatError;
use crate::generator::CompletionClient;
use crate::types::PromptMessage;

/// Longest error body carried into an error message.
const MAX_ERROR_BODY_CHARS: usize = 300;

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [PromptMessage],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Client for a hosted chat-completions endpoint.
///
/// Holds one pooled `reqwest::Client`; build it once and share it.
#[derive(Clone)]
pub struct GroqClient {
    client: Client,
    api_url: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl GroqClient {
    /// Build a client from config and an explicit API key.
    pub fn new(config: &LlmConfig, api_key: impl Into<String>) -> Result<Self, ChatError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ChatError::MissingApiKey);
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()?;
        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            api_key,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    /// Build a client with the key read from `config.api_key_env`.
    ///
    /// Returns [`ChatError::MissingApiKey`] when the variable is unset or
    /// blank.
    pub fn from_env(config: &LlmConfig) -> Result<Self, ChatError> {
        let api_key = config.api_key_from_env().ok_or(ChatError::MissingApiKey)?;
        Self::new(config, api_key)
    }

    fn request_body<'a>(&'a self, messages: &'a [PromptMessage]) -> CompletionRequest<'a> {
        CompletionRequest {
            model: &self.model,
            messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}

#[async_trait]
impl CompletionClient for GroqClient {
    async fn complete(&self, messages: &[PromptMessage]) -> Result<String, ChatError> {
        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&self.request_body(messages))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChatError::Api {
                status: status.as_u16(),
                message: error_message(&body, status.canonical_reason()),
            });
        }

        let parsed: CompletionResponse = response.json().await?;
        extract_content(parsed)
    }

    fn model(&self) -> &str {
        &self.model
    }
}

fn extract_content(response: CompletionResponse) -> Result<String, ChatError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| ChatError::InvalidResponse("no choices in completion".to_string()))
}

/// Pull a readable message out of an error body, preferring the
/// OpenAI-style `{"error":{"message":...}}` shape.
fn error_message(body: &str, reason: Option<&str>) -> String {
    if let Ok(parsed) = serde_json::from_str::<ApiErrorBody>(body) {
        return parsed.error.message;
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return reason.unwrap_or("unknown error").to_string();
    }
    trimmed.chars().take(MAX_ERROR_BODY_CHARS).collect()
}
