//! Reply generator that calls a running server's `/api/chat` endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::ChatError;
use crate::generator::ReplyGenerator;
use crate::types::{PromptMessage, ReplyOutcome};

#[derive(Debug, Serialize)]
struct ChatReplyRequest<'a> {
    messages: &'a [PromptMessage],
}

/// Error body returned by the server for rejected requests.
#[derive(Debug, Deserialize)]
struct ServerErrorBody {
    message: String,
}

/// Client-side generator backed by the site's HTTP API.
#[derive(Clone)]
pub struct RemoteReplyGenerator {
    client: Client,
    endpoint: String,
}

impl RemoteReplyGenerator {
    /// Create a generator for the server at `base_url`, e.g.
    /// `http://127.0.0.1:3030`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ChatError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint_for(base_url),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn endpoint_for(base_url: &str) -> String {
    format!("{}/api/chat", base_url.trim_end_matches('/'))
}

#[async_trait]
impl ReplyGenerator for RemoteReplyGenerator {
    async fn generate(&self, history: Vec<PromptMessage>) -> Result<ReplyOutcome, ChatError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&ChatReplyRequest { messages: &history })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ServerErrorBody>(&body)
                .map(|b| b.message)
                .unwrap_or_else(|_| {
                    status
                        .canonical_reason()
                        .unwrap_or("unexpected response")
                        .to_string()
                });
            return Err(ChatError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<ReplyOutcome>().await?)
    }
}
