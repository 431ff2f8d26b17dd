use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::{check_status, http_client, Provider};
use crate::errors::{Result, TripError};

/// OpenAI chat-completions provider that sends the prompt as a single user
/// message, with no extra system messages.
pub struct OpenAIProvider {
    model: String,
    api_base: String,
    api_key: String,
    client: Client,
}

impl OpenAIProvider {
    pub fn new(model: String, api_base: String, api_key: String, timeout_secs: u64) -> Result<Self> {
        Ok(Self { model, api_base, api_key, client: http_client(timeout_secs)? })
    }
}

#[async_trait]
impl Provider for OpenAIProvider {
    fn name(&self) -> &str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/chat/completions", self.api_base.trim_end_matches('/'));
        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "user", "content": prompt }
            ],
            "temperature": 0.7
        });
        debug!(%url, model = %self.model, "POST chat/completions");

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;
        let text = check_status("OpenAI", resp).await?;

        // Minimal structs to parse the chat response
        #[derive(Deserialize)]
        struct ChatMessage {
            content: Option<String>,
        }
        #[derive(Deserialize)]
        struct Choice {
            message: ChatMessage,
        }
        #[derive(Deserialize)]
        struct ChatResponse {
            choices: Vec<Choice>,
        }

        let parsed: ChatResponse = serde_json::from_str(&text)
            .map_err(|e| TripError::Provider(format!("failed to parse OpenAI response: {e}")))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or_else(|| TripError::Provider("OpenAI returned no content".into()))
    }
}
