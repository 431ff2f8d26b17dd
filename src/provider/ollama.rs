use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{check_status, http_client, Provider};
use crate::errors::{Result, TripError};

pub struct OllamaProvider {
    model: String,
    url: String,
    client: Client,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Msg<'a>>,
    stream: bool,
}

#[derive(Serialize)]
struct Msg<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: MsgOut,
}

#[derive(Deserialize)]
struct MsgOut {
    content: String,
}

impl OllamaProvider {
    pub fn new(model: String, url: String, timeout_secs: u64) -> Result<Self> {
        Ok(Self { model, url, client: http_client(timeout_secs)? })
    }
}

#[async_trait]
impl Provider for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/api/chat", self.url.trim_end_matches('/'));
        let body = ChatRequest {
            model: &self.model,
            messages: vec![Msg { role: "user", content: prompt }],
            stream: false,
        };
        debug!(%url, model = %self.model, "POST /api/chat");

        let resp = self.client.post(&url).json(&body).send().await?;
        let text = check_status("Ollama", resp).await?;

        let parsed: ChatResponse = serde_json::from_str(&text)
            .map_err(|e| TripError::Provider(format!("failed to parse Ollama response: {e}")))?;
        Ok(parsed.message.content.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn sends_non_streaming_chat() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .and(body_partial_json(json!({"model": "llama3.1", "stream": false})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "message": {"role": "assistant", "content": "\nDay 1: Hills\nTea gardens.\n"},
                "done": true
            })))
            .mount(&server)
            .await;

        let p = OllamaProvider::new("llama3.1".into(), format!("{}/", server.uri()), 5).unwrap();
        assert_eq!(p.generate("plan").await.unwrap(), "Day 1: Hills\nTea gardens.");
    }

    #[tokio::test]
    async fn garbage_body_is_provider_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let p = OllamaProvider::new("llama3.1".into(), server.uri(), 5).unwrap();
        assert!(matches!(p.generate("plan").await, Err(TripError::Provider(_))));
    }
}
