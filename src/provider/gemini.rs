//! Google Gemini `generateContent` adapter.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::{check_status, http_client, Provider};
use crate::errors::{Result, TripError};

pub struct GeminiProvider {
    model: String,
    api_base: String,
    api_key: String,
    client: Client,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<PartOut>,
}

#[derive(Deserialize)]
struct PartOut {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

impl GeminiProvider {
    pub fn new(model: String, api_base: String, api_key: String, timeout_secs: u64) -> Result<Self> {
        Ok(Self { model, api_base, api_key, client: http_client(timeout_secs)? })
    }

    fn endpoint(&self) -> String {
        // Accept both "gemini-1.5-pro" and "models/gemini-1.5-pro".
        let model = self.model.trim_start_matches("models/");
        format!("{}/models/{}:generateContent", self.api_base.trim_end_matches('/'), model)
    }
}

#[async_trait]
impl Provider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.model
    }

    #[instrument(skip_all, fields(model = %self.model))]
    async fn generate(&self, prompt: &str) -> Result<String> {
        let url = self.endpoint();
        let body = GenerateRequest {
            contents: vec![Content { role: "user", parts: vec![Part { text: prompt }] }],
        };
        debug!(%url, prompt_bytes = prompt.len(), "POST generateContent");

        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;
        let text = check_status("Gemini", resp).await?;
        debug!(response_bytes = text.len(), "gemini responded");

        let parsed: GenerateResponse = serde_json::from_str(&text)
            .map_err(|e| TripError::Provider(format!("failed to parse Gemini response: {e}")))?;

        if let Some(reason) = parsed.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(TripError::Provider(format!("prompt blocked by Gemini: {reason}")));
        }

        let content = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().map(|p| p.text).collect::<String>())
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| TripError::Provider("Gemini returned no content".into()))?;

        Ok(content.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider(server: &MockServer) -> GeminiProvider {
        GeminiProvider::new("models/gemini-1.5-pro".into(), server.uri(), "test-key".into(), 5).unwrap()
    }

    #[tokio::test]
    async fn concatenates_candidate_parts() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-1.5-pro:generateContent"))
            .and(header("x-goog-api-key", "test-key"))
            .and(body_partial_json(json!({"contents": [{"role": "user", "parts": [{"text": "plan it"}]}]})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{"content": {"parts": [{"text": "  Day 1: Arrival\n"}, {"text": "Fort.  "}]}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let out = provider(&server).generate("plan it").await.unwrap();
        assert_eq!(out, "Day 1: Arrival\nFort.");
    }

    #[tokio::test]
    async fn error_status_is_provider_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403).set_body_string("API key not valid"))
            .mount(&server)
            .await;

        let err = provider(&server).generate("x").await.unwrap_err();
        match err {
            TripError::Provider(msg) => {
                assert!(msg.contains("403"));
                assert!(msg.contains("API key not valid"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn blocked_prompt_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "promptFeedback": {"blockReason": "SAFETY"}
            })))
            .mount(&server)
            .await;

        let err = provider(&server).generate("x").await.unwrap_err();
        assert!(err.to_string().contains("SAFETY"));
    }

    #[tokio::test]
    async fn empty_candidates_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"candidates": []})))
            .mount(&server)
            .await;

        assert!(matches!(provider(&server).generate("x").await, Err(TripError::Provider(_))));
    }

    #[tokio::test]
    async fn unreachable_service_is_network_error() {
        // Nothing listens on port 1.
        let p = GeminiProvider::new("gemini-1.5-pro".into(), "http://127.0.0.1:1".into(), "k".into(), 2).unwrap();
        assert!(matches!(p.generate("x").await, Err(TripError::Network(_))));
    }
}
