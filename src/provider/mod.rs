use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::cli::ProviderKind;
use crate::config::Config;
use crate::errors::{Result, TripError};

pub mod gemini;
pub mod openai;
pub mod ollama;

/// A text-generation service: one prompt in, one text blob out.
#[async_trait]
pub trait Provider: Send + Sync {
    fn name(&self) -> &str;
    fn model(&self) -> &str;
    async fn generate(&self, prompt: &str) -> Result<String>;
}

pub type DynProvider = Box<dyn Provider + Send + Sync>;

pub(crate) fn http_client(timeout_secs: u64) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(TripError::from)
}

/// Maps a non-success response to a provider error carrying status and body.
pub(crate) async fn check_status(provider: &str, resp: reqwest::Response) -> Result<String> {
    let status = resp.status();
    let text = resp.text().await?;
    if !status.is_success() {
        return Err(TripError::Provider(format!("{provider} API error ({status}): {text}")));
    }
    Ok(text)
}

pub(crate) fn require_key(cfg: &Config) -> Result<String> {
    cfg.api_key
        .clone()
        .ok_or_else(|| TripError::Config(format!("no API key configured for {:?}", cfg.provider)))
}

pub fn make_provider(cfg: &Config) -> Result<DynProvider> {
    let model = cfg.model().to_string();
    let base = cfg.api_base().to_string();
    match cfg.provider {
        ProviderKind::Gemini => Ok(Box::new(gemini::GeminiProvider::new(
            model, base, require_key(cfg)?, cfg.timeout_secs,
        )?)),
        ProviderKind::OpenAI => Ok(Box::new(openai::OpenAIProvider::new(
            model, base, require_key(cfg)?, cfg.timeout_secs,
        )?)),
        ProviderKind::Ollama => Ok(Box::new(ollama::OllamaProvider::new(
            model, base, cfg.timeout_secs,
        )?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_configured_provider() {
        let cfg = Config { api_key: Some("k".into()), ..Config::default() };
        let p = make_provider(&cfg).unwrap();
        assert_eq!(p.name(), "gemini");
        assert_eq!(p.model(), "gemini-1.5-pro");

        let cfg = Config { provider: ProviderKind::Ollama, model: "mistral".into(), ..Config::default() };
        let p = make_provider(&cfg).unwrap();
        assert_eq!(p.name(), "ollama");
        assert_eq!(p.model(), "mistral");
    }

    #[test]
    fn keyed_provider_without_key_fails() {
        let cfg = Config { provider: ProviderKind::OpenAI, ..Config::default() };
        assert!(matches!(make_provider(&cfg), Err(TripError::Config(_))));
    }
}
