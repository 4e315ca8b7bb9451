//! The answer generator seam.
//!
//! `AnswerGenerator` is the one async trait in the system: the runtime only
//! needs "prompt in, answer out", so tests swap in scripted generators and
//! the empty-corpus short-circuit can be asserted by counting calls.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::{debug, warn};

use bothive_core::{Error, Result};

use crate::config::GeneratorConfig;

#[async_trait]
pub trait AnswerGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Ollama-style generate endpoint over HTTP. Non-streaming: the widget shows
/// whole replies, so there is nothing to stream to.
pub struct HttpAnswerGenerator {
    client: Client,
    config: GeneratorConfig,
}

impl HttpAnswerGenerator {
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| Error::Config(format!("http client: {}", e)))?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl AnswerGenerator for HttpAnswerGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let body = json!({
            "model": self.config.model,
            "prompt": prompt,
            "stream": false,
        });

        debug!(
            url = %self.config.api_url,
            model = %self.config.model,
            prompt_chars = prompt.chars().count(),
            "generating answer"
        );

        let mut request = self.client.post(&self.config.api_url).json(&body);
        if let Some(token) = &self.config.api_token {
            request = request.header("Authorization", format!("Bearer {}", token));
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::Upstream(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            warn!(%status, detail = %detail, "generation endpoint returned an error");
            return Err(Error::Upstream(format!("api error {}: {}", status, detail)));
        }

        let parsed: serde_json::Value = response
            .json()
            .await
            .map_err(|e| Error::Upstream(format!("invalid response body: {}", e)))?;

        match parsed["response"].as_str() {
            Some(answer) if !answer.trim().is_empty() => Ok(answer.trim().to_string()),
            _ => Err(Error::Upstream("empty generation response".to_string())),
        }
    }
}
