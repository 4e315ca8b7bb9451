//! Answer-generation configuration, environment driven.

use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:11434/api/generate";
pub const DEFAULT_MODEL: &str = "llama3.2";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Where and how to call the generation endpoint.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub api_url: String,
    pub model: String,
    /// Optional bearer token for hosted endpoints; local Ollama needs none.
    pub api_token: Option<String>,
    pub timeout_secs: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_token: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl GeneratorConfig {
    /// Read `ANSWER_API_URL`, `ANSWER_MODEL`, and `ANSWER_API_TOKEN`, falling
    /// back to a local Ollama endpoint.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_url: std::env::var("ANSWER_API_URL").unwrap_or(defaults.api_url),
            model: std::env::var("ANSWER_MODEL").unwrap_or(defaults.model),
            api_token: std::env::var("ANSWER_API_TOKEN").ok(),
            timeout_secs: std::env::var("ANSWER_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.timeout_secs),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
