use std::time::Duration;

use super::http;
use crate::config::KeyFromEnv;
use crate::core::LowLevelClient;
use crate::error::{AIError, ConfigError, ProviderError};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument};

const MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ClaudeModel {
    #[default]
    Haiku35,
    Sonnet4,
    Opus4,
    Override(String),
}

impl ClaudeModel {
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Haiku35 => "claude-3-5-haiku-20241022",
            Self::Sonnet4 => "claude-sonnet-4-20250514",
            Self::Opus4 => "claude-opus-4-20250514",
            Self::Override(s) => s.as_str(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ClaudeRequest {
    model: String,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<ClaudeMessage>,
}

#[derive(Debug, Serialize)]
struct ClaudeMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ClaudeResponse {
    #[serde(default)]
    content: Vec<ClaudeContent>,
}

#[derive(Debug, Deserialize)]
struct ClaudeContent {
    #[serde(default)]
    text: String,
}

#[allow(clippy::module_name_repetitions)]
#[derive(Debug, Clone)]
pub struct ClaudeConfig {
    pub api_key: String,
    pub model: ClaudeModel,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout: Option<Duration>,
}

impl Default for ClaudeConfig {
    fn default() -> Self {
        Self {
            api_key: ClaudeClient::find_key().unwrap_or_default(),
            model: ClaudeModel::default(),
            max_tokens: 4096,
            temperature: 0.7,
            timeout: None,
        }
    }
}

impl ClaudeConfig {
    #[must_use]
    pub fn anthropic(api_key: String, model: ClaudeModel) -> Self {
        Self { api_key, model, ..Default::default() }
    }

    #[must_use]
    pub fn with_model(mut self, model: ClaudeModel) -> Self {
        self.model = model;
        self
    }

    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Clone, Debug)]
pub struct ClaudeClient {
    config: ClaudeConfig,
    client: Client,
}

impl KeyFromEnv for ClaudeClient {
    const KEY_NAME: &'static str = "ANTHROPIC_API_KEY";
}

impl ClaudeClient {
    pub fn new(config: ClaudeConfig) -> Self {
        info!(model = %config.model.id(), timeout = ?config.timeout, "Creating new Claude client");
        let client = http::http_client(config.timeout);
        Self { config, client }
    }

    pub fn from_env(timeout: Option<Duration>) -> Result<Self, ConfigError> {
        let api_key = Self::find_key_with_user()?;
        Ok(Self::new(ClaudeConfig::anthropic(api_key, ClaudeModel::default()).with_timeout(timeout)))
    }

    pub fn config(&self) -> &ClaudeConfig {
        &self.config
    }
}

/// Join the text blocks of a Messages reply.
fn extract_text(response: ClaudeResponse) -> Result<String, AIError> {
    if response.content.is_empty() {
        error!("No content in Anthropic response");
        return Err(AIError::Claude(ProviderError::Api("No content in response".to_string())));
    }
    Ok(response.content.into_iter().map(|c| c.text).collect())
}

#[async_trait]
impl LowLevelClient for ClaudeClient {
    #[instrument(skip(self, prompt), fields(prompt_len = prompt.len(), model = %self.config.model.id()))]
    async fn ask_raw(&self, prompt: String) -> Result<String, AIError> {
        let request = ClaudeRequest {
            model: self.config.model.id().to_string(),
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            messages: vec![ClaudeMessage { role: "user", content: prompt }],
        };

        debug!("Sending request to Anthropic API");
        let builder = self
            .client
            .post(MESSAGES_URL)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&request);
        let body = http::send(builder, "anthropic").await.map_err(AIError::Claude)?;

        let text = extract_text(http::decode(&body).map_err(AIError::Claude)?)?;
        info!(response_len = text.len(), "Successfully received Anthropic response");
        Ok(text)
    }

    fn clone_box(&self) -> Box<dyn LowLevelClient> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(json: &str) -> ClaudeResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn joins_text_blocks() {
        let reply = response(
            r#"{"id":"msg_1","content":[{"type":"text","text":"[{\"a\":"},{"type":"text","text":"1}]"}]}"#,
        );
        assert_eq!(extract_text(reply).unwrap(), r#"[{"a":1}]"#);
    }

    #[test]
    fn empty_content_is_an_api_error() {
        let err = extract_text(response(r#"{"content":[]}"#)).unwrap_err();
        assert!(matches!(err, AIError::Claude(ProviderError::Api(_))));
    }

    #[test]
    fn config_builders() {
        let config = ClaudeConfig::anthropic("key".to_string(), ClaudeModel::Sonnet4)
            .with_max_tokens(2048)
            .with_temperature(0.0)
            .with_timeout(Some(Duration::from_secs(10)));
        assert_eq!(config.model.id(), "claude-sonnet-4-20250514");
        assert_eq!(config.max_tokens, 2048);
        assert_eq!(config.temperature, 0.0);

        let client = ClaudeClient::new(config);
        assert_eq!(client.config().timeout, Some(Duration::from_secs(10)));
    }
}
