use std::time::Duration;

use super::http;
use crate::config::KeyFromEnv;
use crate::core::LowLevelClient;
use crate::error::{AIError, ConfigError, ProviderError};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument};

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GeminiModel {
    #[default]
    FlashLite25, // "gemini-2.5-flash-lite"
    Flash25,     // "gemini-2.5-flash"
    Pro25,       // "gemini-2.5-pro"
    Override(String),
}

impl GeminiModel {
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::FlashLite25 => "gemini-2.5-flash-lite",
            Self::Flash25 => "gemini-2.5-flash",
            Self::Pro25 => "gemini-2.5-pro",
            Self::Override(s) => s.as_str(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: GeminiModel,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout: Option<Duration>,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: GeminiClient::find_key().unwrap_or_default(),
            model: GeminiModel::default(),
            max_tokens: 4096,
            temperature: 0.7,
            timeout: None,
        }
    }
}

impl GeminiConfig {
    #[must_use]
    pub fn new(api_key: String) -> Self {
        Self { api_key, ..Default::default() }
    }

    #[must_use]
    pub fn with_model(mut self, model: GeminiModel) -> Self {
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
pub struct GeminiClient {
    config: GeminiConfig,
    client: Client,
}

impl KeyFromEnv for GeminiClient {
    const KEY_NAME: &'static str = "GOOGLE_API_KEY";
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Self {
        info!(model = %config.model.id(), timeout = ?config.timeout, "Creating new Gemini client");
        let client = http::http_client(config.timeout);
        Self { config, client }
    }

    /// Build a client from the environment, asking the user for a missing key.
    pub fn from_env(timeout: Option<Duration>) -> Result<Self, ConfigError> {
        let api_key = Self::find_key_with_user()?;
        Ok(Self::new(GeminiConfig::new(api_key).with_timeout(timeout)))
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }
}

/// Concatenate the text parts of the first candidate.
fn extract_text(response: GeminiResponse) -> Result<String, AIError> {
    response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| content.parts.into_iter().map(|p| p.text).collect())
        .ok_or_else(|| {
            error!("No candidates in Gemini response");
            AIError::Gemini(ProviderError::Api("No candidates in response".to_string()))
        })
}

#[async_trait]
impl LowLevelClient for GeminiClient {
    #[instrument(skip(self, prompt), fields(prompt_len = prompt.len(), model = %self.config.model.id()))]
    async fn ask_raw(&self, prompt: String) -> Result<String, AIError> {
        let request = GeminiRequest {
            contents: vec![GeminiContent { parts: vec![GeminiPart { text: prompt }] }],
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
                max_output_tokens: self.config.max_tokens,
            },
        };

        debug!("Sending request to Gemini API");
        let builder = self
            .client
            .post(format!("{}/{}:generateContent", API_BASE, self.config.model.id()))
            .header("x-goog-api-key", &self.config.api_key)
            .json(&request);
        let body = http::send(builder, "gemini").await.map_err(AIError::Gemini)?;

        let text = extract_text(http::decode(&body).map_err(AIError::Gemini)?)?;
        info!(response_len = text.len(), "Successfully received Gemini response");
        Ok(text)
    }

    fn clone_box(&self) -> Box<dyn LowLevelClient> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(json: &str) -> GeminiResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn joins_all_parts_of_first_candidate() {
        let reply = response(
            r#"{"candidates":[
                {"content":{"parts":[{"text":"[{\"question\":"},{"text":"\"Q\"}]"}]}},
                {"content":{"parts":[{"text":"ignored"}]}}
            ]}"#,
        );
        assert_eq!(extract_text(reply).unwrap(), r#"[{"question":"Q"}]"#);
    }

    #[test]
    fn no_candidates_is_an_api_error() {
        let err = extract_text(response(r#"{"candidates":[]}"#)).unwrap_err();
        assert!(matches!(err, AIError::Gemini(ProviderError::Api(_))));

        let err = extract_text(response("{}")).unwrap_err();
        assert!(matches!(err, AIError::Gemini(ProviderError::Api(_))));
    }

    #[test]
    fn candidate_without_content_is_an_api_error() {
        let err = extract_text(response(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#)).unwrap_err();
        assert!(matches!(err, AIError::Gemini(ProviderError::Api(_))));
    }

    #[test]
    fn config_builders() {
        let config = GeminiConfig::new("key".to_string())
            .with_model(GeminiModel::Pro25)
            .with_max_tokens(1024)
            .with_temperature(0.2)
            .with_timeout(Some(Duration::from_secs(30)));
        assert_eq!(config.model.id(), "gemini-2.5-pro");
        assert_eq!(config.max_tokens, 1024);
        assert_eq!(config.temperature, 0.2);
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));

        let client = GeminiClient::new(config);
        assert_eq!(client.config().timeout, Some(Duration::from_secs(30)));
    }
}
