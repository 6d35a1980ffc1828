use std::time::Duration;

use super::http;
use crate::config::KeyFromEnv;
use crate::core::LowLevelClient;
use crate::error::{AIError, ConfigError, ProviderError};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument};

const COMPLETIONS_URL: &str = "https://api.deepseek.com/v1/chat/completions";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DeepSeekModel {
    #[default]
    Chat,
    Reasoner,
    Override(String),
}

impl DeepSeekModel {
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Chat => "deepseek-chat",
            Self::Reasoner => "deepseek-reasoner",
            Self::Override(s) => s.as_str(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage; 1],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DeepSeekConfig {
    pub api_key: String,
    pub model: DeepSeekModel,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout: Option<Duration>,
}

impl DeepSeekConfig {
    #[must_use]
    pub fn new(api_key: String) -> Self {
        Self { api_key, model: DeepSeekModel::default(), max_tokens: 4096, temperature: 0.7, timeout: None }
    }

    #[must_use]
    pub fn with_model(mut self, model: DeepSeekModel) -> Self {
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

impl Default for DeepSeekConfig {
    fn default() -> Self {
        Self::new(DeepSeekClient::find_key().unwrap_or_default())
    }
}

#[derive(Clone, Debug)]
pub struct DeepSeekClient {
    config: DeepSeekConfig,
    client: Client,
}

impl KeyFromEnv for DeepSeekClient {
    const KEY_NAME: &'static str = "DEEPSEEK_API_KEY";
}

impl DeepSeekClient {
    pub fn new(config: DeepSeekConfig) -> Self {
        info!(model = %config.model.id(), timeout = ?config.timeout, "Creating new DeepSeek client");
        let client = http::http_client(config.timeout);
        Self { config, client }
    }

    pub fn from_env(timeout: Option<Duration>) -> Result<Self, ConfigError> {
        let api_key = Self::find_key_with_user()?;
        Ok(Self::new(DeepSeekConfig::new(api_key).with_timeout(timeout)))
    }

    pub fn config(&self) -> &DeepSeekConfig {
        &self.config
    }
}

/// Message content of the first choice.
fn extract_text(response: ChatResponse) -> Result<String, AIError> {
    let content = response.choices.into_iter().next().and_then(|choice| choice.message.content);
    content.ok_or_else(|| {
        error!("No message content in DeepSeek response");
        AIError::DeepSeek(ProviderError::Api("No choices in response".to_string()))
    })
}

#[async_trait]
impl LowLevelClient for DeepSeekClient {
    #[instrument(skip(self, prompt), fields(prompt_len = prompt.len(), model = %self.config.model.id()))]
    async fn ask_raw(&self, prompt: String) -> Result<String, AIError> {
        let request = ChatRequest {
            model: self.config.model.id(),
            messages: [ChatMessage { role: "user", content: prompt }],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        debug!("Sending request to DeepSeek API");
        let builder = self.client.post(COMPLETIONS_URL).bearer_auth(&self.config.api_key).json(&request);
        let body = http::send(builder, "deepseek").await.map_err(AIError::DeepSeek)?;

        let text = extract_text(http::decode(&body).map_err(AIError::DeepSeek)?)?;
        info!(response_len = text.len(), "Successfully received DeepSeek response");
        Ok(text)
    }

    fn clone_box(&self) -> Box<dyn LowLevelClient> {
        Box::new(self.clone())
    }
}
