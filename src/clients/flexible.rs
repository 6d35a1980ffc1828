use crate::config::KeyFromEnv;
use crate::core::LowLevelClient;
use crate::error::{AIError, ConfigError};
use async_trait::async_trait;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

/// Which completion provider to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientType {
    #[cfg(feature = "gemini")]
    Gemini,
    #[cfg(feature = "anthropic")]
    Claude,
    #[cfg(feature = "deepseek")]
    DeepSeek,
    Mock,
}

impl ClientType {
    /// Pick the first provider whose API key is available, else the mock.
    pub fn detect() -> Self {
        #[cfg(feature = "gemini")]
        if super::GeminiClient::find_key().is_some() {
            return Self::Gemini;
        }
        #[cfg(feature = "anthropic")]
        if super::ClaudeClient::find_key().is_some() {
            return Self::Claude;
        }
        #[cfg(feature = "deepseek")]
        if super::DeepSeekClient::find_key().is_some() {
            return Self::DeepSeek;
        }
        Self::Mock
    }

    /// Construct the client. Network providers may prompt for a missing key and
    /// apply `timeout` to every request; the mock ignores it.
    pub fn into_client(self, timeout: Option<Duration>) -> Result<Box<dyn LowLevelClient>, ConfigError> {
        let client: Box<dyn LowLevelClient> = match self {
            #[cfg(feature = "gemini")]
            Self::Gemini => Box::new(super::GeminiClient::from_env(timeout)?),
            #[cfg(feature = "anthropic")]
            Self::Claude => Box::new(super::ClaudeClient::from_env(timeout)?),
            #[cfg(feature = "deepseek")]
            Self::DeepSeek => Box::new(super::DeepSeekClient::from_env(timeout)?),
            Self::Mock => Box::new(super::MockClient::demo()),
        };
        Ok(client)
    }
}

impl FromStr for ClientType {
    type Err = ConfigError;

    /// Case-insensitive provider name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            #[cfg(feature = "gemini")]
            "gemini" => Ok(Self::Gemini),
            #[cfg(feature = "anthropic")]
            "claude" => Ok(Self::Claude),
            #[cfg(feature = "deepseek")]
            "deepseek" => Ok(Self::DeepSeek),
            "mock" => Ok(Self::Mock),
            _ => Err(ConfigError::UnknownClient(s.to_string())),
        }
    }
}

impl fmt::Display for ClientType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            #[cfg(feature = "gemini")]
            ClientType::Gemini => write!(f, "Gemini"),
            #[cfg(feature = "anthropic")]
            ClientType::Claude => write!(f, "Claude"),
            #[cfg(feature = "deepseek")]
            ClientType::DeepSeek => write!(f, "DeepSeek"),
            ClientType::Mock => write!(f, "Mock"),
        }
    }
}

/// Cheaply clonable wrapper around any boxed client.
#[derive(Debug, Clone)]
pub struct FlexibleClient {
    inner: Arc<dyn LowLevelClient>,
}

impl FlexibleClient {
    pub fn new(client: Box<dyn LowLevelClient>) -> Self {
        Self { inner: Arc::from(client) }
    }

    pub fn from_type(client_type: ClientType, timeout: Option<Duration>) -> Result<Self, ConfigError> {
        Ok(Self::new(client_type.into_client(timeout)?))
    }

    /// Mock-backed client plus its control handle.
    pub fn mock() -> (Self, Arc<super::MockHandle>) {
        let (mock_client, handle) = super::MockClient::new();
        (Self::new(Box::new(mock_client)), handle)
    }
}

#[async_trait]
impl LowLevelClient for FlexibleClient {
    async fn ask_raw(&self, prompt: String) -> Result<String, AIError> {
        self.inner.ask_raw(prompt).await
    }

    fn clone_box(&self) -> Box<dyn LowLevelClient> {
        Box::new(self.clone())
    }
}
