use thiserror::Error;

use crate::session::Phase;

#[derive(Error, Debug)]
pub enum QuizError {
    #[error("Question generation failed: {0}")]
    GenerationFailed(#[from] AIError),
    #[error("Malformed question response: {reason}. Raw response: {raw}")]
    MalformedResponse { reason: String, raw: String },
    #[error("Invalid selection: question {index}, label {label:?}")]
    InvalidSelection { index: usize, label: String },
    #[error("Unanswered questions: {missing:?}")]
    IncompleteAnswers { missing: Vec<usize> },
    #[error("Cannot {operation} while the session is {phase}")]
    WrongPhase { operation: &'static str, phase: Phase },
}

impl QuizError {
    pub(crate) fn malformed(reason: impl Into<String>, raw: &str) -> Self {
        Self::MalformedResponse { reason: reason.into(), raw: raw.to_string() }
    }

    /// True for conditions the user can fix without regenerating the quiz.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::IncompleteAnswers { .. })
    }
}

#[derive(Error, Debug)]
pub enum AIError {
    #[error("Gemini API error: {0}")]
    Gemini(ProviderError),
    #[error("Claude API error: {0}")]
    Claude(ProviderError),
    #[error("DeepSeek API error: {0}")]
    DeepSeek(ProviderError),
    #[error("Mock client error: {0}")]
    Mock(String),
    #[error("Empty response from completion service")]
    EmptyResponse,
}

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("API error: {0}")]
    Api(String),
    #[error("Rate limit exceeded")]
    RateLimit,
    #[error("Authentication failed")]
    Authentication,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("API key {0} not found in environment or .env")]
    MissingKey(&'static str),
    #[error("Failed to read catalog {path}: {source}")]
    CatalogIo {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid catalog {path}: {source}")]
    CatalogFormat {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to update .env file: {0}")]
    EnvFile(#[from] std::io::Error),
    #[error("Terminal I/O failed: {0}")]
    Terminal(#[source] std::io::Error),
    #[error("Unknown client type: '{0}'. Supported: gemini, claude, deepseek, mock")]
    UnknownClient(String),
}
