//! Exam-pattern quiz generation.
//!
//! Study notes and prior-year questions go into a prompt ([`prompt`]), a
//! hosted model answers with a JSON question array ([`clients`]), the reply is
//! validated into a [`QuestionSet`] ([`parser`]) and played through a
//! [`QuizSession`] ([`session`]).

pub mod catalog;
pub mod clients;
pub mod config;
pub mod core;
pub mod error;
pub mod interceptors;
pub mod parser;
pub mod prompt;
pub mod question;
pub mod render;
pub mod session;

// Convenient re-exports
pub use catalog::{Unit, UnitCatalog};
pub use config::GeneratorConfig;
pub use crate::core::{LowLevelClient, QuizGenerator};
pub use error::{AIError, ConfigError, ProviderError, QuizError};
pub use prompt::PromptBuilder;
pub use question::{AnswerOption, QuestionRecord, QuestionSet};
pub use session::{AnswerMap, Feedback, Phase, QuestionReview, QuizSession, Score};
