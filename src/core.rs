//! Generation pipeline: prompt a completion client, parse its reply and hand
//! the resulting question set to a session.
//!
//! - [`LowLevelClient`] is the seam to the hosted model.
//! - [`QuizGenerator`] owns a client and the prompt settings; it never retries
//!   and never touches a session unless generation fully succeeds.

use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, instrument, warn};

use crate::catalog::Unit;
use crate::config::GeneratorConfig;
use crate::error::{AIError, QuizError};
use crate::interceptors::{FileInterceptor, Interceptor};
use crate::parser;
use crate::prompt::PromptBuilder;
use crate::question::QuestionSet;
use crate::session::QuizSession;

/// Low-level model client abstraction.
///
/// Implementors execute a prompt and return the raw model text. Any timeout
/// is the implementor's business.
#[async_trait]
pub trait LowLevelClient: Send + Sync + Debug {
    async fn ask_raw(&self, prompt: String) -> Result<String, AIError>;

    fn clone_box(&self) -> Box<dyn LowLevelClient>;
}

impl Clone for Box<dyn LowLevelClient> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

#[async_trait]
impl LowLevelClient for Box<dyn LowLevelClient> {
    async fn ask_raw(&self, prompt: String) -> Result<String, AIError> {
        self.as_ref().ask_raw(prompt).await
    }

    fn clone_box(&self) -> Box<dyn LowLevelClient> {
        self.as_ref().clone_box()
    }
}

#[derive(Clone, Debug)]
pub struct QuizGenerator<C: LowLevelClient> {
    client: C,
    config: GeneratorConfig,
    prompts: PromptBuilder,
    interceptor: Option<Arc<dyn Interceptor>>,
}

impl<C: LowLevelClient> QuizGenerator<C> {
    pub fn new(client: C, config: GeneratorConfig) -> Self {
        info!(
            question_count = config.question_count,
            schema_guidance = config.schema_guidance,
            "Creating new QuizGenerator"
        );
        let prompts = PromptBuilder::new().with_schema_guidance(config.schema_guidance);
        let interceptor = config
            .transcript_dir
            .clone()
            .map(|dir| Arc::new(FileInterceptor::new(dir)) as Arc<dyn Interceptor>);
        Self { client, config, prompts, interceptor }
    }

    /// Replace the transcript sink, e.g. with a custom [`Interceptor`].
    #[must_use]
    pub fn with_interceptor(mut self, interceptor: Arc<dyn Interceptor>) -> Self {
        self.interceptor = Some(interceptor);
        self
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn build_prompt(&self, notes: &str, prior_questions: &str) -> String {
        self.prompts.build(notes, prior_questions, self.config.question_count)
    }

    /// One prompt, one completion, one parse.
    #[instrument(target = "exam_quiz::generator", skip(self, notes, prior_questions), fields(notes_len = notes.len()))]
    pub async fn generate(&self, notes: &str, prior_questions: &str) -> Result<QuestionSet, QuizError> {
        let prompt = self.build_prompt(notes, prior_questions);
        debug!(prompt_len = prompt.len(), "Built generation prompt");

        let raw = self.client.ask_raw(prompt.clone()).await?;
        self.record_transcript(&prompt, &raw).await;

        if raw.trim().is_empty() {
            warn!("Completion service returned an empty response");
            return Err(AIError::EmptyResponse.into());
        }

        let set = parser::parse(&raw)?;
        if set.len() != self.config.question_count {
            warn!(
                requested = self.config.question_count,
                received = set.len(),
                "Model returned a different number of questions than requested"
            );
        }
        info!(count = set.len(), "Generated question set");
        Ok(set)
    }

    pub async fn generate_for_unit(&self, unit: &Unit) -> Result<QuestionSet, QuizError> {
        info!(unit = %unit.name, "Generating quiz for unit");
        self.generate(&unit.notes, &unit.prior_questions).await
    }

    /// Generate and load into `session`. On any failure the session is left
    /// exactly as it was. Returns the number of questions loaded.
    pub async fn generate_into(
        &self,
        session: &mut QuizSession,
        notes: &str,
        prior_questions: &str,
    ) -> Result<usize, QuizError> {
        let set = self.generate(notes, prior_questions).await?;
        let count = set.len();
        session.load(set);
        Ok(count)
    }

    async fn record_transcript(&self, prompt: &str, response: &str) {
        if let Some(interceptor) = &self.interceptor {
            if let Err(e) = interceptor.save(prompt, response).await {
                warn!(error = %e, "Failed to save generation transcript");
            }
        }
    }
}
