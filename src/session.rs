//! Quiz session state machine and scoring.
//!
//! A session moves `Idle -> Answering -> Submitted` and back to `Idle` on
//! reset. Each interaction context owns its own `QuizSession`; nothing here is
//! shared or global.

use std::collections::BTreeMap;
use std::fmt;

use tracing::{debug, info};

use crate::error::QuizError;
use crate::question::{QuestionRecord, QuestionSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Answering,
    Submitted,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Idle => write!(f, "idle"),
            Phase::Answering => write!(f, "answering"),
            Phase::Submitted => write!(f, "submitted"),
        }
    }
}

/// Selected label per question index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerMap(BTreeMap<usize, String>);

impl AnswerMap {
    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(&index).map(String::as_str)
    }

    pub fn contains(&self, index: usize) -> bool {
        self.0.contains_key(&index)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.0.iter().map(|(i, label)| (*i, label.as_str()))
    }

    fn upsert(&mut self, index: usize, label: String) {
        self.0.insert(index, label);
    }

    fn clear(&mut self) {
        self.0.clear();
    }
}

/// Feedback bucket shown next to a final score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    Excellent,
    Good,
    NeedsImprovement,
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Feedback::Excellent => write!(f, "Excellent"),
            Feedback::Good => write!(f, "Good"),
            Feedback::NeedsImprovement => write!(f, "Needs improvement"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Score {
    pub correct: usize,
    pub total: usize,
}

impl Score {
    /// `100 * correct / total`, or 0 for an empty quiz.
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        100.0 * self.correct as f64 / self.total as f64
    }

    pub fn feedback(&self) -> Feedback {
        let pct = self.percentage();
        if pct >= 80.0 {
            Feedback::Excellent
        } else if pct >= 60.0 {
            Feedback::Good
        } else {
            Feedback::NeedsImprovement
        }
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {} ({:.0}%)", self.correct, self.total, self.percentage())
    }
}

/// Outcome for one question after submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionReview<'a> {
    pub index: usize,
    pub question: &'a QuestionRecord,
    pub selected: &'a str,
    pub is_correct: bool,
}

#[derive(Debug, Clone, Default)]
pub struct QuizSession {
    questions: Option<QuestionSet>,
    answers: AnswerMap,
    phase: Phase,
}

impl QuizSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn question_set(&self) -> Option<&QuestionSet> {
        self.questions.as_ref()
    }

    pub fn answers(&self) -> &AnswerMap {
        &self.answers
    }

    /// Number of questions in the active set, 0 when idle.
    pub fn len(&self) -> usize {
        self.questions.as_ref().map_or(0, QuestionSet::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Install a fresh question set from any phase. Previous answers are dropped.
    pub fn load(&mut self, questions: QuestionSet) {
        info!(count = questions.len(), previous = %self.phase, "Loading question set");
        self.questions = Some(questions);
        self.answers.clear();
        self.phase = Phase::Answering;
    }

    /// Record (or overwrite) the selected label for a question.
    pub fn select_answer(&mut self, index: usize, label: impl Into<String>) -> Result<(), QuizError> {
        self.require(Phase::Answering, "select an answer")?;
        let label = label.into();

        let valid = self
            .questions
            .as_ref()
            .and_then(|set| set.get(index))
            .is_some_and(|q| q.has_label(&label));
        if !valid {
            return Err(QuizError::InvalidSelection { index, label });
        }

        debug!(index, label = %label, "Answer selected");
        self.answers.upsert(index, label);
        Ok(())
    }

    /// Indices of questions that still have no selected answer.
    pub fn unanswered(&self) -> Vec<usize> {
        (0..self.len()).filter(|i| !self.answers.contains(*i)).collect()
    }

    /// Lock the answers. Fails without changing phase if any question is unanswered.
    pub fn submit(&mut self) -> Result<(), QuizError> {
        self.require(Phase::Answering, "submit")?;

        let missing = self.unanswered();
        if !missing.is_empty() {
            debug!(missing = missing.len(), "Submission blocked by unanswered questions");
            return Err(QuizError::IncompleteAnswers { missing });
        }

        self.phase = Phase::Submitted;
        info!(total = self.len(), "Quiz submitted");
        Ok(())
    }

    pub fn score(&self) -> Result<Score, QuizError> {
        self.require(Phase::Submitted, "score")?;

        let correct = self
            .questions
            .iter()
            .flat_map(QuestionSet::iter)
            .enumerate()
            .filter(|(i, q)| self.answers.get(*i) == Some(q.correct_label.as_str()))
            .count();

        Ok(Score { correct, total: self.len() })
    }

    /// Per-question results, in question order.
    pub fn review(&self) -> Result<Vec<QuestionReview<'_>>, QuizError> {
        self.require(Phase::Submitted, "review")?;

        let reviews = self
            .questions
            .iter()
            .flat_map(QuestionSet::iter)
            .enumerate()
            .filter_map(|(index, question)| {
                let selected = self.answers.get(index)?;
                Some(QuestionReview {
                    index,
                    question,
                    selected,
                    is_correct: selected == question.correct_label,
                })
            })
            .collect();
        Ok(reviews)
    }

    /// Discard the question set and answers from any phase.
    pub fn reset(&mut self) {
        debug!(previous = %self.phase, "Resetting session");
        self.questions = None;
        self.answers.clear();
        self.phase = Phase::Idle;
    }

    fn require(&self, phase: Phase, operation: &'static str) -> Result<(), QuizError> {
        if self.phase == phase {
            Ok(())
        } else {
            Err(QuizError::WrongPhase { operation, phase: self.phase })
        }
    }
}
