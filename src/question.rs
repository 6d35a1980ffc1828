//! Question records as exchanged with the completion service.
//!
//! The wire grammar is a JSON array of objects:
//!
//! ```json
//! [{"question": "...", "options": {"A": "...", "B": "..."}, "correct": "A", "explanation": "..."}]
//! ```
//!
//! Option order is significant and is kept exactly as received.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A single labelled choice of a multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOption {
    pub label: String,
    pub text: String,
}

/// One generated multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[schemars(title = "Exam Question", description = "A single multiple-choice exam question")]
pub struct QuestionRecord {
    /// Question text
    #[serde(rename = "question")]
    #[schemars(description = "The question text")]
    pub prompt: String,
    /// Options keyed by label, in presentation order
    #[serde(with = "ordered_options")]
    #[schemars(
        with = "std::collections::BTreeMap<String, String>",
        description = "Answer options keyed by single-letter label (A-D)"
    )]
    pub options: Vec<AnswerOption>,
    /// Label of the only correct option
    #[serde(rename = "correct")]
    #[schemars(description = "Label of the single correct option")]
    pub correct_label: String,
    #[schemars(description = "Short explanation of the correct answer")]
    pub explanation: String,
}

impl QuestionRecord {
    pub fn option(&self, label: &str) -> Option<&AnswerOption> {
        self.options.iter().find(|o| o.label == label)
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.option(label).is_some()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.options.iter().map(|o| o.label.as_str())
    }

    /// Checks the structural invariants that serde alone cannot express.
    pub(crate) fn validate(&self) -> Result<(), String> {
        if self.options.len() < 2 {
            return Err(format!("expected at least two options, found {}", self.options.len()));
        }
        if self.options.iter().any(|o| o.label.trim().is_empty()) {
            return Err("option labels must not be empty".to_string());
        }
        if !self.has_label(&self.correct_label) {
            return Err(format!(
                "correct label {:?} is not one of the options {:?}",
                self.correct_label,
                self.labels().collect::<Vec<_>>()
            ));
        }
        Ok(())
    }
}

/// Ordered, immutable sequence of questions produced by one generation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionSet {
    questions: Vec<QuestionRecord>,
}

impl QuestionSet {
    /// Build a set from records that already satisfy the record invariants.
    pub fn new(questions: Vec<QuestionRecord>) -> Result<Self, String> {
        for (i, q) in questions.iter().enumerate() {
            q.validate().map_err(|e| format!("question {}: {}", i, e))?;
        }
        Ok(Self { questions })
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&QuestionRecord> {
        self.questions.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, QuestionRecord> {
        self.questions.iter()
    }

    pub fn questions(&self) -> &[QuestionRecord] {
        &self.questions
    }

    /// Serialize back into the wire grammar.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.questions)
    }
}

impl<'a> IntoIterator for &'a QuestionSet {
    type Item = &'a QuestionRecord;
    type IntoIter = std::slice::Iter<'a, QuestionRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.questions.iter()
    }
}

/// Serde adapter mapping a JSON object onto `Vec<AnswerOption>` without
/// losing key order. Duplicate labels are rejected.
mod ordered_options {
    use super::AnswerOption;
    use serde::de::{self, MapAccess, Visitor};
    use serde::ser::SerializeMap;
    use serde::{Deserializer, Serializer};
    use std::fmt;

    pub fn serialize<S>(options: &[AnswerOption], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(options.len()))?;
        for option in options {
            map.serialize_entry(&option.label, &option.text)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<AnswerOption>, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(OptionsVisitor)
    }

    struct OptionsVisitor;

    impl<'de> Visitor<'de> for OptionsVisitor {
        type Value = Vec<AnswerOption>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("an object mapping option labels to option text")
        }

        fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut options: Vec<AnswerOption> = Vec::with_capacity(access.size_hint().unwrap_or(4));
            while let Some((label, text)) = access.next_entry::<String, String>()? {
                if options.iter().any(|o| o.label == label) {
                    return Err(de::Error::custom(format!("duplicate option label {:?}", label)));
                }
                options.push(AnswerOption { label, text });
            }
            Ok(options)
        }
    }
}
