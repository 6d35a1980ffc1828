//! Prompt construction for exam-pattern question generation.

use schemars::schema_for;

use crate::question::QuestionRecord;

const ROLE: &str = "You are a university-level exam paper setter (MSc / NET standard). \
You produce exam-pattern multiple-choice questions for an advanced academic audience.";

const OUTPUT_EXAMPLE: &str = r#"[
  {
    "question": "Question text",
    "options": {
      "A": "Option A",
      "B": "Option B",
      "C": "Option C",
      "D": "Option D"
    },
    "correct": "A",
    "explanation": "Short explanation"
  }
]"#;

/// Builds the generation prompt. Inputs are embedded verbatim with no length
/// checks.
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder {
    schema_guidance: bool,
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a JSON Schema of the question array after the template.
    #[must_use]
    pub fn with_schema_guidance(mut self, enabled: bool) -> Self {
        self.schema_guidance = enabled;
        self
    }

    pub fn build(&self, notes: &str, prior_questions: &str, count: usize) -> String {
        let prompt = format!(
            "{ROLE}

TASK:
1. Analyze the PYQs to understand difficulty & pattern.
2. Generate exactly {count} NEW MCQs from the NOTES matching the SAME pattern.

RULES:
- Application-based, exam-oriented
- One correct option only
- Do NOT repeat PYQs
- Output ONLY valid JSON (no markdown)

PYQs:
{prior_questions}

NOTES:
{notes}

OUTPUT FORMAT:
{OUTPUT_EXAMPLE}
"
        );

        if self.schema_guidance {
            add_schema_guidance(prompt)
        } else {
            prompt
        }
    }
}

fn add_schema_guidance(prompt: String) -> String {
    let schema = schema_for!(Vec<QuestionRecord>);
    let schema_json = serde_json::to_string_pretty(&schema)
        .unwrap_or_else(|_| "Schema serialization failed".to_string());

    format!(
        "{}\n## Response Format\nThe JSON array must match this schema:\n{}\n",
        prompt, schema_json
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_guidance_describes_wire_fields() {
        let prompt = PromptBuilder::new().with_schema_guidance(true).build("n", "p", 3);
        assert!(prompt.contains("## Response Format"));
        assert!(prompt.contains("\"correct\""));
        assert!(prompt.contains("\"explanation\""));
    }

    #[test]
    fn schema_guidance_off_by_default() {
        let prompt = PromptBuilder::new().build("n", "p", 3);
        assert!(!prompt.contains("## Response Format"));
    }
}
