//! Decoding of raw completion text into a validated [`QuestionSet`].

use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::error::QuizError;
use crate::question::{QuestionRecord, QuestionSet};

const FENCE: &str = "```";
const JSON_FENCE: &str = "```json";

/// Remove markdown code-fence markers wherever they occur and trim the result.
///
/// Models asked for bare JSON still wrap it in ```` ```json ```` fences often
/// enough that this runs unconditionally.
pub fn strip_code_fences(raw: &str) -> String {
    raw.replace(JSON_FENCE, "").replace(FENCE, "").trim().to_string()
}

/// Parse a completion into a question set. All-or-nothing: any element that
/// does not match the grammar rejects the whole response.
#[instrument(target = "exam_quiz::parser", skip(raw), fields(raw_len = raw.len()))]
pub fn parse(raw: &str) -> Result<QuestionSet, QuizError> {
    let cleaned = strip_code_fences(raw);

    let value: Value = serde_json::from_str(&cleaned).map_err(|e| {
        warn!(error = %e, "Response is not valid JSON");
        QuizError::malformed(format!("invalid JSON: {}", e), raw)
    })?;

    if !value.is_array() {
        return Err(QuizError::malformed(
            format!("expected a JSON array, found {}", json_kind(&value)),
            raw,
        ));
    }

    // Decode from the text rather than the `Value` so option key order survives.
    let questions: Vec<QuestionRecord> = serde_json::from_str(&cleaned)
        .map_err(|e| QuizError::malformed(format!("question does not match the grammar: {}", e), raw))?;

    let set = QuestionSet::new(questions).map_err(|e| QuizError::malformed(e, raw))?;
    debug!(count = set.len(), "Decoded question set");
    Ok(set)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
