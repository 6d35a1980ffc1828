#![allow(dead_code)]

use std::sync::Arc;

use exam_quiz::clients::{MockClient, MockHandle, MockResponse};
use exam_quiz::{parser, GeneratorConfig, QuestionSet, QuizGenerator};

/// Three questions whose correct labels are B, A, D.
pub const THREE_QUESTIONS: &str = r#"[
  {"question": "Q1", "options": {"A": "a1", "B": "b1", "C": "c1", "D": "d1"}, "correct": "B", "explanation": "e1"},
  {"question": "Q2", "options": {"A": "a2", "B": "b2", "C": "c2", "D": "d2"}, "correct": "A", "explanation": "e2"},
  {"question": "Q3", "options": {"A": "a3", "B": "b3", "C": "c3", "D": "d3"}, "correct": "D", "explanation": "e3"}
]"#;

pub const FENCED_SINGLE: &str =
    "```json\n[{\"question\":\"Q\",\"options\":{\"A\":\"x\",\"B\":\"y\"},\"correct\":\"A\",\"explanation\":\"e\"}]\n```";

pub fn fenced(body: &str) -> String {
    format!("```json\n{}\n```", body)
}

pub fn three_question_set() -> QuestionSet {
    parser::parse(THREE_QUESTIONS).expect("fixture parses")
}

pub fn single_question_set() -> QuestionSet {
    parser::parse(FENCED_SINGLE).expect("fixture parses")
}

/// Generator backed by a mock that replays `responses` in order.
pub fn mock_generator(responses: Vec<MockResponse>) -> (QuizGenerator<MockClient>, Arc<MockHandle>) {
    let (client, handle) = MockClient::with_responses(responses);
    (QuizGenerator::new(client, GeneratorConfig::default()), handle)
}
