//! Plain-text rendering of session state for terminal front ends.

use std::fmt::Write;

use crate::error::QuizError;
use crate::question::QuestionRecord;
use crate::session::{Phase, QuizSession};

/// One question with its lettered options; the selected option is marked `*`.
pub fn question(index: usize, question: &QuestionRecord, selected: Option<&str>) -> String {
    let mut out = format!("Q{}. {}\n", index + 1, question.prompt);
    for option in &question.options {
        let marker = if selected == Some(option.label.as_str()) { '*' } else { ' ' };
        let _ = writeln!(out, "  {} {}. {}", marker, option.label, option.text);
    }
    out
}

/// Every question of an answering session, separated by rules.
pub fn quiz(session: &QuizSession) -> String {
    let Some(set) = session.question_set() else {
        return "No quiz loaded.\n".to_string();
    };
    if set.is_empty() {
        return "The generated quiz has no questions.\n".to_string();
    }

    let mut out = String::new();
    for (i, q) in set.iter().enumerate() {
        out.push_str("---\n");
        out.push_str(&question(i, q, session.answers().get(i)));
    }
    out.push_str("---\n");
    out
}

/// Per-question verdicts with explanations, then the score line.
pub fn results(session: &QuizSession) -> Result<String, QuizError> {
    let score = session.score()?;
    let mut out = String::new();

    for review in session.review()? {
        let q = review.question;
        let _ = writeln!(out, "Q{}. {}", review.index + 1, q.prompt);
        if review.is_correct {
            let _ = writeln!(out, "  Correct");
        } else {
            let _ = writeln!(out, "  Wrong (you chose {})", review.selected);
            let _ = writeln!(out, "  Correct answer: {}", q.correct_label);
        }
        let _ = writeln!(out, "  {}", q.explanation);
    }

    let _ = writeln!(out, "\nScore: {} - {}", score, score.feedback());
    Ok(out)
}

/// Short status line for prompts.
pub fn status(session: &QuizSession) -> String {
    match session.phase() {
        Phase::Idle => "idle".to_string(),
        Phase::Answering => format!("answered {}/{}", session.answers().len(), session.len()),
        Phase::Submitted => "submitted".to_string(),
    }
}

/// Warning shown when submission is blocked; question numbers are 1-based.
pub fn incomplete_warning(missing: &[usize]) -> String {
    let numbers: Vec<String> = missing.iter().map(|i| format!("Q{}", i + 1)).collect();
    format!("Please answer all questions before submitting. Unanswered: {}", numbers.join(", "))
}
