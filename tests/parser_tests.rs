mod test_utils;

use exam_quiz::parser::{parse, strip_code_fences};
use exam_quiz::QuizError;
use crate::test_utils::{fenced, FENCED_SINGLE, THREE_QUESTIONS};

fn assert_malformed(raw: &str) {
    match parse(raw) {
        Err(QuizError::MalformedResponse { raw: kept, .. }) => assert_eq!(kept, raw),
        other => panic!("expected MalformedResponse, got {:?}", other),
    }
}

#[test]
fn fenced_single_question() {
    let set = parse(FENCED_SINGLE).unwrap();
    assert_eq!(set.len(), 1);
    let q = set.get(0).unwrap();
    assert_eq!(q.prompt, "Q");
    assert_eq!(q.correct_label, "A");
    assert_eq!(q.explanation, "e");
    assert_eq!(q.labels().collect::<Vec<_>>(), ["A", "B"]);
}

#[test]
fn bare_array_without_fences() {
    let set = parse(THREE_QUESTIONS).unwrap();
    let correct: Vec<&str> = set.iter().map(|q| q.correct_label.as_str()).collect();
    assert_eq!(correct, ["B", "A", "D"]);
}

#[test]
fn fences_and_whitespace_are_stripped_anywhere() {
    assert_eq!(strip_code_fences("  ```json\n[1]\n```  \n"), "[1]");
    assert_eq!(strip_code_fences("```\n[]\n```"), "[]");
    assert_eq!(strip_code_fences("[]"), "[]");
}

#[test]
fn option_order_is_preserved_as_received() {
    let raw = r#"[{"question":"Q","options":{"D":"d","B":"b","A":"a","C":"c"},"correct":"C","explanation":"e"}]"#;
    let set = parse(raw).unwrap();
    assert_eq!(set.get(0).unwrap().labels().collect::<Vec<_>>(), ["D", "B", "A", "C"]);
}

#[test]
fn reserialization_keeps_labels_and_order() {
    let raw = r#"[{"question":"Q","options":{"C":"c","A":"a","B":"b"},"correct":"A","explanation":"e"}]"#;
    let set = parse(raw).unwrap();
    let json = set.to_json().unwrap();

    let c = json.find("\"C\"").unwrap();
    let a = json.find("\"A\": \"a\"").unwrap();
    let b = json.find("\"B\"").unwrap();
    assert!(c < a && a < b, "order changed: {}", json);

    let again = parse(&json).unwrap();
    assert_eq!(again, set);
}

#[test]
fn empty_array_is_accepted() {
    let set = parse("```json\n[]\n```").unwrap();
    assert!(set.is_empty());
}

#[test]
fn rejects_non_json() {
    assert_malformed("Sure! Here are your questions.");
    assert_malformed("[{\"question\": \"Q\",");
}

#[test]
fn rejects_object_instead_of_array() {
    assert_malformed(r#"{"question":"Q","options":{"A":"x","B":"y"},"correct":"A","explanation":"e"}"#);
}

#[test]
fn rejects_element_missing_correct() {
    assert_malformed(r#"[{"question":"Q","options":{"A":"x","B":"y"},"explanation":"e"}]"#);
}

#[test]
fn rejects_element_missing_explanation() {
    assert_malformed(&fenced(r#"[{"question":"Q","options":{"A":"x","B":"y"},"correct":"A"}]"#));
}

#[test]
fn rejects_correct_label_outside_options() {
    assert_malformed(r#"[{"question":"Q","options":{"A":"x","B":"y"},"correct":"E","explanation":"e"}]"#);
}

#[test]
fn rejects_single_option() {
    assert_malformed(r#"[{"question":"Q","options":{"A":"x"},"correct":"A","explanation":"e"}]"#);
}

#[test]
fn rejects_duplicate_option_labels() {
    assert_malformed(r#"[{"question":"Q","options":{"A":"x","A":"y","B":"z"},"correct":"A","explanation":"e"}]"#);
}

#[test]
fn rejects_non_string_option_text() {
    assert_malformed(r#"[{"question":"Q","options":{"A":1,"B":2},"correct":"A","explanation":"e"}]"#);
}

#[test]
fn rejects_empty_option_label() {
    assert_malformed(r#"[{"question":"Q","options":{"":"x","B":"y"},"correct":"","explanation":"e"}]"#);
    assert_malformed(r#"[{"question":"Q","options":{" ":"x","B":"y"},"correct":"B","explanation":"e"}]"#);
}

#[test]
fn one_bad_element_rejects_the_whole_response() {
    let raw = r#"[
      {"question":"Q1","options":{"A":"x","B":"y"},"correct":"A","explanation":"e"},
      {"question":"Q2","options":{"A":"x","B":"y"},"correct":"Z","explanation":"e"}
    ]"#;
    match parse(raw) {
        Err(QuizError::MalformedResponse { reason, .. }) => assert!(reason.contains("question 1"), "{}", reason),
        other => panic!("expected MalformedResponse, got {:?}", other),
    }
}
