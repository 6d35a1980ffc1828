mod test_utils;

use exam_quiz::clients::{FlexibleClient, MockResponse};
use exam_quiz::{AIError, GeneratorConfig, Phase, QuizError, QuizGenerator, QuizSession};
use crate::test_utils::{fenced, mock_generator, single_question_set, FENCED_SINGLE, THREE_QUESTIONS};

#[tokio::test]
async fn generates_question_set_from_fenced_reply() {
    let (generator, handle) = mock_generator(vec![MockResponse::Success(fenced(THREE_QUESTIONS))]);

    let set = generator.generate("membrane notes", "1. PYQ one").await.unwrap();
    assert_eq!(set.len(), 3);
    assert_eq!(handle.call_count(), 1);
}

#[tokio::test]
async fn prompt_carries_inputs_verbatim() {
    let (generator, handle) = mock_generator(vec![MockResponse::Success(FENCED_SINGLE.to_string())]);

    let notes = "• Cardiolipin – inner mitochondrial membrane";
    let pyqs = "1. Glycophorin spans membrane how many times? (DEC 2015)";
    generator.generate(notes, pyqs).await.unwrap();

    let prompts = handle.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains(notes));
    assert!(prompts[0].contains(pyqs));
    assert!(prompts[0].contains("exactly 3 NEW MCQs"));
}

#[tokio::test]
async fn generate_into_loads_the_session() {
    let (generator, _handle) = mock_generator(vec![MockResponse::Success(THREE_QUESTIONS.to_string())]);
    let mut session = QuizSession::new();

    let count = generator.generate_into(&mut session, "n", "p").await.unwrap();
    assert_eq!(count, 3);
    assert_eq!(session.phase(), Phase::Answering);
    assert!(session.answers().is_empty());
}

#[tokio::test]
async fn service_failure_leaves_session_untouched() {
    let (generator, _handle) = mock_generator(vec![MockResponse::Failure("connection reset".to_string())]);
    let mut session = QuizSession::new();
    session.load(single_question_set());
    session.select_answer(0, "B").unwrap();

    let err = generator.generate_into(&mut session, "n", "p").await.unwrap_err();
    assert!(matches!(err, QuizError::GenerationFailed(AIError::Mock(_))));
    assert_eq!(session.phase(), Phase::Answering);
    assert_eq!(session.answers().get(0), Some("B"));
    assert_eq!(session.question_set(), Some(&single_question_set()));
}

#[tokio::test]
async fn malformed_reply_leaves_idle_session_idle() {
    let (generator, _handle) =
        mock_generator(vec![MockResponse::Success("Here are three great questions!".to_string())]);
    let mut session = QuizSession::new();

    let err = generator.generate_into(&mut session, "n", "p").await.unwrap_err();
    assert!(matches!(err, QuizError::MalformedResponse { .. }));
    assert_eq!(session.phase(), Phase::Idle);
    assert!(session.question_set().is_none());
}

#[tokio::test]
async fn blank_reply_is_a_generation_failure() {
    let (generator, _handle) = mock_generator(vec![MockResponse::Success("  \n".to_string())]);

    let err = generator.generate("n", "p").await.unwrap_err();
    assert!(matches!(err, QuizError::GenerationFailed(AIError::EmptyResponse)));
}

#[tokio::test]
async fn count_mismatch_is_accepted() {
    let (client, handle) = FlexibleClient::mock();
    handle.add_response(MockResponse::Success(FENCED_SINGLE.to_string()));
    let generator = QuizGenerator::new(client, GeneratorConfig::default().with_question_count(10));

    let set = generator.generate("n", "p").await.unwrap();
    assert_eq!(set.len(), 1);
    assert!(handle.prompts()[0].contains("exactly 10 NEW MCQs"));
}

#[tokio::test]
async fn retry_is_left_to_the_caller() {
    let (generator, handle) = mock_generator(vec![
        MockResponse::Failure("timeout".to_string()),
        MockResponse::Success(FENCED_SINGLE.to_string()),
    ]);
    let mut session = QuizSession::new();

    assert!(generator.generate_into(&mut session, "n", "p").await.is_err());
    assert_eq!(handle.call_count(), 1);

    generator.generate_into(&mut session, "n", "p").await.unwrap();
    assert_eq!(session.len(), 1);
    assert_eq!(handle.call_count(), 2);
}

#[tokio::test]
async fn transcripts_are_written_per_generation() {
    let dir = std::env::temp_dir().join(format!("exam_quiz_transcripts_{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);

    let (client, handle) = FlexibleClient::mock();
    handle.add_response(MockResponse::Success(FENCED_SINGLE.to_string()));
    let generator = QuizGenerator::new(client, GeneratorConfig::default().with_transcript_dir(&dir));
    generator.generate("transcript notes", "p").await.unwrap();

    let files: Vec<_> = std::fs::read_dir(&dir).unwrap().filter_map(Result::ok).collect();
    assert_eq!(files.len(), 1);
    let content = std::fs::read_to_string(files[0].path()).unwrap();
    assert!(content.starts_with("# Prompt"));
    assert!(content.contains("transcript notes"));
    assert!(content.contains("# Response"));

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn demo_mock_supports_offline_runs() {
    let generator = QuizGenerator::new(exam_quiz::clients::MockClient::demo(), GeneratorConfig::default());
    let set = generator.generate("n", "p").await.unwrap();
    assert_eq!(set.len(), 3);
    assert_eq!(set.get(0).unwrap().correct_label, "B");
}

#[tokio::test]
async fn generates_for_catalog_unit() {
    let (generator, handle) = mock_generator(vec![MockResponse::Success(THREE_QUESTIONS.to_string())]);
    let catalog = exam_quiz::UnitCatalog::builtin();
    let unit = catalog.get("Cell Signaling").unwrap();

    let set = generator.generate_for_unit(unit).await.unwrap();
    assert_eq!(set.len(), 3);
    assert!(handle.prompts()[0].contains("Cholera toxin modifies which G protein subunit?"));
}
