use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use quiz_core::model::{Profile, Verdict};
use quiz_core::time::fixed_clock;
use services::{
    CachedQuestionSource, CompletionClient, CompletionError, GeneratedQuestionSource,
    GenerationFailure, ParseError, QuestionSource, QuestionSourceError, QuizService,
    QuizServiceError,
};

/// Replays canned generator replies and records the prompts it was sent.
struct ScriptedClient {
    replies: Mutex<VecDeque<Result<String, CompletionError>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedClient {
    fn new(replies: impl IntoIterator<Item = Result<String, CompletionError>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into_iter().collect()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(CompletionError::EmptyResponse))
    }
}

fn item(n: usize) -> String {
    format!(
        r#"{{"question":"Question {n}?","options":["a{n}","b{n}","c{n}","d{n}"],"answer":"b{n}","subject":"Science","explanation":"Because b."}}"#
    )
}

fn reply(count: usize) -> String {
    let items: Vec<String> = (0..count).map(item).collect();
    format!("```json\n{{\"questions\": [{}]}}\n```", items.join(","))
}

fn profile() -> Profile {
    Profile::new(8, ["dogs", "space"]).unwrap()
}

#[tokio::test]
async fn generated_quiz_runs_to_a_score() {
    let client = ScriptedClient::new([Ok(reply(10))]);
    let source = Arc::new(GeneratedQuestionSource::new(client.clone()));
    let service = QuizService::new(fixed_clock(), source);

    let mut session = service.start(profile()).await.unwrap();
    assert_eq!(session.total(), 10);
    assert_eq!(client.calls(), 1);
    assert!(client.prompts.lock().unwrap()[0].contains("dogs, space"));

    for i in 0..10 {
        assert!(!session.is_finished());
        let choice = if i % 2 == 0 {
            format!("b{i}")
        } else {
            format!("a{i}")
        };
        service.submit_answer(&mut session, i, &choice).unwrap();
    }

    assert!(session.is_finished());
    assert_eq!(session.score(), 5);
    let review = session.review();
    assert_eq!(review[0].verdict, Verdict::Correct);
    assert_eq!(review[1].verdict, Verdict::Incorrect);
    assert_eq!(review[1].question.explanation(), Some("Because b."));
}

#[tokio::test]
async fn surplus_questions_are_truncated_to_the_requested_count() {
    let client = ScriptedClient::new([Ok(reply(12))]);
    let source = GeneratedQuestionSource::new(client);
    let questions = source.fetch(&profile(), 10).await.unwrap();
    assert_eq!(questions.len(), 10);
}

#[tokio::test]
async fn invalid_items_are_dropped_and_survivors_returned() {
    let text = format!(
        r#"[{}, {{"question":"bad","options":["x","y"],"answer":"x","subject":"S"}}, {}]"#,
        item(0),
        item(1)
    );
    let client = ScriptedClient::new([Ok(text)]);
    let source = GeneratedQuestionSource::new(client);
    let questions = source.fetch(&profile(), 10).await.unwrap();
    assert_eq!(questions.len(), 2);
    assert_eq!(questions[1].prompt(), "Question 1?");
}

#[tokio::test]
async fn all_items_invalid_is_an_empty_result() {
    let text = r#"[{"question":"bad","options":["x","y","z","w"],"answer":"v","subject":"S"}]"#;
    let client = ScriptedClient::new([Ok(text.to_string())]);
    let service = QuizService::new(fixed_clock(), Arc::new(GeneratedQuestionSource::new(client)));

    let err = service.start(profile()).await.unwrap_err();
    assert!(matches!(
        err,
        QuizServiceError::Source(QuestionSourceError::EmptyResult)
    ));
}

#[tokio::test]
async fn transport_and_parse_failures_are_generation_failures() {
    let client = ScriptedClient::new([
        Err(CompletionError::HttpStatus(reqwest::StatusCode::SERVICE_UNAVAILABLE)),
        Ok("I cannot help with that.".to_string()),
    ]);
    let source = GeneratedQuestionSource::new(client.clone());

    let err = source.fetch(&profile(), 10).await.unwrap_err();
    assert!(matches!(
        err,
        QuestionSourceError::GenerationFailed(GenerationFailure::Completion(
            CompletionError::HttpStatus(_)
        ))
    ));

    let err = source.fetch(&profile(), 10).await.unwrap_err();
    assert!(matches!(
        err,
        QuestionSourceError::GenerationFailed(GenerationFailure::Parse(ParseError::NoJson))
    ));
    assert_eq!(client.calls(), 2);
}

#[tokio::test]
async fn failed_regeneration_leaves_session_untouched() {
    let client = ScriptedClient::new([Ok(reply(3)), Err(CompletionError::EmptyResponse)]);
    let service = QuizService::new(
        fixed_clock(),
        Arc::new(GeneratedQuestionSource::new(client.clone())),
    );

    let mut session = service.start(profile()).await.unwrap();
    service.submit_answer(&mut session, 0, "b0").unwrap();
    let before = session.questions().to_vec();

    let err = service.restart(&mut session, true).await.unwrap_err();
    assert!(matches!(err, QuizServiceError::Source(_)));
    assert_eq!(session.questions(), before.as_slice());
    assert_eq!(session.current_index(), 1);
    assert_eq!(session.answer(0), Some("b0"));
    assert_eq!(client.calls(), 2);
}

#[tokio::test]
async fn regenerate_restart_fetches_fresh_questions() {
    let fresh = format!("[{}]", item(7));
    let client = ScriptedClient::new([Ok(reply(2)), Ok(fresh)]);
    let service = QuizService::new(
        fixed_clock(),
        Arc::new(GeneratedQuestionSource::new(client.clone())),
    );

    let mut session = service.start(profile()).await.unwrap();
    service.submit_answer(&mut session, 0, "b0").unwrap();
    service.restart(&mut session, true).await.unwrap();

    assert_eq!(session.total(), 1);
    assert_eq!(session.questions()[0].prompt(), "Question 7?");
    assert_eq!(session.current_index(), 0);
    assert_eq!(session.score(), 0);
}

#[tokio::test]
async fn cached_generator_calls_out_once_per_profile() {
    let client = ScriptedClient::new([Ok(reply(10)), Ok(reply(10))]);
    let cached = Arc::new(CachedQuestionSource::new(Arc::new(
        GeneratedQuestionSource::new(client.clone()),
    )));
    let service = QuizService::new(fixed_clock(), cached);

    let first = service.start(profile()).await.unwrap();
    let second = service.start(profile()).await.unwrap();
    assert_eq!(first.questions(), second.questions());
    assert_ne!(first.id(), second.id());
    assert_eq!(client.calls(), 1);
}

#[tokio::test]
async fn regenerating_with_a_cache_reaches_the_generator() {
    let fresh = format!("[{}]", item(7));
    let client = ScriptedClient::new([Ok(reply(2)), Ok(fresh)]);
    let cached = Arc::new(CachedQuestionSource::new(Arc::new(
        GeneratedQuestionSource::new(client.clone()),
    )));
    let service = QuizService::new(fixed_clock(), cached);

    let mut session = service.start(profile()).await.unwrap();
    assert_eq!(session.questions()[0].prompt(), "Question 0?");

    service.restart(&mut session, true).await.unwrap();
    assert_eq!(session.questions()[0].prompt(), "Question 7?");
    assert_eq!(client.calls(), 2);

    // The regenerated list replaces the cached one for later starts.
    let next = service.start(profile()).await.unwrap();
    assert_eq!(next.questions()[0].prompt(), "Question 7?");
    assert_eq!(client.calls(), 2);
}
