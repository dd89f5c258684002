// tests/controller_test.rs — Integration test: turns with a mock completion service

use std::sync::Mutex;

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

use professor::infra::errors::ProfessorError;
use professor::provider::CompletionService;
use professor::session::codec;
use professor::session::{Message, Role, SessionController, SessionStore};

/// A mock service that replays canned outcomes and records what it was sent.
struct MockService {
    replies: Mutex<Vec<Result<Message, ProfessorError>>>,
    seen: Mutex<Vec<(Vec<Message>, String)>>,
}

impl MockService {
    fn new(replies: Vec<Result<Message, ProfessorError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().rev().collect()),
            seen: Mutex::new(Vec::new()),
        }
    }

    fn answering(texts: &[&str]) -> Self {
        Self::new(
            texts
                .iter()
                .map(|t| Ok(Message::assistant(*t).unwrap()))
                .collect(),
        )
    }

    fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

#[async_trait]
impl CompletionService for MockService {
    fn id(&self) -> &str {
        "mock"
    }

    async fn complete(
        &self,
        history: &[Message],
        system_prompt: &str,
    ) -> Result<Message, ProfessorError> {
        self.seen
            .lock()
            .unwrap()
            .push((history.to_vec(), system_prompt.to_string()));
        self.replies.lock().unwrap().pop().unwrap_or_else(|| {
            Err(ProfessorError::Completion {
                provider: "mock".into(),
                message: "no more canned replies".into(),
            })
        })
    }
}

const PROMPT: &str = "You are a patient tutor.";

#[tokio::test]
async fn test_turn_sends_history_and_records_exchange() {
    let dir = TempDir::new().unwrap();
    let mut store = SessionStore::open(dir.path()).unwrap();
    let service = MockService::answering(&["A set that spans.", "Yes, exactly."]);
    let controller = SessionController::new(&service, PROMPT);

    let id = store.create("Linear algebra");
    let reply = controller.turn(&mut store, "What is a basis?").await.unwrap();
    assert_eq!(reply.content(), "A set that spans.");

    controller
        .turn(&mut store, "So it must be independent?")
        .await
        .unwrap();

    let seen = service.seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0].0, vec![Message::user("What is a basis?").unwrap()]);
    assert_eq!(seen[0].1, PROMPT);
    // Second call carries the full prior transcript plus the new turn.
    let second: Vec<&str> = seen[1].0.iter().map(|m| m.content()).collect();
    assert_eq!(
        second,
        vec![
            "What is a basis?",
            "A set that spans.",
            "So it must be independent?"
        ]
    );

    let raw = std::fs::read(dir.path().join(id.file_name())).unwrap();
    let record = codec::decode(&raw).unwrap();
    assert_eq!(record.messages.len(), 4);
    assert_eq!(record.messages[3], Message::assistant("Yes, exactly.").unwrap());
}

#[tokio::test]
async fn test_turn_without_selection_never_calls_service() {
    let dir = TempDir::new().unwrap();
    let mut store = SessionStore::open(dir.path()).unwrap();
    let service = MockService::answering(&["unused"]);
    let controller = SessionController::new(&service, PROMPT);

    let err = controller.turn(&mut store, "hello?").await.unwrap_err();
    assert!(matches!(err, ProfessorError::NoSelection));
    assert_eq!(service.calls(), 0);
}

#[tokio::test]
async fn test_turn_empty_input_never_calls_service() {
    let dir = TempDir::new().unwrap();
    let mut store = SessionStore::open(dir.path()).unwrap();
    let service = MockService::answering(&["unused"]);
    let controller = SessionController::new(&service, PROMPT);
    store.create("Quiet");

    let err = controller.turn(&mut store, "").await.unwrap_err();
    assert!(matches!(err, ProfessorError::EmptyContent { role: Role::User }));
    assert_eq!(service.calls(), 0);
}

#[tokio::test]
async fn test_completion_failure_leaves_store_untouched_and_is_retriable() {
    let dir = TempDir::new().unwrap();
    let mut store = SessionStore::open(dir.path()).unwrap();
    let service = MockService::new(vec![
        Err(ProfessorError::Completion {
            provider: "mock".into(),
            message: "HTTP 529: overloaded".into(),
        }),
        Ok(Message::assistant("Back online.").unwrap()),
    ]);
    let controller = SessionController::new(&service, PROMPT);
    store.create("Flaky");

    let err = controller.turn(&mut store, "Are you there?").await.unwrap_err();
    assert!(err.is_retriable_completion());
    assert!(store.selected_messages().is_empty());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);

    // Same input, second attempt.
    controller.turn(&mut store, "Are you there?").await.unwrap();
    let contents: Vec<&str> = store
        .selected_messages()
        .iter()
        .map(|m| m.content())
        .collect();
    assert_eq!(contents, vec!["Are you there?", "Back online."]);
}

#[tokio::test]
async fn test_non_assistant_reply_is_completion_error() {
    let dir = TempDir::new().unwrap();
    let mut store = SessionStore::open(dir.path()).unwrap();
    let service = MockService::new(vec![Ok(Message::new(Role::Tool, "rm -rf").unwrap())]);
    let controller = SessionController::new(&service, PROMPT);
    store.create("Odd");

    let err = controller.turn(&mut store, "hi").await.unwrap_err();
    assert!(matches!(err, ProfessorError::Completion { .. }));
    assert!(store.selected_messages().is_empty());
}

#[tokio::test]
async fn test_persist_failure_after_completion() {
    let dir = TempDir::new().unwrap();
    let sessions_dir = dir.path().join("sessions");
    let mut store = SessionStore::open(&sessions_dir).unwrap();
    let service = MockService::answering(&["Delivered."]);
    let controller = SessionController::new(&service, PROMPT);
    store.create("Disk trouble");

    std::fs::remove_dir_all(&sessions_dir).unwrap();
    let err = controller.turn(&mut store, "Save me").await.unwrap_err();
    assert!(err.is_retriable_persist());
    assert_eq!(store.selected_messages().len(), 2);
    assert_eq!(service.calls(), 1);

    std::fs::create_dir_all(&sessions_dir).unwrap();
    store.persist_selected().unwrap();
    assert_eq!(service.calls(), 1);
}
