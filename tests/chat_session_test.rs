//! Integration tests for the chat session flow
//!
//! Drives `ChatCoordinator` and the WebSocket loop through the public API
//! with in-memory collaborators:
//! 1. Session start and ownership checks
//! 2. One response per message, in order
//! 3. Quota charged once per completed answer, never on failure

use async_trait::async_trait;
use axum::extract::ws::Message;
use bot_factory_backend::assistant::{AssistantGateway, GatewayError, Run, RunStatus};
use bot_factory_backend::chat::{ChatCoordinator, QuotaJobs};
use bot_factory_backend::error::AppError;
use bot_factory_backend::store::{ChatBot, ChatBotRepository, QuotaLedger};
use bot_factory_backend::websocket::run_session;
use futures_util::stream;
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;

/// Answers "Hi there!" unless the prompt says otherwise
struct ScriptedGateway {
    calls: Mutex<Vec<String>>,
    last_prompt: Mutex<String>,
}

impl ScriptedGateway {
    fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            last_prompt: Mutex::new(String::new()),
        }
    }

    fn record(&self, op: &str) {
        self.calls.lock().unwrap().push(op.to_string());
    }

    fn count(&self, op: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| *c == op).count()
    }
}

#[async_trait]
impl AssistantGateway for ScriptedGateway {
    async fn create_thread(&self) -> Result<String, GatewayError> {
        self.record("create_thread");
        Ok("thread_abc".to_string())
    }

    async fn add_message_to_thread(&self, _: &str, text: &str) -> Result<(), GatewayError> {
        self.record("add_message_to_thread");
        if text == "break" {
            return Err(GatewayError::Request("network error".to_string()));
        }
        *self.last_prompt.lock().unwrap() = text.to_string();
        Ok(())
    }

    async fn create_run(&self, _: &str, assistant_id: &str) -> Result<String, GatewayError> {
        self.record("create_run");
        assert_eq!(assistant_id, "asst_owned");
        Ok("run_1".to_string())
    }

    async fn get_run(&self, _: &str, run_id: &str) -> Result<Run, GatewayError> {
        self.record("get_run");
        Ok(Run {
            id: run_id.to_string(),
            status: RunStatus::Completed,
        })
    }

    async fn latest_assistant_response(&self, _: &str) -> Result<String, GatewayError> {
        self.record("latest_assistant_response");
        Ok(format!("echo: {}", self.last_prompt.lock().unwrap()))
    }

    async fn create_vector_store(&self, _: &str) -> Result<String, GatewayError> {
        unreachable!("not used by chat")
    }

    async fn create_assistant(&self, _: &str, _: &str, _: &str) -> Result<String, GatewayError> {
        unreachable!("not used by chat")
    }

    async fn delete_assistant(&self, _: &str) -> Result<(), GatewayError> {
        self.record("delete_assistant");
        Ok(())
    }

    async fn delete_vector_store(&self, _: &str) -> Result<(), GatewayError> {
        self.record("delete_vector_store");
        Err(GatewayError::Status {
            status: 500,
            body: "vector store busy".to_string(),
        })
    }

    async fn upload_file(&self, _: &str, _: Vec<u8>) -> Result<String, GatewayError> {
        unreachable!("not used by chat")
    }

    async fn add_vector_store_file(&self, _: &str, _: &str) -> Result<(), GatewayError> {
        unreachable!("not used by chat")
    }

    async fn delete_vector_store_file(&self, _: &str, _: &str) -> Result<(), GatewayError> {
        unreachable!("not used by chat")
    }

    async fn delete_file(&self, _: &str) -> Result<(), GatewayError> {
        unreachable!("not used by chat")
    }
}

/// A single chat-bot (id 1) owned by user 1
struct OneBot;

#[async_trait]
impl ChatBotRepository for OneBot {
    async fn chat_bot(&self, id: i64, owner_id: i64) -> Result<ChatBot, AppError> {
        if id == 1 && owner_id == 1 {
            Ok(ChatBot {
                id,
                assistant_id: "asst_owned".to_string(),
                vector_store_id: "vs_owned".to_string(),
                owner_id,
                name: "Helper".to_string(),
                description: String::new(),
                instructions: String::new(),
            })
        } else {
            Err(AppError::NotFound(format!("chat-bot {} does not exist", id)))
        }
    }

    async fn user_chat_bots(&self, _: i64) -> Result<Vec<ChatBot>, AppError> {
        Ok(Vec::new())
    }

    async fn save_chat_bot(&self, _: &ChatBot) -> Result<i64, AppError> {
        Ok(1)
    }

    async fn update_chat_bot(&self, _: i64, _: i64, _: &str, _: &str, _: &str) -> Result<(), AppError> {
        Ok(())
    }

    async fn remove_chat_bot(&self, _: i64, _: i64) -> Result<(), AppError> {
        Ok(())
    }
}

#[derive(Default)]
struct CountingLedger {
    charged: Mutex<Vec<i64>>,
}

#[async_trait]
impl QuotaLedger for CountingLedger {
    async fn decrement_messages_left(&self, user_id: i64) -> Result<(), AppError> {
        self.charged.lock().unwrap().push(user_id);
        Ok(())
    }
}

fn setup() -> (
    Arc<ChatCoordinator>,
    Arc<ScriptedGateway>,
    Arc<CountingLedger>,
    JoinHandle<()>,
) {
    let gateway = Arc::new(ScriptedGateway::new());
    let ledger = Arc::new(CountingLedger::default());
    let (quota, worker) = QuotaJobs::spawn(ledger.clone());
    let coordinator = Arc::new(ChatCoordinator::new(Arc::new(OneBot), gateway.clone(), quota));
    (coordinator, gateway, ledger, worker)
}

fn frame(s: &str) -> Result<Message, axum::Error> {
    Ok(Message::Text(s.to_string()))
}

#[tokio::test]
async fn test_session_over_websocket_loop() {
    let (coordinator, gateway, ledger, worker) = setup();

    let session = coordinator.start_session(1, 1).await.unwrap();
    assert_eq!(session.thread_id, "thread_abc");

    let inbound = stream::iter(vec![
        frame(r#"{"message":"Hello"}"#),
        frame(r#"{"message":"break"}"#),
        frame("{}"),
        frame(r#"{"message":"Bye"}"#),
        Ok(Message::Close(None)),
    ]);
    let mut sent: Vec<Message> = Vec::new();
    run_session(&mut sent, inbound, &coordinator, &session).await;

    let frames: Vec<serde_json::Value> = sent
        .into_iter()
        .map(|m| match m {
            Message::Text(t) => serde_json::from_str(&t).unwrap(),
            other => panic!("Expected text frame, got {:?}", other),
        })
        .collect();
    assert_eq!(
        frames,
        vec![
            serde_json::json!({"response": "echo: Hello"}),
            serde_json::json!({"error": "Could not retrieve chat-bot response"}),
            serde_json::json!({"error": "Invalid request format"}),
            serde_json::json!({"response": "echo: Bye"}),
        ]
    );

    drop(coordinator);
    worker.await.unwrap();

    // Two completed answers, two charges; the failed turn never ran a run
    assert_eq!(*ledger.charged.lock().unwrap(), vec![1, 1]);
    assert_eq!(gateway.count("create_run"), 2);
}

#[tokio::test]
async fn test_session_requires_ownership() {
    let (coordinator, gateway, _ledger, _worker) = setup();

    assert!(matches!(
        coordinator.start_session(1, 2).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        coordinator.start_session(0, 1).await,
        Err(AppError::Validation(_))
    ));
    assert_eq!(gateway.count("create_thread"), 0);
}

#[tokio::test]
async fn test_remove_bot_side_effects_surfaces_partial_failure() {
    let (coordinator, gateway, _ledger, _worker) = setup();

    let result = coordinator
        .remove_bot_side_effects("asst_owned", "vs_owned")
        .await;

    assert!(matches!(result, Err(AppError::Gateway(_))));
    assert_eq!(gateway.count("delete_assistant"), 1);
    assert_eq!(gateway.count("delete_vector_store"), 1);
}
