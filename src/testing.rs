//! In-memory collaborators for unit tests

use crate::assistant::{AssistantGateway, GatewayError, Run, RunStatus};
use crate::chat::AssistantResponse;
use crate::error::AppError;
use crate::store::{ChatBot, ChatBotRepository, QuotaLedger};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::oneshot;

/// Scripted gateway recording every call by name
pub(crate) struct FakeGateway {
    calls: Mutex<Vec<&'static str>>,
    failures: HashMap<&'static str, String>,
    statuses: Mutex<VecDeque<RunStatus>>,
    status: RunStatus,
    answer: String,
    next_id: AtomicUsize,
}

impl FakeGateway {
    pub(crate) fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            failures: HashMap::new(),
            statuses: Mutex::new(VecDeque::new()),
            status: RunStatus::Completed,
            answer: "Hi there!".to_string(),
            next_id: AtomicUsize::new(1),
        }
    }

    /// Make `op` fail with a request error carrying `message`
    pub(crate) fn failing(mut self, op: &'static str, message: &str) -> Self {
        self.failures.insert(op, message.to_string());
        self
    }

    /// Status reported by every `get_run`
    pub(crate) fn with_status(mut self, status: RunStatus) -> Self {
        self.status = status;
        self
    }

    /// Statuses reported in order before falling back to `with_status`
    pub(crate) fn with_statuses(self, statuses: Vec<RunStatus>) -> Self {
        *self.statuses.lock().unwrap() = statuses.into();
        self
    }

    pub(crate) fn with_answer(mut self, answer: &str) -> Self {
        self.answer = answer.to_string();
        self
    }

    pub(crate) fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn count(&self, op: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| **c == op).count()
    }

    fn record(&self, op: &'static str) -> Result<(), GatewayError> {
        self.calls.lock().unwrap().push(op);
        match self.failures.get(op) {
            Some(message) => Err(GatewayError::Request(message.clone())),
            None => Ok(()),
        }
    }

    fn id(&self, prefix: &str) -> String {
        format!("{}_{}", prefix, self.next_id.fetch_add(1, Ordering::SeqCst))
    }
}

#[async_trait]
impl AssistantGateway for FakeGateway {
    async fn create_thread(&self) -> Result<String, GatewayError> {
        self.record("create_thread")?;
        Ok(self.id("thread"))
    }

    async fn add_message_to_thread(&self, _: &str, _: &str) -> Result<(), GatewayError> {
        self.record("add_message_to_thread")
    }

    async fn create_run(&self, _: &str, _: &str) -> Result<String, GatewayError> {
        self.record("create_run")?;
        Ok(self.id("run"))
    }

    async fn get_run(&self, _: &str, run_id: &str) -> Result<Run, GatewayError> {
        self.record("get_run")?;
        let status = self
            .statuses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.status.clone());
        Ok(Run {
            id: run_id.to_string(),
            status,
        })
    }

    async fn latest_assistant_response(&self, _: &str) -> Result<String, GatewayError> {
        self.record("latest_assistant_response")?;
        Ok(self.answer.clone())
    }

    async fn create_vector_store(&self, _: &str) -> Result<String, GatewayError> {
        self.record("create_vector_store")?;
        Ok(self.id("vs"))
    }

    async fn create_assistant(&self, _: &str, _: &str, _: &str) -> Result<String, GatewayError> {
        self.record("create_assistant")?;
        Ok(self.id("asst"))
    }

    async fn delete_assistant(&self, _: &str) -> Result<(), GatewayError> {
        self.record("delete_assistant")
    }

    async fn delete_vector_store(&self, _: &str) -> Result<(), GatewayError> {
        self.record("delete_vector_store")
    }

    async fn upload_file(&self, _: &str, _: Vec<u8>) -> Result<String, GatewayError> {
        self.record("upload_file")?;
        Ok(self.id("file"))
    }

    async fn add_vector_store_file(&self, _: &str, _: &str) -> Result<(), GatewayError> {
        self.record("add_vector_store_file")
    }

    async fn delete_vector_store_file(&self, _: &str, _: &str) -> Result<(), GatewayError> {
        self.record("delete_vector_store_file")
    }

    async fn delete_file(&self, _: &str) -> Result<(), GatewayError> {
        self.record("delete_file")
    }
}

/// Ledger recording decrement attempts
///
/// When observing, each decrement peeks at the reply channel of the turn
/// so tests can tell whether the response was delivered first.
#[derive(Default)]
pub(crate) struct FakeLedger {
    decrements: Mutex<Vec<i64>>,
    probe: Mutex<Option<oneshot::Receiver<AssistantResponse>>>,
    observed: Mutex<Option<String>>,
    fail: bool,
}

impl FakeLedger {
    pub(crate) fn failing() -> Self {
        Self::default().with_failure()
    }

    pub(crate) fn observing(probe: oneshot::Receiver<AssistantResponse>) -> Self {
        Self {
            probe: Mutex::new(Some(probe)),
            ..Self::default()
        }
    }

    pub(crate) fn with_failure(mut self) -> Self {
        self.fail = true;
        self
    }

    pub(crate) fn decrements(&self) -> Vec<i64> {
        self.decrements.lock().unwrap().clone()
    }

    /// Content found in the reply channel at decrement time
    pub(crate) fn observed(&self) -> Option<String> {
        self.observed.lock().unwrap().clone()
    }
}

#[async_trait]
impl QuotaLedger for FakeLedger {
    async fn decrement_messages_left(&self, user_id: i64) -> Result<(), AppError> {
        self.decrements.lock().unwrap().push(user_id);
        if let Some(mut probe) = self.probe.lock().unwrap().take() {
            if let Ok(response) = probe.try_recv() {
                *self.observed.lock().unwrap() = Some(response.content);
            }
        }
        if self.fail {
            return Err(AppError::Storage("ledger unavailable".to_string()));
        }
        Ok(())
    }
}

/// Owner-scoped in-memory chat-bots
#[derive(Default)]
pub(crate) struct FakeChatBots {
    bots: Mutex<Vec<ChatBot>>,
}

impl FakeChatBots {
    pub(crate) fn with_bot(id: i64, owner_id: i64, assistant_id: &str) -> Self {
        let bot = ChatBot {
            id,
            assistant_id: assistant_id.to_string(),
            vector_store_id: format!("vs_for_{}", id),
            owner_id,
            name: "Helper".to_string(),
            description: String::new(),
            instructions: String::new(),
        };
        Self {
            bots: Mutex::new(vec![bot]),
        }
    }

    fn not_found(id: i64) -> AppError {
        AppError::NotFound(format!("chat-bot {} does not exist", id))
    }
}

#[async_trait]
impl ChatBotRepository for FakeChatBots {
    async fn chat_bot(&self, id: i64, owner_id: i64) -> Result<ChatBot, AppError> {
        self.bots
            .lock()
            .unwrap()
            .iter()
            .find(|b| b.id == id && b.owner_id == owner_id)
            .cloned()
            .ok_or_else(|| Self::not_found(id))
    }

    async fn user_chat_bots(&self, owner_id: i64) -> Result<Vec<ChatBot>, AppError> {
        Ok(self
            .bots
            .lock()
            .unwrap()
            .iter()
            .filter(|b| b.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn save_chat_bot(&self, chat_bot: &ChatBot) -> Result<i64, AppError> {
        let mut bots = self.bots.lock().unwrap();
        let id = bots.iter().map(|b| b.id).max().unwrap_or(0) + 1;
        bots.push(ChatBot {
            id,
            ..chat_bot.clone()
        });
        Ok(id)
    }

    async fn update_chat_bot(
        &self,
        id: i64,
        owner_id: i64,
        name: &str,
        description: &str,
        instructions: &str,
    ) -> Result<(), AppError> {
        let mut bots = self.bots.lock().unwrap();
        let bot = bots
            .iter_mut()
            .find(|b| b.id == id && b.owner_id == owner_id)
            .ok_or_else(|| Self::not_found(id))?;
        bot.name = name.to_string();
        bot.description = description.to_string();
        bot.instructions = instructions.to_string();
        Ok(())
    }

    async fn remove_chat_bot(&self, id: i64, owner_id: i64) -> Result<(), AppError> {
        let mut bots = self.bots.lock().unwrap();
        let before = bots.len();
        bots.retain(|b| !(b.id == id && b.owner_id == owner_id));
        if bots.len() == before {
            return Err(Self::not_found(id));
        }
        Ok(())
    }
}
