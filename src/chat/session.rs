//! Per-connection chat state and the value delivered per turn

use crate::error::AppError;

/// Conversation state held by one duplex connection
///
/// Created by `ChatCoordinator::start_session` and dropped with the
/// connection. Nothing else keeps a reference to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Chat-bot answering this session
    pub chat_bot_id: i64,
    /// Caller; charged for every completed answer
    pub owner_id: i64,
    /// Remote thread handle
    pub thread_id: String,
}

impl Session {
    /// One user message in this session
    pub fn turn(&self, prompt: impl Into<String>) -> Turn {
        Turn {
            chat_bot_id: self.chat_bot_id,
            owner_id: self.owner_id,
            thread_id: self.thread_id.clone(),
            prompt: prompt.into(),
        }
    }
}

/// Input of a single `send`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    /// Chat-bot answering the turn
    pub chat_bot_id: i64,
    /// Caller
    pub owner_id: i64,
    /// Remote thread handle
    pub thread_id: String,
    /// User message text
    pub prompt: String,
}

/// Outcome of one turn; exactly one of `content` and `error` is meaningful
#[derive(Debug)]
pub struct AssistantResponse {
    /// Assistant answer, empty on failure
    pub content: String,
    /// Why the turn failed
    pub error: Option<AppError>,
}

impl AssistantResponse {
    /// A completed answer
    pub fn completed(content: String) -> Self {
        Self {
            content,
            error: None,
        }
    }

    /// A failed turn
    pub fn failed(error: AppError) -> Self {
        Self {
            content: String::new(),
            error: Some(error),
        }
    }

    /// Whether the turn produced an answer
    pub fn is_completed(&self) -> bool {
        self.error.is_none()
    }

    /// Content on success, the failure otherwise
    pub fn into_result(self) -> Result<String, AppError> {
        match self.error {
            None => Ok(self.content),
            Some(err) => Err(err),
        }
    }
}
