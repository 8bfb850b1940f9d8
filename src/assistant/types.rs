//! Assistants API wire types

use serde::{Deserialize, Serialize};

/// Lifecycle status of a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// Waiting to start
    Queued,
    /// Being processed
    InProgress,
    /// Waiting on tool outputs
    RequiresAction,
    /// Cancellation requested
    Cancelling,
    /// Cancelled
    Cancelled,
    /// Failed upstream
    Failed,
    /// Finished with an assistant message
    Completed,
    /// Ran out of time upstream
    Expired,
    /// Ended without a full answer
    Incomplete,
    /// Anything this client does not know about
    #[serde(other)]
    Other,
}

impl RunStatus {
    /// Only `completed` yields an answer
    pub fn is_completed(&self) -> bool {
        matches!(self, RunStatus::Completed)
    }
}

/// A run as observed by polling
#[derive(Debug, Clone, Deserialize)]
pub struct Run {
    /// Run id
    pub id: String,
    /// Current status
    pub status: RunStatus,
}

/// Any created object; only the id is needed
#[derive(Debug, Deserialize)]
pub struct ObjectRef {
    /// Object id
    pub id: String,
}

/// `POST /threads/{id}/messages`
#[derive(Debug, Serialize)]
pub struct CreateMessageRequest<'a> {
    /// Always "user"
    pub role: &'a str,
    /// Message text
    pub content: &'a str,
}

/// `POST /threads/{id}/runs`
#[derive(Debug, Serialize)]
pub struct CreateRunRequest<'a> {
    /// Assistant answering the thread
    pub assistant_id: &'a str,
}

/// `POST /vector_stores`
#[derive(Debug, Serialize)]
pub struct CreateVectorStoreRequest<'a> {
    /// Display name
    pub name: &'a str,
}

/// `POST /vector_stores/{id}/files`
#[derive(Debug, Serialize)]
pub struct AddVectorStoreFileRequest<'a> {
    /// Previously uploaded file
    pub file_id: &'a str,
}

/// `POST /assistants`
#[derive(Debug, Serialize)]
pub struct CreateAssistantRequest<'a> {
    /// Display name
    pub name: &'a str,
    /// System instructions
    pub instructions: &'a str,
    /// Model name
    pub model: &'a str,
    /// Enabled tools
    pub tools: Vec<Tool>,
    /// Resources backing the tools
    pub tool_resources: ToolResources,
}

/// Assistant tool descriptor
#[derive(Debug, Serialize)]
pub struct Tool {
    /// Tool type, e.g. "file_search"
    #[serde(rename = "type")]
    pub tool_type: String,
}

/// Resources attached to the assistant's tools
#[derive(Debug, Serialize)]
pub struct ToolResources {
    /// Vector stores searched by file_search
    pub file_search: FileSearchResources,
}

/// file_search tool resources
#[derive(Debug, Serialize)]
pub struct FileSearchResources {
    /// Vector store ids
    pub vector_store_ids: Vec<String>,
}

/// `GET /threads/{id}/messages`
#[derive(Debug, Deserialize)]
pub struct MessageList {
    /// Messages, newest first when requested with `order=desc`
    pub data: Vec<ThreadMessage>,
}

/// A message in a thread
#[derive(Debug, Deserialize)]
pub struct ThreadMessage {
    /// "user" or "assistant"
    pub role: String,
    /// Content blocks
    #[serde(default)]
    pub content: Vec<MessageContent>,
}

/// A content block of a thread message
#[derive(Debug, Deserialize)]
pub struct MessageContent {
    /// Block type, "text" for plain answers
    #[serde(rename = "type")]
    pub content_type: String,
    /// Present when `content_type` is "text"
    pub text: Option<TextContent>,
}

/// Text payload of a content block
#[derive(Debug, Deserialize)]
pub struct TextContent {
    /// The text itself
    pub value: String,
}

impl MessageList {
    /// Text of the newest assistant message, joined across text blocks
    pub fn latest_assistant_text(&self) -> Option<String> {
        let message = self.data.iter().find(|m| m.role == "assistant")?;
        let text: Vec<&str> = message
            .content
            .iter()
            .filter(|c| c.content_type == "text")
            .filter_map(|c| c.text.as_ref().map(|t| t.value.as_str()))
            .collect();
        if text.is_empty() {
            None
        } else {
            Some(text.join("\n"))
        }
    }
}
