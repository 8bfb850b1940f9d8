//! Assistant gateway
//!
//! Thread/run/message and vector-store primitives of the remote assistant
//! provider. The chat coordinator and the services only see the
//! `AssistantGateway` trait; `OpenAiGateway` is the HTTP implementation.

pub mod client;
pub mod error;
pub mod types;

pub use client::OpenAiGateway;
pub use error::GatewayError;
pub use types::{Run, RunStatus};

use async_trait::async_trait;

/// Operations consumed from the assistant provider
#[async_trait]
pub trait AssistantGateway: Send + Sync {
    /// Open a new conversation thread
    async fn create_thread(&self) -> Result<String, GatewayError>;
    /// Append a user message to a thread
    async fn add_message_to_thread(&self, thread_id: &str, text: &str)
        -> Result<(), GatewayError>;
    /// Ask `assistant_id` to answer the thread; returns the run id
    async fn create_run(&self, thread_id: &str, assistant_id: &str)
        -> Result<String, GatewayError>;
    /// Observe a run
    async fn get_run(&self, thread_id: &str, run_id: &str) -> Result<Run, GatewayError>;
    /// Text of the newest assistant message in the thread
    async fn latest_assistant_response(&self, thread_id: &str) -> Result<String, GatewayError>;

    /// Create an empty vector store
    async fn create_vector_store(&self, name: &str) -> Result<String, GatewayError>;
    /// Create an assistant searching `vector_store_id`
    async fn create_assistant(
        &self,
        name: &str,
        instructions: &str,
        vector_store_id: &str,
    ) -> Result<String, GatewayError>;
    /// Delete an assistant
    async fn delete_assistant(&self, assistant_id: &str) -> Result<(), GatewayError>;
    /// Delete a vector store
    async fn delete_vector_store(&self, vector_store_id: &str) -> Result<(), GatewayError>;

    /// Upload raw file bytes; returns the remote file id
    async fn upload_file(&self, filename: &str, data: Vec<u8>) -> Result<String, GatewayError>;
    /// Attach an uploaded file to a vector store
    async fn add_vector_store_file(
        &self,
        vector_store_id: &str,
        file_id: &str,
    ) -> Result<(), GatewayError>;
    /// Detach a file from a vector store
    async fn delete_vector_store_file(
        &self,
        vector_store_id: &str,
        file_id: &str,
    ) -> Result<(), GatewayError>;
    /// Delete an uploaded file
    async fn delete_file(&self, file_id: &str) -> Result<(), GatewayError>;
}
