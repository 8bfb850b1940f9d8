//! Chat-bot use cases
//!
//! A chat-bot is a local record plus a remote assistant searching a remote
//! vector store. Creation builds the remote side first; removal tears it
//! down first and keeps the local record when that fails.

use super::log_failure;
use crate::assistant::AssistantGateway;
use crate::chat::ChatCoordinator;
use crate::error::AppError;
use crate::store::{ChatBot, ChatBotRepository};
use crate::validate;
use std::sync::Arc;
use tracing::info;

/// Chat-bot management
pub struct ChatBotService {
    chat_bots: Arc<dyn ChatBotRepository>,
    gateway: Arc<dyn AssistantGateway>,
    coordinator: Arc<ChatCoordinator>,
}

impl ChatBotService {
    /// Create the service
    pub fn new(
        chat_bots: Arc<dyn ChatBotRepository>,
        gateway: Arc<dyn AssistantGateway>,
        coordinator: Arc<ChatCoordinator>,
    ) -> Self {
        Self {
            chat_bots,
            gateway,
            coordinator,
        }
    }

    /// A chat-bot owned by `owner_id`
    pub async fn chat_bot(&self, id: i64, owner_id: i64) -> Result<ChatBot, AppError> {
        validate::chat_bot_id(id)?;
        validate::owner_id(owner_id)?;
        self.chat_bots
            .chat_bot(id, owner_id)
            .await
            .map_err(log_failure("fetch chat-bot"))
    }

    /// All chat-bots of `owner_id`
    pub async fn user_chat_bots(&self, owner_id: i64) -> Result<Vec<ChatBot>, AppError> {
        validate::owner_id(owner_id)?;
        self.chat_bots
            .user_chat_bots(owner_id)
            .await
            .map_err(log_failure("fetch user chat-bots"))
    }

    /// Create the vector store and assistant, then the local record
    ///
    /// Remote objects created before a later failure are not cleaned up.
    pub async fn save_chat_bot(
        &self,
        owner_id: i64,
        name: &str,
        description: &str,
        instructions: &str,
    ) -> Result<i64, AppError> {
        validate::owner_id(owner_id)?;
        validate::save_chat_bot(name)?;

        let remote_name = format!("{} - {}", owner_id, name);
        let vector_store_id = self.gateway.create_vector_store(&remote_name).await?;
        let assistant_id = self
            .gateway
            .create_assistant(&remote_name, instructions, &vector_store_id)
            .await?;

        let chat_bot = ChatBot {
            id: 0,
            assistant_id,
            vector_store_id,
            owner_id,
            name: name.to_string(),
            description: description.to_string(),
            instructions: instructions.to_string(),
        };
        let id = self
            .chat_bots
            .save_chat_bot(&chat_bot)
            .await
            .map_err(log_failure("insert chat-bot"))?;

        info!(chat_bot_id = id, owner_id, "Chat-bot created");
        Ok(id)
    }

    /// Replace name, description and instructions
    ///
    /// Only the local record changes; the remote assistant keeps the
    /// instructions it was created with.
    pub async fn update_chat_bot(
        &self,
        id: i64,
        owner_id: i64,
        name: &str,
        description: &str,
        instructions: &str,
    ) -> Result<(), AppError> {
        validate::update_chat_bot(id, owner_id, name)?;
        self.chat_bots
            .update_chat_bot(id, owner_id, name, description, instructions)
            .await
            .map_err(log_failure("update chat-bot"))
    }

    /// Tear down the remote assistant and vector store, then the record
    pub async fn remove_chat_bot(&self, id: i64, owner_id: i64) -> Result<(), AppError> {
        validate::chat_bot_id(id)?;
        validate::owner_id(owner_id)?;

        let chat_bot = self.chat_bots.chat_bot(id, owner_id).await?;
        self.coordinator
            .remove_bot_side_effects(&chat_bot.assistant_id, &chat_bot.vector_store_id)
            .await
            .map_err(log_failure("remove remote assistant"))?;
        self.chat_bots
            .remove_chat_bot(id, owner_id)
            .await
            .map_err(log_failure("remove chat-bot"))?;

        info!(chat_bot_id = id, owner_id, "Chat-bot removed");
        Ok(())
    }
}
