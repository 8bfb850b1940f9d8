//! File use cases
//!
//! Uploaded files live in the provider's file storage and are attached to
//! the chat-bot's vector store. Only metadata is kept locally; its size is
//! charged to and refunded from the owner's byte allowance.

use super::log_failure;
use crate::assistant::AssistantGateway;
use crate::error::AppError;
use crate::store::{ChatBotRepository, FileRepository, StoredFile};
use crate::validate;
use std::sync::Arc;
use tracing::info;

/// File management
pub struct FileService {
    files: Arc<dyn FileRepository>,
    chat_bots: Arc<dyn ChatBotRepository>,
    gateway: Arc<dyn AssistantGateway>,
}

impl FileService {
    /// Create the service
    pub fn new(
        files: Arc<dyn FileRepository>,
        chat_bots: Arc<dyn ChatBotRepository>,
        gateway: Arc<dyn AssistantGateway>,
    ) -> Self {
        Self {
            files,
            chat_bots,
            gateway,
        }
    }

    /// File metadata owned by `owner_id`
    pub async fn file(&self, id: i64, owner_id: i64) -> Result<StoredFile, AppError> {
        validate::file(id, owner_id)?;
        self.files
            .file(id, owner_id)
            .await
            .map_err(log_failure("fetch file"))
    }

    /// Files of a chat-bot; the chat-bot must belong to `owner_id`
    pub async fn chat_bot_files(
        &self,
        chat_bot_id: i64,
        owner_id: i64,
    ) -> Result<Vec<StoredFile>, AppError> {
        validate::chat_bot_id(chat_bot_id)?;
        validate::owner_id(owner_id)?;

        self.chat_bots.chat_bot(chat_bot_id, owner_id).await?;
        self.files
            .chat_bot_files(chat_bot_id, owner_id)
            .await
            .map_err(log_failure("fetch chat-bot files"))
    }

    /// Upload, attach to the chat-bot's vector store, record metadata
    pub async fn save_file(
        &self,
        chat_bot_id: i64,
        owner_id: i64,
        filename: &str,
        data: Vec<u8>,
    ) -> Result<i64, AppError> {
        validate::save_file(filename, &data)?;
        validate::chat_bot_id(chat_bot_id)?;
        validate::owner_id(owner_id)?;

        let chat_bot = self.chat_bots.chat_bot(chat_bot_id, owner_id).await?;

        let file_size = data.len() as i64;
        let openai_file_id = self.gateway.upload_file(filename, data).await?;
        self.gateway
            .add_vector_store_file(&chat_bot.vector_store_id, &openai_file_id)
            .await?;

        let file = StoredFile {
            id: 0,
            chat_bot_id,
            owner_id,
            openai_file_id,
            filename: filename.to_string(),
            file_size,
        };
        let id = self
            .files
            .save_file(&file, owner_id)
            .await
            .map_err(log_failure("insert file"))?;

        info!(file_id = id, chat_bot_id, file_size, "File saved");
        Ok(id)
    }

    /// Detach from the vector store, delete remotely, then drop metadata
    pub async fn remove_file(&self, id: i64, owner_id: i64) -> Result<(), AppError> {
        validate::file(id, owner_id)?;

        let file = self.files.file(id, owner_id).await?;
        let chat_bot = self.chat_bots.chat_bot(file.chat_bot_id, owner_id).await?;

        self.gateway
            .delete_vector_store_file(&chat_bot.vector_store_id, &file.openai_file_id)
            .await?;
        self.gateway.delete_file(&file.openai_file_id).await?;
        self.files
            .remove_file(id, file.file_size, owner_id)
            .await
            .map_err(log_failure("remove file"))?;

        info!(file_id = id, owner_id, "File removed");
        Ok(())
    }
}
