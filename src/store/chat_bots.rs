//! Chat-bot records
//!
//! Saving and removing a chat-bot also moves the owner's `bots_left`
//! counter; both statements run in one transaction.

use super::{ChatBot, ChatBotRepository, Database};
use crate::error::AppError;
use async_trait::async_trait;
use tracing::debug;

const CHAT_BOT_COLUMNS: &str =
    "id, assistant_id, vector_store_id, owner_id, name, description, instructions";

#[async_trait]
impl ChatBotRepository for Database {
    async fn chat_bot(&self, id: i64, owner_id: i64) -> Result<ChatBot, AppError> {
        let query = format!(
            "SELECT {} FROM chat_bots WHERE id = ? AND owner_id = ?",
            CHAT_BOT_COLUMNS
        );
        sqlx::query_as::<_, ChatBot>(&query)
            .bind(id)
            .bind(owner_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "chat-bot {} does not exist for owner {}",
                    id, owner_id
                ))
            })
    }

    async fn user_chat_bots(&self, owner_id: i64) -> Result<Vec<ChatBot>, AppError> {
        let query = format!(
            "SELECT {} FROM chat_bots WHERE owner_id = ? ORDER BY name",
            CHAT_BOT_COLUMNS
        );
        let chat_bots = sqlx::query_as::<_, ChatBot>(&query)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to fetch chat-bots: {}", e)))?;

        Ok(chat_bots)
    }

    async fn save_chat_bot(&self, chat_bot: &ChatBot) -> Result<i64, AppError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "INSERT INTO chat_bots (assistant_id, vector_store_id, owner_id, name, description, instructions) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&chat_bot.assistant_id)
        .bind(&chat_bot.vector_store_id)
        .bind(chat_bot.owner_id)
        .bind(&chat_bot.name)
        .bind(&chat_bot.description)
        .bind(&chat_bot.instructions)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::Storage(format!("Failed to insert chat-bot: {}", e)))?;
        let id = result.last_insert_rowid();

        let updated = sqlx::query("UPDATE users SET bots_left = bots_left - 1 WHERE id = ?")
            .bind(chat_bot.owner_id)
            .execute(&mut *tx)
            .await?;
        if updated.rows_affected() == 0 {
            // Dropping the transaction rolls it back
            return Err(AppError::NotFound(format!(
                "invalid owner id {}",
                chat_bot.owner_id
            )));
        }

        tx.commit().await?;
        debug!(chat_bot_id = id, owner_id = chat_bot.owner_id, "Saved chat-bot");
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
        let result = sqlx::query(
            "UPDATE chat_bots SET name = ?, description = ?, instructions = ? WHERE id = ? AND owner_id = ?",
        )
        .bind(name)
        .bind(description)
        .bind(instructions)
        .bind(id)
        .bind(owner_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Storage(format!("Failed to update chat-bot: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("chat-bot {} does not exist", id)));
        }
        debug!(chat_bot_id = id, "Updated chat-bot");
        Ok(())
    }

    async fn remove_chat_bot(&self, id: i64, owner_id: i64) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let removed = sqlx::query("DELETE FROM chat_bots WHERE id = ? AND owner_id = ?")
            .bind(id)
            .bind(owner_id)
            .execute(&mut *tx)
            .await?;
        if removed.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "no chat-bot found with id {} and owner id {}",
                id, owner_id
            )));
        }

        let updated = sqlx::query("UPDATE users SET bots_left = bots_left + 1 WHERE id = ?")
            .bind(owner_id)
            .execute(&mut *tx)
            .await?;
        if updated.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("invalid user id {}", owner_id)));
        }

        tx.commit().await?;
        debug!(chat_bot_id = id, owner_id, "Removed chat-bot");
        Ok(())
    }
}
