//! Storage module
//!
//! Users, chat-bots and file metadata in SQLite. Consumers depend on the
//! narrow repository traits below; `Database` implements all of them.

pub mod chat_bots;
pub mod db;
pub mod files;
pub mod models;
pub mod users;

pub use db::Database;
pub use models::{ChatBot, Plan, PlanAllowance, StoredFile, User};

use crate::error::AppError;
use async_trait::async_trait;

/// Owner-scoped chat-bot records
#[async_trait]
pub trait ChatBotRepository: Send + Sync {
    /// Fetch a chat-bot owned by `owner_id`
    async fn chat_bot(&self, id: i64, owner_id: i64) -> Result<ChatBot, AppError>;
    /// All chat-bots of a user, ordered by name
    async fn user_chat_bots(&self, owner_id: i64) -> Result<Vec<ChatBot>, AppError>;
    /// Insert a chat-bot and consume one of the owner's bot slots
    async fn save_chat_bot(&self, chat_bot: &ChatBot) -> Result<i64, AppError>;
    /// Replace name, description and instructions
    async fn update_chat_bot(
        &self,
        id: i64,
        owner_id: i64,
        name: &str,
        description: &str,
        instructions: &str,
    ) -> Result<(), AppError>;
    /// Delete a chat-bot and give the bot slot back
    async fn remove_chat_bot(&self, id: i64, owner_id: i64) -> Result<(), AppError>;
}

/// User accounts
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch a user by id
    async fn user(&self, id: i64) -> Result<User, AppError>;
    /// Fetch a user by email
    async fn user_by_email(&self, email: &str) -> Result<User, AppError>;
    /// Insert a user, returning the new id
    async fn save_user(&self, user: &User) -> Result<i64, AppError>;
    /// Overwrite plan and allowances
    async fn update_plan(&self, id: i64, user: &User) -> Result<(), AppError>;
}

/// Per-user remaining-message counter
#[async_trait]
pub trait QuotaLedger: Send + Sync {
    /// Take one message off the user's allowance
    async fn decrement_messages_left(&self, user_id: i64) -> Result<(), AppError>;
}

/// File metadata records
#[async_trait]
pub trait FileRepository: Send + Sync {
    /// Fetch a file owned by `owner_id`
    async fn file(&self, id: i64, owner_id: i64) -> Result<StoredFile, AppError>;
    /// All files of a chat-bot
    async fn chat_bot_files(
        &self,
        chat_bot_id: i64,
        owner_id: i64,
    ) -> Result<Vec<StoredFile>, AppError>;
    /// Insert file metadata and charge its size to the owner
    async fn save_file(&self, file: &StoredFile, owner_id: i64) -> Result<i64, AppError>;
    /// Delete file metadata and refund its size
    async fn remove_file(&self, id: i64, file_size: i64, owner_id: i64) -> Result<(), AppError>;
}
