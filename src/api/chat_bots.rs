//! Chat-bot endpoints
//!
//! CRUD over the authenticated user's chat-bots. Remote assistant handles
//! never leave the server.

use crate::api::utils::{parse_id, RouterState, SuccessResponse};
use crate::auth::AuthUser;
use crate::error::AppError;
use crate::store::ChatBot;
use axum::{
    extract::{Path, State},
    response::Json,
};
use serde::{Deserialize, Serialize};

/// Chat-bot as returned to clients
#[derive(Debug, Serialize, PartialEq)]
pub struct ChatBotView {
    /// Chat-bot id
    pub id: i64,
    /// Display name
    pub name: String,
    /// Free-form description
    pub description: String,
    /// Assistant instructions
    pub instructions: String,
}

impl From<ChatBot> for ChatBotView {
    fn from(chat_bot: ChatBot) -> Self {
        Self {
            id: chat_bot.id,
            name: chat_bot.name,
            description: chat_bot.description,
            instructions: chat_bot.instructions,
        }
    }
}

/// Body of create and update requests
#[derive(Debug, Deserialize)]
pub struct ChatBotRequest {
    /// Display name
    pub name: String,
    /// Free-form description
    #[serde(default)]
    pub description: String,
    /// Assistant instructions
    #[serde(default)]
    pub instructions: String,
}

/// Id of a created chat-bot
#[derive(Debug, Serialize)]
pub struct SaveChatBotResponse {
    /// New chat-bot id
    pub chat_bot_id: i64,
}

/// GET /api/v1/chat-bot/:id - One chat-bot
pub async fn get_chat_bot(
    State(state): State<RouterState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ChatBotView>, AppError> {
    let id = parse_id(&id)?;
    let chat_bot = state.chat_bots.chat_bot(id, user.id).await?;
    Ok(Json(chat_bot.into()))
}

/// POST /api/v1/chat-bot - Create a chat-bot with its remote assistant
pub async fn save_chat_bot(
    State(state): State<RouterState>,
    user: AuthUser,
    Json(request): Json<ChatBotRequest>,
) -> Result<Json<SaveChatBotResponse>, AppError> {
    let chat_bot_id = state
        .chat_bots
        .save_chat_bot(
            user.id,
            &request.name,
            &request.description,
            &request.instructions,
        )
        .await?;
    Ok(Json(SaveChatBotResponse { chat_bot_id }))
}

/// PATCH /api/v1/chat-bot/:id - Replace name, description and instructions
pub async fn update_chat_bot(
    State(state): State<RouterState>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(request): Json<ChatBotRequest>,
) -> Result<Json<SuccessResponse>, AppError> {
    let id = parse_id(&id)?;
    state
        .chat_bots
        .update_chat_bot(
            id,
            user.id,
            &request.name,
            &request.description,
            &request.instructions,
        )
        .await?;
    Ok(Json(SuccessResponse::ok()))
}

/// DELETE /api/v1/chat-bot/:id - Remove a chat-bot and its remote assistant
pub async fn remove_chat_bot(
    State(state): State<RouterState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, AppError> {
    let id = parse_id(&id)?;
    state.chat_bots.remove_chat_bot(id, user.id).await?;
    Ok(Json(SuccessResponse::ok()))
}
