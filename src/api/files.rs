//! File endpoints
//!
//! Upload is multipart with a single `file` field.

use crate::api::utils::{parse_id, RouterState, SuccessResponse};
use crate::auth::AuthUser;
use crate::error::AppError;
use crate::store::StoredFile;
use axum::{
    extract::{Multipart, Path, State},
    response::Json,
};
use serde::Serialize;

/// File metadata as returned to clients
#[derive(Debug, Serialize)]
pub struct FileView {
    /// File id
    pub id: i64,
    /// Original filename
    pub filename: String,
    /// Chat-bot the file belongs to
    pub chat_bot_id: i64,
}

impl From<StoredFile> for FileView {
    fn from(file: StoredFile) -> Self {
        Self {
            id: file.id,
            filename: file.filename,
            chat_bot_id: file.chat_bot_id,
        }
    }
}

/// Files of one chat-bot
#[derive(Debug, Serialize)]
pub struct ChatBotFilesResponse {
    /// File metadata
    pub files: Vec<FileView>,
}

/// Id of an uploaded file
#[derive(Debug, Serialize)]
pub struct SaveFileResponse {
    /// New file id
    pub file_id: i64,
}

/// GET /api/v1/file/:id - One file's metadata
pub async fn get_file(
    State(state): State<RouterState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<FileView>, AppError> {
    let id = parse_id(&id)?;
    let file = state.files.file(id, user.id).await?;
    Ok(Json(file.into()))
}

/// DELETE /api/v1/file/:id - Remove a file everywhere
pub async fn remove_file(
    State(state): State<RouterState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, AppError> {
    let id = parse_id(&id)?;
    state.files.remove_file(id, user.id).await?;
    Ok(Json(SuccessResponse::ok()))
}

/// GET /api/v1/chat-bot/:id/files - Files attached to a chat-bot
pub async fn chat_bot_files(
    State(state): State<RouterState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ChatBotFilesResponse>, AppError> {
    let chat_bot_id = parse_id(&id)?;
    let files = state.files.chat_bot_files(chat_bot_id, user.id).await?;
    Ok(Json(ChatBotFilesResponse {
        files: files.into_iter().map(FileView::from).collect(),
    }))
}

/// POST /api/v1/chat-bot/:id/file - Upload a file into the chat-bot's vector store
pub async fn save_file(
    State(state): State<RouterState>,
    user: AuthUser,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<SaveFileResponse>, AppError> {
    let chat_bot_id = parse_id(&id)?;

    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read file field: {}", e)))?;
        upload = Some((filename, data.to_vec()));
        break;
    }

    let (filename, data) =
        upload.ok_or_else(|| AppError::Validation("missing file field".to_string()))?;
    let file_id = state
        .files
        .save_file(chat_bot_id, user.id, &filename, data)
        .await?;
    Ok(Json(SaveFileResponse { file_id }))
}
