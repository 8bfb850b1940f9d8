//! Current-user endpoints

use crate::api::chat_bots::ChatBotView;
use crate::api::utils::{RouterState, SuccessResponse};
use crate::auth::AuthUser;
use crate::error::AppError;
use crate::store::User;
use axum::{extract::State, response::Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User as returned to clients
#[derive(Debug, Serialize)]
pub struct UserView {
    /// User id
    pub id: i64,
    /// Login email
    pub email: String,
    /// Current plan name
    pub plan: String,
    /// When the plan was bought
    pub plan_bought_date: DateTime<Utc>,
    /// Assistant replies left
    pub messages_left: i64,
    /// Upload bytes left
    pub bytes_data_left: i64,
    /// Chat-bots the user may still create
    pub bots_left: i64,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            plan_bought_date: user.plan_bought_datetime(),
            id: user.id,
            email: user.email,
            plan: user.plan,
            messages_left: user.messages_left,
            bytes_data_left: user.bytes_data_left,
            bots_left: user.bots_left,
        }
    }
}

/// Plan change request
#[derive(Debug, Deserialize)]
pub struct UpdatePlanRequest {
    /// New plan name
    pub plan: String,
}

/// Chat-bots of the current user
#[derive(Debug, Serialize)]
pub struct UserChatBotsResponse {
    /// Chat-bots ordered by name
    pub chat_bots: Vec<ChatBotView>,
}

/// GET /api/v1/user - The authenticated user
pub async fn get_user(
    State(state): State<RouterState>,
    user: AuthUser,
) -> Result<Json<UserView>, AppError> {
    let user = state.users.user(user.id).await?;
    Ok(Json(user.into()))
}

/// PUT /api/v1/user - Switch plan
pub async fn update_plan(
    State(state): State<RouterState>,
    user: AuthUser,
    Json(request): Json<UpdatePlanRequest>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.users.update_plan(user.id, &request.plan).await?;
    Ok(Json(SuccessResponse::ok()))
}

/// GET /api/v1/user/chat-bots - All chat-bots of the authenticated user
pub async fn user_chat_bots(
    State(state): State<RouterState>,
    user: AuthUser,
) -> Result<Json<UserChatBotsResponse>, AppError> {
    let chat_bots = state.chat_bots.user_chat_bots(user.id).await?;
    Ok(Json(UserChatBotsResponse {
        chat_bots: chat_bots.into_iter().map(ChatBotView::from).collect(),
    }))
}
