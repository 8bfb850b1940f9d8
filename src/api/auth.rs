//! Registration and login endpoints (public)

use crate::api::utils::RouterState;
use crate::auth::auth_cookie;
use crate::error::AppError;
use crate::store::Plan;
use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue},
    response::Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Credentials for registration
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    /// Login email
    pub email: String,
    /// Plain password, forwarded to the SSO service
    pub password: String,
}

/// Registered user id
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    /// Local user id
    pub id: i64,
}

/// Credentials for login
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Login email
    pub email: String,
    /// Plain password
    pub password: String,
}

/// Issued token
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Signed token, also set as the `Authorization` cookie
    pub token: String,
}

/// POST /api/v1/register - Create a local user on the free plan, then register with SSO
pub async fn register(
    State(state): State<RouterState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>, AppError> {
    let id = state
        .users
        .save_user(&request.email, &request.password, Plan::Free.as_str())
        .await?;
    state
        .identity
        .register(&request.email, &request.password, id)
        .await?;

    info!(user_id = id, "User registered");
    Ok(Json(RegisterResponse { id }))
}

/// POST /api/v1/login - Exchange credentials for a token and auth cookie
pub async fn login(
    State(state): State<RouterState>,
    Json(request): Json<LoginRequest>,
) -> Result<(HeaderMap, Json<LoginResponse>), AppError> {
    let token = state
        .identity
        .login(&request.email, &request.password)
        .await?;

    let cookie = auth_cookie(&token, state.config.auth.token_ttl_secs);
    let mut headers = HeaderMap::new();
    headers.insert(
        header::SET_COOKIE,
        HeaderValue::from_str(&cookie)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("invalid cookie value: {}", e)))?,
    );

    Ok((headers, Json(LoginResponse { token })))
}
