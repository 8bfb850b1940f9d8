//! API module
//!
//! HTTP handlers and router assembly. Everything under `/api/v1` except
//! registration and login requires a valid token.

pub mod auth;
pub mod chat_bots;
pub mod files;
pub mod users;
pub mod utils;

use crate::auth::require_auth;
use crate::websocket;
use axum::{
    extract::DefaultBodyLimit,
    middleware,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Serialize;
use utils::RouterState;

/// Largest accepted upload body
pub const MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

/// GET /api/health - Liveness probe
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Build the application router
pub fn router(state: RouterState) -> Router {
    let public = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login));

    let protected = Router::new()
        .route("/user", get(users::get_user).put(users::update_plan))
        .route("/user/chat-bots", get(users::user_chat_bots))
        .route("/chat-bot", post(chat_bots::save_chat_bot))
        .route(
            "/chat-bot/:id",
            get(chat_bots::get_chat_bot)
                .patch(chat_bots::update_chat_bot)
                .delete(chat_bots::remove_chat_bot),
        )
        .route("/chat-bot/:id/chat/ws", get(websocket::chat_handler))
        .route("/chat-bot/:id/files", get(files::chat_bot_files))
        .route(
            "/chat-bot/:id/file",
            post(files::save_file).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/file/:id", get(files::get_file).delete(files::remove_file))
        .route_layer(middleware::from_fn_with_state(
            state.verifier.clone(),
            require_auth,
        ));

    Router::new()
        .route("/api/health", get(health_check))
        .nest("/api/v1", public.merge(protected))
        .with_state(state)
}
