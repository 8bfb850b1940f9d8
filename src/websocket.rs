//! Chat WebSocket
//!
//! One connection drives one chat `Session`. Each text frame
//! `{"message": ...}` becomes one chat turn; the loop waits for that turn's
//! response before reading the next frame, so turns in a session never
//! overlap. Per-message failures are reported as `{"error": ...}` frames and
//! the connection stays open.

use crate::api::utils::{parse_id, RouterState};
use crate::auth::AuthUser;
use crate::chat::{ChatCoordinator, Session};
use crate::error::AppError;
use axum::{
    extract::{
        ws::{Message, WebSocket},
        Path, State, WebSocketUpgrade,
    },
    response::Response,
};
use futures_util::{Sink, SinkExt, Stream, StreamExt};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Sent when a frame is not `{"message": string}`
pub const INVALID_REQUEST: &str = "Invalid request format";
/// Sent when a turn fails for any reason
pub const RESPONSE_FAILED: &str = "Could not retrieve chat-bot response";

/// Inbound frame
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// User prompt
    pub message: String,
}

/// Outbound frame
#[derive(Debug, Serialize, PartialEq)]
#[serde(untagged)]
pub enum ChatFrame {
    /// Assistant answer
    Response {
        /// Answer text
        response: String,
    },
    /// Failure of one frame
    Error {
        /// Generic failure message
        error: String,
    },
}

impl ChatFrame {
    fn error(message: &str) -> Self {
        ChatFrame::Error {
            error: message.to_string(),
        }
    }

    fn into_message(self) -> Message {
        // Serializing two string fields cannot fail
        let text = serde_json::to_string(&self).unwrap_or_default();
        Message::Text(text)
    }
}

/// GET /api/v1/chat-bot/:id/chat/ws - Open a chat session and upgrade
///
/// The session is started before the upgrade, so a bad id, a foreign
/// chat-bot or a failed thread creation is a plain HTTP error.
pub async fn chat_handler(
    ws: WebSocketUpgrade,
    State(state): State<RouterState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let chat_bot_id = parse_id(&id)?;
    let session = state.coordinator.start_session(chat_bot_id, user.id).await?;
    let coordinator = state.coordinator.clone();

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, coordinator, session)))
}

async fn handle_socket(socket: WebSocket, coordinator: Arc<ChatCoordinator>, session: Session) {
    let (sender, receiver) = socket.split();
    info!(
        chat_bot_id = session.chat_bot_id,
        thread_id = %session.thread_id,
        "Chat WebSocket connected"
    );

    run_session(sender, receiver, &coordinator, &session).await;

    info!(
        chat_bot_id = session.chat_bot_id,
        thread_id = %session.thread_id,
        "Chat WebSocket closed"
    );
}

/// Read frames until Close or a transport error, answering each text frame
pub async fn run_session<S, R, E>(
    mut sender: S,
    mut receiver: R,
    coordinator: &Arc<ChatCoordinator>,
    session: &Session,
) where
    S: Sink<Message> + Unpin,
    S::Error: Display,
    R: Stream<Item = Result<Message, E>> + Unpin,
    E: Display,
{
    while let Some(frame) = receiver.next().await {
        let text = match frame {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) => {
                debug!(thread_id = %session.thread_id, "Client closed chat");
                break;
            }
            Ok(_) => continue,
            Err(e) => {
                error!(thread_id = %session.thread_id, error = %e, "WebSocket error");
                break;
            }
        };

        let outbound = match serde_json::from_str::<ChatRequest>(&text) {
            Ok(request) => answer(coordinator, session, request.message).await,
            Err(e) => {
                warn!(thread_id = %session.thread_id, error = %e, "Invalid chat frame");
                ChatFrame::error(INVALID_REQUEST)
            }
        };

        if let Err(e) = sender.send(outbound.into_message()).await {
            error!(thread_id = %session.thread_id, error = %e, "Failed to send chat frame");
            break;
        }
    }
}

async fn answer(coordinator: &Arc<ChatCoordinator>, session: &Session, prompt: String) -> ChatFrame {
    match coordinator.dispatch(session.turn(prompt)).await {
        Ok(response) => match response.into_result() {
            Ok(content) => ChatFrame::Response { response: content },
            Err(e) => {
                warn!(thread_id = %session.thread_id, error = %e, "Chat turn failed");
                ChatFrame::error(RESPONSE_FAILED)
            }
        },
        Err(_) => {
            error!(thread_id = %session.thread_id, "Chat task ended without a response");
            ChatFrame::error(RESPONSE_FAILED)
        }
    }
}
