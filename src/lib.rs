//! Bot Factory Backend Library
//!
//! Chat-bot hosting over a remote assistants API: users create chat-bots
//! backed by a remote assistant and vector store, upload files into them
//! and chat with them over a WebSocket.
//! The main binary is in `src/main.rs`.

pub mod api;
pub mod assistant;
pub mod auth;
/// Chat Session Coordinator
pub mod chat;
pub mod config;
pub mod error;
pub mod services;
pub mod sso;
/// Application state management
///
/// Builds every collaborator once and injects it into the services.
pub mod state;
pub mod store;
pub mod validate;
pub mod websocket;

#[cfg(test)]
mod testing;
