//! Service layer for business logic
//!
//! Use cases sitting between the HTTP handlers and the collaborators
//! (storage, assistant gateway, identity provider). Every service validates
//! its input before touching a collaborator.

pub mod chat_bots;
pub mod files;
pub mod identity;
pub mod users;

pub use chat_bots::ChatBotService;
pub use files::FileService;
pub use identity::IdentityService;
pub use users::UserService;

use crate::error::AppError;

/// Log a failed step of a use case and pass the error on
pub(crate) fn log_failure(step: &'static str) -> impl Fn(AppError) -> AppError {
    move |e| {
        tracing::error!(step, error = %e, "Service call failed");
        e
    }
}
