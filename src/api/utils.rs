//! API utility functions
//!
//! Shared router state type and small helpers used by the handlers.

use crate::error::AppError;
use crate::state::AppState;
use std::sync::Arc;

/// State type shared by every handler
pub type RouterState = Arc<AppState>;

/// Parse a path id; non-numeric ids are rejected before any lookup
pub fn parse_id(raw: &str) -> Result<i64, AppError> {
    raw.parse::<i64>()
        .map_err(|_| AppError::Validation(format!("Invalid ID provided: {}", raw)))
}

/// `{"success": true}` body shared by mutating endpoints
#[derive(Debug, serde::Serialize)]
pub struct SuccessResponse {
    /// Always true; failures are rendered as `AppError`
    pub success: bool,
}

impl SuccessResponse {
    /// The only value ever sent
    pub fn ok() -> Self {
        Self { success: true }
    }
}
