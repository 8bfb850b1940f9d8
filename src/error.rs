//! Error types and error handling for the application
//!
//! This module defines custom error types that can be converted to HTTP responses.
//! All errors implement `IntoResponse` to provide consistent error formatting.

use crate::assistant::GatewayError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error types
///
/// All errors that can occur in the application are represented by this enum.
/// Each variant implements automatic conversion to HTTP responses via `IntoResponse`.
#[derive(Error, Debug)]
pub enum AppError {
    /// Malformed or missing ids/fields, rejected before any network call
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity is absent or not owned by the caller
    #[error("Not found: {0}")]
    NotFound(String),

    /// Upstream assistant-provider call failed
    #[error("Assistant gateway error: {0}")]
    Gateway(#[from] GatewayError),

    /// Poll budget exhausted before the run completed
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Persistence call failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// Missing or invalid bearer token
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Internal server error (catch-all for unexpected errors)
    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// HTTP status code this error is rendered with
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Gateway(_) => StatusCode::BAD_GATEWAY,
            AppError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Auth(_) => StatusCode::UNAUTHORIZED,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound("record not found".to_string()),
            other => AppError::Storage(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Upstream and storage details stay in the logs
        let error_message = match &self {
            AppError::Gateway(_) | AppError::Storage(_) | AppError::Internal(_) => {
                tracing::error!(error = %self, "Request failed");
                "Could not process request".to_string()
            }
            AppError::Auth(_) => "Permission denied".to_string(),
            _ => self.to_string(),
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}
