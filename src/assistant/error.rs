//! Gateway-specific error types
//!
//! Errors that can occur while talking to the assistant provider.

use thiserror::Error;

/// Errors returned by an `AssistantGateway`
#[derive(Error, Debug)]
pub enum GatewayError {
    /// The request never produced an HTTP response (connect, timeout, TLS)
    #[error("request failed: {0}")]
    Request(String),

    /// Provider answered with a non-success status
    #[error("provider returned status {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// Response body did not match the expected shape
    #[error("invalid response: {0}")]
    Decode(String),

    /// The thread holds no assistant text yet
    #[error("thread has no assistant response")]
    EmptyResponse,
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            GatewayError::Decode(err.to_string())
        } else {
            GatewayError::Request(err.to_string())
        }
    }
}
