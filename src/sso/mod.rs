//! Identity provider
//!
//! Registration, login and admin checks are owned by an external SSO
//! service. `SsoClient` talks to it over JSON-over-HTTP.

pub mod client;

pub use client::SsoClient;

use crate::error::AppError;
use async_trait::async_trait;
use thiserror::Error;

/// Errors returned by an `IdentityProvider`
#[derive(Error, Debug)]
pub enum IdentityError {
    /// The SSO service could not be reached
    #[error("sso request failed: {0}")]
    Request(String),

    /// The SSO service refused the call
    #[error("sso returned status {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// Response body did not match the expected shape
    #[error("invalid sso response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for IdentityError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            IdentityError::Decode(err.to_string())
        } else {
            IdentityError::Request(err.to_string())
        }
    }
}

impl From<IdentityError> for AppError {
    fn from(err: IdentityError) -> Self {
        match err {
            // Rejected credentials, duplicate accounts and the like
            IdentityError::Status { status, body } if (400..500).contains(&status) => {
                AppError::Auth(body)
            }
            other => AppError::Internal(anyhow::Error::new(other)),
        }
    }
}

/// Operations consumed from the SSO service
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Create an account for `uid_in_app`; returns the SSO user id
    async fn register(
        &self,
        email: &str,
        password: &str,
        uid_in_app: i64,
    ) -> Result<i64, IdentityError>;
    /// Exchange credentials for a signed token
    async fn login(&self, email: &str, password: &str, app_id: i32)
        -> Result<String, IdentityError>;
    /// Whether `uid_in_app` has the admin role
    async fn is_admin(&self, uid_in_app: i64) -> Result<bool, IdentityError>;
}
