//! SSO HTTP client

use super::{IdentityError, IdentityProvider};
use crate::config::SsoConfig;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Serialize)]
struct RegisterRequest<'a> {
    email: &'a str,
    password: &'a str,
    uid_in_app: i64,
}

#[derive(Debug, Deserialize)]
struct RegisterResponse {
    user_id: i64,
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
    app_id: i32,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
}

#[derive(Debug, Serialize)]
struct IsAdminRequest {
    uid_in_app: i64,
}

#[derive(Debug, Deserialize)]
struct IsAdminResponse {
    is_admin: bool,
}

/// HTTP implementation of `IdentityProvider`
#[derive(Clone)]
pub struct SsoClient {
    client: reqwest::Client,
    base_url: String,
}

impl SsoClient {
    /// Build a client from configuration
    ///
    /// # Errors
    /// * Returns `IdentityError::Request` if the HTTP client cannot be built
    pub fn new(config: &SsoConfig) -> Result<Self, IdentityError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self::with_base_url(client, &config.base_url))
    }

    /// Build a client against an explicit base URL (used by tests)
    pub fn with_base_url(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn call<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, IdentityError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(url = %url, "Calling SSO service");

        let response = self.client.post(&url).json(body).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error body".to_string());
            tracing::error!(
                status_code = status.as_u16(),
                error_body = %body,
                path,
                "SSO service returned error status"
            );
            return Err(IdentityError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text().await?;
        serde_json::from_str(&text)
            .map_err(|e| IdentityError::Decode(format!("{} - Response body: {}", e, text)))
    }
}

#[async_trait]
impl IdentityProvider for SsoClient {
    async fn register(
        &self,
        email: &str,
        password: &str,
        uid_in_app: i64,
    ) -> Result<i64, IdentityError> {
        let response: RegisterResponse = self
            .call(
                "/register",
                &RegisterRequest {
                    email,
                    password,
                    uid_in_app,
                },
            )
            .await?;
        Ok(response.user_id)
    }

    async fn login(
        &self,
        email: &str,
        password: &str,
        app_id: i32,
    ) -> Result<String, IdentityError> {
        let response: LoginResponse = self
            .call(
                "/login",
                &LoginRequest {
                    email,
                    password,
                    app_id,
                },
            )
            .await?;
        Ok(response.token)
    }

    async fn is_admin(&self, uid_in_app: i64) -> Result<bool, IdentityError> {
        let response: IsAdminResponse = self
            .call("/is-admin", &IsAdminRequest { uid_in_app })
            .await?;
        Ok(response.is_admin)
    }
}
