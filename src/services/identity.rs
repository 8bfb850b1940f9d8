//! Identity use cases
//!
//! Thin validated wrappers over the identity provider.

use crate::error::AppError;
use crate::sso::IdentityProvider;
use crate::validate;
use std::sync::Arc;
use tracing::error;

/// Registration, login and admin checks
pub struct IdentityService {
    provider: Arc<dyn IdentityProvider>,
    app_id: i32,
}

impl IdentityService {
    /// Create the service for application `app_id`
    pub fn new(provider: Arc<dyn IdentityProvider>, app_id: i32) -> Self {
        Self { provider, app_id }
    }

    /// Register credentials for local user `uid`
    pub async fn register(&self, email: &str, password: &str, uid: i64) -> Result<i64, AppError> {
        validate::register(email, password, uid)?;
        self.provider
            .register(email, password, uid)
            .await
            .map_err(|e| {
                error!(uid, error = %e, "Error registering user with sso");
                e.into()
            })
    }

    /// Exchange credentials for a token
    pub async fn login(&self, email: &str, password: &str) -> Result<String, AppError> {
        validate::login(email, password)?;
        self.provider
            .login(email, password, self.app_id)
            .await
            .map_err(|e| {
                error!(app_id = self.app_id, error = %e, "Error logging user in with sso");
                e.into()
            })
    }

    /// Whether `uid` is an admin
    pub async fn is_admin(&self, uid: i64) -> Result<bool, AppError> {
        validate::owner_id(uid)?;
        self.provider.is_admin(uid).await.map_err(|e| {
            error!(uid, error = %e, "Error checking admin role with sso");
            e.into()
        })
    }
}
