//! User use cases

use super::log_failure;
use crate::error::AppError;
use crate::store::{User, UserRepository};
use crate::validate;
use std::sync::Arc;
use tracing::info;

/// Account and plan management
pub struct UserService {
    users: Arc<dyn UserRepository>,
}

impl UserService {
    /// Create the service
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// A user by id
    pub async fn user(&self, id: i64) -> Result<User, AppError> {
        validate::owner_id(id)?;
        self.users.user(id).await.map_err(log_failure("fetch user"))
    }

    /// A user by email
    pub async fn user_by_email(&self, email: &str) -> Result<User, AppError> {
        validate::email(email)?;
        self.users
            .user_by_email(email)
            .await
            .map_err(log_failure("fetch user by email"))
    }

    /// Create an account with the allowances of `plan`
    ///
    /// The password is only checked here; the identity provider stores it.
    pub async fn save_user(&self, email: &str, password: &str, plan: &str) -> Result<i64, AppError> {
        let plan = validate::save_user(email, password, plan)?;
        let id = self
            .users
            .save_user(&User::with_plan(email.to_string(), plan))
            .await
            .map_err(log_failure("insert user"))?;

        info!(user_id = id, plan = %plan, "User created");
        Ok(id)
    }

    /// Switch to `plan`, resetting every allowance and the bought date
    pub async fn update_plan(&self, id: i64, plan: &str) -> Result<(), AppError> {
        validate::owner_id(id)?;
        let plan = validate::plan(plan)?;

        let mut user = User::with_plan(String::new(), plan);
        user.id = id;
        self.users
            .update_plan(id, &user)
            .await
            .map_err(log_failure("update plan"))?;

        info!(user_id = id, plan = %plan, "Plan updated");
        Ok(())
    }
}
