//! User records and the message quota ledger

use super::{Database, QuotaLedger, User, UserRepository};
use crate::error::AppError;
use async_trait::async_trait;
use tracing::debug;

const USER_COLUMNS: &str =
    "id, email, plan, plan_bought_date, messages_left, bytes_data_left, bots_left";

#[async_trait]
impl UserRepository for Database {
    async fn user(&self, id: i64) -> Result<User, AppError> {
        let query = format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS);
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user {} does not exist", id)))
    }

    async fn user_by_email(&self, email: &str) -> Result<User, AppError> {
        let query = format!("SELECT {} FROM users WHERE email = ?", USER_COLUMNS);
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user {} does not exist", email)))
    }

    async fn save_user(&self, user: &User) -> Result<i64, AppError> {
        let result = sqlx::query(
            "INSERT INTO users (email, plan, plan_bought_date, messages_left, bytes_data_left, bots_left) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&user.email)
        .bind(&user.plan)
        .bind(user.plan_bought_date)
        .bind(user.messages_left)
        .bind(user.bytes_data_left)
        .bind(user.bots_left)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Storage(format!("Failed to create user: {}", e)))?;

        let id = result.last_insert_rowid();
        debug!(user_id = id, "Created user");
        Ok(id)
    }

    async fn update_plan(&self, id: i64, user: &User) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE users SET plan = ?, plan_bought_date = ?, messages_left = ?, bytes_data_left = ?, bots_left = ? WHERE id = ?",
        )
        .bind(&user.plan)
        .bind(user.plan_bought_date)
        .bind(user.messages_left)
        .bind(user.bytes_data_left)
        .bind(user.bots_left)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Storage(format!("Failed to update plan: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("user {} does not exist", id)));
        }
        debug!(user_id = id, plan = %user.plan, "Updated user plan");
        Ok(())
    }
}

#[async_trait]
impl QuotaLedger for Database {
    async fn decrement_messages_left(&self, user_id: i64) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE users SET messages_left = messages_left - 1 WHERE id = ?")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to update messages left: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("user {} does not exist", user_id)));
        }
        Ok(())
    }
}
