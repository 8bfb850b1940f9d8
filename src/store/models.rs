//! Storage data models
//!
//! Defines structures for users, chat-bots and uploaded file metadata.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

/// Subscription plan of a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Plan {
    /// Default plan given on registration
    #[serde(rename = "free_plan")]
    Free,
    /// Mid tier
    #[serde(rename = "business_plan")]
    Business,
    /// Top tier
    #[serde(rename = "enterprise_plan")]
    Enterprise,
}

/// Allowances granted when a plan is bought
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanAllowance {
    /// Assistant replies the user may receive
    pub messages: i64,
    /// Bytes of uploaded files
    pub bytes_data: i64,
    /// Chat-bots the user may own
    pub bots: i64,
}

impl Plan {
    /// Convert the plan to its string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Plan::Free => "free_plan",
            Plan::Business => "business_plan",
            Plan::Enterprise => "enterprise_plan",
        }
    }

    /// Allowances that come with this plan
    pub fn allowance(&self) -> PlanAllowance {
        match self {
            Plan::Free => PlanAllowance {
                messages: 20,
                bytes_data: 1024 * 1024,
                bots: 1,
            },
            Plan::Business => PlanAllowance {
                messages: 2500,
                bytes_data: 100 * 1024 * 1024,
                bots: 3,
            },
            Plan::Enterprise => PlanAllowance {
                messages: 10_000,
                bytes_data: 500 * 1024 * 1024,
                bots: 10,
            },
        }
    }
}

impl FromStr for Plan {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "free_plan" => Ok(Plan::Free),
            "business_plan" => Ok(Plan::Business),
            "enterprise_plan" => Ok(Plan::Enterprise),
            other => Err(format!("unknown plan: {}", other)),
        }
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registered user and their remaining allowances
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct User {
    /// Unique identifier for the user
    pub id: i64,
    /// Login email
    pub email: String,
    /// Plan name (stored as "free_plan", "business_plan", ...)
    pub plan: String,
    /// When the current plan was bought (Unix timestamp)
    pub plan_bought_date: i64,
    /// Assistant replies left
    pub messages_left: i64,
    /// Upload bytes left
    pub bytes_data_left: i64,
    /// Chat-bots the user may still create
    pub bots_left: i64,
}

impl User {
    /// Build a user with the allowances of `plan`, bought now
    pub fn with_plan(email: String, plan: Plan) -> Self {
        let allowance = plan.allowance();
        Self {
            id: 0,
            email,
            plan: plan.as_str().to_string(),
            plan_bought_date: Utc::now().timestamp(),
            messages_left: allowance.messages,
            bytes_data_left: allowance.bytes_data,
            bots_left: allowance.bots,
        }
    }

    /// Get plan_bought_date as DateTime
    pub fn plan_bought_datetime(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.plan_bought_date, 0).unwrap_or_else(Utc::now)
    }
}

/// A chat-bot backed by a remote assistant and vector store
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct ChatBot {
    /// Unique identifier for the chat-bot
    pub id: i64,
    /// Remote assistant handle
    pub assistant_id: String,
    /// Remote vector store handle
    pub vector_store_id: String,
    /// Owning user
    pub owner_id: i64,
    /// Display name
    pub name: String,
    /// Free-form description
    pub description: String,
    /// System instructions given to the assistant
    pub instructions: String,
}

/// Metadata of a file attached to a chat-bot
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct StoredFile {
    /// Unique identifier for the file record
    pub id: i64,
    /// Chat-bot the file belongs to
    pub chat_bot_id: i64,
    /// Owning user
    pub owner_id: i64,
    /// Remote file handle
    pub openai_file_id: String,
    /// Original filename
    pub filename: String,
    /// Size in bytes, returned to the allowance on removal
    pub file_size: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_round_trip_names() {
        for plan in [Plan::Free, Plan::Business, Plan::Enterprise] {
            assert_eq!(plan.as_str().parse::<Plan>().unwrap(), plan);
        }
        assert!("gold_plan".parse::<Plan>().is_err());
    }

    #[test]
    fn test_user_with_plan_allowance() {
        let user = User::with_plan("a@b.com".to_string(), Plan::Business);
        assert_eq!(user.plan, "business_plan");
        assert_eq!(user.messages_left, 2500);
        assert_eq!(user.bytes_data_left, 100 * 1024 * 1024);
        assert_eq!(user.bots_left, 3);
    }
}
