//! Input validators
//!
//! Pure checks run before any storage or network call. Every failure is an
//! `AppError::Validation`.

use crate::error::AppError;
use crate::store::Plan;

/// Minimum accepted password length
pub const MIN_PASSWORD_LENGTH: usize = 8;

fn invalid(message: impl Into<String>) -> AppError {
    AppError::Validation(message.into())
}

/// Chat-bot ids are positive
pub fn chat_bot_id(id: i64) -> Result<(), AppError> {
    if id <= 0 {
        return Err(invalid(format!("invalid chat-bot id provided {}", id)));
    }
    Ok(())
}

/// Owner (user) ids are positive
pub fn owner_id(id: i64) -> Result<(), AppError> {
    if id <= 0 {
        return Err(invalid(format!("invalid owner id provided {}", id)));
    }
    Ok(())
}

/// File ids are positive and owned by a valid user
pub fn file(id: i64, owner: i64) -> Result<(), AppError> {
    if id <= 0 {
        return Err(invalid(format!("invalid file id provided {}", id)));
    }
    owner_id(owner)
}

/// A new chat-bot needs a name
pub fn save_chat_bot(name: &str) -> Result<(), AppError> {
    if name.trim().is_empty() {
        return Err(invalid("empty chat-bot name provided"));
    }
    Ok(())
}

/// Updates cannot clear the name
pub fn update_chat_bot(id: i64, owner: i64, name: &str) -> Result<(), AppError> {
    chat_bot_id(id)?;
    owner_id(owner)?;
    if name.trim().is_empty() {
        return Err(invalid("cannot clear chat-bot name"));
    }
    Ok(())
}

/// Preconditions of a single chat turn
pub fn send_message(bot_id: i64, thread_id: &str, prompt: &str) -> Result<(), AppError> {
    chat_bot_id(bot_id)?;
    if thread_id.is_empty() {
        return Err(invalid("empty thread id passed"));
    }
    if prompt.is_empty() {
        return Err(invalid("cannot send empty user prompt"));
    }
    Ok(())
}

/// Uploaded files need a name and content
pub fn save_file(filename: &str, data: &[u8]) -> Result<(), AppError> {
    if filename.is_empty() {
        return Err(invalid("empty filename is provided"));
    }
    if data.is_empty() {
        return Err(invalid("empty file is provided"));
    }
    Ok(())
}

/// Loose shape check, the identity provider owns real verification
pub fn email(email: &str) -> Result<(), AppError> {
    if email.is_empty() {
        return Err(invalid("empty email provided"));
    }
    if !email.contains('@') || !email.contains('.') {
        return Err(invalid("invalid email format"));
    }
    Ok(())
}

/// Password length check
pub fn password(password: &str) -> Result<(), AppError> {
    if password.is_empty() {
        return Err(invalid("empty password provided"));
    }
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(invalid("password is too short"));
    }
    Ok(())
}

/// Parse a plan name
pub fn plan(plan: &str) -> Result<Plan, AppError> {
    plan.parse::<Plan>()
        .map_err(|_| invalid("invalid user plan provided"))
}

/// New account: known plan, plausible email, long enough password
pub fn save_user(email_addr: &str, pass: &str, plan_name: &str) -> Result<Plan, AppError> {
    let parsed = plan(plan_name)?;
    email(email_addr)?;
    password(pass)?;
    Ok(parsed)
}

/// Login credentials
pub fn login(email_addr: &str, pass: &str) -> Result<(), AppError> {
    email(email_addr)?;
    if pass.len() < MIN_PASSWORD_LENGTH {
        return Err(invalid("password is too short"));
    }
    Ok(())
}

/// Registration with the identity provider
pub fn register(email_addr: &str, pass: &str, uid: i64) -> Result<(), AppError> {
    owner_id(uid)?;
    login(email_addr, pass)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(result: Result<(), AppError>) -> String {
        match result {
            Err(AppError::Validation(msg)) => msg,
            other => panic!("Expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_ids() {
        assert!(chat_bot_id(1).is_ok());
        assert!(message(chat_bot_id(0)).contains("invalid chat-bot id provided"));
        assert!(message(chat_bot_id(-1)).contains("invalid chat-bot id provided"));
        assert!(owner_id(7).is_ok());
        assert!(message(owner_id(0)).contains("invalid owner id provided"));
        assert!(message(file(0, 1)).contains("invalid file id provided"));
        assert!(message(file(1, 0)).contains("invalid owner id provided"));
    }

    #[test]
    fn test_chat_bot_names() {
        assert!(save_chat_bot("Test Bot").is_ok());
        assert_eq!(message(save_chat_bot("")), "empty chat-bot name provided");
        assert!(update_chat_bot(1, 1, "Updated Bot").is_ok());
        assert_eq!(message(update_chat_bot(1, 1, "  ")), "cannot clear chat-bot name");
        assert!(message(update_chat_bot(1, 0, "x")).contains("invalid owner id"));
    }

    #[test]
    fn test_send_message() {
        assert!(send_message(1, "thread1", "Hello").is_ok());
        assert!(message(send_message(0, "thread1", "Hello")).contains("invalid chat-bot id"));
        assert_eq!(message(send_message(1, "", "Hello")), "empty thread id passed");
        assert_eq!(
            message(send_message(1, "thread1", "")),
            "cannot send empty user prompt"
        );
        // Only emptiness is checked; content and length are the provider's business
        assert!(send_message(1, "thread1", "   ").is_ok());
        assert!(send_message(1, "thread1", &"a".repeat(20_000)).is_ok());
    }

    #[test]
    fn test_files() {
        assert!(save_file("notes.txt", b"data").is_ok());
        assert_eq!(message(save_file("", b"data")), "empty filename is provided");
        assert_eq!(message(save_file("notes.txt", b"")), "empty file is provided");
    }

    #[test]
    fn test_users() {
        assert_eq!(
            save_user("a@b.com", "password123", "free_plan").unwrap(),
            Plan::Free
        );
        assert!(save_user("a@b.com", "password123", "gold_plan").is_err());
        assert!(save_user("ab.com", "password123", "free_plan").is_err());
        assert!(save_user("a@b.com", "short", "free_plan").is_err());
        assert_eq!(message(email("")), "empty email provided");
        assert!(login("a@b.com", "password123").is_ok());
        assert!(register("a@b.com", "password123", 0).is_err());
        assert!(register("a@b.com", "password123", 3).is_ok());
    }
}
