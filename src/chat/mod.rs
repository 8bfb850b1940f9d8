//! Chat Session Coordinator
//!
//! Bridges a duplex client connection and the polled assistant API.
//! One `Session` per connection, one spawned task per user message, one
//! `AssistantResponse` per task.

pub mod coordinator;
pub mod poll;
pub mod quota;
pub mod session;

pub use coordinator::ChatCoordinator;
pub use poll::{PollOutcome, PollPolicy};
pub use quota::{drain as drain_quota_jobs, QuotaJob, QuotaJobs};
pub use session::{AssistantResponse, Session, Turn};
