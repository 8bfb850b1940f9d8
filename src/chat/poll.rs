//! Run polling
//!
//! A run is checked at a fixed interval with a fixed attempt budget.
//! Status lookups are the only calls that are ever repeated, and a failed
//! lookup is not.

use crate::assistant::{AssistantGateway, GatewayError};
use std::time::Duration;
use tracing::debug;

/// Interval and attempt budget for run polling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Sleep between two status checks
    pub interval: Duration,
    /// Status checks before giving up
    pub max_attempts: u32,
}

impl PollPolicy {
    /// 200 ms interval, 25 attempts (5 s budget)
    pub const STANDARD: PollPolicy = PollPolicy {
        interval: Duration::from_millis(200),
        max_attempts: 25,
    };

    /// Total time budget of the policy
    pub fn budget(&self) -> Duration {
        self.interval * self.max_attempts
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// How polling ended when no lookup failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// The run reached `completed` on the given attempt
    Completed {
        /// 1-based attempt that saw `completed`
        attempt: u32,
    },
    /// The budget ran out
    TimedOut,
}

/// Poll `run_id` until it completes or the budget is spent
///
/// Any status other than `completed` consumes an attempt, terminal
/// failures included. A lookup error aborts immediately.
pub async fn poll_run(
    gateway: &dyn AssistantGateway,
    thread_id: &str,
    run_id: &str,
    policy: PollPolicy,
) -> Result<PollOutcome, GatewayError> {
    for attempt in 1..=policy.max_attempts {
        let run = gateway.get_run(thread_id, run_id).await?;
        debug!(
            thread_id = %thread_id,
            run_id = %run_id,
            attempt,
            status = ?run.status,
            "Polled run status"
        );

        if run.status.is_completed() {
            return Ok(PollOutcome::Completed { attempt });
        }
        if attempt < policy.max_attempts {
            tokio::time::sleep(policy.interval).await;
        }
    }

    Ok(PollOutcome::TimedOut)
}
