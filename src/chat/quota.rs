//! Quota decrement jobs
//!
//! Completed turns are charged through a job queue drained by a single
//! worker task, so the storage round trip never sits on the response path.
//! A failed decrement is logged and dropped.

use crate::store::QuotaLedger;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// One message to charge to a user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaJob {
    /// User whose `messages_left` goes down by one
    pub user_id: i64,
}

/// Submission side of the quota job queue
#[derive(Clone)]
pub struct QuotaJobs {
    tx: mpsc::UnboundedSender<QuotaJob>,
}

impl QuotaJobs {
    /// Start the worker; it stops once every `QuotaJobs` handle is dropped
    pub fn spawn(ledger: Arc<dyn QuotaLedger>) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let worker = tokio::spawn(run_worker(rx, ledger));
        (Self { tx }, worker)
    }

    /// Queue a decrement for `user_id`
    pub fn submit(&self, user_id: i64) {
        if self.tx.send(QuotaJob { user_id }).is_err() {
            error!(user_id, "Quota worker is gone, message not charged");
        }
    }
}

/// Wait up to `grace` for the worker to apply every queued job
///
/// The worker only finishes once all `QuotaJobs` handles are dropped, so
/// callers drop the coordinator first. Returns false if jobs may be lost.
pub async fn drain(worker: JoinHandle<()>, grace: Duration) -> bool {
    match tokio::time::timeout(grace, worker).await {
        Ok(Ok(())) => {
            info!("Quota jobs drained");
            true
        }
        Ok(Err(e)) => {
            error!(error = %e, "Quota worker panicked, pending charges lost");
            false
        }
        Err(_) => {
            warn!(
                grace_ms = grace.as_millis() as u64,
                "Quota worker still busy at shutdown, pending charges lost"
            );
            false
        }
    }
}

async fn run_worker(mut rx: mpsc::UnboundedReceiver<QuotaJob>, ledger: Arc<dyn QuotaLedger>) {
    while let Some(job) = rx.recv().await {
        match ledger.decrement_messages_left(job.user_id).await {
            Ok(()) => debug!(user_id = job.user_id, "Decremented messages left"),
            Err(e) => error!(
                user_id = job.user_id,
                error = %e,
                "Failed to decrement messages left"
            ),
        }
    }
    debug!("Quota worker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeLedger;

    #[tokio::test]
    async fn test_jobs_are_applied_in_order() {
        let ledger = Arc::new(FakeLedger::default());
        let (jobs, worker) = QuotaJobs::spawn(ledger.clone());

        jobs.submit(1);
        jobs.submit(2);
        jobs.submit(1);
        drop(jobs);
        worker.await.unwrap();

        assert_eq!(ledger.decrements(), vec![1, 2, 1]);
    }

    #[tokio::test]
    async fn test_failures_do_not_stop_the_worker() {
        let ledger = Arc::new(FakeLedger::failing());
        let (jobs, worker) = QuotaJobs::spawn(ledger.clone());

        jobs.submit(1);
        jobs.submit(2);
        drop(jobs);
        worker.await.unwrap();

        // Each job attempted exactly once, none retried
        assert_eq!(ledger.decrements(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_drain_waits_for_queued_jobs() {
        let ledger = Arc::new(FakeLedger::default());
        let (jobs, worker) = QuotaJobs::spawn(ledger.clone());

        jobs.submit(3);
        jobs.submit(4);
        drop(jobs);

        assert!(drain(worker, Duration::from_secs(5)).await);
        assert_eq!(ledger.decrements(), vec![3, 4]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drain_gives_up_while_handles_remain() {
        let ledger = Arc::new(FakeLedger::default());
        let (jobs, worker) = QuotaJobs::spawn(ledger.clone());
        jobs.submit(1);

        assert!(!drain(worker, Duration::from_secs(1)).await);
        // Jobs queued before the deadline were still applied
        assert_eq!(ledger.decrements(), vec![1]);
        drop(jobs);
    }
}
