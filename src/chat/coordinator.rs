//! Chat session coordinator
//!
//! Turns one user message into exactly one `AssistantResponse`:
//! append the message to the thread, start a run, poll it, fetch the
//! answer. A completed answer is charged to the caller through
//! `QuotaJobs` after it has been handed to the reply channel.

use super::poll::{poll_run, PollOutcome, PollPolicy};
use super::quota::QuotaJobs;
use super::session::{AssistantResponse, Session, Turn};
use crate::assistant::AssistantGateway;
use crate::error::AppError;
use crate::store::ChatBotRepository;
use crate::validate;
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

/// Drives chat turns against the assistant gateway
pub struct ChatCoordinator {
    chat_bots: Arc<dyn ChatBotRepository>,
    gateway: Arc<dyn AssistantGateway>,
    quota: QuotaJobs,
    policy: PollPolicy,
}

impl ChatCoordinator {
    /// Coordinator using `PollPolicy::STANDARD`
    pub fn new(
        chat_bots: Arc<dyn ChatBotRepository>,
        gateway: Arc<dyn AssistantGateway>,
        quota: QuotaJobs,
    ) -> Self {
        Self {
            chat_bots,
            gateway,
            quota,
            policy: PollPolicy::STANDARD,
        }
    }

    /// Open a thread for a chat-bot owned by `owner_id`
    ///
    /// # Errors
    /// * `AppError::Validation` for non-positive ids, before any other call
    /// * `AppError::NotFound` if the chat-bot is missing or not owned
    /// * `AppError::Gateway` if the thread cannot be created
    pub async fn start_session(&self, chat_bot_id: i64, owner_id: i64) -> Result<Session, AppError> {
        validate::chat_bot_id(chat_bot_id)?;
        validate::owner_id(owner_id)?;

        self.chat_bots.chat_bot(chat_bot_id, owner_id).await?;
        let thread_id = self.gateway.create_thread().await?;

        info!(chat_bot_id, owner_id, thread_id = %thread_id, "Chat session started");
        Ok(Session {
            chat_bot_id,
            owner_id,
            thread_id,
        })
    }

    /// Run one turn and deliver its response on `reply`
    ///
    /// Exactly one value is sent on `reply` whatever the outcome. If the
    /// receiver is gone the response is discarded.
    pub async fn send(&self, turn: Turn, reply: oneshot::Sender<AssistantResponse>) {
        let response = match self.answer(&turn).await {
            Ok(content) => {
                info!(
                    chat_bot_id = turn.chat_bot_id,
                    thread_id = %turn.thread_id,
                    outcome = "completed",
                    "Chat turn finished"
                );
                AssistantResponse::completed(content)
            }
            Err(e) => {
                let outcome = match e {
                    AppError::Timeout(_) => "timed_out",
                    _ => "failed",
                };
                warn!(
                    chat_bot_id = turn.chat_bot_id,
                    thread_id = %turn.thread_id,
                    outcome,
                    error = %e,
                    "Chat turn finished"
                );
                AssistantResponse::failed(e)
            }
        };

        let completed = response.is_completed();
        if reply.send(response).is_err() {
            debug!(
                chat_bot_id = turn.chat_bot_id,
                thread_id = %turn.thread_id,
                "Receiver dropped, discarding chat response"
            );
        }
        if completed {
            self.quota.submit(turn.owner_id);
        }
    }

    /// Run `send` on its own task and hand back the receiving end
    pub fn dispatch(self: &Arc<Self>, turn: Turn) -> oneshot::Receiver<AssistantResponse> {
        let (tx, rx) = oneshot::channel();
        let coordinator = Arc::clone(self);
        tokio::spawn(async move { coordinator.send(turn, tx).await });
        rx
    }

    /// Delete the remote assistant, then its vector store
    ///
    /// Stops at the first failure. A vector-store failure leaves the
    /// assistant already deleted.
    pub async fn remove_bot_side_effects(
        &self,
        assistant_id: &str,
        vector_store_id: &str,
    ) -> Result<(), AppError> {
        self.gateway.delete_assistant(assistant_id).await?;
        self.gateway
            .delete_vector_store(vector_store_id)
            .await
            .map_err(|e| {
                warn!(
                    assistant_id,
                    vector_store_id,
                    error = %e,
                    "Assistant deleted but vector store was not"
                );
                e
            })?;
        Ok(())
    }

    async fn answer(&self, turn: &Turn) -> Result<String, AppError> {
        validate::send_message(turn.chat_bot_id, &turn.thread_id, &turn.prompt)?;
        validate::owner_id(turn.owner_id)?;

        let chat_bot = self.chat_bots.chat_bot(turn.chat_bot_id, turn.owner_id).await?;

        self.gateway
            .add_message_to_thread(&turn.thread_id, &turn.prompt)
            .await?;
        let run_id = self
            .gateway
            .create_run(&turn.thread_id, &chat_bot.assistant_id)
            .await?;
        debug!(thread_id = %turn.thread_id, run_id = %run_id, "Run submitted");

        match poll_run(self.gateway.as_ref(), &turn.thread_id, &run_id, self.policy).await? {
            PollOutcome::Completed { .. } => Ok(self
                .gateway
                .latest_assistant_response(&turn.thread_id)
                .await?),
            PollOutcome::TimedOut => Err(AppError::Timeout(format!(
                "run {} did not complete within {} attempts",
                run_id, self.policy.max_attempts
            ))),
        }
    }
}
