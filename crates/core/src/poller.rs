//! Waits for an assistant run to finish.
//!
//! The service only exposes run progress through polling, so this loop bridges
//! a request/response caller onto the asynchronous run. Every wait is bounded by
//! a [`PollPolicy`] and can be interrupted through a [`CancellationToken`].

use crate::error::BridgeError;
use openai_assistants::AssistantsApi;
use openai_assistants::types::{ListMessagesQuery, MessageList, RunStatus};
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);
pub const DEFAULT_MAX_ATTEMPTS: u32 = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct PollPolicy {
    interval: Duration,
    max_attempts: u32,
    deadline: Option<Duration>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            deadline: None,
        }
    }
}

impl PollPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Upper bound on status checks. Clamped to at least one.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Total time allowed from the first status check.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline
    }

    fn exhausted(&self, attempts: u32, started: Instant) -> bool {
        attempts >= self.max_attempts
            || self
                .deadline
                .is_some_and(|deadline| started.elapsed() + self.interval > deadline)
    }
}

/// Polls `run_id` until it completes and returns the thread's messages, newest first.
///
/// Terminal states other than `completed` are reported as [`BridgeError::RunFailed`].
/// When the policy runs out or `cancel` fires, the run is cancelled on the service
/// side before returning.
pub async fn wait_for_completion<A>(
    api: &A,
    policy: &PollPolicy,
    thread_id: &str,
    run_id: &str,
    cancel: &CancellationToken,
) -> Result<MessageList, BridgeError>
where
    A: AssistantsApi + ?Sized,
{
    let started = Instant::now();
    let mut attempts = 0u32;

    loop {
        attempts += 1;
        let run = match cancellable(cancel, api.retrieve_run(thread_id, run_id)).await {
            Err(BridgeError::Cancelled) => {
                abandon_run(api, thread_id, run_id).await;
                return Err(BridgeError::Cancelled);
            }
            result => result?,
        };
        match run.status() {
            RunStatus::Completed => {
                tracing::info!("run {} completed after {} checks", run_id, attempts);
                let query = ListMessagesQuery::new();
                return cancellable(cancel, api.list_messages(thread_id, query)).await;
            }
            status if status.is_pending() => {
                tracing::debug!("waiting for run {} ({}), check {}", run_id, status, attempts);
            }
            status => {
                return Err(BridgeError::RunFailed {
                    run_id: run_id.to_string(),
                    status,
                    reason: run.last_error().map(|e| e.message().to_string()),
                });
            }
        }

        if policy.exhausted(attempts, started) {
            tracing::warn!("giving up on run {} after {} checks", run_id, attempts);
            abandon_run(api, thread_id, run_id).await;
            return Err(BridgeError::RunTimedOut {
                run_id: run_id.to_string(),
                attempts,
            });
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                abandon_run(api, thread_id, run_id).await;
                return Err(BridgeError::Cancelled);
            }
            _ = tokio::time::sleep(policy.interval) => {}
        }
    }
}

/// Awaits a service call unless `cancel` fires first.
///
/// An already cancelled token wins without the call being polled, so nothing
/// reaches the service.
pub(crate) async fn cancellable<T, E, F>(
    cancel: &CancellationToken,
    call: F,
) -> Result<T, BridgeError>
where
    F: Future<Output = Result<T, E>>,
    E: Into<BridgeError>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(BridgeError::Cancelled),
        result = call => result.map_err(Into::into),
    }
}

// Best effort; the caller already has its own error to report.
async fn abandon_run<A>(api: &A, thread_id: &str, run_id: &str)
where
    A: AssistantsApi + ?Sized,
{
    if let Err(e) = api.cancel_run(thread_id, run_id).await {
        tracing::warn!("failed to cancel run {}: {}", run_id, e);
    }
}
