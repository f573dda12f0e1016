//! Bounded-concurrency batch dispatcher.
//!
//! Submits every task id in a batch through the configured
//! [`TaskSubmitter`], with at most `max_concurrency` hand-offs in
//! flight at once. Submissions start in input order; completion order
//! is unspecified because concurrent hand-offs race.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Semaphore;

use imgforge_core::error::CoreError;
use imgforge_core::types::TaskId;

use crate::submitter::TaskSubmitter;

/// Default cap on concurrent hand-offs.
pub const DEFAULT_MAX_CONCURRENCY: usize = 5;

/// Result of dispatching one batch. Always covers the full input set:
/// individual hand-off failures are counted, never raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DispatchOutcome {
    pub enqueued: usize,
    pub failed: usize,
}

/// The concurrency-bounded scheduler.
///
/// Built once at process start with an explicit submitter and cap, then
/// shared by reference — configuration is injection, not ambient state.
pub struct Dispatcher {
    submitter: Arc<dyn TaskSubmitter>,
    semaphore: Arc<Semaphore>,
    max_concurrency: usize,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("max_concurrency", &self.max_concurrency)
            .finish_non_exhaustive()
    }
}

impl Dispatcher {
    /// Create a dispatcher over `submitter` with the given cap.
    ///
    /// Fails with [`CoreError::InvalidRequest`] when `max_concurrency`
    /// is zero.
    pub fn new(
        submitter: Arc<dyn TaskSubmitter>,
        max_concurrency: usize,
    ) -> Result<Self, CoreError> {
        if max_concurrency < 1 {
            return Err(CoreError::InvalidRequest(
                "max_concurrency must be at least 1".into(),
            ));
        }
        Ok(Self {
            submitter,
            semaphore: Arc::new(Semaphore::new(max_concurrency)),
            max_concurrency,
        })
    }

    /// The configured concurrency cap.
    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    /// Submit every id in `task_ids`, respecting the concurrency cap.
    ///
    /// All submissions are attempted even when some fail; a hand-off
    /// failure (or a panicked submission) counts toward `failed` and
    /// does not disturb the rest of the batch. Fails with
    /// [`CoreError::InvalidRequest`] only for an empty batch.
    pub async fn dispatch(&self, task_ids: &[TaskId]) -> Result<DispatchOutcome, CoreError> {
        if task_ids.is_empty() {
            return Err(CoreError::InvalidRequest(
                "task_ids must not be empty".into(),
            ));
        }

        let mut handles = Vec::with_capacity(task_ids.len());
        for &task_id in task_ids {
            // Acquiring in the loop keeps submission start order equal
            // to input order; once acquired, hand-offs race freely.
            let permit = Arc::clone(&self.semaphore)
                .acquire_owned()
                .await
                .map_err(|e| CoreError::Internal(format!("dispatch semaphore closed: {e}")))?;
            let submitter = Arc::clone(&self.submitter);
            handles.push(tokio::spawn(async move {
                let result = submitter.submit(task_id).await;
                drop(permit);
                if let Err(ref e) = result {
                    tracing::error!(task_id = %task_id, error = %e, "Task hand-off failed");
                }
                result.is_ok()
            }));
        }

        let mut outcome = DispatchOutcome {
            enqueued: 0,
            failed: 0,
        };
        for result in futures::future::join_all(handles).await {
            match result {
                Ok(true) => outcome.enqueued += 1,
                // A rejected hand-off and a panicked submission both
                // count as one failed task, nothing more.
                Ok(false) | Err(_) => outcome.failed += 1,
            }
        }

        tracing::info!(
            enqueued = outcome.enqueued,
            failed = outcome.failed,
            max_concurrency = self.max_concurrency,
            "Batch dispatch finished",
        );
        Ok(outcome)
    }
}
