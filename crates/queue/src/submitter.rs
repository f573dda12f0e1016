//! The [`TaskSubmitter`] capability.
//!
//! A submitter hands one task off for asynchronous execution. "Hand-off"
//! means getting the task accepted by the backend, not waiting for the
//! generated artifact; how much work happens before acceptance is the
//! backend's business. The backend is chosen once, at construction time
//! of the [`Dispatcher`](crate::dispatcher::Dispatcher) — there is no
//! runtime environment branch.

use async_trait::async_trait;

use imgforge_core::types::TaskId;

/// Errors produced by a failed hand-off.
///
/// A submission error affects only the task being submitted; sibling
/// submissions in the same batch proceed regardless.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    /// The backend refused the submission (non-success HTTP status,
    /// unknown task id).
    #[error("Submission rejected: {0}")]
    Rejected(String),

    /// The backend could not be reached.
    #[error("Transport error: {0}")]
    Transport(String),
}

/// Hands a single task off to the execution backend.
#[async_trait]
pub trait TaskSubmitter: Send + Sync {
    /// Submit one task. Returns once the hand-off has succeeded or
    /// failed.
    async fn submit(&self, task_id: TaskId) -> Result<(), SubmitError>;
}
