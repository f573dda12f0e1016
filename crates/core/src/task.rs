//! The [`Task`] entity and its lifecycle state machine.
//!
//! A task moves along `pending → running → {completed | failed}`. The
//! only back-edge is `failed → pending`, taken by the retry path while
//! the retry budget lasts. All transition rules live here as pure
//! functions; the lifecycle manager in the engine crate persists the
//! results.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::status::TaskStatus;
use crate::types::{ArtifactId, JobId, TaskId, Timestamp};

/// Maximum number of recorded failures before retries are refused.
pub const RETRY_LIMIT: u32 = 3;

/// Error message recorded on tasks failed by job cancellation.
pub const CANCELLED_TASK_ERROR: &str = "Job cancelled";

/// One unit of generation work belonging to a [`Job`](crate::job::Job).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    /// Owning job; immutable after creation.
    pub job_id: JobId,
    pub prompt: String,
    pub style: String,
    pub status: TaskStatus,
    /// Reference to the executor's output. Set only on `completed`.
    pub result_ref: Option<ArtifactId>,
    /// Generation cost reported by the executor. Set only on `completed`.
    pub cost: Option<f64>,
    /// Set only on `failed`.
    pub error_message: Option<String>,
    /// Total recorded failures. Never reset; capped by [`RETRY_LIMIT`].
    pub retry_count: u32,
    pub created_at: Timestamp,
    pub started_at: Option<Timestamp>,
    pub completed_at: Option<Timestamp>,
}

/// A requested lifecycle transition.
#[derive(Debug, Clone)]
pub enum TaskTransition {
    /// `pending → running`.
    Start,
    /// `running → completed`, recording the artifact and its cost.
    Complete { result_ref: ArtifactId, cost: f64 },
    /// `running → failed`, recording the error and consuming one unit
    /// of the retry budget.
    Fail { error_message: String },
}

impl TaskTransition {
    /// Status this transition moves into.
    pub fn target(&self) -> TaskStatus {
        match self {
            TaskTransition::Start => TaskStatus::Running,
            TaskTransition::Complete { .. } => TaskStatus::Completed,
            TaskTransition::Fail { .. } => TaskStatus::Failed,
        }
    }
}

impl Task {
    /// Create a fresh `pending` task for a job.
    pub fn new(job_id: JobId, prompt: impl Into<String>, style: impl Into<String>, now: Timestamp) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            job_id,
            prompt: prompt.into(),
            style: style.into(),
            status: TaskStatus::Pending,
            result_ref: None,
            cost: None,
            error_message: None,
            retry_count: 0,
            created_at: now,
            started_at: None,
            completed_at: None,
        }
    }

    /// Apply a lifecycle transition in place.
    ///
    /// Any pair not in the transition table fails with
    /// [`CoreError::InvalidTransition`] and leaves the task untouched.
    pub fn apply(&mut self, transition: TaskTransition, now: Timestamp) -> Result<(), CoreError> {
        match (self.status, transition) {
            (TaskStatus::Pending, TaskTransition::Start) => {
                self.status = TaskStatus::Running;
                self.started_at = Some(now);
                Ok(())
            }
            (TaskStatus::Running, TaskTransition::Complete { result_ref, cost }) => {
                self.status = TaskStatus::Completed;
                self.result_ref = Some(result_ref);
                self.cost = Some(cost);
                self.completed_at = Some(now);
                Ok(())
            }
            (TaskStatus::Running, TaskTransition::Fail { error_message }) => {
                self.status = TaskStatus::Failed;
                self.error_message = Some(error_message);
                self.completed_at = Some(now);
                self.retry_count += 1;
                Ok(())
            }
            (from, transition) => Err(CoreError::InvalidTransition {
                entity: "Task",
                from: from.as_str(),
                to: transition.target().as_str(),
            }),
        }
    }

    /// Whether the retry budget is spent.
    pub fn retry_exhausted(&self) -> bool {
        self.retry_count >= RETRY_LIMIT
    }

    /// Reset a failed task to `pending` for redispatch.
    ///
    /// Clears `started_at`, `completed_at`, and `error_message`;
    /// `retry_count` keeps counting toward the cap. Fails with
    /// [`CoreError::RetryExhausted`] once the budget is spent, and with
    /// [`CoreError::InvalidTransition`] on a non-failed task. The task
    /// is never mutated on error.
    pub fn reset_for_retry(&mut self) -> Result<(), CoreError> {
        if self.status != TaskStatus::Failed {
            return Err(CoreError::InvalidTransition {
                entity: "Task",
                from: self.status.as_str(),
                to: TaskStatus::Pending.as_str(),
            });
        }
        if self.retry_exhausted() {
            return Err(CoreError::RetryExhausted { task_id: self.id });
        }
        self.status = TaskStatus::Pending;
        self.started_at = None;
        self.completed_at = None;
        self.error_message = None;
        Ok(())
    }

    /// Bulk override used by job cancellation: fail a `pending` task
    /// without passing through `running`.
    ///
    /// Bypasses the normal transition table by design — cancellation is
    /// not a per-task lifecycle event, so `retry_count` is untouched.
    pub fn fail_for_cancellation(&mut self, now: Timestamp) {
        self.status = TaskStatus::Failed;
        self.error_message = Some(CANCELLED_TASK_ERROR.to_string());
        self.completed_at = Some(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::Utc;

    fn task() -> Task {
        Task::new(uuid::Uuid::new_v4(), "a red mug", "product_photography", Utc::now())
    }

    #[test]
    fn happy_path_to_completed() {
        let mut t = task();
        let now = Utc::now();
        t.apply(TaskTransition::Start, now).expect("start");
        assert_eq!(t.status, TaskStatus::Running);
        assert!(t.started_at.is_some());

        let artifact = uuid::Uuid::new_v4();
        t.apply(
            TaskTransition::Complete {
                result_ref: artifact,
                cost: 0.04,
            },
            now,
        )
        .expect("complete");
        assert_eq!(t.status, TaskStatus::Completed);
        assert_eq!(t.result_ref, Some(artifact));
        assert_eq!(t.cost, Some(0.04));
        assert!(t.completed_at.is_some());
        assert_eq!(t.retry_count, 0);
    }

    #[test]
    fn failure_records_error_and_consumes_budget() {
        let mut t = task();
        let now = Utc::now();
        t.apply(TaskTransition::Start, now).expect("start");
        t.apply(
            TaskTransition::Fail {
                error_message: "upstream timeout".into(),
            },
            now,
        )
        .expect("fail");
        assert_eq!(t.status, TaskStatus::Failed);
        assert_eq!(t.error_message.as_deref(), Some("upstream timeout"));
        assert_eq!(t.retry_count, 1);
    }

    #[test]
    fn cannot_start_a_running_task() {
        let mut t = task();
        let now = Utc::now();
        t.apply(TaskTransition::Start, now).expect("start");
        let err = t.apply(TaskTransition::Start, now).unwrap_err();
        assert_matches!(
            err,
            CoreError::InvalidTransition {
                from: "running",
                to: "running",
                ..
            }
        );
        // The task must be untouched by the rejected transition.
        assert_eq!(t.status, TaskStatus::Running);
    }

    #[test]
    fn cannot_complete_a_pending_task() {
        let mut t = task();
        let err = t
            .apply(
                TaskTransition::Complete {
                    result_ref: uuid::Uuid::new_v4(),
                    cost: 0.0,
                },
                Utc::now(),
            )
            .unwrap_err();
        assert_matches!(err, CoreError::InvalidTransition { from: "pending", to: "completed", .. });
    }

    #[test]
    fn cannot_fail_a_completed_task() {
        let mut t = task();
        let now = Utc::now();
        t.apply(TaskTransition::Start, now).expect("start");
        t.apply(
            TaskTransition::Complete {
                result_ref: uuid::Uuid::new_v4(),
                cost: 0.01,
            },
            now,
        )
        .expect("complete");
        let err = t
            .apply(
                TaskTransition::Fail {
                    error_message: "late".into(),
                },
                now,
            )
            .unwrap_err();
        assert_matches!(err, CoreError::InvalidTransition { .. });
    }

    #[test]
    fn retry_resets_to_pending_and_keeps_count() {
        let mut t = task();
        let now = Utc::now();
        t.apply(TaskTransition::Start, now).expect("start");
        t.apply(
            TaskTransition::Fail {
                error_message: "boom".into(),
            },
            now,
        )
        .expect("fail");

        t.reset_for_retry().expect("retry");
        assert_eq!(t.status, TaskStatus::Pending);
        assert!(t.started_at.is_none());
        assert!(t.completed_at.is_none());
        assert!(t.error_message.is_none());
        assert_eq!(t.retry_count, 1);
    }

    #[test]
    fn retry_refused_once_budget_is_spent() {
        let mut t = task();
        let now = Utc::now();
        for _ in 0..RETRY_LIMIT - 1 {
            t.apply(TaskTransition::Start, now).expect("start");
            t.apply(
                TaskTransition::Fail {
                    error_message: "boom".into(),
                },
                now,
            )
            .expect("fail");
            t.reset_for_retry().expect("retry within budget");
        }
        // Third failure spends the last unit of budget.
        t.apply(TaskTransition::Start, now).expect("start");
        t.apply(
            TaskTransition::Fail {
                error_message: "boom".into(),
            },
            now,
        )
        .expect("fail");
        assert_eq!(t.retry_count, RETRY_LIMIT);

        let before = t.clone();
        let err = t.reset_for_retry().unwrap_err();
        assert_matches!(err, CoreError::RetryExhausted { task_id } if task_id == t.id);
        // RetryExhausted never mutates the task.
        assert_eq!(t.status, before.status);
        assert_eq!(t.error_message, before.error_message);
        assert_eq!(t.retry_count, before.retry_count);
    }

    #[test]
    fn retry_refused_on_non_failed_task() {
        let mut t = task();
        let err = t.reset_for_retry().unwrap_err();
        assert_matches!(err, CoreError::InvalidTransition { from: "pending", .. });
    }

    #[test]
    fn cancellation_override_fails_pending_without_budget_charge() {
        let mut t = task();
        t.fail_for_cancellation(Utc::now());
        assert_eq!(t.status, TaskStatus::Failed);
        assert_eq!(t.error_message.as_deref(), Some(CANCELLED_TASK_ERROR));
        assert_eq!(t.retry_count, 0);
        assert!(t.completed_at.is_some());
    }
}
