//! Task lifecycle manager: the only writer of task state.
//!
//! Applies the state machine defined on [`Task`] and keeps the owning
//! job's derived state in step — every successful task mutation is
//! followed by an aggregator recompute, so from the caller's point of
//! view the two are one logical operation.

use std::sync::Arc;

use chrono::Utc;

use imgforge_core::error::CoreError;
use imgforge_core::task::{Task, TaskTransition};
use imgforge_core::types::TaskId;
use imgforge_store::EntityStore;

use crate::progress::ProgressAggregator;

#[derive(Clone)]
pub struct TaskLifecycle {
    store: Arc<dyn EntityStore>,
    aggregator: ProgressAggregator,
}

impl TaskLifecycle {
    pub fn new(store: Arc<dyn EntityStore>, aggregator: ProgressAggregator) -> Self {
        Self { store, aggregator }
    }

    /// Apply a lifecycle transition to a task and recompute its job.
    ///
    /// An illegal transition fails with [`CoreError::InvalidTransition`]
    /// and performs no mutation at all.
    pub async fn transition(
        &self,
        task_id: TaskId,
        transition: TaskTransition,
    ) -> Result<Task, CoreError> {
        let mut task = self.store.get_task(task_id).await?;
        let from = task.status.as_str();
        task.apply(transition, Utc::now())?;
        let task = self.store.update_task(task).await?;
        self.aggregator.recompute(task.job_id).await?;

        tracing::info!(
            task_id = %task.id,
            job_id = %task.job_id,
            from,
            to = task.status.as_str(),
            "Task transitioned",
        );
        Ok(task)
    }

    /// Reset a failed task to `pending` for redispatch.
    ///
    /// Refused with [`CoreError::RetryExhausted`] once the task has
    /// recorded [`RETRY_LIMIT`](imgforge_core::task::RETRY_LIMIT)
    /// failures; the task then stays terminally failed. The back-edge
    /// is a task mutation like any other, so the job is recomputed
    /// afterwards.
    pub async fn retry(&self, task_id: TaskId) -> Result<Task, CoreError> {
        let mut task = self.store.get_task(task_id).await?;
        task.reset_for_retry()?;
        let task = self.store.update_task(task).await?;
        self.aggregator.recompute(task.job_id).await?;

        tracing::info!(
            task_id = %task.id,
            job_id = %task.job_id,
            retry_count = task.retry_count,
            "Task reset for retry",
        );
        Ok(task)
    }
}
