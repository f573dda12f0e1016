//! In-process task processor: the worker flow for one task.
//!
//! Runs a single pending task end to end: mark it running, invoke the
//! executor, record the outcome. Executor failures are recorded on the
//! task — never propagated as errors — so one bad generation can
//! neither abort sibling tasks nor crash the batch.

use std::sync::Arc;

use imgforge_core::error::CoreError;
use imgforge_core::status::TaskStatus;
use imgforge_core::task::TaskTransition;
use imgforge_core::types::{ArtifactId, TaskId};
use imgforge_store::EntityStore;

use crate::executor::ArtifactExecutor;
use crate::lifecycle::TaskLifecycle;

/// What happened to one processed task.
#[derive(Debug, Clone)]
pub enum ProcessOutcome {
    /// The task was no longer `pending`; nothing was mutated.
    AlreadyProcessed { status: TaskStatus },
    /// Generation succeeded and the task is `completed`.
    Completed { result_ref: ArtifactId },
    /// Generation failed and the task is `failed`; `will_retry` is
    /// true when the task was reset to `pending` for another attempt.
    Failed {
        error_message: String,
        will_retry: bool,
    },
}

#[derive(Clone)]
pub struct TaskProcessor {
    store: Arc<dyn EntityStore>,
    lifecycle: TaskLifecycle,
    executor: Arc<dyn ArtifactExecutor>,
}

impl TaskProcessor {
    pub fn new(
        store: Arc<dyn EntityStore>,
        lifecycle: TaskLifecycle,
        executor: Arc<dyn ArtifactExecutor>,
    ) -> Self {
        Self {
            store,
            lifecycle,
            executor,
        }
    }

    /// Process one task through its lifecycle.
    ///
    /// Only `pending` tasks are picked up; anything else reports
    /// [`ProcessOutcome::AlreadyProcessed`] (a duplicate submission is
    /// not an error). After a recorded failure the task is
    /// automatically reset for retry while its budget lasts.
    pub async fn process(&self, task_id: TaskId) -> Result<ProcessOutcome, CoreError> {
        let task = self.store.get_task(task_id).await?;
        if task.status != TaskStatus::Pending {
            tracing::debug!(
                task_id = %task_id,
                status = task.status.as_str(),
                "Task already processed; skipping",
            );
            return Ok(ProcessOutcome::AlreadyProcessed {
                status: task.status,
            });
        }

        let task = self.lifecycle.transition(task_id, TaskTransition::Start).await?;

        match self.executor.execute(&task.prompt, &task.style).await {
            Ok(execution) => {
                self.lifecycle
                    .transition(
                        task_id,
                        TaskTransition::Complete {
                            result_ref: execution.result_ref,
                            cost: execution.cost,
                        },
                    )
                    .await?;
                Ok(ProcessOutcome::Completed {
                    result_ref: execution.result_ref,
                })
            }
            Err(e) => {
                let error_message = e.to_string();
                let failed = self
                    .lifecycle
                    .transition(
                        task_id,
                        TaskTransition::Fail {
                            error_message: error_message.clone(),
                        },
                    )
                    .await?;

                let will_retry = !failed.retry_exhausted();
                if will_retry {
                    self.lifecycle.retry(task_id).await?;
                    tracing::info!(
                        task_id = %task_id,
                        retry_count = failed.retry_count,
                        "Task failed; reset for retry",
                    );
                } else {
                    tracing::warn!(
                        task_id = %task_id,
                        retry_count = failed.retry_count,
                        "Task failed terminally; retry budget exhausted",
                    );
                }
                Ok(ProcessOutcome::Failed {
                    error_message,
                    will_retry,
                })
            }
        }
    }
}
