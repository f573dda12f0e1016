//! Job progress aggregator: recomputes derived job state and owns
//! cancellation.

use std::sync::Arc;

use chrono::Utc;

use imgforge_core::error::CoreError;
use imgforge_core::job::Job;
use imgforge_core::status::JobStatus;
use imgforge_core::types::JobId;
use imgforge_store::EntityStore;

use crate::events::{EventBus, JobProgressEvent};

/// Recomputes a job's derived fields after every task mutation.
///
/// The actual count-and-derive runs atomically inside the store
/// ([`EntityStore::recompute_job`]); this type adds event publication
/// and the cancellation flow on top.
#[derive(Clone)]
pub struct ProgressAggregator {
    store: Arc<dyn EntityStore>,
    events: Arc<EventBus>,
}

impl ProgressAggregator {
    pub fn new(store: Arc<dyn EntityStore>, events: Arc<EventBus>) -> Self {
        Self { store, events }
    }

    /// Recompute a job's status and counters from its tasks' current
    /// statuses.
    ///
    /// Idempotent: recomputing twice with no intervening task change
    /// yields the same job state.
    pub async fn recompute(&self, job_id: JobId) -> Result<Job, CoreError> {
        let job = self.store.recompute_job(job_id).await?;
        self.events.publish(JobProgressEvent::from(&job));
        tracing::debug!(
            job_id = %job.id,
            status = job.status.as_str(),
            completed = job.completed_tasks,
            failed = job.failed_tasks,
            total = job.total_tasks,
            "Job progress recomputed",
        );
        Ok(job)
    }

    /// Cancel a job: mark it `cancelled` and fail every still-pending
    /// task with the cancellation message.
    ///
    /// This is the one place a task moves `pending → failed` without
    /// passing through `running` — a bulk override outside the normal
    /// transition table. Running tasks are untouched; cancellation is
    /// cooperative and only prevents pending work from starting.
    /// A job already in a terminal state cannot be cancelled.
    pub async fn cancel(&self, job_id: JobId) -> Result<Job, CoreError> {
        let mut job = self.store.get_job(job_id).await?;
        if job.status.is_terminal() {
            return Err(CoreError::InvalidTransition {
                entity: "Job",
                from: job.status.as_str(),
                to: JobStatus::Cancelled.as_str(),
            });
        }

        let now = Utc::now();
        job.status = JobStatus::Cancelled;
        if job.completed_at.is_none() {
            job.completed_at = Some(now);
        }
        self.store.update_job(job).await?;

        // One atomic store operation: the pending check and the
        // override write share a critical section, so a task that
        // moves to `running` concurrently is never clobbered.
        let cancelled_tasks = self.store.fail_pending_tasks(job_id).await?;

        // Refresh counters; the cancelled status itself is never
        // recomputed away.
        let job = self.recompute(job_id).await?;

        tracing::info!(
            job_id = %job.id,
            cancelled_tasks,
            "Job cancelled",
        );
        Ok(job)
    }
}
