//! Progress derivation: a job's status as a pure function of its
//! tasks' statuses.
//!
//! [`apply_progress`] is the single place derived job fields are
//! computed. The store runs it atomically against a fresh task count so
//! concurrent task completions never lose a counter update.

use crate::job::Job;
use crate::status::{JobStatus, TaskStatus};
use crate::types::Timestamp;

/// Per-status task counts for one job, as re-queried from the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub pending: u32,
    pub running: u32,
    pub completed: u32,
    pub failed: u32,
}

impl StatusCounts {
    /// Add one task's status to the tally.
    pub fn record(&mut self, status: TaskStatus) {
        match status {
            TaskStatus::Pending => self.pending += 1,
            TaskStatus::Running => self.running += 1,
            TaskStatus::Completed => self.completed += 1,
            TaskStatus::Failed => self.failed += 1,
        }
    }

    /// Tasks in a terminal state.
    pub fn terminal(&self) -> u32 {
        self.completed + self.failed
    }
}

/// Recompute a job's derived fields from a fresh task count.
///
/// Idempotent: applying the same counts twice yields the same job.
/// Rules:
/// 1. counters mirror the counts;
/// 2. once every task is terminal the job is `failed` when *all* tasks
///    failed, otherwise `completed`, and `completed_at` is set exactly
///    once;
/// 3. any terminal task short of that makes the job `running`;
/// 4. otherwise the job stays `pending`.
///
/// A `cancelled` job only has its counters refreshed — cancellation is
/// a direct override that recomputation must never undo.
pub fn apply_progress(job: &mut Job, counts: &StatusCounts, now: Timestamp) {
    job.completed_tasks = counts.completed;
    job.failed_tasks = counts.failed;

    if job.status == JobStatus::Cancelled {
        return;
    }

    if counts.terminal() >= job.total_tasks {
        job.status = if counts.failed >= job.total_tasks {
            JobStatus::Failed
        } else {
            JobStatus::Completed
        };
        if job.completed_at.is_none() {
            job.completed_at = Some(now);
        }
    } else if counts.terminal() > 0 {
        job.status = JobStatus::Running;
    }
    // No terminal tasks: the job keeps its current (pending) status.
}
