//! The [`Job`] entity: a tracked batch of generation tasks.

use serde::{Deserialize, Serialize};

use crate::status::JobStatus;
use crate::types::{JobId, Timestamp};

/// A batch generation job.
///
/// `status`, `completed_tasks`, `failed_tasks`, and `completed_at` are
/// derived fields owned by the progress aggregator; `total_tasks` is
/// fixed at creation. Invariant: `completed_tasks + failed_tasks <=
/// total_tasks` at every point in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub status: JobStatus,
    pub total_tasks: u32,
    pub completed_tasks: u32,
    pub failed_tasks: u32,
    pub created_at: Timestamp,
    /// Set exactly once, when every task has reached a terminal state
    /// (or on cancellation). Never overwritten.
    pub completed_at: Option<Timestamp>,
    pub updated_at: Timestamp,
}

impl Job {
    /// Create a fresh `pending` job with zeroed counters.
    pub fn new(total_tasks: u32, now: Timestamp) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            status: JobStatus::Pending,
            total_tasks,
            completed_tasks: 0,
            failed_tasks: 0,
            created_at: now,
            completed_at: None,
            updated_at: now,
        }
    }

    /// Share of tasks that have reached a terminal state, in percent.
    ///
    /// `0.0` when the job has no tasks.
    pub fn progress_percentage(&self) -> f64 {
        if self.total_tasks == 0 {
            return 0.0;
        }
        f64::from(self.completed_tasks + self.failed_tasks) / f64::from(self.total_tasks) * 100.0
    }
}

/// Lightweight polling view of a job's progress.
///
/// This is the payload callers poll on; it carries no task detail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobStatusView {
    pub id: JobId,
    pub status: JobStatus,
    pub total_tasks: u32,
    pub completed_tasks: u32,
    pub failed_tasks: u32,
    /// Rounded to two decimal places.
    pub progress_percentage: f64,
    pub created_at: Timestamp,
    pub completed_at: Option<Timestamp>,
}

impl From<&Job> for JobStatusView {
    fn from(job: &Job) -> Self {
        Self {
            id: job.id,
            status: job.status,
            total_tasks: job.total_tasks,
            completed_tasks: job.completed_tasks,
            failed_tasks: job.failed_tasks,
            progress_percentage: (job.progress_percentage() * 100.0).round() / 100.0,
            created_at: job.created_at,
            completed_at: job.completed_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn new_job_is_pending_with_zero_counters() {
        let job = Job::new(4, Utc::now());
        assert_eq!(job.status, JobStatus::Pending);
        assert_eq!(job.total_tasks, 4);
        assert_eq!(job.completed_tasks, 0);
        assert_eq!(job.failed_tasks, 0);
        assert!(job.completed_at.is_none());
    }

    #[test]
    fn progress_percentage_zero_without_tasks() {
        let job = Job::new(0, Utc::now());
        assert_eq!(job.progress_percentage(), 0.0);
    }

    #[test]
    fn progress_percentage_counts_both_terminal_kinds() {
        let mut job = Job::new(4, Utc::now());
        job.completed_tasks = 1;
        job.failed_tasks = 1;
        assert_eq!(job.progress_percentage(), 50.0);
    }

    #[test]
    fn status_view_rounds_to_two_decimals() {
        let mut job = Job::new(3, Utc::now());
        job.completed_tasks = 1;
        let view = JobStatusView::from(&job);
        assert_eq!(view.progress_percentage, 33.33);
    }
}
