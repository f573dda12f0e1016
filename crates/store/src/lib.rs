//! Entity store: the single source of truth for jobs and tasks.
//!
//! [`EntityStore`] is the persistence seam of the engine. The engine
//! only ever talks to this trait; [`memory::MemoryStore`] is the
//! bundled implementation (tests, local development). A database-backed
//! implementation plugs in behind the same trait.

pub mod memory;

use async_trait::async_trait;

use imgforge_core::error::CoreError;
use imgforge_core::factory::NewJob;
use imgforge_core::job::Job;
use imgforge_core::progress::StatusCounts;
use imgforge_core::status::TaskStatus;
use imgforge_core::task::Task;
use imgforge_core::types::{JobId, TaskId};

/// Errors raised by a store implementation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The requested entity does not exist.
    #[error("Entity not found: {entity} with id {id}")]
    NotFound {
        entity: &'static str,
        id: uuid::Uuid,
    },

    /// The storage backend failed (connection loss, constraint
    /// violation). Never produced by the in-memory store.
    #[error("Store backend error: {0}")]
    Backend(String),
}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, id } => CoreError::NotFound { entity, id },
            StoreError::Backend(msg) => CoreError::Internal(msg),
        }
    }
}

/// Durable storage for [`Job`] and [`Task`] records.
///
/// Implementations must serialize concurrent updates to the same job's
/// derived counters: [`recompute_job`](EntityStore::recompute_job)
/// recounts task statuses and applies the progress rules as one atomic
/// operation, so two tasks of the same job completing concurrently
/// never lose a counter update.
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Persist a job and its tasks atomically as a unit.
    async fn create_job(&self, new: NewJob) -> Result<Job, StoreError>;

    /// Fetch a job by id.
    async fn get_job(&self, job_id: JobId) -> Result<Job, StoreError>;

    /// Replace a job record, bumping `updated_at`.
    async fn update_job(&self, job: Job) -> Result<Job, StoreError>;

    /// Delete a job; cascades to its tasks.
    async fn delete_job(&self, job_id: JobId) -> Result<(), StoreError>;

    /// Fetch a task by id.
    async fn get_task(&self, task_id: TaskId) -> Result<Task, StoreError>;

    /// Replace a task record.
    async fn update_task(&self, task: Task) -> Result<Task, StoreError>;

    /// Ids of a job's tasks in creation order (the dispatch order).
    async fn task_ids(&self, job_id: JobId) -> Result<Vec<TaskId>, StoreError>;

    /// All tasks of a job in creation order.
    async fn tasks_of_job(&self, job_id: JobId) -> Result<Vec<Task>, StoreError>;

    /// Tasks of a job currently in the given status.
    async fn tasks_by_status(
        &self,
        job_id: JobId,
        status: TaskStatus,
    ) -> Result<Vec<Task>, StoreError>;

    /// Per-status task counts for a job.
    async fn count_tasks(&self, job_id: JobId) -> Result<StatusCounts, StoreError>;

    /// Atomically fail every still-pending task of a job with the
    /// cancellation override, returning how many tasks were failed.
    ///
    /// The pending check and the write must happen in one critical
    /// section (one write guard here, one `UPDATE ... WHERE
    /// status = 'pending'` in a SQL store), so a task that moves to
    /// `running` concurrently is never clobbered.
    async fn fail_pending_tasks(&self, job_id: JobId) -> Result<usize, StoreError>;

    /// Atomically recount the job's tasks and apply the progress
    /// derivation rules, returning the updated job.
    async fn recompute_job(&self, job_id: JobId) -> Result<Job, StoreError>;
}
