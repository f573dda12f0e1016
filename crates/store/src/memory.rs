//! In-memory [`EntityStore`] backed by a single `tokio::sync::RwLock`.
//!
//! One lock guards jobs, tasks, and the per-job task ordering together,
//! which is what makes [`recompute_job`](EntityStore::recompute_job)
//! atomic: the recount and the job update happen under one write guard.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use imgforge_core::factory::NewJob;
use imgforge_core::job::Job;
use imgforge_core::progress::{apply_progress, StatusCounts};
use imgforge_core::status::TaskStatus;
use imgforge_core::task::Task;
use imgforge_core::types::{JobId, TaskId};

use crate::{EntityStore, StoreError};

#[derive(Default)]
struct Inner {
    jobs: HashMap<JobId, Job>,
    tasks: HashMap<TaskId, Task>,
    /// Task ids per job in creation order.
    job_tasks: HashMap<JobId, Vec<TaskId>>,
}

impl Inner {
    fn job(&self, job_id: JobId) -> Result<&Job, StoreError> {
        self.jobs.get(&job_id).ok_or(StoreError::NotFound {
            entity: "Job",
            id: job_id,
        })
    }

    fn ordered_tasks(&self, job_id: JobId) -> Result<Vec<&Task>, StoreError> {
        let ids = self.job_tasks.get(&job_id).ok_or(StoreError::NotFound {
            entity: "Job",
            id: job_id,
        })?;
        Ok(ids.iter().filter_map(|id| self.tasks.get(id)).collect())
    }
}

/// Process-local store. Cheap to clone via `Arc` at the engine seam.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn create_job(&self, new: NewJob) -> Result<Job, StoreError> {
        let mut inner = self.inner.write().await;
        let job_id = new.job.id;
        let order: Vec<TaskId> = new.tasks.iter().map(|t| t.id).collect();
        for task in new.tasks {
            inner.tasks.insert(task.id, task);
        }
        inner.job_tasks.insert(job_id, order);
        inner.jobs.insert(job_id, new.job.clone());
        tracing::debug!(job_id = %job_id, total_tasks = new.job.total_tasks, "Job persisted");
        Ok(new.job)
    }

    async fn get_job(&self, job_id: JobId) -> Result<Job, StoreError> {
        let inner = self.inner.read().await;
        inner.job(job_id).cloned()
    }

    async fn update_job(&self, mut job: Job) -> Result<Job, StoreError> {
        let mut inner = self.inner.write().await;
        if !inner.jobs.contains_key(&job.id) {
            return Err(StoreError::NotFound {
                entity: "Job",
                id: job.id,
            });
        }
        job.updated_at = Utc::now();
        inner.jobs.insert(job.id, job.clone());
        Ok(job)
    }

    async fn delete_job(&self, job_id: JobId) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        if inner.jobs.remove(&job_id).is_none() {
            return Err(StoreError::NotFound {
                entity: "Job",
                id: job_id,
            });
        }
        // Cascade: a task's lifetime is bounded by its job's.
        if let Some(ids) = inner.job_tasks.remove(&job_id) {
            for id in ids {
                inner.tasks.remove(&id);
            }
        }
        tracing::debug!(job_id = %job_id, "Job deleted with its tasks");
        Ok(())
    }

    async fn get_task(&self, task_id: TaskId) -> Result<Task, StoreError> {
        let inner = self.inner.read().await;
        inner
            .tasks
            .get(&task_id)
            .cloned()
            .ok_or(StoreError::NotFound {
                entity: "Task",
                id: task_id,
            })
    }

    async fn update_task(&self, task: Task) -> Result<Task, StoreError> {
        let mut inner = self.inner.write().await;
        if !inner.tasks.contains_key(&task.id) {
            return Err(StoreError::NotFound {
                entity: "Task",
                id: task.id,
            });
        }
        inner.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn task_ids(&self, job_id: JobId) -> Result<Vec<TaskId>, StoreError> {
        let inner = self.inner.read().await;
        inner.job(job_id)?;
        Ok(inner.job_tasks.get(&job_id).cloned().unwrap_or_default())
    }

    async fn tasks_of_job(&self, job_id: JobId) -> Result<Vec<Task>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.ordered_tasks(job_id)?.into_iter().cloned().collect())
    }

    async fn tasks_by_status(
        &self,
        job_id: JobId,
        status: TaskStatus,
    ) -> Result<Vec<Task>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .ordered_tasks(job_id)?
            .into_iter()
            .filter(|t| t.status == status)
            .cloned()
            .collect())
    }

    async fn count_tasks(&self, job_id: JobId) -> Result<StatusCounts, StoreError> {
        let inner = self.inner.read().await;
        let mut counts = StatusCounts::default();
        for task in inner.ordered_tasks(job_id)? {
            counts.record(task.status);
        }
        Ok(counts)
    }

    async fn fail_pending_tasks(&self, job_id: JobId) -> Result<usize, StoreError> {
        let mut inner = self.inner.write().await;
        let ids = inner.job_tasks.get(&job_id).cloned().ok_or(StoreError::NotFound {
            entity: "Job",
            id: job_id,
        })?;
        let now = Utc::now();
        let mut failed = 0;
        for id in ids {
            if let Some(task) = inner.tasks.get_mut(&id) {
                if task.status == TaskStatus::Pending {
                    task.fail_for_cancellation(now);
                    failed += 1;
                }
            }
        }
        Ok(failed)
    }

    async fn recompute_job(&self, job_id: JobId) -> Result<Job, StoreError> {
        let mut inner = self.inner.write().await;
        let mut counts = StatusCounts::default();
        for task in inner.ordered_tasks(job_id)? {
            counts.record(task.status);
        }
        let job = inner.jobs.get_mut(&job_id).ok_or(StoreError::NotFound {
            entity: "Job",
            id: job_id,
        })?;
        let now = Utc::now();
        apply_progress(job, &counts, now);
        job.updated_at = now;
        Ok(job.clone())
    }
}
