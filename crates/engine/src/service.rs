//! [`JobService`]: the facade the calling layer talks to.
//!
//! One service instance is constructed at process start (store,
//! executor, and configuration injected) and shared by reference. It
//! exposes exactly the operations of the outer boundary: create a job,
//! dispatch it, poll its status, fetch its detail, retry a task, cancel
//! or delete a job.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::Serialize;
use tokio::sync::broadcast;

use imgforge_core::error::CoreError;
use imgforge_core::factory::build_job;
use imgforge_core::job::{Job, JobStatusView};
use imgforge_core::task::Task;
use imgforge_core::types::{JobId, TaskId};
use imgforge_queue::dispatcher::{DispatchOutcome, Dispatcher};
use imgforge_queue::http::HttpSubmitter;
use imgforge_queue::submitter::TaskSubmitter;
use imgforge_store::EntityStore;

use crate::config::EngineConfig;
use crate::events::{EventBus, JobProgressEvent};
use crate::executor::ArtifactExecutor;
use crate::lifecycle::TaskLifecycle;
use crate::processor::TaskProcessor;
use crate::progress::ProgressAggregator;
use crate::submitter::ProcessorSubmitter;

/// A job together with all of its tasks, in creation order.
#[derive(Debug, Clone, Serialize)]
pub struct JobDetail {
    pub job: Job,
    pub tasks: Vec<Task>,
}

pub struct JobService {
    store: Arc<dyn EntityStore>,
    dispatcher: Arc<Dispatcher>,
    lifecycle: TaskLifecycle,
    aggregator: ProgressAggregator,
    events: Arc<EventBus>,
}

impl JobService {
    /// Assemble a service from pre-built parts. Prefer
    /// [`from_config`](Self::from_config) outside of tests.
    pub fn new(
        store: Arc<dyn EntityStore>,
        dispatcher: Arc<Dispatcher>,
        events: Arc<EventBus>,
    ) -> Self {
        let aggregator = ProgressAggregator::new(Arc::clone(&store), Arc::clone(&events));
        let lifecycle = TaskLifecycle::new(Arc::clone(&store), aggregator.clone());
        Self {
            store,
            dispatcher,
            lifecycle,
            aggregator,
            events,
        }
    }

    /// Build the full engine from configuration: submission backend
    /// chosen here (HTTP worker endpoint or in-process processor),
    /// dispatcher built once with the configured cap.
    pub fn from_config(
        config: &EngineConfig,
        store: Arc<dyn EntityStore>,
        executor: Arc<dyn ArtifactExecutor>,
    ) -> Result<Self, CoreError> {
        let events = Arc::new(EventBus::default());
        let aggregator = ProgressAggregator::new(Arc::clone(&store), Arc::clone(&events));
        let lifecycle = TaskLifecycle::new(Arc::clone(&store), aggregator.clone());

        let submitter: Arc<dyn TaskSubmitter> = if config.use_http_queue {
            Arc::new(
                HttpSubmitter::new(
                    config.worker_url.clone(),
                    Duration::from_secs(config.submit_timeout_secs),
                )
                .map_err(|e| CoreError::Internal(e.to_string()))?,
            )
        } else {
            let processor =
                TaskProcessor::new(Arc::clone(&store), lifecycle.clone(), executor);
            Arc::new(ProcessorSubmitter::new(Arc::new(processor)))
        };

        let dispatcher = Arc::new(Dispatcher::new(submitter, config.max_concurrent_tasks)?);

        Ok(Self {
            store,
            dispatcher,
            lifecycle,
            aggregator,
            events,
        })
    }

    /// Create a job with one pending task per (prompt, replication)
    /// pair, persisted atomically as a unit.
    pub async fn create_job(
        &self,
        prompts: &[String],
        style: &str,
        count_per_prompt: u32,
    ) -> Result<Job, CoreError> {
        let new = build_job(prompts, style, count_per_prompt, Utc::now())?;
        let job = self.store.create_job(new).await?;
        tracing::info!(
            job_id = %job.id,
            total_tasks = job.total_tasks,
            style,
            "Job created",
        );
        Ok(job)
    }

    /// Submit all of a job's task ids to the execution backend under
    /// the configured concurrency cap.
    ///
    /// Tasks no longer `pending` are skipped by the processor, so
    /// re-dispatching a job picks up exactly the tasks awaiting work
    /// (fresh ones and those reset for retry).
    pub async fn dispatch_job(&self, job_id: JobId) -> Result<DispatchOutcome, CoreError> {
        let task_ids = self.store.task_ids(job_id).await?;
        self.dispatcher.dispatch(&task_ids).await
    }

    /// Lightweight polling view: status, counters, progress percentage.
    pub async fn get_job_status(&self, job_id: JobId) -> Result<JobStatusView, CoreError> {
        let job = self.store.get_job(job_id).await?;
        Ok(JobStatusView::from(&job))
    }

    /// Full job detail including every task.
    pub async fn get_job(&self, job_id: JobId) -> Result<JobDetail, CoreError> {
        let job = self.store.get_job(job_id).await?;
        let tasks = self.store.tasks_of_job(job_id).await?;
        Ok(JobDetail { job, tasks })
    }

    /// Reset a failed task to `pending` (see [`TaskLifecycle::retry`]).
    pub async fn retry_task(&self, task_id: TaskId) -> Result<Task, CoreError> {
        self.lifecycle.retry(task_id).await
    }

    /// Cancel a job (see [`ProgressAggregator::cancel`]).
    pub async fn cancel_job(&self, job_id: JobId) -> Result<Job, CoreError> {
        self.aggregator.cancel(job_id).await
    }

    /// Delete a job and, by cascade, its tasks.
    pub async fn delete_job(&self, job_id: JobId) -> Result<(), CoreError> {
        self.store.delete_job(job_id).await?;
        tracing::info!(job_id = %job_id, "Job deleted");
        Ok(())
    }

    /// Subscribe to progress events (push on top of polling).
    pub fn subscribe(&self) -> broadcast::Receiver<JobProgressEvent> {
        self.events.subscribe()
    }

    /// The task lifecycle manager, for boundary layers that record
    /// outcomes of externally executed tasks.
    pub fn lifecycle(&self) -> &TaskLifecycle {
        &self.lifecycle
    }
}
