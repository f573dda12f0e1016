//! In-process submission backend.
//!
//! The counterpart to [`HttpSubmitter`](imgforge_queue::http::HttpSubmitter):
//! instead of POSTing to a worker endpoint, the hand-off runs the
//! [`TaskProcessor`] directly. Like the HTTP path — where the worker
//! finishes the task before answering — the hand-off completes when
//! processing does, so the dispatcher's cap bounds actual generation
//! concurrency.

use std::sync::Arc;

use async_trait::async_trait;

use imgforge_core::types::TaskId;
use imgforge_queue::submitter::{SubmitError, TaskSubmitter};

use crate::processor::TaskProcessor;

pub struct ProcessorSubmitter {
    processor: Arc<TaskProcessor>,
}

impl ProcessorSubmitter {
    pub fn new(processor: Arc<TaskProcessor>) -> Self {
        Self { processor }
    }
}

#[async_trait]
impl TaskSubmitter for ProcessorSubmitter {
    async fn submit(&self, task_id: TaskId) -> Result<(), SubmitError> {
        // A task that ran and recorded `failed` is still a successful
        // hand-off; only failing to hand the task over at all (unknown
        // id, store failure) rejects the submission.
        match self.processor.process(task_id).await {
            Ok(_) => Ok(()),
            Err(e) => Err(SubmitError::Rejected(e.to_string())),
        }
    }
}
