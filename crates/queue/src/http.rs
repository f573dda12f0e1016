//! HTTP submitter: POSTs task ids to a worker endpoint.
//!
//! Mirrors the local-development queue path: the worker exposes a
//! process-task endpoint and the hand-off is one HTTP round trip. The
//! request timeout bounds the hand-off, not the generation itself —
//! executor timeouts are the executor's responsibility.

use std::time::Duration;

use async_trait::async_trait;

use imgforge_core::types::TaskId;

use crate::submitter::{SubmitError, TaskSubmitter};

/// Default hand-off timeout, matching the worker's slowest accepted
/// synchronous path.
pub const DEFAULT_SUBMIT_TIMEOUT_SECS: u64 = 300;

/// Submits tasks to a worker endpoint over HTTP.
///
/// Holds one [`reqwest::Client`] for the process lifetime; construct it
/// once and share it via the dispatcher.
pub struct HttpSubmitter {
    client: reqwest::Client,
    worker_url: String,
}

impl HttpSubmitter {
    /// Create a submitter targeting `worker_url` with the given
    /// hand-off timeout.
    pub fn new(worker_url: impl Into<String>, timeout: Duration) -> Result<Self, SubmitError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SubmitError::Transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            worker_url: worker_url.into(),
        })
    }

    /// Worker endpoint URL this submitter targets.
    pub fn worker_url(&self) -> &str {
        &self.worker_url
    }
}

#[async_trait]
impl TaskSubmitter for HttpSubmitter {
    async fn submit(&self, task_id: TaskId) -> Result<(), SubmitError> {
        let response = self
            .client
            .post(&self.worker_url)
            .json(&serde_json::json!({ "task_id": task_id }))
            .send()
            .await
            .map_err(|e| SubmitError::Transport(e.to_string()))?;

        if response.status().is_success() {
            tracing::debug!(task_id = %task_id, "Task handed off to worker");
            Ok(())
        } else {
            tracing::error!(
                task_id = %task_id,
                status = %response.status(),
                "Worker rejected task submission",
            );
            Err(SubmitError::Rejected(format!(
                "worker returned {}",
                response.status()
            )))
        }
    }
}
