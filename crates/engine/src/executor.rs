//! The [`ArtifactExecutor`] capability: the expensive, unreliable
//! operation that turns a prompt into an artifact.
//!
//! Latency and failure rate are unbounded and unpredictable; the
//! executor owns its own timeouts. The engine never retries an
//! executor call inline — failures are recorded on the task and go
//! through the task retry budget instead.

use async_trait::async_trait;

use imgforge_core::types::ArtifactId;

/// Output of one successful executor invocation.
#[derive(Debug, Clone, Copy)]
pub struct Execution {
    /// Opaque reference to the produced artifact.
    pub result_ref: ArtifactId,
    /// What the invocation cost, in account currency.
    pub cost: f64,
}

/// The executor rejected or failed an item.
#[derive(Debug, thiserror::Error)]
pub enum ExecutorError {
    /// The generation itself failed (model error, content refusal).
    #[error("Generation failed: {0}")]
    Failed(String),

    /// The executor could not be reached or timed out.
    #[error("Executor unavailable: {0}")]
    Unavailable(String),
}

/// Produces one artifact from a prompt and style.
#[async_trait]
pub trait ArtifactExecutor: Send + Sync {
    async fn execute(&self, prompt: &str, style: &str) -> Result<Execution, ExecutorError>;
}
