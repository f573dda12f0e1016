//! Error taxonomy shared across the engine crates.

use crate::types::TaskId;

/// Errors surfaced by the domain layer.
///
/// The serialized `Display` strings are stable; callers may match on
/// the variants but must not parse the messages.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Malformed caller input (empty prompt list, zero replication,
    /// empty dispatch batch). Caller error, never retried.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// An illegal state-machine transition was attempted. Indicates a
    /// logic error in the caller; the entity is left untouched.
    #[error("Invalid transition: {entity} cannot move from {from} to {to}")]
    InvalidTransition {
        entity: &'static str,
        from: &'static str,
        to: &'static str,
    },

    /// The task executor rejected or failed an item. Recorded on the
    /// task as `failed` and eligible for retry up to the cap.
    #[error("Executor failure: {0}")]
    ExecutorFailure(String),

    /// A retry was attempted past the retry budget. The task remains
    /// terminally failed.
    #[error("Retry budget exhausted for task {task_id}")]
    RetryExhausted { task_id: TaskId },

    /// The job or task id is unknown to the store.
    #[error("Entity not found: {entity} with id {id}")]
    NotFound {
        entity: &'static str,
        id: uuid::Uuid,
    },

    /// Unexpected internal failure (poisoned runtime primitive, task
    /// join failure). Not part of the normal control flow.
    #[error("Internal error: {0}")]
    Internal(String),
}
