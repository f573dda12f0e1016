//! Shared identifier and timestamp aliases.

/// Unique identifier for a batch job (UUID v4).
pub type JobId = uuid::Uuid;

/// Unique identifier for a single generation task (UUID v4).
pub type TaskId = uuid::Uuid;

/// Opaque reference to an artifact produced by the executor.
pub type ArtifactId = uuid::Uuid;

/// UTC timestamp used on all entities.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
