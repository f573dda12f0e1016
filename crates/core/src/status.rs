//! Closed status enums for jobs and tasks.
//!
//! The lowercase serialized names (`"pending"`, `"running"`, ...) are
//! part of the observable API contract; consumers poll on them. Illegal
//! status values are unrepresentable — every transition site matches
//! exhaustively on these enums.

use serde::{Deserialize, Serialize};

/// Aggregate status of a batch job, derived from its tasks' statuses.
///
/// Only `Cancelled` is ever set directly; the rest are computed by the
/// progress aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Running,
    Completed,
    Failed,
    Cancelled,
}

impl JobStatus {
    /// The stable lowercase wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Running => "running",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
            JobStatus::Cancelled => "cancelled",
        }
    }

    /// Whether the job has reached a terminal state.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            JobStatus::Completed | JobStatus::Failed | JobStatus::Cancelled
        )
    }
}

/// Lifecycle status of a single generation task.
///
/// Valid transitions: `Pending → Running → {Completed | Failed}`, plus
/// the single back-edge `Failed → Pending` applied by the retry path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

impl TaskStatus {
    /// The stable lowercase wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Running => "running",
            TaskStatus::Completed => "completed",
            TaskStatus::Failed => "failed",
        }
    }
}
