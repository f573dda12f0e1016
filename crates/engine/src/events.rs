//! In-process progress events backed by a `tokio::sync::broadcast`
//! channel.
//!
//! Polling [`JobStatusView`](imgforge_core::job::JobStatusView) is the
//! primary progress interface; the bus is the optional push layer on
//! top. The aggregator publishes one event after every recompute and on
//! cancellation, so a subscriber sees every derived-state change
//! without touching the state machine.

use serde::Serialize;
use tokio::sync::broadcast;

use imgforge_core::job::Job;
use imgforge_core::status::JobStatus;
use imgforge_core::types::{JobId, Timestamp};

/// Snapshot of a job's derived state at the moment of a recompute.
#[derive(Debug, Clone, Serialize)]
pub struct JobProgressEvent {
    pub job_id: JobId,
    pub status: JobStatus,
    pub total_tasks: u32,
    pub completed_tasks: u32,
    pub failed_tasks: u32,
    pub timestamp: Timestamp,
}

impl From<&Job> for JobProgressEvent {
    fn from(job: &Job) -> Self {
        Self {
            job_id: job.id,
            status: job.status,
            total_tasks: job.total_tasks,
            completed_tasks: job.completed_tasks,
            failed_tasks: job.failed_tasks,
            timestamp: job.updated_at,
        }
    }
}

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// Fan-out hub for [`JobProgressEvent`]s, shared via `Arc`.
pub struct EventBus {
    sender: broadcast::Sender<JobProgressEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full the oldest un-consumed events are
    /// dropped and slow receivers observe `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// With zero subscribers the event is silently dropped — polling
    /// still works, push is best-effort.
    pub fn publish(&self, event: JobProgressEvent) {
        let _ = self.sender.send(event);
    }

    /// Subscribe to all progress events published on this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<JobProgressEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[tokio::test]
    async fn publish_and_receive() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        let job = Job::new(4, Utc::now());
        bus.publish(JobProgressEvent::from(&job));

        let event = rx.recv().await.expect("should receive the event");
        assert_eq!(event.job_id, job.id);
        assert_eq!(event.total_tasks, 4);
        assert_eq!(event.status, JobStatus::Pending);
    }

    #[test]
    fn publish_with_no_subscribers_does_not_panic() {
        let bus = EventBus::default();
        bus.publish(JobProgressEvent::from(&Job::new(1, Utc::now())));
    }
}
