//! Verifies that the dispatcher's cap bounds real generation
//! concurrency when the in-process submission backend is used.

mod common;

use std::sync::Arc;

use common::{prompts, service_with, InstrumentedExecutor};
use imgforge_core::factory::DEFAULT_STYLE;
use imgforge_core::status::JobStatus;
use imgforge_engine::executor::ArtifactExecutor;

#[tokio::test]
async fn generation_concurrency_never_exceeds_the_cap() {
    let executor = Arc::new(InstrumentedExecutor::default());
    let (_store, service) = service_with(Arc::clone(&executor) as Arc<dyn ArtifactExecutor>, 3);

    let job = service
        .create_job(&prompts(&["a", "b", "c", "d"]), DEFAULT_STYLE, 3)
        .await
        .expect("create");
    assert_eq!(job.total_tasks, 12);

    let outcome = service.dispatch_job(job.id).await.expect("dispatch");
    assert_eq!(outcome.enqueued, 12);
    assert_eq!(outcome.failed, 0);

    assert!(
        executor.max_observed() <= 3,
        "observed {} concurrent executions under a cap of 3",
        executor.max_observed()
    );
    // With 12 tasks and 20ms each the cap is actually reached, not
    // merely respected.
    assert!(executor.max_observed() >= 2);

    let status = service.get_job_status(job.id).await.expect("status");
    assert_eq!(status.status, JobStatus::Completed);
    assert_eq!(status.completed_tasks, 12);
}

#[tokio::test]
async fn cap_of_one_processes_tasks_sequentially() {
    let executor = Arc::new(InstrumentedExecutor::default());
    let (_store, service) = service_with(Arc::clone(&executor) as Arc<dyn ArtifactExecutor>, 1);

    let job = service
        .create_job(&prompts(&["a", "b", "c"]), DEFAULT_STYLE, 1)
        .await
        .expect("create");
    service.dispatch_job(job.id).await.expect("dispatch");

    assert_eq!(executor.max_observed(), 1);
}
