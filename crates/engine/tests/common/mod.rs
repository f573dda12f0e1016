//! Shared fixtures for the engine integration tests: scripted
//! executors and a fully wired service over the in-memory store.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use imgforge_engine::config::EngineConfig;
use imgforge_engine::executor::{ArtifactExecutor, Execution, ExecutorError};
use imgforge_engine::service::JobService;
use imgforge_store::memory::MemoryStore;
use imgforge_store::EntityStore;

/// Initialise test logging once; repeated calls are no-ops.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "imgforge_engine=debug".into()),
        )
        .with_test_writer()
        .try_init()
        .ok();
}

/// Executor that always succeeds with a fixed cost.
pub struct OkExecutor;

#[async_trait]
impl ArtifactExecutor for OkExecutor {
    async fn execute(&self, _prompt: &str, _style: &str) -> Result<Execution, ExecutorError> {
        Ok(Execution {
            result_ref: uuid::Uuid::new_v4(),
            cost: 0.04,
        })
    }
}

/// Executor that fails for any prompt containing `"bad"` and succeeds
/// otherwise.
pub struct ScriptedExecutor;

#[async_trait]
impl ArtifactExecutor for ScriptedExecutor {
    async fn execute(&self, prompt: &str, _style: &str) -> Result<Execution, ExecutorError> {
        if prompt.contains("bad") {
            Err(ExecutorError::Failed("scripted generation failure".into()))
        } else {
            Ok(Execution {
                result_ref: uuid::Uuid::new_v4(),
                cost: 0.04,
            })
        }
    }
}

/// Executor that always fails.
pub struct FailingExecutor;

#[async_trait]
impl ArtifactExecutor for FailingExecutor {
    async fn execute(&self, _prompt: &str, _style: &str) -> Result<Execution, ExecutorError> {
        Err(ExecutorError::Unavailable("model host down".into()))
    }
}

/// Executor that records how many invocations run concurrently.
#[derive(Default)]
pub struct InstrumentedExecutor {
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl InstrumentedExecutor {
    pub fn max_observed(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ArtifactExecutor for InstrumentedExecutor {
    async fn execute(&self, _prompt: &str, _style: &str) -> Result<Execution, ExecutorError> {
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(20)).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(Execution {
            result_ref: uuid::Uuid::new_v4(),
            cost: 0.01,
        })
    }
}

/// Wire a service over a fresh in-memory store with the in-process
/// submission backend and the given concurrency cap.
pub fn service_with(
    executor: Arc<dyn ArtifactExecutor>,
    max_concurrency: usize,
) -> (Arc<MemoryStore>, JobService) {
    init_tracing();
    let store = Arc::new(MemoryStore::new());
    let config = EngineConfig {
        max_concurrent_tasks: max_concurrency,
        use_http_queue: false,
        ..EngineConfig::default()
    };
    let service = JobService::from_config(
        &config,
        Arc::clone(&store) as Arc<dyn EntityStore>,
        executor,
    )
    .expect("service construction");
    (store, service)
}

/// Convenience: owned `Vec<String>` prompts.
pub fn prompts(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
