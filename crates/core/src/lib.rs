//! Domain model and pure logic for the batch generation engine.
//!
//! This crate has no I/O and no internal dependencies. It owns the
//! Job/Task entities, the closed status enums, the task state machine,
//! the progress derivation rules, and the job factory. Everything
//! effectful (storage, queueing, execution) lives in the other crates
//! and is driven by the pure functions defined here.

pub mod error;
pub mod factory;
pub mod job;
pub mod progress;
pub mod status;
pub mod task;
pub mod types;
