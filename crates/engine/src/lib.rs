//! Batch generation engine: ties the domain model, store, and queue
//! together.
//!
//! The engine owns the task lifecycle manager, the job progress
//! aggregator, the in-process task processor, and the [`JobService`]
//! facade the calling layer (HTTP boundary, CLI) talks to. The artifact
//! executor and the entity store are injected capabilities; nothing in
//! here knows how artifacts are generated or where records live.
//!
//! [`JobService`]: service::JobService

pub mod config;
pub mod events;
pub mod executor;
pub mod lifecycle;
pub mod processor;
pub mod progress;
pub mod service;
pub mod submitter;
