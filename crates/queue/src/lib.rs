//! Task submission queue: the hand-off seam between the engine and
//! whatever executes tasks.
//!
//! [`submitter::TaskSubmitter`] abstracts over the submission backend
//! (direct HTTP to a worker endpoint, or an in-process processor — see
//! the engine crate). [`dispatcher::Dispatcher`] drives a batch of
//! submissions through a configured submitter under a concurrency cap.

pub mod dispatcher;
pub mod http;
pub mod submitter;
