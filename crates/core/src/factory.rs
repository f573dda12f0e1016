//! Job factory: build a job and its tasks from a batch request.

use crate::error::CoreError;
use crate::job::Job;
use crate::task::Task;
use crate::types::Timestamp;

/// Style preset names understood by the generation pipeline.
///
/// The factory does not reject unknown styles — the executor applies a
/// generic fallback — but an empty style is a malformed request.
pub const STYLE_PRODUCT_PHOTOGRAPHY: &str = "product_photography";
pub const STYLE_LIFESTYLE: &str = "lifestyle";
pub const STYLE_ARTISTIC: &str = "artistic";
pub const STYLE_RUSTIC: &str = "rustic";

/// Default style applied when the caller does not pick one.
pub const DEFAULT_STYLE: &str = STYLE_PRODUCT_PHOTOGRAPHY;

/// A job plus its tasks, created atomically as a unit.
#[derive(Debug, Clone)]
pub struct NewJob {
    pub job: Job,
    /// Tasks in creation order: prompt order, each replicated
    /// `count_per_prompt` times. This order is the dispatch order.
    pub tasks: Vec<Task>,
}

/// Build a job with one task per (prompt, replication) pair.
///
/// `total_tasks = prompts.len() * count_per_prompt`; every task starts
/// `pending`. Fails with [`CoreError::InvalidRequest`] when `prompts`
/// is empty, `count_per_prompt` is zero, `style` is empty, or the task
/// count overflows `u32`.
pub fn build_job(
    prompts: &[String],
    style: &str,
    count_per_prompt: u32,
    now: Timestamp,
) -> Result<NewJob, CoreError> {
    if prompts.is_empty() {
        return Err(CoreError::InvalidRequest(
            "prompts must not be empty".into(),
        ));
    }
    if count_per_prompt < 1 {
        return Err(CoreError::InvalidRequest(
            "count_per_prompt must be at least 1".into(),
        ));
    }
    if style.is_empty() {
        return Err(CoreError::InvalidRequest("style must not be empty".into()));
    }

    let total = u32::try_from(prompts.len())
        .ok()
        .and_then(|n| n.checked_mul(count_per_prompt))
        .ok_or_else(|| {
            CoreError::InvalidRequest(
                "prompts x count_per_prompt exceeds the task limit".into(),
            )
        })?;
    let job = Job::new(total, now);

    let mut tasks = Vec::with_capacity(total as usize);
    for prompt in prompts {
        for _ in 0..count_per_prompt {
            tasks.push(Task::new(job.id, prompt.clone(), style, now));
        }
    }

    Ok(NewJob { job, tasks })
}
