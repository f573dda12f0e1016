//! Engine configuration, loaded once at process start.
//!
//! Values come from the environment (with `.env` support); the loaded
//! config is passed explicitly into
//! [`JobService::from_config`](crate::service::JobService::from_config)
//! — configuration is injected, never read ambiently at call sites.

use imgforge_queue::dispatcher::DEFAULT_MAX_CONCURRENCY;
use imgforge_queue::http::DEFAULT_SUBMIT_TIMEOUT_SECS;

/// Default worker endpoint for the HTTP submission backend.
pub const DEFAULT_WORKER_URL: &str = "http://localhost:8000/api/admin/worker/process-task";

#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Worker endpoint the HTTP submitter POSTs task ids to.
    pub worker_url: String,
    /// Cap on concurrent task hand-offs.
    pub max_concurrent_tasks: usize,
    /// Hand-off timeout for the HTTP submitter, in seconds.
    pub submit_timeout_secs: u64,
    /// Select the HTTP submission backend instead of the in-process
    /// processor. Decided here, once — not per dispatch.
    pub use_http_queue: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            worker_url: DEFAULT_WORKER_URL.to_string(),
            max_concurrent_tasks: DEFAULT_MAX_CONCURRENCY,
            submit_timeout_secs: DEFAULT_SUBMIT_TIMEOUT_SECS,
            use_http_queue: false,
        }
    }
}

impl EngineConfig {
    /// Load configuration from the environment, falling back to the
    /// defaults for anything unset or unparsable.
    ///
    /// Recognized variables: `WORKER_URL`, `MAX_CONCURRENT_TASKS`,
    /// `SUBMIT_TIMEOUT_SECS`, `USE_HTTP_QUEUE`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let defaults = Self::default();
        Self {
            worker_url: std::env::var("WORKER_URL").unwrap_or(defaults.worker_url),
            max_concurrent_tasks: parse_or(
                std::env::var("MAX_CONCURRENT_TASKS").ok(),
                defaults.max_concurrent_tasks,
            ),
            submit_timeout_secs: parse_or(
                std::env::var("SUBMIT_TIMEOUT_SECS").ok(),
                defaults.submit_timeout_secs,
            ),
            use_http_queue: flag_or(std::env::var("USE_HTTP_QUEUE").ok(), false),
        }
    }
}

fn parse_or<T: std::str::FromStr>(value: Option<String>, default: T) -> T {
    value.and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn flag_or(value: Option<String>, default: bool) -> bool {
    match value {
        Some(v) => v.eq_ignore_ascii_case("true") || v == "1",
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = EngineConfig::default();
        assert_eq!(config.max_concurrent_tasks, 5);
        assert_eq!(config.submit_timeout_secs, 300);
        assert!(!config.use_http_queue);
        assert_eq!(config.worker_url, DEFAULT_WORKER_URL);
    }

    #[test]
    fn parse_or_falls_back_on_garbage() {
        assert_eq!(parse_or(Some("8".into()), 5usize), 8);
        assert_eq!(parse_or(Some("not-a-number".into()), 5usize), 5);
        assert_eq!(parse_or(None, 5usize), 5);
    }

    #[test]
    fn flag_or_accepts_true_and_one() {
        assert!(flag_or(Some("true".into()), false));
        assert!(flag_or(Some("TRUE".into()), false));
        assert!(flag_or(Some("1".into()), false));
        assert!(!flag_or(Some("false".into()), false));
        assert!(!flag_or(Some("yes".into()), false));
        assert!(!flag_or(None, false));
    }
}
