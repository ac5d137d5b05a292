//! Retry policy for page fetches
//!
//! Exponential backoff (`base * 2^(attempt-1)`), capped, with a little
//! random jitter. A server `Retry-After` wins when it asks for longer, up
//! to `max_delay_ms`.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::config::defaults;
use super::fetch_error::FetchError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Total attempts including the first one
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
    /// Upper bound of the random extra delay added to each backoff
    pub jitter_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: defaults::MAX_ATTEMPTS,
            base_delay_ms: defaults::RETRY_BASE_DELAY_MS,
            max_delay_ms: defaults::RETRY_MAX_DELAY_MS,
            jitter_ms: defaults::RETRY_JITTER_MS,
        }
    }
}

impl RetryPolicy {
    /// Policy that never retries
    pub const fn none() -> Self {
        Self {
            max_attempts: 1,
            base_delay_ms: 0,
            max_delay_ms: 0,
            jitter_ms: 0,
        }
    }

    /// Whether `error`, seen on attempt `attempt` (1-based), deserves another try
    pub const fn should_retry(&self, error: &FetchError, attempt: u32) -> bool {
        attempt < self.max_attempts && error.is_recoverable()
    }

    /// Backoff before the attempt following `attempt`, without jitter
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(20);
        let delay = self.base_delay_ms.saturating_mul(1_u64 << exponent);
        Duration::from_millis(delay.min(self.max_delay_ms))
    }

    pub fn delay_for(&self, error: &FetchError, attempt: u32) -> Duration {
        let jitter = if self.jitter_ms > 0 {
            Duration::from_millis(fastrand::u64(0..=self.jitter_ms))
        } else {
            Duration::ZERO
        };
        let backoff = self.backoff(attempt) + jitter;
        let cap = Duration::from_millis(self.max_delay_ms);
        error
            .retry_after()
            .map_or(backoff, |server| server.min(cap).max(backoff))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server_error(retry_after: Option<Duration>) -> FetchError {
        FetchError::HttpStatus {
            status: 503,
            url: "https://example.com".to_string(),
            retry_after,
        }
    }

    #[test]
    fn test_exponential_backoff_is_capped() {
        let policy = RetryPolicy {
            max_attempts: 10,
            base_delay_ms: 1000,
            max_delay_ms: 5000,
            jitter_ms: 0,
        };
        assert_eq!(policy.backoff(1), Duration::from_millis(1000));
        assert_eq!(policy.backoff(2), Duration::from_millis(2000));
        assert_eq!(policy.backoff(3), Duration::from_millis(4000));
        assert_eq!(policy.backoff(4), Duration::from_millis(5000));
        assert_eq!(policy.backoff(60), Duration::from_millis(5000));
    }

    #[test]
    fn test_attempts_are_bounded() {
        let policy = RetryPolicy {
            max_attempts: 3,
            ..RetryPolicy::default()
        };
        let err = server_error(None);
        assert!(policy.should_retry(&err, 1));
        assert!(policy.should_retry(&err, 2));
        assert!(!policy.should_retry(&err, 3));
        assert!(!RetryPolicy::none().should_retry(&err, 1));
    }

    #[test]
    fn test_jitter_and_retry_after() {
        let policy = RetryPolicy {
            max_attempts: 3,
            base_delay_ms: 100,
            max_delay_ms: 1000,
            jitter_ms: 50,
        };
        let delay = policy.delay_for(&server_error(None), 1);
        assert!(delay >= Duration::from_millis(100) && delay <= Duration::from_millis(150));

        let delay = policy.delay_for(&server_error(Some(Duration::from_millis(800))), 1);
        assert_eq!(delay, Duration::from_millis(800));
    }

    #[test]
    fn test_retry_after_is_capped() {
        let policy = RetryPolicy::default();
        let delay = policy.delay_for(&server_error(Some(Duration::from_secs(86_400))), 1);
        assert!(delay <= Duration::from_millis(policy.max_delay_ms + policy.jitter_ms));
        assert!(delay >= Duration::from_millis(policy.max_delay_ms));
    }
}
