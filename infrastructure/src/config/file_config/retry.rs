//! Retry configuration from TOML (`[retry]`, `[load_retry]`, `[match_retry]`)

use booklub_application::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw retry section; durations are in milliseconds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRetryConfig {
    pub max_attempts: usize,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
    /// Failed attempts before the "retrying" notice is shown
    pub surface_after: usize,
    /// Per-attempt limit; 0 disables it
    pub attempt_timeout_ms: u64,
}

impl Default for FileRetryConfig {
    fn default() -> Self {
        Self::from_policy(&RetryPolicy::default())
    }
}

impl FileRetryConfig {
    pub fn from_policy(policy: &RetryPolicy) -> Self {
        Self {
            max_attempts: policy.max_attempts,
            initial_backoff_ms: policy.initial_backoff.as_millis() as u64,
            max_backoff_ms: policy.max_backoff.as_millis() as u64,
            surface_after: policy.surface_after,
            attempt_timeout_ms: policy
                .attempt_timeout
                .map(|t| t.as_millis() as u64)
                .unwrap_or(0),
        }
    }

    pub fn to_policy(&self) -> RetryPolicy {
        let timeout = (self.attempt_timeout_ms > 0)
            .then(|| Duration::from_millis(self.attempt_timeout_ms));
        RetryPolicy::default()
            .with_max_attempts(self.max_attempts)
            .with_backoff(
                Duration::from_millis(self.initial_backoff_ms),
                Duration::from_millis(self.max_backoff_ms),
            )
            .with_surface_after(self.surface_after)
            .with_attempt_timeout(timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_policy_default() {
        assert_eq!(FileRetryConfig::default().to_policy(), RetryPolicy::default());
    }

    #[test]
    fn test_zero_timeout_disables_limit() {
        let config = FileRetryConfig {
            attempt_timeout_ms: 0,
            ..Default::default()
        };
        assert_eq!(config.to_policy().attempt_timeout, None);
    }
}
