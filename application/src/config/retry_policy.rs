//! Retry policy for store calls.
//!
//! [`RetryPolicy`] controls how transient store failures (network errors,
//! timeouts) are retried: how many attempts, how long to back off between
//! them, and when to start telling the caller that a call is struggling.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Exponential backoff retry parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total attempts, the first one included. Never below 1.
    pub max_attempts: usize,
    /// Delay after the first failed attempt; doubles on each further failure.
    pub initial_backoff: Duration,
    /// Upper bound for a single delay.
    pub max_backoff: Duration,
    /// Failed attempts after which the observer is told the call is retrying.
    pub surface_after: usize,
    /// Per-attempt time limit; an attempt exceeding it counts as a timeout.
    pub attempt_timeout: Option<Duration>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_secs(2),
            surface_after: 2,
            attempt_timeout: Some(Duration::from_secs(10)),
        }
    }
}

impl RetryPolicy {
    /// Retry without any delay (tests and in-process stores)
    pub fn immediate(max_attempts: usize) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            initial_backoff: Duration::ZERO,
            max_backoff: Duration::ZERO,
            surface_after: 1,
            attempt_timeout: None,
        }
    }

    /// Delay to wait after failed attempt number `attempt` (1-indexed)
    pub fn backoff_for(&self, attempt: usize) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16) as u32;
        self.initial_backoff
            .saturating_mul(2u32.saturating_pow(exponent))
            .min(self.max_backoff)
    }

    // ==================== Builder Methods ====================

    pub fn with_max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Raise `max_attempts` to at least `attempts`
    pub fn with_min_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = self.max_attempts.max(attempts);
        self
    }

    pub fn with_backoff(mut self, initial: Duration, max: Duration) -> Self {
        self.initial_backoff = initial;
        self.max_backoff = max.max(initial);
        self
    }

    pub fn with_surface_after(mut self, attempts: usize) -> Self {
        self.surface_after = attempts;
        self
    }

    pub fn with_attempt_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.attempt_timeout = timeout;
        self
    }
}
