//! Voting session configuration.
//!
//! [`VotingConfig`] groups the parameters that control how a session loads,
//! commits votes and records matches. These are application-layer concerns,
//! not domain policy.

use super::retry_policy::RetryPolicy;
use serde::{Deserialize, Serialize};

/// Match recording always gets at least this many attempts, since a failed
/// attempt after locally observed quorum is usually a transient race.
pub const MIN_MATCH_ATTEMPTS: usize = 2;

/// Session behavior parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VotingConfig {
    /// Retries for the reads performed while loading a session.
    pub load_retry: RetryPolicy,
    /// Retries for durable vote writes and quorum-check reads.
    pub vote_retry: RetryPolicy,
    /// Retries for match recording.
    match_retry: RetryPolicy,
    /// Re-read the club's votes when the cache says quorum is not reached.
    pub refresh_on_miss: bool,
}

impl Default for VotingConfig {
    fn default() -> Self {
        Self {
            load_retry: RetryPolicy::default().with_max_attempts(3),
            vote_retry: RetryPolicy::default(),
            match_retry: RetryPolicy::default().with_min_attempts(MIN_MATCH_ATTEMPTS),
            refresh_on_miss: true,
        }
    }
}

impl VotingConfig {
    /// Same retry policy everywhere, no delays (tests and in-process stores)
    pub fn immediate(max_attempts: usize) -> Self {
        Self::default()
            .with_load_retry(RetryPolicy::immediate(max_attempts))
            .with_vote_retry(RetryPolicy::immediate(max_attempts))
            .with_match_retry(RetryPolicy::immediate(max_attempts))
    }

    pub fn match_retry(&self) -> &RetryPolicy {
        &self.match_retry
    }

    // ==================== Builder Methods ====================

    pub fn with_load_retry(mut self, policy: RetryPolicy) -> Self {
        self.load_retry = policy;
        self
    }

    pub fn with_vote_retry(mut self, policy: RetryPolicy) -> Self {
        self.vote_retry = policy;
        self
    }

    /// Set the match retry policy, raised to [`MIN_MATCH_ATTEMPTS`] if lower
    pub fn with_match_retry(mut self, policy: RetryPolicy) -> Self {
        self.match_retry = policy.with_min_attempts(MIN_MATCH_ATTEMPTS);
        self
    }

    pub fn with_refresh_on_miss(mut self, enabled: bool) -> Self {
        self.refresh_on_miss = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let config = VotingConfig::default();
        assert!(config.refresh_on_miss);
        assert_eq!(config.load_retry.max_attempts, 3);
        assert!(config.match_retry().max_attempts >= MIN_MATCH_ATTEMPTS);
    }

    #[test]
    fn test_match_retry_is_at_least_two_attempts() {
        let config = VotingConfig::default().with_match_retry(RetryPolicy::immediate(1));
        assert_eq!(config.match_retry().max_attempts, 2);

        let config = VotingConfig::immediate(1);
        assert_eq!(config.vote_retry.max_attempts, 1);
        assert_eq!(config.match_retry().max_attempts, 2);
    }
}
