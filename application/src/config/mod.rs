//! Application-level configuration.
//!
//! This module provides configuration types that control how use cases behave:
//!
//! - [`RetryPolicy`]: backoff and attempt limits for store calls
//! - [`VotingConfig`]: per-session parameters (load, vote and match retries,
//!   refresh-on-miss)

pub mod retry_policy;
pub mod voting_config;

pub use retry_policy::RetryPolicy;
pub use voting_config::{MIN_MATCH_ATTEMPTS, VotingConfig};
