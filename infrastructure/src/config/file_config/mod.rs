//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into application types.

mod journal;
mod output;
mod retry;
mod session;

pub use journal::FileJournalConfig;
pub use output::FileOutputConfig;
pub use retry::FileRetryConfig;
pub use session::FileSessionConfig;

use booklub_application::VotingConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("[{section}] max_attempts cannot be 0")]
    ZeroAttempts { section: &'static str },

    #[error("[{section}] max_backoff_ms ({max}) is below initial_backoff_ms ({initial})")]
    InvalidBackoff {
        section: &'static str,
        initial: u64,
        max: u64,
    },

    #[error("[journal] path cannot be empty")]
    EmptyJournalPath,
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Retries for vote writes and quorum-check reads
    pub retry: FileRetryConfig,
    /// Retries for the reads made while a session loads
    pub load_retry: FileRetryConfig,
    /// Retries for match recording (at least 2 attempts are always made)
    pub match_retry: FileRetryConfig,
    /// Session behavior
    pub session: FileSessionConfig,
    /// Reconciliation journal
    pub journal: FileJournalConfig,
    /// Output settings
    pub output: FileOutputConfig,
}

impl Default for FileConfig {
    fn default() -> Self {
        let voting = VotingConfig::default();
        Self {
            retry: FileRetryConfig::from_policy(&voting.vote_retry),
            load_retry: FileRetryConfig::from_policy(&voting.load_retry),
            match_retry: FileRetryConfig::from_policy(voting.match_retry()),
            session: FileSessionConfig {
                refresh_on_miss: voting.refresh_on_miss,
            },
            journal: FileJournalConfig::default(),
            output: FileOutputConfig::default(),
        }
    }
}

impl FileConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        for (section, retry) in [
            ("retry", &self.retry),
            ("load_retry", &self.load_retry),
            ("match_retry", &self.match_retry),
        ] {
            if retry.max_attempts == 0 {
                return Err(ConfigValidationError::ZeroAttempts { section });
            }
            if retry.max_backoff_ms < retry.initial_backoff_ms {
                return Err(ConfigValidationError::InvalidBackoff {
                    section,
                    initial: retry.initial_backoff_ms,
                    max: retry.max_backoff_ms,
                });
            }
        }

        if let Some(path) = &self.journal.path
            && path.as_os_str().is_empty()
        {
            return Err(ConfigValidationError::EmptyJournalPath);
        }

        Ok(())
    }

    /// Convert into the application's session configuration
    pub fn to_voting_config(&self) -> VotingConfig {
        VotingConfig::default()
            .with_vote_retry(self.retry.to_policy())
            .with_load_retry(self.load_retry.to_policy())
            .with_match_retry(self.match_retry.to_policy())
            .with_refresh_on_miss(self.session.refresh_on_miss)
    }
}
