//! Record Match use case
//!
//! Persists a match for `(club, item)` exactly once. Safe to call from any
//! number of sessions at the same time: the store's create-if-absent on the
//! idempotency key decides the single winner.

use crate::config::RetryPolicy;
use crate::ports::match_store::MatchStore;
use crate::ports::session_observer::{NoObserver, SessionObserver};
use crate::ports::store_error::StoreError;
use crate::use_cases::retry::with_retry;
use booklub_domain::{Club, Item, Match, MatchOutcome};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur while recording a match
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordMatchError {
    /// The store could not be reached; the match may or may not exist
    #[error("Match store unavailable: {0}")]
    StoreUnavailable(#[source] StoreError),

    /// The store refused the record for a non-transient reason
    #[error("Match rejected: {0}")]
    Rejected(#[source] StoreError),
}

impl RecordMatchError {
    /// The store error behind the failure
    pub fn source_error(&self) -> &StoreError {
        match self {
            RecordMatchError::StoreUnavailable(e) | RecordMatchError::Rejected(e) => e,
        }
    }
}

/// Use case for idempotent match recording
pub struct RecordMatchUseCase {
    matches: Arc<dyn MatchStore>,
    policy: RetryPolicy,
    observer: Arc<dyn SessionObserver>,
}

impl RecordMatchUseCase {
    pub fn new(matches: Arc<dyn MatchStore>, policy: RetryPolicy) -> Self {
        Self {
            matches,
            policy,
            observer: Arc::new(NoObserver),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn SessionObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Record `item` as matched in `club` unless it already is
    ///
    /// `AlreadyExists` from the store is the benign outcome of a race and is
    /// reported as [`MatchOutcome::AlreadyExists`]. An unreachable store is
    /// always an error, never a silent "exists".
    pub async fn record_if_absent(
        &self,
        club: &Club,
        item: &Item,
    ) -> Result<MatchOutcome, RecordMatchError> {
        let record = Match::new(club, item.clone());
        self.record(&record).await
    }

    /// Same as [`record_if_absent`](Self::record_if_absent) for a prepared record
    pub async fn record(&self, record: &Match) -> Result<MatchOutcome, RecordMatchError> {
        let matches = &self.matches;
        let result = with_retry(
            &self.policy,
            "record match",
            self.observer.as_ref(),
            None,
            || matches.create_if_absent(record),
        )
        .await;

        let outcome = match result {
            Ok(outcome) => outcome,
            Err(e) if e.is_already_exists() => MatchOutcome::AlreadyExists,
            Err(e) if e.is_transient() => return Err(RecordMatchError::StoreUnavailable(e)),
            Err(e) => return Err(RecordMatchError::Rejected(e)),
        };

        match outcome {
            MatchOutcome::Created => info!(
                "Match recorded: '{}' in club {}",
                record.item.title, record.club_id
            ),
            MatchOutcome::AlreadyExists => debug!(
                "Match {} already recorded",
                record.key().idempotency_key()
            ),
        }
        self.observer.on_match(record, outcome);
        Ok(outcome)
    }
}
