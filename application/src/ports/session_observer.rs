//! Session observer port
//!
//! Defines the interface for reporting what a voting session and its
//! background work are doing.

use super::reconciliation::PendingWrite;
use super::store_error::StoreError;
use booklub_domain::{Match, MatchOutcome, MemberId, SessionPhase, Vote};

/// Callbacks for session progress
///
/// Implementations live in the presentation layer. Every callback except
/// `on_phase_change` has a no-op default. Callbacks may fire from background
/// tasks, so implementations must be cheap and thread-safe.
pub trait SessionObserver: Send + Sync {
    /// The member's session entered `phase`
    fn on_phase_change(&self, member: &MemberId, phase: SessionPhase);

    /// A vote reached the vote store (or was already there)
    fn on_vote_committed(&self, _vote: &Vote) {}

    /// A store call keeps failing and is being retried; fired once the retry
    /// count passes the policy's `surface_after` threshold
    fn on_retrying(&self, _operation: &str, _attempt: usize, _error: &StoreError) {}

    /// A match recording attempt finished
    fn on_match(&self, _record: &Match, _outcome: MatchOutcome) {}

    /// A write was given up and journaled for reconciliation
    fn on_write_abandoned(&self, _entry: &PendingWrite) {}
}

/// No-op observer for when progress reporting is not needed
pub struct NoObserver;

impl SessionObserver for NoObserver {
    fn on_phase_change(&self, _member: &MemberId, _phase: SessionPhase) {}
}
