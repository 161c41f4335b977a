//! Application layer for booklub
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{MIN_MATCH_ATTEMPTS, RetryPolicy, VotingConfig};
pub use ports::{
    VotingPorts,
    match_store::{MatchFeed, MatchStore},
    membership::{ItemSource, MembershipView},
    reconciliation::{NoReconciliationJournal, PendingWrite, PendingWriteKind, ReconciliationJournal},
    session_observer::{NoObserver, SessionObserver},
    store_error::StoreError,
    vote_store::VoteStore,
};
pub use use_cases::commit_vote::{CommitVoteUseCase, MatchStatus, VoteCommitReport, WriteStatus};
pub use use_cases::load_session::{LoadReport, LoadSessionError, LoadSessionUseCase};
pub use use_cases::record_match::{RecordMatchError, RecordMatchUseCase};
pub use use_cases::voting_session::{ReconcileReport, SessionError, VotingSessionController};
