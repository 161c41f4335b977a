//! Domain layer for booklub
//!
//! This crate contains the core entities, value objects and pure algorithms of
//! the matching engine. It performs no I/O and has no dependencies on
//! infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Quorum
//!
//! An item reaches quorum in a club when every *current* member has voted
//! positively on it. Quorum is recomputed on demand from two read-only sets
//! (the roster snapshot and the positive voters), never kept as a shared
//! counter.
//!
//! ## Match
//!
//! The durable, singular record that quorum was reached for a `(club, item)`
//! pair. Its identity doubles as the idempotency key that lets concurrent
//! sessions race to record it safely.
//!
//! ## Session
//!
//! One member's voting window in one club: a state machine carrying its own
//! club snapshot, vote cache and unvoted queue.

pub mod catalog;
pub mod club;
pub mod config;
pub mod core;
pub mod session;
pub mod util;
pub mod voting;

// Re-export commonly used types
pub use catalog::Item;
pub use club::{Club, Membership};
pub use config::OutputFormat;
pub use core::{ClubId, DomainError, ItemId, MemberId};
pub use session::{Decision, SessionPhase, SessionState, VotingSession};
pub use voting::{
    ItemQueue, Match, MatchKey, MatchOutcome, QueueBuild, QuorumEvaluator, QuorumStatus, Vote,
    VoteCache, VoteKey, build_queue,
};
