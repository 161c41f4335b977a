//! Voting domain
//!
//! Everything the matching engine decides with: votes, the per-session vote
//! cache, the unvoted item queue, quorum evaluation and match records.
//!
//! ```text
//! queue head ──► decision ──► Vote ──► VoteCache ──► QuorumEvaluator ──► Match
//!                                (durable store)      (+ current roster)   (create-if-absent)
//! ```

pub mod cache;
pub mod matched;
pub mod queue;
pub mod quorum;
pub mod vote;

pub use cache::VoteCache;
pub use matched::{Match, MatchKey, MatchOutcome};
pub use queue::{ItemQueue, QueueBuild, build_queue};
pub use quorum::{QuorumEvaluator, QuorumStatus};
pub use vote::{Vote, VoteKey};
