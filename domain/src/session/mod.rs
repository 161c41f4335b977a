//! Voting sessions

pub mod state;

pub use state::{Decision, SessionPhase, SessionState, VotingSession};
