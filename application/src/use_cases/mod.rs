//! Use cases
//!
//! Application-level operations that orchestrate domain logic against the
//! ports.

pub mod commit_vote;
pub mod load_session;
pub mod record_match;
pub(crate) mod retry;
pub mod voting_session;

#[cfg(test)]
pub(crate) mod test_support;
