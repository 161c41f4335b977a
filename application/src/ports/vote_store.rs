//! Vote store port
//!
//! Durable, create-only storage of votes keyed by `(club, member, item)`.

use super::store_error::StoreError;
use async_trait::async_trait;
use booklub_domain::{ClubId, MemberId, Vote};

/// Shared vote storage
///
/// Implementations must enforce key uniqueness themselves: the store key is
/// the only concurrency control between sessions.
#[async_trait]
pub trait VoteStore: Send + Sync {
    /// Persist a vote
    ///
    /// Fails with [`StoreError::AlreadyExists`] if a vote for the same
    /// `(club, member, item)` key is already stored. The stored record is
    /// never replaced.
    async fn create(&self, vote: &Vote) -> Result<(), StoreError>;

    /// All votes cast in a club
    async fn query_by_club(&self, club_id: &ClubId) -> Result<Vec<Vote>, StoreError>;

    /// Votes cast by one member in a club
    async fn query_by_club_and_member(
        &self,
        club_id: &ClubId,
        member_id: &MemberId,
    ) -> Result<Vec<Vote>, StoreError>;
}
