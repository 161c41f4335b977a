//! Membership and item source ports
//!
//! Both collaborators are owned outside the voting core and are read-only to
//! it. Their answers may change between calls, so the core re-fetches rather
//! than caching across sessions.

use super::store_error::StoreError;
use async_trait::async_trait;
use booklub_domain::{Club, ClubId, Item, Membership};

/// Current roster of a club
#[async_trait]
pub trait MembershipView: Send + Sync {
    /// Snapshot of the club (name and members) as of now
    async fn snapshot(&self, club_id: &ClubId) -> Result<Club, StoreError>;

    /// Current members of the club
    async fn current_members(&self, club_id: &ClubId) -> Result<Membership, StoreError> {
        Ok(self.snapshot(club_id).await?.members)
    }
}

/// Source of proposed items
#[async_trait]
pub trait ItemSource: Send + Sync {
    /// Items proposed by any of `members`, deduplicated by item id
    async fn items_added_by_any_of(&self, members: &Membership) -> Result<Vec<Item>, StoreError>;
}
