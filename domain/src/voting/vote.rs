//! Vote records
//!
//! A vote is one member's one-time binary preference on one item within one
//! club. The `(club, member, item)` triple is its identity: the store refuses a
//! second record for the same key.

use crate::core::{ClubId, ItemId, MemberId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identity of a vote
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VoteKey {
    pub club_id: ClubId,
    pub member_id: MemberId,
    pub item_id: ItemId,
}

impl VoteKey {
    /// Document id in the store, e.g. `"club_member_item"`
    pub fn document_id(&self) -> String {
        format!("{}_{}_{}", self.club_id, self.member_id, self.item_id)
    }
}

impl std::fmt::Display for VoteKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.document_id())
    }
}

/// A single member's preference on an item
///
/// # Example
///
/// ```
/// use booklub_domain::Vote;
///
/// let like = Vote::like("club-1", "ana", "book-7");
/// assert!(like.positive);
/// assert_eq!(like.key().document_id(), "club-1_ana_book-7");
///
/// let pass = Vote::pass("club-1", "bea", "book-7");
/// assert!(!pass.positive);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vote {
    pub club_id: ClubId,
    #[serde(rename = "userId")]
    pub member_id: MemberId,
    #[serde(rename = "bookId")]
    pub item_id: ItemId,
    #[serde(rename = "liked")]
    pub positive: bool,
    pub created_at: DateTime<Utc>,
}

impl Vote {
    /// Create a vote stamped with the current time
    pub fn new(
        club_id: impl Into<ClubId>,
        member_id: impl Into<MemberId>,
        item_id: impl Into<ItemId>,
        positive: bool,
    ) -> Self {
        Self {
            club_id: club_id.into(),
            member_id: member_id.into(),
            item_id: item_id.into(),
            positive,
            created_at: Utc::now(),
        }
    }

    /// Create a positive vote
    pub fn like(
        club_id: impl Into<ClubId>,
        member_id: impl Into<MemberId>,
        item_id: impl Into<ItemId>,
    ) -> Self {
        Self::new(club_id, member_id, item_id, true)
    }

    /// Create a negative vote
    pub fn pass(
        club_id: impl Into<ClubId>,
        member_id: impl Into<MemberId>,
        item_id: impl Into<ItemId>,
    ) -> Self {
        Self::new(club_id, member_id, item_id, false)
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn key(&self) -> VoteKey {
        VoteKey {
            club_id: self.club_id.clone(),
            member_id: self.member_id.clone(),
            item_id: self.item_id.clone(),
        }
    }
}
