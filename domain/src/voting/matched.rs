//! Match records
//!
//! A match is the durable, singular record that every member of a club voted
//! positively on the same item.

use crate::catalog::Item;
use crate::club::Club;
use crate::core::{ClubId, ItemId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identity of a match: at most one record exists per `(club, item)`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MatchKey {
    pub club_id: ClubId,
    pub item_id: ItemId,
}

impl MatchKey {
    pub fn new(club_id: impl Into<ClubId>, item_id: impl Into<ItemId>) -> Self {
        Self {
            club_id: club_id.into(),
            item_id: item_id.into(),
        }
    }

    /// Deterministic idempotency key shared by every session that detects the
    /// same quorum, e.g. `"club_item"`
    pub fn idempotency_key(&self) -> String {
        format!("{}_{}", self.club_id, self.item_id)
    }
}

impl std::fmt::Display for MatchKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.idempotency_key())
    }
}

/// A recorded match (Entity)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub club_id: ClubId,
    /// Denormalized club name for display
    pub club_name: String,
    #[serde(rename = "bookId")]
    pub item_id: ItemId,
    /// Copy of the item at match time
    #[serde(rename = "book")]
    pub item: Item,
    pub matched_at: DateTime<Utc>,
}

impl Match {
    /// Build the record for `item` in `club`, stamped now
    pub fn new(club: &Club, item: Item) -> Self {
        Self {
            club_id: club.id.clone(),
            club_name: club.name.clone(),
            item_id: item.id.clone(),
            item,
            matched_at: Utc::now(),
        }
    }

    pub fn key(&self) -> MatchKey {
        MatchKey::new(self.club_id.clone(), self.item_id.clone())
    }
}

/// Result of a create-if-absent write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchOutcome {
    /// This call persisted the match
    Created,
    /// Another attempt got there first; nothing was written
    AlreadyExists,
}

impl MatchOutcome {
    pub fn is_created(&self) -> bool {
        matches!(self, MatchOutcome::Created)
    }
}

impl std::fmt::Display for MatchOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchOutcome::Created => write!(f, "created"),
            MatchOutcome::AlreadyExists => write!(f, "already-exists"),
        }
    }
}
