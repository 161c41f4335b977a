//! Per-session vote cache
//!
//! Mirrors a club's positive-vote tally per item so a session can evaluate
//! quorum without re-reading the whole vote set on every decision. It is a
//! read optimization: the vote store stays authoritative, and the cache is
//! rebuilt from scratch whenever a session starts.

use super::vote::Vote;
use crate::core::{ClubId, ItemId, MemberId};
use std::collections::{HashMap, HashSet};

/// Positive voters per item for one club, as seen by one session
#[derive(Debug, Clone)]
pub struct VoteCache {
    club_id: ClubId,
    positive: HashMap<ItemId, HashSet<MemberId>>,
}

impl VoteCache {
    pub fn new(club_id: impl Into<ClubId>) -> Self {
        Self {
            club_id: club_id.into(),
            positive: HashMap::new(),
        }
    }

    /// Warm the cache from one full read of the club's votes and one read of
    /// the member's own votes.
    ///
    /// Returns the cache together with the set of items the member already
    /// voted on. Votes belonging to other clubs are ignored.
    pub fn load(club_id: impl Into<ClubId>, club_votes: &[Vote], own_votes: &[Vote]) -> (Self, HashSet<ItemId>) {
        let mut cache = Self::new(club_id);
        cache.absorb(club_votes);
        cache.absorb(own_votes);

        let own_voted = own_votes
            .iter()
            .filter(|v| v.club_id == cache.club_id)
            .map(|v| v.item_id.clone())
            .collect();

        (cache, own_voted)
    }

    pub fn club_id(&self) -> &ClubId {
        &self.club_id
    }

    /// Mirror a vote the session itself just cast. Negative votes cannot
    /// cause quorum and are not tracked.
    pub fn record_local_vote(&mut self, item_id: &ItemId, member_id: &MemberId, positive: bool) {
        if !positive {
            return;
        }
        self.positive
            .entry(item_id.clone())
            .or_default()
            .insert(member_id.clone());
    }

    /// Undo [`record_local_vote`](Self::record_local_vote) when the store
    /// turned out to hold a different vote under the same key
    pub fn discard_local_vote(&mut self, item_id: &ItemId, member_id: &MemberId) {
        if let Some(voters) = self.positive.get_mut(item_id) {
            voters.remove(member_id);
            if voters.is_empty() {
                self.positive.remove(item_id);
            }
        }
    }

    /// Merge votes read later from the store; returns how many positive
    /// voters were new to the cache
    pub fn absorb(&mut self, votes: &[Vote]) -> usize {
        let mut added = 0;
        for vote in votes.iter().filter(|v| v.positive && v.club_id == self.club_id) {
            if self
                .positive
                .entry(vote.item_id.clone())
                .or_default()
                .insert(vote.member_id.clone())
            {
                added += 1;
            }
        }
        added
    }

    /// Positive voters known for `item_id` (empty if none)
    pub fn positive_voters(&self, item_id: &ItemId) -> HashSet<MemberId> {
        self.positive.get(item_id).cloned().unwrap_or_default()
    }

    /// Items with at least one known positive vote
    pub fn tallies(&self) -> impl Iterator<Item = (&ItemId, &HashSet<MemberId>)> {
        self.positive.iter()
    }

    pub fn len(&self) -> usize {
        self.positive.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positive.is_empty()
    }
}
