//! Voting session state machine
//!
//! One member's interaction window with one club's voting flow. The session
//! carries its own club snapshot, vote cache and queue; nothing is read from
//! ambient state.
//!
//! ```text
//! Loading ──warm_up──► Ready(queue) ──decide──► Ready(tail) ──► ... ──► Exhausted
//!    │                                                                     │
//!    └──fail──► Errored                               refresh_items (grown item set)
//! ```
//!
//! Deciding is transient: [`VotingSession::decide`] performs the local
//! transition synchronously and hands back a [`Decision`] describing the
//! durable work the caller must still carry out.

use crate::catalog::Item;
use crate::club::{Club, Membership};
use crate::core::{ClubId, DomainError, ItemId, MemberId};
use crate::voting::{ItemQueue, Vote, VoteCache, build_queue};
use std::collections::HashSet;

/// Observable phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionPhase {
    Loading,
    Ready,
    Deciding,
    Exhausted,
    Errored,
}

impl SessionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionPhase::Loading => "loading",
            SessionPhase::Ready => "ready",
            SessionPhase::Deciding => "deciding",
            SessionPhase::Exhausted => "exhausted",
            SessionPhase::Errored => "errored",
        }
    }

    /// No further decisions are possible without new items or a restart
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionPhase::Exhausted | SessionPhase::Errored)
    }
}

impl std::fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Session state with its payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Loading,
    /// Non-empty queue; the head is presented
    Ready(ItemQueue),
    Exhausted,
    Errored(String),
}

impl SessionState {
    pub fn phase(&self) -> SessionPhase {
        match self {
            SessionState::Loading => SessionPhase::Loading,
            SessionState::Ready(_) => SessionPhase::Ready,
            SessionState::Exhausted => SessionPhase::Exhausted,
            SessionState::Errored(_) => SessionPhase::Errored,
        }
    }

    fn from_queue(queue: ItemQueue) -> Self {
        if queue.is_empty() {
            SessionState::Exhausted
        } else {
            SessionState::Ready(queue)
        }
    }
}

/// A member's choice on the head item, produced by the local transition
#[derive(Debug, Clone)]
pub struct Decision {
    /// The vote to persist
    pub vote: Vote,
    /// The item that was decided on
    pub item: Item,
    /// Positive voters known to this session, this vote included
    pub positive_voters: HashSet<MemberId>,
}

impl Decision {
    pub fn is_positive(&self) -> bool {
        self.vote.positive
    }
}

/// Session-scoped voting state for one member in one club
#[derive(Debug, Clone)]
pub struct VotingSession {
    club: Club,
    member: MemberId,
    cache: VoteCache,
    voted: HashSet<ItemId>,
    state: SessionState,
}

impl VotingSession {
    /// Start a session in `Loading`; the roster is not known yet
    pub fn loading(club_id: impl Into<ClubId>, member: impl Into<MemberId>) -> Self {
        let club_id = club_id.into();
        Self {
            cache: VoteCache::new(club_id.clone()),
            club: Club::new(club_id, String::new(), Membership::default()),
            member: member.into(),
            voted: HashSet::new(),
            state: SessionState::Loading,
        }
    }

    /// Finish loading: take the roster snapshot, warm the cache and build the
    /// first queue
    ///
    /// Returns the own votes that no longer map to a reachable item.
    pub fn warm_up(
        &mut self,
        club: Club,
        items: Vec<Item>,
        own_votes: &[Vote],
        club_votes: &[Vote],
    ) -> Result<Vec<ItemId>, DomainError> {
        self.require(&[SessionPhase::Loading], "warm up")?;
        if !club.is_member(&self.member) {
            return Err(DomainError::NotAMember(self.member.to_string()));
        }
        self.club = Club { id: self.club.id.clone(), ..club };

        let (cache, voted) = VoteCache::load(self.club.id.clone(), club_votes, own_votes);
        self.cache = cache;
        self.voted = voted;

        let build = build_queue(&self.club.members, items, &self.voted);
        self.state = SessionState::from_queue(build.queue);
        Ok(build.orphaned_votes)
    }

    /// Loading failed; only a new session can leave this state
    pub fn fail(&mut self, reason: impl Into<String>) {
        self.state = SessionState::Errored(reason.into());
    }

    /// Decide on the head item and advance the queue immediately
    pub fn decide(&mut self, positive: bool) -> Result<Decision, DomainError> {
        let phase = self.phase();
        let SessionState::Ready(queue) = &mut self.state else {
            return Err(DomainError::InvalidTransition {
                action: "decide",
                phase: phase.as_str(),
            });
        };
        let item = queue.advance().ok_or(DomainError::QueueEmpty)?;
        if queue.is_empty() {
            self.state = SessionState::Exhausted;
        }

        self.cache.record_local_vote(&item.id, &self.member, positive);
        self.voted.insert(item.id.clone());

        let vote = Vote::new(self.club.id.clone(), self.member.clone(), item.id.clone(), positive);
        Ok(Decision {
            positive_voters: self.cache.positive_voters(&item.id),
            vote,
            item,
        })
    }

    /// Rebuild the queue after the external item set changed
    ///
    /// Leaves `Exhausted` when the new queue is non-empty. Returns orphaned
    /// own votes, as in [`warm_up`](Self::warm_up).
    pub fn refresh_items(&mut self, items: Vec<Item>) -> Result<Vec<ItemId>, DomainError> {
        self.require(&[SessionPhase::Ready, SessionPhase::Exhausted], "refresh items")?;
        let build = build_queue(&self.club.members, items, &self.voted);
        self.state = SessionState::from_queue(build.queue);
        Ok(build.orphaned_votes)
    }

    /// Replace the roster snapshot with a fresher one
    pub fn update_membership(&mut self, club: Club) {
        if club.id == self.club.id {
            self.club = club;
        }
    }

    /// Merge votes observed after warm-up into the cache
    pub fn absorb_votes(&mut self, votes: &[Vote]) -> usize {
        self.cache.absorb(votes)
    }

    /// Drop this member's positive on `item_id` from the cache; the store
    /// already held a negative vote under that key
    pub fn discard_local_vote(&mut self, item_id: &ItemId) {
        self.cache.discard_local_vote(item_id, &self.member);
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn phase(&self) -> SessionPhase {
        self.state.phase()
    }

    pub fn club(&self) -> &Club {
        &self.club
    }

    pub fn member(&self) -> &MemberId {
        &self.member
    }

    pub fn cache(&self) -> &VoteCache {
        &self.cache
    }

    /// Whether the member has voted on `item_id` (this or an earlier session)
    pub fn has_voted(&self, item_id: &ItemId) -> bool {
        self.voted.contains(item_id)
    }

    /// The item currently presented
    pub fn current_item(&self) -> Option<&Item> {
        match &self.state {
            SessionState::Ready(queue) => queue.head(),
            _ => None,
        }
    }

    /// Items left in the queue, head included
    pub fn remaining(&self) -> usize {
        match &self.state {
            SessionState::Ready(queue) => queue.len(),
            _ => 0,
        }
    }

    fn require(&self, allowed: &[SessionPhase], action: &'static str) -> Result<(), DomainError> {
        let phase = self.phase();
        if allowed.contains(&phase) {
            Ok(())
        } else {
            Err(DomainError::InvalidTransition {
                action,
                phase: phase.as_str(),
            })
        }
    }
}
