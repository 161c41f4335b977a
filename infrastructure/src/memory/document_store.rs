//! [`MemoryDocumentStore`]: every store port backed by process memory.

use async_trait::async_trait;
use booklub_application::ports::match_store::{MatchFeed, MatchStore};
use booklub_application::ports::membership::{ItemSource, MembershipView};
use booklub_application::ports::store_error::StoreError;
use booklub_application::ports::vote_store::VoteStore;
use booklub_domain::{Club, ClubId, Item, ItemId, Match, MatchOutcome, MemberId, Membership, Vote};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::{RwLock, broadcast, mpsc};
use tracing::{debug, trace};

const MATCH_EVENT_CAPACITY: usize = 256;
const FEED_CAPACITY: usize = 64;

/// Store operations that can be made to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    VoteWrite,
    VoteRead,
    MatchWrite,
    MatchRead,
    Membership,
    Items,
}

#[derive(Default)]
struct Collections {
    clubs: HashMap<ClubId, Club>,
    items: Vec<Item>,
    item_ids: HashSet<ItemId>,
    votes: Vec<Vote>,
    vote_ids: HashSet<String>,
    matches: Vec<Match>,
    match_keys: HashSet<String>,
}

/// In-memory document store implementing every store port
///
/// Collections live behind one `RwLock`; create-if-absent checks and inserts
/// under the write lock, so concurrent writers of the same key see exactly one
/// success.
pub struct MemoryDocumentStore {
    collections: RwLock<Collections>,
    faults: Mutex<HashMap<Operation, VecDeque<StoreError>>>,
    match_events: broadcast::Sender<Match>,
    latency: Option<Duration>,
}

impl Default for MemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        let (match_events, _) = broadcast::channel(MATCH_EVENT_CAPACITY);
        Self {
            collections: RwLock::new(Collections::default()),
            faults: Mutex::new(HashMap::new()),
            match_events,
            latency: None,
        }
    }

    /// Delay every store call by `latency`, like a network round trip
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Make the next `count` calls of `operation` fail with `error`
    pub fn fail_next(&self, operation: Operation, count: usize, error: StoreError) {
        if let Ok(mut faults) = self.faults.lock() {
            faults
                .entry(operation)
                .or_default()
                .extend(std::iter::repeat_n(error, count));
        }
    }

    /// Drop every pending injected fault
    pub fn clear_faults(&self) {
        if let Ok(mut faults) = self.faults.lock() {
            faults.clear();
        }
    }

    // ==================== Collaborator Helpers ====================

    /// Create a club with its founder as the only member
    pub async fn create_club(
        &self,
        club_id: impl Into<ClubId>,
        name: impl Into<String>,
        founder: impl Into<MemberId>,
    ) -> Result<Club, StoreError> {
        let club = Club::founded_by(club_id, name, founder.into());
        let mut collections = self.collections.write().await;
        if collections.clubs.contains_key(&club.id) {
            return Err(StoreError::AlreadyExists(club.id.to_string()));
        }
        collections.clubs.insert(club.id.clone(), club.clone());
        debug!("Club {} created", club.id);
        Ok(club)
    }

    /// Add `member` to a club; joining twice is a no-op
    pub async fn join_club(&self, club_id: &ClubId, member: impl Into<MemberId>) -> Result<Club, StoreError> {
        let member = member.into();
        let mut collections = self.collections.write().await;
        let club = collections
            .clubs
            .get_mut(club_id)
            .ok_or_else(|| StoreError::NotFound(club_id.to_string()))?;
        if club.members.join(member.clone()) {
            debug!("{} joined club {} ({} members)", member, club_id, club.members.len());
        }
        Ok(club.clone())
    }

    /// Propose an item; item ids are unique across the store
    pub async fn add_item(&self, item: Item) -> Result<(), StoreError> {
        let mut collections = self.collections.write().await;
        if !collections.item_ids.insert(item.id.clone()) {
            return Err(StoreError::AlreadyExists(item.id.to_string()));
        }
        debug!("Item '{}' proposed by {}", item.title, item.added_by);
        collections.items.push(item);
        Ok(())
    }

    /// Every stored vote, in write order
    pub async fn all_votes(&self) -> Vec<Vote> {
        self.collections.read().await.votes.clone()
    }

    /// Every stored match, in write order
    pub async fn all_matches(&self) -> Vec<Match> {
        self.collections.read().await.matches.clone()
    }

    async fn enter(&self, operation: Operation) -> Result<(), StoreError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        let injected = self
            .faults
            .lock()
            .ok()
            .and_then(|mut faults| faults.get_mut(&operation)?.pop_front());
        match injected {
            Some(error) => {
                trace!("Injected {:?} failure: {}", operation, error);
                Err(error)
            }
            None => Ok(()),
        }
    }
}

#[async_trait]
impl VoteStore for MemoryDocumentStore {
    async fn create(&self, vote: &Vote) -> Result<(), StoreError> {
        self.enter(Operation::VoteWrite).await?;
        let document_id = vote.key().document_id();
        let mut collections = self.collections.write().await;
        if !collections.vote_ids.insert(document_id.clone()) {
            return Err(StoreError::AlreadyExists(document_id));
        }
        collections.votes.push(vote.clone());
        trace!("Vote {} stored", document_id);
        Ok(())
    }

    async fn query_by_club(&self, club_id: &ClubId) -> Result<Vec<Vote>, StoreError> {
        self.enter(Operation::VoteRead).await?;
        let collections = self.collections.read().await;
        Ok(collections
            .votes
            .iter()
            .filter(|v| &v.club_id == club_id)
            .cloned()
            .collect())
    }

    async fn query_by_club_and_member(
        &self,
        club_id: &ClubId,
        member_id: &MemberId,
    ) -> Result<Vec<Vote>, StoreError> {
        self.enter(Operation::VoteRead).await?;
        let collections = self.collections.read().await;
        Ok(collections
            .votes
            .iter()
            .filter(|v| &v.club_id == club_id && &v.member_id == member_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl MatchStore for MemoryDocumentStore {
    async fn create_if_absent(&self, record: &Match) -> Result<MatchOutcome, StoreError> {
        self.enter(Operation::MatchWrite).await?;
        let key = record.key().idempotency_key();
        let mut collections = self.collections.write().await;
        if !collections.match_keys.insert(key.clone()) {
            return Ok(MatchOutcome::AlreadyExists);
        }
        collections.matches.push(record.clone());
        drop(collections);

        debug!("Match {} stored", key);
        // No subscribers is fine
        let _ = self.match_events.send(record.clone());
        Ok(MatchOutcome::Created)
    }

    async fn subscribe_by_club(&self, club_id: &ClubId) -> Result<MatchFeed, StoreError> {
        self.enter(Operation::MatchRead).await?;
        let mut events = self.match_events.subscribe();
        let (tx, rx) = mpsc::channel(FEED_CAPACITY);
        let club_id = club_id.clone();

        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(record) if record.club_id == club_id => {
                        if tx.send(record).await.is_err() {
                            break;
                        }
                    }
                    Ok(_) => {}
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        debug!("Match feed for {} skipped {} event(s)", club_id, skipped);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });

        Ok(MatchFeed::new(rx))
    }

    async fn list_by_club(&self, club_id: &ClubId) -> Result<Vec<Match>, StoreError> {
        self.enter(Operation::MatchRead).await?;
        let collections = self.collections.read().await;
        Ok(collections
            .matches
            .iter()
            .filter(|m| &m.club_id == club_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl MembershipView for MemoryDocumentStore {
    async fn snapshot(&self, club_id: &ClubId) -> Result<Club, StoreError> {
        self.enter(Operation::Membership).await?;
        self.collections
            .read()
            .await
            .clubs
            .get(club_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(club_id.to_string()))
    }
}

#[async_trait]
impl ItemSource for MemoryDocumentStore {
    async fn items_added_by_any_of(&self, members: &Membership) -> Result<Vec<Item>, StoreError> {
        self.enter(Operation::Items).await?;
        let collections = self.collections.read().await;
        Ok(collections
            .items
            .iter()
            .filter(|item| members.contains(&item.added_by))
            .cloned()
            .collect())
    }
}
