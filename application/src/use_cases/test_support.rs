//! In-memory port doubles shared by the use case tests.

use crate::ports::match_store::{MatchFeed, MatchStore};
use crate::ports::membership::{ItemSource, MembershipView};
use crate::ports::reconciliation::{PendingWrite, PendingWriteKind, ReconciliationJournal};
use crate::ports::session_observer::SessionObserver;
use crate::ports::store_error::StoreError;
use crate::ports::vote_store::VoteStore;
use async_trait::async_trait;
use booklub_domain::{
    Club, ClubId, Item, Match, MatchOutcome, MemberId, Membership, SessionPhase, Vote,
};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Store double for every port, with failure injection and a write gate
#[derive(Default)]
pub(crate) struct MockStore {
    clubs: Mutex<HashMap<ClubId, Club>>,
    items: Mutex<Vec<Item>>,
    votes: Mutex<Vec<Vote>>,
    matches: Mutex<Vec<Match>>,
    vote_failures: Mutex<VecDeque<StoreError>>,
    membership_failures: Mutex<VecDeque<StoreError>>,
    match_failures: Mutex<VecDeque<StoreError>>,
    match_list_failures: Mutex<VecDeque<StoreError>>,
    item_failures: Mutex<VecDeque<StoreError>>,
    write_gate: Mutex<Option<Arc<Semaphore>>>,
    pub vote_writes: AtomicUsize,
}

impl MockStore {
    pub fn with_club(club_id: &str, members: &[&str]) -> Arc<Self> {
        let store = Self::default();
        store.clubs.lock().unwrap().insert(
            ClubId::new(club_id),
            Club::new(club_id, "Readers", Membership::new(members.iter().copied())),
        );
        Arc::new(store)
    }

    pub fn add_item(&self, id: &str, added_by: &str) {
        self.items
            .lock()
            .unwrap()
            .push(Item::new(id, format!("Title {}", id), "Author", added_by));
    }

    pub fn join(&self, club_id: &str, member: &str) {
        if let Some(club) = self.clubs.lock().unwrap().get_mut(club_id) {
            club.members.join(member);
        }
    }

    pub fn seed_vote(&self, vote: Vote) {
        self.votes.lock().unwrap().push(vote);
    }

    pub fn fail_vote_writes(&self, failures: impl IntoIterator<Item = StoreError>) {
        self.vote_failures.lock().unwrap().extend(failures);
    }

    pub fn fail_membership(&self, failures: impl IntoIterator<Item = StoreError>) {
        self.membership_failures.lock().unwrap().extend(failures);
    }

    pub fn fail_match_writes(&self, failures: impl IntoIterator<Item = StoreError>) {
        self.match_failures.lock().unwrap().extend(failures);
    }

    pub fn fail_match_lists(&self, failures: impl IntoIterator<Item = StoreError>) {
        self.match_list_failures.lock().unwrap().extend(failures);
    }

    pub fn fail_item_reads(&self, failures: impl IntoIterator<Item = StoreError>) {
        self.item_failures.lock().unwrap().extend(failures);
    }

    /// Hold every vote write until a permit is added to the returned gate
    pub fn gate_vote_writes(&self) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        *self.write_gate.lock().unwrap() = Some(Arc::clone(&gate));
        gate
    }

    pub fn stored_votes(&self) -> Vec<Vote> {
        self.votes.lock().unwrap().clone()
    }

    pub fn stored_matches(&self) -> Vec<Match> {
        self.matches.lock().unwrap().clone()
    }
}

#[async_trait]
impl VoteStore for MockStore {
    async fn create(&self, vote: &Vote) -> Result<(), StoreError> {
        let gate = self.write_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.acquire().await.unwrap().forget();
        }
        if let Some(error) = self.vote_failures.lock().unwrap().pop_front() {
            return Err(error);
        }

        let mut votes = self.votes.lock().unwrap();
        if votes.iter().any(|v| v.key() == vote.key()) {
            return Err(StoreError::AlreadyExists(vote.key().document_id()));
        }
        votes.push(vote.clone());
        self.vote_writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn query_by_club(&self, club_id: &ClubId) -> Result<Vec<Vote>, StoreError> {
        Ok(self
            .votes
            .lock()
            .unwrap()
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
        Ok(self
            .votes
            .lock()
            .unwrap()
            .iter()
            .filter(|v| &v.club_id == club_id && &v.member_id == member_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl MatchStore for MockStore {
    async fn create_if_absent(&self, record: &Match) -> Result<MatchOutcome, StoreError> {
        if let Some(error) = self.match_failures.lock().unwrap().pop_front() {
            return Err(error);
        }
        let mut matches = self.matches.lock().unwrap();
        if matches.iter().any(|m| m.key() == record.key()) {
            return Ok(MatchOutcome::AlreadyExists);
        }
        matches.push(record.clone());
        Ok(MatchOutcome::Created)
    }

    async fn subscribe_by_club(&self, _club_id: &ClubId) -> Result<MatchFeed, StoreError> {
        let (_tx, rx) = tokio::sync::mpsc::channel(1);
        Ok(MatchFeed::new(rx))
    }

    async fn list_by_club(&self, club_id: &ClubId) -> Result<Vec<Match>, StoreError> {
        if let Some(error) = self.match_list_failures.lock().unwrap().pop_front() {
            return Err(error);
        }
        Ok(self
            .matches
            .lock()
            .unwrap()
            .iter()
            .filter(|m| &m.club_id == club_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl MembershipView for MockStore {
    async fn snapshot(&self, club_id: &ClubId) -> Result<Club, StoreError> {
        if let Some(error) = self.membership_failures.lock().unwrap().pop_front() {
            return Err(error);
        }
        self.clubs
            .lock()
            .unwrap()
            .get(club_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(club_id.to_string()))
    }
}

#[async_trait]
impl ItemSource for MockStore {
    async fn items_added_by_any_of(&self, members: &Membership) -> Result<Vec<Item>, StoreError> {
        if let Some(error) = self.item_failures.lock().unwrap().pop_front() {
            return Err(error);
        }
        Ok(self
            .items
            .lock()
            .unwrap()
            .iter()
            .filter(|i| members.contains(&i.added_by))
            .cloned()
            .collect())
    }
}

/// Journal double keeping every entry
#[derive(Default)]
pub(crate) struct RecordingJournal {
    pub entries: Mutex<Vec<PendingWrite>>,
}

impl RecordingJournal {
    pub fn kinds(&self) -> Vec<PendingWriteKind> {
        self.entries.lock().unwrap().iter().map(|e| e.kind).collect()
    }
}

impl ReconciliationJournal for RecordingJournal {
    fn record(&self, entry: PendingWrite) {
        self.entries.lock().unwrap().push(entry);
    }
}

/// Observer double keeping phase changes and match outcomes
#[derive(Default)]
pub(crate) struct RecordingObserver {
    pub phases: Mutex<Vec<SessionPhase>>,
    pub matches: Mutex<Vec<MatchOutcome>>,
    pub abandoned: AtomicUsize,
}

impl SessionObserver for RecordingObserver {
    fn on_phase_change(&self, _member: &MemberId, phase: SessionPhase) {
        self.phases.lock().unwrap().push(phase);
    }

    fn on_match(&self, _record: &Match, outcome: MatchOutcome) {
        self.matches.lock().unwrap().push(outcome);
    }

    fn on_write_abandoned(&self, _entry: &PendingWrite) {
        self.abandoned.fetch_add(1, Ordering::SeqCst);
    }
}
