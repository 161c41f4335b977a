//! Voting session controller
//!
//! Drives one member's [`VotingSession`] against the ports. Decisions advance
//! the local queue synchronously and hand the durable work to a background
//! task; the controller keeps the task handles so nothing is lost when the
//! caller moves on, and folds finished results back into the session.
//!
//! # Example
//!
//! ```ignore
//! let mut controller = VotingSessionController::new("club-1", "ana", ports, config);
//! controller.load().await?;
//!
//! while let Some(item) = controller.current_item() {
//!     println!("{}", item.title);
//!     controller.decide(true)?;
//! }
//!
//! for report in controller.close().await {
//!     if report.created_match() {
//!         println!("matched: {}", report.item.title);
//!     }
//! }
//! ```

use crate::config::VotingConfig;
use crate::ports::VotingPorts;
use crate::ports::match_store::MatchFeed;
use crate::ports::store_error::StoreError;
use crate::use_cases::commit_vote::{CommitVoteUseCase, VoteCommitReport, tally};
use crate::use_cases::load_session::{LoadReport, LoadSessionError, LoadSessionUseCase};
use crate::use_cases::record_match::RecordMatchUseCase;
use crate::use_cases::retry::with_retry;
use booklub_domain::{
    Club, ClubId, DomainError, Item, ItemId, Match, MatchOutcome, MemberId, QuorumEvaluator,
    SessionPhase, VotingSession,
};
use futures::FutureExt;
use futures::future::join_all;
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Errors surfaced by the session controller
#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Load(#[from] LoadSessionError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Outcome of a reconciliation pass
#[derive(Debug, Clone, Default)]
pub struct ReconcileReport {
    /// Votes read from the store
    pub votes_read: usize,
    /// Positive voters that were new to the session cache
    pub votes_absorbed: usize,
    /// Matches this pass created
    pub created: Vec<Match>,
    /// Items at quorum whose match already existed
    pub already_recorded: usize,
    /// Items at quorum whose match could not be written
    pub failed: Vec<(ItemId, String)>,
}

/// One member's voting session with its background work
pub struct VotingSessionController {
    session: VotingSession,
    ports: VotingPorts,
    config: VotingConfig,
    commit: Arc<CommitVoteUseCase>,
    in_flight: Vec<JoinHandle<VoteCommitReport>>,
    /// Reports folded into the session but not yet handed to the caller
    finished: Vec<VoteCommitReport>,
    cancellation_token: CancellationToken,
}

impl VotingSessionController {
    pub fn new(
        club_id: impl Into<ClubId>,
        member: impl Into<MemberId>,
        ports: VotingPorts,
        config: VotingConfig,
    ) -> Self {
        let commit = Arc::new(CommitVoteUseCase::new(ports.clone(), config.clone()));
        Self {
            session: VotingSession::loading(club_id, member),
            ports,
            config,
            commit,
            in_flight: Vec::new(),
            finished: Vec::new(),
            cancellation_token: CancellationToken::new(),
        }
    }

    /// Tie background retries to an outer token
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = token;
        self
    }

    /// Load membership, items and votes; the session is unusable on error
    pub async fn load(&mut self) -> Result<LoadReport, SessionError> {
        self.ports
            .observer
            .on_phase_change(self.session.member(), SessionPhase::Loading);
        let report = LoadSessionUseCase::new(&self.ports, &self.config.load_retry)
            .with_cancellation(&self.cancellation_token)
            .execute(&mut self.session)
            .await?;
        Ok(report)
    }

    /// Decide on the presented item
    ///
    /// The queue advances before this returns; the vote write, quorum check
    /// and match recording run in a spawned task. Must be called from within
    /// a Tokio runtime.
    pub fn decide(&mut self, positive: bool) -> Result<Item, SessionError> {
        self.reap_finished();

        let member = self.session.member().clone();
        if self.session.phase() == SessionPhase::Ready {
            self.ports
                .observer
                .on_phase_change(&member, SessionPhase::Deciding);
        }
        let decision = self.session.decide(positive)?;
        let item = decision.item.clone();
        debug!(
            "{} {} '{}' ({} left)",
            member,
            if positive { "liked" } else { "passed" },
            item.title,
            self.session.remaining()
        );

        let commit = Arc::clone(&self.commit);
        let token = self.cancellation_token.clone();
        self.in_flight.push(tokio::spawn(async move {
            commit.execute(decision, Some(&token)).await
        }));

        self.ports.observer.on_phase_change(&member, self.session.phase());
        Ok(item)
    }

    /// Take the reports of background tasks that already finished, without
    /// waiting for the rest
    pub fn collect_finished(&mut self) -> Vec<VoteCommitReport> {
        self.reap_finished();
        std::mem::take(&mut self.finished)
    }

    /// Wait for every background task and fold the results into the session
    pub async fn flush(&mut self) -> Vec<VoteCommitReport> {
        self.join_in_flight().await;
        std::mem::take(&mut self.finished)
    }

    /// Re-fetch the roster and items and rebuild the queue
    ///
    /// This is how an `Exhausted` session picks up newly proposed items.
    /// Returns the number of queued items.
    pub async fn refresh_items(&mut self) -> Result<usize, SessionError> {
        let before = self.session.phase();
        let club = self.fetch_club().await?;
        self.session.update_membership(club);

        let items_port = &self.ports.items;
        let members = &self.session.club().members;
        let items = with_retry(
            &self.config.load_retry,
            "fetch items",
            self.ports.observer.as_ref(),
            Some(&self.cancellation_token),
            || items_port.items_added_by_any_of(members),
        )
        .await?;

        let orphaned = self.session.refresh_items(items)?;
        if !orphaned.is_empty() {
            warn!(
                "{} has {} vote(s) on items no longer proposed: {:?}",
                self.session.member(),
                orphaned.len(),
                orphaned
            );
        }

        let after = self.session.phase();
        if after != before {
            self.ports.observer.on_phase_change(self.session.member(), after);
        }
        Ok(self.session.remaining())
    }

    /// Re-read the club's votes and roster and record every match the store
    /// supports but that does not exist yet
    ///
    /// Backs up the background chain: anything it missed or abandoned is
    /// picked up here.
    pub async fn reconcile(&mut self) -> Result<ReconcileReport, SessionError> {
        self.join_in_flight().await;

        let club = self.fetch_club().await?;
        self.session.update_membership(club.clone());

        let votes_port = &self.ports.votes;
        let club_id = &club.id;
        let club_votes = with_retry(
            &self.config.vote_retry,
            "refresh votes",
            self.ports.observer.as_ref(),
            Some(&self.cancellation_token),
            || votes_port.query_by_club(club_id),
        )
        .await?;

        let mut report = ReconcileReport {
            votes_read: club_votes.len(),
            votes_absorbed: self.session.absorb_votes(&club_votes),
            ..Default::default()
        };

        let at_quorum: HashSet<ItemId> = self
            .session
            .cache()
            .tallies()
            .filter(|(_, voters)| QuorumEvaluator::evaluate(&club.members, voters))
            .map(|(item_id, _)| item_id.clone())
            .collect();
        if at_quorum.is_empty() {
            return Ok(report);
        }

        let matches_port = &self.ports.matches;
        let recorded: HashSet<ItemId> = with_retry(
            &self.config.load_retry,
            "list matches",
            self.ports.observer.as_ref(),
            Some(&self.cancellation_token),
            || matches_port.list_by_club(club_id),
        )
        .await?
        .into_iter()
        .map(|m| m.item_id)
        .collect();

        let items_port = &self.ports.items;
        let items = with_retry(
            &self.config.load_retry,
            "fetch items",
            self.ports.observer.as_ref(),
            Some(&self.cancellation_token),
            || items_port.items_added_by_any_of(&club.members),
        )
        .await?;

        let recorder = RecordMatchUseCase::new(
            self.ports.matches.clone(),
            self.config.match_retry().clone(),
        )
        .with_observer(self.ports.observer.clone());

        for item in items.iter().filter(|i| at_quorum.contains(&i.id)) {
            if recorded.contains(&item.id) {
                report.already_recorded += 1;
                continue;
            }
            // The cache can be ahead of the store only for this member's own
            // votes; confirm against what was just read.
            if !QuorumEvaluator::evaluate(&club.members, &tally(&club_votes, item)) {
                continue;
            }
            match recorder.record_if_absent(&club, item).await {
                Ok(MatchOutcome::Created) => report.created.push(Match::new(&club, item.clone())),
                Ok(MatchOutcome::AlreadyExists) => report.already_recorded += 1,
                Err(e) => report.failed.push((item.id.clone(), e.source_error().to_string())),
            }
        }

        info!(
            "Reconciled club {}: {} vote(s) read, {} match(es) created, {} already recorded",
            club.id,
            report.votes_read,
            report.created.len(),
            report.already_recorded
        );
        Ok(report)
    }

    /// Push feed of matches created in this club from now on
    pub async fn subscribe_matches(&self) -> Result<MatchFeed, SessionError> {
        Ok(self.ports.matches.subscribe_by_club(&self.session.club().id).await?)
    }

    /// Matches already recorded in this club
    pub async fn matches(&self) -> Result<Vec<Match>, SessionError> {
        Ok(self.ports.matches.list_by_club(&self.session.club().id).await?)
    }

    /// Stop background retries; writes in their first attempt still finish
    pub fn cancel(&self) {
        self.cancellation_token.cancel();
    }

    /// Wait for outstanding background work and end the session
    pub async fn close(mut self) -> Vec<VoteCommitReport> {
        let reports = self.flush().await;
        debug!(
            "Session for {} closed with {} background report(s)",
            self.session.member(),
            reports.len()
        );
        reports
    }

    // ==================== Accessors ====================

    pub fn phase(&self) -> SessionPhase {
        self.session.phase()
    }

    pub fn current_item(&self) -> Option<&Item> {
        self.session.current_item()
    }

    pub fn remaining(&self) -> usize {
        self.session.remaining()
    }

    /// Background tasks not yet collected
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    pub fn session(&self) -> &VotingSession {
        &self.session
    }

    pub fn club(&self) -> &Club {
        self.session.club()
    }

    pub fn member(&self) -> &MemberId {
        self.session.member()
    }

    async fn fetch_club(&self) -> Result<Club, StoreError> {
        let membership = &self.ports.membership;
        let club_id = &self.session.club().id;
        with_retry(
            &self.config.load_retry,
            "fetch membership",
            self.ports.observer.as_ref(),
            Some(&self.cancellation_token),
            || membership.snapshot(club_id),
        )
        .await
    }

    fn reap_finished(&mut self) {
        let mut pending = Vec::with_capacity(self.in_flight.len());
        let mut reports = Vec::new();

        for mut handle in std::mem::take(&mut self.in_flight) {
            if !handle.is_finished() {
                pending.push(handle);
                continue;
            }
            // Polling can still yield Pending once the task's coop budget is spent
            match (&mut handle).now_or_never() {
                Some(Ok(report)) => reports.push(report),
                Some(Err(e)) => warn!("Background vote task failed: {}", e),
                None => pending.push(handle),
            }
        }
        self.in_flight = pending;
        self.absorb(reports);
    }

    async fn join_in_flight(&mut self) {
        let handles = std::mem::take(&mut self.in_flight);
        let reports = join_all(handles)
            .await
            .into_iter()
            .filter_map(|result| match result {
                Ok(report) => Some(report),
                Err(e) => {
                    warn!("Background vote task failed: {}", e);
                    None
                }
            })
            .collect();
        self.absorb(reports);
    }

    /// Fold background results into the session and keep them for the caller
    fn absorb(&mut self, reports: Vec<VoteCommitReport>) {
        for report in &reports {
            if let Some(club) = &report.club
                && club.members.len() >= self.session.club().members.len()
            {
                self.session.update_membership(club.clone());
            }
            if report.superseded {
                self.session.discard_local_vote(&report.item.id);
            }
            if !report.refreshed_votes.is_empty() {
                self.session.absorb_votes(&report.refreshed_votes);
            }
        }
        self.finished.extend(reports);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::commit_vote::{MatchStatus, WriteStatus};
    use crate::use_cases::test_support::{MockStore, RecordingJournal, RecordingObserver};
    use booklub_domain::Vote;
    use std::sync::atomic::Ordering;

    fn controller(store: &Arc<MockStore>, member: &str) -> VotingSessionController {
        VotingSessionController::new(
            "c",
            member,
            VotingPorts::from_store(store.clone()),
            VotingConfig::immediate(3),
        )
    }

    async fn loaded(store: &Arc<MockStore>, member: &str) -> VotingSessionController {
        let mut controller = controller(store, member);
        controller.load().await.unwrap();
        controller
    }

    #[tokio::test]
    async fn test_two_member_scenario() {
        let store = MockStore::with_club("c", &["a", "b"]);
        store.add_item("book-1", "a");
        store.add_item("book-2", "b");

        let mut a = loaded(&store, "a").await;
        assert_eq!(a.decide(true).unwrap().id, ItemId::new("book-1"));
        a.flush().await;
        assert!(store.stored_matches().is_empty());

        let mut b = loaded(&store, "b").await;
        assert_eq!(b.decide(true).unwrap().id, ItemId::new("book-1"));
        let reports = b.flush().await;
        assert!(reports[0].created_match());
        assert_eq!(store.stored_matches().len(), 1);

        assert_eq!(a.decide(true).unwrap().id, ItemId::new("book-2"));
        a.flush().await;
        assert_eq!(store.stored_matches().len(), 1);
        assert_eq!(a.reconcile().await.unwrap().created.len(), 0);

        assert_eq!(b.decide(true).unwrap().id, ItemId::new("book-2"));
        b.flush().await;
        let matched: Vec<_> = store.stored_matches().into_iter().map(|m| m.item_id).collect();
        assert_eq!(matched, vec![ItemId::new("book-1"), ItemId::new("book-2")]);
    }

    #[tokio::test]
    async fn test_membership_growth_delays_match() {
        let store = MockStore::with_club("c", &["a", "b"]);
        store.add_item("y", "a");

        let mut a = loaded(&store, "a").await;
        let mut b = loaded(&store, "b").await;
        a.decide(true).unwrap();
        a.flush().await;

        store.join("c", "newcomer");
        b.decide(true).unwrap();
        let reports = b.flush().await;
        assert!(matches!(reports[0].outcome, MatchStatus::NotReached(_)));
        assert!(store.stored_matches().is_empty());

        let mut c = loaded(&store, "newcomer").await;
        assert_eq!(c.current_item().unwrap().id, ItemId::new("y"));
        c.decide(true).unwrap();
        assert!(c.flush().await[0].created_match());
        assert_eq!(store.stored_matches().len(), 1);
    }

    #[tokio::test]
    async fn test_queue_advances_before_write_completes() {
        let store = MockStore::with_club("c", &["a", "b"]);
        store.add_item("x", "a");
        store.add_item("y", "a");
        let gate = store.gate_vote_writes();

        let mut a = loaded(&store, "a").await;
        a.decide(true).unwrap();

        assert_eq!(a.current_item().unwrap().id, ItemId::new("y"));
        assert_eq!(a.in_flight(), 1);
        assert_eq!(store.vote_writes.load(Ordering::SeqCst), 0);

        gate.add_permits(1);
        let reports = a.flush().await;
        assert_eq!(reports[0].write, WriteStatus::Committed);
        assert_eq!(store.vote_writes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_write_completing_before_next_decision() {
        let store = MockStore::with_club("c", &["a"]);
        store.add_item("x", "a");
        store.add_item("y", "a");

        let mut a = loaded(&store, "a").await;
        a.decide(false).unwrap();
        a.flush().await;
        assert_eq!(store.vote_writes.load(Ordering::SeqCst), 1);

        a.decide(true).unwrap();
        assert_eq!(a.phase(), SessionPhase::Exhausted);
        let reports = a.flush().await;
        assert!(reports[0].created_match());
    }

    #[tokio::test]
    async fn test_concurrent_final_votes_never_miss_match() {
        for _ in 0..20 {
            let store = MockStore::with_club("c", &["a", "b"]);
            store.add_item("x", "a");

            let mut a = loaded(&store, "a").await;
            let mut b = loaded(&store, "b").await;
            a.decide(true).unwrap();
            b.decide(true).unwrap();
            a.flush().await;
            b.flush().await;

            assert_eq!(store.stored_matches().len(), 1);
        }
    }

    #[tokio::test]
    async fn test_many_sessions_record_exactly_one_match() {
        let members = ["m0", "m1", "m2", "m3", "m4", "m5"];
        let store = MockStore::with_club("c", &members);
        store.add_item("x", "m0");

        let tasks: Vec<_> = members
            .iter()
            .map(|member| {
                let store = Arc::clone(&store);
                let member = member.to_string();
                tokio::spawn(async move {
                    let mut session = loaded(&store, &member).await;
                    session.decide(true).unwrap();
                    session.close().await
                })
            })
            .collect();

        let mut created = 0;
        for task in tasks {
            created += task
                .await
                .unwrap()
                .iter()
                .filter(|r| r.created_match())
                .count();
        }

        assert_eq!(created, 1);
        assert_eq!(store.stored_matches().len(), 1);
        assert_eq!(store.stored_votes().len(), members.len());
    }

    #[tokio::test]
    async fn test_new_session_excludes_items_voted_earlier() {
        let store = MockStore::with_club("c", &["a", "b"]);
        store.add_item("x", "a");
        store.add_item("y", "b");

        let mut first = loaded(&store, "a").await;
        first.decide(false).unwrap();
        first.close().await;

        let second = loaded(&store, "a").await;
        assert_eq!(second.remaining(), 1);
        assert_eq!(second.current_item().unwrap().id, ItemId::new("y"));
    }

    #[tokio::test]
    async fn test_exhausted_session_picks_up_new_items() {
        let store = MockStore::with_club("c", &["a"]);
        store.add_item("x", "a");

        let mut a = loaded(&store, "a").await;
        a.decide(false).unwrap();
        assert_eq!(a.phase(), SessionPhase::Exhausted);
        assert_eq!(a.refresh_items().await.unwrap(), 0);

        store.add_item("y", "a");
        assert_eq!(a.refresh_items().await.unwrap(), 1);
        assert_eq!(a.phase(), SessionPhase::Ready);
        assert!(matches!(a.decide(true), Ok(item) if item.id == ItemId::new("y")));
    }

    #[tokio::test]
    async fn test_decide_before_load_is_rejected() {
        let store = MockStore::with_club("c", &["a"]);
        let mut a = controller(&store, "a");

        let err = a.decide(true).unwrap_err();
        assert!(matches!(err, SessionError::Domain(e) if e.is_invalid_transition()));
        assert_eq!(a.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_abandoned_vote_is_journaled_and_queue_keeps_moving() {
        let store = MockStore::with_club("c", &["a"]);
        store.add_item("x", "a");
        store.add_item("y", "a");
        store.fail_vote_writes([StoreError::Timeout, StoreError::Timeout, StoreError::Timeout]);
        let journal = Arc::new(RecordingJournal::default());
        let ports = VotingPorts::from_store(store.clone()).with_journal(journal.clone());

        let mut a = VotingSessionController::new("c", "a", ports, VotingConfig::immediate(3));
        a.load().await.unwrap();
        a.decide(true).unwrap();
        assert_eq!(a.current_item().unwrap().id, ItemId::new("y"));

        let reports = a.flush().await;
        assert!(!reports[0].write.is_durable());
        assert_eq!(journal.entries.lock().unwrap().len(), 1);
        assert!(store.stored_matches().is_empty());
    }

    #[tokio::test]
    async fn test_reconcile_records_missed_match() {
        let store = MockStore::with_club("c", &["a", "b"]);
        store.add_item("x", "a");
        store.seed_vote(Vote::like("c", "a", "x"));
        store.seed_vote(Vote::like("c", "b", "x"));

        let mut a = loaded(&store, "a").await;
        let report = a.reconcile().await.unwrap();
        assert_eq!(report.created.len(), 1);
        assert_eq!(report.votes_read, 2);

        let report = a.reconcile().await.unwrap();
        assert!(report.created.is_empty());
        assert_eq!(report.already_recorded, 1);
        assert_eq!(store.stored_matches().len(), 1);
    }

    #[tokio::test]
    async fn test_reconcile_retries_transient_reads() {
        let store = MockStore::with_club("c", &["a", "b"]);
        store.add_item("x", "a");
        store.seed_vote(Vote::like("c", "a", "x"));
        store.seed_vote(Vote::like("c", "b", "x"));

        let mut a = loaded(&store, "a").await;
        store.fail_match_lists([StoreError::Timeout]);
        store.fail_item_reads([StoreError::Unavailable("offline".into())]);

        let report = a.reconcile().await.unwrap();
        assert_eq!(report.created.len(), 1);
        assert_eq!(store.stored_matches().len(), 1);
    }

    #[tokio::test]
    async fn test_reconcile_reports_failed_match_write() {
        let store = MockStore::with_club("c", &["a"]);
        store.add_item("x", "a");
        store.seed_vote(Vote::like("c", "a", "x"));

        let mut a = loaded(&store, "a").await;
        store.fail_match_writes((0..3).map(|_| StoreError::Unavailable("offline".into())));

        let report = a.reconcile().await.unwrap();
        assert!(report.created.is_empty());
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, ItemId::new("x"));
        assert!(report.failed[0].1.contains("offline"));
    }

    #[tokio::test]
    async fn test_stored_pass_is_not_overridden_by_second_device() {
        let store = MockStore::with_club("c", &["a", "b"]);
        store.add_item("x", "a");
        store.seed_vote(Vote::like("c", "b", "x"));

        // Loaded before the pass from a's other device landed
        let mut a = loaded(&store, "a").await;
        store.seed_vote(Vote::pass("c", "a", "x"));
        a.decide(true).unwrap();
        let reports = a.flush().await;

        assert!(reports[0].superseded);
        assert!(!reports[0].created_match());
        assert!(store.stored_matches().is_empty());
        let voters = a.session().cache().positive_voters(&ItemId::new("x"));
        assert_eq!(voters.into_iter().collect::<Vec<_>>(), vec![MemberId::new("b")]);

        let report = a.reconcile().await.unwrap();
        assert!(report.created.is_empty());
        assert!(store.stored_matches().is_empty());
    }

    #[tokio::test]
    async fn test_refresh_on_miss_votes_reach_cache() {
        let store = MockStore::with_club("c", &["a", "b", "c"]);
        store.add_item("x", "a");

        let mut a = loaded(&store, "a").await;
        store.seed_vote(Vote::like("c", "b", "x"));
        a.decide(true).unwrap();
        a.flush().await;

        let voters = a.session().cache().positive_voters(&ItemId::new("x"));
        assert_eq!(voters.len(), 2);
    }

    #[tokio::test]
    async fn test_collect_finished_hands_over_each_report_once() {
        let store = MockStore::with_club("c", &["a"]);
        store.add_item("x", "a");
        store.add_item("y", "a");

        let mut a = loaded(&store, "a").await;
        a.decide(true).unwrap();
        while a.in_flight() > 0 && a.finished.is_empty() {
            tokio::task::yield_now().await;
            a.reap_finished();
        }

        let collected = a.collect_finished();
        assert_eq!(collected.len(), 1);
        assert!(collected[0].created_match());
        assert!(a.collect_finished().is_empty());
        assert!(a.flush().await.is_empty());

        let listed = a.matches().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].item_id, ItemId::new("x"));
        let mut feed = a.subscribe_matches().await.unwrap();
        assert!(feed.drain().is_empty());
    }

    #[tokio::test]
    async fn test_observer_sees_phases() {
        let store = MockStore::with_club("c", &["a"]);
        store.add_item("x", "a");
        let observer = Arc::new(RecordingObserver::default());
        let ports = VotingPorts::from_store(store.clone()).with_observer(observer.clone());

        let mut a = VotingSessionController::new("c", "a", ports, VotingConfig::immediate(1));
        a.load().await.unwrap();
        a.decide(true).unwrap();
        a.close().await;

        assert_eq!(
            *observer.phases.lock().unwrap(),
            vec![
                SessionPhase::Loading,
                SessionPhase::Ready,
                SessionPhase::Deciding,
                SessionPhase::Exhausted
            ]
        );
        assert_eq!(*observer.matches.lock().unwrap(), vec![MatchOutcome::Created]);
    }
}
