//! Commit Vote use case
//!
//! The background half of a decision. The session has already advanced its
//! queue; this chain makes the vote durable and, for positive votes, checks
//! quorum and records the match.
//!
//! ```text
//! write vote ──► (positive?) ──► fetch membership ──► evaluate cache snapshot
//!     │                                                   │ miss
//!     │ permanent failure                                 ▼
//!     ▼                                            re-read club votes ──► evaluate
//!  journal                                                                │ reached
//!                                                                         ▼
//!                                                                   record match
//! ```
//!
//! The refresh read happens only after this session's own write is confirmed,
//! so of two concurrent final votes at least one chain sees the other's vote.

use crate::config::VotingConfig;
use crate::ports::VotingPorts;
use crate::ports::reconciliation::PendingWrite;
use crate::use_cases::record_match::RecordMatchUseCase;
use crate::use_cases::retry::with_retry;
use booklub_domain::{
    Club, Decision, Item, Match, MatchOutcome, MemberId, QuorumEvaluator, QuorumStatus, Vote,
};
use std::collections::HashSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// What happened to the vote write
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteStatus {
    Committed,
    /// A vote with the same key was already stored; the stored one stands
    AlreadyRecorded,
    /// Given up and journaled
    Abandoned(String),
}

impl WriteStatus {
    pub fn is_durable(&self) -> bool {
        !matches!(self, WriteStatus::Abandoned(_))
    }
}

/// What happened on the quorum side
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchStatus {
    /// Negative vote, or the vote never became durable
    NotEvaluated,
    NotReached(QuorumStatus),
    Recorded(MatchOutcome),
    /// Quorum check or match write failed and was journaled
    Failed(String),
}

/// Result of one background chain
#[derive(Debug, Clone)]
pub struct VoteCommitReport {
    pub vote: Vote,
    pub item: Item,
    pub write: WriteStatus,
    pub outcome: MatchStatus,
    /// Club votes read on a quorum miss, for the session to merge into its cache
    pub refreshed_votes: Vec<Vote>,
    /// Roster fetched for the quorum check
    pub club: Option<Club>,
    /// The key already held a negative vote, so this positive never counted
    pub superseded: bool,
}

impl VoteCommitReport {
    fn new(decision: &Decision) -> Self {
        Self {
            vote: decision.vote.clone(),
            item: decision.item.clone(),
            write: WriteStatus::Committed,
            outcome: MatchStatus::NotEvaluated,
            refreshed_votes: Vec::new(),
            club: None,
            superseded: false,
        }
    }

    pub fn created_match(&self) -> bool {
        matches!(self.outcome, MatchStatus::Recorded(MatchOutcome::Created))
    }
}

/// Use case for the vote → quorum → match chain
pub struct CommitVoteUseCase {
    ports: VotingPorts,
    config: VotingConfig,
    recorder: RecordMatchUseCase,
}

impl CommitVoteUseCase {
    pub fn new(ports: VotingPorts, config: VotingConfig) -> Self {
        let recorder = RecordMatchUseCase::new(ports.matches.clone(), config.match_retry().clone())
            .with_observer(ports.observer.clone());
        Self {
            ports,
            config,
            recorder,
        }
    }

    /// Run the whole chain for one decision
    ///
    /// Never fails: every failure ends up in the report, and writes that were
    /// given up are journaled.
    pub async fn execute(
        &self,
        decision: Decision,
        cancellation_token: Option<&CancellationToken>,
    ) -> VoteCommitReport {
        let mut report = VoteCommitReport::new(&decision);

        report.write = self.write_vote(&decision.vote, cancellation_token).await;
        if !report.write.is_durable() || !decision.is_positive() {
            return report;
        }
        if report.write == WriteStatus::AlreadyRecorded {
            match self.stored_preference(&decision.vote, cancellation_token).await {
                Ok(true) => {}
                Ok(false) => {
                    info!(
                        "{} already passed on '{}'; the stored vote stands",
                        decision.vote.member_id, decision.item.title
                    );
                    report.superseded = true;
                    return report;
                }
                Err(outcome) => {
                    report.outcome = outcome;
                    return report;
                }
            }
        }

        report.outcome = self
            .check_quorum(&decision, &mut report, cancellation_token)
            .await;
        report
    }

    async fn write_vote(
        &self,
        vote: &Vote,
        cancellation_token: Option<&CancellationToken>,
    ) -> WriteStatus {
        let votes = &self.ports.votes;
        let result = with_retry(
            &self.config.vote_retry,
            "write vote",
            self.ports.observer.as_ref(),
            cancellation_token,
            || votes.create(vote),
        )
        .await;

        let status = match result {
            Ok(()) => WriteStatus::Committed,
            Err(e) if e.is_already_exists() => {
                debug!("Vote {} already stored", vote.key().document_id());
                WriteStatus::AlreadyRecorded
            }
            Err(e) => {
                warn!("Vote {} abandoned: {}", vote.key().document_id(), e);
                self.abandon(PendingWrite::vote(vote, e.to_string()));
                return WriteStatus::Abandoned(e.to_string());
            }
        };
        self.ports.observer.on_vote_committed(vote);
        status
    }

    /// Whether the vote stored under `vote`'s key is positive
    ///
    /// A missing vote counts as negative: quorum only trusts what the store holds.
    async fn stored_preference(
        &self,
        vote: &Vote,
        cancellation_token: Option<&CancellationToken>,
    ) -> Result<bool, MatchStatus> {
        let votes = &self.ports.votes;
        let own = with_retry(
            &self.config.vote_retry,
            "read stored vote",
            self.ports.observer.as_ref(),
            cancellation_token,
            || votes.query_by_club_and_member(&vote.club_id, &vote.member_id),
        )
        .await
        .map_err(|e| {
            warn!("Stored vote {} unreadable: {}", vote.key().document_id(), e);
            self.abandon(PendingWrite::quorum_check(vote, e.to_string()));
            MatchStatus::Failed(e.to_string())
        })?;

        Ok(own
            .iter()
            .find(|stored| stored.key() == vote.key())
            .is_some_and(|stored| stored.positive))
    }

    async fn check_quorum(
        &self,
        decision: &Decision,
        report: &mut VoteCommitReport,
        cancellation_token: Option<&CancellationToken>,
    ) -> MatchStatus {
        let club_id = &decision.vote.club_id;
        let membership = &self.ports.membership;
        let club = match with_retry(
            &self.config.vote_retry,
            "fetch membership",
            self.ports.observer.as_ref(),
            cancellation_token,
            || membership.snapshot(club_id),
        )
        .await
        {
            Ok(club) => club,
            Err(e) => {
                warn!("Quorum check for {} skipped: {}", decision.item.id, e);
                self.abandon(PendingWrite::quorum_check(&decision.vote, e.to_string()));
                return MatchStatus::Failed(e.to_string());
            }
        };
        report.club = Some(club.clone());

        let mut voters = decision.positive_voters.clone();
        let mut status = QuorumEvaluator::status(&club.members, &voters);

        if !status.reached && self.config.refresh_on_miss {
            let votes = &self.ports.votes;
            match with_retry(
                &self.config.vote_retry,
                "refresh votes",
                self.ports.observer.as_ref(),
                cancellation_token,
                || votes.query_by_club(club_id),
            )
            .await
            {
                Ok(club_votes) => {
                    voters.extend(tally(&club_votes, &decision.item));
                    status = QuorumEvaluator::status(&club.members, &voters);
                    report.refreshed_votes = club_votes;
                }
                Err(e) => {
                    warn!("Vote refresh for {} failed: {}", decision.item.id, e);
                    self.abandon(PendingWrite::quorum_check(&decision.vote, e.to_string()));
                    return MatchStatus::Failed(e.to_string());
                }
            }
        }

        if !status.reached {
            debug!(
                "No quorum on '{}' yet {}: waiting for {:?}",
                decision.item.title,
                status.summary(),
                status.missing
            );
            return MatchStatus::NotReached(status);
        }

        info!(
            "Quorum reached on '{}' in club {} {}",
            decision.item.title,
            club.id,
            status.summary()
        );
        match self.recorder.record_if_absent(&club, &decision.item).await {
            Ok(outcome) => MatchStatus::Recorded(outcome),
            Err(e) => {
                warn!("Match for {} abandoned: {}", decision.item.id, e);
                let record = Match::new(&club, decision.item.clone());
                self.abandon(PendingWrite::matched(&record, e.to_string()));
                MatchStatus::Failed(e.to_string())
            }
        }
    }

    fn abandon(&self, entry: PendingWrite) {
        self.ports.observer.on_write_abandoned(&entry);
        self.ports.journal.record(entry);
    }
}

/// Positive voters for `item` among `votes`
pub(crate) fn tally(votes: &[Vote], item: &Item) -> HashSet<MemberId> {
    votes
        .iter()
        .filter(|v| v.positive && v.item_id == item.id)
        .map(|v| v.member_id.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::reconciliation::PendingWriteKind;
    use crate::ports::store_error::StoreError;
    use crate::use_cases::test_support::{MockStore, RecordingJournal, RecordingObserver};
    use booklub_domain::{Membership, VotingSession};
    use std::sync::Arc;

    fn setup(members: &[&str]) -> (Arc<MockStore>, Arc<RecordingJournal>, Arc<RecordingObserver>, VotingPorts) {
        let store = MockStore::with_club("c", members);
        store.add_item("x", members[0]);
        let journal = Arc::new(RecordingJournal::default());
        let observer = Arc::new(RecordingObserver::default());
        let ports = VotingPorts::from_store(store.clone())
            .with_journal(journal.clone())
            .with_observer(observer.clone());
        (store, journal, observer, ports)
    }

    fn decide(member: &str, members: &[&str], positive: bool, known: &[Vote]) -> Decision {
        let mut session = VotingSession::loading("c", member);
        let club = Club::new("c", "Readers", Membership::new(members.iter().copied()));
        let item = Item::new("x", "Title x", "Author", members[0]);
        session.warm_up(club, vec![item], &[], known).unwrap();
        session.decide(positive).unwrap()
    }

    #[tokio::test]
    async fn test_last_positive_vote_records_match() {
        let (store, journal, observer, ports) = setup(&["a", "b"]);
        let earlier = Vote::like("c", "a", "x");
        store.seed_vote(earlier.clone());

        let use_case = CommitVoteUseCase::new(ports, VotingConfig::immediate(2));
        let report = use_case.execute(decide("b", &["a", "b"], true, &[earlier]), None).await;

        assert_eq!(report.write, WriteStatus::Committed);
        assert!(report.created_match());
        assert_eq!(store.stored_matches().len(), 1);
        assert!(journal.entries.lock().unwrap().is_empty());
        assert_eq!(*observer.matches.lock().unwrap(), vec![MatchOutcome::Created]);
    }

    #[tokio::test]
    async fn test_negative_vote_skips_quorum() {
        let (store, _, _, ports) = setup(&["a", "b"]);
        let use_case = CommitVoteUseCase::new(ports, VotingConfig::immediate(2));

        let report = use_case.execute(decide("a", &["a", "b"], false, &[]), None).await;

        assert_eq!(report.outcome, MatchStatus::NotEvaluated);
        assert_eq!(store.stored_votes().len(), 1);
        assert!(store.stored_matches().is_empty());
    }

    #[tokio::test]
    async fn test_no_premature_match() {
        let (store, _, _, ports) = setup(&["a", "b", "c"]);
        store.seed_vote(Vote::like("c", "a", "x"));
        let use_case = CommitVoteUseCase::new(ports, VotingConfig::immediate(2));

        let report = use_case.execute(decide("b", &["a", "b", "c"], true, &[]), None).await;

        let MatchStatus::NotReached(status) = &report.outcome else {
            panic!("expected a miss, got {:?}", report.outcome);
        };
        assert_eq!(status.positive, 2);
        assert_eq!(status.missing, vec![MemberId::new("c")]);
        assert_eq!(report.refreshed_votes.len(), 2);
        assert!(store.stored_matches().is_empty());
    }

    #[tokio::test]
    async fn test_refresh_on_miss_finds_concurrent_vote() {
        // The session's cache never saw a's vote; the refresh read does.
        let (store, _, _, ports) = setup(&["a", "b"]);
        store.seed_vote(Vote::like("c", "a", "x"));
        let use_case = CommitVoteUseCase::new(ports, VotingConfig::immediate(2));

        let report = use_case.execute(decide("b", &["a", "b"], true, &[]), None).await;

        assert!(report.created_match());
    }

    #[tokio::test]
    async fn test_without_refresh_stale_cache_misses() {
        let (store, _, _, ports) = setup(&["a", "b"]);
        store.seed_vote(Vote::like("c", "a", "x"));
        let config = VotingConfig::immediate(2).with_refresh_on_miss(false);
        let use_case = CommitVoteUseCase::new(ports, config);

        let report = use_case.execute(decide("b", &["a", "b"], true, &[]), None).await;

        assert!(matches!(report.outcome, MatchStatus::NotReached(_)));
        assert!(report.refreshed_votes.is_empty());
    }

    #[tokio::test]
    async fn test_membership_growth_blocks_match() {
        let (store, _, _, ports) = setup(&["a", "b"]);
        store.seed_vote(Vote::like("c", "a", "x"));
        store.join("c", "newcomer");
        let use_case = CommitVoteUseCase::new(ports, VotingConfig::immediate(2));

        let report = use_case.execute(decide("b", &["a", "b"], true, &[]), None).await;

        assert!(matches!(report.outcome, MatchStatus::NotReached(_)));
        assert_eq!(report.club.unwrap().members.len(), 3);
    }

    #[tokio::test]
    async fn test_failed_vote_write_is_journaled_not_matched() {
        let (store, journal, observer, ports) = setup(&["a"]);
        store.fail_vote_writes([StoreError::Timeout, StoreError::Timeout]);
        let use_case = CommitVoteUseCase::new(ports, VotingConfig::immediate(2));

        let report = use_case.execute(decide("a", &["a"], true, &[]), None).await;

        assert!(matches!(report.write, WriteStatus::Abandoned(_)));
        assert_eq!(report.outcome, MatchStatus::NotEvaluated);
        assert!(store.stored_matches().is_empty());
        assert_eq!(journal.kinds(), vec![PendingWriteKind::Vote]);
        assert_eq!(observer.abandoned.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_transient_vote_failure_recovers() {
        let (store, journal, _, ports) = setup(&["a"]);
        store.fail_vote_writes([StoreError::Unavailable("offline".into())]);
        let use_case = CommitVoteUseCase::new(ports, VotingConfig::immediate(3));

        let report = use_case.execute(decide("a", &["a"], true, &[]), None).await;

        assert_eq!(report.write, WriteStatus::Committed);
        assert!(report.created_match());
        assert!(journal.entries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_vote_is_benign() {
        let (store, _, _, ports) = setup(&["a", "b"]);
        store.seed_vote(Vote::pass("c", "a", "x"));
        let use_case = CommitVoteUseCase::new(ports, VotingConfig::immediate(2));

        let report = use_case.execute(decide("a", &["a", "b"], false, &[]), None).await;

        assert_eq!(report.write, WriteStatus::AlreadyRecorded);
        assert_eq!(store.stored_votes().len(), 1);
    }

    #[tokio::test]
    async fn test_stored_pass_outweighs_local_like() {
        // a passed on x from another device; b already likes it
        let (store, journal, _, ports) = setup(&["a", "b"]);
        store.seed_vote(Vote::pass("c", "a", "x"));
        let like_b = Vote::like("c", "b", "x");
        store.seed_vote(like_b.clone());
        let use_case = CommitVoteUseCase::new(ports, VotingConfig::immediate(2));

        let report = use_case.execute(decide("a", &["a", "b"], true, &[like_b]), None).await;

        assert_eq!(report.write, WriteStatus::AlreadyRecorded);
        assert!(report.superseded);
        assert_eq!(report.outcome, MatchStatus::NotEvaluated);
        assert!(store.stored_matches().is_empty());
        assert!(journal.entries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_stored_like_still_reaches_quorum() {
        let (store, _, _, ports) = setup(&["a", "b"]);
        store.seed_vote(Vote::like("c", "a", "x"));
        store.seed_vote(Vote::like("c", "b", "x"));
        let use_case = CommitVoteUseCase::new(ports, VotingConfig::immediate(2));

        let report = use_case.execute(decide("a", &["a", "b"], true, &[]), None).await;

        assert_eq!(report.write, WriteStatus::AlreadyRecorded);
        assert!(!report.superseded);
        assert!(report.created_match());
    }

    #[tokio::test]
    async fn test_unavailable_membership_journals_quorum_check() {
        let (store, journal, _, ports) = setup(&["a"]);
        store.fail_membership([StoreError::Timeout, StoreError::Timeout]);
        let use_case = CommitVoteUseCase::new(ports, VotingConfig::immediate(2));

        let report = use_case.execute(decide("a", &["a"], true, &[]), None).await;

        assert_eq!(report.write, WriteStatus::Committed);
        assert!(matches!(report.outcome, MatchStatus::Failed(_)));
        assert_eq!(journal.kinds(), vec![PendingWriteKind::QuorumCheck]);
    }

    #[tokio::test]
    async fn test_failed_match_write_is_journaled() {
        let (store, journal, _, ports) = setup(&["a"]);
        store.fail_match_writes([
            StoreError::Unavailable("offline".into()),
            StoreError::Unavailable("offline".into()),
        ]);
        let use_case = CommitVoteUseCase::new(ports, VotingConfig::immediate(1));

        let report = use_case.execute(decide("a", &["a"], true, &[]), None).await;

        assert!(matches!(report.outcome, MatchStatus::Failed(_)));
        assert_eq!(journal.kinds(), vec![PendingWriteKind::Match]);
        assert_eq!(journal.entries.lock().unwrap()[0].key, "c_x");
    }

    #[tokio::test]
    async fn test_match_gets_second_attempt_even_with_single_attempt_policy() {
        let (store, journal, _, ports) = setup(&["a"]);
        store.fail_match_writes([StoreError::Timeout]);
        let use_case = CommitVoteUseCase::new(ports, VotingConfig::immediate(1));

        let report = use_case.execute(decide("a", &["a"], true, &[]), None).await;

        assert!(report.created_match());
        assert!(journal.entries.lock().unwrap().is_empty());
    }

    #[test]
    fn test_tally_counts_positive_votes_for_item() {
        let item = Item::new("x", "T", "A", "a");
        let votes = vec![
            Vote::like("c", "a", "x"),
            Vote::pass("c", "b", "x"),
            Vote::like("c", "b", "y"),
        ];
        let voters = tally(&votes, &item);
        assert_eq!(voters.len(), 1);
        assert!(voters.contains("a"));
    }
}
