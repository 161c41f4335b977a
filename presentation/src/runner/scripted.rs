//! Scripted member sessions

use booklub_application::{
    PendingWrite, ReconcileReport, VoteCommitReport, VotingConfig, VotingPorts,
    VotingSessionController, WriteStatus,
};
use booklub_domain::{Club, ClubId, ItemId, Match, MemberId, SessionPhase};
use std::collections::HashSet;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// A member and the items they will like; everything else is passed
#[derive(Debug, Clone)]
pub struct ScriptedMember {
    pub member: MemberId,
    pub likes: HashSet<ItemId>,
}

impl ScriptedMember {
    pub fn new<I, T>(member: impl Into<MemberId>, likes: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<ItemId>,
    {
        Self {
            member: member.into(),
            likes: likes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn likes(&self, item: &ItemId) -> bool {
        self.likes.contains(item)
    }
}

/// What one member's session did
#[derive(Debug, Clone)]
pub struct MemberReport {
    pub member: MemberId,
    /// Phase the session ended in
    pub phase: SessionPhase,
    pub liked: Vec<ItemId>,
    pub passed: Vec<ItemId>,
    /// Votes that reached the store
    pub committed: usize,
    /// Votes given up and journaled
    pub abandoned: usize,
    /// Matches this member's session created, in the background chain or
    /// while reconciling
    pub matches_created: Vec<ItemId>,
    pub reconcile: Option<ReconcileReport>,
    pub error: Option<String>,
}

impl MemberReport {
    fn new(member: MemberId) -> Self {
        Self {
            member,
            phase: SessionPhase::Loading,
            liked: Vec::new(),
            passed: Vec::new(),
            committed: 0,
            abandoned: 0,
            matches_created: Vec::new(),
            reconcile: None,
            error: None,
        }
    }

    pub fn decisions(&self) -> usize {
        self.liked.len() + self.passed.len()
    }

    fn absorb(&mut self, reports: &[VoteCommitReport]) {
        for report in reports {
            match report.write {
                WriteStatus::Committed | WriteStatus::AlreadyRecorded => self.committed += 1,
                WriteStatus::Abandoned(_) => self.abandoned += 1,
            }
            if report.created_match() {
                self.matches_created.push(report.item.id.clone());
            }
        }
    }
}

/// Everything a run produced, ready for output
#[derive(Debug, Clone)]
pub struct RunReport {
    pub club: Club,
    /// Member reports in the order the sessions were run
    pub members: Vec<MemberReport>,
    /// Matches recorded in the club at the end of the run
    pub matches: Vec<Match>,
    /// Matches pushed through the club's match feed during the run
    pub streamed: usize,
    /// Writes the journal holds for later reconciliation
    pub pending: Vec<PendingWrite>,
}

/// Runs scripted member sessions against a set of ports
pub struct ScriptedRunner {
    club_id: ClubId,
    ports: VotingPorts,
    config: VotingConfig,
    reconcile: bool,
    cancellation_token: CancellationToken,
}

impl ScriptedRunner {
    pub fn new(club_id: impl Into<ClubId>, ports: VotingPorts, config: VotingConfig) -> Self {
        Self {
            club_id: club_id.into(),
            ports,
            config,
            reconcile: true,
            cancellation_token: CancellationToken::new(),
        }
    }

    /// Run a reconciliation pass at the end of each session (default: on)
    pub fn with_reconcile(mut self, enabled: bool) -> Self {
        self.reconcile = enabled;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = token;
        self
    }

    /// Run every member's session concurrently
    ///
    /// Reports come back in the order of `members`.
    pub async fn run_round(&self, members: &[ScriptedMember]) -> Vec<MemberReport> {
        info!(
            "Running {} session(s) in club {}",
            members.len(),
            self.club_id
        );
        let mut join_set = JoinSet::new();

        for (index, script) in members.iter().cloned().enumerate() {
            let club_id = self.club_id.clone();
            let ports = self.ports.clone();
            let config = self.config.clone();
            let token = self.cancellation_token.clone();
            let reconcile = self.reconcile;

            join_set.spawn(async move {
                let report =
                    Self::run_member(script, club_id, ports, config, token, reconcile).await;
                (index, report)
            });
        }

        let mut reports = Vec::with_capacity(members.len());
        while let Some(result) = join_set.join_next().await {
            match result {
                Ok(entry) => reports.push(entry),
                Err(e) => warn!("Member session task failed: {}", e),
            }
        }
        reports.sort_by_key(|(index, _)| *index);
        reports.into_iter().map(|(_, report)| report).collect()
    }

    /// Drive one member through their queue until it is exhausted
    async fn run_member(
        script: ScriptedMember,
        club_id: ClubId,
        ports: VotingPorts,
        config: VotingConfig,
        token: CancellationToken,
        reconcile: bool,
    ) -> MemberReport {
        let mut report = MemberReport::new(script.member.clone());
        let mut controller =
            VotingSessionController::new(club_id, script.member.clone(), ports, config)
                .with_cancellation(token);

        if let Err(e) = controller.load().await {
            warn!("{} could not start voting: {}", script.member, e);
            report.phase = controller.phase();
            report.error = Some(e.to_string());
            return report;
        }

        while let Some(item_id) = controller.current_item().map(|item| item.id.clone()) {
            let positive = script.likes(&item_id);
            if let Err(e) = controller.decide(positive) {
                report.error = Some(e.to_string());
                break;
            }
            if positive {
                report.liked.push(item_id);
            } else {
                report.passed.push(item_id);
            }
            // Interleave with the other members' sessions
            tokio::task::yield_now().await;
        }

        let commits = controller.flush().await;
        report.absorb(&commits);

        if reconcile {
            match controller.reconcile().await {
                Ok(reconciled) => {
                    report
                        .matches_created
                        .extend(reconciled.created.iter().map(|m| m.item_id.clone()));
                    report.reconcile = Some(reconciled);
                }
                Err(e) => warn!("Reconcile for {} failed: {}", script.member, e),
            }
        }

        report.phase = controller.phase();
        let remaining = controller.close().await;
        report.absorb(&remaining);

        debug!(
            "{} finished: {} decision(s), {} match(es) created",
            report.member,
            report.decisions(),
            report.matches_created.len()
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use booklub_application::StoreError;
    use booklub_domain::Item;
    use booklub_infrastructure::{MemoryDocumentStore, Operation};
    use std::sync::Arc;

    async fn seeded_store() -> Arc<MemoryDocumentStore> {
        let store = Arc::new(MemoryDocumentStore::new());
        store.create_club("club", "Readers", "ana").await.unwrap();
        store.join_club(&ClubId::new("club"), "bea").await.unwrap();
        store
            .add_item(Item::new("dune", "Dune", "Frank Herbert", "ana"))
            .await
            .unwrap();
        store
            .add_item(Item::new("emma", "Emma", "Jane Austen", "bea"))
            .await
            .unwrap();
        store
    }

    fn runner(store: &Arc<MemoryDocumentStore>) -> ScriptedRunner {
        ScriptedRunner::new(
            "club",
            VotingPorts::from_store(store.clone()),
            VotingConfig::immediate(3),
        )
    }

    #[tokio::test]
    async fn test_shared_like_matches_once() {
        let store = seeded_store().await;
        let members = [
            ScriptedMember::new("ana", ["dune", "emma"]),
            ScriptedMember::new("bea", ["dune"]),
        ];

        let reports = runner(&store).run_round(&members).await;

        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].member, MemberId::new("ana"));
        assert_eq!(reports[1].member, MemberId::new("bea"));
        for report in &reports {
            assert_eq!(report.phase, SessionPhase::Exhausted);
            assert_eq!(report.decisions(), 2);
            assert_eq!(report.committed, 2);
            assert!(report.error.is_none());
        }

        let created: usize = reports.iter().map(|r| r.matches_created.len()).sum();
        assert_eq!(created, 1);
        let matches = store.all_matches().await;
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].item_id, ItemId::new("dune"));
    }

    #[tokio::test]
    async fn test_unavailable_membership_reports_error() {
        let store = seeded_store().await;
        store.fail_next(Operation::Membership, 10, StoreError::Timeout);

        let reports = runner(&store)
            .with_reconcile(false)
            .run_round(&[ScriptedMember::new("ana", ["dune"])])
            .await;

        assert_eq!(reports[0].phase, SessionPhase::Errored);
        assert!(reports[0].error.is_some());
        assert_eq!(reports[0].decisions(), 0);
        assert!(store.all_votes().await.is_empty());
    }

    #[tokio::test]
    async fn test_reconcile_is_reported() {
        let store = seeded_store().await;
        let reports = runner(&store)
            .run_round(&[ScriptedMember::new("ana", Vec::<&str>::new())])
            .await;

        let reconcile = reports[0].reconcile.as_ref().unwrap();
        assert_eq!(reconcile.votes_read, 2);
        assert!(reconcile.created.is_empty());
        assert_eq!(reports[0].passed.len(), 2);
    }
}
