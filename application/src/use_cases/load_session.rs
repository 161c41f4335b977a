//! Load Session use case
//!
//! Takes a session from `Loading` to `Ready` or `Exhausted`: one roster
//! snapshot, then the items, the member's own votes and the club's votes in
//! parallel.

use crate::config::RetryPolicy;
use crate::ports::VotingPorts;
use crate::ports::store_error::StoreError;
use crate::use_cases::retry::with_retry;
use booklub_domain::{DomainError, ItemId, SessionPhase, VotingSession};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Errors that keep a session from leaving `Loading`
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadSessionError {
    #[error("Membership unavailable: {0}")]
    MembershipUnavailable(#[source] StoreError),

    #[error("Failed to load votes or items: {0}")]
    Store(#[source] StoreError),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// What loading found
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Items in the first queue
    pub queued: usize,
    /// Own votes pointing at items that are no longer reachable
    pub orphaned_votes: Vec<ItemId>,
}

/// Use case for warming a session
pub struct LoadSessionUseCase<'a> {
    ports: &'a VotingPorts,
    policy: &'a RetryPolicy,
    cancellation_token: Option<&'a CancellationToken>,
}

impl<'a> LoadSessionUseCase<'a> {
    pub fn new(ports: &'a VotingPorts, policy: &'a RetryPolicy) -> Self {
        Self {
            ports,
            policy,
            cancellation_token: None,
        }
    }

    pub fn with_cancellation(mut self, token: &'a CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    /// Load `session`; on failure the session moves to `Errored`
    ///
    /// A session that already left `Loading` is rejected and left untouched.
    pub async fn execute(&self, session: &mut VotingSession) -> Result<LoadReport, LoadSessionError> {
        if session.phase() != SessionPhase::Loading {
            return Err(DomainError::InvalidTransition {
                action: "load",
                phase: session.phase().as_str(),
            }
            .into());
        }

        match self.load(session).await {
            Ok(report) => {
                self.ports
                    .observer
                    .on_phase_change(session.member(), session.phase());
                Ok(report)
            }
            Err(e) => {
                warn!("Session for {} failed to load: {}", session.member(), e);
                session.fail(e.to_string());
                self.ports
                    .observer
                    .on_phase_change(session.member(), session.phase());
                Err(e)
            }
        }
    }

    async fn load(&self, session: &mut VotingSession) -> Result<LoadReport, LoadSessionError> {
        let observer = self.ports.observer.as_ref();
        let club_id = session.club().id.clone();
        let member = session.member().clone();

        let membership = &self.ports.membership;
        let club = with_retry(self.policy, "fetch membership", observer, self.cancellation_token, || {
            membership.snapshot(&club_id)
        })
        .await
        .map_err(LoadSessionError::MembershipUnavailable)?;

        let items = &self.ports.items;
        let votes = &self.ports.votes;
        let members = &club.members;
        let (items, own_votes, club_votes) = tokio::try_join!(
            with_retry(self.policy, "fetch items", observer, self.cancellation_token, || {
                items.items_added_by_any_of(members)
            }),
            with_retry(self.policy, "fetch own votes", observer, self.cancellation_token, || {
                votes.query_by_club_and_member(&club_id, &member)
            }),
            with_retry(self.policy, "fetch club votes", observer, self.cancellation_token, || {
                votes.query_by_club(&club_id)
            }),
        )
        .map_err(LoadSessionError::Store)?;

        let club_name = club.name.clone();
        let orphaned_votes = session.warm_up(club, items, &own_votes, &club_votes)?;
        if !orphaned_votes.is_empty() {
            warn!(
                "{} has {} vote(s) on items no longer proposed in {}: {:?}",
                member,
                orphaned_votes.len(),
                club_id,
                orphaned_votes
            );
        }

        info!(
            "Session loaded for {} in '{}': {} item(s) to vote on, {} club vote(s) cached",
            member,
            club_name,
            session.remaining(),
            club_votes.len()
        );
        Ok(LoadReport {
            queued: session.remaining(),
            orphaned_votes,
        })
    }
}
