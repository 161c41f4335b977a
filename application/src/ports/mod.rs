//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.
//! [`VotingPorts`] bundles the set a voting session needs.

pub mod match_store;
pub mod membership;
pub mod reconciliation;
pub mod session_observer;
pub mod store_error;
pub mod vote_store;

use match_store::MatchStore;
use membership::{ItemSource, MembershipView};
use reconciliation::{NoReconciliationJournal, ReconciliationJournal};
use session_observer::{NoObserver, SessionObserver};
use std::sync::Arc;
use vote_store::VoteStore;

/// Every collaborator a voting session talks to
///
/// Cheap to clone; background tasks each carry their own copy.
#[derive(Clone)]
pub struct VotingPorts {
    pub votes: Arc<dyn VoteStore>,
    pub matches: Arc<dyn MatchStore>,
    pub membership: Arc<dyn MembershipView>,
    pub items: Arc<dyn ItemSource>,
    pub journal: Arc<dyn ReconciliationJournal>,
    pub observer: Arc<dyn SessionObserver>,
}

impl VotingPorts {
    /// Bundle separate adapters, with no journal and no observer
    pub fn new(
        votes: Arc<dyn VoteStore>,
        matches: Arc<dyn MatchStore>,
        membership: Arc<dyn MembershipView>,
        items: Arc<dyn ItemSource>,
    ) -> Self {
        Self {
            votes,
            matches,
            membership,
            items,
            journal: Arc::new(NoReconciliationJournal),
            observer: Arc::new(NoObserver),
        }
    }

    /// Use one adapter that implements every store port
    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: VoteStore + MatchStore + MembershipView + ItemSource + 'static,
    {
        Self::new(store.clone(), store.clone(), store.clone(), store)
    }

    pub fn with_journal(mut self, journal: Arc<dyn ReconciliationJournal>) -> Self {
        self.journal = journal;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn SessionObserver>) -> Self {
        self.observer = observer;
        self
    }
}
