//! Match store port
//!
//! Create-if-absent storage of matches plus a push feed of new records.

use super::store_error::StoreError;
use async_trait::async_trait;
use booklub_domain::{ClubId, Match, MatchOutcome};
use tokio::sync::mpsc;

/// Handle for receiving matches as they are created in a club
///
/// Wraps an `mpsc::Receiver<Match>`; dropping the handle ends the
/// subscription.
pub struct MatchFeed {
    pub receiver: mpsc::Receiver<Match>,
}

impl MatchFeed {
    pub fn new(receiver: mpsc::Receiver<Match>) -> Self {
        Self { receiver }
    }

    /// Wait for the next match; `None` once the store closes the feed
    pub async fn recv(&mut self) -> Option<Match> {
        self.receiver.recv().await
    }

    /// Drain whatever has already arrived without waiting
    pub fn drain(&mut self) -> Vec<Match> {
        let mut matches = Vec::new();
        while let Ok(record) = self.receiver.try_recv() {
            matches.push(record);
        }
        matches
    }
}

/// Shared match storage
#[async_trait]
pub trait MatchStore: Send + Sync {
    /// Persist `record` unless a match with the same `(club, item)` key exists
    ///
    /// Exactly one of any number of concurrent calls for the same key reports
    /// [`MatchOutcome::Created`].
    async fn create_if_absent(&self, record: &Match) -> Result<MatchOutcome, StoreError>;

    /// Push notifications of matches created in `club_id` from now on
    async fn subscribe_by_club(&self, club_id: &ClubId) -> Result<MatchFeed, StoreError>;

    /// Matches already recorded in a club, oldest first
    async fn list_by_club(&self, club_id: &ClubId) -> Result<Vec<Match>, StoreError>;
}
