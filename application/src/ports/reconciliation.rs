//! Port for recording writes that could not be completed.
//!
//! When the background vote/quorum chain gives up on a durable write, the
//! interactive flow has already moved on and cannot roll back. The write is
//! handed to a [`ReconciliationJournal`] instead, so it can be replayed later
//! rather than silently lost.
//!
//! This is separate from `tracing`-based operation logs: tracing carries
//! human-readable diagnostics, while the journal captures the full payload in
//! a machine-readable form (JSONL in the infrastructure adapter).

use booklub_domain::{Match, Vote};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// What kind of write is pending
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PendingWriteKind {
    /// A vote that never reached the vote store
    Vote,
    /// A durable positive vote whose quorum check could not run
    QuorumCheck,
    /// A match whose recording failed after quorum was observed
    Match,
}

impl PendingWriteKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PendingWriteKind::Vote => "vote",
            PendingWriteKind::QuorumCheck => "quorum_check",
            PendingWriteKind::Match => "match",
        }
    }
}

/// A write to reconcile later
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingWrite {
    pub kind: PendingWriteKind,
    /// Store key of the record (vote document id or match idempotency key)
    pub key: String,
    /// Full record payload
    pub payload: Value,
    /// Why the write was given up
    pub reason: String,
    pub recorded_at: DateTime<Utc>,
}

impl PendingWrite {
    pub fn vote(vote: &Vote, reason: impl Into<String>) -> Self {
        Self::new(
            PendingWriteKind::Vote,
            vote.key().document_id(),
            serde_json::to_value(vote).unwrap_or_default(),
            reason,
        )
    }

    pub fn quorum_check(vote: &Vote, reason: impl Into<String>) -> Self {
        Self::new(
            PendingWriteKind::QuorumCheck,
            vote.key().document_id(),
            serde_json::to_value(vote).unwrap_or_default(),
            reason,
        )
    }

    pub fn matched(record: &Match, reason: impl Into<String>) -> Self {
        Self::new(
            PendingWriteKind::Match,
            record.key().idempotency_key(),
            serde_json::to_value(record).unwrap_or_default(),
            reason,
        )
    }

    fn new(kind: PendingWriteKind, key: String, payload: Value, reason: impl Into<String>) -> Self {
        Self {
            kind,
            key,
            payload,
            reason: reason.into(),
            recorded_at: Utc::now(),
        }
    }
}

/// Port for journaling pending writes.
///
/// `record` is synchronous and non-fallible so it can be called from the
/// background chain's failure path; journal failures are logged by the
/// implementation and otherwise ignored.
pub trait ReconciliationJournal: Send + Sync {
    fn record(&self, entry: PendingWrite);
}

/// No-op implementation for tests and when journaling is disabled.
pub struct NoReconciliationJournal;

impl ReconciliationJournal for NoReconciliationJournal {
    fn record(&self, _entry: PendingWrite) {}
}
