//! Logging infrastructure: the reconciliation journal.
//!
//! Provides [`JsonlReconciliationJournal`], a JSONL file writer that implements
//! the [`ReconciliationJournal`](booklub_application::ReconciliationJournal) port.

mod jsonl_journal;

pub use jsonl_journal::{JournalError, JsonlReconciliationJournal};
