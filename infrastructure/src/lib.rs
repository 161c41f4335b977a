//! Infrastructure layer for booklub
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: the in-memory document store, the
//! reconciliation journal, scenario files and configuration loading.

pub mod config;
pub mod logging;
pub mod memory;
pub mod scenario;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileConfig, FileJournalConfig, FileOutputConfig,
    FileRetryConfig, FileSessionConfig,
};
pub use logging::{JournalError, JsonlReconciliationJournal};
pub use memory::{MemoryDocumentStore, Operation};
pub use scenario::{
    Scenario, ScenarioClub, ScenarioError, ScenarioFaults, ScenarioItem, ScenarioMember,
};
