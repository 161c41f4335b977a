//! Reconciliation journal configuration from TOML (`[journal]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw journal configuration from TOML
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileJournalConfig {
    /// JSONL file for abandoned writes; journaling is off when unset
    pub path: Option<PathBuf>,
}
