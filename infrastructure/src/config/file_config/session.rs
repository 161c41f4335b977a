//! Session configuration from TOML (`[session]` section)

use serde::{Deserialize, Serialize};

/// Raw session configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSessionConfig {
    /// Re-read the club's votes when the session cache misses quorum
    pub refresh_on_miss: bool,
}

impl Default for FileSessionConfig {
    fn default() -> Self {
        Self {
            refresh_on_miss: true,
        }
    }
}
