//! Configuration file loading for booklub
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `BOOKLUB_` environment variables (`BOOKLUB_SESSION__REFRESH_ON_MISS=false`)
//! 2. `--config <path>` specified file
//! 3. Project root: `./booklub.toml` or `./.booklub.toml`
//! 4. Global: `$XDG_CONFIG_HOME/booklub/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileConfig, FileJournalConfig, FileOutputConfig, FileRetryConfig,
    FileSessionConfig,
};
pub use loader::ConfigLoader;
