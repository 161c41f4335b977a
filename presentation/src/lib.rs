//! Presentation layer for booklub
//!
//! This crate contains CLI definitions, output formatters,
//! session progress reporters and the scripted session runner.

pub mod cli;
pub mod output;
pub mod progress;
pub mod runner;

// Re-export commonly used types
pub use cli::commands::{Cli, OutputFormatArg};
pub use output::console::ConsoleFormatter;
pub use output::formatter::OutputFormatter;
pub use progress::reporter::{ProgressReporter, SimpleProgress};
pub use runner::{MemberReport, RunReport, ScriptedMember, ScriptedRunner};
