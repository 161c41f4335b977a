//! CLI command definitions

use booklub_domain::OutputFormat;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for a finished run
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormatArg {
    /// Matches with item details and per-member session reports
    Full,
    /// One line per match
    Summary,
    /// JSON output
    Json,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Full => OutputFormat::Full,
            OutputFormatArg::Summary => OutputFormat::Summary,
            OutputFormatArg::Json => OutputFormat::Json,
        }
    }
}

/// CLI arguments for booklub
#[derive(Parser, Debug)]
#[command(name = "booklub")]
#[command(author, version, about = "Book club voting - every member likes it, it's a match")]
#[command(long_about = r#"
booklub runs a club's voting sessions and records a match whenever every
current member has liked the same book.

A scenario file describes the club, its members, the books they propose and
which ones each member likes. Every founding member votes concurrently, then
members marked `joins_late` join and vote, then each session reconciles
against the store.

Configuration files are loaded from (in priority order):
1. BOOKLUB_* environment variables
2. --config <path>     Explicit config file
3. ./booklub.toml      Project-level config
4. ~/.config/booklub/config.toml   Global config

Example:
  booklub demos/sample.toml
  booklub demos/sample.toml -o full -vv
  booklub demos/sample.toml -o json --log-file booklub.log
"#)]
pub struct Cli {
    /// Scenario file to run (not required with --show-config)
    pub scenario: Option<PathBuf>,

    /// Output format (overrides [output] format in config)
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormatArg>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Skip the reconciliation pass after voting
    #[arg(long)]
    pub no_reconcile: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Write logs to a file instead of stderr
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Reconciliation journal path (overrides [journal] path in config)
    #[arg(long, value_name = "PATH")]
    pub journal: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_run() {
        let cli = Cli::try_parse_from(["booklub", "club.toml", "-o", "json", "-vv"]).unwrap();
        assert_eq!(cli.scenario, Some(PathBuf::from("club.toml")));
        assert_eq!(cli.output, Some(OutputFormatArg::Json));
        assert_eq!(cli.verbose, 2);
        assert!(!cli.quiet);
        assert!(!cli.no_reconcile);
    }

    #[test]
    fn test_show_config_needs_no_scenario() {
        let cli = Cli::try_parse_from(["booklub", "--show-config"]).unwrap();
        assert!(cli.show_config);
        assert!(cli.scenario.is_none());
    }

    #[test]
    fn test_output_arg_maps_to_domain_format() {
        assert_eq!(OutputFormat::from(OutputFormatArg::Full), OutputFormat::Full);
        assert_eq!(OutputFormat::from(OutputFormatArg::Summary), OutputFormat::Summary);
    }
}
