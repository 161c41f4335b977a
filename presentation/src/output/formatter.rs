//! Output formatter trait

use crate::runner::RunReport;
use booklub_domain::OutputFormat;

/// Trait for formatting finished runs
pub trait OutputFormatter {
    /// Matches with item details, member reports and pending writes
    fn format(&self, report: &RunReport) -> String;

    /// Format as JSON
    fn format_json(&self, report: &RunReport) -> String;

    /// One line per match (concise output)
    fn format_summary(&self, report: &RunReport) -> String;

    fn render(&self, format: OutputFormat, report: &RunReport) -> String {
        match format {
            OutputFormat::Full => self.format(report),
            OutputFormat::Summary => self.format_summary(report),
            OutputFormat::Json => self.format_json(report),
        }
    }
}
