//! Console output formatter for voting runs

use crate::output::formatter::OutputFormatter;
use crate::runner::{MemberReport, RunReport};
use booklub_domain::util::preview;
use booklub_domain::{Match, SessionPhase};
use colored::Colorize;
use serde_json::json;

/// Match cards show at most this much of the description
const DESCRIPTION_PREVIEW: usize = 200;

/// Formats voting runs for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the complete run
    pub fn format(report: &RunReport) -> String {
        let mut output = String::new();

        output.push_str(&Self::header(&report.club.name));
        output.push('\n');

        output.push_str(&format!(
            "{} {} ({})\n",
            "Club:".cyan().bold(),
            report.club.name,
            report.club.id
        ));
        output.push_str(&format!(
            "{} {}\n",
            "Members:".cyan().bold(),
            report
                .club
                .members
                .iter()
                .map(|m| m.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        ));

        // Matches
        output.push_str(&Self::section_header(&format!(
            "Matches ({})",
            report.matches.len()
        )));
        if report.matches.is_empty() {
            output.push_str(&format!("\n{}\n", "No matches yet.".dimmed()));
        }
        for record in &report.matches {
            output.push_str(&Self::match_card(record));
        }

        // Sessions
        output.push_str(&Self::section_header("Sessions"));
        for member in &report.members {
            output.push_str(&Self::member_line(member));
        }

        // Pending writes
        if !report.pending.is_empty() {
            output.push_str(&Self::section_header(&format!(
                "Pending writes ({})",
                report.pending.len()
            )));
            for entry in &report.pending {
                output.push_str(&format!(
                    "  * {} {}: {}\n",
                    entry.kind.as_str().yellow(),
                    entry.key,
                    entry.reason
                ));
            }
        }

        output.push_str(&Self::footer());

        output
    }

    /// Format as JSON
    pub fn format_json(report: &RunReport) -> String {
        let members: Vec<_> = report.members.iter().map(Self::member_json).collect();
        let value = json!({
            "club": report.club,
            "matches": report.matches,
            "members": members,
            "streamed": report.streamed,
            "pending": report.pending,
        });
        serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format matches only (concise output)
    pub fn format_summary(report: &RunReport) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{}\n\n",
            format!("=== {} matches ===", report.club.name).cyan().bold()
        ));

        if report.matches.is_empty() {
            output.push_str("No matches yet.\n");
        }
        for record in &report.matches {
            output.push_str(&format!(
                "{} {} by {}\n",
                "*".green(),
                record.item.title.bold(),
                record.item.author
            ));
        }

        if !report.pending.is_empty() {
            output.push_str(&format!(
                "\n{} {} write(s) pending reconciliation\n",
                "!".yellow(),
                report.pending.len()
            ));
        }

        output
    }

    fn match_card(record: &Match) -> String {
        let item = &record.item;
        let mut card = format!(
            "\n{}\n",
            format!("── {} ──", item.title).yellow().bold()
        );
        card.push_str(&format!("{} {}\n", "by".dimmed(), item.author));
        if !item.description.is_empty() {
            card.push_str(&format!(
                "{}\n",
                Self::indent(&preview(&item.description, DESCRIPTION_PREVIEW), "  ")
            ));
        }
        let proposer = item
            .added_by_name
            .as_deref()
            .unwrap_or(item.added_by.as_str());
        card.push_str(&format!(
            "{} {} · {} {}\n",
            "Proposed by".dimmed(),
            proposer,
            "matched".dimmed(),
            record.matched_at.format("%Y-%m-%d %H:%M:%S")
        ));
        card
    }

    fn member_line(member: &MemberReport) -> String {
        let status = match member.phase {
            SessionPhase::Errored => "x".red(),
            SessionPhase::Exhausted => "v".green(),
            _ => "-".yellow(),
        };
        let mut line = format!(
            "  {} {:<12} {} liked, {} passed, {} committed",
            status,
            member.member.as_str(),
            member.liked.len(),
            member.passed.len(),
            member.committed
        );
        if member.abandoned > 0 {
            line.push_str(&format!(", {}", format!("{} abandoned", member.abandoned).red()));
        }
        if !member.matches_created.is_empty() {
            line.push_str(&format!(
                ", {}",
                format!("{} match(es)", member.matches_created.len()).green()
            ));
        }
        if let Some(error) = &member.error {
            line.push_str(&format!(" ({})", error.red()));
        }
        line.push('\n');
        line
    }

    fn member_json(member: &MemberReport) -> serde_json::Value {
        json!({
            "member": member.member,
            "phase": member.phase.as_str(),
            "liked": member.liked,
            "passed": member.passed,
            "committed": member.committed,
            "abandoned": member.abandoned,
            "matchesCreated": member.matches_created,
            "reconcile": member.reconcile.as_ref().map(|r| json!({
                "votesRead": r.votes_read,
                "votesAbsorbed": r.votes_absorbed,
                "created": r.created.len(),
                "alreadyRecorded": r.already_recorded,
                "failed": r.failed.len(),
            })),
            "error": member.error,
        })
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format(&self, report: &RunReport) -> String {
        Self::format(report)
    }

    fn format_json(&self, report: &RunReport) -> String {
        Self::format_json(report)
    }

    fn format_summary(&self, report: &RunReport) -> String {
        Self::format_summary(report)
    }
}
