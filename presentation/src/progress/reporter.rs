//! Progress reporting for voting sessions

use booklub_application::{PendingWrite, SessionObserver, StoreError};
use booklub_domain::{Match, MatchOutcome, MemberId, SessionPhase, Vote};
use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// Reports progress with one spinner per member session
pub struct ProgressReporter {
    multi: MultiProgress,
    bars: Mutex<HashMap<MemberId, ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            bars: Mutex::new(HashMap::new()),
        }
    }

    fn session_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {pos:>3} vote(s) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn phase_message(phase: SessionPhase) -> &'static str {
        match phase {
            SessionPhase::Loading => "loading club...",
            SessionPhase::Ready => "voting",
            SessionPhase::Deciding => "deciding",
            SessionPhase::Exhausted => "queue empty",
            SessionPhase::Errored => "could not load",
        }
    }

    /// The member's bar, created on first use or after it was finished
    fn bar(&self, member: &MemberId) -> Option<ProgressBar> {
        let mut bars = self.bars.lock().ok()?;
        let bar = bars
            .entry(member.clone())
            .and_modify(|bar| {
                if bar.is_finished() {
                    *bar = self.new_bar(member);
                }
            })
            .or_insert_with(|| self.new_bar(member));
        Some(bar.clone())
    }

    fn new_bar(&self, member: &MemberId) -> ProgressBar {
        let bar = self.multi.add(ProgressBar::new_spinner());
        bar.set_style(Self::session_style());
        bar.set_prefix(member.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));
        bar
    }

    fn println(&self, line: String) {
        // Falls back to plain stdout when the terminal is hidden
        if self.multi.println(&line).is_err() {
            println!("{}", line);
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionObserver for ProgressReporter {
    fn on_phase_change(&self, member: &MemberId, phase: SessionPhase) {
        // Deciding flickers on every vote
        if phase == SessionPhase::Deciding {
            return;
        }
        let Some(bar) = self.bar(member) else {
            return;
        };
        let message = Self::phase_message(phase);
        match phase {
            SessionPhase::Exhausted => bar.finish_with_message(message.green().to_string()),
            SessionPhase::Errored => bar.abandon_with_message(message.red().to_string()),
            _ => bar.set_message(message),
        }
    }

    fn on_vote_committed(&self, vote: &Vote) {
        if let Ok(bars) = self.bars.lock()
            && let Some(bar) = bars.get(&vote.member_id)
        {
            bar.inc(1);
        }
    }

    fn on_retrying(&self, operation: &str, attempt: usize, error: &StoreError) {
        self.println(format!(
            "  {} {} (attempt {}): {}",
            "~".yellow(),
            operation,
            attempt,
            error
        ));
    }

    fn on_match(&self, record: &Match, outcome: MatchOutcome) {
        if outcome.is_created() {
            self.println(format!(
                "  {} {} by {}",
                "* Match!".green().bold(),
                record.item.title.bold(),
                record.item.author
            ));
        }
    }

    fn on_write_abandoned(&self, entry: &PendingWrite) {
        self.println(format!(
            "  {} {} {} journaled: {}",
            "x".red(),
            entry.kind.as_str(),
            entry.key,
            entry.reason
        ));
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl SessionObserver for SimpleProgress {
    fn on_phase_change(&self, member: &MemberId, phase: SessionPhase) {
        match phase {
            SessionPhase::Loading => println!("{} {} joins the session", "->".cyan(), member.to_string().bold()),
            SessionPhase::Exhausted => println!("  {} {} has nothing left to vote on", "v".green(), member),
            SessionPhase::Errored => println!("  {} {} could not load the club", "x".red(), member),
            SessionPhase::Ready | SessionPhase::Deciding => {}
        }
    }

    fn on_retrying(&self, operation: &str, attempt: usize, error: &StoreError) {
        println!("  {} {} (attempt {}): {}", "~".yellow(), operation, attempt, error);
    }

    fn on_match(&self, record: &Match, outcome: MatchOutcome) {
        if outcome.is_created() {
            println!("  {} {}", "* Match!".green(), record.item.title);
        }
    }

    fn on_write_abandoned(&self, entry: &PendingWrite) {
        println!("  {} {} {} journaled", "x".red(), entry.kind.as_str(), entry.key);
    }
}
