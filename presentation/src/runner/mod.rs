//! Scripted member sessions
//!
//! Drives [`VotingSessionController`](booklub_application::VotingSessionController)s
//! the way members tapping like and pass would, from a fixed set of likes per
//! member.

mod scripted;

pub use scripted::{MemberReport, RunReport, ScriptedMember, ScriptedRunner};
