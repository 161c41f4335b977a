//! Quorum evaluation
//!
//! Quorum is reached when every current member of a club has voted positively
//! on the same item. It is recomputed from two read-only sets on every call;
//! there is no shared counter to keep in sync between sessions.

use crate::club::Membership;
use crate::core::MemberId;
use std::collections::HashSet;

/// Pure quorum check over a membership snapshot and a positive-voter set
///
/// # Example
///
/// ```
/// use booklub_domain::{MemberId, Membership, QuorumEvaluator};
/// use std::collections::HashSet;
///
/// let members = Membership::new(["ana", "bea"]);
/// let mut voters: HashSet<MemberId> = HashSet::new();
///
/// voters.insert("ana".into());
/// assert!(!QuorumEvaluator::evaluate(&members, &voters));
///
/// voters.insert("bea".into());
/// assert!(QuorumEvaluator::evaluate(&members, &voters));
/// ```
pub struct QuorumEvaluator;

impl QuorumEvaluator {
    /// `true` iff every member is among the positive voters
    ///
    /// Voters who are not (or no longer) members are ignored. An empty
    /// membership never reaches quorum.
    pub fn evaluate(members: &Membership, positive_voters: &HashSet<MemberId>) -> bool {
        !members.is_empty() && members.iter().all(|m| positive_voters.contains(m))
    }

    /// Members whose positive vote is still missing, in join order
    pub fn missing_voters<'a>(
        members: &'a Membership,
        positive_voters: &HashSet<MemberId>,
    ) -> Vec<&'a MemberId> {
        members
            .iter()
            .filter(|m| !positive_voters.contains(*m))
            .collect()
    }

    /// Full status, for reporting
    pub fn status(members: &Membership, positive_voters: &HashSet<MemberId>) -> QuorumStatus {
        let missing: Vec<MemberId> = Self::missing_voters(members, positive_voters)
            .into_iter()
            .cloned()
            .collect();
        QuorumStatus {
            reached: Self::evaluate(members, positive_voters),
            positive: members.len() - missing.len(),
            required: members.len(),
            missing,
        }
    }
}

/// Snapshot of how close an item is to quorum
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuorumStatus {
    pub reached: bool,
    /// Members who voted positive
    pub positive: usize,
    /// Members who must vote positive
    pub required: usize,
    pub missing: Vec<MemberId>,
}

impl QuorumStatus {
    /// Visual tally, e.g. `"[●●○]"`
    pub fn summary(&self) -> String {
        let mut summary = String::from("[");
        summary.extend(std::iter::repeat_n('●', self.positive));
        summary.extend(std::iter::repeat_n('○', self.required - self.positive));
        summary.push(']');
        summary
    }
}
