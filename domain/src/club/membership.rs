//! Membership value object
//!
//! The roster of a club. Matching treats it as a set; display keeps the order
//! in which members joined.

use crate::core::MemberId;
use serde::{Deserialize, Serialize};

/// Unique, join-ordered set of member identifiers
///
/// # Example
///
/// ```
/// use booklub_domain::Membership;
///
/// let mut members = Membership::new(["ana", "bea", "ana"]);
/// assert_eq!(members.len(), 2);
///
/// assert!(members.join("cami"));
/// assert!(!members.join("bea"));
/// assert_eq!(
///     members.iter().map(|m| m.as_str()).collect::<Vec<_>>(),
///     vec!["ana", "bea", "cami"]
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<MemberId>", into = "Vec<MemberId>")]
pub struct Membership {
    members: Vec<MemberId>,
}

impl Membership {
    /// Build a membership, dropping duplicates after their first occurrence
    pub fn new<I, M>(members: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Into<MemberId>,
    {
        let mut membership = Self::default();
        for member in members {
            membership.join(member);
        }
        membership
    }

    /// Append a member; returns `false` if already present
    pub fn join(&mut self, member: impl Into<MemberId>) -> bool {
        let member = member.into();
        if self.contains(&member) {
            return false;
        }
        self.members.push(member);
        true
    }

    pub fn contains(&self, member: &MemberId) -> bool {
        self.members.iter().any(|m| m == member)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Members in join order
    pub fn iter(&self) -> impl Iterator<Item = &MemberId> {
        self.members.iter()
    }

    pub fn as_slice(&self) -> &[MemberId] {
        &self.members
    }
}

impl From<Vec<MemberId>> for Membership {
    fn from(members: Vec<MemberId>) -> Self {
        Self::new(members)
    }
}

impl From<Membership> for Vec<MemberId> {
    fn from(membership: Membership) -> Self {
        membership.members
    }
}

impl<'a> IntoIterator for &'a Membership {
    type Item = &'a MemberId;
    type IntoIter = std::slice::Iter<'a, MemberId>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.iter()
    }
}
