//! Club entity

use super::membership::Membership;
use crate::core::{ClubId, MemberId};
use serde::{Deserialize, Serialize};

/// A club: a group of members sharing one voting pool (Entity)
///
/// Owned by the external club-management collaborator. The voting core only
/// ever holds a read-only snapshot of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Club {
    pub id: ClubId,
    pub name: String,
    #[serde(rename = "memberIds")]
    pub members: Membership,
}

impl Club {
    pub fn new(id: impl Into<ClubId>, name: impl Into<String>, members: Membership) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            members,
        }
    }

    /// A freshly created club containing only its creator
    pub fn founded_by(id: impl Into<ClubId>, name: impl Into<String>, creator: MemberId) -> Self {
        Self::new(id, name, Membership::new([creator]))
    }

    pub fn is_member(&self, member: &MemberId) -> bool {
        self.members.contains(member)
    }
}
