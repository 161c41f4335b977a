//! Item queue builder
//!
//! Computes the ordered sequence of items a member has not voted on yet.

use crate::catalog::Item;
use crate::club::Membership;
use crate::core::ItemId;
use std::collections::{HashSet, VecDeque};

/// Items waiting for the member's decision, head first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemQueue {
    items: VecDeque<Item>,
}

impl ItemQueue {
    pub fn head(&self) -> Option<&Item> {
        self.items.front()
    }

    /// Remove and return the head, leaving the tail
    pub fn advance(&mut self) -> Option<Item> {
        self.items.pop_front()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }
}

impl FromIterator<Item> for ItemQueue {
    fn from_iter<T: IntoIterator<Item = Item>>(iter: T) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

/// Output of [`build_queue`]
#[derive(Debug, Clone, Default)]
pub struct QueueBuild {
    pub queue: ItemQueue,
    /// Items the member voted on that are no longer reachable from the
    /// membership-filtered item set
    pub orphaned_votes: Vec<ItemId>,
}

/// Build the unvoted queue for one member
///
/// Keeps items proposed by a current member that the viewer has not voted on
/// (either way), ordered by creation time. Items created at the same instant
/// keep the order in which `items` listed them. Duplicate item ids keep their
/// first occurrence.
pub fn build_queue(
    members: &Membership,
    items: impl IntoIterator<Item = Item>,
    voted: &HashSet<ItemId>,
) -> QueueBuild {
    let mut seen = HashSet::new();
    let mut reachable: Vec<Item> = items
        .into_iter()
        .filter(|item| members.contains(&item.added_by))
        .filter(|item| seen.insert(item.id.clone()))
        .collect();

    let mut orphaned_votes: Vec<ItemId> = voted
        .iter()
        .filter(|id| !seen.contains(*id))
        .cloned()
        .collect();
    orphaned_votes.sort();

    reachable.retain(|item| !voted.contains(&item.id));
    reachable.sort_by_key(|item| item.created_at);

    QueueBuild {
        queue: reachable.into_iter().collect(),
        orphaned_votes,
    }
}
