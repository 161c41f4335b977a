//! Item entity: a proposed book

use crate::core::{ItemId, MemberId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A book proposed by a club member (Entity)
///
/// Immutable once created; owned by the external catalog collaborator. A copy
/// of the full payload is embedded in every [`Match`](crate::Match).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: ItemId,
    pub title: String,
    pub author: String,
    pub description: String,
    /// Cover image reference, if the catalog had one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
    pub added_by: MemberId,
    /// Display name of the proposer, shown on the voting card
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_by_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Item {
    pub fn new(
        id: impl Into<ItemId>,
        title: impl Into<String>,
        author: impl Into<String>,
        added_by: impl Into<MemberId>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            author: author.into(),
            description: String::new(),
            cover: None,
            added_by: added_by.into(),
            added_by_name: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_cover(mut self, cover: impl Into<String>) -> Self {
        self.cover = Some(cover.into());
        self
    }

    pub fn with_added_by_name(mut self, name: impl Into<String>) -> Self {
        self.added_by_name = Some(name.into());
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let item = Item::new("b1", "Rayuela", "Julio Cortázar", "ana")
            .with_description("Hopscotch")
            .with_added_by_name("Ana");

        assert_eq!(item.id.as_str(), "b1");
        assert_eq!(item.added_by.as_str(), "ana");
        assert_eq!(item.added_by_name.as_deref(), Some("Ana"));
        assert!(item.cover.is_none());
    }

    #[test]
    fn test_serialized_field_names() {
        let item = Item::new("b1", "T", "A", "ana").with_cover("https://covers/b1.jpg");
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["addedBy"], "ana");
        assert_eq!(value["cover"], "https://covers/b1.jpg");
        assert!(value.get("addedByName").is_none());
        assert!(value.get("createdAt").is_some());
    }
}
