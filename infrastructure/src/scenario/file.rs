//! Scenario file format and store seeding

use crate::memory::{MemoryDocumentStore, Operation};
use booklub_application::StoreError;
use booklub_domain::{Club, ClubId, Item, ItemId, MemberId};
use chrono::{TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// Errors loading or seeding a scenario
#[derive(Error, Debug)]
pub enum ScenarioError {
    #[error("Failed to read scenario {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid scenario TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid scenario: {0}")]
    Invalid(String),

    #[error("Failed to seed store: {0}")]
    Store(#[from] StoreError),
}

/// A scripted club run
///
/// ```toml
/// [club]
/// id = "scifi"
/// name = "Sci-fi Readers"
///
/// [[member]]
/// id = "ana"
/// likes = ["dune"]
///
/// [[item]]
/// id = "dune"
/// title = "Dune"
/// author = "Frank Herbert"
/// added_by = "ana"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    pub club: ScenarioClub,
    #[serde(default, rename = "member")]
    pub members: Vec<ScenarioMember>,
    #[serde(default, rename = "item")]
    pub items: Vec<ScenarioItem>,
    #[serde(default)]
    pub faults: ScenarioFaults,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioClub {
    pub id: String,
    pub name: String,
}

/// A member and how they vote
///
/// Every item in the member's queue is liked if listed in `likes` and passed
/// otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioMember {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub likes: Vec<String>,
    /// Joins only after the founding members finished voting
    #[serde(default)]
    pub joins_late: bool,
}

impl ScenarioMember {
    pub fn member_id(&self) -> MemberId {
        MemberId::new(self.id.as_str())
    }

    pub fn liked_items(&self) -> HashSet<ItemId> {
        self.likes.iter().map(|id| ItemId::new(id.as_str())).collect()
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioItem {
    pub id: String,
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub cover: Option<String>,
    pub added_by: String,
}

/// Simulated store trouble
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScenarioFaults {
    /// Delay added to every store call
    pub latency_ms: u64,
    /// The first N vote writes time out
    pub vote_write_failures: usize,
    /// The first N match writes report the store unavailable
    pub match_write_failures: usize,
    /// The first N membership reads time out
    pub membership_failures: usize,
}

impl FromStr for Scenario {
    type Err = ScenarioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let scenario: Scenario = toml::from_str(s)?;
        scenario.validate()?;
        Ok(scenario)
    }
}

impl Scenario {
    /// Read and validate a scenario file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ScenarioError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ScenarioError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        contents.parse()
    }

    pub fn club_id(&self) -> ClubId {
        ClubId::new(self.club.id.as_str())
    }

    /// Members present from the start, founder first
    pub fn founding_members(&self) -> impl Iterator<Item = &ScenarioMember> {
        self.members.iter().filter(|m| !m.joins_late)
    }

    pub fn late_members(&self) -> impl Iterator<Item = &ScenarioMember> {
        self.members.iter().filter(|m| m.joins_late)
    }

    pub fn validate(&self) -> Result<(), ScenarioError> {
        let invalid = |msg: String| Err(ScenarioError::Invalid(msg));

        if self.club.id.trim().is_empty() {
            return invalid("club id cannot be empty".to_string());
        }
        if self.founding_members().next().is_none() {
            return invalid("at least one member must not join late".to_string());
        }

        let mut members = HashSet::new();
        for member in &self.members {
            if member.id.trim().is_empty() {
                return invalid("member id cannot be empty".to_string());
            }
            if !members.insert(member.id.as_str()) {
                return invalid(format!("member '{}' is listed twice", member.id));
            }
        }

        let mut items = HashSet::new();
        for item in &self.items {
            if !items.insert(item.id.as_str()) {
                return invalid(format!("item '{}' is listed twice", item.id));
            }
            if !members.contains(item.added_by.as_str()) {
                return invalid(format!(
                    "item '{}' is added by unknown member '{}'",
                    item.id, item.added_by
                ));
            }
        }

        for member in &self.members {
            if let Some(unknown) = member.likes.iter().find(|id| !items.contains(id.as_str())) {
                return invalid(format!(
                    "member '{}' likes unknown item '{}'",
                    member.id, unknown
                ));
            }
        }

        Ok(())
    }

    /// A fresh store with this scenario's latency
    pub fn build_store(&self) -> MemoryDocumentStore {
        let store = MemoryDocumentStore::new();
        match self.faults.latency_ms {
            0 => store,
            ms => store.with_latency(Duration::from_millis(ms)),
        }
    }

    /// Create the club with its founding members, propose every item and arm
    /// the configured faults
    pub async fn seed(&self, store: &MemoryDocumentStore) -> Result<Club, ScenarioError> {
        let mut founders = self.founding_members();
        let founder = founders
            .next()
            .ok_or_else(|| ScenarioError::Invalid("no founding member".to_string()))?;

        let club_id = self.club_id();
        let mut club = store
            .create_club(club_id.clone(), self.club.name.as_str(), founder.member_id())
            .await?;
        for member in founders {
            club = store.join_club(&club_id, member.member_id()).await?;
        }

        let names: HashMap<&str, &str> = self
            .members
            .iter()
            .map(|m| (m.id.as_str(), m.display_name()))
            .collect();
        // Stable, distinct creation times in file order
        let base = Utc::now() - TimeDelta::seconds(self.items.len() as i64);
        for (index, entry) in self.items.iter().enumerate() {
            let mut item = Item::new(
                entry.id.as_str(),
                entry.title.as_str(),
                entry.author.as_str(),
                entry.added_by.as_str(),
            )
            .with_description(entry.description.as_str())
            .with_created_at(base + TimeDelta::seconds(index as i64));
            if let Some(cover) = &entry.cover {
                item = item.with_cover(cover.as_str());
            }
            if let Some(name) = names.get(entry.added_by.as_str()) {
                item = item.with_added_by_name(*name);
            }
            store.add_item(item).await?;
        }

        let faults = &self.faults;
        store.fail_next(Operation::VoteWrite, faults.vote_write_failures, StoreError::Timeout);
        store.fail_next(
            Operation::MatchWrite,
            faults.match_write_failures,
            StoreError::Unavailable("simulated outage".to_string()),
        );
        store.fail_next(Operation::Membership, faults.membership_failures, StoreError::Timeout);

        info!(
            "Seeded club '{}' with {} member(s) and {} item(s)",
            club.name,
            club.members.len(),
            self.items.len()
        );
        Ok(club)
    }

    /// Add the late members to the club
    pub async fn join_late(&self, store: &MemoryDocumentStore) -> Result<Vec<MemberId>, ScenarioError> {
        let club_id = self.club_id();
        let mut joined = Vec::new();
        for member in self.late_members() {
            store.join_club(&club_id, member.member_id()).await?;
            debug!("{} joined {} late", member.id, club_id);
            joined.push(member.member_id());
        }
        Ok(joined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use booklub_application::{ItemSource, MembershipView};

    const SCENARIO: &str = r#"
[club]
id = "scifi"
name = "Sci-fi Readers"

[[member]]
id = "ana"
name = "Ana"
likes = ["dune", "solaris"]

[[member]]
id = "bea"
likes = ["dune"]

[[member]]
id = "cai"
likes = ["solaris"]
joins_late = true

[[item]]
id = "dune"
title = "Dune"
author = "Frank Herbert"
description = "Desert planet"
added_by = "ana"

[[item]]
id = "solaris"
title = "Solaris"
author = "Stanislaw Lem"
added_by = "bea"

[faults]
vote_write_failures = 1
"#;

    #[test]
    fn test_parse_scenario() {
        let scenario: Scenario = SCENARIO.parse().unwrap();

        assert_eq!(scenario.club_id(), ClubId::new("scifi"));
        assert_eq!(scenario.founding_members().count(), 2);
        assert_eq!(scenario.late_members().count(), 1);
        assert_eq!(scenario.members[0].display_name(), "Ana");
        assert_eq!(scenario.members[1].display_name(), "bea");
        assert!(scenario.members[0].liked_items().contains("solaris"));
        assert_eq!(scenario.faults.vote_write_failures, 1);
    }

    #[test]
    fn test_unknown_like_is_rejected() {
        let bad = SCENARIO.replace("likes = [\"dune\"]", "likes = [\"missing\"]");
        let err = bad.parse::<Scenario>().unwrap_err();
        assert!(matches!(err, ScenarioError::Invalid(msg) if msg.contains("missing")));
    }

    #[test]
    fn test_item_by_unknown_member_is_rejected() {
        let bad = SCENARIO.replace("added_by = \"bea\"", "added_by = \"zed\"");
        assert!(matches!(bad.parse::<Scenario>(), Err(ScenarioError::Invalid(_))));
    }

    #[test]
    fn test_only_late_members_is_rejected() {
        let bad = r#"
[club]
id = "c"
name = "C"

[[member]]
id = "a"
joins_late = true
"#;
        assert!(matches!(bad.parse::<Scenario>(), Err(ScenarioError::Invalid(_))));
    }

    #[test]
    fn test_unknown_field_is_a_parse_error() {
        let bad = SCENARIO.replace("[faults]", "[faults]\nexplode = true");
        assert!(matches!(bad.parse::<Scenario>(), Err(ScenarioError::Parse(_))));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Scenario::from_path(dir.path().join("none.toml")).unwrap_err();
        assert!(matches!(err, ScenarioError::Io { .. }));
    }

    #[tokio::test]
    async fn test_seed_and_join_late() {
        let scenario: Scenario = SCENARIO.parse().unwrap();
        let store = scenario.build_store();

        let club = scenario.seed(&store).await.unwrap();
        assert_eq!(club.members.len(), 2);

        let items = store.items_added_by_any_of(&club.members).await.unwrap();
        assert_eq!(items.len(), 2);
        assert!(items[0].created_at < items[1].created_at);
        assert_eq!(items[0].added_by_name.as_deref(), Some("Ana"));

        let joined = scenario.join_late(&store).await.unwrap();
        assert_eq!(joined, vec![MemberId::new("cai")]);
        let club = store.snapshot(&scenario.club_id()).await.unwrap();
        assert_eq!(club.members.len(), 3);
    }
}
