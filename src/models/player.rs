//! PlayerRecord: the entity stored in the registry.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};
use uuid::Uuid;

/// Opaque identifier for a player. Stable across renames and save/load.
pub type PlayerId = String;

/// Number of recent categories kept in a player's history.
pub const HISTORY_CAPACITY: usize = 10;

/// Minimum capabilities of a player-like entity.
pub trait PlayerEntity {
    /// Identifier assigned at creation.
    fn id(&self) -> &str;

    /// JSON object in the leaderboard file layout.
    fn to_json(&self) -> serde_json::Value;

    /// Record the result of one answered question in `category`.
    ///
    /// Returns false, changing nothing, when `category` is not tracked by this entity.
    fn update_score(&mut self, category: &str, correct: bool) -> bool;
}

/// A player's aggregate state.
///
/// Fields are private: `id` is fixed at construction, `name` only changes through a registry
/// rename, and the counters only move forward through [`PlayerEntity::update_score`].
/// Counters saturate at `u64::MAX` instead of wrapping.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct PlayerRecord {
    id: PlayerId,
    name: String,
    score: u64,
    total_answered: u64,
    category_stats: BTreeMap<String, u64>,
    /// Most recent last.
    history: VecDeque<String>,
}

/// Persisted form of a player, as read back from the leaderboard file.
///
/// Everything except `name` is optional so that older files still load.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct PlayerSnapshot {
    #[serde(default)]
    pub id: Option<PlayerId>,
    pub name: String,
    #[serde(default)]
    pub score: u64,
    #[serde(default)]
    pub total_answered: u64,
    #[serde(default)]
    pub category_stats: BTreeMap<String, u64>,
    #[serde(default)]
    pub history: Vec<String>,
}

impl PlayerRecord {
    /// Create a new player with a fresh id. Every category starts at zero.
    pub fn new<S: AsRef<str>>(name: impl Into<String>, categories: &[S]) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            score: 0,
            total_answered: 0,
            category_stats: default_stats(categories),
            history: VecDeque::with_capacity(HISTORY_CAPACITY),
        }
    }

    /// Rebuild a player from its persisted form.
    ///
    /// Persisted category counts are laid over the configured defaults, history keeps the
    /// newest `HISTORY_CAPACITY` entries, and a missing id is replaced by a fresh one.
    pub fn from_snapshot<S: AsRef<str>>(snapshot: PlayerSnapshot, categories: &[S]) -> Self {
        let mut category_stats = default_stats(categories);
        category_stats.extend(snapshot.category_stats);

        let skip = snapshot.history.len().saturating_sub(HISTORY_CAPACITY);
        let history: VecDeque<String> = snapshot.history.into_iter().skip(skip).collect();

        Self {
            id: snapshot.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            name: snapshot.name,
            score: snapshot.score,
            total_answered: snapshot.total_answered,
            category_stats,
            history,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Correct answers so far.
    pub fn score(&self) -> u64 {
        self.score
    }

    /// Questions answered so far (correct or not).
    pub fn total_answered(&self) -> u64 {
        self.total_answered
    }

    /// Correct answers per category.
    pub fn category_stats(&self) -> &BTreeMap<String, u64> {
        &self.category_stats
    }

    /// Recently played categories, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &str> + '_ {
        self.history.iter().map(String::as_str)
    }

    /// Check the counter invariants: `score <= total_answered`, every category count is at
    /// most `total_answered`, and the category counts add up to `score`.
    pub fn check_stats(&self) -> Result<(), String> {
        if self.score > self.total_answered {
            return Err(format!(
                "'{}' has score {} above total answered {}",
                self.name, self.score, self.total_answered
            ));
        }
        if let Some((category, hits)) = self
            .category_stats
            .iter()
            .find(|&(_, &hits)| hits > self.total_answered)
        {
            return Err(format!(
                "'{}' has {} correct in '{}' but only {} answered",
                self.name, hits, category, self.total_answered
            ));
        }
        let sum = self
            .category_stats
            .values()
            .try_fold(0u64, |acc, &hits| acc.checked_add(hits));
        if sum != Some(self.score) {
            return Err(format!(
                "'{}' category counts do not add up to score {}",
                self.name, self.score
            ));
        }
        Ok(())
    }

    /// Only the registry may re-key a record, and only while it is detached from the tree.
    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }

    fn push_history(&mut self, category: &str) {
        if self.history.len() == HISTORY_CAPACITY {
            self.history.pop_front();
        }
        self.history.push_back(category.to_string());
    }
}

impl PlayerEntity for PlayerRecord {
    fn id(&self) -> &str {
        &self.id
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "id": self.id,
            "name": self.name,
            "score": self.score,
            "total_answered": self.total_answered,
            "category_stats": self.category_stats,
            "history": self.history,
        })
    }

    fn update_score(&mut self, category: &str, correct: bool) -> bool {
        let Some(hits) = self.category_stats.get_mut(category) else {
            return false;
        };
        if correct {
            *hits = hits.saturating_add(1);
            self.score = self.score.saturating_add(1);
        }
        self.total_answered = self.total_answered.saturating_add(1);
        self.push_history(category);
        true
    }
}

fn default_stats<S: AsRef<str>>(categories: &[S]) -> BTreeMap<String, u64> {
    categories
        .iter()
        .map(|c| (c.as_ref().to_string(), 0))
        .collect()
}
