//! Leaderboard ranking derived from the registry's in-order traversal.

use crate::models::{PlayerRecord, PlayerRegistry};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One leaderboard row (for API / display).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub name: String,
    pub score: u64,
    pub answered: u64,
    pub category_stats: BTreeMap<String, u64>,
}

impl RankingEntry {
    pub fn from_player(p: &PlayerRecord) -> Self {
        Self {
            name: p.name().to_string(),
            score: p.score(),
            answered: p.total_answered(),
            category_stats: p.category_stats().clone(),
        }
    }
}

impl PlayerRegistry {
    /// Players by score (descending), then name (ascending, ignoring case).
    ///
    /// The sort is stable over the in-order sequence, so names that compare equal ignoring
    /// case ("Ana", "ana") keep ascending storage order.
    pub fn ranking(&self) -> Vec<RankingEntry> {
        let mut players: Vec<(String, &PlayerRecord)> =
            self.iter().map(|p| (p.name().to_lowercase(), p)).collect();
        players.sort_by(|(a_key, a), (b_key, b)| {
            b.score().cmp(&a.score()).then_with(|| a_key.cmp(b_key))
        });
        players
            .into_iter()
            .map(|(_, p)| RankingEntry::from_player(p))
            .collect()
    }
}
