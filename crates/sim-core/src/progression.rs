use crate::scenario::{DecisionCategory, ScenarioId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for a player (and their entity).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub Uuid);

impl PlayerId {
    /// Mint a fresh random id.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for PlayerId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Per-player progression record.
///
/// Mutated only by the progression tracker after each resolved
/// decision. XP and level never decrease; the achievement list only
/// grows and preserves unlock order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerProgression {
    /// Cumulative experience points.
    pub xp: u64,
    /// Current level, recomputed from XP.
    pub level: u32,
    /// Sum of outcome scores across all decisions; the leaderboard's
    /// primary key.
    pub total_score: f64,
    pub total_decisions: u32,
    pub successful_decisions: u32,
    /// Consecutive successful decisions ending at the latest one.
    pub current_streak: u32,
    pub best_streak: u32,
    /// Unlocked achievement names in unlock order, no duplicates.
    pub achievements: Vec<String>,
    /// Decision counts per category (analytics).
    #[serde(default)]
    pub decisions_by_category: BTreeMap<DecisionCategory, u32>,
    /// XP earned per category (analytics).
    #[serde(default)]
    pub xp_by_category: BTreeMap<DecisionCategory, u64>,
}

impl PlayerProgression {
    pub fn new() -> Self {
        Self {
            xp: 0,
            level: 1,
            total_score: 0.0,
            total_decisions: 0,
            successful_decisions: 0,
            current_streak: 0,
            best_streak: 0,
            achievements: Vec::new(),
            decisions_by_category: BTreeMap::new(),
            xp_by_category: BTreeMap::new(),
        }
    }

    /// Record an achievement. Returns false when already unlocked.
    pub fn unlock(&mut self, name: &str) -> bool {
        if self.has_achievement(name) {
            return false;
        }
        self.achievements.push(name.to_string());
        true
    }

    pub fn has_achievement(&self, name: &str) -> bool {
        self.achievements.iter().any(|a| a == name)
    }

    pub fn decisions_in(&self, category: DecisionCategory) -> u32 {
        self.decisions_by_category
            .get(&category)
            .copied()
            .unwrap_or(0)
    }

    /// Fraction of decisions that met the success threshold, in [0, 1].
    pub fn success_rate(&self) -> f64 {
        if self.total_decisions == 0 {
            0.0
        } else {
            f64::from(self.successful_decisions) / f64::from(self.total_decisions)
        }
    }
}

impl Default for PlayerProgression {
    fn default() -> Self {
        Self::new()
    }
}

/// One resolved decision, journaled per player in resolution order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub scenario: ScenarioId,
    pub title: String,
    pub category: DecisionCategory,
    pub choice_index: usize,
    pub choice_label: String,
    pub outcome_score: f64,
    pub xp_gained: u64,
    /// Phase index in which the decision was taken.
    pub phase: u32,
    pub decided_at: DateTime<Utc>,
}
