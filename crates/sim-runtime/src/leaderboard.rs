use serde::{Deserialize, Serialize};
use sim_core::PlayerId;

/// Read-only projection of one player for ranking. Derived from live
/// records on demand and never stored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub player_id: PlayerId,
    pub player_name: String,
    pub entity_name: String,
    pub level: u32,
    pub xp: u64,
    pub total_score: f64,
    pub total_decisions: u32,
    pub success_rate: f64,
    /// Current weighted-favorability digest of the entity metrics.
    pub standing: f64,
    pub achievement_count: usize,
    pub game_complete: bool,
    /// Service-assigned creation order, the final ranking tie-break.
    pub creation_seq: u64,
}

/// Order entries by total score descending, then XP descending, then
/// creation order ascending.
///
/// The chain is a total order over distinct entries, so ranking the
/// same set twice yields the same sequence. Scores are finite (they
/// accumulate values from `[0, 100]`), which keeps `total_cmp` in
/// agreement with ordinary comparison.
pub fn rank(mut entries: Vec<LeaderboardEntry>) -> Vec<LeaderboardEntry> {
    entries.sort_by(|a, b| {
        b.total_score
            .total_cmp(&a.total_score)
            .then_with(|| b.xp.cmp(&a.xp))
            .then_with(|| a.creation_seq.cmp(&b.creation_seq))
    });
    entries
}
