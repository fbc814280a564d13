use crate::scenario::DecisionCategory;
use serde::{Deserialize, Serialize};

/// Phase structure of a ruleset: how many decisions make a phase and
/// how many phases make a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhasePlan {
    /// Decisions that exhaust one phase ("year").
    pub scenarios_per_phase: u32,
    /// Phases after which the game completes.
    pub phase_limit: u32,
}

/// Level as a function of cumulative XP.
///
/// Level is always recomputed fresh from total XP, so one large gain
/// may cross several thresholds at once.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelCurve {
    /// `level = 1 + xp / xp_per_level`.
    Linear { xp_per_level: u64 },
    /// Explicit cumulative XP thresholds; reaching `cumulative[i]`
    /// grants level `i + 2`. Must be strictly increasing.
    Thresholds { cumulative: Vec<u64> },
}

impl LevelCurve {
    /// Level for a cumulative XP total. Level 1 is the floor.
    pub fn level_for(&self, xp: u64) -> u32 {
        match self {
            LevelCurve::Linear { xp_per_level } => {
                if *xp_per_level == 0 {
                    1
                } else {
                    1 + (xp / xp_per_level) as u32
                }
            }
            LevelCurve::Thresholds { cumulative } => {
                1 + cumulative.iter().filter(|t| xp >= **t).count() as u32
            }
        }
    }
}

/// Pure predicate over progression counters. No randomness, no clocks.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementCondition {
    /// Total resolved decisions reached this count.
    TotalDecisions(u32),
    /// Successful decisions reached this count.
    SuccessfulDecisions(u32),
    /// Decisions within one category reached this count.
    CategoryDecisions {
        category: DecisionCategory,
        count: u32,
    },
    /// Consecutive successful decisions reached this length.
    SuccessStreak(u32),
    /// Player level reached this value.
    LevelReached(u32),
}

/// A named achievement and its unlock condition. Once unlocked it is
/// permanent; the rule is never re-evaluated for that player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementRule {
    pub name: String,
    pub condition: AchievementCondition,
}

/// XP, leveling, and achievement policy for one ruleset.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProgressionRules {
    /// Minimum XP granted by any decision.
    pub xp_floor: u64,
    /// Outcome-score points per bonus XP point:
    /// `xp = xp_floor + floor(score / score_divisor)`.
    pub score_divisor: f64,
    /// Outcome score at or above which a decision counts as successful.
    pub success_threshold: f64,
    pub levels: LevelCurve,
    #[serde(default)]
    pub achievements: Vec<AchievementRule>,
}

/// Complete per-variant configuration. Each content pack carries its
/// own copy; nothing here is a global constant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RulesetConfig {
    /// Stable ruleset name, e.g. "business_empire".
    pub name: String,
    pub phases: PhasePlan,
    pub progression: ProgressionRules,
}
