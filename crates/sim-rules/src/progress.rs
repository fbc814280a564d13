use serde::{Deserialize, Serialize};
use sim_core::{AchievementCondition, DecisionCategory, PlayerProgression, ProgressionRules};
use tracing::debug;

/// What one resolved decision contributed to a player's progression.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgressionDelta {
    /// XP granted for this decision (floor plus score share).
    pub xp_gained: u64,
    /// True when the recomputed level exceeds the prior level.
    pub leveled_up: bool,
    /// Achievements unlocked by this decision, in rule order.
    pub new_achievements: Vec<String>,
}

/// XP granted for an outcome score.
///
/// Every decision yields at least `xp_floor`; the bonus grows with the
/// score at one point per `score_divisor` score points.
pub fn xp_for_score(rules: &ProgressionRules, outcome_score: f64) -> u64 {
    let bonus = (outcome_score.max(0.0) / rules.score_divisor).floor() as u64;
    rules.xp_floor + bonus
}

/// Fold one resolved decision into `progression`.
///
/// The level is recomputed fresh from cumulative XP rather than bumped
/// incrementally, so one large award can cross several thresholds at once.
/// Achievements are evaluated after the counters update and are permanent
/// once unlocked. Cannot fail; every input is a valid state transition.
pub fn apply_outcome(
    rules: &ProgressionRules,
    progression: &mut PlayerProgression,
    outcome_score: f64,
    category: DecisionCategory,
) -> ProgressionDelta {
    let xp_gained = xp_for_score(rules, outcome_score);
    progression.xp += xp_gained;
    progression.total_score += outcome_score;
    progression.total_decisions += 1;
    *progression
        .decisions_by_category
        .entry(category)
        .or_insert(0) += 1;
    *progression.xp_by_category.entry(category).or_insert(0) += xp_gained;

    if outcome_score >= rules.success_threshold {
        progression.successful_decisions += 1;
        progression.current_streak += 1;
        progression.best_streak = progression.best_streak.max(progression.current_streak);
    } else {
        progression.current_streak = 0;
    }

    let recomputed = rules.levels.level_for(progression.xp);
    let leveled_up = recomputed > progression.level;
    if leveled_up {
        debug!(from = progression.level, to = recomputed, "level up");
        progression.level = recomputed;
    }

    let mut new_achievements = Vec::new();
    for rule in &rules.achievements {
        if progression.has_achievement(&rule.name) {
            continue;
        }
        if condition_met(&rule.condition, progression) && progression.unlock(&rule.name) {
            debug!(name = %rule.name, "achievement unlocked");
            new_achievements.push(rule.name.clone());
        }
    }

    ProgressionDelta {
        xp_gained,
        leveled_up,
        new_achievements,
    }
}

fn condition_met(condition: &AchievementCondition, p: &PlayerProgression) -> bool {
    match *condition {
        AchievementCondition::TotalDecisions(n) => p.total_decisions >= n,
        AchievementCondition::SuccessfulDecisions(n) => p.successful_decisions >= n,
        AchievementCondition::CategoryDecisions { category, count } => {
            p.decisions_in(category) >= count
        }
        AchievementCondition::SuccessStreak(n) => p.current_streak >= n,
        AchievementCondition::LevelReached(n) => p.level >= n,
    }
}
