use crate::indicator::{IndicatorId, IndicatorRange};
use crate::rules::{AchievementCondition, LevelCurve, RulesetConfig};
use crate::scenario::{Catalog, ScenarioId};
use std::collections::BTreeSet;
use thiserror::Error;

/// Validation failures for catalogs and ruleset configuration.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// Catalog declares no scenarios to sequence.
    #[error("catalog declares no scenarios")]
    EmptyCatalog,
    /// Catalog declares no indicators to track.
    #[error("catalog declares no indicators")]
    NoIndicators,
    /// Indicator id used twice.
    #[error("duplicate indicator id: {0}")]
    DuplicateIndicator(IndicatorId),
    /// Scenario id used twice.
    #[error("duplicate scenario id: {0}")]
    DuplicateScenario(ScenarioId),
    /// Archetype name used twice.
    #[error("duplicate archetype name: {0}")]
    DuplicateArchetype(String),
    /// Scenario has an empty choice list.
    #[error("scenario {0} has no choices")]
    NoChoices(ScenarioId),
    /// Consequence references an indicator the catalog never declares.
    #[error("scenario {scenario} references undeclared indicator {indicator}")]
    UnknownIndicator {
        scenario: ScenarioId,
        indicator: IndicatorId,
    },
    /// Archetype override references an undeclared indicator.
    #[error("archetype {archetype:?} references undeclared indicator {indicator}")]
    ArchetypeUnknownIndicator {
        archetype: String,
        indicator: IndicatorId,
    },
    /// Bounded range with min >= max, or non-finite bound.
    #[error("indicator {0} declares an empty or non-finite range")]
    InvalidBounds(IndicatorId),
    /// Scoring scale must be positive and finite.
    #[error("indicator {0} declares a non-positive scoring scale")]
    InvalidScale(IndicatorId),
    /// Weights must be finite and non-negative.
    #[error("indicator {0} declares a negative or non-finite weight")]
    InvalidWeight(IndicatorId),
    /// Some numeric field was NaN or infinite.
    #[error("non-finite numeric value in {0}")]
    NonFinite(String),
    /// Phase plan must schedule at least one scenario and one phase.
    #[error("phase plan must schedule at least one scenario and one phase")]
    InvalidPhasePlan,
    /// Level curve grants no progress (zero step or empty table) or is
    /// not strictly increasing.
    #[error("level curve must be strictly increasing and grant progress")]
    InvalidLevelCurve,
    /// Success threshold outside [0, 100].
    #[error("success threshold must lie within [0, 100]")]
    InvalidSuccessThreshold,
    /// XP policy needs a positive, finite score divisor.
    #[error("xp policy must use a positive score divisor")]
    InvalidXpPolicy,
    /// Achievement rule with a zero target is never meaningful.
    #[error("achievement {0:?} requires a positive target")]
    InvalidAchievement(String),
    /// Achievement name used twice.
    #[error("duplicate achievement name: {0:?}")]
    DuplicateAchievement(String),
}

/// Validate a catalog, including cross-references from consequences and
/// archetype overrides back to declared indicators.
pub fn validate_catalog(catalog: &Catalog) -> Result<(), ValidationError> {
    if catalog.indicators.is_empty() {
        return Err(ValidationError::NoIndicators);
    }
    if catalog.scenarios.is_empty() {
        return Err(ValidationError::EmptyCatalog);
    }

    let mut ids: BTreeSet<&IndicatorId> = BTreeSet::new();
    for def in &catalog.indicators {
        if !ids.insert(&def.id) {
            return Err(ValidationError::DuplicateIndicator(def.id.clone()));
        }
        match def.range {
            IndicatorRange::Bounded { min, max } => {
                if !(min.is_finite() && max.is_finite()) || min >= max {
                    return Err(ValidationError::InvalidBounds(def.id.clone()));
                }
            }
            IndicatorRange::NonNegative { scale } | IndicatorRange::Free { scale } => {
                if !scale.is_finite() || scale <= 0.0 {
                    return Err(ValidationError::InvalidScale(def.id.clone()));
                }
            }
        }
        if !def.weight.is_finite() || def.weight < 0.0 {
            return Err(ValidationError::InvalidWeight(def.id.clone()));
        }
        if !def.baseline.is_finite() {
            return Err(ValidationError::NonFinite(format!(
                "indicator {} baseline",
                def.id
            )));
        }
    }

    let mut scenario_ids: BTreeSet<&ScenarioId> = BTreeSet::new();
    for scenario in &catalog.scenarios {
        if !scenario_ids.insert(&scenario.id) {
            return Err(ValidationError::DuplicateScenario(scenario.id.clone()));
        }
        if scenario.choices.is_empty() {
            return Err(ValidationError::NoChoices(scenario.id.clone()));
        }
        for choice in &scenario.choices {
            for (indicator, delta) in &choice.consequences {
                if !ids.contains(indicator) {
                    return Err(ValidationError::UnknownIndicator {
                        scenario: scenario.id.clone(),
                        indicator: indicator.clone(),
                    });
                }
                if !delta.is_finite() {
                    return Err(ValidationError::NonFinite(format!(
                        "scenario {} consequence {}",
                        scenario.id, indicator
                    )));
                }
            }
        }
    }

    let mut archetype_names: BTreeSet<&str> = BTreeSet::new();
    for archetype in &catalog.archetypes {
        if !archetype_names.insert(archetype.name.as_str()) {
            return Err(ValidationError::DuplicateArchetype(archetype.name.clone()));
        }
        for (indicator, value) in &archetype.overrides {
            if !ids.contains(indicator) {
                return Err(ValidationError::ArchetypeUnknownIndicator {
                    archetype: archetype.name.clone(),
                    indicator: indicator.clone(),
                });
            }
            if !value.is_finite() {
                return Err(ValidationError::NonFinite(format!(
                    "archetype {} override {}",
                    archetype.name, indicator
                )));
            }
        }
    }

    Ok(())
}

/// Validate a ruleset configuration.
pub fn validate_rules(rules: &RulesetConfig) -> Result<(), ValidationError> {
    if rules.phases.scenarios_per_phase == 0 || rules.phases.phase_limit == 0 {
        return Err(ValidationError::InvalidPhasePlan);
    }

    let p = &rules.progression;
    if !p.score_divisor.is_finite() || p.score_divisor <= 0.0 {
        return Err(ValidationError::InvalidXpPolicy);
    }
    if !p.success_threshold.is_finite() || !(0.0..=100.0).contains(&p.success_threshold) {
        return Err(ValidationError::InvalidSuccessThreshold);
    }
    match &p.levels {
        LevelCurve::Linear { xp_per_level } => {
            if *xp_per_level == 0 {
                return Err(ValidationError::InvalidLevelCurve);
            }
        }
        LevelCurve::Thresholds { cumulative } => {
            if cumulative.is_empty() || cumulative.windows(2).any(|w| w[0] >= w[1]) {
                return Err(ValidationError::InvalidLevelCurve);
            }
        }
    }

    let mut names: BTreeSet<&str> = BTreeSet::new();
    for rule in &p.achievements {
        if !names.insert(rule.name.as_str()) {
            return Err(ValidationError::DuplicateAchievement(rule.name.clone()));
        }
        let target = match rule.condition {
            AchievementCondition::TotalDecisions(n)
            | AchievementCondition::SuccessfulDecisions(n)
            | AchievementCondition::SuccessStreak(n)
            | AchievementCondition::LevelReached(n) => n,
            AchievementCondition::CategoryDecisions { count, .. } => count,
        };
        if target == 0 {
            return Err(ValidationError::InvalidAchievement(rule.name.clone()));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicator::{IndicatorDef, Polarity};
    use crate::rules::{AchievementRule, PhasePlan, ProgressionRules};
    use crate::scenario::{Choice, DecisionCategory, EntityArchetype, Scenario};
    use std::collections::BTreeMap;

    fn indicator(id: &str) -> IndicatorDef {
        IndicatorDef {
            id: IndicatorId::new(id),
            label: id.to_string(),
            range: IndicatorRange::Bounded { min: 0.0, max: 100.0 },
            polarity: Polarity::HigherIsBetter,
            weight: 1.0,
            baseline: 50.0,
        }
    }

    fn scenario(id: &str, consequence: (&str, f64)) -> Scenario {
        Scenario {
            id: ScenarioId::new(id),
            title: id.to_string(),
            description: String::new(),
            category: DecisionCategory::Finance,
            choices: vec![Choice {
                label: "only option".to_string(),
                consequences: BTreeMap::from([(IndicatorId::new(consequence.0), consequence.1)]),
            }],
            difficulty: None,
            annotations: vec![],
        }
    }

    fn catalog() -> Catalog {
        Catalog {
            indicators: vec![indicator("reputation")],
            scenarios: vec![scenario("s1", ("reputation", 5.0))],
            archetypes: vec![],
        }
    }

    fn rules() -> RulesetConfig {
        RulesetConfig {
            name: "test".to_string(),
            phases: PhasePlan {
                scenarios_per_phase: 3,
                phase_limit: 2,
            },
            progression: ProgressionRules {
                xp_floor: 10,
                score_divisor: 10.0,
                success_threshold: 60.0,
                levels: LevelCurve::Linear { xp_per_level: 100 },
                achievements: vec![],
            },
        }
    }

    #[test]
    fn valid_catalog_and_rules_pass() {
        validate_catalog(&catalog()).unwrap();
        validate_rules(&rules()).unwrap();
    }

    #[test]
    fn empty_collections_are_rejected() {
        let mut cat = catalog();
        cat.scenarios.clear();
        assert_eq!(validate_catalog(&cat), Err(ValidationError::EmptyCatalog));

        let mut cat = catalog();
        cat.indicators.clear();
        assert_eq!(validate_catalog(&cat), Err(ValidationError::NoIndicators));
    }

    #[test]
    fn undeclared_consequence_indicator_is_rejected() {
        let mut cat = catalog();
        cat.scenarios = vec![scenario("s1", ("karma", 1.0))];
        assert_eq!(
            validate_catalog(&cat),
            Err(ValidationError::UnknownIndicator {
                scenario: ScenarioId::new("s1"),
                indicator: IndicatorId::new("karma"),
            })
        );
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut cat = catalog();
        cat.indicators.push(indicator("reputation"));
        assert_eq!(
            validate_catalog(&cat),
            Err(ValidationError::DuplicateIndicator(IndicatorId::new(
                "reputation"
            )))
        );

        let mut cat = catalog();
        cat.scenarios.push(scenario("s1", ("reputation", 1.0)));
        assert!(matches!(
            validate_catalog(&cat),
            Err(ValidationError::DuplicateScenario(_))
        ));
    }

    #[test]
    fn inverted_bounds_and_bad_scales_are_rejected() {
        let mut cat = catalog();
        cat.indicators[0].range = IndicatorRange::Bounded { min: 10.0, max: 10.0 };
        assert!(matches!(
            validate_catalog(&cat),
            Err(ValidationError::InvalidBounds(_))
        ));

        let mut cat = catalog();
        cat.indicators[0].range = IndicatorRange::Free { scale: 0.0 };
        assert!(matches!(
            validate_catalog(&cat),
            Err(ValidationError::InvalidScale(_))
        ));

        let mut cat = catalog();
        cat.indicators[0].weight = f64::NAN;
        assert!(matches!(
            validate_catalog(&cat),
            Err(ValidationError::InvalidWeight(_))
        ));
    }

    #[test]
    fn archetype_overrides_must_reference_declared_indicators() {
        let mut cat = catalog();
        cat.archetypes = vec![EntityArchetype {
            name: "Technology".to_string(),
            description: String::new(),
            overrides: BTreeMap::from([(IndicatorId::new("karma"), 1.0)]),
        }];
        assert!(matches!(
            validate_catalog(&cat),
            Err(ValidationError::ArchetypeUnknownIndicator { .. })
        ));
    }

    #[test]
    fn degenerate_phase_plans_and_curves_are_rejected() {
        let mut r = rules();
        r.phases.phase_limit = 0;
        assert_eq!(validate_rules(&r), Err(ValidationError::InvalidPhasePlan));

        let mut r = rules();
        r.progression.levels = LevelCurve::Thresholds { cumulative: vec![] };
        assert_eq!(validate_rules(&r), Err(ValidationError::InvalidLevelCurve));

        let mut r = rules();
        r.progression.levels = LevelCurve::Thresholds {
            cumulative: vec![100, 100],
        };
        assert_eq!(validate_rules(&r), Err(ValidationError::InvalidLevelCurve));

        let mut r = rules();
        r.progression.score_divisor = -1.0;
        assert_eq!(validate_rules(&r), Err(ValidationError::InvalidXpPolicy));

        let mut r = rules();
        r.progression.success_threshold = 250.0;
        assert_eq!(
            validate_rules(&r),
            Err(ValidationError::InvalidSuccessThreshold)
        );
    }

    #[test]
    fn achievement_rules_need_positive_targets_and_unique_names() {
        let mut r = rules();
        r.progression.achievements = vec![AchievementRule {
            name: "Hollow".to_string(),
            condition: AchievementCondition::TotalDecisions(0),
        }];
        assert!(matches!(
            validate_rules(&r),
            Err(ValidationError::InvalidAchievement(_))
        ));

        let mut r = rules();
        r.progression.achievements = vec![
            AchievementRule {
                name: "Rookie".to_string(),
                condition: AchievementCondition::TotalDecisions(10),
            },
            AchievementRule {
                name: "Rookie".to_string(),
                condition: AchievementCondition::SuccessStreak(3),
            },
        ];
        assert!(matches!(
            validate_rules(&r),
            Err(ValidationError::DuplicateAchievement(_))
        ));
    }
}
