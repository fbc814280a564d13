use sim_core::{
    Choice, EngineError, IndicatorDef, IndicatorRange, MetricSet, Polarity, Scenario,
};

/// Outcome of one resolved choice: the post-decision metric state and its
/// score in `[0, 100]`. The caller commits both.
#[derive(Clone, Debug)]
pub struct Resolution {
    pub metrics: MetricSet,
    pub outcome_score: f64,
}

/// Favorability of one indicator value, in `[0, 1]`.
///
/// Bounded indicators map linearly across their declared range. Open-ended
/// indicators saturate at their scoring scale, so a runaway value cannot
/// dominate the score. The polarity flag flips the result for indicators
/// where lower is better; nothing branches on indicator names.
pub fn favorability(def: &IndicatorDef, value: f64) -> f64 {
    let raw = match def.range {
        IndicatorRange::Bounded { min, max } => ((value - min) / (max - min)).clamp(0.0, 1.0),
        IndicatorRange::NonNegative { scale } => (value / scale).clamp(0.0, 1.0),
        IndicatorRange::Free { scale } => (0.5 + value / (2.0 * scale)).clamp(0.0, 1.0),
    };
    match def.polarity {
        Polarity::HigherIsBetter => raw,
        Polarity::LowerIsBetter => 1.0 - raw,
    }
}

/// Weight-averaged outcome score of a metric state, in `[0, 100]`.
///
/// Indicators absent from `metrics` contribute nothing. A catalog whose
/// weights sum to zero scores a neutral 50.
pub fn outcome_score(defs: &[IndicatorDef], metrics: &MetricSet) -> f64 {
    let mut weighted = 0.0;
    let mut total_weight = 0.0;
    for def in defs {
        let Some(value) = metrics.get(&def.id) else {
            continue;
        };
        weighted += def.weight * favorability(def, value);
        total_weight += def.weight;
    }
    if total_weight <= 0.0 {
        return 50.0;
    }
    (100.0 * weighted / total_weight).clamp(0.0, 100.0)
}

/// Apply one choice's consequences additively, then re-clamp every indicator
/// into its declared range. Indicators the choice does not mention keep
/// their value.
pub fn apply_choice(defs: &[IndicatorDef], metrics: &MetricSet, choice: &Choice) -> MetricSet {
    let mut next = metrics.clone();
    for (id, delta) in &choice.consequences {
        let current = next.get(id).unwrap_or(0.0);
        next.set(id.clone(), current + delta);
    }
    for def in defs {
        if let Some(value) = next.get(&def.id) {
            next.set(def.id.clone(), def.range.clamp(value));
        }
    }
    next
}

/// Resolve `choice_index` against `scenario`: validate the index, apply the
/// choice's consequences, and score the post-decision state.
///
/// Pure. Fails before touching anything when the index is out of bounds, so
/// an error never leaves partial state behind.
pub fn resolve(
    defs: &[IndicatorDef],
    metrics: &MetricSet,
    scenario: &Scenario,
    choice_index: usize,
) -> Result<Resolution, EngineError> {
    let choice =
        scenario
            .choices
            .get(choice_index)
            .ok_or_else(|| EngineError::InvalidChoiceIndex {
                scenario: scenario.id.clone(),
                index: choice_index,
                available: scenario.choices.len(),
            })?;
    let metrics = apply_choice(defs, metrics, choice);
    let outcome_score = outcome_score(defs, &metrics);
    Ok(Resolution {
        metrics,
        outcome_score,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use sim_core::{DecisionCategory, IndicatorId, ScenarioId};
    use std::collections::BTreeMap;

    fn def(id: &str, range: IndicatorRange, polarity: Polarity, baseline: f64) -> IndicatorDef {
        IndicatorDef {
            id: IndicatorId::new(id),
            label: id.to_string(),
            range,
            polarity,
            weight: 1.0,
            baseline,
        }
    }

    fn company_defs() -> Vec<IndicatorDef> {
        vec![
            def(
                "profit",
                IndicatorRange::Free { scale: 100_000.0 },
                Polarity::HigherIsBetter,
                0.0,
            ),
            def(
                "pollution",
                IndicatorRange::Bounded { min: 0.0, max: 100.0 },
                Polarity::LowerIsBetter,
                0.0,
            ),
            def(
                "employee_treatment",
                IndicatorRange::Bounded { min: 0.0, max: 100.0 },
                Polarity::HigherIsBetter,
                50.0,
            ),
        ]
    }

    fn scenario_with(consequences: Vec<(&str, f64)>) -> Scenario {
        Scenario {
            id: ScenarioId::new("sourcing"),
            title: "Raw material sourcing".to_string(),
            description: String::new(),
            category: DecisionCategory::Materials,
            choices: vec![Choice {
                label: "cheapest supplier".to_string(),
                consequences: consequences
                    .into_iter()
                    .map(|(k, v)| (IndicatorId::new(k), v))
                    .collect(),
            }],
            difficulty: None,
            annotations: vec![],
        }
    }

    #[test]
    fn consequences_apply_additively_and_leave_others_untouched() {
        let defs = company_defs();
        let metrics = MetricSet::from_defs(&defs);
        let scenario = scenario_with(vec![("profit", 1000.0), ("pollution", 5.0)]);

        let res = resolve(&defs, &metrics, &scenario, 0).unwrap();
        assert_eq!(res.metrics.get(&IndicatorId::new("profit")), Some(1000.0));
        assert_eq!(res.metrics.get(&IndicatorId::new("pollution")), Some(5.0));
        assert_eq!(
            res.metrics.get(&IndicatorId::new("employee_treatment")),
            Some(50.0)
        );
    }

    #[test]
    fn bounded_indicators_clamp_after_application() {
        let defs = company_defs();
        let metrics = MetricSet::from_defs(&defs);

        let over = scenario_with(vec![("pollution", 250.0)]);
        let res = resolve(&defs, &metrics, &over, 0).unwrap();
        assert_eq!(res.metrics.get(&IndicatorId::new("pollution")), Some(100.0));

        let under = scenario_with(vec![("employee_treatment", -80.0)]);
        let res = resolve(&defs, &metrics, &under, 0).unwrap();
        assert_eq!(
            res.metrics.get(&IndicatorId::new("employee_treatment")),
            Some(0.0)
        );
    }

    #[test]
    fn non_negative_indicators_floor_at_zero() {
        let defs = vec![def(
            "headcount",
            IndicatorRange::NonNegative { scale: 500.0 },
            Polarity::HigherIsBetter,
            20.0,
        )];
        let metrics = MetricSet::from_defs(&defs);
        let layoffs = scenario_with(vec![("headcount", -35.0)]);

        let res = resolve(&defs, &metrics, &layoffs, 0).unwrap();
        assert_eq!(res.metrics.get(&IndicatorId::new("headcount")), Some(0.0));
    }

    #[test]
    fn out_of_range_choice_index_is_rejected() {
        let defs = company_defs();
        let metrics = MetricSet::from_defs(&defs);
        let scenario = scenario_with(vec![("profit", 1000.0)]);

        let err = resolve(&defs, &metrics, &scenario, 3).unwrap_err();
        assert_eq!(
            err,
            EngineError::InvalidChoiceIndex {
                scenario: ScenarioId::new("sourcing"),
                index: 3,
                available: 1,
            }
        );
    }

    #[test]
    fn polarity_flips_scoring_without_naming_indicators() {
        let defs = company_defs();
        let clean = MetricSet::from_values(BTreeMap::from([
            (IndicatorId::new("profit"), 0.0),
            (IndicatorId::new("pollution"), 0.0),
            (IndicatorId::new("employee_treatment"), 50.0),
        ]));
        let dirty = MetricSet::from_values(BTreeMap::from([
            (IndicatorId::new("profit"), 0.0),
            (IndicatorId::new("pollution"), 90.0),
            (IndicatorId::new("employee_treatment"), 50.0),
        ]));
        assert!(outcome_score(&defs, &clean) > outcome_score(&defs, &dirty));
    }

    #[test]
    fn zero_weight_catalog_scores_neutral() {
        let mut defs = company_defs();
        for d in &mut defs {
            d.weight = 0.0;
        }
        let metrics = MetricSet::from_defs(&defs);
        assert_eq!(outcome_score(&defs, &metrics), 50.0);
    }

    #[test]
    fn free_indicators_saturate_at_scale() {
        let d = def(
            "profit",
            IndicatorRange::Free { scale: 1000.0 },
            Polarity::HigherIsBetter,
            0.0,
        );
        assert_eq!(favorability(&d, 0.0), 0.5);
        assert_eq!(favorability(&d, 1000.0), 1.0);
        assert_eq!(favorability(&d, 5_000_000.0), 1.0);
        assert_eq!(favorability(&d, -1000.0), 0.0);
    }

    proptest! {
        #[test]
        fn resolved_bounded_indicators_stay_in_range(
            start in 0.0f64..100.0,
            delta in -500.0f64..500.0,
        ) {
            let defs = vec![def(
                "share",
                IndicatorRange::Bounded { min: 0.0, max: 100.0 },
                Polarity::HigherIsBetter,
                start,
            )];
            let metrics = MetricSet::from_defs(&defs);
            let scenario = scenario_with(vec![("share", delta)]);
            let res = resolve(&defs, &metrics, &scenario, 0).unwrap();
            let v = res.metrics.get(&IndicatorId::new("share")).unwrap();
            prop_assert!((0.0..=100.0).contains(&v));
        }

        #[test]
        fn outcome_score_is_always_in_unit_band(
            profit in -1e9f64..1e9,
            pollution in 0.0f64..100.0,
        ) {
            let defs = company_defs();
            let metrics = MetricSet::from_values(BTreeMap::from([
                (IndicatorId::new("profit"), profit),
                (IndicatorId::new("pollution"), pollution),
                (IndicatorId::new("employee_treatment"), 50.0),
            ]));
            let score = outcome_score(&defs, &metrics);
            prop_assert!((0.0..=100.0).contains(&score));
        }

        #[test]
        fn favorability_is_monotone_in_value_for_higher_is_better(
            a in -2000.0f64..2000.0,
            bump in 0.0f64..500.0,
        ) {
            let d = def(
                "profit",
                IndicatorRange::Free { scale: 1000.0 },
                Polarity::HigherIsBetter,
                0.0,
            );
            prop_assert!(favorability(&d, a + bump) >= favorability(&d, a));
        }
    }
}
