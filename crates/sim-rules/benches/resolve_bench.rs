use criterion::{criterion_group, criterion_main, Criterion};
use sim_core::{
    Choice, DecisionCategory, IndicatorDef, IndicatorId, IndicatorRange, MetricSet, Polarity,
    Scenario, ScenarioId,
};
use std::collections::BTreeMap;

fn fixture() -> (Vec<IndicatorDef>, MetricSet, Scenario) {
    let defs: Vec<IndicatorDef> = [
        ("profit", IndicatorRange::Free { scale: 100_000.0 }, Polarity::HigherIsBetter),
        ("reputation", IndicatorRange::Bounded { min: 0.0, max: 100.0 }, Polarity::HigherIsBetter),
        ("pollution", IndicatorRange::Bounded { min: 0.0, max: 100.0 }, Polarity::LowerIsBetter),
        ("headcount", IndicatorRange::NonNegative { scale: 500.0 }, Polarity::HigherIsBetter),
        ("efficiency", IndicatorRange::Bounded { min: 0.0, max: 100.0 }, Polarity::HigherIsBetter),
        ("market_share", IndicatorRange::Bounded { min: 0.0, max: 100.0 }, Polarity::HigherIsBetter),
    ]
    .into_iter()
    .map(|(id, range, polarity)| IndicatorDef {
        id: IndicatorId::new(id),
        label: id.to_string(),
        range,
        polarity,
        weight: 1.0,
        baseline: 50.0,
    })
    .collect();

    let metrics = MetricSet::from_defs(&defs);
    let scenario = Scenario {
        id: ScenarioId::new("expansion-offer"),
        title: "Expansion offer".to_string(),
        description: String::new(),
        category: DecisionCategory::Expansion,
        choices: (0..4)
            .map(|i| Choice {
                label: format!("option {i}"),
                consequences: BTreeMap::from([
                    (IndicatorId::new("profit"), 1500.0 * i as f64),
                    (IndicatorId::new("pollution"), 2.0 * i as f64),
                    (IndicatorId::new("reputation"), -1.0 * i as f64),
                ]),
            })
            .collect(),
        difficulty: None,
        annotations: vec![],
    };
    (defs, metrics, scenario)
}

fn bench_resolve(c: &mut Criterion) {
    let (defs, metrics, scenario) = fixture();
    c.bench_function("resolve_choice", |b| {
        b.iter(|| {
            let _ = sim_rules::resolve(&defs, &metrics, &scenario, 2);
        })
    });
}

criterion_group!(benches, bench_resolve);
criterion_main!(benches);
