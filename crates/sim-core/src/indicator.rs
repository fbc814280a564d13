use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Unique identifier for a tracked indicator, e.g. "profit", "pollution".
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct IndicatorId(pub String);

impl IndicatorId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IndicatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Whether higher or lower values of an indicator count as favorable.
///
/// Scoring and ranking consume this flag uniformly; nothing in the
/// engine branches on indicator names.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    /// Larger values score better (profit, reputation).
    HigherIsBetter,
    /// Smaller values score better (pollution, acquisition cost).
    LowerIsBetter,
}

/// Valid range and scoring scale of an indicator.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorRange {
    /// Clamped into `[min, max]` after every applied delta (percentages
    /// and other closed scales).
    Bounded { min: f64, max: f64 },
    /// Clamped at zero below, open above (headcount, capacity).
    /// `scale` is the magnitude at which the indicator saturates its
    /// scoring contribution.
    NonNegative { scale: f64 },
    /// Unclamped in both directions (cash, cumulative profit); scoring
    /// saturates at plus or minus `scale`.
    Free { scale: f64 },
}

impl IndicatorRange {
    /// Clamp `value` into this range. `Free` values pass through.
    pub fn clamp(&self, value: f64) -> f64 {
        match *self {
            IndicatorRange::Bounded { min, max } => value.clamp(min, max),
            IndicatorRange::NonNegative { .. } => value.max(0.0),
            IndicatorRange::Free { .. } => value,
        }
    }

    /// True when `value` already lies within the range.
    pub fn contains(&self, value: f64) -> bool {
        self.clamp(value) == value
    }
}

/// Declaration of one tracked indicator.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IndicatorDef {
    /// Identifier, unique within a catalog.
    pub id: IndicatorId,
    /// Human-readable label for presentation layers.
    pub label: String,
    /// Valid range, re-applied after every consequence.
    pub range: IndicatorRange,
    /// Scoring polarity.
    pub polarity: Polarity,
    /// Relative weight in outcome scoring; 0 excludes the indicator.
    pub weight: f64,
    /// Starting value for new entities, before archetype overrides.
    pub baseline: f64,
}

/// A bundle of indicator values owned by one entity.
///
/// Keyed by indicator id; mutated only through the consequence
/// resolver. Presentation layers read cloned snapshots.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricSet {
    values: BTreeMap<IndicatorId, f64>,
}

impl MetricSet {
    /// Build a metric set from catalog baselines, clamped into range.
    pub fn from_defs(defs: &[IndicatorDef]) -> Self {
        let values = defs
            .iter()
            .map(|d| (d.id.clone(), d.range.clamp(d.baseline)))
            .collect();
        Self { values }
    }

    /// Build a metric set from raw values (snapshot restore, tests).
    pub fn from_values(values: BTreeMap<IndicatorId, f64>) -> Self {
        Self { values }
    }

    pub fn get(&self, id: &IndicatorId) -> Option<f64> {
        self.values.get(id).copied()
    }

    /// Overwrite one indicator value. Reserved for the resolver and for
    /// archetype initialization; presentation code must not call this.
    pub fn set(&mut self, id: IndicatorId, value: f64) {
        self.values.insert(id, value);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&IndicatorId, f64)> {
        self.values.iter().map(|(id, v)| (id, *v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
