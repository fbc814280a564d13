use crate::indicator::{IndicatorDef, IndicatorId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Decision categories shared by all rulesets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionCategory {
    Materials,
    Logistics,
    Workforce,
    Marketing,
    Finance,
    Expansion,
    Trade,
    Cultural,
    Environmental,
}

impl DecisionCategory {
    pub const ALL: [DecisionCategory; 9] = [
        DecisionCategory::Materials,
        DecisionCategory::Logistics,
        DecisionCategory::Workforce,
        DecisionCategory::Marketing,
        DecisionCategory::Finance,
        DecisionCategory::Expansion,
        DecisionCategory::Trade,
        DecisionCategory::Cultural,
        DecisionCategory::Environmental,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionCategory::Materials => "materials",
            DecisionCategory::Logistics => "logistics",
            DecisionCategory::Workforce => "workforce",
            DecisionCategory::Marketing => "marketing",
            DecisionCategory::Finance => "finance",
            DecisionCategory::Expansion => "expansion",
            DecisionCategory::Trade => "trade",
            DecisionCategory::Cultural => "cultural",
            DecisionCategory::Environmental => "environmental",
        }
    }

    /// Parse the snake_case wire name used in routes and content.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().find(|c| c.as_str() == s).copied()
    }
}

impl fmt::Display for DecisionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unique identifier for a scenario within its catalog.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ScenarioId(pub String);

impl ScenarioId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One selectable option within a scenario.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    /// Display text for the option.
    pub label: String,
    /// Signed indicator deltas applied when this option is chosen.
    #[serde(default)]
    pub consequences: BTreeMap<IndicatorId, f64>,
}

/// An immutable decision template.
///
/// Created at content-load time and never mutated afterwards. The
/// choice index is the resolution key, so choice order is significant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub id: ScenarioId,
    pub title: String,
    pub description: String,
    pub category: DecisionCategory,
    /// Ordered options.
    pub choices: Vec<Choice>,
    /// Optional difficulty tier (1 = introductory).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<u8>,
    /// Opaque educational payloads (historical facts, learning
    /// objectives); passed through to callers untouched.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<serde_json::Value>,
}

/// Named starting profile (an industry or a country) overriding
/// selected indicator baselines.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EntityArchetype {
    pub name: String,
    pub description: String,
    /// Baseline replacements keyed by indicator id.
    #[serde(default)]
    pub overrides: BTreeMap<IndicatorId, f64>,
}

/// Read-only catalog supplied by a content source.
///
/// Scenario selection walks `scenarios` in order, continuing across
/// phases and wrapping modulo its length; the content source owns that
/// ordering.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Catalog {
    /// Declared indicators; the only names consequences may reference.
    pub indicators: Vec<IndicatorDef>,
    /// Scenarios in selection order.
    pub scenarios: Vec<Scenario>,
    /// Optional starting archetypes.
    #[serde(default)]
    pub archetypes: Vec<EntityArchetype>,
}

impl Catalog {
    pub fn indicator(&self, id: &IndicatorId) -> Option<&IndicatorDef> {
        self.indicators.iter().find(|d| &d.id == id)
    }

    pub fn scenario(&self, id: &ScenarioId) -> Option<&Scenario> {
        self.scenarios.iter().find(|s| &s.id == id)
    }

    pub fn scenario_at(&self, index: usize) -> Option<&Scenario> {
        self.scenarios.get(index)
    }

    pub fn scenarios_in(&self, category: DecisionCategory) -> impl Iterator<Item = &Scenario> {
        self.scenarios.iter().filter(move |s| s.category == category)
    }

    pub fn archetype(&self, name: &str) -> Option<&EntityArchetype> {
        self.archetypes.iter().find(|a| a.name == name)
    }
}
