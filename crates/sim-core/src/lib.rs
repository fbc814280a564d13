#![deny(warnings)]

//! Core domain models and invariants for Magnate.
//!
//! This crate defines the serializable types shared across the
//! simulation (indicators and metric sets, scenario catalogs, player
//! progression, the per-player cursor, and ruleset configuration)
//! together with validation helpers that guarantee basic invariants
//! before any content reaches the engine.

mod cursor;
mod error;
mod indicator;
mod progression;
mod rules;
mod scenario;
mod validate;

pub use cursor::{CursorState, SimulationCursor};
pub use error::EngineError;
pub use indicator::{IndicatorDef, IndicatorId, IndicatorRange, MetricSet, Polarity};
pub use progression::{DecisionRecord, PlayerId, PlayerProgression};
pub use rules::{
    AchievementCondition, AchievementRule, LevelCurve, PhasePlan, ProgressionRules, RulesetConfig,
};
pub use scenario::{Catalog, Choice, DecisionCategory, EntityArchetype, Scenario, ScenarioId};
pub use validate::{validate_catalog, validate_rules, ValidationError};
