use crate::progression::PlayerId;
use crate::scenario::ScenarioId;
use thiserror::Error;

/// Typed failures surfaced to the transport layer.
///
/// Every variant is detected before any mutation (check-then-act); a
/// failed call leaves metrics, progression, and cursor untouched. The
/// engine performs no retries; nothing here is transient.
#[derive(Debug, Error, PartialEq)]
pub enum EngineError {
    /// Choice index outside the pending scenario's option list.
    #[error("choice index {index} is out of range for scenario {scenario} with {available} choices")]
    InvalidChoiceIndex {
        scenario: ScenarioId,
        index: usize,
        available: usize,
    },
    /// Decision submitted while the phase is complete and no scenario
    /// is pending.
    #[error("no scenario is pending; advance the phase first")]
    NoCurrentScenario,
    /// Operation addressed to a player id this service has never seen.
    #[error("unknown player {0}")]
    UnknownPlayer(PlayerId),
    /// Mutating call after the game reached its terminal state.
    #[error("the game is already complete")]
    GameAlreadyComplete,
    /// Phase advance requested while a scenario is still pending.
    #[error("a decision is still pending for the current scenario")]
    PhaseNotComplete,
    /// Entity creation referenced an archetype the catalog does not
    /// declare.
    #[error("unknown archetype {0:?}")]
    UnknownArchetype(String),
    /// Player or entity name was empty after trimming.
    #[error("player and entity names must not be empty")]
    EmptyName,
}
