use crate::scenario::ScenarioId;
use serde::{Deserialize, Serialize};

/// Where a player sits in the decision sequence.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CursorState {
    /// A scenario is pending; exactly one decision is accepted.
    AwaitingDecision { scenario: ScenarioId },
    /// The phase's scenario quota is exhausted; an explicit advance is
    /// required before further decisions.
    PhaseComplete { phase: u32 },
    /// Terminal. No further decisions or advances are accepted.
    GameComplete,
}

/// Mutable per-player pointer into the scenario sequence.
///
/// Invariant: at most one scenario is pending at any time, and the
/// cursor only moves past it once a decision has been resolved for it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationCursor {
    pub state: CursorState,
    /// Zero-based phase ("year") index.
    pub phase_index: u32,
    /// Decisions resolved so far within the current phase.
    pub position_in_phase: u32,
    /// Next index into the catalog's scenario order.
    pub next_scenario_index: usize,
}

impl SimulationCursor {
    pub fn pending_scenario(&self) -> Option<&ScenarioId> {
        match &self.state {
            CursorState::AwaitingDecision { scenario } => Some(scenario),
            _ => None,
        }
    }

    pub fn is_awaiting(&self) -> bool {
        matches!(self.state, CursorState::AwaitingDecision { .. })
    }

    pub fn is_phase_complete(&self) -> bool {
        matches!(self.state, CursorState::PhaseComplete { .. })
    }

    pub fn is_game_complete(&self) -> bool {
        matches!(self.state, CursorState::GameComplete)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_predicates_are_exclusive() {
        let awaiting = SimulationCursor {
            state: CursorState::AwaitingDecision {
                scenario: ScenarioId::new("sourcing"),
            },
            phase_index: 0,
            position_in_phase: 0,
            next_scenario_index: 0,
        };
        assert!(awaiting.is_awaiting());
        assert!(!awaiting.is_phase_complete());
        assert!(!awaiting.is_game_complete());
        assert_eq!(
            awaiting.pending_scenario(),
            Some(&ScenarioId::new("sourcing"))
        );

        let done = SimulationCursor {
            state: CursorState::GameComplete,
            phase_index: 5,
            position_in_phase: 0,
            next_scenario_index: 3,
        };
        assert!(done.is_game_complete());
        assert_eq!(done.pending_scenario(), None);
    }

    #[test]
    fn serde_tags_cursor_states() {
        let s = serde_json::to_string(&CursorState::PhaseComplete { phase: 2 }).unwrap();
        assert_eq!(s, r#"{"state":"phase_complete","phase":2}"#);
        let s = serde_json::to_string(&CursorState::GameComplete).unwrap();
        assert_eq!(s, r#"{"state":"game_complete"}"#);
        let back: CursorState =
            serde_json::from_str(r#"{"state":"awaiting_decision","scenario":"sourcing"}"#).unwrap();
        assert_eq!(
            back,
            CursorState::AwaitingDecision {
                scenario: ScenarioId::new("sourcing")
            }
        );
    }
}
