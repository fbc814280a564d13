use sim_core::{Catalog, CursorState, EngineError, PhasePlan, ScenarioId, SimulationCursor};

fn scenario_id_at(catalog: &Catalog, index: usize) -> ScenarioId {
    // catalogs are validated non-empty before any cursor exists
    catalog.scenarios[index % catalog.scenarios.len()].id.clone()
}

/// Cursor for a freshly created entity: the first catalog scenario is
/// pending, phase zero, nothing resolved yet.
pub fn initial_cursor(catalog: &Catalog) -> SimulationCursor {
    SimulationCursor {
        state: CursorState::AwaitingDecision {
            scenario: scenario_id_at(catalog, 0),
        },
        phase_index: 0,
        position_in_phase: 0,
        next_scenario_index: 1 % catalog.scenarios.len(),
    }
}

/// Move the cursor past a resolved decision.
///
/// Serves the next catalog scenario while the phase quota has room,
/// wrapping around catalog order when the quota outruns the catalog;
/// otherwise parks the cursor in `PhaseComplete` until an explicit
/// advance. Infallible: callers only invoke it after a decision
/// resolved for the pending scenario.
pub fn after_decision(
    cursor: &SimulationCursor,
    catalog: &Catalog,
    plan: &PhasePlan,
) -> SimulationCursor {
    let position = cursor.position_in_phase + 1;
    if position >= plan.scenarios_per_phase {
        return SimulationCursor {
            state: CursorState::PhaseComplete {
                phase: cursor.phase_index,
            },
            phase_index: cursor.phase_index,
            position_in_phase: position,
            next_scenario_index: cursor.next_scenario_index,
        };
    }
    SimulationCursor {
        state: CursorState::AwaitingDecision {
            scenario: scenario_id_at(catalog, cursor.next_scenario_index),
        },
        phase_index: cursor.phase_index,
        position_in_phase: position,
        next_scenario_index: (cursor.next_scenario_index + 1) % catalog.scenarios.len(),
    }
}

/// Explicit transition out of `PhaseComplete`.
///
/// Opens the next phase with a fresh quota, or ends the game when the
/// phase limit is reached. Rejected while a decision is still pending
/// and after the game has completed.
pub fn advance_phase(
    cursor: &SimulationCursor,
    catalog: &Catalog,
    plan: &PhasePlan,
) -> Result<SimulationCursor, EngineError> {
    match cursor.state {
        CursorState::AwaitingDecision { .. } => Err(EngineError::PhaseNotComplete),
        CursorState::GameComplete => Err(EngineError::GameAlreadyComplete),
        CursorState::PhaseComplete { .. } => {
            let next_phase = cursor.phase_index + 1;
            if next_phase >= plan.phase_limit {
                return Ok(SimulationCursor {
                    state: CursorState::GameComplete,
                    phase_index: cursor.phase_index,
                    position_in_phase: cursor.position_in_phase,
                    next_scenario_index: cursor.next_scenario_index,
                });
            }
            Ok(SimulationCursor {
                state: CursorState::AwaitingDecision {
                    scenario: scenario_id_at(catalog, cursor.next_scenario_index),
                },
                phase_index: next_phase,
                position_in_phase: 0,
                next_scenario_index: (cursor.next_scenario_index + 1) % catalog.scenarios.len(),
            })
        }
    }
}
