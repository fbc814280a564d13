//! Drives the built-in business ruleset from creation to completion
//! through the public service API only.

use content::{builtin, RulesetKind};
use sim_core::EngineError;
use sim_runtime::GameService;

fn best_choice(svc: &GameService, player: sim_core::PlayerId) -> usize {
    let state = svc.get_state(player).unwrap();
    let scenario = state.current_scenario.expect("scenario pending");
    let defs = &svc.catalog().indicators;
    (0..scenario.choices.len())
        .max_by(|&a, &b| {
            let score = |i: usize| {
                sim_rules::resolve(defs, &state.metrics, &scenario, i)
                    .map(|r| r.outcome_score)
                    .unwrap_or(0.0)
            };
            score(a).total_cmp(&score(b))
        })
        .unwrap_or(0)
}

#[test]
fn business_pack_plays_through_to_completion() {
    let pack = builtin(RulesetKind::BusinessEmpire).unwrap();
    let quota = pack.rules.phases.scenarios_per_phase;
    let phases = pack.rules.phases.phase_limit;
    let svc = GameService::new(pack.catalog, pack.rules).unwrap();

    let player = svc
        .create_entity("Avery", "Northwind Trading", None)
        .unwrap()
        .player_id;

    for phase in 0..phases {
        for _ in 0..quota {
            let choice = best_choice(&svc, player);
            let outcome = svc.submit_decision(player, choice).unwrap();
            assert!((0.0..=100.0).contains(&outcome.outcome_score));
        }
        let state = svc.advance_phase(player).unwrap();
        if phase + 1 == phases {
            assert!(state.game_complete);
        } else {
            assert_eq!(state.phase_index, phase + 1);
        }
    }

    let state = svc.get_state(player).unwrap();
    assert!(state.game_complete);
    assert_eq!(state.progression.total_decisions, quota * phases);
    assert!(state.progression.xp > 0);
    assert_eq!(
        svc.submit_decision(player, 0),
        Err(EngineError::GameAlreadyComplete)
    );

    let board = svc.leaderboard();
    assert_eq!(board.len(), 1);
    assert!(board[0].game_complete);
    assert_eq!(board[0].total_decisions, quota * phases);
}

#[test]
fn every_builtin_pack_loads_and_serves_players() {
    for kind in RulesetKind::ALL {
        let pack = builtin(kind).unwrap();
        let svc = GameService::new(pack.catalog, pack.rules).unwrap();
        let created = svc.create_entity("Avery", "Proving Grounds", None).unwrap();
        assert!(created.state.current_scenario.is_some());
        assert!(!created.state.metrics.is_empty());

        let outcome = svc.submit_decision(created.player_id, 0).unwrap();
        assert!(outcome.xp_gained > 0);
    }
}

#[test]
fn supply_pack_first_decision_moves_only_the_touched_metrics() {
    let pack = builtin(RulesetKind::SupplyChain).unwrap();
    let svc = GameService::new(pack.catalog, pack.rules).unwrap();
    let player = svc
        .create_entity("Avery", "Harbor Line", None)
        .unwrap()
        .player_id;

    // "Take the cheapest bid": +1000 profit, +5 pollution, rest untouched.
    let outcome = svc.submit_decision(player, 0).unwrap();
    let value = |name: &str| outcome.metrics.get(&sim_core::IndicatorId::new(name));
    assert_eq!(value("profit"), Some(1000.0));
    assert_eq!(value("pollution"), Some(5.0));
    assert_eq!(value("employee_treatment"), Some(50.0));
    assert_eq!(value("delivery_reliability"), Some(70.0));

    // xp floor 8 plus one point per ten score
    assert_eq!(
        outcome.xp_gained,
        8 + (outcome.outcome_score / 10.0).floor() as u64
    );
    assert!(outcome.new_achievements.contains(&"First Shipment".to_string()));
}
