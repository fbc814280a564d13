#![deny(warnings)]

//! Headless bot runner: plays automated players through a ruleset and
//! prints the resulting leaderboard. Useful for balancing content
//! packs without a frontend.

use anyhow::{bail, Context, Result};
use content::RulesetKind;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sim_core::PlayerId;
use sim_runtime::GameService;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, PartialEq)]
enum Policy {
    /// Pick the choice with the best immediate outcome score.
    Greedy,
    /// Pick uniformly among the scenario's choices.
    Random,
}

impl Policy {
    fn as_str(&self) -> &'static str {
        match self {
            Policy::Greedy => "greedy",
            Policy::Random => "random",
        }
    }
}

struct Args {
    ruleset: RulesetKind,
    pack_path: Option<String>,
    players: u32,
    policy: Policy,
    seed: u64,
    export: Option<String>,
}

fn print_usage() {
    println!("magnate-cli {} ({})", env!("CARGO_PKG_VERSION"), env!("GIT_SHA"));
    println!("usage: cli [options]");
    println!("  --ruleset <key>    built-in pack to play (default business_empire)");
    println!("  --pack <path>      load a pack from a JSON file instead");
    println!("  --players <n>      number of bot players (default 4)");
    println!("  --policy <name>    greedy | random (default greedy)");
    println!("  --seed <n>         RNG seed for the random policy (default 42)");
    println!("  --export <path>    write a save file when the run finishes");
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        ruleset: RulesetKind::BusinessEmpire,
        pack_path: None,
        players: 4,
        policy: Policy::Greedy,
        seed: 42,
        export: None,
    };
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--ruleset" => {
                let key = it.next().context("--ruleset needs a value")?;
                args.ruleset = RulesetKind::parse(&key)
                    .with_context(|| format!("unknown ruleset {key:?}"))?;
            }
            "--pack" => args.pack_path = it.next(),
            "--players" => {
                args.players = it
                    .next()
                    .and_then(|s| s.parse().ok())
                    .context("--players needs a number")?;
            }
            "--policy" => {
                args.policy = match it.next().as_deref() {
                    Some("greedy") => Policy::Greedy,
                    Some("random") => Policy::Random,
                    other => bail!("unknown policy {other:?}"),
                };
            }
            "--seed" => {
                args.seed = it
                    .next()
                    .and_then(|s| s.parse().ok())
                    .context("--seed needs a number")?;
            }
            "--export" => args.export = it.next(),
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other => bail!("unknown argument {other:?}; try --help"),
        }
    }
    Ok(args)
}

fn pick_choice(svc: &GameService, player: PlayerId, policy: Policy, rng: &mut ChaCha8Rng) -> usize {
    let state = match svc.get_state(player) {
        Ok(state) => state,
        Err(_) => return 0,
    };
    let Some(scenario) = state.current_scenario else {
        return 0;
    };
    match policy {
        Policy::Random => rng.gen_range(0..scenario.choices.len()),
        Policy::Greedy => {
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
    }
}

fn play_full_game(
    svc: &GameService,
    player: PlayerId,
    policy: Policy,
    rng: &mut ChaCha8Rng,
) -> Result<()> {
    loop {
        let state = svc.get_state(player)?;
        if state.game_complete {
            return Ok(());
        }
        if state.phase_complete {
            svc.advance_phase(player)?;
            continue;
        }
        let choice = pick_choice(svc, player, policy, rng);
        svc.submit_decision(player, choice)?;
    }
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = parse_args()?;
    let pack = match &args.pack_path {
        Some(path) => content::load_from_path(path)
            .with_context(|| format!("loading pack from {path}"))?,
        None => content::builtin(args.ruleset)?,
    };
    let title = pack.title.clone();
    let ruleset_name = pack.rules.name.clone();
    let svc = GameService::new(pack.catalog, pack.rules)?;
    info!(ruleset = %ruleset_name, players = args.players, policy = args.policy.as_str(), "starting bots");

    let archetype_names: Vec<String> = svc
        .catalog()
        .archetypes
        .iter()
        .map(|a| a.name.clone())
        .collect();
    for i in 0..args.players {
        let mut rng = ChaCha8Rng::seed_from_u64(args.seed.wrapping_add(u64::from(i)));
        let player_name = format!("Bot {:02}", i + 1);
        let entity_name = format!("Venture {:02}", i + 1);
        let archetype = if archetype_names.is_empty() {
            None
        } else {
            Some(archetype_names[i as usize % archetype_names.len()].as_str())
        };
        let created = svc.create_entity(&player_name, &entity_name, archetype)?;
        play_full_game(&svc, created.player_id, args.policy, &mut rng)?;
    }

    println!(
        "{title} | ruleset: {ruleset_name} | players: {} | policy: {} | seed: {}",
        args.players,
        args.policy.as_str(),
        args.seed
    );
    println!(
        "{:<5} {:<10} {:<14} {:>5} {:>7} {:>9} {:>8} {:>7}",
        "rank", "player", "entity", "level", "xp", "score", "success", "badges"
    );
    for (i, entry) in svc.leaderboard().iter().enumerate() {
        println!(
            "{:<5} {:<10} {:<14} {:>5} {:>7} {:>9.1} {:>7.0}% {:>7}",
            i + 1,
            entry.player_name,
            entry.entity_name,
            entry.level,
            entry.xp,
            entry.total_score,
            entry.success_rate * 100.0,
            entry.achievement_count
        );
    }

    if let Some(path) = &args.export {
        let players = svc.snapshot_players();
        persistence::export_save(path, &ruleset_name, &players)?;
        println!("exported {} players to {path}", players.len());
    }
    Ok(())
}
