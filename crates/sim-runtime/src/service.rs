use crate::leaderboard::{rank, LeaderboardEntry};
use crate::machine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sim_core::{
    validate_catalog, validate_rules, Catalog, CursorState, DecisionCategory, DecisionRecord,
    EngineError, MetricSet, PlayerId, PlayerProgression, RulesetConfig, Scenario,
    SimulationCursor, ValidationError,
};
use sim_rules::{apply_outcome, outcome_score, resolve};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use tracing::{debug, info};

/// Everything the service tracks for one player: identity, entity
/// metrics, progression, cursor, and the decision journal.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub player_id: PlayerId,
    pub player_name: String,
    pub entity_name: String,
    /// Archetype the entity was created from, if any.
    pub archetype: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Service-assigned creation order, used as the ranking tie-break.
    pub creation_seq: u64,
    pub metrics: MetricSet,
    pub progression: PlayerProgression,
    pub cursor: SimulationCursor,
    pub history: Vec<DecisionRecord>,
}

/// Read-only snapshot returned by `get_state` and `advance_phase`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameStateView {
    pub player_id: PlayerId,
    pub player_name: String,
    pub entity_name: String,
    pub archetype: Option<String>,
    pub progression: PlayerProgression,
    pub metrics: MetricSet,
    /// Weighted-favorability digest of `metrics`, in `[0, 100]`.
    pub standing: f64,
    pub current_scenario: Option<Scenario>,
    pub phase_index: u32,
    pub position_in_phase: u32,
    pub phase_complete: bool,
    pub game_complete: bool,
}

/// Result of one entity creation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CreatedPlayer {
    pub player_id: PlayerId,
    pub state: GameStateView,
}

/// Everything one resolved decision produced, returned synchronously.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DecisionOutcome {
    pub metrics: MetricSet,
    pub outcome_score: f64,
    pub xp_gained: u64,
    pub leveled_up: bool,
    pub new_achievements: Vec<String>,
    pub level: u32,
    pub xp: u64,
    pub phase_complete: bool,
    pub game_complete: bool,
    pub next_scenario: Option<Scenario>,
}

/// Per-category counters and success statistics for one player.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsView {
    pub player_id: PlayerId,
    pub entity_name: String,
    pub total_decisions: u32,
    pub successful_decisions: u32,
    pub success_rate: f64,
    pub current_streak: u32,
    pub best_streak: u32,
    pub decisions_by_category: BTreeMap<DecisionCategory, u32>,
    pub xp_by_category: BTreeMap<DecisionCategory, u64>,
    pub achievements: Vec<String>,
    pub recent_decisions: Vec<DecisionRecord>,
}

/// Process-wide owner of all player state for one ruleset.
///
/// Decisions for one player are serialized behind that player's mutex;
/// different players proceed in parallel. The catalog and ruleset are
/// validated at construction and immutable afterwards. Nothing here
/// performs I/O; persistence happens outside via [`PlayerRecord`]
/// snapshots.
pub struct GameService {
    catalog: Catalog,
    rules: RulesetConfig,
    players: RwLock<HashMap<PlayerId, Arc<Mutex<PlayerRecord>>>>,
    creation_seq: AtomicU64,
}

fn lock_record(handle: &Mutex<PlayerRecord>) -> MutexGuard<'_, PlayerRecord> {
    // a poisoned lock still guards consistent state: every mutation
    // commits only after all checks have passed
    handle.lock().unwrap_or_else(PoisonError::into_inner)
}

impl GameService {
    /// Build a service over a validated catalog and ruleset.
    pub fn new(catalog: Catalog, rules: RulesetConfig) -> Result<Self, ValidationError> {
        validate_catalog(&catalog)?;
        validate_rules(&rules)?;
        Ok(Self {
            catalog,
            rules,
            players: RwLock::new(HashMap::new()),
            creation_seq: AtomicU64::new(0),
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn rules(&self) -> &RulesetConfig {
        &self.rules
    }

    pub fn player_count(&self) -> usize {
        self.read_players().len()
    }

    /// Register a new player and entity. Names are trimmed and must be
    /// non-empty; the archetype, when given, must exist in the catalog.
    pub fn create_entity(
        &self,
        player_name: &str,
        entity_name: &str,
        archetype: Option<&str>,
    ) -> Result<CreatedPlayer, EngineError> {
        let player_name = player_name.trim();
        let entity_name = entity_name.trim();
        if player_name.is_empty() || entity_name.is_empty() {
            return Err(EngineError::EmptyName);
        }

        let mut metrics = MetricSet::from_defs(&self.catalog.indicators);
        let archetype = match archetype {
            Some(name) => {
                let found = self
                    .catalog
                    .archetype(name)
                    .ok_or_else(|| EngineError::UnknownArchetype(name.to_string()))?;
                for (id, value) in &found.overrides {
                    if let Some(def) = self.catalog.indicator(id) {
                        metrics.set(id.clone(), def.range.clamp(*value));
                    }
                }
                Some(found.name.clone())
            }
            None => None,
        };

        let record = PlayerRecord {
            player_id: PlayerId::random(),
            player_name: player_name.to_string(),
            entity_name: entity_name.to_string(),
            archetype,
            created_at: Utc::now(),
            creation_seq: self.creation_seq.fetch_add(1, Ordering::Relaxed),
            metrics,
            progression: PlayerProgression::new(),
            cursor: machine::initial_cursor(&self.catalog),
            history: Vec::new(),
        };
        let player_id = record.player_id;
        let state = self.view_of(&record);

        self.write_players()
            .insert(player_id, Arc::new(Mutex::new(record)));
        info!(%player_id, entity = %entity_name, "entity created");
        Ok(CreatedPlayer { player_id, state })
    }

    /// Read-only snapshot of one player.
    pub fn get_state(&self, player: PlayerId) -> Result<GameStateView, EngineError> {
        let handle = self.handle(player)?;
        let record = lock_record(&handle);
        Ok(self.view_of(&record))
    }

    /// Resolve `choice_index` against the player's pending scenario.
    ///
    /// The sole mutating entry point. All checks run before any state
    /// changes; on success the metric update, progression update,
    /// journal entry, and cursor advance commit together under the
    /// player's lock.
    pub fn submit_decision(
        &self,
        player: PlayerId,
        choice_index: usize,
    ) -> Result<DecisionOutcome, EngineError> {
        let handle = self.handle(player)?;
        let mut record = lock_record(&handle);

        let scenario_id = match &record.cursor.state {
            CursorState::AwaitingDecision { scenario } => scenario.clone(),
            CursorState::PhaseComplete { .. } => return Err(EngineError::NoCurrentScenario),
            CursorState::GameComplete => return Err(EngineError::GameAlreadyComplete),
        };
        let scenario = self
            .catalog
            .scenario(&scenario_id)
            .ok_or(EngineError::NoCurrentScenario)?;

        let resolution = resolve(&self.catalog.indicators, &record.metrics, scenario, choice_index)?;

        // commit point: nothing below can fail
        let phase = record.cursor.phase_index;
        let delta = apply_outcome(
            &self.rules.progression,
            &mut record.progression,
            resolution.outcome_score,
            scenario.category,
        );
        record.metrics = resolution.metrics;
        record.cursor = machine::after_decision(&record.cursor, &self.catalog, &self.rules.phases);
        record.history.push(DecisionRecord {
            scenario: scenario.id.clone(),
            title: scenario.title.clone(),
            category: scenario.category,
            choice_index,
            choice_label: scenario.choices[choice_index].label.clone(),
            outcome_score: resolution.outcome_score,
            xp_gained: delta.xp_gained,
            phase,
            decided_at: Utc::now(),
        });

        debug!(
            %player,
            scenario = %scenario_id,
            score = resolution.outcome_score,
            "decision resolved"
        );
        Ok(DecisionOutcome {
            metrics: record.metrics.clone(),
            outcome_score: resolution.outcome_score,
            xp_gained: delta.xp_gained,
            leveled_up: delta.leveled_up,
            new_achievements: delta.new_achievements,
            level: record.progression.level,
            xp: record.progression.xp,
            phase_complete: record.cursor.is_phase_complete(),
            game_complete: record.cursor.is_game_complete(),
            next_scenario: self.scenario_view(&record.cursor),
        })
    }

    /// Explicit transition out of `PhaseComplete`.
    pub fn advance_phase(&self, player: PlayerId) -> Result<GameStateView, EngineError> {
        let handle = self.handle(player)?;
        let mut record = lock_record(&handle);
        record.cursor = machine::advance_phase(&record.cursor, &self.catalog, &self.rules.phases)?;
        if record.cursor.is_game_complete() {
            info!(%player, phases = record.cursor.phase_index + 1, "game complete");
        }
        Ok(self.view_of(&record))
    }

    /// Rank all players. Each record is sampled under its own lock, so
    /// the result is consistent as of some recent point rather than a
    /// single global instant.
    pub fn leaderboard(&self) -> Vec<LeaderboardEntry> {
        let handles: Vec<Arc<Mutex<PlayerRecord>>> =
            self.read_players().values().cloned().collect();
        let entries = handles
            .iter()
            .map(|h| self.entry_of(&lock_record(h)))
            .collect();
        rank(entries)
    }

    /// Per-category statistics for one player, including the tail of
    /// the decision journal (most recent last).
    pub fn analytics(&self, player: PlayerId) -> Result<AnalyticsView, EngineError> {
        let handle = self.handle(player)?;
        let record = lock_record(&handle);
        let p = &record.progression;
        let recent = record
            .history
            .iter()
            .rev()
            .take(10)
            .rev()
            .cloned()
            .collect();
        Ok(AnalyticsView {
            player_id: record.player_id,
            entity_name: record.entity_name.clone(),
            total_decisions: p.total_decisions,
            successful_decisions: p.successful_decisions,
            success_rate: p.success_rate(),
            current_streak: p.current_streak,
            best_streak: p.best_streak,
            decisions_by_category: p.decisions_by_category.clone(),
            xp_by_category: p.xp_by_category.clone(),
            achievements: p.achievements.clone(),
            recent_decisions: recent,
        })
    }

    /// Clone one player's record, for persisting after a mutation.
    pub fn snapshot_player(&self, player: PlayerId) -> Result<PlayerRecord, EngineError> {
        let handle = self.handle(player)?;
        let record = lock_record(&handle);
        Ok(record.clone())
    }

    /// Clone out every player record, for saves and persistence.
    pub fn snapshot_players(&self) -> Vec<PlayerRecord> {
        let handles: Vec<Arc<Mutex<PlayerRecord>>> =
            self.read_players().values().cloned().collect();
        handles.iter().map(|h| lock_record(h).clone()).collect()
    }

    /// Re-insert a previously snapshotted record, keeping the creation
    /// sequence monotone past it.
    pub fn restore_player(&self, record: PlayerRecord) {
        self.creation_seq
            .fetch_max(record.creation_seq + 1, Ordering::Relaxed);
        self.write_players()
            .insert(record.player_id, Arc::new(Mutex::new(record)));
    }

    fn handle(&self, player: PlayerId) -> Result<Arc<Mutex<PlayerRecord>>, EngineError> {
        self.read_players()
            .get(&player)
            .cloned()
            .ok_or(EngineError::UnknownPlayer(player))
    }

    fn read_players(
        &self,
    ) -> std::sync::RwLockReadGuard<'_, HashMap<PlayerId, Arc<Mutex<PlayerRecord>>>> {
        self.players.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_players(
        &self,
    ) -> std::sync::RwLockWriteGuard<'_, HashMap<PlayerId, Arc<Mutex<PlayerRecord>>>> {
        self.players.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn scenario_view(&self, cursor: &SimulationCursor) -> Option<Scenario> {
        cursor
            .pending_scenario()
            .and_then(|id| self.catalog.scenario(id))
            .cloned()
    }

    fn view_of(&self, record: &PlayerRecord) -> GameStateView {
        GameStateView {
            player_id: record.player_id,
            player_name: record.player_name.clone(),
            entity_name: record.entity_name.clone(),
            archetype: record.archetype.clone(),
            progression: record.progression.clone(),
            standing: outcome_score(&self.catalog.indicators, &record.metrics),
            metrics: record.metrics.clone(),
            current_scenario: self.scenario_view(&record.cursor),
            phase_index: record.cursor.phase_index,
            position_in_phase: record.cursor.position_in_phase,
            phase_complete: record.cursor.is_phase_complete(),
            game_complete: record.cursor.is_game_complete(),
        }
    }

    fn entry_of(&self, record: &PlayerRecord) -> LeaderboardEntry {
        let p = &record.progression;
        LeaderboardEntry {
            player_id: record.player_id,
            player_name: record.player_name.clone(),
            entity_name: record.entity_name.clone(),
            level: p.level,
            xp: p.xp,
            total_score: p.total_score,
            total_decisions: p.total_decisions,
            success_rate: p.success_rate(),
            standing: outcome_score(&self.catalog.indicators, &record.metrics),
            achievement_count: p.achievements.len(),
            game_complete: record.cursor.is_game_complete(),
            creation_seq: record.creation_seq,
        }
    }
}
