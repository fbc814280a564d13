use content::{Fact, GamePack, RulesetKind, TriviaQuestion};
use sim_core::{PlayerId, ValidationError};
use sim_runtime::GameService;
use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::warn;

/// Static pack content served verbatim by the content routes.
pub struct PackInfo {
    pub title: String,
    pub description: String,
    pub facts: Vec<Fact>,
    pub trivia: Vec<TriviaQuestion>,
}

/// Shared application state: one engine per process, the pack's static
/// content, and an optional snapshot store.
#[derive(Clone)]
pub struct AppState {
    pub ruleset: RulesetKind,
    pub service: Arc<GameService>,
    pub pack: Arc<PackInfo>,
    pub pool: Option<SqlitePool>,
}

impl AppState {
    pub fn new(
        ruleset: RulesetKind,
        pack: GamePack,
        pool: Option<SqlitePool>,
    ) -> Result<Self, ValidationError> {
        let service = GameService::new(pack.catalog, pack.rules)?;
        Ok(Self {
            ruleset,
            service: Arc::new(service),
            pack: Arc::new(PackInfo {
                title: pack.title,
                description: pack.description,
                facts: pack.facts,
                trivia: pack.trivia,
            }),
            pool,
        })
    }

    /// Store `player`'s snapshot. Store failures are logged, not
    /// surfaced; the in-memory state is already committed.
    pub async fn persist(&self, player: PlayerId) {
        self.store(player, false).await;
    }

    /// Store `player`'s snapshot and journal their latest decision.
    pub async fn persist_decision(&self, player: PlayerId) {
        self.store(player, true).await;
    }

    async fn store(&self, player: PlayerId, journal_latest: bool) {
        let Some(pool) = &self.pool else { return };
        let record = match self.service.snapshot_player(player) {
            Ok(record) => record,
            Err(_) => return,
        };
        if let Err(err) = persistence::upsert_player(pool, self.ruleset.key(), &record).await {
            warn!(%player, error = %err, "player snapshot not stored");
            return;
        }
        if journal_latest {
            if let Some(decision) = record.history.last() {
                let seq = record.history.len() - 1;
                if let Err(err) = persistence::append_decision(pool, player, seq, decision).await {
                    warn!(%player, error = %err, "decision not journaled");
                }
            }
        }
    }
}
