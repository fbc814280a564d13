#![deny(warnings)]

//! SQLite-backed persistence for player state.
//!
//! Three tables: `players` holds one JSON snapshot per player keyed by
//! id, `decisions` is an append-only journal of resolved decisions,
//! and `saves` records named export events. Snapshots are written
//! whole; the engine never reads through this crate during play, only
//! on startup restore.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sim_core::{DecisionRecord, PlayerId};
use sim_runtime::PlayerRecord;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, info};

/// Default on-disk location when `DATABASE_URL` is not set.
pub fn default_sqlite_url() -> &'static str {
    "sqlite://./saves/magnate.db"
}

/// Persistence failures.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("record encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("save file codec error: {0}")]
    SaveCodec(#[from] bincode::Error),
    #[error("save file version {0} is not supported")]
    UnsupportedSaveVersion(u32),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Open (creating if missing) the database at `url` and ensure the
/// schema exists. Idempotent.
pub async fn init_db(url: &str) -> Result<SqlitePool, StoreError> {
    let options = SqliteConnectOptions::from_str(url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS players (
            player_id  TEXT PRIMARY KEY,
            ruleset    TEXT NOT NULL,
            data       TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
    )
    .execute(&pool)
    .await?;
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS decisions (
            player_id TEXT NOT NULL,
            seq       INTEGER NOT NULL,
            data      TEXT NOT NULL,
            PRIMARY KEY (player_id, seq)
        )",
    )
    .execute(&pool)
    .await?;
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS saves (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            name       TEXT NOT NULL,
            note       TEXT,
            created_at TEXT NOT NULL
        )",
    )
    .execute(&pool)
    .await?;

    info!(url, "database schema ready");
    Ok(pool)
}

/// Write or replace one player snapshot.
pub async fn upsert_player(
    pool: &SqlitePool,
    ruleset: &str,
    record: &PlayerRecord,
) -> Result<(), StoreError> {
    let data = serde_json::to_string(record)?;
    sqlx::query(
        "INSERT INTO players (player_id, ruleset, data, updated_at)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(player_id) DO UPDATE SET
             data = excluded.data,
             updated_at = excluded.updated_at",
    )
    .bind(record.player_id.to_string())
    .bind(ruleset)
    .bind(data)
    .bind(Utc::now().to_rfc3339())
    .execute(pool)
    .await?;
    debug!(player_id = %record.player_id, "player snapshot stored");
    Ok(())
}

/// Load every stored snapshot for one ruleset, oldest first.
pub async fn load_players(pool: &SqlitePool, ruleset: &str) -> Result<Vec<PlayerRecord>, StoreError> {
    let rows: Vec<String> =
        sqlx::query_scalar("SELECT data FROM players WHERE ruleset = ?1 ORDER BY rowid")
            .bind(ruleset)
            .fetch_all(pool)
            .await?;
    let records = rows
        .iter()
        .map(|data| serde_json::from_str(data))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(records)
}

/// Journal one resolved decision under `(player, seq)`.
pub async fn append_decision(
    pool: &SqlitePool,
    player: PlayerId,
    seq: usize,
    record: &DecisionRecord,
) -> Result<(), StoreError> {
    let data = serde_json::to_string(record)?;
    sqlx::query("INSERT OR REPLACE INTO decisions (player_id, seq, data) VALUES (?1, ?2, ?3)")
        .bind(player.to_string())
        .bind(seq as i64)
        .bind(data)
        .execute(pool)
        .await?;
    Ok(())
}

/// Read one player's journal in resolution order.
pub async fn decisions_for_player(
    pool: &SqlitePool,
    player: PlayerId,
) -> Result<Vec<DecisionRecord>, StoreError> {
    let rows: Vec<String> =
        sqlx::query_scalar("SELECT data FROM decisions WHERE player_id = ?1 ORDER BY seq")
            .bind(player.to_string())
            .fetch_all(pool)
            .await?;
    let records = rows
        .iter()
        .map(|data| serde_json::from_str(data))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(records)
}

/// Register a named save event. Returns its row id.
pub async fn create_save(
    pool: &SqlitePool,
    name: &str,
    note: Option<&str>,
) -> Result<i64, StoreError> {
    let result = sqlx::query("INSERT INTO saves (name, note, created_at) VALUES (?1, ?2, ?3)")
        .bind(name)
        .bind(note)
        .bind(Utc::now().to_rfc3339())
        .execute(pool)
        .await?;
    Ok(result.last_insert_rowid())
}

const SAVE_VERSION: u32 = 1;

// Player records carry internally tagged enums, which bincode cannot
// round-trip; the envelope is bincode, the record payload stays JSON.
#[derive(Serialize, Deserialize)]
struct SaveEnvelope {
    version: u32,
    ruleset: String,
    saved_at: DateTime<Utc>,
    payload: Vec<u8>,
}

/// Decoded contents of a save file.
#[derive(Debug)]
pub struct SaveContents {
    pub ruleset: String,
    pub saved_at: DateTime<Utc>,
    pub players: Vec<PlayerRecord>,
}

/// Export player snapshots to a single binary save file.
pub fn export_save(
    path: impl AsRef<Path>,
    ruleset: &str,
    players: &[PlayerRecord],
) -> Result<(), StoreError> {
    let envelope = SaveEnvelope {
        version: SAVE_VERSION,
        ruleset: ruleset.to_string(),
        saved_at: Utc::now(),
        payload: serde_json::to_vec(players)?,
    };
    std::fs::write(path.as_ref(), bincode::serialize(&envelope)?)?;
    info!(ruleset, players = players.len(), path = %path.as_ref().display(), "save exported");
    Ok(())
}

/// Read back a save file written by [`export_save`].
pub fn import_save(path: impl AsRef<Path>) -> Result<SaveContents, StoreError> {
    let bytes = std::fs::read(path)?;
    let envelope: SaveEnvelope = bincode::deserialize(&bytes)?;
    if envelope.version != SAVE_VERSION {
        return Err(StoreError::UnsupportedSaveVersion(envelope.version));
    }
    let players: Vec<PlayerRecord> = serde_json::from_slice(&envelope.payload)?;
    Ok(SaveContents {
        ruleset: envelope.ruleset,
        saved_at: envelope.saved_at,
        players,
    })
}
