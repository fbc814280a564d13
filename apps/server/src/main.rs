#![deny(warnings)]

//! HTTP front end for the Magnate decision engine.
//!
//! One process serves one ruleset. Configuration comes from the
//! environment: `MAGNATE_RULESET` selects the pack, `MAGNATE_BIND` the
//! listen address, and `DATABASE_URL` (optional) a SQLite snapshot
//! store that is restored on startup and written through after every
//! mutation.

mod error;
mod routes;
mod state;

use anyhow::Context;
use content::RulesetKind;
use state::AppState;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let ruleset = match std::env::var("MAGNATE_RULESET") {
        Ok(key) => RulesetKind::parse(&key).with_context(|| format!("unknown ruleset {key:?}"))?,
        Err(_) => RulesetKind::BusinessEmpire,
    };
    let bind = std::env::var("MAGNATE_BIND").unwrap_or_else(|_| "0.0.0.0:8000".to_string());
    let pack = content::builtin(ruleset)?;
    info!(%ruleset, title = %pack.title, "loaded content pack");

    let pool = match std::env::var("DATABASE_URL") {
        Ok(url) => Some(persistence::init_db(&url).await?),
        Err(_) => None,
    };
    let state = AppState::new(ruleset, pack, pool.clone())?;

    if let Some(pool) = &pool {
        let restored = persistence::load_players(pool, ruleset.key()).await?;
        let count = restored.len();
        for record in restored {
            state.service.restore_player(record);
        }
        info!(count, "restored players from snapshot store");
    }

    let app = routes::router(state);
    let listener = TcpListener::bind(&bind)
        .await
        .with_context(|| format!("could not bind {bind}"))?;
    info!(%bind, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}
