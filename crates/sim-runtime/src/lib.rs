#![deny(warnings)]

//! Turn orchestration for magnate rulesets.
//!
//! [`GameService`] owns every player's record (entity metrics,
//! progression, cursor, decision journal) and exposes the five
//! operations the transport layer calls: create, read state, submit a
//! decision, advance the phase, and rank the leaderboard. Decision
//! resolution itself lives in `sim-rules`; this crate sequences it and
//! commits the results.

pub mod leaderboard;
pub mod machine;
pub mod service;

pub use leaderboard::{rank, LeaderboardEntry};
pub use service::{
    AnalyticsView, CreatedPlayer, DecisionOutcome, GameService, GameStateView, PlayerRecord,
};
