#![deny(warnings)]

//! Decision resolution and progression policy.
//!
//! Everything here is pure: the resolver maps a (metrics, choice) pair to a
//! new metric state plus an outcome score, and the progression policy folds
//! that score into XP, level, and achievements. Neither side owns player
//! state or performs I/O; the runtime commits results after the fact.

mod progress;
mod resolve;

pub use progress::{apply_outcome, xp_for_score, ProgressionDelta};
pub use resolve::{apply_choice, favorability, outcome_score, resolve, Resolution};
