#![deny(warnings)]

//! Built-in content packs for Magnate.
//!
//! A pack bundles everything one game variant needs: the indicator
//! catalog, the scenario library, the ruleset configuration, and the
//! educational side content (facts and trivia). Packs are plain JSON
//! documents compiled into the binary; every pack is validated on load
//! so the engine never sees malformed content.

use serde::{Deserialize, Serialize};
use sim_core::{validate_catalog, validate_rules, Catalog, RulesetConfig, ValidationError};
use std::fmt;
use std::path::Path;
use thiserror::Error;

/// The game variants shipped with the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RulesetKind {
    /// Company management: sourcing, logistics, marketing, finance.
    BusinessEmpire,
    /// Country management: trade, culture, environment, investment.
    GlobalDynamics,
    /// Compact introduction pack around ethical supply chains.
    SupplyChain,
}

impl RulesetKind {
    pub const ALL: [RulesetKind; 3] = [
        RulesetKind::BusinessEmpire,
        RulesetKind::GlobalDynamics,
        RulesetKind::SupplyChain,
    ];

    /// Stable key used in configuration and on the wire.
    pub fn key(&self) -> &'static str {
        match self {
            RulesetKind::BusinessEmpire => "business_empire",
            RulesetKind::GlobalDynamics => "global_dynamics",
            RulesetKind::SupplyChain => "supply_chain",
        }
    }

    /// Inverse of [`RulesetKind::key`].
    pub fn parse(key: &str) -> Option<Self> {
        Self::ALL.iter().find(|k| k.key() == key).copied()
    }
}

impl fmt::Display for RulesetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A short educational fact shown between decisions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Fact {
    pub topic: String,
    pub text: String,
}

/// One multiple-choice trivia question.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TriviaQuestion {
    pub question: String,
    pub options: Vec<String>,
    /// Index into `options`; checked against the option count on load.
    pub answer_index: usize,
    pub explanation: String,
}

/// A complete playable game variant.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GamePack {
    pub title: String,
    pub description: String,
    pub catalog: Catalog,
    pub rules: RulesetConfig,
    #[serde(default)]
    pub facts: Vec<Fact>,
    #[serde(default)]
    pub trivia: Vec<TriviaQuestion>,
}

/// Failure to load or validate a content pack.
#[derive(Debug, Error)]
pub enum PackError {
    /// The pack file could not be read.
    #[error("could not read pack file: {0}")]
    Io(#[from] std::io::Error),
    /// The document is not valid pack JSON.
    #[error("malformed pack document: {0}")]
    Parse(#[from] serde_json::Error),
    /// The document parsed but violates a catalog or rules invariant.
    #[error("invalid pack content: {0}")]
    Validation(#[from] ValidationError),
    /// A trivia answer index points past the question's options.
    #[error("trivia question {question:?} has answer index {index} but {options} options")]
    TriviaAnswerOutOfRange {
        question: String,
        index: usize,
        options: usize,
    },
}

const BUSINESS_EMPIRE: &str = include_str!("../assets/business_empire.json");
const GLOBAL_DYNAMICS: &str = include_str!("../assets/global_dynamics.json");
const SUPPLY_CHAIN: &str = include_str!("../assets/supply_chain.json");

fn parse_pack(raw: &str) -> Result<GamePack, PackError> {
    let pack: GamePack = serde_json::from_str(raw)?;
    validate_catalog(&pack.catalog)?;
    validate_rules(&pack.rules)?;
    for q in &pack.trivia {
        if q.answer_index >= q.options.len() {
            return Err(PackError::TriviaAnswerOutOfRange {
                question: q.question.clone(),
                index: q.answer_index,
                options: q.options.len(),
            });
        }
    }
    Ok(pack)
}

/// Load one of the built-in packs.
///
/// ```
/// let pack = content::builtin(content::RulesetKind::SupplyChain).unwrap();
/// assert!(!pack.catalog.scenarios.is_empty());
/// ```
pub fn builtin(kind: RulesetKind) -> Result<GamePack, PackError> {
    let raw = match kind {
        RulesetKind::BusinessEmpire => BUSINESS_EMPIRE,
        RulesetKind::GlobalDynamics => GLOBAL_DYNAMICS,
        RulesetKind::SupplyChain => SUPPLY_CHAIN,
    };
    parse_pack(raw)
}

/// Load and validate a pack from an external JSON file, for custom
/// content without a rebuild.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<GamePack, PackError> {
    let raw = std::fs::read_to_string(path)?;
    parse_pack(&raw)
}
