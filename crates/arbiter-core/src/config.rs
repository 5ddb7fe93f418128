//! Engine configuration.
//!
//! Plain serde structs with conservative defaults; the builder consumes a
//! config and validates it fail-fast at `build()`. Values here cover the
//! numeric knobs only — collaborator wiring (encoder, store, scorer) is the
//! builder's job.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::ArbiterError;

/// Which bandit policy the engine runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    #[default]
    Linucb,
}

impl PolicyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyKind::Linucb => "linucb",
        }
    }
}

impl FromStr for PolicyKind {
    type Err = ArbiterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "linucb" => Ok(PolicyKind::Linucb),
            other => Err(ArbiterError::Configuration(format!(
                "unknown policy kind '{other}'"
            ))),
        }
    }
}

/// Numeric and extraction knobs for one engine instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Dimension of context vectors.
    pub feature_dim: usize,

    /// Exploration weight for the UCB term. Must be >= 0.
    pub exploration_alpha: f64,

    /// Ridge regularization for the per-action design matrices. Must be > 0.
    pub ridge_lambda: f64,

    /// Whether encoder output is rescaled to unit Euclidean norm.
    pub normalize: bool,

    /// Bandit policy kind.
    pub policy: PolicyKind,

    /// When set, this key is extracted from object states and encoded
    /// instead of the whole state.
    pub value_key: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            feature_dim: 32,
            exploration_alpha: 1.0,
            ridge_lambda: 1.0,
            normalize: true,
            policy: PolicyKind::Linucb,
            value_key: None,
        }
    }
}
