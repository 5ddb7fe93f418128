//! RewardScorer port: computes a reward from a feedback result.

use serde_json::Value;

/// Computes a numeric reward from a "result" value.
///
/// Invoked only when a feedback call omits an explicit reward. The engine
/// validates finiteness of the returned value before applying it; a scorer
/// returning NaN or infinity fails that feedback call.
pub trait RewardScorer: Send + Sync {
    fn score(&self, result: &Value) -> f64;
}
