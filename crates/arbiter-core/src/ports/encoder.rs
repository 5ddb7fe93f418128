//! Encoder port: maps an arbitrary state value to a numeric vector.
//!
//! Implementations are treated as opaque pure functions of their input. The
//! returned vector does not have to match the engine's feature dimension;
//! the [`StateEncoder`](crate::encoding::StateEncoder) wrapper coerces it.

use serde_json::Value;

use crate::domain::ArbiterResult;

/// Maps a state value to a numeric vector.
///
/// # Contract
/// - Pure: the same input always yields the same output.
/// - The output length may differ from the engine's `feature_dim`; the
///   encoding layer truncates or zero-pads as needed.
pub trait Encoder: Send + Sync {
    fn encode(&self, value: &Value) -> ArbiterResult<Vec<f64>>;
}
