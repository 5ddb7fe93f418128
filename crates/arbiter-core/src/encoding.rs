//! State encoding layer: turns an arbitrary JSON state value into a context
//! vector of exactly the engine's feature dimension.
//!
//! Two paths:
//! - a JSON array of numbers is treated as an already-encoded vector and
//!   passed through (truncated when longer, never padded, never
//!   normalized);
//! - anything else goes through the [`Encoder`] port, then is truncated or
//!   zero-padded to the feature dimension and optionally L2-normalized.

use serde_json::Value;

use crate::domain::{ArbiterError, ArbiterResult, ContextVector};
use crate::ports::Encoder;

/// Dimension-coercing, optionally normalizing wrapper around an [`Encoder`].
pub struct StateEncoder {
    dim: usize,
    normalize: bool,
    inner: Box<dyn Encoder>,
}

impl StateEncoder {
    pub fn new(dim: usize, normalize: bool, inner: Box<dyn Encoder>) -> Self {
        Self {
            dim,
            normalize,
            inner,
        }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Encode `value` into a context vector of exactly `self.dim`
    /// components.
    pub fn encode(&self, value: &Value) -> ArbiterResult<ContextVector> {
        if let Some(vector) = numeric_array(value) {
            // Pass-through: keep the caller's components as-is. A narrower
            // vector cannot feed a dim x dim model, so it is rejected here
            // rather than deep inside the solve.
            if vector.len() < self.dim {
                return Err(ArbiterError::Encoder(format!(
                    "pass-through vector has {} components, engine needs {}",
                    vector.len(),
                    self.dim
                )));
            }
            let mut vector = vector;
            vector.truncate(self.dim);
            return Ok(ContextVector::from_values(vector));
        }

        let raw = self.inner.encode(value)?;
        let context = ContextVector::fitted(raw, self.dim);
        Ok(if self.normalize {
            context.l2_normalized()
        } else {
            context
        })
    }
}

/// `Some(values)` when `value` is a non-empty JSON array of numbers.
fn numeric_array(value: &Value) -> Option<Vec<f64>> {
    let items = value.as_array()?;
    if items.is_empty() {
        return None;
    }
    items.iter().map(Value::as_f64).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Encoder stub returning a fixed vector regardless of input.
    struct FixedEncoder(Vec<f64>);

    impl Encoder for FixedEncoder {
        fn encode(&self, _value: &Value) -> ArbiterResult<Vec<f64>> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn numeric_array_is_passed_through_truncated() {
        let encoder = StateEncoder::new(2, true, Box::new(FixedEncoder(vec![])));
        let ctx = encoder
            .encode(&serde_json::json!([3.0, 4.0, 5.0]))
            .unwrap();
        // truncated to dim, not normalized
        assert_eq!(ctx.as_slice(), &[3.0, 4.0]);
    }

    #[test]
    fn narrow_pass_through_vector_is_rejected() {
        let encoder = StateEncoder::new(4, false, Box::new(FixedEncoder(vec![])));
        let err = encoder.encode(&serde_json::json!([1.0, 2.0])).unwrap_err();
        assert!(matches!(err, ArbiterError::Encoder(_)));
    }

    #[test]
    fn mixed_array_goes_through_the_encoder_port() {
        let encoder = StateEncoder::new(2, false, Box::new(FixedEncoder(vec![7.0, 7.0])));
        let ctx = encoder
            .encode(&serde_json::json!([1.0, "not a number"]))
            .unwrap();
        assert_eq!(ctx.as_slice(), &[7.0, 7.0]);
    }

    #[test]
    fn encoder_output_is_padded_and_normalized() {
        let encoder = StateEncoder::new(4, true, Box::new(FixedEncoder(vec![3.0, 4.0])));
        let ctx = encoder.encode(&serde_json::json!("state")).unwrap();
        assert_eq!(ctx.dim(), 4);
        assert_eq!(ctx.as_slice(), &[0.6, 0.8, 0.0, 0.0]);
    }

    #[test]
    fn encoder_output_is_truncated_when_wider() {
        let encoder = StateEncoder::new(2, false, Box::new(FixedEncoder(vec![1.0, 2.0, 3.0])));
        let ctx = encoder.encode(&serde_json::json!("state")).unwrap();
        assert_eq!(ctx.as_slice(), &[1.0, 2.0]);
    }

    #[test]
    fn zero_vector_normalization_is_a_noop() {
        let encoder = StateEncoder::new(2, true, Box::new(FixedEncoder(vec![0.0, 0.0])));
        let ctx = encoder.encode(&serde_json::json!("state")).unwrap();
        assert_eq!(ctx.as_slice(), &[0.0, 0.0]);
    }
}
