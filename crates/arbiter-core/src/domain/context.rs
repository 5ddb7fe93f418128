//! Context vector: the fixed-dimension numeric encoding of one decision's
//! input state.
//!
//! Produced once per decision by the encoding layer and immutable afterwards.
//! The policy reads it for selection and consumes a reference for the rank-1
//! update; the experience store keeps its own clone with independent
//! lifetime.

use nalgebra::DVector;
use serde::de::{Deserializer, Error as _};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// Fixed-length context vector backed by a dense `nalgebra` vector.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextVector(DVector<f64>);

impl ContextVector {
    pub fn from_values(values: Vec<f64>) -> Self {
        Self(DVector::from_vec(values))
    }

    /// Fit `values` to exactly `dim` components: truncate when longer,
    /// zero-pad when shorter.
    pub fn fitted(mut values: Vec<f64>, dim: usize) -> Self {
        values.resize(dim, 0.0);
        Self(DVector::from_vec(values))
    }

    pub fn dim(&self) -> usize {
        self.0.len()
    }

    /// Rescale to unit Euclidean norm. No-op when the norm is zero.
    pub fn l2_normalized(mut self) -> Self {
        let norm = self.0.norm();
        if norm > 0.0 {
            self.0 /= norm;
        }
        self
    }

    pub fn as_dvector(&self) -> &DVector<f64> {
        &self.0
    }

    pub fn as_slice(&self) -> &[f64] {
        self.0.as_slice()
    }

    /// Cosine similarity against another vector of the same dimension.
    ///
    /// Returns 0.0 when either vector has zero norm.
    pub fn cosine(&self, other: &ContextVector) -> f64 {
        let denom = self.0.norm() * other.0.norm();
        if denom > 0.0 {
            self.0.dot(&other.0) / denom
        } else {
            0.0
        }
    }
}

impl From<DVector<f64>> for ContextVector {
    fn from(v: DVector<f64>) -> Self {
        Self(v)
    }
}

// Serialized as a plain number array so experience logs and snapshots stay
// readable without nalgebra on the consuming side.
impl Serialize for ContextVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.as_slice().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ContextVector {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let values = Vec::<f64>::deserialize(deserializer)?;
        if values.is_empty() {
            return Err(D::Error::custom("context vector must not be empty"));
        }
        Ok(Self::from_values(values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fitted_truncates_longer_input() {
        let ctx = ContextVector::fitted(vec![1.0, 2.0, 3.0, 4.0], 2);
        assert_eq!(ctx.as_slice(), &[1.0, 2.0]);
    }

    #[test]
    fn fitted_zero_pads_shorter_input() {
        let ctx = ContextVector::fitted(vec![1.0], 3);
        assert_eq!(ctx.as_slice(), &[1.0, 0.0, 0.0]);
    }

    #[test]
    fn normalization_produces_unit_norm() {
        let ctx = ContextVector::from_values(vec![3.0, 4.0]).l2_normalized();
        assert!((ctx.as_dvector().norm() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn normalization_is_noop_on_zero_vector() {
        let ctx = ContextVector::from_values(vec![0.0, 0.0]).l2_normalized();
        assert_eq!(ctx.as_slice(), &[0.0, 0.0]);
    }

    #[test]
    fn cosine_of_orthogonal_vectors_is_zero() {
        let a = ContextVector::from_values(vec![1.0, 0.0]);
        let b = ContextVector::from_values(vec![0.0, 1.0]);
        assert!(a.cosine(&b).abs() < 1e-12);
        assert!((a.cosine(&a) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn serde_round_trip() {
        let ctx = ContextVector::from_values(vec![0.5, -1.25, 3.0]);
        let json = serde_json::to_string(&ctx).unwrap();
        let back: ContextVector = serde_json::from_str(&json).unwrap();
        assert_eq!(ctx, back);
    }
}
