//! Deterministic fallback encoder: hashed Gaussian projection.
//!
//! A poor man's embedding for running without any model dependency: the
//! state's canonical text is hashed with SHA-256, the hash seeds a PRNG,
//! and the context is `dim` standard-normal draws. The same input always
//! maps to the same vector, across processes and runs; distinct inputs land
//! on near-orthogonal directions with high probability, which is all the
//! bandit needs to separate context classes.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::domain::ArbiterResult;
use crate::ports::Encoder;

/// SHA-seeded random projection encoder.
#[derive(Debug, Clone)]
pub struct HashedProjectionEncoder {
    dim: usize,
}

impl HashedProjectionEncoder {
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }
}

impl Encoder for HashedProjectionEncoder {
    fn encode(&self, value: &Value) -> ArbiterResult<Vec<f64>> {
        // Strings hash as their raw text so "vip" and json!("vip") agree;
        // everything else hashes as its compact JSON rendering.
        let text = match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };

        let digest = Sha256::digest(text.as_bytes());
        let mut seed = [0u8; 8];
        seed.copy_from_slice(&digest[..8]);
        let mut rng = StdRng::seed_from_u64(u64::from_be_bytes(seed));

        Ok((0..self.dim)
            .map(|_| rng.sample::<f64, _>(StandardNormal))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_input_encodes_identically() {
        let encoder = HashedProjectionEncoder::new(16);
        let a = encoder.encode(&serde_json::json!("vip")).unwrap();
        let b = encoder.encode(&serde_json::json!("vip")).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn distinct_inputs_encode_differently() {
        let encoder = HashedProjectionEncoder::new(16);
        let a = encoder.encode(&serde_json::json!("vip")).unwrap();
        let b = encoder.encode(&serde_json::json!("guest")).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn string_value_and_raw_string_agree() {
        let encoder = HashedProjectionEncoder::new(8);
        let from_value = encoder.encode(&Value::String("hello".to_string())).unwrap();
        let from_object = encoder
            .encode(&serde_json::json!({ "value": "hello" }))
            .unwrap();
        // The object hashes its JSON rendering, not the inner string.
        assert_ne!(from_value, from_object);
    }

    #[test]
    fn output_length_matches_requested_dim() {
        let encoder = HashedProjectionEncoder::new(5);
        assert_eq!(encoder.encode(&serde_json::json!(42)).unwrap().len(), 5);
    }
}
