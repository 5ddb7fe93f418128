//! Error taxonomy for the decision engine.
//!
//! Raised conditions propagate to the caller synchronously; there is no
//! internal retry. Missing sequential slots, unknown event ids, unknown
//! trace ids and singular per-action solves are deliberate no-ops, not
//! errors.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArbiterError {
    /// Invalid construction parameters. Fatal to the construction attempt,
    /// never recoverable in place.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Non-finite reward, either supplied directly or produced by a reward
    /// scorer. Raised before the policy or the store is touched.
    #[error("reward must be finite, got {0}")]
    InvalidReward(f64),

    /// No policy snapshot exists at the derived location.
    #[error("policy snapshot not found at {0}")]
    SnapshotNotFound(PathBuf),

    /// Snapshot shape does not match the live policy. The live policy is
    /// left unchanged.
    #[error("incompatible policy snapshot: {field} mismatch (expected {expected}, found {found})")]
    IncompatibleSnapshot {
        field: &'static str,
        expected: usize,
        found: usize,
    },

    /// Snapshot serialization or file i/o failure other than not-found.
    #[error("snapshot error: {0}")]
    Snapshot(String),

    /// Encoder failure, including pass-through vectors narrower than the
    /// configured feature dimension.
    #[error("encoder error: {0}")]
    Encoder(String),

    /// Experience store failure. Only reachable after the policy update has
    /// already been applied, so it never corrupts the model.
    #[error("experience store error: {0}")]
    Store(String),
}

pub type ArbiterResult<T> = Result<T, ArbiterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_offending_reward() {
        let err = ArbiterError::InvalidReward(f64::NAN);
        assert!(err.to_string().contains("finite"));
    }

    #[test]
    fn incompatible_snapshot_names_the_field() {
        let err = ArbiterError::IncompatibleSnapshot {
            field: "n_actions",
            expected: 2,
            found: 3,
        };
        let msg = err.to_string();
        assert!(msg.contains("n_actions"));
        assert!(msg.contains("expected 2"));
        assert!(msg.contains("found 3"));
    }
}
