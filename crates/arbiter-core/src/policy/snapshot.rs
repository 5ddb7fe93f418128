//! Policy snapshots: serializing LinUCB model state to disk and back.
//!
//! The blob carries `{ a, b, n_actions, feature_dim, alpha }` as JSON at a
//! location derived from the caller's path (`<path>.json`). serde_json
//! prints floats with round-trip-exact precision, so a save/load cycle
//! reproduces `A` and `b` bit-identically.

use std::fs;
use std::path::{Path, PathBuf};

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::linucb::LinUcbPolicy;
use crate::domain::{ArbiterError, ArbiterResult};

/// Serialized LinUCB model state.
///
/// Matrices are stored as flat column-major arrays; `b` vectors as plain
/// arrays. Shape metadata travels with the blob so an incompatible load is
/// rejected before touching the live policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicySnapshot {
    pub n_actions: usize,
    pub feature_dim: usize,
    pub alpha: f64,
    a: Vec<Vec<f64>>,
    b: Vec<Vec<f64>>,
}

impl PolicySnapshot {
    /// Capture the current model state of `policy`.
    pub fn capture(policy: &LinUcbPolicy) -> Self {
        let (a, b) = policy.arms();
        Self {
            n_actions: policy.n_actions(),
            feature_dim: policy.feature_dim(),
            alpha: policy.alpha(),
            a: a.iter().map(|m| m.as_slice().to_vec()).collect(),
            b: b.iter().map(|v| v.as_slice().to_vec()).collect(),
        }
    }

    /// Verify shape compatibility and replace `policy`'s model state.
    ///
    /// `n_actions` and `feature_dim` of the live policy stay as configured;
    /// they were just verified equal. `A`, `b` and `alpha` are replaced.
    pub fn apply_to(self, policy: &mut LinUcbPolicy) -> ArbiterResult<()> {
        if self.n_actions != policy.n_actions() {
            return Err(ArbiterError::IncompatibleSnapshot {
                field: "n_actions",
                expected: policy.n_actions(),
                found: self.n_actions,
            });
        }
        if self.feature_dim != policy.feature_dim() {
            return Err(ArbiterError::IncompatibleSnapshot {
                field: "feature_dim",
                expected: policy.feature_dim(),
                found: self.feature_dim,
            });
        }

        let dim = self.feature_dim;
        if self.a.len() != self.n_actions
            || self.b.len() != self.n_actions
            || self.a.iter().any(|m| m.len() != dim * dim)
            || self.b.iter().any(|v| v.len() != dim)
        {
            return Err(ArbiterError::Snapshot(
                "snapshot arrays do not match their declared shape".to_string(),
            ));
        }

        let a: Vec<DMatrix<f64>> = self
            .a
            .into_iter()
            .map(|m| DMatrix::from_column_slice(dim, dim, &m))
            .collect();
        let b: Vec<DVector<f64>> = self.b.into_iter().map(DVector::from_vec).collect();
        policy.restore(a, b, self.alpha);
        Ok(())
    }

    /// Deterministic storage location derived from the caller's path.
    pub fn storage_path(path: &Path) -> PathBuf {
        PathBuf::from(format!("{}.json", path.display()))
    }

    /// Write the snapshot blob to `Self::storage_path(path)`.
    pub fn write(&self, path: &Path) -> ArbiterResult<()> {
        let target = Self::storage_path(path);
        let blob = serde_json::to_vec(self)
            .map_err(|e| ArbiterError::Snapshot(format!("serialize failed: {e}")))?;
        fs::write(&target, blob)
            .map_err(|e| ArbiterError::Snapshot(format!("write {} failed: {e}", target.display())))?;
        info!(path = %target.display(), "policy snapshot saved");
        Ok(())
    }

    /// Read a snapshot blob from `Self::storage_path(path)`.
    pub fn read(path: &Path) -> ArbiterResult<Self> {
        let target = Self::storage_path(path);
        let blob = match fs::read(&target) {
            Ok(blob) => blob,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ArbiterError::SnapshotNotFound(target));
            }
            Err(e) => {
                return Err(ArbiterError::Snapshot(format!(
                    "read {} failed: {e}",
                    target.display()
                )));
            }
        };
        let snapshot: Self = serde_json::from_slice(&blob)
            .map_err(|e| ArbiterError::Snapshot(format!("parse failed: {e}")))?;
        info!(path = %target.display(), "policy snapshot loaded");
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ContextVector;

    fn trained_policy() -> LinUcbPolicy {
        let mut policy = LinUcbPolicy::new(2, 3, 0.5, 1.0).unwrap();
        let ctx_a = ContextVector::from_values(vec![1.0, 0.25, -0.5]);
        let ctx_b = ContextVector::from_values(vec![0.0, 1.0, 2.0]);
        for _ in 0..5 {
            policy.update(&ctx_a, 0, 1.0);
            policy.update(&ctx_b, 1, -0.25);
        }
        policy
    }

    #[test]
    fn save_load_round_trip_is_bit_identical() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model");

        let policy = trained_policy();
        PolicySnapshot::capture(&policy).write(&path).unwrap();

        let mut fresh = LinUcbPolicy::new(2, 3, 0.9, 1.0).unwrap();
        PolicySnapshot::read(&path).unwrap().apply_to(&mut fresh).unwrap();

        assert_eq!(fresh.alpha(), policy.alpha());
        let (a0, b0) = policy.arms();
        let (a1, b1) = fresh.arms();
        assert_eq!(a0, a1);
        assert_eq!(b0, b1);
    }

    #[test]
    fn load_from_missing_path_fails_with_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = PolicySnapshot::read(&dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, ArbiterError::SnapshotNotFound(_)));
    }

    #[test]
    fn incompatible_action_count_is_rejected_and_policy_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model");
        PolicySnapshot::capture(&trained_policy()).write(&path).unwrap();

        let mut three_arms = LinUcbPolicy::new(3, 3, 0.5, 1.0).unwrap();
        let before = three_arms.clone();
        let err = PolicySnapshot::read(&path)
            .unwrap()
            .apply_to(&mut three_arms)
            .unwrap_err();
        assert!(matches!(
            err,
            ArbiterError::IncompatibleSnapshot { field: "n_actions", .. }
        ));
        assert_eq!(before.arms(), three_arms.arms());
    }

    #[test]
    fn incompatible_feature_dim_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model");
        PolicySnapshot::capture(&trained_policy()).write(&path).unwrap();

        let mut wider = LinUcbPolicy::new(2, 8, 0.5, 1.0).unwrap();
        let err = PolicySnapshot::read(&path)
            .unwrap()
            .apply_to(&mut wider)
            .unwrap_err();
        assert!(matches!(
            err,
            ArbiterError::IncompatibleSnapshot { field: "feature_dim", .. }
        ));
    }

    #[test]
    fn storage_path_appends_json_suffix() {
        let path = PolicySnapshot::storage_path(Path::new("/tmp/run/model"));
        assert_eq!(path, PathBuf::from("/tmp/run/model.json"));
    }
}
