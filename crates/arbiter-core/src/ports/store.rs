//! ExperienceStore port: append-only log of applied updates.

use crate::domain::{ArbiterResult, ExperienceRecord};

/// Append-only log of `(context, action, reward, metadata)` records.
///
/// The engine appends one record per applied policy update, in update
/// order. The store is never consulted on the decision path; a failing
/// `add` therefore cannot corrupt the policy, which has already been
/// updated by the time the store is reached.
pub trait ExperienceStore: Send + Sync {
    fn add(&mut self, record: ExperienceRecord) -> ArbiterResult<()>;

    /// All records in insertion order.
    fn records(&self) -> Vec<ExperienceRecord>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
