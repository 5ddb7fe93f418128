//! In-memory experience store (開発・テスト用).

use tracing::debug;

use crate::domain::{ArbiterResult, ContextVector, ExperienceRecord};
use crate::ports::ExperienceStore;

/// Vec-backed experience log.
///
/// Offers a naive cosine-similarity lookup over the log for offline
/// analysis. Nothing here is consulted by the decision path.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    records: Vec<ExperienceRecord>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Top-`k` records by cosine similarity to `context`, most similar
    /// first. Linear scan; fine for in-memory log sizes.
    pub fn nearest(&self, context: &ContextVector, k: usize) -> Vec<(ExperienceRecord, f64)> {
        let mut scored: Vec<(ExperienceRecord, f64)> = self
            .records
            .iter()
            .map(|r| (r.clone(), r.context.cosine(context)))
            .collect();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.truncate(k);
        scored
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}

impl ExperienceStore for InMemoryStore {
    fn add(&mut self, record: ExperienceRecord) -> ArbiterResult<()> {
        debug!(decision_id = %record.decision_id, reward = record.reward, "experience recorded");
        self.records.push(record);
        Ok(())
    }

    fn records(&self) -> Vec<ExperienceRecord> {
        self.records.clone()
    }

    fn len(&self) -> usize {
        self.records.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DecisionId, PendingDecision};
    use chrono::Utc;

    fn record(values: Vec<f64>, action: usize, reward: f64) -> ExperienceRecord {
        let decision = PendingDecision::new(
            DecisionId::generate(),
            ContextVector::from_values(values),
            action,
        );
        ExperienceRecord::new(&decision, reward, Utc::now(), None)
    }

    #[test]
    fn preserves_insertion_order() {
        let mut store = InMemoryStore::new();
        store.add(record(vec![1.0, 0.0], 0, 1.0)).unwrap();
        store.add(record(vec![0.0, 1.0], 1, 0.0)).unwrap();

        let records = store.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].action_index, 0);
        assert_eq!(records[1].action_index, 1);
    }

    #[test]
    fn nearest_ranks_by_cosine_similarity() {
        let mut store = InMemoryStore::new();
        store.add(record(vec![1.0, 0.0], 0, 1.0)).unwrap();
        store.add(record(vec![0.0, 1.0], 1, 0.5)).unwrap();
        store.add(record(vec![0.9, 0.1], 0, 0.0)).unwrap();

        let query = ContextVector::from_values(vec![1.0, 0.0]);
        let hits = store.nearest(&query, 2);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].0.context.as_slice(), &[1.0, 0.0]);
        assert!(hits[0].1 >= hits[1].1);
        assert_eq!(hits[1].0.context.as_slice(), &[0.9, 0.1]);
    }

    #[test]
    fn clear_empties_the_log() {
        let mut store = InMemoryStore::new();
        store.add(record(vec![1.0], 0, 1.0)).unwrap();
        store.clear();
        assert!(store.is_empty());
    }
}
