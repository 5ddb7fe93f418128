//! Decision bookkeeping records.
//!
//! A `decide` call leaves up to three views of itself behind: the sequential
//! slot, a pending-map entry, and a trace step. All three hold the same
//! [`PendingDecision`] data and are consumed independently by feedback.
//! Once feedback resolves a view, the applied update is logged as an
//! immutable [`ExperienceRecord`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::context::ContextVector;
use super::ids::DecisionId;

/// One recorded decision awaiting feedback: the exact context that was
/// scored and the action index that was selected for it.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingDecision {
    pub decision_id: DecisionId,
    pub context: ContextVector,
    pub action_index: usize,
}

impl PendingDecision {
    pub fn new(decision_id: DecisionId, context: ContextVector, action_index: usize) -> Self {
        Self {
            decision_id,
            context,
            action_index,
        }
    }
}

/// Immutable logged outcome of one applied update.
///
/// Appended to the experience store in the order updates occur; never
/// mutated, never consulted by the selection path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceRecord {
    pub decision_id: DecisionId,
    pub context: ContextVector,
    pub action_index: usize,
    pub reward: f64,
    pub recorded_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

impl ExperienceRecord {
    pub fn new(
        decision: &PendingDecision,
        reward: f64,
        recorded_at: DateTime<Utc>,
        metadata: Option<serde_json::Value>,
    ) -> Self {
        Self {
            decision_id: decision.decision_id,
            context: decision.context.clone(),
            action_index: decision.action_index,
            reward,
            recorded_at,
            metadata,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn experience_record_copies_decision_fields() {
        let decision = PendingDecision::new(
            DecisionId::generate(),
            ContextVector::from_values(vec![1.0, 0.0]),
            1,
        );
        let record = ExperienceRecord::new(&decision, 0.5, Utc::now(), None);
        assert_eq!(record.decision_id, decision.decision_id);
        assert_eq!(record.action_index, 1);
        assert_eq!(record.context, decision.context);
        assert_eq!(record.reward, 0.5);
    }

    #[test]
    fn experience_record_serializes_without_empty_metadata() {
        let decision = PendingDecision::new(
            DecisionId::generate(),
            ContextVector::from_values(vec![0.0]),
            0,
        );
        let record = ExperienceRecord::new(&decision, 1.0, Utc::now(), None);
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("metadata").is_none());
    }
}
