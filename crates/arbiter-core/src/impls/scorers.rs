//! Stock reward scorers.

use serde_json::Value;

use crate::ports::RewardScorer;

/// Penalizes results that carry an error marker, rewards the rest.
///
/// Checks a result object for the configured error keys; a truthy value
/// under any of them yields the penalty, otherwise the success reward.
#[derive(Debug, Clone)]
pub struct ErrorKeyScorer {
    error_keys: Vec<String>,
    penalty: f64,
    success_reward: f64,
}

impl ErrorKeyScorer {
    pub fn new(error_keys: Vec<String>, penalty: f64, success_reward: f64) -> Self {
        Self {
            error_keys,
            penalty,
            success_reward,
        }
    }

    pub fn with_penalty(penalty: f64) -> Self {
        Self {
            penalty,
            ..Self::default()
        }
    }
}

impl Default for ErrorKeyScorer {
    fn default() -> Self {
        Self {
            error_keys: vec!["error".to_string(), "exception".to_string()],
            penalty: -1.0,
            success_reward: 1.0,
        }
    }
}

impl RewardScorer for ErrorKeyScorer {
    fn score(&self, result: &Value) -> f64 {
        if let Some(object) = result.as_object() {
            for key in &self.error_keys {
                if object.get(key).is_some_and(truthy) {
                    return self.penalty;
                }
            }
        }
        self.success_reward
    }
}

/// Truthiness of a JSON value: null, false, 0, "" and empty containers are
/// falsy, everything else is truthy.
fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
