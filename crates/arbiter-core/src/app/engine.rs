//! DecisionEngine: the host-facing routing step.
//!
//! `decide` turns a state into an action name and records the decision in
//! up to three bookkeeping views (sequential slot, pending map, active
//! trace). `record_feedback` and `complete_trace` resolve those views back
//! into policy updates and experience records.
//!
//! All operations run to completion synchronously. The engine has a
//! single-writer model: every mutating operation takes `&mut self`, so a
//! host that shares one instance across threads must wrap it in its own
//! lock.

use std::collections::HashMap;
use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::domain::{
    ActionSet, ArbiterError, ArbiterResult, DecisionId, EventKey, ExperienceRecord,
    PendingDecision, TraceKey,
};
use crate::encoding::StateEncoder;
use crate::policy::{LinUcbPolicy, PolicySnapshot};
use crate::ports::{Clock, ExperienceStore, RewardScorer};

/// Keys probed for an asynchronous-feedback identifier, in priority order.
const EVENT_ID_KEYS: [&str; 3] = ["event_id", "id", "run_id"];

/// Key carrying a trajectory identifier.
const TRACE_ID_KEY: &str = "trace_id";

/// Online decision engine: LinUCB policy plus feedback routing.
pub struct DecisionEngine {
    actions: ActionSet,
    encoder: StateEncoder,
    policy: LinUcbPolicy,
    store: Box<dyn ExperienceStore>,
    scorer: Option<Box<dyn RewardScorer>>,
    clock: Box<dyn Clock>,
    value_key: Option<String>,

    /// Most recent decision, for identifier-less sequential feedback.
    /// Overwritten by every `decide`, cleared when consumed.
    last_decision: Option<PendingDecision>,
    /// Decisions addressable by caller-supplied event id. Entries that
    /// never receive feedback stay here; that leak is the caller's
    /// responsibility.
    pending: HashMap<EventKey, PendingDecision>,
    /// Open trajectories keyed by trace id, oldest step first.
    traces: HashMap<TraceKey, Vec<PendingDecision>>,
}

impl DecisionEngine {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_parts(
        actions: ActionSet,
        encoder: StateEncoder,
        policy: LinUcbPolicy,
        store: Box<dyn ExperienceStore>,
        scorer: Option<Box<dyn RewardScorer>>,
        clock: Box<dyn Clock>,
        value_key: Option<String>,
    ) -> Self {
        Self {
            actions,
            encoder,
            policy,
            store,
            scorer,
            clock,
            value_key,
            last_decision: None,
            pending: HashMap::new(),
            traces: HashMap::new(),
        }
    }

    /// Route one request: encode the state, select an action, record the
    /// decision for later feedback, and return the action's name.
    ///
    /// Does not mutate the policy or the experience store. The same call
    /// may populate the sequential slot, a pending-map entry and a trace
    /// step at once; each view is consumed independently by feedback.
    pub fn decide(&mut self, state: &Value) -> ArbiterResult<String> {
        let value = self.value_to_encode(state);
        let context = self.encoder.encode(value)?;
        let action_index = self.policy.select(&context);
        let decision = PendingDecision::new(DecisionId::generate(), context, action_index);

        let action_name = self
            .actions
            .name(action_index)
            .expect("policy selects within the action set")
            .to_string();

        // Sequential slot is refreshed unconditionally; a decision that is
        // also tracked by id or trace still overwrites it.
        self.last_decision = Some(decision.clone());

        if let Some(key) = extract_key(state, &EVENT_ID_KEYS) {
            debug!(decision_id = %decision.decision_id, event_id = %key, "decision pending by event id");
            self.pending.insert(EventKey::new(key), decision.clone());
        }

        if let Some(key) = extract_key(state, &[TRACE_ID_KEY]) {
            debug!(decision_id = %decision.decision_id, trace_id = %key, "decision appended to trace");
            self.traces
                .entry(TraceKey::new(key))
                .or_default()
                .push(decision.clone());
        }

        debug!(decision_id = %decision.decision_id, action = %action_name, "decision made");
        Ok(action_name)
    }

    /// Resolve feedback for one decision.
    ///
    /// With `event_id`, the matching pending entry is consumed; an unknown
    /// id is a silent no-op (protects against double application and
    /// out-of-order delivery). Without it, the sequential slot is consumed;
    /// an empty slot is likewise a no-op, which makes sequential feedback
    /// idempotent by construction.
    ///
    /// When `reward` is absent the configured scorer computes one from
    /// `result` (0.0 without a scorer). A non-finite reward fails with
    /// [`ArbiterError::InvalidReward`] before anything is consumed or
    /// mutated, so the caller may retry the same feedback with a finite
    /// reward and still hit the original decision.
    pub fn record_feedback(
        &mut self,
        result: &Value,
        reward: Option<f64>,
        event_id: Option<&str>,
    ) -> ArbiterResult<()> {
        // Reward resolution needs only `result`, so validation can run
        // before the slot or the pending entry is touched.
        let reward = match reward {
            Some(reward) => reward,
            None => self
                .scorer
                .as_ref()
                .map(|scorer| scorer.score(result))
                .unwrap_or(0.0),
        };
        if !reward.is_finite() {
            return Err(ArbiterError::InvalidReward(reward));
        }

        let (decision, metadata) = match event_id {
            Some(id) => match self.pending.remove(&EventKey::new(id)) {
                Some(decision) => (decision, Some(serde_json::json!({ "event_id": id }))),
                None => {
                    debug!(event_id = id, "no pending decision for event id, ignoring feedback");
                    return Ok(());
                }
            },
            None => match self.last_decision.take() {
                Some(decision) => (decision, None),
                None => {
                    debug!("no decision awaiting sequential feedback, ignoring");
                    return Ok(());
                }
            },
        };

        self.apply(decision, reward, metadata)
    }

    /// Complete a trajectory: fan one final reward out over every recorded
    /// step, newest first, discounting by `decay` per step backwards.
    ///
    /// The newest step receives `final_reward` unmodified; `decay = 1.0`
    /// gives every step equal credit. An unknown trace id is a silent
    /// no-op. The trace is consumed exactly once: it is removed before
    /// reward validation, so resubmission after a validation failure finds
    /// nothing.
    pub fn complete_trace(
        &mut self,
        trace_id: &str,
        final_reward: f64,
        decay: f64,
    ) -> ArbiterResult<()> {
        let Some(steps) = self.traces.remove(&TraceKey::new(trace_id)) else {
            debug!(trace_id, "no active trace, ignoring completion");
            return Ok(());
        };
        if !final_reward.is_finite() {
            return Err(ArbiterError::InvalidReward(final_reward));
        }
        // A non-finite decay would smuggle non-finite rewards into every
        // step after the first; reject it under the same condition.
        if !decay.is_finite() {
            return Err(ArbiterError::InvalidReward(decay));
        }

        debug!(trace_id, steps = steps.len(), final_reward, decay, "completing trace");
        let mut running = final_reward;
        for (processed, step) in steps.into_iter().rev().enumerate() {
            if processed > 0 {
                running *= decay;
            }
            let metadata = serde_json::json!({ "trace_id": trace_id });
            self.apply(step, running, Some(metadata))?;
        }
        Ok(())
    }

    /// [`Self::complete_trace`] with equal credit for every step.
    pub fn complete_trace_uniform(
        &mut self,
        trace_id: &str,
        final_reward: f64,
    ) -> ArbiterResult<()> {
        self.complete_trace(trace_id, final_reward, 1.0)
    }

    /// Serialize the policy model to `<path>.json`.
    pub fn save_policy(&self, path: &Path) -> ArbiterResult<()> {
        PolicySnapshot::capture(&self.policy).write(path)
    }

    /// Replace the policy model from `<path>.json`.
    ///
    /// Fails with [`ArbiterError::SnapshotNotFound`] when no blob exists
    /// and [`ArbiterError::IncompatibleSnapshot`] on a shape mismatch; the
    /// live policy is untouched on every failure path.
    pub fn load_policy(&mut self, path: &Path) -> ArbiterResult<()> {
        PolicySnapshot::read(path)?.apply_to(&mut self.policy)
    }

    /// Policy update plus experience append, in that order. A store failure
    /// surfaces to the caller but the model update has already happened.
    fn apply(
        &mut self,
        decision: PendingDecision,
        reward: f64,
        metadata: Option<Value>,
    ) -> ArbiterResult<()> {
        self.policy
            .update(&decision.context, decision.action_index, reward);
        let record = ExperienceRecord::new(&decision, reward, self.clock.now(), metadata);
        debug!(decision_id = %decision.decision_id, reward, "feedback applied");
        self.store.add(record)
    }

    fn value_to_encode<'a>(&self, state: &'a Value) -> &'a Value {
        match &self.value_key {
            Some(key) => state.get(key).unwrap_or(state),
            None => state,
        }
    }

    // ----- inspection -----

    pub fn actions(&self) -> &ActionSet {
        &self.actions
    }

    pub fn policy(&self) -> &LinUcbPolicy {
        &self.policy
    }

    /// Snapshot of the experience log, insertion order.
    pub fn experience(&self) -> Vec<ExperienceRecord> {
        self.store.records()
    }

    pub fn experience_len(&self) -> usize {
        self.store.len()
    }

    /// True while a sequential decision awaits feedback.
    pub fn has_sequential_pending(&self) -> bool {
        self.last_decision.is_some()
    }

    /// True while `event_id` has an unresolved pending decision.
    pub fn has_pending(&self, event_id: &str) -> bool {
        self.pending.contains_key(&EventKey::new(event_id))
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Number of steps accumulated under `trace_id`, if the trace is open.
    pub fn trace_len(&self, trace_id: &str) -> Option<usize> {
        self.traces.get(&TraceKey::new(trace_id)).map(Vec::len)
    }
}

// The port boxes are not Debug, so the derive is unavailable.
impl std::fmt::Debug for DecisionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecisionEngine")
            .field("actions", &self.actions)
            .field("policy", &self.policy)
            .field("value_key", &self.value_key)
            .field("sequential_pending", &self.last_decision.is_some())
            .field("pending", &self.pending.len())
            .field("traces", &self.traces.len())
            .finish_non_exhaustive()
    }
}

/// First key in `keys` present on an object state with a string or number
/// value, normalized to a string. Other value shapes are skipped.
fn extract_key(state: &Value, keys: &[&str]) -> Option<String> {
    let object = state.as_object()?;
    for key in keys {
        match object.get(*key) {
            Some(Value::String(s)) => return Some(s.clone()),
            Some(Value::Number(n)) => return Some(n.to_string()),
            _ => continue,
        }
    }
    None
}
