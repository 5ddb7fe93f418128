//! DecisionEngine の組み立て (builder).
//!
//! Collects the action set, tuning knobs and port implementations, then
//! validates everything at once in `build`. Unset ports fall back to the
//! stock implementations, so `EngineBuilder::new(actions).build()` gives a
//! working engine with no external dependencies.

use crate::app::engine::DecisionEngine;
use crate::config::{EngineConfig, PolicyKind};
use crate::domain::{ActionSet, ArbiterResult};
use crate::encoding::StateEncoder;
use crate::impls::{HashedProjectionEncoder, InMemoryStore};
use crate::policy::LinUcbPolicy;
use crate::ports::{Clock, Encoder, ExperienceStore, RewardScorer, SystemClock};

/// Builder for [`DecisionEngine`].
pub struct EngineBuilder {
    actions: Vec<String>,
    config: EngineConfig,
    encoder: Option<Box<dyn Encoder>>,
    store: Option<Box<dyn ExperienceStore>>,
    scorer: Option<Box<dyn RewardScorer>>,
    clock: Option<Box<dyn Clock>>,
}

impl EngineBuilder {
    pub fn new<I, S>(actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            actions: actions.into_iter().map(Into::into).collect(),
            config: EngineConfig::default(),
            encoder: None,
            store: None,
            scorer: None,
            clock: None,
        }
    }

    /// Replace the whole configuration at once. Knob setters called after
    /// this still apply on top.
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn feature_dim(mut self, dim: usize) -> Self {
        self.config.feature_dim = dim;
        self
    }

    pub fn exploration_alpha(mut self, alpha: f64) -> Self {
        self.config.exploration_alpha = alpha;
        self
    }

    pub fn ridge_lambda(mut self, lambda: f64) -> Self {
        self.config.ridge_lambda = lambda;
        self
    }

    pub fn normalize(mut self, normalize: bool) -> Self {
        self.config.normalize = normalize;
        self
    }

    pub fn policy_kind(mut self, kind: PolicyKind) -> Self {
        self.config.policy = kind;
        self
    }

    /// Object field to extract and encode instead of the whole state.
    pub fn value_key(mut self, key: impl Into<String>) -> Self {
        self.config.value_key = Some(key.into());
        self
    }

    pub fn encoder(mut self, encoder: impl Encoder + 'static) -> Self {
        self.encoder = Some(Box::new(encoder));
        self
    }

    pub fn store(mut self, store: impl ExperienceStore + 'static) -> Self {
        self.store = Some(Box::new(store));
        self
    }

    pub fn reward_scorer(mut self, scorer: impl RewardScorer + 'static) -> Self {
        self.scorer = Some(Box::new(scorer));
        self
    }

    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Some(Box::new(clock));
        self
    }

    /// Validate and assemble. Fails on an empty or duplicated action set
    /// and on any out-of-range tuning knob; nothing is constructed until
    /// every check has passed.
    pub fn build(self) -> ArbiterResult<DecisionEngine> {
        let actions = ActionSet::new(self.actions)?;

        let policy = match self.config.policy {
            PolicyKind::Linucb => LinUcbPolicy::new(
                actions.len(),
                self.config.feature_dim,
                self.config.exploration_alpha,
                self.config.ridge_lambda,
            )?,
        };

        let inner = self
            .encoder
            .unwrap_or_else(|| Box::new(HashedProjectionEncoder::new(self.config.feature_dim)));
        let encoder = StateEncoder::new(self.config.feature_dim, self.config.normalize, inner);

        let store = self
            .store
            .unwrap_or_else(|| Box::new(InMemoryStore::new()));
        let clock = self.clock.unwrap_or_else(|| Box::new(SystemClock));

        Ok(DecisionEngine::from_parts(
            actions,
            encoder,
            policy,
            store,
            self.scorer,
            clock,
            self.config.value_key,
        ))
    }
}
