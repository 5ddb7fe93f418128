//! arbiter-core
//!
//! Online decision engine: a contextual bandit (disjoint LinUCB) behind a
//! feedback-routing front end.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（ids, action, context, record, errors）
//! - **ports**: 抽象化レイヤー（Encoder, RewardScorer, ExperienceStore, Clock）
//! - **policy**: LinUCB 本体とスナップショット（linucb, snapshot）
//! - **app**: アプリケーションロジック（engine, builder）
//! - **impls**: 実装（HashedProjectionEncoder など開発用）
//!
//! # 最小構成の例
//! ```
//! use arbiter_core::EngineBuilder;
//! use serde_json::json;
//!
//! let mut engine = EngineBuilder::new(["fast_path", "thorough_path"])
//!     .feature_dim(16)
//!     .build()
//!     .unwrap();
//!
//! let action = engine.decide(&json!({ "value": "large batch request" })).unwrap();
//! // ... run the chosen action, observe the outcome ...
//! engine.record_feedback(&json!({ "result": "ok" }), Some(1.0), None).unwrap();
//! assert!(["fast_path", "thorough_path"].contains(&action.as_str()));
//! ```

pub mod app;
pub mod config;
pub mod domain;
pub mod encoding;
pub mod impls;
pub mod policy;
pub mod ports;

pub use app::{DecisionEngine, EngineBuilder};
pub use config::{EngineConfig, PolicyKind};
pub use domain::{ActionSet, ArbiterError, ArbiterResult, ContextVector, ExperienceRecord};
pub use policy::{LinUcbPolicy, PolicySnapshot};
