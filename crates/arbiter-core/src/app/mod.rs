//! Application layer (アプリケーション層).
//!
//! Wires the policy, encoder and ports into the host-facing
//! [`DecisionEngine`], constructed through [`EngineBuilder`].

pub mod builder;
pub mod engine;

pub use self::builder::EngineBuilder;
pub use self::engine::DecisionEngine;
