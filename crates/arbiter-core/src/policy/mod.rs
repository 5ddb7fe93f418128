//! Bandit policy layer.
//!
//! Currently one policy kind: disjoint LinUCB. The snapshot module handles
//! durable save/load of its model state.

pub mod linucb;
pub mod snapshot;

pub use self::linucb::LinUcbPolicy;
pub use self::snapshot::PolicySnapshot;
