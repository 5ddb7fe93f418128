//! Domain model (actions, contexts, IDs, records, errors).

pub mod action;
pub mod context;
pub mod errors;
pub mod ids;
pub mod record;

pub use self::action::ActionSet;
pub use self::context::ContextVector;
pub use self::errors::{ArbiterError, ArbiterResult};
pub use self::ids::{DecisionId, EventKey, TraceKey};
pub use self::record::{ExperienceRecord, PendingDecision};
