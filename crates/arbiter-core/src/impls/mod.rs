//! Default implementations of the ports (開発用).

pub mod hash_encoder;
pub mod memory_store;
pub mod scorers;

pub use self::hash_encoder::HashedProjectionEncoder;
pub use self::memory_store::InMemoryStore;
pub use self::scorers::ErrorKeyScorer;
