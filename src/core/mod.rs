//! Core deterministic primitives.
//!
//! All types in this module are designed for cross-platform determinism.
//! They form the foundation for replayable gameplay.

pub mod fixed;
pub mod vec2;
pub mod kinematic;
pub mod hash;

// Re-export core types
pub use fixed::{Fixed, FIXED_ONE, FIXED_HALF, FIXED_SCALE, TICK_DURATION};
pub use vec2::FixedVec2;
pub use kinematic::advance;
pub use hash::{compute_state_hash, StateHash, StateHasher};
