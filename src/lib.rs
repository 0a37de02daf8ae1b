//! # Deflect
//!
//! Deterministic gameplay core for a 2D parry-the-bullet action game: a player
//! who runs, jumps and parries, turrets that fire on a timer, and projectiles
//! that a well-timed parry sends back to stun the turret.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         DEFLECT                              │
//! ├─────────────────────────────────────────────────────────────┤
//! │  config.rs       - Scene tunables, JSON loading, validation  │
//! │                                                              │
//! │  core/           - Deterministic primitives                  │
//! │  ├── fixed.rs    - Q16.16 fixed-point arithmetic             │
//! │  ├── vec2.rs     - 2D vector with fixed-point                │
//! │  ├── kinematic.rs- Per-tick position integration             │
//! │  └── hash.rs     - State hashing for verification            │
//! │                                                              │
//! │  game/           - Game logic (deterministic)                │
//! │  ├── input.rs    - Input frames, edges, recording            │
//! │  ├── player.rs   - Locomotion + combat state machines        │
//! │  ├── projectile.rs - Reflectable shots                       │
//! │  ├── turret.rs   - Fire / stun timers                        │
//! │  ├── world.rs    - Entity registry                           │
//! │  ├── ground.rs   - Ground probe port                         │
//! │  ├── contact.rs  - Overlap feed + contact resolution         │
//! │  ├── tick.rs     - Simulation loop                           │
//! │  ├── events.rs   - Output events                             │
//! │  └── presenter.rs- Event routing to sinks                    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism Guarantee
//!
//! The `core/` and `game/` modules are **100% deterministic**:
//! - No floating-point arithmetic in game logic (floats only at config load)
//! - No HashMap (uses BTreeMap for sorted iteration)
//! - No system time dependencies
//!
//! Given identical config and inputs, the simulation produces
//! **identical results** on any platform.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod config;
pub mod core;
pub mod game;

// Re-export commonly used types
pub use config::{ConfigError, SceneConfig};
pub use core::fixed::{Fixed, FIXED_ONE, FIXED_HALF, FIXED_SCALE};
pub use core::vec2::FixedVec2;
pub use game::input::{InputFrame, InputRecording};
pub use game::world::{EntityId, World};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Simulation tick rate (Hz)
pub const TICK_RATE: u32 = 60;
