//! Game Logic Module
//!
//! All gameplay simulation code. 100% deterministic.
//!
//! ## Module Structure
//!
//! - `input`: Input frames, edge detection, recording for replay
//! - `player`: Locomotion and combat state machines
//! - `projectile`: Reflectable shots with a lifespan
//! - `turret`: Fire and stun timers
//! - `world`: Entity registry and state hashing
//! - `ground`: Ground probe port and static level geometry
//! - `contact`: Overlap feed and contact resolution
//! - `tick`: Fixed-timestep simulation loop
//! - `events`: Events for presentation and replay
//! - `presenter`: Routes events to visual/audio/scene sinks

pub mod input;
pub mod player;
pub mod projectile;
pub mod turret;
pub mod world;
pub mod ground;
pub mod contact;
pub mod tick;
pub mod events;
pub mod presenter;

// Re-export key types
pub use input::{EdgeDetector, HeldButtons, InputDelta, InputFrame, InputRecording, MOVE_LUT};
pub use player::{CombatState, Facing, Player};
pub use projectile::Projectile;
pub use turret::Turret;
pub use world::{EntityId, EntityKind, World};
pub use ground::{GroundProbe, LayerMask, StaticGround};
pub use contact::{CircleOverlapFeed, Contact, ContactOutcome, OverlapFeed};
pub use tick::{replay, tick, TickResult};
pub use events::{GameEvent, GameEventData};
pub use presenter::{Presenter, PresenterBuilder};
