//! Game Events
//!
//! Everything the simulation wants the outside world to do or know about is
//! emitted as a value: visual state changes, audio cues, spawns, destroys,
//! combat outcomes. Adapters consume them (see `game::presenter`); the core
//! never calls into a renderer or mixer directly.

use serde::{Serialize, Deserialize};
use crate::core::vec2::FixedVec2;
use crate::game::player::Facing;
use crate::game::world::{EntityId, EntityKind};

/// Visual state of an animated entity (the animator's "State" parameter).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum VisualState {
    /// Standing still
    #[default]
    Idle = 0,
    /// Running on the ground
    Run = 1,
    /// Jumping / airborne after a jump
    Jump = 2,
    /// Hurt stun
    Hurt = 3,
    /// Parry stance
    Parry = 4,
}

/// Fire-and-forget audio cue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Cue {
    /// Player jumped
    Jump = 0,
    /// Player started a parry
    Parry = 1,
    /// Player took damage
    Damage = 2,
    /// Turret fired
    TurretFire = 3,
    /// Turret was hit by a reflected projectile
    TurretHit = 4,
}

/// Why an entity was destroyed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DestroyReason {
    /// Projectile lifespan ran out
    Expired,
    /// Projectile hit a player who could not deflect it
    HitPlayer,
    /// Reflected projectile hit a turret
    HitTurret,
    /// Removed by an external system (e.g. turret Kill)
    Killed,
}

/// Game event data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEventData {
    /// Entity's visual state changed
    VisualStateChanged {
        entity: EntityId,
        state: VisualState,
    },

    /// Player turned around (mirror horizontal scale)
    FacingChanged {
        entity: EntityId,
        facing: Facing,
    },

    /// Play an audio cue at an entity
    CuePlayed {
        entity: EntityId,
        cue: Cue,
    },

    /// Turret stun overlay shown or hidden
    StunOverlayChanged {
        turret: EntityId,
        visible: bool,
    },

    /// New entity entered the world
    Spawned {
        entity: EntityId,
        kind: EntityKind,
        position: FixedVec2,
        velocity: FixedVec2,
    },

    /// Player deflected a projectile
    ProjectileReflected {
        projectile: EntityId,
        player: EntityId,
        velocity: FixedVec2,
    },

    /// Player was hit
    PlayerDamaged {
        player: EntityId,
        projectile: EntityId,
    },

    /// Turret was stunned by a reflected projectile
    TurretStunned {
        turret: EntityId,
        projectile: EntityId,
    },

    /// Turret stun wore off
    TurretRecovered {
        turret: EntityId,
    },

    /// Entity left the world
    Destroyed {
        entity: EntityId,
        reason: DestroyReason,
    },
}

/// A game event stamped with its tick.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEvent {
    /// Tick when event occurred
    pub tick: u32,
    /// Event data
    pub data: GameEventData,
}

/// Per-tick event buffer, in emission order.
///
/// Entity methods push into this instead of holding a reference to the world,
/// so a player can be borrowed mutably alongside the log.
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    tick: u32,
    events: Vec<GameEvent>,
}

impl EventLog {
    /// Empty log starting at tick 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp subsequent events with `tick`.
    pub fn set_tick(&mut self, tick: u32) {
        self.tick = tick;
    }

    /// Current stamp.
    pub fn tick(&self) -> u32 {
        self.tick
    }

    /// Record an event.
    pub fn push(&mut self, data: GameEventData) {
        self.events.push(GameEvent { tick: self.tick, data });
    }

    /// Shorthand for a visual state change.
    pub fn visual(&mut self, entity: EntityId, state: VisualState) {
        self.push(GameEventData::VisualStateChanged { entity, state });
    }

    /// Shorthand for an audio cue.
    pub fn cue(&mut self, entity: EntityId, cue: Cue) {
        self.push(GameEventData::CuePlayed { entity, cue });
    }

    /// Events recorded so far.
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Take pending events (consumes them).
    pub fn take(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
