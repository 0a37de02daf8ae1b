//! Projectile
//!
//! Straight-line shot fired by a turret. A player inside the deflect window
//! reflects it (reverse and double speed); a reflected shot stuns the turret it
//! reaches. Unresolved shots expire after their lifespan.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::fixed::Fixed;
use crate::core::hash::StateHasher;
use crate::core::kinematic::advance;
use crate::core::vec2::FixedVec2;
use crate::game::world::EntityId;

/// Speed multiplier applied by a reflect.
pub const REFLECT_SPEED_FACTOR: i32 = 2;

/// Projectile entity state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Projectile {
    /// Entity handle
    pub id: EntityId,

    /// Entity that fired it
    pub owner: EntityId,

    /// Current position
    pub position: FixedVec2,

    /// Per-tick displacement
    pub velocity: FixedVec2,

    /// One-way latch set by the first reflect
    pub parried: bool,

    /// Seconds until the projectile expires
    pub remaining_life: Fixed,
}

impl Projectile {
    /// Create an unreflected projectile.
    pub fn new(
        id: EntityId,
        owner: EntityId,
        position: FixedVec2,
        velocity: FixedVec2,
        lifespan: Fixed,
    ) -> Self {
        Self {
            id,
            owner,
            position,
            velocity,
            parried: false,
            remaining_life: lifespan,
        }
    }

    /// Reverse and double the velocity, latching `parried`.
    ///
    /// Only the first call has an effect. Returns true if this call
    /// reflected the projectile.
    pub fn reflect(&mut self) -> bool {
        if self.parried {
            return false;
        }
        self.parried = true;
        self.velocity = self.velocity.negate().scale_int(REFLECT_SPEED_FACTOR);
        debug!(projectile = self.id.0, velocity = %self.velocity, "projectile reflected");
        true
    }

    /// Count the lifespan down by `dt`.
    ///
    /// Returns true on the tick the lifespan runs out. The caller destroys the
    /// projectile then, so expiry is reported once.
    pub fn age(&mut self, dt: Fixed) -> bool {
        self.remaining_life = self.remaining_life.saturating_sub(dt);
        self.remaining_life <= 0
    }

    /// Move by one tick of velocity.
    #[inline]
    pub fn integrate(&mut self) {
        self.position = advance(self.position, self.velocity);
    }

    /// Hash this projectile's state for verification.
    pub fn hash_into(&self, hasher: &mut StateHasher) {
        hasher.update_u32(self.id.0);
        hasher.update_u32(self.owner.0);
        hasher.update_vec2(self.position);
        hasher.update_vec2(self.velocity);
        hasher.update_bool(self.parried);
        hasher.update_fixed(self.remaining_life);
    }
}
