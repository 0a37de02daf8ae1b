//! Ground Probe
//!
//! The player decides Grounded/Airborne by asking whether a small circle
//! below its feet overlaps anything on a ground layer. The query is a port so
//! an engine adapter can answer it from its own broad-phase; `StaticGround`
//! answers it from a list of axis-aligned boxes.

use serde::{Deserialize, Serialize};

use crate::core::fixed::{fixed_sq_wide, Fixed};
use crate::core::vec2::FixedVec2;
use crate::game::world::EntityId;

/// Bitmask of collision layers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayerMask(pub u32);

impl LayerMask {
    /// Matches nothing
    pub const NONE: Self = Self(0);
    /// Default ground layer
    pub const GROUND: Self = Self(1);
    /// Matches every layer
    pub const ALL: Self = Self(u32::MAX);

    /// True when the two masks share at least one layer.
    #[inline]
    pub fn intersects(self, other: LayerMask) -> bool {
        self.0 & other.0 != 0
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        Self::GROUND
    }
}

/// Answers "is there ground under this point?" for the player state machine.
pub trait GroundProbe {
    /// True when a circle at `center` with `radius` overlaps a collider whose
    /// layer intersects `mask`, ignoring colliders owned by `exclude`.
    fn overlaps_ground(
        &self,
        center: FixedVec2,
        radius: Fixed,
        mask: LayerMask,
        exclude: EntityId,
    ) -> bool;
}

/// Axis-aligned ground box.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundCollider {
    /// Bottom-left corner
    pub min: FixedVec2,
    /// Top-right corner
    pub max: FixedVec2,
    /// Layer this box lives on
    pub layer: LayerMask,
    /// Entity the box belongs to, if any (excluded from its own probe)
    pub owner: Option<EntityId>,
}

impl GroundCollider {
    /// Unowned box on the default ground layer.
    pub fn new(min: FixedVec2, max: FixedVec2) -> Self {
        Self {
            min,
            max,
            layer: LayerMask::GROUND,
            owner: None,
        }
    }

    /// Circle-vs-box overlap (touching counts).
    pub fn overlaps_circle(&self, center: FixedVec2, radius: Fixed) -> bool {
        let closest = center.clamp_each(self.min, self.max);
        center.distance_squared_wide(closest) <= fixed_sq_wide(radius)
    }
}

/// Fixed level geometry.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StaticGround {
    colliders: Vec<GroundCollider>,
}

impl StaticGround {
    /// Empty level: every probe reports airborne.
    pub fn new() -> Self {
        Self::default()
    }

    /// Level with a single flat floor whose top surface is at `top`.
    pub fn flat_floor(top: Fixed, half_width: Fixed) -> Self {
        let mut ground = Self::new();
        ground.add(GroundCollider::new(
            FixedVec2::new(-half_width, top.wrapping_sub(crate::core::fixed::FIXED_ONE)),
            FixedVec2::new(half_width, top),
        ));
        ground
    }

    /// Add a collider.
    pub fn add(&mut self, collider: GroundCollider) {
        self.colliders.push(collider);
    }
}

impl GroundProbe for StaticGround {
    fn overlaps_ground(
        &self,
        center: FixedVec2,
        radius: Fixed,
        mask: LayerMask,
        exclude: EntityId,
    ) -> bool {
        self.colliders.iter().any(|c| {
            c.owner != Some(exclude)
                && c.layer.intersects(mask)
                && c.overlaps_circle(center, radius)
        })
    }
}
