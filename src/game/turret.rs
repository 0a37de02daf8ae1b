//! Turret
//!
//! Stationary shooter with two states: Active (fire timer counts up, fires at
//! the interval) and Stunned (stun timer counts up, fire timer frozen). A
//! reflected projectile stuns it; it never takes damage from its own shots.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::TurretTuning;
use crate::core::fixed::Fixed;
use crate::core::hash::StateHasher;
use crate::core::vec2::FixedVec2;
use crate::game::events::{Cue, EventLog, GameEventData};
use crate::game::world::EntityId;

/// A projectile the turret wants spawned this tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Shot {
    /// Muzzle position
    pub position: FixedVec2,
    /// Initial velocity
    pub velocity: FixedVec2,
}

/// Turret entity state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turret {
    /// Entity handle
    pub id: EntityId,

    /// Turret origin
    pub position: FixedVec2,

    /// Timing and muzzle placement
    pub tuning: TurretTuning,

    /// Speed given to fired projectiles
    pub muzzle_speed: Fixed,

    /// Seconds since the last shot (frozen while stunned)
    pub fire_timer: Fixed,

    /// Stunned by a reflected projectile
    pub stunned: bool,

    /// Seconds since the stun started
    pub stun_timer: Fixed,
}

impl Turret {
    /// Create an active turret with an empty fire timer.
    pub fn new(id: EntityId, position: FixedVec2, tuning: TurretTuning, muzzle_speed: Fixed) -> Self {
        Self {
            id,
            position,
            tuning,
            muzzle_speed,
            fire_timer: 0,
            stunned: false,
            stun_timer: 0,
        }
    }

    /// Advance timers by `dt`. Returns the shot to spawn, if the turret fired.
    pub fn update(&mut self, dt: Fixed, log: &mut EventLog) -> Option<Shot> {
        if self.stunned {
            self.stun_timer = self.stun_timer.saturating_add(dt);
            if self.stun_timer >= self.tuning.stun_duration {
                self.stunned = false;
                self.stun_timer = 0;
                log.push(GameEventData::StunOverlayChanged {
                    turret: self.id,
                    visible: false,
                });
                log.push(GameEventData::TurretRecovered { turret: self.id });
                debug!(turret = self.id.0, "turret recovered");
            }
            return None;
        }

        self.fire_timer = self.fire_timer.saturating_add(dt);
        if self.fire_timer < self.tuning.fire_interval {
            return None;
        }

        self.fire_timer = 0;
        log.cue(self.id, Cue::TurretFire);
        let shot = self.muzzle();
        debug!(turret = self.id.0, position = %shot.position, "turret fired");
        Some(shot)
    }

    /// Where and how fast the next projectile leaves the turret.
    pub fn muzzle(&self) -> Shot {
        Shot {
            position: self.position + self.tuning.spawn_offset,
            velocity: FixedVec2::new(self.muzzle_speed.wrapping_mul(self.tuning.facing.sign()), 0),
        }
    }

    /// Enter (or restart) the stun.
    pub fn stun(&mut self, log: &mut EventLog) {
        self.stunned = true;
        self.stun_timer = 0;
        log.push(GameEventData::StunOverlayChanged {
            turret: self.id,
            visible: true,
        });
        log.cue(self.id, Cue::TurretHit);
        debug!(turret = self.id.0, "turret stunned");
    }

    /// Hash this turret's state for verification.
    pub fn hash_into(&self, hasher: &mut StateHasher) {
        hasher.update_u32(self.id.0);
        hasher.update_vec2(self.position);
        hasher.update_fixed(self.fire_timer);
        hasher.update_bool(self.stunned);
        hasher.update_fixed(self.stun_timer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fixed::{to_fixed, FIXED_ONE};
    use crate::game::player::Facing;

    fn turret() -> Turret {
        let tuning = TurretTuning {
            fire_interval: to_fixed(1.0),
            stun_duration: to_fixed(1.0),
            ..TurretTuning::default()
        };
        Turret::new(EntityId(1), FixedVec2::from_ints(0, 2), tuning, to_fixed(5.0))
    }

    #[test]
    fn test_fires_at_interval() {
        let mut t = turret();
        let mut log = EventLog::new();
        let dt = to_fixed(0.25);

        for _ in 0..3 {
            assert!(t.update(dt, &mut log).is_none());
        }
        let shot = t.update(dt, &mut log).expect("fires at 1.0 s");
        assert_eq!(shot.position, FixedVec2::from_ints(1, 2));
        assert_eq!(shot.velocity, FixedVec2::new(to_fixed(5.0), 0));
        assert_eq!(t.fire_timer, 0);
        assert_eq!(
            log.events()[0].data,
            GameEventData::CuePlayed { entity: EntityId(1), cue: Cue::TurretFire }
        );
    }

    #[test]
    fn test_left_facing_shoots_left() {
        let mut t = turret();
        t.tuning.facing = Facing::Left;
        t.tuning.spawn_offset = FixedVec2::new(-FIXED_ONE, 0);

        let shot = t.muzzle();
        assert_eq!(shot.velocity.x, to_fixed(-5.0));
        assert_eq!(shot.position, FixedVec2::from_ints(-1, 2));
    }

    #[test]
    fn test_stun_freezes_fire_timer_then_recovers() {
        let mut t = turret();
        let mut log = EventLog::new();
        let dt = to_fixed(0.5);

        t.update(dt, &mut log);
        t.stun(&mut log);
        assert!(t.stunned);

        assert!(t.update(dt, &mut log).is_none());
        assert_eq!(t.fire_timer, dt);
        assert!(t.stunned);

        assert!(t.update(dt, &mut log).is_none());
        assert!(!t.stunned);
        assert_eq!(t.stun_timer, 0);
        assert!(log
            .events()
            .iter()
            .any(|e| e.data == GameEventData::StunOverlayChanged { turret: EntityId(1), visible: false }));
        assert!(log
            .events()
            .iter()
            .any(|e| e.data == GameEventData::TurretRecovered { turret: EntityId(1) }));

        // Active again: the remaining half interval fires
        assert!(t.update(dt, &mut log).is_some());
    }

    #[test]
    fn test_restun_restarts_clock() {
        let mut t = turret();
        let mut log = EventLog::new();
        let dt = to_fixed(0.75);

        t.stun(&mut log);
        t.update(dt, &mut log);
        assert_eq!(t.stun_timer, dt);

        t.stun(&mut log);
        assert!(t.stunned);
        assert_eq!(t.stun_timer, 0);

        // 0.75 s after the second stun: still stunned
        t.update(dt, &mut log);
        assert!(t.stunned);
        t.update(dt, &mut log);
        assert!(!t.stunned);
    }

    #[test]
    fn test_stun_emits_overlay_and_cue() {
        let mut t = turret();
        let mut log = EventLog::new();
        t.stun(&mut log);

        let data: Vec<_> = log.take().into_iter().map(|e| e.data).collect();
        assert_eq!(
            data,
            vec![
                GameEventData::StunOverlayChanged { turret: EntityId(1), visible: true },
                GameEventData::CuePlayed { entity: EntityId(1), cue: Cue::TurretHit },
            ]
        );
    }
}
