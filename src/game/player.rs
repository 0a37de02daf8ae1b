//! Player Controller
//!
//! Two composed state machines, driven once per tick:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  update()      free-running: sample input, advance combat    │
//! │                timers, exit checks, parry entry              │
//! │  fixed_step()  physics: ground probe, Move(), integrate      │
//! ├──────────────────────────────────────────────────────────────┤
//! │  Combat      Normal ──parry──▶ Parrying ──timer──▶ Normal    │
//! │                 └──take_damage──▶ Damaged ──timer──▶ Normal  │
//! │  Locomotion  Grounded ◀──probe──▶ Airborne                   │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! While combat is Parrying or Damaged, locomotion does not run and velocity
//! is held at zero. The deflect window (`can_reflect`) is the first
//! `parry_time` seconds of a parry; the remaining `parry_cooldown` is recovery.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::config::PlayerTuning;
use crate::core::fixed::{fixed_clamp, fixed_mul, Fixed};
use crate::core::hash::StateHasher;
use crate::core::kinematic::advance;
use crate::core::vec2::FixedVec2;
use crate::game::events::{Cue, EventLog, GameEventData, VisualState};
use crate::game::ground::GroundProbe;
use crate::game::input::InputFrame;
use crate::game::world::EntityId;

/// Horizontal facing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Facing {
    /// Facing -X
    Left,
    /// Facing +X
    #[default]
    Right,
}

impl Facing {
    /// +1 for Right, -1 for Left.
    #[inline]
    pub fn sign(self) -> i32 {
        match self {
            Facing::Left => -1,
            Facing::Right => 1,
        }
    }

    /// The opposite facing.
    #[inline]
    pub fn flipped(self) -> Self {
        match self {
            Facing::Left => Facing::Right,
            Facing::Right => Facing::Left,
        }
    }
}

/// Combat state. Exclusive by construction: a player is never parrying and
/// damaged at once.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum CombatState {
    /// Locomotion has control
    #[default]
    Normal = 0,
    /// Parry stance (window, then recovery)
    Parrying = 1,
    /// Hurt stun
    Damaged = 2,
}

/// Player entity state.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Player {
    /// Entity handle
    pub id: EntityId,

    /// Current position
    pub position: FixedVec2,

    /// Per-tick displacement
    pub velocity: FixedVec2,

    /// Facing direction (mirrors the sprite)
    pub facing: Facing,

    /// Result of the last ground probe
    pub grounded: bool,

    /// Last visual state sent to the animator
    pub visual: VisualState,

    /// Combat state
    pub combat: CombatState,

    /// Seconds since the current parry started
    pub parry_timer: Fixed,

    /// Seconds since the current hurt stun started
    pub damage_timer: Fixed,

    /// Movement and combat tunables
    pub tuning: PlayerTuning,

    /// Scene gravity per airborne tick (before `gravity_multiplier`)
    pub gravity: Fixed,

    /// Input sampled by the last `update`, consumed by `fixed_step`
    #[serde(skip)]
    input: InputFrame,
}

impl Player {
    /// Create a player standing at `position`.
    pub fn new(id: EntityId, position: FixedVec2, tuning: PlayerTuning, gravity: Fixed) -> Self {
        Self {
            id,
            position,
            velocity: FixedVec2::ZERO,
            facing: Facing::Right,
            grounded: true,
            visual: VisualState::Idle,
            combat: CombatState::Normal,
            parry_timer: 0,
            damage_timer: 0,
            tuning,
            gravity,
            input: InputFrame::new(),
        }
    }

    /// In parry stance (window or recovery).
    #[inline]
    pub fn is_parrying(&self) -> bool {
        self.combat == CombatState::Parrying
    }

    /// In hurt stun.
    #[inline]
    pub fn is_damaged(&self) -> bool {
        self.combat == CombatState::Damaged
    }

    /// Deflect window is open: parrying and `parry_timer < parry_time`.
    #[inline]
    pub fn can_reflect(&self) -> bool {
        self.is_parrying() && self.parry_timer < self.tuning.parry_time
    }

    /// Combat currently owns velocity and visuals.
    #[inline]
    pub fn combat_locked(&self) -> bool {
        self.combat != CombatState::Normal
    }

    /// Input sampled this tick.
    #[inline]
    pub fn input(&self) -> InputFrame {
        self.input
    }

    fn set_visual(&mut self, state: VisualState, log: &mut EventLog) {
        if self.visual != state {
            self.visual = state;
            log.visual(self.id, state);
        }
    }

    // =========================================================================
    // Free-running phase
    // =========================================================================

    /// Sample input, advance combat timers and handle parry entry.
    pub fn update(&mut self, input: InputFrame, dt: Fixed, log: &mut EventLog) {
        self.input = input;

        match self.combat {
            CombatState::Parrying => {
                let window_was_open = self.can_reflect();
                self.parry_timer = self.parry_timer.saturating_add(dt);
                if window_was_open && !self.can_reflect() {
                    trace!(player = self.id.0, "deflect window closed");
                }
                if self.parry_timer >= self.tuning.parry_total() {
                    self.combat = CombatState::Normal;
                    self.set_visual(VisualState::Idle, log);
                    debug!(player = self.id.0, "parry ended");
                }
            }
            CombatState::Damaged => {
                self.damage_timer = self.damage_timer.saturating_add(dt);
                if self.damage_timer >= self.tuning.damage_time {
                    self.combat = CombatState::Normal;
                    self.set_visual(VisualState::Idle, log);
                    debug!(player = self.id.0, "recovered from damage");
                }
            }
            CombatState::Normal => {}
        }

        if input.parry_pressed() {
            self.try_parry(log);
        }
    }

    /// Enter parry stance. Requires being grounded and in Normal combat state.
    ///
    /// Returns true if the parry started.
    pub fn try_parry(&mut self, log: &mut EventLog) -> bool {
        if !self.grounded || self.combat != CombatState::Normal {
            return false;
        }

        self.combat = CombatState::Parrying;
        self.parry_timer = 0;
        self.velocity = FixedVec2::ZERO;
        self.set_visual(VisualState::Parry, log);
        log.cue(self.id, Cue::Parry);
        debug!(player = self.id.0, "parry started");
        true
    }

    /// A projectile was deflected: skip the rest of the parry.
    ///
    /// The timer jumps to the end of recovery so the next `update` exits the
    /// parry; the sprite returns to Idle right away.
    pub fn activate_parry(&mut self, log: &mut EventLog) {
        self.parry_timer = self.tuning.parry_total();
        self.set_visual(VisualState::Idle, log);
        debug!(player = self.id.0, "parry landed, recovery skipped");
    }

    /// Enter hurt stun. Cancels a parry in progress; restarts the stun if
    /// already hurt.
    pub fn take_damage(&mut self, log: &mut EventLog) {
        self.combat = CombatState::Damaged;
        self.damage_timer = 0;
        self.velocity = FixedVec2::ZERO;
        self.set_visual(VisualState::Hurt, log);
        log.cue(self.id, Cue::Damage);
        debug!(player = self.id.0, "took damage");
    }

    // =========================================================================
    // Physics phase
    // =========================================================================

    /// Probe for ground, run locomotion (unless combat-locked), integrate.
    pub fn fixed_step<G: GroundProbe + ?Sized>(&mut self, ground: &G, log: &mut EventLog) {
        self.check_ground(ground);

        if self.combat_locked() {
            self.velocity = FixedVec2::ZERO;
        } else {
            self.locomote(log);
        }

        self.position = advance(self.position, self.velocity);
    }

    /// Re-probe while grounded or falling. Rising players stay airborne
    /// without probing, so a jump is not cancelled by the floor it left.
    fn check_ground<G: GroundProbe + ?Sized>(&mut self, ground: &G) {
        if self.grounded || self.velocity.y < 0 {
            let probe = self.position + self.tuning.ground_check_offset;
            self.grounded = ground.overlaps_ground(
                probe,
                self.tuning.ground_probe_radius,
                self.tuning.ground_mask,
                self.id,
            );
        }
    }

    fn locomote(&mut self, log: &mut EventLog) {
        if self.input.jump_pressed() {
            self.jump(log);
            self.grounded = false;
        }

        if self.grounded {
            self.ground_move(log);
        } else {
            self.air_move();
        }
    }

    fn jump(&mut self, log: &mut EventLog) {
        self.velocity.y = self.tuning.jump_speed;
        self.set_visual(VisualState::Jump, log);
        log.cue(self.id, Cue::Jump);
        trace!(player = self.id.0, "jump");
    }

    fn ground_move(&mut self, log: &mut EventLog) {
        let axis = self.input.horizontal();
        let run_speed = self.tuning.run_speed;
        let mut vx = self.velocity.x;

        if axis != 0 {
            vx = vx.wrapping_add(fixed_mul(axis, self.tuning.run_acceleration));
            self.set_visual(VisualState::Run, log);
        } else {
            vx = skid(vx, self.tuning.run_skid, run_speed);
            if vx == 0 {
                self.set_visual(VisualState::Idle, log);
            }
        }

        self.velocity.x = fixed_clamp(vx, -run_speed, run_speed);
        self.velocity.y = 0;

        let wants_right = axis > 0 && self.facing == Facing::Left;
        let wants_left = axis < 0 && self.facing == Facing::Right;
        if wants_right || wants_left {
            self.flip(log);
        }
    }

    fn air_move(&mut self) {
        let axis = self.input.horizontal();
        let air_speed = self.tuning.air_speed;
        let mut vx = self.velocity.x;

        if axis != 0 {
            vx = vx.wrapping_add(fixed_mul(axis, self.tuning.air_acceleration));
        } else {
            vx = skid(vx, self.tuning.air_skid, air_speed);
        }
        self.velocity.x = fixed_clamp(vx, -air_speed, air_speed);

        let gravity = fixed_mul(self.gravity, self.tuning.gravity_multiplier);
        let vy = self.velocity.y.wrapping_add(gravity);
        self.velocity.y = fixed_clamp(vy, -self.tuning.fall_speed, self.tuning.jump_speed);
    }

    fn flip(&mut self, log: &mut EventLog) {
        self.facing = self.facing.flipped();
        log.push(GameEventData::FacingChanged {
            entity: self.id,
            facing: self.facing,
        });
    }

    /// Hash this player's state for verification.
    pub fn hash_into(&self, hasher: &mut StateHasher) {
        hasher.update_u32(self.id.0);
        hasher.update_vec2(self.position);
        hasher.update_vec2(self.velocity);
        hasher.update_bool(self.facing == Facing::Right);
        hasher.update_bool(self.grounded);
        hasher.update_u8(self.visual as u8);
        hasher.update_u8(self.combat as u8);
        hasher.update_fixed(self.parry_timer);
        hasher.update_fixed(self.damage_timer);
    }
}

/// Decelerate toward zero by `amount` without crossing it.
#[inline]
fn skid(vx: Fixed, amount: Fixed, cap: Fixed) -> Fixed {
    if vx > 0 {
        fixed_clamp(vx.wrapping_sub(amount), 0, cap)
    } else {
        fixed_clamp(vx.wrapping_add(amount), -cap, 0)
    }
}

// =============================================================================
// TESTS
// =============================================================================
