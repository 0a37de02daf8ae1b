//! Input Snapshot
//!
//! Per-tick logical intents: horizontal axis, jump, parry.
//! Jump and parry are rising-edge flags ("pressed this tick"), not held state;
//! `EdgeDetector` converts held buttons into edges for adapters that only
//! know what is currently down.
//!
//! The axis uses a lookup table (MOVE_LUT) for exact i8 to Fixed conversion.

use serde::{Serialize, Deserialize};
use crate::core::fixed::Fixed;
use crate::core::hash::{StateHash, StateHasher};
use crate::game::world::EntityId;

// =============================================================================
// AXIS LOOKUP TABLE
// =============================================================================

/// Lookup table for converting an i8 axis value to Fixed.
///
/// Maps [-127..+127] to [-1.0..+1.0] with floor division
/// `(value * 65536) / 127`. Index 128 (-128 as i8) is the "released"
/// sentinel and maps to 0.
pub static MOVE_LUT: [Fixed; 256] = {
    let mut lut = [0i32; 256];
    let mut i = 0i32;
    while i < 256 {
        let signed = if i < 128 { i } else { i - 256 };
        if signed == -128 {
            lut[i as usize] = 0;
        } else {
            lut[i as usize] = (signed * 65536) / 127;
        }
        i += 1;
    }
    lut
};

/// Convert i8 axis input to Fixed using lookup table.
#[inline]
pub fn move_to_fixed(input: i8) -> Fixed {
    MOVE_LUT[(input as u8) as usize]
}

// =============================================================================
// INPUT FRAME
// =============================================================================

/// Logical input for one player for one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InputFrame {
    /// Horizontal axis: -127 (left) to +127 (right).
    /// -128 = stick released, treated as zero.
    pub move_x: i8,

    /// Action flags (packed bits):
    /// - Bit 0: Jump pressed this tick
    /// - Bit 1: Parry pressed this tick
    pub flags: u8,
}

impl InputFrame {
    /// Released-stick sentinel
    pub const NO_INPUT: i8 = -128;

    /// Jump flag bit
    pub const FLAG_JUMP: u8 = 0x01;

    /// Parry flag bit
    pub const FLAG_PARRY: u8 = 0x02;

    /// Create an idle input frame.
    pub const fn new() -> Self {
        Self { move_x: 0, flags: 0 }
    }

    /// Create input with a horizontal axis value.
    pub const fn with_movement(move_x: i8) -> Self {
        Self { move_x, flags: 0 }
    }

    /// Idle frame with jump pressed.
    pub const fn jump() -> Self {
        Self { move_x: 0, flags: Self::FLAG_JUMP }
    }

    /// Idle frame with parry pressed.
    pub const fn parry() -> Self {
        Self { move_x: 0, flags: Self::FLAG_PARRY }
    }

    /// Horizontal axis in [-1, 1].
    #[inline]
    pub fn horizontal(&self) -> Fixed {
        move_to_fixed(self.move_x)
    }

    /// Check if jump was pressed this tick.
    #[inline]
    pub fn jump_pressed(&self) -> bool {
        self.flags & Self::FLAG_JUMP != 0
    }

    /// Check if parry was pressed this tick.
    #[inline]
    pub fn parry_pressed(&self) -> bool {
        self.flags & Self::FLAG_PARRY != 0
    }

    /// Check if this is an idle frame.
    #[inline]
    pub fn is_idle(&self) -> bool {
        self.horizontal() == 0 && self.flags == 0
    }

    /// Set jump flag.
    #[inline]
    pub fn set_jump(&mut self, pressed: bool) {
        if pressed {
            self.flags |= Self::FLAG_JUMP;
        } else {
            self.flags &= !Self::FLAG_JUMP;
        }
    }

    /// Set parry flag.
    #[inline]
    pub fn set_parry(&mut self, pressed: bool) {
        if pressed {
            self.flags |= Self::FLAG_PARRY;
        } else {
            self.flags &= !Self::FLAG_PARRY;
        }
    }
}

// =============================================================================
// EDGE DETECTION
// =============================================================================

/// Buttons currently held down, as reported by a device poller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HeldButtons {
    /// Horizontal axis
    pub move_x: i8,
    /// Jump held
    pub jump: bool,
    /// Parry held
    pub parry: bool,
}

/// Turns held-button polls into rising-edge `InputFrame`s.
#[derive(Clone, Copy, Debug, Default)]
pub struct EdgeDetector {
    prev_jump: bool,
    prev_parry: bool,
}

impl EdgeDetector {
    /// Fresh detector (nothing held).
    pub fn new() -> Self {
        Self::default()
    }

    /// Produce this tick's frame. A button reports pressed only on the
    /// first poll where it is held.
    pub fn sample(&mut self, held: HeldButtons) -> InputFrame {
        let mut frame = InputFrame::with_movement(held.move_x);
        frame.set_jump(held.jump && !self.prev_jump);
        frame.set_parry(held.parry && !self.prev_parry);
        self.prev_jump = held.jump;
        self.prev_parry = held.parry;
        frame
    }
}

// =============================================================================
// INPUT RECORDING
// =============================================================================

/// Delta-compressed input entry.
///
/// Only stored when input CHANGES (not every tick).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputDelta {
    /// Tick when this input state began
    pub tick: u32,
    /// The new input state
    pub frame: InputFrame,
}

/// Input recording for one player, used for replay and determinism checks.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InputRecording {
    /// Player the inputs belong to
    pub player_id: EntityId,

    /// Starting tick (usually 1, the first simulated tick)
    pub start_tick: u32,

    /// Last recorded tick
    pub end_tick: u32,

    deltas: Vec<InputDelta>,

    #[serde(skip)]
    last_frame: InputFrame,
}

impl InputRecording {
    /// Create an empty recording.
    pub fn new(player_id: EntityId) -> Self {
        Self {
            player_id,
            start_tick: 1,
            end_tick: 0,
            deltas: Vec::with_capacity(256),
            last_frame: InputFrame::new(),
        }
    }

    /// Record input for a tick. Only stores if input changed.
    pub fn record(&mut self, tick: u32, frame: InputFrame) {
        self.end_tick = tick;
        if frame != self.last_frame {
            self.deltas.push(InputDelta { tick, frame });
            self.last_frame = frame;
        }
    }

    /// Input in effect at `tick` (idle before the first delta).
    pub fn get_input_at(&self, tick: u32) -> InputFrame {
        let idx = self.deltas.partition_point(|d| d.tick <= tick);
        if idx == 0 {
            InputFrame::new()
        } else {
            self.deltas[idx - 1].frame
        }
    }

    /// Number of delta entries.
    pub fn delta_count(&self) -> usize {
        self.deltas.len()
    }

    /// Extend the recording to `end_tick` without new input.
    pub fn finalize(&mut self, end_tick: u32) {
        self.end_tick = end_tick;
    }

    /// Hash of the recording, for comparing replays.
    pub fn compute_hash(&self) -> StateHash {
        let mut hasher = StateHasher::for_input_recording();
        hasher.update_u32(self.player_id.0);
        hasher.update_u32(self.start_tick);
        hasher.update_u32(self.end_tick);
        for delta in &self.deltas {
            hasher.update_u32(delta.tick);
            hasher.update_u8(delta.frame.move_x as u8);
            hasher.update_u8(delta.frame.flags);
        }
        hasher.finalize()
    }
}

// =============================================================================
// TESTS
// =============================================================================
