//! Q16.16 Fixed-Point Arithmetic
//!
//! Deterministic fixed-point math for the gameplay core.
//! All tick-loop operations use integer arithmetic only.
//!
//! ## Format: Q16.16
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Bit Layout: Q16.16 (32-bit signed integer)                 │
//! ├─────────────────────────────────────────────────────────────┤
//! │  [S][IIIIIIIIIIIIIIII][FFFFFFFFFFFFFFFF]                    │
//! │   │  └──── 16 bits ────┘└──── 16 bits ────┘                 │
//! │   └─ Sign bit                                               │
//! │                                                             │
//! │  Range: -32768.0 to +32767.99998 (approx)                   │
//! │  Precision: 1/65536 ≈ 0.000015 units                        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Timers are seconds in Q16.16. Velocities are units *per tick*, so the
//! tuning constants below are per-tick displacements, not per-second rates.

/// Q16.16 fixed-point number stored as i32.
/// 16 bits integer, 16 bits fractional.
pub type Fixed = i32;

/// Number of fractional bits (16)
pub const FIXED_SCALE: i32 = 16;

/// 1.0 in fixed-point (65536)
pub const FIXED_ONE: Fixed = 1 << FIXED_SCALE; // 65536

/// 0.5 in fixed-point (32768)
pub const FIXED_HALF: Fixed = FIXED_ONE >> 1; // 32768

// =============================================================================
// GAME CONSTANTS (All as integer literals - NO float conversion!)
// =============================================================================

/// Tick duration: 1/60 second = round(65536/60) = 1092
pub const TICK_DURATION: Fixed = 1092;

/// Jump speed: 20.0 per tick = 20 * 65536
pub const JUMP_SPEED: Fixed = 1310720;

/// Terminal fall speed: 10.0 per tick
pub const FALL_SPEED: Fixed = 655360;

/// Maximum ground speed: 10.0 per tick
pub const RUN_SPEED: Fixed = 655360;

/// Ground acceleration at full input: 10.0 per tick
pub const RUN_ACCELERATION: Fixed = 655360;

/// Ground deceleration with no input: 5.0 per tick
pub const RUN_SKID: Fixed = 327680;

/// Maximum air speed: 10.0 per tick
pub const AIR_SPEED: Fixed = 655360;

/// Air acceleration at full input: 4.0 per tick
pub const AIR_ACCELERATION: Fixed = 262144;

/// Air deceleration with no input: 2.0 per tick
pub const AIR_SKID: Fixed = 131072;

/// Gravity added to vertical velocity each airborne tick: -9.81 (truncated)
pub const GRAVITY: Fixed = -642908;

/// Ground probe radius: 0.02 = floor(0.02 * 65536)
pub const GROUND_PROBE_RADIUS: Fixed = 1310;

/// Deflect window length: 0.5 seconds
pub const PARRY_TIME: Fixed = 32768;

/// Parry recovery after the window closes: 0.5 seconds
pub const PARRY_COOLDOWN: Fixed = 32768;

/// Hurt stun length: 0.5 seconds
pub const DAMAGE_TIME: Fixed = 32768;

/// Turret fire interval: 3 seconds
pub const FIRE_INTERVAL: Fixed = 196608;

/// Turret stun duration: 3 seconds
pub const STUN_DURATION: Fixed = 196608;

/// Projectile lifespan: 10 seconds
pub const PROJECTILE_LIFESPAN: Fixed = 655360;

/// Projectile muzzle speed: 0.25 per tick
pub const PROJECTILE_SPEED: Fixed = 16384;

// =============================================================================
// CORE OPERATIONS (All deterministic, wrapping semantics)
// =============================================================================

/// Convert a compile-time float to fixed-point.
///
/// # Warning
/// Only use at compile-time or initialization. NEVER in tick loop.
///
/// # Example
/// ```
/// use deflect::core::fixed::{to_fixed, FIXED_ONE};
/// const MY_VALUE: i32 = to_fixed(2.5);
/// assert_eq!(MY_VALUE, FIXED_ONE * 2 + FIXED_ONE / 2);
/// ```
#[inline]
pub const fn to_fixed(f: f64) -> Fixed {
    (f * (FIXED_ONE as f64)) as Fixed
}

/// Convert fixed-point to float for display/rendering.
///
/// # Warning
/// Only use for visual output. NEVER use result in game logic.
#[inline]
pub fn to_float(f: Fixed) -> f32 {
    f as f32 / FIXED_ONE as f32
}

/// Multiply two fixed-point numbers.
///
/// Uses i64 intermediate to prevent overflow, then truncates.
#[inline]
pub fn fixed_mul(a: Fixed, b: Fixed) -> Fixed {
    let wide = (a as i64) * (b as i64);
    (wide >> FIXED_SCALE) as Fixed
}

/// Square of a fixed-point number, unshifted (Q32.32 in an i64).
///
/// Used for distance comparisons so large separations cannot wrap.
#[inline]
pub fn fixed_sq_wide(a: Fixed) -> i64 {
    (a as i64) * (a as i64)
}

/// Minimum of two fixed-point numbers.
#[inline]
pub fn fixed_min(a: Fixed, b: Fixed) -> Fixed {
    if a < b { a } else { b }
}

/// Maximum of two fixed-point numbers.
#[inline]
pub fn fixed_max(a: Fixed, b: Fixed) -> Fixed {
    if a > b { a } else { b }
}

/// Clamp a fixed-point number to a range.
#[inline]
pub fn fixed_clamp(value: Fixed, min: Fixed, max: Fixed) -> Fixed {
    fixed_max(min, fixed_min(max, value))
}

// =============================================================================
// SERDE (decimal numbers in config files)
// =============================================================================

/// Serialize `Fixed` fields as decimal numbers.
///
/// Use with `#[serde(with = "serde_float")]`. Conversion happens once at
/// load time, so the tick loop stays integer-only.
pub mod serde_float {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::{to_fixed, Fixed, FIXED_ONE};

    /// Write a fixed-point value as f64.
    pub fn serialize<S: Serializer>(value: &Fixed, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(*value as f64 / FIXED_ONE as f64)
    }

    /// Read an f64 and convert it to fixed-point.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Fixed, D::Error> {
        let value = f64::deserialize(deserializer)?;
        Ok(to_fixed(value))
    }

    /// Same conversion for `FixedVec2`, written as `[x, y]`.
    pub mod vec2 {
        use serde::{Deserialize, Deserializer, Serialize, Serializer};

        use crate::core::fixed::{to_fixed, FIXED_ONE};
        use crate::core::vec2::FixedVec2;

        /// Write a vector as `[x, y]` floats.
        pub fn serialize<S: Serializer>(value: &FixedVec2, serializer: S) -> Result<S::Ok, S::Error> {
            let pair = [
                value.x as f64 / FIXED_ONE as f64,
                value.y as f64 / FIXED_ONE as f64,
            ];
            pair.serialize(serializer)
        }

        /// Read `[x, y]` floats into a fixed-point vector.
        pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<FixedVec2, D::Error> {
            let [x, y] = <[f64; 2]>::deserialize(deserializer)?;
            Ok(FixedVec2::new(to_fixed(x), to_fixed(y)))
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_constants() {
        assert_eq!(FIXED_ONE, 65536);
        assert_eq!(FIXED_HALF, 32768);
        assert_eq!(FIXED_SCALE, 16);
    }

    #[test]
    fn test_to_fixed() {
        assert_eq!(to_fixed(1.0), FIXED_ONE);
        assert_eq!(to_fixed(0.5), FIXED_HALF);
        assert_eq!(to_fixed(2.0), FIXED_ONE * 2);
        assert_eq!(to_fixed(-1.0), -FIXED_ONE);
    }

    #[test]
    fn test_fixed_mul() {
        assert_eq!(fixed_mul(to_fixed(2.0), to_fixed(3.0)), to_fixed(6.0));
        assert_eq!(fixed_mul(FIXED_HALF, FIXED_HALF), to_fixed(0.25));
        assert_eq!(fixed_mul(to_fixed(-2.0), to_fixed(3.0)), to_fixed(-6.0));
    }

    #[test]
    fn test_fixed_clamp() {
        assert_eq!(fixed_clamp(to_fixed(12.0), -RUN_SPEED, RUN_SPEED), RUN_SPEED);
        assert_eq!(fixed_clamp(to_fixed(-12.0), -RUN_SPEED, RUN_SPEED), -RUN_SPEED);
        assert_eq!(fixed_clamp(to_fixed(3.0), 0, RUN_SPEED), to_fixed(3.0));
    }

    #[test]
    fn test_game_constants() {
        assert_eq!(TICK_DURATION, 1092); // round(65536/60)
        assert_eq!(JUMP_SPEED, to_fixed(20.0));
        assert_eq!(RUN_SKID, to_fixed(5.0));
        assert_eq!(AIR_ACCELERATION, to_fixed(4.0));
        assert_eq!(GRAVITY, to_fixed(-9.81));
        assert_eq!(GROUND_PROBE_RADIUS, to_fixed(0.02));
        assert_eq!(PARRY_TIME + PARRY_COOLDOWN, FIXED_ONE);
        assert_eq!(FIRE_INTERVAL, to_fixed(3.0));
        assert_eq!(PROJECTILE_LIFESPAN, to_fixed(10.0));
    }

    #[test]
    fn test_serde_float_roundtrip() {
        #[derive(serde::Serialize, serde::Deserialize)]
        struct Wrapper {
            #[serde(with = "serde_float")]
            value: Fixed,
        }

        let parsed: Wrapper = serde_json::from_str(r#"{"value": 2.5}"#).unwrap();
        assert_eq!(parsed.value, to_fixed(2.5));

        let text = serde_json::to_string(&Wrapper { value: FIXED_HALF }).unwrap();
        assert_eq!(text, r#"{"value":0.5}"#);
    }
}
