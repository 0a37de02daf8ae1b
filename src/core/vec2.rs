//! Fixed-Point 2D Vector
//!
//! Deterministic 2D vector operations for the gameplay core.
//! All operations use fixed-point arithmetic.

use std::fmt;
use std::ops::{Add, Neg, Sub};
use serde::{Serialize, Deserialize};

use super::fixed::{Fixed, FIXED_ONE, FIXED_SCALE, fixed_clamp};

/// 2D vector with fixed-point components.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct FixedVec2 {
    /// X component (Q16.16 fixed-point)
    pub x: Fixed,
    /// Y component (Q16.16 fixed-point)
    pub y: Fixed,
}

impl FixedVec2 {
    /// Zero vector
    pub const ZERO: Self = Self { x: 0, y: 0 };

    /// Create a new vector from fixed-point components.
    #[inline]
    pub const fn new(x: Fixed, y: Fixed) -> Self {
        Self { x, y }
    }

    /// Create a vector from integer components.
    #[inline]
    pub const fn from_ints(x: i32, y: i32) -> Self {
        Self {
            x: x << FIXED_SCALE,
            y: y << FIXED_SCALE,
        }
    }

    /// Add another vector.
    #[inline]
    pub fn add(self, other: Self) -> Self {
        Self {
            x: self.x.wrapping_add(other.x),
            y: self.y.wrapping_add(other.y),
        }
    }

    /// Subtract another vector.
    #[inline]
    pub fn sub(self, other: Self) -> Self {
        Self {
            x: self.x.wrapping_sub(other.x),
            y: self.y.wrapping_sub(other.y),
        }
    }

    /// Scale by an integer scalar (faster than fixed multiply).
    #[inline]
    pub fn scale_int(self, scalar: i32) -> Self {
        Self {
            x: self.x.wrapping_mul(scalar),
            y: self.y.wrapping_mul(scalar),
        }
    }

    /// Squared distance to another point, unshifted (Q32.32 in an i64).
    ///
    /// Saturates instead of wrapping, so far-apart points always compare as
    /// far apart. Compare against `fixed_sq_wide(radius)`.
    #[inline]
    pub fn distance_squared_wide(self, other: Self) -> i64 {
        let dx = self.x as i64 - other.x as i64;
        let dy = self.y as i64 - other.y as i64;
        dx.saturating_mul(dx).saturating_add(dy.saturating_mul(dy))
    }

    /// Clamp each component to its own range.
    #[inline]
    pub fn clamp_each(self, min: Self, max: Self) -> Self {
        Self {
            x: fixed_clamp(self.x, min.x, max.x),
            y: fixed_clamp(self.y, min.y, max.y),
        }
    }

    /// Negate both components.
    #[inline]
    pub fn negate(self) -> Self {
        Self {
            x: self.x.wrapping_neg(),
            y: self.y.wrapping_neg(),
        }
    }

    /// Convert to float tuple for rendering.
    #[inline]
    pub fn to_floats(self) -> (f32, f32) {
        (
            self.x as f32 / FIXED_ONE as f32,
            self.y as f32 / FIXED_ONE as f32,
        )
    }
}

impl Add for FixedVec2 {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        FixedVec2::add(self, rhs)
    }
}

impl Sub for FixedVec2 {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        FixedVec2::sub(self, rhs)
    }
}

impl Neg for FixedVec2 {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        self.negate()
    }
}

impl fmt::Debug for FixedVec2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (fx, fy) = self.to_floats();
        write!(f, "Vec2({:.3}, {:.3})", fx, fy)
    }
}

impl fmt::Display for FixedVec2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (fx, fy) = self.to_floats();
        write!(f, "({:.3}, {:.3})", fx, fy)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fixed::{fixed_sq_wide, to_fixed};

    #[test]
    fn test_vec2_add_sub() {
        let a = FixedVec2::new(to_fixed(3.0), to_fixed(4.0));
        let b = FixedVec2::new(to_fixed(1.0), to_fixed(2.0));
        assert_eq!(a + b, FixedVec2::new(to_fixed(4.0), to_fixed(6.0)));
        assert_eq!(a - b, FixedVec2::new(to_fixed(2.0), to_fixed(2.0)));
    }

    #[test]
    fn test_vec2_negate_and_double() {
        let v = FixedVec2::new(to_fixed(-0.25), 0);
        assert_eq!((-v).scale_int(2), FixedVec2::new(to_fixed(0.5), 0));
    }

    #[test]
    fn test_vec2_distance() {
        let a = FixedVec2::ZERO;
        let b = FixedVec2::from_ints(3, 4);
        assert_eq!(a.distance_squared_wide(b), fixed_sq_wide(to_fixed(5.0)));
    }

    #[test]
    fn test_vec2_distance_far_apart() {
        let a = FixedVec2::from_ints(-30000, 0);
        let b = FixedVec2::from_ints(30000, 200);
        assert!(a.distance_squared_wide(b) > fixed_sq_wide(to_fixed(200.0)));
        assert!(FixedVec2::ZERO.distance_squared_wide(FixedVec2::from_ints(200, 0)) > fixed_sq_wide(FIXED_ONE));
    }

    #[test]
    fn test_vec2_clamp_each() {
        let v = FixedVec2::from_ints(12, -30);
        let clamped = v.clamp_each(FixedVec2::from_ints(-10, -10), FixedVec2::from_ints(10, 20));
        assert_eq!(clamped, FixedVec2::from_ints(10, -10));
    }
}
