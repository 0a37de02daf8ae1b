//! Kinematic Body Integration
//!
//! Shared by players and projectiles. Velocity is a per-tick displacement:
//! one physics step moves a body by exactly `velocity`, independent of the
//! tick duration. Changing the tick rate therefore changes movement speed.
//! That frame-rate dependence is part of the game feel and must not be
//! "fixed" by multiplying with dt.

use super::vec2::FixedVec2;

/// Advance a body by one physics step: `position + velocity`.
#[inline]
pub fn advance(position: FixedVec2, velocity: FixedVec2) -> FixedVec2 {
    position.add(velocity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fixed::to_fixed;

    #[test]
    fn test_advance_is_per_tick_displacement() {
        let start = FixedVec2::new(to_fixed(1.0), to_fixed(2.0));
        let velocity = FixedVec2::new(to_fixed(0.25), to_fixed(-0.5));

        let mut position = start;
        for _ in 0..4 {
            position = advance(position, velocity);
        }

        assert_eq!(position, FixedVec2::new(to_fixed(2.0), to_fixed(0.0)));
    }

    #[test]
    fn test_advance_zero_velocity() {
        let start = FixedVec2::from_ints(7, -3);
        assert_eq!(advance(start, FixedVec2::ZERO), start);
    }
}
