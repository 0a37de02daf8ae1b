//! Scene Configuration
//!
//! Tunables for the player, turrets and projectiles, loaded once at startup.
//! JSON files write fixed-point values as plain decimals; conversion happens
//! at load time so the tick loop never touches floats.
//!
//! A bad config is a startup fault. `SceneConfig::validate` rejects values that
//! would otherwise show up as confusing gameplay (a parry window that never
//! opens, a turret that fires every tick, bullets that never move).

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::fixed::{
    self, serde_float, to_float, Fixed, FIXED_ONE, TICK_DURATION,
};
use crate::core::vec2::FixedVec2;
use crate::game::ground::LayerMask;
use crate::game::player::Facing;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A value that must be strictly positive was zero or negative.
    #[error("{field} must be positive (got {value})")]
    NonPositive {
        /// Offending field path
        field: &'static str,
        /// Value as loaded
        value: f32,
    },
    /// A value that must not be negative was negative.
    #[error("{field} must not be negative (got {value})")]
    Negative {
        /// Offending field path
        field: &'static str,
        /// Value as loaded
        value: f32,
    },
    /// Gravity points up, so airborne players would never land.
    #[error("gravity must point down (got {0})")]
    UpwardGravity(f32),
    /// A required sink or adapter was never wired up.
    #[error("missing collaborator: {0}")]
    MissingCollaborator(&'static str),
    /// Config file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File path
        path: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
    /// Config file is not valid JSON for this schema.
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

fn positive(field: &'static str, value: Fixed) -> Result<(), ConfigError> {
    if value > 0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value: to_float(value) })
    }
}

fn non_negative(field: &'static str, value: Fixed) -> Result<(), ConfigError> {
    if value >= 0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value: to_float(value) })
    }
}

// =============================================================================
// PLAYER
// =============================================================================

/// Player movement and combat tunables.
///
/// Speeds and accelerations are per-tick; timers are seconds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    /// Vertical velocity set by a jump (also the upward clamp)
    #[serde(with = "serde_float")]
    pub jump_speed: Fixed,
    /// Terminal downward speed
    #[serde(with = "serde_float")]
    pub fall_speed: Fixed,
    /// Ground horizontal speed cap
    #[serde(with = "serde_float")]
    pub run_speed: Fixed,
    /// Ground acceleration at full input
    #[serde(with = "serde_float")]
    pub run_acceleration: Fixed,
    /// Ground deceleration with no input
    #[serde(with = "serde_float")]
    pub run_skid: Fixed,
    /// Air horizontal speed cap
    #[serde(with = "serde_float")]
    pub air_speed: Fixed,
    /// Air acceleration at full input
    #[serde(with = "serde_float")]
    pub air_acceleration: Fixed,
    /// Air deceleration with no input
    #[serde(with = "serde_float")]
    pub air_skid: Fixed,
    /// Multiplier applied to scene gravity while airborne
    #[serde(with = "serde_float")]
    pub gravity_multiplier: Fixed,
    /// Length of the deflect window
    #[serde(with = "serde_float")]
    pub parry_time: Fixed,
    /// Recovery after the deflect window closes
    #[serde(with = "serde_float")]
    pub parry_cooldown: Fixed,
    /// Length of the hurt stun
    #[serde(with = "serde_float")]
    pub damage_time: Fixed,
    /// Radius of the ground probe circle
    #[serde(with = "serde_float")]
    pub ground_probe_radius: Fixed,
    /// Ground probe position relative to the player origin
    #[serde(with = "serde_float::vec2")]
    pub ground_check_offset: FixedVec2,
    /// Layers the ground probe treats as ground
    pub ground_mask: LayerMask,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            jump_speed: fixed::JUMP_SPEED,
            fall_speed: fixed::FALL_SPEED,
            run_speed: fixed::RUN_SPEED,
            run_acceleration: fixed::RUN_ACCELERATION,
            run_skid: fixed::RUN_SKID,
            air_speed: fixed::AIR_SPEED,
            air_acceleration: fixed::AIR_ACCELERATION,
            air_skid: fixed::AIR_SKID,
            gravity_multiplier: FIXED_ONE,
            parry_time: fixed::PARRY_TIME,
            parry_cooldown: fixed::PARRY_COOLDOWN,
            damage_time: fixed::DAMAGE_TIME,
            ground_probe_radius: fixed::GROUND_PROBE_RADIUS,
            ground_check_offset: FixedVec2::new(0, -fixed::FIXED_HALF),
            ground_mask: LayerMask::GROUND,
        }
    }
}

impl PlayerTuning {
    /// Total parry length: window plus recovery.
    #[inline]
    pub fn parry_total(&self) -> Fixed {
        self.parry_time.saturating_add(self.parry_cooldown)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        positive("player.jump_speed", self.jump_speed)?;
        positive("player.fall_speed", self.fall_speed)?;
        positive("player.run_speed", self.run_speed)?;
        positive("player.air_speed", self.air_speed)?;
        non_negative("player.run_acceleration", self.run_acceleration)?;
        non_negative("player.run_skid", self.run_skid)?;
        non_negative("player.air_acceleration", self.air_acceleration)?;
        non_negative("player.air_skid", self.air_skid)?;
        non_negative("player.gravity_multiplier", self.gravity_multiplier)?;
        positive("player.parry_time", self.parry_time)?;
        non_negative("player.parry_cooldown", self.parry_cooldown)?;
        non_negative("player.damage_time", self.damage_time)?;
        positive("player.ground_probe_radius", self.ground_probe_radius)?;
        Ok(())
    }
}

// =============================================================================
// TURRET / PROJECTILE
// =============================================================================

/// Turret timing and muzzle placement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TurretTuning {
    /// Seconds between shots while active
    #[serde(with = "serde_float")]
    pub fire_interval: Fixed,
    /// Seconds a stun lasts
    #[serde(with = "serde_float")]
    pub stun_duration: Fixed,
    /// Muzzle position relative to the turret origin
    #[serde(with = "serde_float::vec2")]
    pub spawn_offset: FixedVec2,
    /// Direction shots travel
    pub facing: Facing,
}

impl Default for TurretTuning {
    fn default() -> Self {
        Self {
            fire_interval: fixed::FIRE_INTERVAL,
            stun_duration: fixed::STUN_DURATION,
            spawn_offset: FixedVec2::new(FIXED_ONE, 0),
            facing: Facing::Right,
        }
    }
}

impl TurretTuning {
    fn validate(&self) -> Result<(), ConfigError> {
        positive("turret.fire_interval", self.fire_interval)?;
        non_negative("turret.stun_duration", self.stun_duration)?;
        Ok(())
    }
}

/// Projectile speed and lifespan.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileTuning {
    /// Muzzle speed per tick (direction comes from the turret)
    #[serde(with = "serde_float")]
    pub speed: Fixed,
    /// Seconds before an unresolved projectile is destroyed
    #[serde(with = "serde_float")]
    pub lifespan: Fixed,
}

impl Default for ProjectileTuning {
    fn default() -> Self {
        Self {
            speed: fixed::PROJECTILE_SPEED,
            lifespan: fixed::PROJECTILE_LIFESPAN,
        }
    }
}

impl ProjectileTuning {
    fn validate(&self) -> Result<(), ConfigError> {
        positive("projectile.speed", self.speed)?;
        positive("projectile.lifespan", self.lifespan)?;
        Ok(())
    }
}

/// Contact circle radii used by the built-in overlap feed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColliderRadii {
    /// Player body radius
    #[serde(with = "serde_float")]
    pub player: Fixed,
    /// Projectile radius
    #[serde(with = "serde_float")]
    pub projectile: Fixed,
    /// Turret body radius
    #[serde(with = "serde_float")]
    pub turret: Fixed,
}

impl Default for ColliderRadii {
    fn default() -> Self {
        Self {
            player: fixed::FIXED_HALF,
            projectile: fixed::to_fixed(0.125),
            turret: fixed::FIXED_HALF,
        }
    }
}

impl ColliderRadii {
    fn validate(&self) -> Result<(), ConfigError> {
        positive("colliders.player", self.player)?;
        positive("colliders.projectile", self.projectile)?;
        positive("colliders.turret", self.turret)?;
        Ok(())
    }
}

// =============================================================================
// SCENE
// =============================================================================

/// Complete configuration for a simulated scene.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Seconds per tick, used by every timer
    #[serde(with = "serde_float")]
    pub tick_duration: Fixed,
    /// Vertical velocity added per airborne tick before the player multiplier
    #[serde(with = "serde_float")]
    pub gravity: Fixed,
    /// Player tunables
    pub player: PlayerTuning,
    /// Turret tunables
    pub turret: TurretTuning,
    /// Projectile tunables
    pub projectile: ProjectileTuning,
    /// Contact radii
    pub colliders: ColliderRadii,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            tick_duration: TICK_DURATION,
            gravity: fixed::GRAVITY,
            player: PlayerTuning::default(),
            turret: TurretTuning::default(),
            projectile: ProjectileTuning::default(),
            colliders: ColliderRadii::default(),
        }
    }
}

impl SceneConfig {
    /// Parse and validate a JSON config. Missing fields take defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: SceneConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Check every tunable. Returns the first violation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("tick_duration", self.tick_duration)?;
        if self.gravity > 0 {
            return Err(ConfigError::UpwardGravity(to_float(self.gravity)));
        }
        self.player.validate()?;
        self.turret.validate()?;
        self.projectile.validate()?;
        self.colliders.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fixed::to_fixed;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SceneConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = SceneConfig::from_json_str(
            r#"{
                "player": { "parry_time": 0.25, "ground_check_offset": [0.0, -1.0] },
                "turret": { "facing": "Left" }
            }"#,
        )
        .unwrap();

        assert_eq!(config.player.parry_time, to_fixed(0.25));
        assert_eq!(config.player.ground_check_offset, FixedVec2::new(0, -FIXED_ONE));
        assert_eq!(config.player.run_speed, fixed::RUN_SPEED);
        assert_eq!(config.turret.facing, Facing::Left);
        assert_eq!(config.turret.fire_interval, fixed::FIRE_INTERVAL);
        assert_eq!(config.tick_duration, TICK_DURATION);
    }

    #[test]
    fn test_zero_parry_time_rejected() {
        let err = SceneConfig::from_json_str(r#"{ "player": { "parry_time": 0.0 } }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::NonPositive { field: "player.parry_time", .. }));
    }

    #[test]
    fn test_negative_skid_rejected() {
        let mut config = SceneConfig::default();
        config.player.air_skid = to_fixed(-1.0);
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Negative { field: "player.air_skid", .. }));
    }

    #[test]
    fn test_upward_gravity_rejected() {
        let mut config = SceneConfig::default();
        config.gravity = to_fixed(9.81);
        assert!(matches!(config.validate(), Err(ConfigError::UpwardGravity(_))));
    }

    #[test]
    fn test_malformed_json() {
        let err = SceneConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = SceneConfig::load("/nonexistent/deflect-scene.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_parry_total() {
        let tuning = PlayerTuning::default();
        assert_eq!(tuning.parry_total(), FIXED_ONE);
    }
}
