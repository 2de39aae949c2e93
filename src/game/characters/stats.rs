// Character tunables
//
// All speeds are in units per tick, all durations in ticks. Screen space has
// +y pointing down, so jump speeds are applied as negative velocities.

use glam::Vec2;

use crate::game::error::ConfigError;

/// Per-character physics and timing tunables
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterStats {
    // Dimensions (for the body rect)
    /// Character width in world units
    pub width: f32,
    /// Character height in world units
    pub height: f32,
    /// Divides knockback; must be positive
    pub mass: f32,

    // Ground movement
    pub ground_accel: f32,
    pub run_speed: f32,
    pub dash_speed: f32,
    pub initial_dash_frames: u32,
    pub turnaround_frames: u32,
    pub run_end_frames: u32,
    /// Speed removed per tick while grounded
    pub friction: f32,

    // Air movement
    pub air_accel: f32,
    pub air_speed: f32,
    /// Speed removed per tick while airborne without horizontal input
    pub air_resistance: f32,
    pub gravity: f32,
    pub fall_speed: f32,
    pub fast_fall_speed: f32,
    /// Air control multiplier while helpless after a recovery move
    pub special_fall_control: f32,

    // Jumps
    pub jump_speed: f32,
    pub shorthop_speed: f32,
    pub aerial_jump_speed: f32,
    pub jumpsquat_frames: u32,
    pub max_aerial_jumps: u8,
    pub max_wall_jumps: u8,
    /// Launch away from a wall: x is horizontal speed, y is upward speed
    pub wall_jump_speed: Vec2,

    // Defense
    pub max_air_dodges: u8,
    pub air_dodge_speed: f32,
    pub air_dodge_frames: u32,
    pub landing_lag_frames: u32,

    // Animation
    /// Ticks per animation frame
    pub frame_duration: u32,
}

/// Balanced all-rounder
pub const BASE_STATS: CharacterStats = CharacterStats {
    width: 40.0,
    height: 80.0,
    mass: 10.0,

    ground_accel: 1.0,
    run_speed: 7.0,
    dash_speed: 8.0,
    initial_dash_frames: 10,
    turnaround_frames: 6,
    run_end_frames: 6,
    friction: 0.6,

    air_accel: 0.5,
    air_speed: 4.0,
    air_resistance: 0.1,
    gravity: 0.5,
    fall_speed: 9.0,
    fast_fall_speed: 14.0,
    special_fall_control: 0.5,

    jump_speed: 13.0,
    shorthop_speed: 8.0,
    aerial_jump_speed: 12.0,
    jumpsquat_frames: 4,
    max_aerial_jumps: 1,
    max_wall_jumps: 1,
    wall_jump_speed: Vec2::new(7.0, 11.0),

    max_air_dodges: 1,
    air_dodge_speed: 9.0,
    air_dodge_frames: 12,
    landing_lag_frames: 6,

    frame_duration: 3,
};

impl Default for CharacterStats {
    fn default() -> Self {
        BASE_STATS
    }
}

impl CharacterStats {
    /// Get the standard character stats
    pub fn standard() -> Self {
        BASE_STATS
    }

    /// Slower, heavier and harder to launch
    pub fn heavy() -> Self {
        Self {
            width: 56.0,
            height: 96.0,
            mass: 14.0,
            run_speed: 5.5,
            dash_speed: 6.5,
            air_speed: 3.2,
            gravity: 0.6,
            fall_speed: 10.0,
            fast_fall_speed: 15.0,
            jump_speed: 12.0,
            shorthop_speed: 7.0,
            jumpsquat_frames: 6,
            ..BASE_STATS
        }
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.mass.is_finite() && self.mass > 0.0) {
            return Err(ConfigError::InvalidMass(self.mass));
        }
        if !(self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite())
        {
            return Err(ConfigError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }

        let tunables = [
            ("ground_accel", self.ground_accel),
            ("run_speed", self.run_speed),
            ("dash_speed", self.dash_speed),
            ("friction", self.friction),
            ("air_accel", self.air_accel),
            ("air_speed", self.air_speed),
            ("air_resistance", self.air_resistance),
            ("gravity", self.gravity),
            ("fall_speed", self.fall_speed),
            ("fast_fall_speed", self.fast_fall_speed),
            ("special_fall_control", self.special_fall_control),
            ("jump_speed", self.jump_speed),
            ("shorthop_speed", self.shorthop_speed),
            ("aerial_jump_speed", self.aerial_jump_speed),
            ("wall_jump_speed.x", self.wall_jump_speed.x),
            ("wall_jump_speed.y", self.wall_jump_speed.y),
            ("air_dodge_speed", self.air_dodge_speed),
        ];
        for (name, value) in tunables {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidTunable { name, value });
            }
        }

        let durations = [
            ("frame_duration", self.frame_duration),
            ("jumpsquat_frames", self.jumpsquat_frames),
            ("air_dodge_frames", self.air_dodge_frames),
        ];
        for (name, ticks) in durations {
            if ticks == 0 {
                return Err(ConfigError::ZeroDuration(name));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_stats() {
        let stats = CharacterStats::default();
        assert_eq!(stats.mass, 10.0);
        assert_eq!(stats.max_aerial_jumps, 1);
        assert_eq!(stats.jumpsquat_frames, 4);
        assert!(stats.validate().is_ok());
    }

    #[test]
    fn test_standard_equals_default() {
        assert_eq!(CharacterStats::standard(), CharacterStats::default());
    }

    #[test]
    fn test_heavy_is_valid_and_heavier() {
        let heavy = CharacterStats::heavy();
        assert!(heavy.validate().is_ok());
        assert!(heavy.mass > BASE_STATS.mass);
        assert_eq!(heavy.friction, BASE_STATS.friction);
    }

    #[test]
    fn test_rejects_non_positive_mass() {
        for mass in [0.0, -3.0, f32::NAN] {
            let stats = CharacterStats { mass, ..BASE_STATS };
            assert!(matches!(stats.validate(), Err(ConfigError::InvalidMass(_))));
        }
    }

    #[test]
    fn test_rejects_bad_dimensions() {
        let stats = CharacterStats {
            height: 0.0,
            ..BASE_STATS
        };
        assert!(matches!(
            stats.validate(),
            Err(ConfigError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_rejects_negative_tunable() {
        let stats = CharacterStats {
            gravity: -0.5,
            ..BASE_STATS
        };
        assert_eq!(
            stats.validate(),
            Err(ConfigError::InvalidTunable {
                name: "gravity",
                value: -0.5
            })
        );
    }

    #[test]
    fn test_rejects_zero_frame_duration() {
        let stats = CharacterStats {
            frame_duration: 0,
            ..BASE_STATS
        };
        assert_eq!(
            stats.validate(),
            Err(ConfigError::ZeroDuration("frame_duration"))
        );
    }
}
