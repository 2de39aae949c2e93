// Construction-time configuration errors
//
// Everything here is caught while a scene is being set up. The per-tick
// simulation never returns errors.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("mass must be positive and finite, got {0}")]
    InvalidMass(f32),

    #[error("character dimensions must be positive, got {width}x{height}")]
    InvalidDimensions { width: f32, height: f32 },

    #[error("tunable `{name}` must be finite and non-negative, got {value}")]
    InvalidTunable { name: &'static str, value: f32 },

    #[error("`{0}` must be at least one tick")]
    ZeroDuration(&'static str),

    #[error("move `{0}` has an empty frame table")]
    EmptyFrameTable(&'static str),

    #[error("move `{name}` frame {frame} references missing hitbox slot {slot}")]
    MissingHitbox {
        name: &'static str,
        frame: usize,
        slot: usize,
    },

    #[error("move `{name}` priority chain references missing hitbox slot {slot}")]
    MissingSibling { name: &'static str, slot: usize },

    #[error("move `{name}` places hitbox slot {slot} in more than one priority chain")]
    SiblingInTwoChains { name: &'static str, slot: usize },

    #[error("move `{name}` hitbox slot {slot} has an invalid parameter")]
    InvalidHitbox { name: &'static str, slot: usize },
}
