// Character system
//
// This module contains everything related to playable characters:
// - Character data structure and per-state behavior
// - Character stats and properties
// - State machine for character behavior
// - Animation frame selection
// - Built-in movesets

pub mod animation;
pub mod character;
pub mod roster;
pub mod state;
pub mod stats;

// Re-export commonly used types
pub use animation::{AnimationClip, AnimationSet, SpriteFrame};
pub use character::{Character, Facing, StepContext};
pub use state::{CharacterState, CharacterStateMachine};
pub use stats::{CharacterStats, BASE_STATS};
