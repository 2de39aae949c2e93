// Combat system
//
// This module contains everything related to attacks:
// - Hitbox templates and the per-tick hitbox pool
// - Moves (frame-indexed hitbox schedules)
// - Projectiles
// - Hit resolution (damage, knockback, hitstun, hitpause)

pub mod hitbox;
pub mod moves;
pub mod projectile;
pub mod resolver;

// Re-export commonly used types
pub use hitbox::{GroupKey, Hitbox, HitboxKey, HitboxPool, HitboxSpec, HitboxView, Priority};
pub use moves::{FrameData, Move, MoveData, MoveKind, MoveSlot, MoveStep, Moveset};
pub use projectile::{Projectile, ProjectileSpec, SpawnRequest};
pub use resolver::{HitEffect, HitEvent, HitResolver};

/// Hitpause ticks per unit of summed knockback parameters
pub const HITPAUSE_CONSTANT: f32 = 0.2;

/// Hitstun ticks per unit of knockback magnitude
pub const HITSTUN_CONSTANT: f32 = 4.0;

/// Resolved (group, target) pairs the resolver remembers
pub const HANDLED_CAPACITY: usize = 64;
