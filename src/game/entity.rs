// Scene entities
//
// Characters and projectiles live side by side in one arena ordered by id.
// Hitboxes refer to their owner by id only.

use glam::Vec2;

use crate::engine::physics::{Body, Rect};
use crate::game::characters::Character;
use crate::game::combat::{HitEffect, Projectile};

/// Unique identifier for any simulated entity
pub type EntityId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Character,
    Projectile,
}

#[derive(Debug)]
pub enum Entity {
    Character(Character),
    Projectile(Projectile),
}

impl Entity {
    pub fn id(&self) -> EntityId {
        match self {
            Self::Character(c) => c.id,
            Self::Projectile(p) => p.id,
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Character(_) => EntityKind::Character,
            Self::Projectile(_) => EntityKind::Projectile,
        }
    }

    pub fn body(&self) -> &Body {
        match self {
            Self::Character(c) => &c.body,
            Self::Projectile(p) => &p.body,
        }
    }

    pub fn center(&self) -> Vec2 {
        self.body().center()
    }

    pub fn rect(&self) -> Rect {
        self.body().rect()
    }

    /// Owner of a projectile, `None` for characters
    pub fn projectile_owner(&self) -> Option<EntityId> {
        match self {
            Self::Character(_) => None,
            Self::Projectile(p) => Some(p.owner),
        }
    }

    pub fn mass(&self) -> f32 {
        match self {
            Self::Character(c) => c.stats.mass,
            Self::Projectile(p) => p.spec.mass,
        }
    }

    /// Accumulated damage
    pub fn damage(&self) -> f32 {
        match self {
            Self::Character(c) => c.damage,
            Self::Projectile(p) => p.damage,
        }
    }

    pub fn is_intangible(&self) -> bool {
        match self {
            Self::Character(c) => c.is_intangible(),
            Self::Projectile(_) => false,
        }
    }

    pub fn set_hitpause(&mut self, ticks: u32) {
        match self {
            Self::Character(c) => c.hitpause = ticks,
            Self::Projectile(p) => p.hitpause = ticks,
        }
    }

    pub fn receive_hit(&mut self, effect: &HitEffect) {
        match self {
            Self::Character(c) => c.receive_hit(effect),
            Self::Projectile(p) => p.receive_hit(effect.damage, effect.velocity, effect.hitpause),
        }
    }

    /// One of this entity's hitboxes connected
    pub fn on_hit_landed(&mut self) {
        if let Self::Projectile(p) = self {
            p.on_hit_landed();
        }
    }

    pub fn as_character(&self) -> Option<&Character> {
        match self {
            Self::Character(c) => Some(c),
            Self::Projectile(_) => None,
        }
    }

    pub fn as_character_mut(&mut self) -> Option<&mut Character> {
        match self {
            Self::Character(c) => Some(c),
            Self::Projectile(_) => None,
        }
    }
}
