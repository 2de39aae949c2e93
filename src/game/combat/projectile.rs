// Projectiles: owned, damageable entities that carry their own hitbox

use glam::Vec2;

use crate::engine::physics::Body;
use crate::game::entity::EntityId;
use crate::game::error::ConfigError;
use crate::game::stage::Stage;

use super::hitbox::{Hitbox, HitboxKey, HitboxPool, HitboxSpec, Priority};

/// Authored projectile parameters, relative to the launching character
/// facing right
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectileSpec {
    /// Spawn centre relative to the owner's centre
    pub offset: Vec2,
    pub size: Vec2,
    pub velocity: Vec2,
    pub gravity: f32,
    pub mass: f32,
    /// Fraction of speed lost when bouncing off a solid platform
    pub restitution: f32,
    pub lifetime: u32,
    /// Disappear after the first hit lands
    pub fragile: bool,
    /// Hitbox carried by the projectile, offset from its centre
    pub hitbox: HitboxSpec,
}

impl ProjectileSpec {
    pub fn mirrored(&self) -> Self {
        Self {
            offset: Vec2::new(-self.offset.x, self.offset.y),
            velocity: Vec2::new(-self.velocity.x, self.velocity.y),
            hitbox: self.hitbox.mirrored(),
            ..*self
        }
    }

    pub(crate) fn validate(&self, move_name: &'static str) -> Result<(), ConfigError> {
        if !(self.mass.is_finite() && self.mass > 0.0) {
            return Err(ConfigError::InvalidMass(self.mass));
        }
        if self.lifetime == 0 {
            return Err(ConfigError::ZeroDuration("projectile lifetime"));
        }
        if !self.hitbox.is_valid() || !(self.size.x > 0.0 && self.size.y > 0.0) {
            return Err(ConfigError::InvalidHitbox {
                name: move_name,
                slot: 0,
            });
        }
        Ok(())
    }
}

/// Request raised by a move frame, fulfilled by the scene after all
/// entities have stepped
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnRequest {
    pub owner: EntityId,
    /// World-space centre
    pub center: Vec2,
    pub spec: ProjectileSpec,
}

#[derive(Debug, Clone)]
pub struct Projectile {
    pub id: EntityId,
    pub owner: EntityId,
    pub body: Body,
    pub spec: ProjectileSpec,
    pub damage: f32,
    pub hitpause: u32,
    remaining: u32,
    spent: bool,
}

impl Projectile {
    pub fn new(id: EntityId, request: &SpawnRequest) -> Self {
        let mut body = Body::new(request.center - request.spec.size * 0.5, request.spec.size);
        body.velocity = request.spec.velocity;
        Self {
            id,
            owner: request.owner,
            body,
            spec: request.spec,
            damage: 0.0,
            hitpause: 0,
            remaining: request.spec.lifetime,
            spent: false,
        }
    }

    /// Advance one tick: fly, bounce, age and emit the hitbox
    pub fn step(&mut self, stage: &Stage, pool: &mut HitboxPool) {
        if self.hitpause > 0 {
            self.hitpause -= 1;
            return;
        }
        if self.is_expired() {
            return;
        }
        self.body.begin_tick();
        self.body.velocity.y += self.spec.gravity;
        stage.bounce_body(&mut self.body, self.spec.restitution);
        self.remaining -= 1;

        pool.push(Hitbox {
            key: HitboxKey {
                owner: self.id,
                activation: 0,
                slot: 0,
            },
            priority: Priority { group: 0, rank: 0 },
            spec: self.spec.hitbox,
        });
    }

    /// Struck by another hitbox
    pub fn receive_hit(&mut self, damage: f32, velocity: Vec2, hitpause: u32) {
        self.damage += damage;
        self.body.velocity = velocity;
        self.hitpause = hitpause;
    }

    /// This projectile's hitbox connected
    pub fn on_hit_landed(&mut self) {
        if self.spec.fragile {
            self.spent = true;
        }
    }

    pub fn is_expired(&self) -> bool {
        self.spent || self.remaining == 0
    }
}
