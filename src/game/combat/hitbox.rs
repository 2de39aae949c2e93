// Hitbox templates, live instances and the per-tick pool

use glam::Vec2;

use crate::core::math::{mirror_angle, round_ticks};
use crate::engine::physics::Rect;
use crate::game::entity::EntityId;

use super::{HITPAUSE_CONSTANT, HITSTUN_CONSTANT};

/// Damage and knockback parameters for one hitbox volume, as authored in a
/// move's data table. Offsets are relative to the owner's centre and assume
/// the owner faces right.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitboxSpec {
    pub offset: Vec2,
    pub size: Vec2,
    /// Degrees. Only used by renderers, collision is axis aligned.
    pub rotation: f32,
    pub damage: f32,
    pub base_knockback: f32,
    pub fixed_knockback: f32,
    pub knockback_growth: f32,
    /// Degrees, 0 = right, 90 = up
    pub knockback_angle: f32,
}

impl HitboxSpec {
    pub fn new(offset: Vec2, size: Vec2) -> Self {
        Self {
            offset,
            size,
            rotation: 0.0,
            damage: 0.0,
            base_knockback: 0.0,
            fixed_knockback: 0.0,
            knockback_growth: 0.0,
            knockback_angle: 0.0,
        }
    }

    pub fn damage(mut self, damage: f32) -> Self {
        self.damage = damage;
        self
    }

    pub fn knockback(mut self, base: f32, growth: f32) -> Self {
        self.base_knockback = base;
        self.knockback_growth = growth;
        self
    }

    pub fn fixed_knockback(mut self, fixed: f32) -> Self {
        self.fixed_knockback = fixed;
        self
    }

    pub fn angle(mut self, degrees: f32) -> Self {
        self.knockback_angle = degrees;
        self
    }

    pub fn rotation(mut self, degrees: f32) -> Self {
        self.rotation = degrees;
        self
    }

    /// Reflect across the owner's vertical axis
    pub fn mirrored(&self) -> Self {
        Self {
            offset: Vec2::new(-self.offset.x, self.offset.y),
            rotation: -self.rotation,
            knockback_angle: mirror_angle(self.knockback_angle),
            ..*self
        }
    }

    pub(crate) fn is_valid(&self) -> bool {
        let values = [
            self.damage,
            self.base_knockback,
            self.fixed_knockback,
            self.knockback_growth,
        ];
        self.size.x > 0.0
            && self.size.y > 0.0
            && self.offset.is_finite()
            && self.knockback_angle.is_finite()
            && values.iter().all(|v| v.is_finite() && *v >= 0.0)
    }

    /// Knockback magnitude against a target of `mass` whose accumulated
    /// damage already includes this hit
    pub fn knockback_against(&self, mass: f32, damage_after_hit: f32) -> f32 {
        self.fixed_knockback
            + self.base_knockback / mass
            + self.knockback_growth * damage_after_hit / mass / 10.0
    }

    /// Launch velocity for a knockback magnitude (+y is down)
    pub fn launch_velocity(&self, knockback: f32) -> Vec2 {
        let theta = self.knockback_angle.to_radians();
        Vec2::new(knockback * theta.cos(), -knockback * theta.sin())
    }

    /// Freeze applied to attacker and target on connect
    pub fn hitpause(&self) -> u32 {
        round_ticks(
            (self.fixed_knockback + self.base_knockback + self.knockback_growth) * HITPAUSE_CONSTANT,
        )
    }

    /// Hitstun for a given knockback magnitude
    pub fn hitstun(knockback: f32) -> u32 {
        round_ticks(knockback * HITSTUN_CONSTANT)
    }
}

/// Identity of one hitbox instance: stable for the ticks of a single move
/// execution, fresh for every new execution
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HitboxKey {
    pub owner: EntityId,
    pub activation: u32,
    pub slot: u16,
}

/// Priority position of a hitbox. Hitboxes sharing `group` within one
/// activation are siblings; rank 0 is the highest priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Priority {
    pub group: u16,
    pub rank: u16,
}

/// Sibling set identity used by the resolver's dedup buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupKey {
    pub owner: EntityId,
    pub activation: u32,
    pub group: u16,
}

/// A hitbox live for exactly one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hitbox {
    pub key: HitboxKey,
    pub priority: Priority,
    pub spec: HitboxSpec,
}

impl Hitbox {
    pub fn owner(&self) -> EntityId {
        self.key.owner
    }

    pub fn group_key(&self) -> GroupKey {
        GroupKey {
            owner: self.key.owner,
            activation: self.key.activation,
            group: self.priority.group,
        }
    }

    /// True when `other` is a sibling with strictly higher priority
    pub fn is_outranked_by(&self, other: &Hitbox) -> bool {
        self.group_key() == other.group_key() && other.priority.rank < self.priority.rank
    }

    /// World-space volume given the owner's current centre
    pub fn world_rect(&self, owner_center: Vec2) -> Rect {
        Rect::from_center(owner_center + self.spec.offset, self.spec.size)
    }

    pub fn view(&self, owner_center: Vec2) -> HitboxView {
        HitboxView {
            owner: self.key.owner,
            rect: self.world_rect(owner_center),
            rotation: self.spec.rotation,
            knockback_angle: self.spec.knockback_angle,
        }
    }
}

/// Render-side description of an active hitbox, for debug overlays
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitboxView {
    pub owner: EntityId,
    pub rect: Rect,
    pub rotation: f32,
    pub knockback_angle: f32,
}

/// Hitboxes emitted during the current tick. Written by entity steps, read
/// once by the resolver, then cleared.
#[derive(Debug, Default)]
pub struct HitboxPool {
    hitboxes: Vec<Hitbox>,
}

impl HitboxPool {
    pub fn new() -> Self {
        Self {
            hitboxes: Vec::with_capacity(32),
        }
    }

    pub fn push(&mut self, hitbox: Hitbox) {
        self.hitboxes.push(hitbox);
    }

    /// Order by identity so resolution never depends on step order
    pub fn sort(&mut self) {
        self.hitboxes.sort_by_key(|h| h.key);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Hitbox> {
        self.hitboxes.iter()
    }

    pub fn as_slice(&self) -> &[Hitbox] {
        &self.hitboxes
    }

    pub fn len(&self) -> usize {
        self.hitboxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hitboxes.is_empty()
    }

    pub fn clear(&mut self) {
        self.hitboxes.clear();
    }
}
