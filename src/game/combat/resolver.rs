// Hit resolution
//
// Runs once per tick after every entity has stepped. All collisions are
// gathered first, then applied in pool order, so the applied subset only
// depends on the overlap set and the sibling chains.

use std::collections::VecDeque;

use glam::Vec2;
use log::debug;

use crate::game::entity::{Entity, EntityId};

use super::hitbox::{GroupKey, HitboxKey, HitboxPool, HitboxSpec};
use super::HANDLED_CAPACITY;

/// Everything a target receives from one applied hit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitEffect {
    pub damage: f32,
    pub knockback: f32,
    /// Replaces the target's velocity
    pub velocity: Vec2,
    pub hitstun: u32,
    /// Applied to both target and attacker
    pub hitpause: u32,
}

impl HitEffect {
    /// Compute the effect of `spec` on a target of `mass` carrying
    /// `damage_before` accumulated damage
    pub fn compute(spec: &HitboxSpec, mass: f32, damage_before: f32) -> Self {
        let knockback = spec.knockback_against(mass, damage_before + spec.damage);
        Self {
            damage: spec.damage,
            knockback,
            velocity: spec.launch_velocity(knockback),
            hitstun: HitboxSpec::hitstun(knockback),
            hitpause: spec.hitpause(),
        }
    }
}

/// An applied hit, reported to the caller
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitEvent {
    pub attacker: EntityId,
    pub target: EntityId,
    pub hitbox: HitboxKey,
    pub effect: HitEffect,
    /// Target damage after the hit
    pub total_damage: f32,
}

#[derive(Debug)]
pub struct HitResolver {
    /// Recently resolved (sibling group, target) pairs, oldest first
    handled: VecDeque<(GroupKey, EntityId)>,
    capacity: usize,
    /// (pool index, entity index) pairs overlapping this tick
    collisions: Vec<(usize, usize)>,
}

impl Default for HitResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl HitResolver {
    pub fn new() -> Self {
        Self::with_capacity(HANDLED_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            handled: VecDeque::with_capacity(capacity),
            capacity,
            collisions: Vec::new(),
        }
    }

    /// Check if `group` already hit `target`
    pub fn is_handled(&self, group: GroupKey, target: EntityId) -> bool {
        self.handled.contains(&(group, target))
    }

    pub fn handled_len(&self) -> usize {
        self.handled.len()
    }

    pub fn clear(&mut self) {
        self.handled.clear();
        self.collisions.clear();
    }

    fn remember(&mut self, group: GroupKey, target: EntityId) {
        self.handled.push_back((group, target));
        while self.handled.len() > self.capacity {
            self.handled.pop_front();
        }
    }

    /// Resolve every hitbox in `pool` against `entities`.
    ///
    /// `entities` must be ordered by id, which the scene arena guarantees.
    /// Applied hits are appended to `events`.
    pub fn resolve(&mut self, pool: &HitboxPool, entities: &mut [Entity], events: &mut Vec<HitEvent>) {
        let hitboxes = pool.as_slice();
        let mut collisions = std::mem::take(&mut self.collisions);
        collisions.clear();

        for (h, hitbox) in hitboxes.iter().enumerate() {
            let Some(owner) = find(entities, hitbox.owner()) else {
                continue;
            };
            let owner_entity = &entities[owner];
            let rect = hitbox.world_rect(owner_entity.center());
            let owner_parent = owner_entity.projectile_owner();

            for (t, target) in entities.iter().enumerate() {
                let target_id = target.id();
                if target_id == hitbox.owner()
                    || owner_parent == Some(target_id)
                    || target.projectile_owner() == Some(hitbox.owner())
                    || target.is_intangible()
                {
                    continue;
                }
                if rect.intersects(&target.rect()) {
                    collisions.push((h, t));
                }
            }
        }

        for &(h, t) in &collisions {
            let hitbox = &hitboxes[h];
            let target_id = entities[t].id();
            let group = hitbox.group_key();
            if self.is_handled(group, target_id) {
                continue;
            }
            let outranked = collisions
                .iter()
                .any(|&(other, ot)| ot == t && hitbox.is_outranked_by(&hitboxes[other]));
            if outranked {
                continue;
            }

            let target = &mut entities[t];
            let effect = HitEffect::compute(&hitbox.spec, target.mass(), target.damage());
            target.receive_hit(&effect);
            let total_damage = target.damage();

            if let Some(attacker) = find(entities, hitbox.owner()) {
                entities[attacker].set_hitpause(effect.hitpause);
                entities[attacker].on_hit_landed();
            }
            self.remember(group, target_id);

            debug!(
                "hit: {} -> {} slot {} for {:.1} (kb {:.2}, total {:.1})",
                hitbox.owner(),
                target_id,
                hitbox.key.slot,
                effect.damage,
                effect.knockback,
                total_damage
            );
            events.push(HitEvent {
                attacker: hitbox.owner(),
                target: target_id,
                hitbox: hitbox.key,
                effect,
                total_damage,
            });
        }

        self.collisions = collisions;
    }
}

fn find(entities: &[Entity], id: EntityId) -> Option<usize> {
    entities.binary_search_by_key(&id, Entity::id).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::characters::{Character, CharacterState, CharacterStats};
    use crate::game::combat::hitbox::{Hitbox, Priority};
    use crate::game::combat::moves::Moveset;
    use crate::game::combat::projectile::{Projectile, ProjectileSpec, SpawnRequest};
    use approx::assert_relative_eq;

    fn fighter(id: EntityId, x: f32) -> Entity {
        let character = Character::new(
            id,
            "dummy",
            id as usize,
            CharacterStats::standard(),
            Moveset::new(),
            Vec2::new(x, 0.0),
        );
        match character {
            Ok(character) => Entity::Character(character),
            Err(err) => panic!("standard stats rejected: {err}"),
        }
    }

    fn spec() -> HitboxSpec {
        HitboxSpec::new(Vec2::new(50.0, 0.0), Vec2::splat(20.0))
            .damage(10.0)
            .knockback(10.0, 20.0)
            .angle(30.0)
    }

    fn hitbox(owner: EntityId, activation: u32, slot: u16, group: u16, rank: u16) -> Hitbox {
        Hitbox {
            key: HitboxKey {
                owner,
                activation,
                slot,
            },
            priority: Priority { group, rank },
            spec: spec(),
        }
    }

    fn character(entity: &Entity) -> &Character {
        match entity {
            Entity::Character(c) => c,
            Entity::Projectile(_) => panic!("expected a character"),
        }
    }

    #[test]
    fn test_end_to_end_hit() {
        let mut entities = vec![fighter(0, 0.0), fighter(1, 50.0)];
        let mut pool = HitboxPool::new();
        pool.push(hitbox(0, 1, 0, 0, 0));
        let mut resolver = HitResolver::new();
        let mut events = Vec::new();

        resolver.resolve(&pool, &mut entities, &mut events);

        assert_eq!(events.len(), 1);
        let effect = events[0].effect;
        assert_relative_eq!(effect.knockback, 3.0, epsilon = 1e-5);
        assert_relative_eq!(effect.velocity.x, 2.598076, epsilon = 1e-4);
        assert_relative_eq!(effect.velocity.y, -1.5, epsilon = 1e-4);

        let target = character(&entities[1]);
        assert_relative_eq!(target.damage, 10.0);
        assert_eq!(target.state(), CharacterState::HitAerial);
        assert_eq!(target.hitstun, 12);
        assert_eq!(target.hitpause, 6);
        assert_eq!(target.body.velocity, effect.velocity);

        let attacker = character(&entities[0]);
        assert_eq!(attacker.hitpause, 6);
        assert_relative_eq!(attacker.damage, 0.0);
    }

    #[test]
    fn test_never_hits_owner() {
        let mut entities = vec![fighter(0, 0.0)];
        let mut pool = HitboxPool::new();
        let mut own = hitbox(0, 1, 0, 0, 0);
        own.spec.offset = Vec2::ZERO;
        pool.push(own);
        let mut events = Vec::new();
        HitResolver::new().resolve(&pool, &mut entities, &mut events);
        assert!(events.is_empty());
        assert_eq!(character(&entities[0]).damage, 0.0);
    }

    #[test]
    fn test_only_top_sibling_applies() {
        let mut entities = vec![fighter(0, 0.0), fighter(1, 50.0)];
        let mut pool = HitboxPool::new();
        // Pushed lowest priority first; pool order must not matter
        pool.push(hitbox(0, 1, 2, 0, 2));
        pool.push(hitbox(0, 1, 1, 0, 1));
        pool.push(hitbox(0, 1, 0, 0, 0));
        pool.sort();
        let mut events = Vec::new();
        HitResolver::new().resolve(&pool, &mut entities, &mut events);

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].hitbox.slot, 0);
        assert_relative_eq!(character(&entities[1]).damage, 10.0);
    }

    #[test]
    fn test_persistent_overlap_hits_once() {
        let mut entities = vec![fighter(0, 0.0), fighter(1, 50.0)];
        let mut resolver = HitResolver::new();
        let mut events = Vec::new();
        for tick in 0..5 {
            let mut pool = HitboxPool::new();
            // Sour box shows up alone on later ticks but shares the group
            let slot = if tick == 0 { 0 } else { 1 };
            pool.push(hitbox(0, 1, slot, 0, slot));
            resolver.resolve(&pool, &mut entities, &mut events);
        }
        assert_eq!(events.len(), 1);
        assert_eq!(resolver.handled_len(), 1);

        // A new activation is a new hit
        let mut pool = HitboxPool::new();
        pool.push(hitbox(0, 2, 0, 0, 0));
        resolver.resolve(&pool, &mut entities, &mut events);
        assert_eq!(events.len(), 2);
        assert_relative_eq!(character(&entities[1]).damage, 20.0);
    }

    #[test]
    fn test_unrelated_groups_both_apply() {
        let mut entities = vec![fighter(0, 0.0), fighter(1, 50.0)];
        let mut pool = HitboxPool::new();
        pool.push(hitbox(0, 1, 0, 0, 0));
        pool.push(hitbox(0, 1, 1, 1, 0));
        let mut events = Vec::new();
        HitResolver::new().resolve(&pool, &mut entities, &mut events);
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn test_projectile_ownership_rules() {
        let shot = ProjectileSpec {
            offset: Vec2::ZERO,
            size: Vec2::splat(10.0),
            velocity: Vec2::ZERO,
            gravity: 0.0,
            mass: 2.0,
            restitution: 0.0,
            lifetime: 30,
            fragile: true,
            hitbox: HitboxSpec::new(Vec2::ZERO, Vec2::splat(10.0)).damage(3.0),
        };
        // Owner and its projectile overlap each other
        let projectile = Projectile::new(
            1,
            &SpawnRequest {
                owner: 0,
                center: Vec2::new(20.0, 40.0),
                spec: shot,
            },
        );
        let mut entities = vec![fighter(0, 0.0), Entity::Projectile(projectile)];
        let mut pool = HitboxPool::new();
        let mut own = hitbox(0, 1, 0, 0, 0);
        own.spec.offset = Vec2::ZERO;
        pool.push(own);
        pool.push(Hitbox {
            key: HitboxKey {
                owner: 1,
                activation: 0,
                slot: 0,
            },
            priority: Priority { group: 0, rank: 0 },
            spec: shot.hitbox,
        });
        let mut events = Vec::new();
        HitResolver::new().resolve(&pool, &mut entities, &mut events);
        assert!(events.is_empty());
    }

    #[test]
    fn test_projectile_hits_other_character() {
        let shot = ProjectileSpec {
            offset: Vec2::ZERO,
            size: Vec2::splat(10.0),
            velocity: Vec2::ZERO,
            gravity: 0.0,
            mass: 2.0,
            restitution: 0.0,
            lifetime: 30,
            fragile: true,
            hitbox: HitboxSpec::new(Vec2::ZERO, Vec2::splat(10.0)).damage(3.0),
        };
        let projectile = Projectile::new(
            2,
            &SpawnRequest {
                owner: 0,
                center: Vec2::new(320.0, 40.0),
                spec: shot,
            },
        );
        let mut entities = vec![
            fighter(0, 0.0),
            fighter(1, 300.0),
            Entity::Projectile(projectile),
        ];
        let mut pool = HitboxPool::new();
        pool.push(Hitbox {
            key: HitboxKey {
                owner: 2,
                activation: 0,
                slot: 0,
            },
            priority: Priority { group: 0, rank: 0 },
            spec: shot.hitbox,
        });
        let mut events = Vec::new();
        HitResolver::new().resolve(&pool, &mut entities, &mut events);

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].target, 1);
        assert_relative_eq!(character(&entities[1]).damage, 3.0);
        assert!(matches!(&entities[2], Entity::Projectile(p) if p.is_expired()));
    }

    #[test]
    fn test_intangible_target_skipped() {
        let mut entities = vec![fighter(0, 0.0), fighter(1, 50.0)];
        if let Entity::Character(target) = &mut entities[1] {
            target.state_machine.transition(CharacterState::AirDodge);
        }
        let mut pool = HitboxPool::new();
        pool.push(hitbox(0, 1, 0, 0, 0));
        let mut events = Vec::new();
        HitResolver::new().resolve(&pool, &mut entities, &mut events);
        assert!(events.is_empty());
    }

    #[test]
    fn test_oldest_pair_evicted() {
        let mut entities = vec![fighter(0, 0.0), fighter(1, 50.0)];
        let mut resolver = HitResolver::with_capacity(2);
        let mut events = Vec::new();
        for activation in 0..3 {
            let mut pool = HitboxPool::new();
            pool.push(hitbox(0, activation, 0, 0, 0));
            resolver.resolve(&pool, &mut entities, &mut events);
        }
        assert_eq!(resolver.handled_len(), 2);
        let first = hitbox(0, 0, 0, 0, 0).group_key();
        let last = hitbox(0, 2, 0, 0, 0).group_key();
        assert!(!resolver.is_handled(first, 1));
        assert!(resolver.is_handled(last, 1));
    }

    #[test]
    fn test_missing_owner_skipped() {
        let mut entities = vec![fighter(1, 50.0)];
        let mut pool = HitboxPool::new();
        pool.push(hitbox(7, 1, 0, 0, 0));
        let mut events = Vec::new();
        HitResolver::new().resolve(&pool, &mut entities, &mut events);
        assert!(events.is_empty());
    }
}
