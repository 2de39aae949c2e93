// Scene: entity arena and the fixed tick
//
// Per tick: step every entity, admit projectiles spawned during the step,
// resolve hits once, apply blast zones, then clear the hitbox pool.

use std::collections::BTreeMap;

use glam::Vec2;
use log::{debug, info};

use crate::engine::input::InputSnapshot;
use crate::game::characters::{Character, CharacterStats, Facing, SpriteFrame, StepContext};
use crate::game::combat::{HitEvent, HitResolver, HitboxPool, HitboxView, Moveset, Projectile, SpawnRequest};
use crate::game::entity::{Entity, EntityId, EntityKind};
use crate::game::error::ConfigError;
use crate::game::stage::Stage;

/// Something that happened during a tick
#[derive(Debug, Clone, PartialEq)]
pub enum TickEvent {
    Hit(HitEvent),
    ProjectileSpawned { id: EntityId, owner: EntityId },
    ProjectileExpired { id: EntityId, owner: EntityId },
    /// Left the blast zone; respawned at `respawn`
    KnockedOut {
        id: EntityId,
        damage: f32,
        respawn: Vec2,
    },
}

/// Output of one tick
#[derive(Debug, Clone, Default)]
pub struct TickReport {
    pub tick: u64,
    pub events: Vec<TickEvent>,
    /// Hitboxes that were live this tick, for debug overlays
    pub hitboxes: Vec<HitboxView>,
}

impl TickReport {
    pub fn hits(&self) -> impl Iterator<Item = &HitEvent> {
        self.events.iter().filter_map(|e| match e {
            TickEvent::Hit(hit) => Some(hit),
            _ => None,
        })
    }
}

/// Render-side snapshot of one entity
#[derive(Debug, Clone, PartialEq)]
pub struct EntityView {
    pub id: EntityId,
    pub kind: EntityKind,
    pub position: Vec2,
    pub size: Vec2,
    /// `None` for projectiles
    pub facing: Option<Facing>,
    pub state: &'static str,
    pub sprite: SpriteFrame,
    pub damage: f32,
}

#[derive(Debug)]
pub struct Scene {
    stage: Stage,
    /// Ordered by id; ids only ever grow
    entities: Vec<Entity>,
    next_id: EntityId,
    pool: HitboxPool,
    resolver: HitResolver,
    spawns: Vec<SpawnRequest>,
    hits: Vec<HitEvent>,
    tick: u64,
}

impl Scene {
    pub fn new(stage: Stage) -> Self {
        info!(
            "scene created with {} platforms, blast zone {:?}",
            stage.platform_count(),
            stage.blast_zone()
        );
        Self {
            stage,
            entities: Vec::new(),
            next_id: 0,
            pool: HitboxPool::new(),
            resolver: HitResolver::new(),
            spawns: Vec::new(),
            hits: Vec::new(),
            tick: 0,
        }
    }

    /// Add a character at the stage spawn point for the next free slot
    pub fn spawn_character(
        &mut self,
        name: &str,
        stats: CharacterStats,
        moveset: Moveset,
    ) -> Result<EntityId, ConfigError> {
        let slot = self.characters().count();
        let center = self.stage.spawn_point(slot);
        self.spawn_character_at(name, stats, moveset, center)
    }

    /// Add a character centred on `center`
    pub fn spawn_character_at(
        &mut self,
        name: &str,
        stats: CharacterStats,
        moveset: Moveset,
        center: Vec2,
    ) -> Result<EntityId, ConfigError> {
        let slot = self.characters().count();
        let position = center - Vec2::new(stats.width, stats.height) * 0.5;
        let id = self.next_id;
        let character = Character::new(id, name, slot, stats, moveset, position)?;
        self.next_id += 1;
        info!("{name} joins as entity {id} in slot {slot}");
        self.entities.push(Entity::Character(character));
        Ok(id)
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    /// Platforms may be changed between ticks
    pub fn stage_mut(&mut self) -> &mut Stage {
        &mut self.stage
    }

    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.index_of(id).map(|i| &self.entities[i])
    }

    pub fn character(&self, id: EntityId) -> Option<&Character> {
        self.entity(id).and_then(Entity::as_character)
    }

    pub fn character_mut(&mut self, id: EntityId) -> Option<&mut Character> {
        let index = self.index_of(id)?;
        self.entities[index].as_character_mut()
    }

    pub fn characters(&self) -> impl Iterator<Item = &Character> {
        self.entities.iter().filter_map(Entity::as_character)
    }

    fn index_of(&self, id: EntityId) -> Option<usize> {
        self.entities.binary_search_by_key(&id, Entity::id).ok()
    }

    /// Advance the whole scene by one tick. Characters without an entry in
    /// `inputs` receive neutral input.
    pub fn tick(&mut self, inputs: &BTreeMap<EntityId, InputSnapshot>) -> TickReport {
        let mut events = Vec::new();

        for entity in &mut self.entities {
            match entity {
                Entity::Character(character) => {
                    let input = inputs.get(&character.id).copied().unwrap_or(InputSnapshot::NEUTRAL);
                    let mut ctx = StepContext {
                        stage: &self.stage,
                        pool: &mut self.pool,
                        spawns: &mut self.spawns,
                    };
                    character.step(&input, &mut ctx);
                }
                Entity::Projectile(projectile) => projectile.step(&self.stage, &mut self.pool),
            }
        }

        for request in self.spawns.drain(..) {
            let id = self.next_id;
            self.next_id += 1;
            debug!("projectile {id} spawned by {}", request.owner);
            self.entities.push(Entity::Projectile(Projectile::new(id, &request)));
            events.push(TickEvent::ProjectileSpawned {
                id,
                owner: request.owner,
            });
        }

        self.pool.sort();
        let hitboxes = self
            .pool
            .iter()
            .filter_map(|h| self.entity(h.owner()).map(|owner| h.view(owner.center())))
            .collect();

        self.resolver.resolve(&self.pool, &mut self.entities, &mut self.hits);
        events.extend(self.hits.drain(..).map(TickEvent::Hit));

        self.apply_blast_zone(&mut events);
        self.pool.clear();

        let report = TickReport {
            tick: self.tick,
            events,
            hitboxes,
        };
        self.tick += 1;
        report
    }

    fn apply_blast_zone(&mut self, events: &mut Vec<TickEvent>) {
        let stage = &self.stage;
        for entity in &mut self.entities {
            let Entity::Character(character) = entity else {
                continue;
            };
            if !stage.is_out_of_bounds(&character.body.rect()) {
                continue;
            }
            let respawn = stage.spawn_point(character.slot);
            info!(
                "{} knocked out at {:.0}% (fall {})",
                character.name,
                character.damage,
                character.falls + 1
            );
            events.push(TickEvent::KnockedOut {
                id: character.id,
                damage: character.damage,
                respawn,
            });
            character.falls += 1;
            character.respawn(respawn);
        }

        self.entities.retain(|entity| {
            let Entity::Projectile(projectile) = entity else {
                return true;
            };
            if projectile.is_expired() || stage.is_out_of_bounds(&projectile.body.rect()) {
                events.push(TickEvent::ProjectileExpired {
                    id: projectile.id,
                    owner: projectile.owner,
                });
                return false;
            }
            true
        });
    }

    /// Snapshot every entity for rendering
    pub fn views(&self) -> Vec<EntityView> {
        self.entities
            .iter()
            .map(|entity| match entity {
                Entity::Character(c) => EntityView {
                    id: c.id,
                    kind: EntityKind::Character,
                    position: c.body.position,
                    size: c.body.size,
                    facing: Some(c.facing),
                    state: c.state().animation_name(),
                    sprite: c.sprite(),
                    damage: c.damage,
                },
                Entity::Projectile(p) => EntityView {
                    id: p.id,
                    kind: EntityKind::Projectile,
                    position: p.body.position,
                    size: p.body.size,
                    facing: None,
                    state: "projectile",
                    sprite: SpriteFrame {
                        animation: "projectile",
                        frame: 0,
                    },
                    damage: p.damage,
                },
            })
            .collect()
    }
}
