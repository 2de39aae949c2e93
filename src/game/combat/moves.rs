// Moves: frame-indexed hitbox schedules

use std::collections::HashMap;

use glam::Vec2;

use crate::game::characters::Facing;
use crate::game::entity::EntityId;
use crate::game::error::ConfigError;

use super::hitbox::{Hitbox, HitboxKey, HitboxPool, HitboxSpec, Priority};
use super::projectile::ProjectileSpec;

/// Input slot a move is bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveSlot {
    Jab,
    ForwardTilt,
    NeutralAir,
    NeutralSpecial,
    UpSpecial,
}

impl MoveSlot {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Jab => "jab",
            Self::ForwardTilt => "forward_tilt",
            Self::NeutralAir => "neutral_air",
            Self::NeutralSpecial => "neutral_special",
            Self::UpSpecial => "up_special",
        }
    }
}

/// How a move ends and which physics it runs under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveKind {
    /// Ground friction; ends in Stand
    Grounded,
    /// Air drift; ends in Fall with landing lag armed
    Aerial,
    /// Air drift; ends helpless in SpecialFall
    Recovery,
}

/// One animation frame of a move
#[derive(Debug, Clone, PartialEq)]
pub struct FrameData {
    pub sprite: &'static str,
    /// Hitbox slots active while this frame is shown
    pub hitboxes: Vec<usize>,
    /// Velocity set on the first tick of this frame
    pub velocity: Option<Vec2>,
    /// Projectile launched on the first tick of this frame
    pub spawn: Option<ProjectileSpec>,
}

impl FrameData {
    pub fn new(sprite: &'static str, hitboxes: &[usize]) -> Self {
        Self {
            sprite,
            hitboxes: hitboxes.to_vec(),
            velocity: None,
            spawn: None,
        }
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = Some(velocity);
        self
    }

    pub fn with_spawn(mut self, spawn: ProjectileSpec) -> Self {
        self.spawn = Some(spawn);
        self
    }

    fn mirrored(&self) -> Self {
        Self {
            sprite: self.sprite,
            hitboxes: self.hitboxes.clone(),
            velocity: self.velocity.map(|v| Vec2::new(-v.x, v.y)),
            spawn: self.spawn.map(|s| s.mirrored()),
        }
    }
}

/// Authored move data, shared configuration for every execution
#[derive(Debug, Clone, PartialEq)]
pub struct MoveData {
    pub name: &'static str,
    pub kind: MoveKind,
    pub frames: Vec<FrameData>,
    pub hitboxes: Vec<HitboxSpec>,
    /// Sibling chains, each ordered highest priority first
    pub priority_chains: Vec<Vec<usize>>,
    /// Landing lag when an aerial touches down, in ticks
    pub landing_lag: u32,
}

impl MoveData {
    pub fn new(name: &'static str, kind: MoveKind) -> Self {
        Self {
            name,
            kind,
            frames: Vec::new(),
            hitboxes: Vec::new(),
            priority_chains: Vec::new(),
            landing_lag: 0,
        }
    }

    /// Add a hitbox template, returning its slot
    pub fn add_hitbox(&mut self, spec: HitboxSpec) -> usize {
        self.hitboxes.push(spec);
        self.hitboxes.len() - 1
    }

    pub fn frame(mut self, frame: FrameData) -> Self {
        self.frames.push(frame);
        self
    }

    /// Append `count` copies of a frame
    pub fn frames(mut self, count: usize, frame: FrameData) -> Self {
        self.frames.extend(std::iter::repeat(frame).take(count));
        self
    }

    /// Declare sibling hitboxes, highest priority first
    pub fn prioritize(mut self, chain: &[usize]) -> Self {
        self.priority_chains.push(chain.to_vec());
        self
    }

    pub fn landing_lag(mut self, ticks: u32) -> Self {
        self.landing_lag = ticks;
        self
    }

    /// Check every cross reference in the tables
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.frames.is_empty() {
            return Err(ConfigError::EmptyFrameTable(self.name));
        }
        for (slot, spec) in self.hitboxes.iter().enumerate() {
            if !spec.is_valid() || slot > u16::MAX as usize {
                return Err(ConfigError::InvalidHitbox {
                    name: self.name,
                    slot,
                });
            }
        }
        for (frame, data) in self.frames.iter().enumerate() {
            if let Some(&slot) = data.hitboxes.iter().find(|&&s| s >= self.hitboxes.len()) {
                return Err(ConfigError::MissingHitbox {
                    name: self.name,
                    frame,
                    slot,
                });
            }
            if let Some(spawn) = &data.spawn {
                spawn.validate(self.name)?;
            }
        }
        let mut seen = vec![false; self.hitboxes.len()];
        for &slot in self.priority_chains.iter().flatten() {
            match seen.get_mut(slot) {
                None => {
                    return Err(ConfigError::MissingSibling {
                        name: self.name,
                        slot,
                    })
                }
                Some(true) => {
                    return Err(ConfigError::SiblingInTwoChains {
                        name: self.name,
                        slot,
                    })
                }
                Some(flag) => *flag = true,
            }
        }
        Ok(())
    }

    /// Priority for every slot. Chained slots share their chain's group;
    /// unchained slots each get a group of their own.
    fn priorities(&self) -> Vec<Priority> {
        let chains = self.priority_chains.len();
        let mut priorities: Vec<Priority> = (0..self.hitboxes.len())
            .map(|slot| Priority {
                group: (chains + slot) as u16,
                rank: 0,
            })
            .collect();
        for (group, chain) in self.priority_chains.iter().enumerate() {
            for (rank, &slot) in chain.iter().enumerate() {
                priorities[slot] = Priority {
                    group: group as u16,
                    rank: rank as u16,
                };
            }
        }
        priorities
    }

    fn mirrored(&self) -> Self {
        Self {
            frames: self.frames.iter().map(FrameData::mirrored).collect(),
            hitboxes: self.hitboxes.iter().map(HitboxSpec::mirrored).collect(),
            ..self.clone()
        }
    }
}

/// Result of advancing a move by one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MoveStep {
    Active {
        sprite: &'static str,
        frame: usize,
        /// First tick on this frame
        entered: bool,
        velocity: Option<Vec2>,
        spawn: Option<ProjectileSpec>,
    },
    /// Frame index ran past the table
    Finished,
}

/// One execution of a move, owned by the character performing it
#[derive(Debug, Clone)]
pub struct Move {
    slot: MoveSlot,
    data: MoveData,
    priorities: Vec<Priority>,
    activation: u32,
    last_frame: Option<usize>,
}

impl Move {
    /// Build an execution facing `facing`. Tables are mirrored here, once,
    /// when facing left.
    pub fn new(slot: MoveSlot, data: &MoveData, facing: Facing, activation: u32) -> Self {
        let data = match facing {
            Facing::Right => data.clone(),
            Facing::Left => data.mirrored(),
        };
        Self {
            slot,
            priorities: data.priorities(),
            data,
            activation,
            last_frame: None,
        }
    }

    pub fn slot(&self) -> MoveSlot {
        self.slot
    }

    pub fn kind(&self) -> MoveKind {
        self.data.kind
    }

    pub fn name(&self) -> &'static str {
        self.data.name
    }

    pub fn landing_lag(&self) -> u32 {
        self.data.landing_lag
    }

    pub fn activation(&self) -> u32 {
        self.activation
    }

    /// Look up the frame for `state_tick` and emit its hitboxes into `pool`
    pub fn step(
        &mut self,
        state_tick: u32,
        frame_duration: u32,
        owner: EntityId,
        pool: &mut HitboxPool,
    ) -> MoveStep {
        let index = (state_tick / frame_duration.max(1)) as usize;
        let Some(frame) = self.data.frames.get(index) else {
            return MoveStep::Finished;
        };

        for &slot in &frame.hitboxes {
            // Validated at construction; a bad slot is skipped, never a panic
            let (Some(spec), Some(priority)) =
                (self.data.hitboxes.get(slot), self.priorities.get(slot))
            else {
                continue;
            };
            pool.push(Hitbox {
                key: HitboxKey {
                    owner,
                    activation: self.activation,
                    slot: slot as u16,
                },
                priority: *priority,
                spec: *spec,
            });
        }

        let entered = self.last_frame != Some(index);
        self.last_frame = Some(index);
        MoveStep::Active {
            sprite: frame.sprite,
            frame: index,
            entered,
            velocity: frame.velocity.filter(|_| entered),
            spawn: frame.spawn.filter(|_| entered),
        }
    }
}

/// Moves a character can perform, keyed by input slot
#[derive(Debug, Clone, Default)]
pub struct Moveset {
    moves: HashMap<MoveSlot, MoveData>,
}

impl Moveset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, slot: MoveSlot, data: MoveData) -> Self {
        self.moves.insert(slot, data);
        self
    }

    pub fn get(&self, slot: MoveSlot) -> Option<&MoveData> {
        self.moves.get(&slot)
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.moves.values().try_for_each(MoveData::validate)
    }
}
