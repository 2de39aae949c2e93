// Character entity and per-state behavior

use glam::Vec2;
use log::debug;

use crate::core::math::{approach, decay_toward_zero};
use crate::engine::input::{Action, InputSnapshot};
use crate::engine::physics::Body;
use crate::game::combat::{
    HitEffect, HitboxPool, Move, MoveKind, MoveSlot, MoveStep, Moveset, SpawnRequest,
};
use crate::game::entity::EntityId;
use crate::game::error::ConfigError;
use crate::game::stage::{Contact, Side, Stage};

use super::animation::{AnimationSet, SpriteFrame};
use super::state::{CharacterState, CharacterStateMachine};
use super::stats::CharacterStats;

/// Direction a character faces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    /// 1.0 for right, -1.0 for left
    pub fn sign(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }

    /// The opposite direction
    pub fn flipped(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Facing implied by a horizontal axis value, if any
    pub fn from_axis(x: f32) -> Option<Self> {
        if x < 0.0 {
            Some(Self::Left)
        } else if x > 0.0 {
            Some(Self::Right)
        } else {
            None
        }
    }
}

/// Per-tick collaborators a character step writes into
pub struct StepContext<'a> {
    pub stage: &'a Stage,
    pub pool: &'a mut HitboxPool,
    pub spawns: &'a mut Vec<SpawnRequest>,
}

/// A player-controlled fighter
#[derive(Debug)]
pub struct Character {
    /// Unique identifier
    pub id: EntityId,
    /// Character name (for display and logs)
    pub name: String,
    /// Player slot, also picks the spawn point
    pub slot: usize,

    /// Movement and physics tunables
    pub stats: CharacterStats,
    /// Kinematic body, also the hurtbox
    pub body: Body,
    /// Current state and its tick counter
    pub state_machine: CharacterStateMachine,
    /// Clips the sprite is picked from
    pub animation: AnimationSet,
    moveset: Moveset,
    current_move: Option<Move>,
    activations: u32,

    // Combat state
    /// Accumulated damage, reset only on respawn
    pub damage: f32,
    pub facing: Facing,
    /// Falling at `fast_fall_speed`
    pub fast_fall: bool,
    /// Remaining ticks of hit reaction
    pub hitstun: u32,
    /// Remaining frozen ticks, nothing advances while non-zero
    pub hitpause: u32,
    /// Air options left until the next landing
    pub aerial_jumps: u8,
    pub air_dodges: u8,
    pub wall_jumps: u8,
    /// Times this character left the blast zone
    pub falls: u32,

    // Results of the last platform pass
    grounded: bool,
    just_landed: bool,
    wall: Option<Side>,

    /// Armed when an aerial ends before touching down
    pending_landing_lag: Option<u32>,
    /// Fast fall already spent this airborne period
    fast_fall_used: bool,
    sprite: SpriteFrame,
}

impl Character {
    /// Create a character with its top-left corner at `position`
    pub fn new(
        id: EntityId,
        name: &str,
        slot: usize,
        stats: CharacterStats,
        moveset: Moveset,
        position: Vec2,
    ) -> Result<Self, ConfigError> {
        stats.validate()?;
        moveset.validate()?;
        debug!("character {id} `{name}` with {} moves", moveset.len());

        Ok(Self {
            id,
            name: name.to_string(),
            slot,
            body: Body::new(position, Vec2::new(stats.width, stats.height)),
            state_machine: CharacterStateMachine::new(CharacterState::Fall),
            animation: AnimationSet::with_standard_clips(stats.frame_duration),
            moveset,
            current_move: None,
            activations: 0,
            damage: 0.0,
            facing: Facing::Right,
            fast_fall: false,
            hitstun: 0,
            hitpause: 0,
            aerial_jumps: stats.max_aerial_jumps,
            air_dodges: stats.max_air_dodges,
            wall_jumps: stats.max_wall_jumps,
            falls: 0,
            grounded: false,
            just_landed: false,
            wall: None,
            pending_landing_lag: None,
            fast_fall_used: false,
            sprite: SpriteFrame::default(),
            stats,
        })
    }

    /// Get the current state
    pub fn state(&self) -> CharacterState {
        self.state_machine.state()
    }

    /// Standing on a platform after the last platform pass
    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    /// Wall touched during the last platform pass
    pub fn wall(&self) -> Option<Side> {
        self.wall
    }

    /// Check if hitboxes currently pass through this character
    pub fn is_intangible(&self) -> bool {
        self.state().is_intangible()
    }

    /// Sprite picked during the last step
    pub fn sprite(&self) -> SpriteFrame {
        self.sprite
    }

    /// Get the character's moves
    pub fn moveset(&self) -> &Moveset {
        &self.moveset
    }

    /// Move being executed, if attacking
    pub fn current_move(&self) -> Option<&Move> {
        self.current_move.as_ref()
    }

    /// Landing lag the next touchdown will apply, if any
    pub fn pending_landing_lag(&self) -> Option<u32> {
        self.pending_landing_lag
    }

    /// Advance one tick.
    ///
    /// Does nothing but count down while in hitpause. Otherwise runs the
    /// handler for the current state, picks the sprite, then moves the body
    /// against the stage so the next step sees fresh contact results.
    /// Hitboxes and projectile requests go into `ctx`.
    pub fn step(&mut self, input: &InputSnapshot, ctx: &mut StepContext) {
        if self.hitpause > 0 {
            self.hitpause -= 1;
            return;
        }
        self.hitstun = self.hitstun.saturating_sub(1);
        self.state_machine.begin_step();
        self.body.begin_tick();

        match self.state() {
            CharacterState::Stand => self.stand(input),
            CharacterState::Run => self.run(input),
            CharacterState::RunTurnaround => self.run_turnaround(input),
            CharacterState::RunEnd => self.run_end(input),
            CharacterState::InitialDash => self.initial_dash(input),
            CharacterState::Crouch => self.crouch(input),
            CharacterState::Jumpsquat => self.jumpsquat(input),
            CharacterState::Fall => self.fall(input),
            CharacterState::SpecialFall => self.special_fall(input),
            CharacterState::AirDodge => self.air_dodge(),
            CharacterState::HitAerial => self.hit_aerial(),
            CharacterState::LandingLag { frames } => self.landing_lag(frames),
            CharacterState::Attack(_) => self.attack(input, ctx),
        }

        // Attacks pick their sprite from the move table while they run
        let state = self.state();
        if !matches!(state, CharacterState::Attack(_)) || self.state_machine.state_just_changed() {
            self.sprite = self
                .animation
                .frame_for(state.animation_name(), self.state_machine.state_tick());
        }

        let contact = ctx.stage.move_body(&mut self.body, input.is_down(Action::Down));
        self.apply_contact(contact);
    }

    /// Struck by a hitbox: add damage, overwrite velocity and enter the hit
    /// reaction. Any move in progress is cancelled.
    pub fn receive_hit(&mut self, effect: &HitEffect) {
        self.damage += effect.damage;
        self.body.velocity = effect.velocity;
        self.hitstun = effect.hitstun;
        self.hitpause = effect.hitpause;
        self.fast_fall = false;
        self.current_move = None;
        self.pending_landing_lag = None;
        self.state_machine.transition(CharacterState::HitAerial);
    }

    /// Place back on the stage with a fresh stock
    pub fn respawn(&mut self, position: Vec2) {
        self.body.teleport(position - Vec2::new(self.stats.width, self.stats.height) * 0.5);
        self.damage = 0.0;
        self.hitstun = 0;
        self.hitpause = 0;
        self.current_move = None;
        self.pending_landing_lag = None;
        self.grounded = false;
        self.just_landed = false;
        self.wall = None;
        self.reset_air_options();
        self.state_machine.transition(CharacterState::Fall);
    }

    fn apply_contact(&mut self, contact: Contact) {
        self.just_landed = contact.grounded && !self.grounded;
        self.grounded = contact.grounded;
        self.wall = contact.wall;
        if self.just_landed {
            self.reset_air_options();
        }
    }

    fn reset_air_options(&mut self) {
        self.aerial_jumps = self.stats.max_aerial_jumps;
        self.air_dodges = self.stats.max_air_dodges;
        self.wall_jumps = self.stats.max_wall_jumps;
        self.fast_fall = false;
        self.fast_fall_used = false;
    }

    // Shared transitions

    /// Jump, attack and special from any actionable grounded state.
    /// Returns true when the state changed.
    fn grounded_action(&mut self, input: &InputSnapshot) -> bool {
        if !self.grounded {
            self.state_machine.transition(CharacterState::Fall);
            return true;
        }
        if input.just_pressed(Action::Jump) {
            self.state_machine.transition(CharacterState::Jumpsquat);
            return true;
        }
        if input.just_pressed(Action::Attack) {
            let slot = match Facing::from_axis(input.horizontal()) {
                Some(facing) => {
                    self.facing = facing;
                    MoveSlot::ForwardTilt
                }
                None => MoveSlot::Jab,
            };
            return self.start_move(slot);
        }
        if input.just_pressed(Action::Special) {
            return self.start_move(Self::special_slot(input));
        }
        false
    }

    fn special_slot(input: &InputSnapshot) -> MoveSlot {
        if input.is_down(Action::Up) {
            MoveSlot::UpSpecial
        } else {
            MoveSlot::NeutralSpecial
        }
    }

    fn start_move(&mut self, slot: MoveSlot) -> bool {
        let Some(data) = self.moveset.get(slot) else {
            return false;
        };
        self.activations = self.activations.wrapping_add(1);
        let mv = Move::new(slot, data, self.facing, self.activations);
        debug!("{} starts {} (activation {})", self.name, mv.name(), mv.activation());
        self.current_move = Some(mv);
        self.pending_landing_lag = None;
        self.state_machine.transition(CharacterState::Attack(slot));
        true
    }

    fn land(&mut self) {
        match self.pending_landing_lag.take() {
            Some(frames) if frames > 0 => self.land_with_lag(frames),
            _ => self.state_machine.transition(CharacterState::Stand),
        }
    }

    /// Any touchdown consumes the armed aerial lag
    fn land_with_lag(&mut self, frames: u32) {
        self.pending_landing_lag = None;
        self.state_machine
            .transition(CharacterState::LandingLag { frames });
    }

    fn state_done(&self, frames: u32) -> bool {
        self.state_machine.state_tick().saturating_add(1) >= frames
    }

    // Physics

    fn ground_friction(&mut self) {
        self.body.velocity.x = decay_toward_zero(self.body.velocity.x, self.stats.friction);
        self.body.velocity.y = 0.0;
    }

    fn air_drift(&mut self, input: &InputSnapshot, control: f32) {
        let h = input.horizontal();
        let v = &mut self.body.velocity;
        if h != 0.0 {
            v.x = approach(v.x, h * self.stats.air_speed, self.stats.air_accel * control);
        } else {
            v.x = decay_toward_zero(v.x, self.stats.air_resistance);
        }
    }

    fn gravity(&mut self) {
        let v = &mut self.body.velocity;
        if self.fast_fall {
            v.y = self.stats.fast_fall_speed;
        } else {
            v.y = (v.y + self.stats.gravity).min(self.stats.fall_speed);
        }
    }

    // State handlers

    /// Idle: crouch on down, dash on a horizontal input
    fn stand(&mut self, input: &InputSnapshot) {
        if self.grounded_action(input) {
            return;
        }
        if input.is_down(Action::Down) {
            self.state_machine.transition(CharacterState::Crouch);
        } else if let Some(facing) = Facing::from_axis(input.horizontal()) {
            self.facing = facing;
            self.state_machine.transition(CharacterState::InitialDash);
        }
        self.ground_friction();
    }

    /// Fixed-speed dash; reversing restarts it the other way
    fn initial_dash(&mut self, input: &InputSnapshot) {
        if self.grounded_action(input) {
            return;
        }
        let held = Facing::from_axis(input.horizontal());
        if held == Some(self.facing.flipped()) {
            // Dash dance
            self.facing = self.facing.flipped();
            self.state_machine.transition(CharacterState::InitialDash);
        }
        self.body.velocity.x = self.facing.sign() * self.stats.dash_speed;
        self.body.velocity.y = 0.0;

        if self.state_done(self.stats.initial_dash_frames) && !self.state_machine.state_just_changed() {
            if held == Some(self.facing) {
                self.state_machine.transition(CharacterState::Run);
            } else {
                self.state_machine.transition(CharacterState::Stand);
            }
        }
    }

    fn run(&mut self, input: &InputSnapshot) {
        if self.grounded_action(input) {
            return;
        }
        if input.is_down(Action::Down) {
            self.state_machine.transition(CharacterState::Crouch);
            self.ground_friction();
            return;
        }
        match Facing::from_axis(input.horizontal()) {
            None => {
                self.state_machine.transition(CharacterState::RunEnd);
                self.ground_friction();
            }
            Some(facing) if facing != self.facing => {
                self.state_machine.transition(CharacterState::RunTurnaround);
                self.ground_friction();
            }
            Some(_) => {
                let target = self.facing.sign() * self.stats.run_speed;
                self.body.velocity.x = approach(self.body.velocity.x, target, self.stats.ground_accel);
                self.body.velocity.y = 0.0;
            }
        }
    }

    fn run_turnaround(&mut self, input: &InputSnapshot) {
        if !self.grounded {
            self.state_machine.transition(CharacterState::Fall);
            return;
        }
        if input.just_pressed(Action::Jump) {
            self.state_machine.transition(CharacterState::Jumpsquat);
            return;
        }
        self.ground_friction();
        if self.state_done(self.stats.turnaround_frames) {
            self.facing = self.facing.flipped();
            if Facing::from_axis(input.horizontal()) == Some(self.facing) {
                self.state_machine.transition(CharacterState::Run);
            } else {
                self.state_machine.transition(CharacterState::Stand);
            }
        }
    }

    fn run_end(&mut self, input: &InputSnapshot) {
        if self.grounded_action(input) {
            return;
        }
        self.ground_friction();
        match Facing::from_axis(input.horizontal()) {
            Some(facing) if facing != self.facing => {
                self.state_machine.transition(CharacterState::RunTurnaround);
            }
            Some(_) => self.state_machine.transition(CharacterState::Run),
            None if self.state_done(self.stats.run_end_frames) => {
                self.state_machine.transition(CharacterState::Stand);
            }
            None => {}
        }
    }

    fn crouch(&mut self, input: &InputSnapshot) {
        if self.grounded_action(input) {
            return;
        }
        self.ground_friction();
        if !input.is_down(Action::Down) {
            self.state_machine.transition(CharacterState::Stand);
        }
    }

    /// Leaves the ground on the last frame, full hop if jump is still held
    fn jumpsquat(&mut self, input: &InputSnapshot) {
        self.ground_friction();
        if self.state_done(self.stats.jumpsquat_frames) {
            self.body.velocity.y = if input.is_down(Action::Jump) {
                -self.stats.jump_speed
            } else {
                -self.stats.shorthop_speed
            };
            self.state_machine.transition(CharacterState::Fall);
        }
    }

    /// Airborne and actionable
    fn fall(&mut self, input: &InputSnapshot) {
        if self.grounded {
            self.land();
            self.ground_friction();
            return;
        }

        if input.just_pressed(Action::Jump) {
            // Wall jumps take precedence over aerial jumps
            if let Some(side) = self.wall.filter(|_| self.wall_jumps > 0) {
                let away = match side {
                    Side::Left => Facing::Right,
                    Side::Right => Facing::Left,
                };
                self.wall_jumps -= 1;
                self.facing = away;
                self.fast_fall = false;
                self.body.velocity = Vec2::new(
                    away.sign() * self.stats.wall_jump_speed.x,
                    -self.stats.wall_jump_speed.y,
                );
                self.state_machine.transition(CharacterState::Fall);
                return;
            }
            if self.aerial_jumps > 0 {
                self.aerial_jumps -= 1;
                self.fast_fall = false;
                self.body.velocity = Vec2::new(
                    input.horizontal() * self.stats.air_speed,
                    -self.stats.aerial_jump_speed,
                );
                self.state_machine.transition(CharacterState::Fall);
                return;
            }
        }

        if input.just_pressed(Action::Dodge) && self.air_dodges > 0 {
            self.air_dodges -= 1;
            self.fast_fall = false;
            let direction = Vec2::new(input.horizontal(), input.vertical()).normalize_or_zero();
            self.body.velocity = direction * self.stats.air_dodge_speed;
            self.state_machine.transition(CharacterState::AirDodge);
            return;
        }

        if input.just_pressed(Action::Attack) && self.start_move(MoveSlot::NeutralAir) {
            self.air_drift(input, 1.0);
            self.gravity();
            return;
        }
        if input.just_pressed(Action::Special) && self.start_move(Self::special_slot(input)) {
            self.air_drift(input, 1.0);
            self.gravity();
            return;
        }

        if !self.fast_fall_used && input.just_pressed(Action::Down) && self.body.velocity.y > 0.0 {
            self.fast_fall = true;
            self.fast_fall_used = true;
        }
        self.air_drift(input, 1.0);
        self.gravity();
    }

    fn special_fall(&mut self, input: &InputSnapshot) {
        if self.grounded {
            self.land_with_lag(self.stats.landing_lag_frames);
            self.ground_friction();
            return;
        }
        self.air_drift(input, self.stats.special_fall_control);
        self.gravity();
    }

    /// Speed decays linearly to zero over the dodge
    fn air_dodge(&mut self) {
        if self.grounded {
            self.land_with_lag(self.stats.landing_lag_frames);
            self.ground_friction();
            return;
        }
        let decay = self.stats.air_dodge_speed / self.stats.air_dodge_frames as f32;
        let v = self.body.velocity;
        self.body.velocity = v.clamp_length_max((v.length() - decay).max(0.0));
        if self.state_done(self.stats.air_dodge_frames) {
            self.state_machine.transition(CharacterState::Fall);
        }
    }

    fn hit_aerial(&mut self) {
        if self.hitstun == 0 {
            let next = if self.grounded {
                CharacterState::Stand
            } else {
                CharacterState::Fall
            };
            self.state_machine.transition(next);
            return;
        }
        if self.grounded && self.body.velocity.y >= 0.0 {
            self.ground_friction();
        } else {
            self.body.velocity.x = decay_toward_zero(self.body.velocity.x, self.stats.air_resistance);
            self.gravity();
        }
    }

    fn landing_lag(&mut self, frames: u32) {
        if !self.grounded {
            self.state_machine.transition(CharacterState::Fall);
            return;
        }
        self.ground_friction();
        if self.state_done(frames) {
            self.state_machine.transition(CharacterState::Stand);
        }
    }

    /// Run the current move for one tick and leave the state when it ends
    /// or when an aerial touches down
    fn attack(&mut self, input: &InputSnapshot, ctx: &mut StepContext) {
        let Some(mut mv) = self.current_move.take() else {
            let next = if self.grounded {
                CharacterState::Stand
            } else {
                CharacterState::Fall
            };
            self.state_machine.transition(next);
            return;
        };

        let kind = mv.kind();
        if kind != MoveKind::Grounded && self.just_landed {
            self.pending_landing_lag = Some(mv.landing_lag());
            self.land();
            self.ground_friction();
            return;
        }
        if kind == MoveKind::Grounded && !self.grounded {
            self.state_machine.transition(CharacterState::Fall);
            return;
        }

        let step = mv.step(
            self.state_machine.state_tick(),
            self.stats.frame_duration,
            self.id,
            ctx.pool,
        );
        match step {
            MoveStep::Active {
                sprite,
                frame,
                velocity,
                spawn,
                ..
            } => {
                self.sprite = SpriteFrame {
                    animation: sprite,
                    frame: frame as u32,
                };
                if let Some(spec) = spawn {
                    ctx.spawns.push(SpawnRequest {
                        owner: self.id,
                        center: self.body.center() + spec.offset,
                        spec,
                    });
                }
                if let Some(velocity) = velocity {
                    self.body.velocity = velocity;
                } else if self.grounded {
                    self.ground_friction();
                } else {
                    self.air_drift(input, 1.0);
                    self.gravity();
                }
                self.current_move = Some(mv);
            }
            MoveStep::Finished => {
                let next = match (kind, self.grounded) {
                    (_, true) => CharacterState::Stand,
                    (MoveKind::Recovery, false) => CharacterState::SpecialFall,
                    (MoveKind::Aerial, false) => {
                        self.pending_landing_lag = Some(mv.landing_lag());
                        CharacterState::Fall
                    }
                    (MoveKind::Grounded, false) => CharacterState::Fall,
                };
                self.state_machine.transition(next);
                if self.grounded {
                    self.ground_friction();
                } else {
                    self.gravity();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::physics::Rect;
    use crate::game::characters::roster::brawler_moveset;
    use crate::game::stage::Platform;
    use approx::assert_relative_eq;

    struct Rig {
        stage: Stage,
        pool: HitboxPool,
        spawns: Vec<SpawnRequest>,
    }

    impl Rig {
        fn new(platforms: Vec<Platform>) -> Self {
            Self {
                stage: Stage::from_platforms(Rect::new(-2000.0, -2000.0, 5000.0, 5000.0), platforms),
                pool: HitboxPool::new(),
                spawns: Vec::new(),
            }
        }

        fn floor() -> Self {
            Self::new(vec![Platform::solid(0.0, 100.0, 1000.0, 50.0)])
        }

        fn step(&mut self, character: &mut Character, input: InputSnapshot) {
            let mut ctx = StepContext {
                stage: &self.stage,
                pool: &mut self.pool,
                spawns: &mut self.spawns,
            };
            character.step(&input, &mut ctx);
            self.pool.clear();
        }

        /// Step with no input until the character is standing
        fn settle(&mut self, character: &mut Character) {
            for _ in 0..200 {
                if character.state() == CharacterState::Stand && character.is_grounded() {
                    return;
                }
                self.step(character, InputSnapshot::NEUTRAL);
            }
            panic!("character never settled: {:?}", character.state());
        }
    }

    fn fighter(x: f32, y: f32) -> Character {
        match Character::new(
            0,
            "tester",
            0,
            CharacterStats::standard(),
            brawler_moveset(),
            Vec2::new(x, y),
        ) {
            Ok(c) => c,
            Err(err) => panic!("fighter rejected: {err}"),
        }
    }

    #[test]
    fn test_rejects_invalid_stats() {
        let stats = CharacterStats {
            mass: 0.0,
            ..CharacterStats::standard()
        };
        let result = Character::new(0, "bad", 0, stats, Moveset::new(), Vec2::ZERO);
        assert!(matches!(result, Err(ConfigError::InvalidMass(_))));
    }

    #[test]
    fn test_lands_and_stands() {
        let mut rig = Rig::floor();
        let mut c = fighter(100.0, 0.0);
        rig.settle(&mut c);
        assert_relative_eq!(c.body.rect().bottom(), 100.0);
        assert_eq!(c.body.velocity.y, 0.0);
    }

    #[test]
    fn test_full_hop_exit_velocity() {
        let mut rig = Rig::floor();
        let mut c = fighter(100.0, 20.0);
        rig.settle(&mut c);

        rig.step(&mut c, InputSnapshot::pressing(&[Action::Jump]));
        assert_eq!(c.state(), CharacterState::Jumpsquat);
        for _ in 0..c.stats.jumpsquat_frames - 1 {
            rig.step(&mut c, InputSnapshot::holding(&[Action::Jump]));
            assert_eq!(c.state(), CharacterState::Jumpsquat);
        }
        rig.step(&mut c, InputSnapshot::holding(&[Action::Jump]));
        assert_eq!(c.state(), CharacterState::Fall);
        assert_eq!(c.body.velocity.y, -c.stats.jump_speed);
        assert!(!c.is_grounded());
    }

    #[test]
    fn test_short_hop_exit_velocity() {
        let mut rig = Rig::floor();
        let mut c = fighter(100.0, 20.0);
        rig.settle(&mut c);

        rig.step(&mut c, InputSnapshot::pressing(&[Action::Jump]));
        for _ in 0..c.stats.jumpsquat_frames {
            rig.step(&mut c, InputSnapshot::NEUTRAL);
        }
        assert_eq!(c.state(), CharacterState::Fall);
        assert_eq!(c.body.velocity.y, -c.stats.shorthop_speed);
    }

    #[test]
    fn test_fast_fall_snaps_and_sticks() {
        let mut rig = Rig::floor();
        let mut c = fighter(100.0, -400.0);
        // Rise first so the character is well above the floor
        c.body.velocity.y = -4.0;
        rig.step(&mut c, InputSnapshot::pressing(&[Action::Down]));
        assert!(!c.fast_fall, "fast fall needs downward motion");

        while c.body.velocity.y <= 0.0 {
            rig.step(&mut c, InputSnapshot::NEUTRAL);
        }
        rig.step(&mut c, InputSnapshot::pressing(&[Action::Down]));
        assert!(c.fast_fall);
        assert_eq!(c.body.velocity.y, c.stats.fast_fall_speed);

        rig.step(&mut c, InputSnapshot::NEUTRAL);
        assert_eq!(c.body.velocity.y, c.stats.fast_fall_speed);
    }

    #[test]
    fn test_landing_resets_air_options() {
        let mut rig = Rig::floor();
        let mut c = fighter(100.0, -200.0);
        c.aerial_jumps = 0;
        c.air_dodges = 0;
        c.wall_jumps = 0;
        c.fast_fall = true;
        rig.settle(&mut c);
        assert_eq!(c.aerial_jumps, c.stats.max_aerial_jumps);
        assert_eq!(c.air_dodges, c.stats.max_air_dodges);
        assert_eq!(c.wall_jumps, c.stats.max_wall_jumps);
        assert!(!c.fast_fall);
    }

    #[test]
    fn test_aerial_jump_consumed() {
        let mut rig = Rig::floor();
        let mut c = fighter(100.0, -400.0);
        rig.step(&mut c, InputSnapshot::NEUTRAL);
        rig.step(&mut c, InputSnapshot::pressing(&[Action::Jump]));
        assert_eq!(c.body.velocity.y, -c.stats.aerial_jump_speed);
        assert_eq!(c.aerial_jumps, 0);

        let before = c.body.velocity.y;
        rig.step(&mut c, InputSnapshot::pressing(&[Action::Jump]));
        assert_relative_eq!(c.body.velocity.y, before + c.stats.gravity);
    }

    #[test]
    fn test_crouch_drops_through_droppable() {
        let mut rig = Rig::new(vec![
            Platform::droppable(0.0, 100.0, 1000.0, 8.0),
            Platform::solid(0.0, 300.0, 1000.0, 50.0),
        ]);
        let mut c = fighter(100.0, 0.0);
        rig.settle(&mut c);
        assert_relative_eq!(c.body.rect().bottom(), 100.0);

        let down = InputSnapshot::holding(&[Action::Down]);
        rig.step(&mut c, InputSnapshot::pressing(&[Action::Down]));
        assert_eq!(c.state(), CharacterState::Crouch);
        for _ in 0..100 {
            rig.step(&mut c, down);
        }
        assert!(c.is_grounded());
        assert_relative_eq!(c.body.rect().bottom(), 300.0);
    }

    #[test]
    fn test_crouch_on_solid_stays() {
        let mut rig = Rig::floor();
        let mut c = fighter(100.0, 0.0);
        rig.settle(&mut c);
        rig.step(&mut c, InputSnapshot::pressing(&[Action::Down]));
        for _ in 0..10 {
            rig.step(&mut c, InputSnapshot::holding(&[Action::Down]));
        }
        assert_eq!(c.state(), CharacterState::Crouch);
        assert_relative_eq!(c.body.rect().bottom(), 100.0);
    }

    #[test]
    fn test_friction_without_overshoot() {
        let mut rig = Rig::floor();
        let mut c = fighter(100.0, 0.0);
        rig.settle(&mut c);
        c.body.velocity.x = 1.0;
        rig.step(&mut c, InputSnapshot::NEUTRAL);
        assert_relative_eq!(c.body.velocity.x, 0.4, epsilon = 1e-5);
        rig.step(&mut c, InputSnapshot::NEUTRAL);
        assert_eq!(c.body.velocity.x, 0.0);
    }

    #[test]
    fn test_dash_then_run() {
        let mut rig = Rig::floor();
        let mut c = fighter(100.0, 0.0);
        rig.settle(&mut c);

        let right = InputSnapshot::holding(&[Action::Right]);
        rig.step(&mut c, InputSnapshot::pressing(&[Action::Right]));
        assert_eq!(c.state(), CharacterState::InitialDash);
        rig.step(&mut c, right);
        assert_eq!(c.body.velocity.x, c.stats.dash_speed);
        for _ in 0..c.stats.initial_dash_frames {
            rig.step(&mut c, right);
        }
        assert_eq!(c.state(), CharacterState::Run);
        assert_eq!(c.facing, Facing::Right);
    }

    #[test]
    fn test_wall_jump_launches_away() {
        let mut rig = Rig::new(vec![Platform::solid(200.0, -500.0, 100.0, 1000.0)]);
        let mut c = fighter(160.0, 0.0);
        rig.step(&mut c, InputSnapshot::NEUTRAL);
        assert_eq!(c.wall(), Some(Side::Right));

        rig.step(&mut c, InputSnapshot::pressing(&[Action::Jump]));
        assert_eq!(c.facing, Facing::Left);
        assert_eq!(c.body.velocity, Vec2::new(-7.0, -11.0));
        assert_eq!(c.wall_jumps, 0);
        assert_eq!(c.aerial_jumps, c.stats.max_aerial_jumps);
    }

    #[test]
    fn test_hitpause_freezes_everything() {
        let mut rig = Rig::floor();
        let mut c = fighter(100.0, -300.0);
        rig.step(&mut c, InputSnapshot::NEUTRAL);
        rig.step(&mut c, InputSnapshot::NEUTRAL);
        let position = c.body.position;
        let tick = c.state_machine.state_tick();
        c.hitpause = 3;
        c.hitstun = 5;
        for _ in 0..3 {
            rig.step(&mut c, InputSnapshot::pressing(&[Action::Jump]));
        }
        assert_eq!(c.hitpause, 0);
        assert_eq!(c.hitstun, 5);
        assert_eq!(c.body.position, position);
        assert_eq!(c.state_machine.state_tick(), tick);
        assert_eq!(c.aerial_jumps, c.stats.max_aerial_jumps);
    }

    #[test]
    fn test_hit_reaction_lasts_for_hitstun() {
        let mut rig = Rig::floor();
        let mut c = fighter(100.0, -600.0);
        c.receive_hit(&HitEffect {
            damage: 10.0,
            knockback: 3.0,
            velocity: Vec2::new(2.0, -1.0),
            hitstun: 4,
            hitpause: 0,
        });
        assert_eq!(c.state(), CharacterState::HitAerial);
        for _ in 0..3 {
            rig.step(&mut c, InputSnapshot::pressing(&[Action::Jump]));
            assert_eq!(c.state(), CharacterState::HitAerial);
        }
        rig.step(&mut c, InputSnapshot::NEUTRAL);
        assert_eq!(c.state(), CharacterState::Fall);
        assert_eq!(c.damage, 10.0);
    }

    #[test]
    fn test_neutral_air_lands_into_its_lag() {
        let mut rig = Rig::floor();
        let mut c = fighter(100.0, -60.0);
        rig.step(&mut c, InputSnapshot::NEUTRAL);
        rig.step(&mut c, InputSnapshot::pressing(&[Action::Attack]));
        assert_eq!(c.state(), CharacterState::Attack(MoveSlot::NeutralAir));
        let lag = c
            .moveset()
            .get(MoveSlot::NeutralAir)
            .map(|m| m.landing_lag)
            .unwrap_or_default();

        for _ in 0..200 {
            if matches!(c.state(), CharacterState::LandingLag { .. }) {
                break;
            }
            rig.step(&mut c, InputSnapshot::NEUTRAL);
        }
        assert_eq!(c.state(), CharacterState::LandingLag { frames: lag });
    }

    #[test]
    fn test_air_dodge_landing_consumes_aerial_lag() {
        let mut rig = Rig::floor();
        let mut c = fighter(100.0, -900.0);
        rig.step(&mut c, InputSnapshot::NEUTRAL);
        rig.step(&mut c, InputSnapshot::pressing(&[Action::Attack]));
        for _ in 0..100 {
            if c.state() == CharacterState::Fall {
                break;
            }
            rig.step(&mut c, InputSnapshot::NEUTRAL);
        }
        assert_eq!(c.state(), CharacterState::Fall);
        assert_eq!(c.pending_landing_lag(), Some(10));

        // Dodge straight down into the floor
        c.body.teleport(Vec2::new(100.0, 0.0));
        rig.step(&mut c, InputSnapshot::pressing(&[Action::Dodge, Action::Down]));
        assert_eq!(c.state(), CharacterState::AirDodge);
        for _ in 0..10 {
            if !matches!(c.state(), CharacterState::AirDodge) {
                break;
            }
            rig.step(&mut c, InputSnapshot::NEUTRAL);
        }
        assert_eq!(
            c.state(),
            CharacterState::LandingLag {
                frames: c.stats.landing_lag_frames
            }
        );
        assert_eq!(c.pending_landing_lag(), None);
        rig.settle(&mut c);

        // A plain full hop afterwards lands clean
        rig.step(&mut c, InputSnapshot::pressing(&[Action::Jump]));
        for _ in 0..c.stats.jumpsquat_frames {
            rig.step(&mut c, InputSnapshot::holding(&[Action::Jump]));
        }
        assert_eq!(c.state(), CharacterState::Fall);
        for _ in 0..200 {
            if c.state() != CharacterState::Fall {
                break;
            }
            rig.step(&mut c, InputSnapshot::NEUTRAL);
        }
        assert_eq!(c.state(), CharacterState::Stand);
    }

    #[test]
    fn test_fast_fall_once_per_airborne_period() {
        let mut rig = Rig::floor();
        let mut c = fighter(100.0, -700.0);
        rig.step(&mut c, InputSnapshot::NEUTRAL);
        rig.step(&mut c, InputSnapshot::pressing(&[Action::Down]));
        assert!(c.fast_fall);

        rig.step(&mut c, InputSnapshot::pressing(&[Action::Jump]));
        assert!(!c.fast_fall, "aerial jump cancels the fast fall speed");
        while c.body.velocity.y <= 0.0 {
            rig.step(&mut c, InputSnapshot::NEUTRAL);
        }
        rig.step(&mut c, InputSnapshot::pressing(&[Action::Down]));
        assert!(!c.fast_fall);
        assert!(c.body.velocity.y < c.stats.fast_fall_speed);

        rig.settle(&mut c);
        assert!(!c.fast_fall_used);
    }

    #[test]
    fn test_grounded_attack_emits_hitboxes() {
        let mut rig = Rig::floor();
        let mut c = fighter(100.0, 0.0);
        rig.settle(&mut c);
        rig.step(&mut c, InputSnapshot::pressing(&[Action::Attack]));
        assert_eq!(c.state(), CharacterState::Attack(MoveSlot::Jab));

        let mut emitted = 0;
        for _ in 0..100 {
            let mut ctx = StepContext {
                stage: &rig.stage,
                pool: &mut rig.pool,
                spawns: &mut rig.spawns,
            };
            c.step(&InputSnapshot::NEUTRAL, &mut ctx);
            emitted += rig.pool.len();
            assert!(rig.pool.iter().all(|h| h.owner() == c.id));
            rig.pool.clear();
            if c.state() == CharacterState::Stand {
                break;
            }
        }
        assert!(emitted > 0);
        assert_eq!(c.state(), CharacterState::Stand);
    }

    #[test]
    fn test_neutral_special_requests_projectile() {
        let mut rig = Rig::floor();
        let mut c = fighter(100.0, 0.0);
        rig.settle(&mut c);
        c.facing = Facing::Left;
        rig.step(&mut c, InputSnapshot::pressing(&[Action::Special]));
        for _ in 0..60 {
            rig.step(&mut c, InputSnapshot::NEUTRAL);
        }
        assert_eq!(rig.spawns.len(), 1);
        let request = rig.spawns[0];
        assert_eq!(request.owner, c.id);
        assert!(request.spec.velocity.x < 0.0);
    }

    #[test]
    fn test_up_special_ends_helpless() {
        let mut rig = Rig::floor();
        let mut c = fighter(100.0, -900.0);
        rig.step(&mut c, InputSnapshot::NEUTRAL);
        rig.step(
            &mut c,
            InputSnapshot::new(
                [Action::Up, Action::Special].into_iter().collect(),
                [Action::Special].into_iter().collect(),
            ),
        );
        assert_eq!(c.state(), CharacterState::Attack(MoveSlot::UpSpecial));
        for _ in 0..200 {
            if c.state() == CharacterState::SpecialFall {
                break;
            }
            rig.step(&mut c, InputSnapshot::NEUTRAL);
        }
        assert_eq!(c.state(), CharacterState::SpecialFall);
        rig.step(&mut c, InputSnapshot::pressing(&[Action::Jump]));
        assert_eq!(c.state(), CharacterState::SpecialFall);
    }

    #[test]
    fn test_air_dodge_is_intangible_then_falls() {
        let mut rig = Rig::floor();
        let mut c = fighter(100.0, -900.0);
        rig.step(&mut c, InputSnapshot::NEUTRAL);
        rig.step(&mut c, InputSnapshot::pressing(&[Action::Dodge, Action::Left]));
        assert_eq!(c.state(), CharacterState::AirDodge);
        assert!(c.is_intangible());
        assert_eq!(c.body.velocity.x, -c.stats.air_dodge_speed);
        for _ in 0..c.stats.air_dodge_frames {
            rig.step(&mut c, InputSnapshot::NEUTRAL);
        }
        assert_eq!(c.state(), CharacterState::Fall);
        assert!(!c.is_intangible());
        assert_eq!(c.air_dodges, 0);
    }

    #[test]
    fn test_respawn_resets_stock() {
        let mut c = fighter(100.0, 0.0);
        c.damage = 80.0;
        c.hitstun = 9;
        c.respawn(Vec2::new(500.0, 100.0));
        assert_eq!(c.damage, 0.0);
        assert_eq!(c.hitstun, 0);
        assert_eq!(c.body.center(), Vec2::new(500.0, 100.0));
        assert_eq!(c.state(), CharacterState::Fall);
    }
}
