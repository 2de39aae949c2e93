// Character state machine

use crate::game::combat::MoveSlot;

/// Represents the current state of a character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharacterState {
    /// Standing still on ground
    Stand,
    /// Full-speed grounded movement
    Run,
    /// Braking out of a run into the opposite direction
    RunTurnaround,
    /// Braking out of a run after releasing the stick
    RunEnd,
    /// Fixed-speed burst when starting to move
    InitialDash,
    /// Crouching on ground
    Crouch,
    /// Grounded wind-up before any jump
    Jumpsquat,
    /// Airborne and actionable
    Fall,
    /// Airborne and helpless after a recovery move
    SpecialFall,
    /// Directional intangible air burst
    AirDodge,
    /// Reeling from a hit, input suppressed
    HitAerial,
    /// Recovery after landing from an attack or dodge
    LandingLag { frames: u32 },
    /// Executing a move
    Attack(MoveSlot),
}

impl Default for CharacterState {
    fn default() -> Self {
        Self::Fall
    }
}

impl CharacterState {
    /// Check if the character ignores hitboxes
    pub fn is_intangible(&self) -> bool {
        matches!(self, Self::AirDodge)
    }

    /// Get the animation/state identifier for this state
    pub fn animation_name(&self) -> &'static str {
        match self {
            Self::Stand => "stand",
            Self::Run => "run",
            Self::RunTurnaround => "run_turnaround",
            Self::RunEnd => "run_end",
            Self::InitialDash => "initial_dash",
            Self::Crouch => "crouch",
            Self::Jumpsquat => "jumpsquat",
            Self::Fall => "fall",
            Self::SpecialFall => "special_fall",
            Self::AirDodge => "air_dodge",
            Self::HitAerial => "hit",
            Self::LandingLag { .. } => "landing",
            Self::Attack(slot) => slot.name(),
        }
    }
}

/// Current state plus the state-local tick counter.
///
/// The counter reads 0 on the first step after any transition and advances
/// once per unpaused step after that.
#[derive(Debug)]
pub struct CharacterStateMachine {
    current_state: CharacterState,
    state_tick: u32,
    fresh: bool,
}

impl Default for CharacterStateMachine {
    fn default() -> Self {
        Self::new(CharacterState::default())
    }
}

impl CharacterStateMachine {
    pub fn new(initial: CharacterState) -> Self {
        Self {
            current_state: initial,
            state_tick: 0,
            fresh: true,
        }
    }

    /// Get the current state
    pub fn state(&self) -> CharacterState {
        self.current_state
    }

    /// Ticks spent in the current state
    pub fn state_tick(&self) -> u32 {
        self.state_tick
    }

    /// Check if the state changed since the last step began
    pub fn state_just_changed(&self) -> bool {
        self.fresh
    }

    /// Called at the top of every unpaused step
    pub fn begin_step(&mut self) {
        if self.fresh {
            self.fresh = false;
        } else {
            self.state_tick = self.state_tick.saturating_add(1);
        }
    }

    /// Transition to a new state. Re-entering the same state also restarts
    /// the counter.
    pub fn transition(&mut self, new_state: CharacterState) {
        log::trace!("{:?} -> {:?}", self.current_state, new_state);
        self.current_state = new_state;
        self.state_tick = 0;
        self.fresh = true;
    }
}
