// Per-player input state management

use super::action::{Action, ActionSet};

/// Immutable input state for one character on one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputSnapshot {
    held: ActionSet,
    pressed: ActionSet,
}

impl InputSnapshot {
    /// No buttons held
    pub const NEUTRAL: InputSnapshot = InputSnapshot {
        held: ActionSet::EMPTY,
        pressed: ActionSet::EMPTY,
    };

    /// Build a snapshot directly. Anything pressed is also treated as held.
    pub fn new(held: ActionSet, pressed: ActionSet) -> Self {
        Self {
            held: ActionSet::from_iter(held.iter().chain(pressed.iter())),
            pressed,
        }
    }

    /// Shorthand for a snapshot where `actions` were pressed this tick
    pub fn pressing(actions: &[Action]) -> Self {
        let set: ActionSet = actions.iter().copied().collect();
        Self::new(set, set)
    }

    /// Shorthand for a snapshot where `actions` are held, none freshly pressed
    pub fn holding(actions: &[Action]) -> Self {
        Self::new(actions.iter().copied().collect(), ActionSet::EMPTY)
    }

    /// Check if an action is currently down
    pub fn is_down(&self, action: Action) -> bool {
        self.held.contains(action)
    }

    /// Check if an action went down on this tick
    pub fn just_pressed(&self, action: Action) -> bool {
        self.pressed.contains(action)
    }

    /// Horizontal axis: -1, 0 or 1
    pub fn horizontal(&self) -> f32 {
        let mut axis = 0.0;
        if self.is_down(Action::Left) {
            axis -= 1.0;
        }
        if self.is_down(Action::Right) {
            axis += 1.0;
        }
        axis
    }

    /// Vertical axis in screen space: -1 is up, 1 is down
    pub fn vertical(&self) -> f32 {
        let mut axis = 0.0;
        if self.is_down(Action::Up) {
            axis -= 1.0;
        }
        if self.is_down(Action::Down) {
            axis += 1.0;
        }
        axis
    }
}

/// Tracks held state across ticks for one player and derives press edges
#[derive(Debug)]
pub struct PlayerInput {
    /// Player ID (0-3 for up to 4 players)
    player_id: usize,

    /// Actions currently held
    held: ActionSet,

    /// Actions that were held on the previous tick
    previous_held: ActionSet,
}

impl PlayerInput {
    /// Create a new player input state
    pub fn new(player_id: usize) -> Self {
        Self {
            player_id,
            held: ActionSet::EMPTY,
            previous_held: ActionSet::EMPTY,
        }
    }

    /// Get the player ID
    pub fn player_id(&self) -> usize {
        self.player_id
    }

    /// Register an action press
    pub fn press(&mut self, action: Action) {
        self.held.insert(action);
    }

    /// Register an action release
    pub fn release(&mut self, action: Action) {
        self.held.remove(action);
    }

    /// Replace the whole held set (for collaborators that poll devices)
    pub fn set_held(&mut self, held: ActionSet) {
        self.held = held;
    }

    /// Snapshot for the current tick, with edges relative to the last tick
    pub fn snapshot(&self) -> InputSnapshot {
        InputSnapshot {
            held: self.held,
            pressed: self.held.difference(self.previous_held),
        }
    }

    /// Roll the current held set into history. Call once per tick after
    /// taking the snapshot.
    pub fn end_tick(&mut self) {
        self.previous_held = self.held;
    }

    /// Reset all input state
    pub fn reset(&mut self) {
        self.held = ActionSet::EMPTY;
        self.previous_held = ActionSet::EMPTY;
    }
}
