// Input manager - one edge tracker per player

use super::action::ActionSet;
use super::player::{InputSnapshot, PlayerInput};

/// Coordinates input state for all local players
pub struct InputManager {
    players: Vec<PlayerInput>,
}

impl InputManager {
    /// Create a new input manager
    pub fn new(max_players: usize) -> Self {
        Self {
            players: (0..max_players).map(PlayerInput::new).collect(),
        }
    }

    /// Feed the held actions polled for `player_id` this tick
    pub fn set_held(&mut self, player_id: usize, held: ActionSet) {
        if let Some(player) = self.players.get_mut(player_id) {
            player.set_held(held);
        }
    }

    /// Snapshots for every player, in player order
    pub fn snapshots(&self) -> Vec<InputSnapshot> {
        self.players.iter().map(PlayerInput::snapshot).collect()
    }

    /// Advance every player's history. Call once per tick after the
    /// snapshots have been consumed.
    pub fn end_tick(&mut self) {
        for player in &mut self.players {
            player.end_tick();
        }
    }

    /// Get input state for a specific player
    pub fn player(&self, player_id: usize) -> Option<&PlayerInput> {
        self.players.get(player_id)
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }
}
