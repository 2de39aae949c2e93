// Input handling system
//
// The combat core never polls devices. The collaborator feeds held actions
// each tick and the core reads an immutable snapshot per character.
//
// ## Architecture
//
// - `action`: Defines game actions and a compact action set
// - `player`: Per-tick snapshots and per-player edge tracking
// - `manager`: One tracker per local player
//
// ## Usage Example
//
// ```rust
// use rusted_brawl::engine::input::{Action, ActionSet, InputManager};
//
// let mut inputs = InputManager::new(2);
// inputs.set_held(0, ActionSet::EMPTY.with(Action::Jump));
// let snapshots = inputs.snapshots();
// assert!(snapshots[0].just_pressed(Action::Jump));
// inputs.end_tick();
// ```

pub mod action;
pub mod manager;
pub mod player;

// Re-export commonly used types
pub use action::{Action, ActionSet};
pub use manager::InputManager;
pub use player::{InputSnapshot, PlayerInput};
