//! Combat resolution core for a 2D platform fighter.
//!
//! Feed one [`InputSnapshot`] per character into [`Scene::tick`] and read
//! back a [`TickReport`] of hits, knock-outs and live hitboxes, plus
//! [`Scene::views`] for rendering.

pub mod core;
pub mod engine;
pub mod game;

pub use engine::input::{Action, ActionSet, InputManager, InputSnapshot};
pub use game::characters::{Character, CharacterState, CharacterStats, Facing};
pub use game::entity::{Entity, EntityId, EntityKind};
pub use game::error::ConfigError;
pub use game::scene::{EntityView, Scene, TickEvent, TickReport};
pub use game::stage::{Platform, Stage};
