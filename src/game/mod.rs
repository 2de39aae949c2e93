// Game modules: characters, combat, stage and the scene that ties them together

pub mod characters;
pub mod combat;
pub mod entity;
pub mod error;
pub mod scene;
pub mod stage;
