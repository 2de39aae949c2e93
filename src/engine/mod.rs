// Engine modules: physics and input

pub mod input;
pub mod physics;
