//! World Setup
//!
//! World initialization and villager spawning.

pub mod villagers;
pub mod world;

pub use villagers::*;
pub use world::*;
