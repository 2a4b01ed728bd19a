//! Villager Simulation Core
//!
//! Public API for the villager simulation: components, actions, the per-tick
//! arbiter, marriage, the death cascade, persistence and spawn sync.

use bevy_ecs::prelude::*;
use rand::rngs::SmallRng;

pub mod actions;
pub mod components;
pub mod config;
pub mod error;
pub mod events;
pub mod host;
pub mod persistence;
pub mod registry;
pub mod setup;
pub mod spawn_sync;
pub mod systems;

pub use components::*;
pub use config::{Config, ConfigError};
pub use error::{Result, VillagerError};
pub use events::EventLog;
pub use persistence::{load_villager, load_villagers, save_villager, unload_villager, VillagerTag};
pub use setup::{init_world, spawn_population, spawn_villager, VillagerSeed};
pub use spawn_sync::{apply_spawn_data, spawn_data};

/// Seeded random number generator resource
#[derive(Resource)]
pub struct SimRng(pub SmallRng);
