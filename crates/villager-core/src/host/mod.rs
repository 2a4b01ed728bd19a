//! Host Collaborators
//!
//! The parts of the surrounding game the villager core talks to: pathing,
//! players, localization, the clock, and the world's item and spatial queries.

pub mod localizer;
pub mod players;
pub mod scheduler;
pub mod world;

pub use localizer::Localizer;
pub use players::{PlayerRecord, PlayerRecords, Screen, Session, Sessions};
pub use scheduler::TaskScheduler;
pub use world::{villagers_within, DroppedItem, WorldClock, WorldItems};
