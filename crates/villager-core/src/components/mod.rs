//! ECS Components
//!
//! Each component owns a disjoint slice of a villager's state.

pub mod inventory;
pub mod memory;
pub mod relationship;
pub mod villager;

pub use inventory::*;
pub use memory::*;
pub use relationship::*;
pub use villager::*;
