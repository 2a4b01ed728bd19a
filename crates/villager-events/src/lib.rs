//! Shared villager data types and wire formats.
//!
//! This crate contains pure data structures with no simulation logic.
//! It is a dependency for the simulation core and for anything that needs to
//! read its output (event logs, spawn packets).

pub mod event;
pub mod ids;
pub mod kinds;
pub mod spawn;

pub use event::{EventKind, EventType, VillagerEvent};
pub use ids::{PartyId, EMPTY_ID};
pub use kinds::{
    BabyState, EquipmentSlot, Gender, MaritalStatus, MovementState, Profession,
    ProfessionSkinGroup, Relation,
};
pub use spawn::{SpawnData, SpawnDataError};
