//! Read-only Registries
//!
//! Item and profession metadata injected into the world at setup.

pub mod items;
pub mod professions;

pub use items::{ItemInfo, ItemKind, ItemRegistry, ItemStack};
pub use professions::{ProfessionInfo, ProfessionTable};
