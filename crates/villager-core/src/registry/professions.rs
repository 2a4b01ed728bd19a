//! Profession Table
//!
//! Read-only metadata per profession, passed in as a resource rather than
//! looked up statically.

use bevy_ecs::prelude::*;
use std::collections::HashMap;
use villager_events::{Profession, ProfessionSkinGroup};

use super::items::{BOW, IRON_SWORD};

#[derive(Debug, Clone, PartialEq)]
pub struct ProfessionInfo {
    pub skin_group: ProfessionSkinGroup,
    /// Item always shown in hand, regardless of inventory
    pub held_item: Option<String>,
    /// Draws its weapon from the combat action
    pub uses_combat_weapons: bool,
}

impl ProfessionInfo {
    fn plain(profession: Profession) -> Self {
        Self {
            skin_group: profession.default_skin_group(),
            held_item: None,
            uses_combat_weapons: false,
        }
    }
}

/// Resource: profession metadata
#[derive(Resource, Debug, Clone, Default)]
pub struct ProfessionTable {
    entries: HashMap<Profession, ProfessionInfo>,
}

impl ProfessionTable {
    pub fn standard() -> Self {
        let mut entries: HashMap<Profession, ProfessionInfo> = Profession::all()
            .iter()
            .map(|&p| (p, ProfessionInfo::plain(p)))
            .collect();

        if let Some(guard) = entries.get_mut(&Profession::Guard) {
            guard.held_item = Some(IRON_SWORD.to_string());
        }
        if let Some(archer) = entries.get_mut(&Profession::Archer) {
            archer.held_item = Some(BOW.to_string());
        }
        for p in [Profession::Warrior, Profession::Child] {
            if let Some(info) = entries.get_mut(&p) {
                info.uses_combat_weapons = true;
            }
        }

        Self { entries }
    }

    pub fn insert(&mut self, profession: Profession, info: ProfessionInfo) {
        self.entries.insert(profession, info);
    }

    /// Metadata for a profession; unknown entries fall back to plain defaults
    pub fn get(&self, profession: Profession) -> ProfessionInfo {
        self.entries
            .get(&profession)
            .cloned()
            .unwrap_or_else(|| ProfessionInfo::plain(profession))
    }

    pub fn skin_group(&self, profession: Profession) -> ProfessionSkinGroup {
        self.get(profession).skin_group
    }
}
