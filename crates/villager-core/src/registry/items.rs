//! Item Registry
//!
//! Read-only table of item capabilities, constructed once and inserted into
//! the world. The core only needs to know whether a stack is a weapon, armor,
//! a baby carrier, or one of the two special interaction items.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use villager_events::BabyState;

pub const IRON_SWORD: &str = "iron_sword";
pub const BOW: &str = "bow";
pub const BABY_BOY: &str = "baby_boy";
pub const BABY_GIRL: &str = "baby_girl";
pub const MEMORIAL: &str = "memorial";
pub const VILLAGER_EDITOR: &str = "villager_editor";

/// A stack of items in an inventory slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemStack {
    pub item: String,
    pub count: u32,
    /// Durability used so far
    #[serde(default)]
    pub damage: u32,
    /// Free-form item data (memorial contents, baby age)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<Map<String, Value>>,
}

impl ItemStack {
    pub fn new(item: impl Into<String>, count: u32) -> Self {
        Self {
            item: item.into(),
            count,
            damage: 0,
            tag: None,
        }
    }

    pub fn single(item: impl Into<String>) -> Self {
        Self::new(item, 1)
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Apply durability damage. Returns true if the stack broke and is now empty.
    pub fn damage_item(&mut self, amount: u32, items: &ItemRegistry) -> bool {
        let max_damage = items.get(&self.item).map_or(0, |info| info.max_damage);
        if max_damage == 0 || self.count == 0 {
            return self.count == 0;
        }

        self.damage += amount;
        while self.damage >= max_damage && self.count > 0 {
            self.damage -= max_damage;
            self.count -= 1;
        }
        if self.count == 0 {
            self.damage = 0;
        }
        self.count == 0
    }

    pub fn tag_mut(&mut self) -> &mut Map<String, Value> {
        self.tag.get_or_insert_with(Map::new)
    }
}

/// What an item can do
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ItemKind {
    Weapon { attack_damage: f32, ranged: bool },
    Armor { protection: i32 },
    BabyCarrier { baby: BabyState },
    Memorial,
    Editor,
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemInfo {
    pub kind: ItemKind,
    /// 0 means the item never wears out
    pub max_damage: u32,
}

/// Resource: item capabilities by item id
#[derive(Resource, Debug, Clone, Default)]
pub struct ItemRegistry {
    items: HashMap<String, ItemInfo>,
}

impl ItemRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The items the villager core cares about out of the box
    pub fn standard() -> Self {
        let mut registry = Self::new();

        let weapon = |attack_damage, ranged| ItemKind::Weapon { attack_damage, ranged };
        registry.register("wooden_sword", weapon(4.0, false), 59);
        registry.register("stone_sword", weapon(5.0, false), 131);
        registry.register(IRON_SWORD, weapon(6.0, false), 250);
        registry.register("diamond_sword", weapon(7.0, false), 1561);
        registry.register(BOW, weapon(3.0, true), 384);

        let armor = |protection| ItemKind::Armor { protection };
        registry.register("leather_helmet", armor(1), 55);
        registry.register("leather_chestplate", armor(3), 80);
        registry.register("leather_leggings", armor(2), 75);
        registry.register("leather_boots", armor(1), 65);
        registry.register("iron_helmet", armor(2), 165);
        registry.register("iron_chestplate", armor(6), 240);
        registry.register("iron_leggings", armor(5), 225);
        registry.register("iron_boots", armor(2), 195);

        registry.register(BABY_BOY, ItemKind::BabyCarrier { baby: BabyState::Male }, 0);
        registry.register(BABY_GIRL, ItemKind::BabyCarrier { baby: BabyState::Female }, 0);
        registry.register(MEMORIAL, ItemKind::Memorial, 0);
        registry.register(VILLAGER_EDITOR, ItemKind::Editor, 0);
        registry.register("bread", ItemKind::Other, 0);
        registry.register("wheat", ItemKind::Other, 0);

        registry
    }

    pub fn register(&mut self, id: impl Into<String>, kind: ItemKind, max_damage: u32) {
        self.items.insert(id.into(), ItemInfo { kind, max_damage });
    }

    pub fn get(&self, id: &str) -> Option<&ItemInfo> {
        self.items.get(id)
    }

    fn kind_of(&self, stack: &ItemStack) -> ItemKind {
        self.get(&stack.item).map_or(ItemKind::Other, |info| info.kind)
    }

    pub fn is_weapon(&self, stack: &ItemStack) -> bool {
        matches!(self.kind_of(stack), ItemKind::Weapon { .. })
    }

    pub fn is_armor(&self, stack: &ItemStack) -> bool {
        matches!(self.kind_of(stack), ItemKind::Armor { .. })
    }

    pub fn is_baby_carrier(&self, stack: &ItemStack) -> bool {
        matches!(self.kind_of(stack), ItemKind::BabyCarrier { .. })
    }

    pub fn is_memorial(&self, stack: &ItemStack) -> bool {
        matches!(self.kind_of(stack), ItemKind::Memorial)
    }

    pub fn is_editor(&self, stack: &ItemStack) -> bool {
        matches!(self.kind_of(stack), ItemKind::Editor)
    }

    pub fn attack_damage(&self, stack: &ItemStack) -> f32 {
        match self.kind_of(stack) {
            ItemKind::Weapon { attack_damage, .. } => attack_damage,
            _ => 0.0,
        }
    }

    pub fn armor_protection(&self, stack: &ItemStack) -> i32 {
        match self.kind_of(stack) {
            ItemKind::Armor { protection } => protection,
            _ => 0,
        }
    }

    /// Item id held by a villager carrying the given baby
    pub fn baby_item(baby: BabyState) -> Option<&'static str> {
        match baby {
            BabyState::None => None,
            BabyState::Male => Some(BABY_BOY),
            BabyState::Female => Some(BABY_GIRL),
        }
    }
}

/// Age a carried baby by one tick
pub fn tick_baby(stack: &mut ItemStack) {
    let tag = stack.tag_mut();
    let age = tag.get("age").and_then(Value::as_u64).unwrap_or(0);
    tag.insert("age".to_string(), Value::from(age + 1));
}
