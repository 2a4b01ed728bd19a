//! Equipment
//!
//! What a villager holds and wears. Slots 36-39 carry armor; the main hand
//! is derived from state rather than stored.

use bevy_ecs::prelude::*;
use villager_events::{BabyState, EquipmentSlot};

use crate::actions::ActionRegistry;
use crate::components::{Attributes, Inventory, RelationshipState, ARMOR_SLOTS};
use crate::config::Config;
use crate::registry::{ItemRegistry, ItemStack, ProfessionTable};

/// Where the main-hand item comes from
enum HeldSource {
    Nothing,
    /// Shown in hand without being taken from the inventory
    Fixed(String),
    Slot(usize),
}

fn held_source(world: &World, entity: Entity) -> HeldSource {
    let Some(attributes) = world.get::<Attributes>(entity) else {
        return HeldSource::Nothing;
    };
    if attributes.infected {
        return HeldSource::Nothing;
    }
    if attributes.baby_state != BabyState::None {
        return ItemRegistry::baby_item(attributes.baby_state)
            .map_or(HeldSource::Nothing, |item| HeldSource::Fixed(item.to_string()));
    }

    let info = world.resource::<ProfessionTable>().get(attributes.profession);
    if let Some(item) = info.held_item {
        return HeldSource::Fixed(item);
    }

    let married_to_player = world
        .get::<RelationshipState>(entity)
        .is_some_and(RelationshipState::is_married_to_player);
    if !info.uses_combat_weapons && !married_to_player {
        return HeldSource::Nothing;
    }

    let slot = match (
        world.get::<ActionRegistry>(entity).map(ActionRegistry::combat),
        world.get::<Inventory>(entity),
    ) {
        (Some(Ok(combat)), Some(inventory)) => {
            combat.weapon_slot(inventory, world.resource::<ItemRegistry>())
        }
        _ => None,
    };
    slot.map_or(HeldSource::Nothing, HeldSource::Slot)
}

/// The stack shown in the villager's main hand
pub fn held_item(world: &World, entity: Entity) -> Option<ItemStack> {
    match held_source(world, entity) {
        HeldSource::Nothing => None,
        HeldSource::Fixed(item) => Some(ItemStack::single(item)),
        HeldSource::Slot(slot) => world
            .get::<Inventory>(entity)
            .and_then(|inventory| inventory.get(slot))
            .cloned(),
    }
}

pub fn equipment_in_slot(world: &World, entity: Entity, slot: EquipmentSlot) -> Option<ItemStack> {
    match slot.inventory_slot() {
        Some(index) => world
            .get::<Inventory>(entity)
            .and_then(|inventory| inventory.get(index))
            .cloned(),
        None if slot == EquipmentSlot::MainHand => held_item(world, entity),
        None => None,
    }
}

/// Armor slots from feet to head
pub fn armor_items(world: &World, entity: Entity) -> Vec<Option<ItemStack>> {
    let inventory = world.get::<Inventory>(entity);
    ARMOR_SLOTS
        .rev()
        .map(|slot| inventory.and_then(|inv| inv.get(slot)).cloned())
        .collect()
}

pub fn total_armor_value(world: &World, entity: Entity) -> i32 {
    let items = world.resource::<ItemRegistry>();
    armor_items(world, entity)
        .iter()
        .flatten()
        .map(|stack| items.armor_protection(stack))
        .sum()
}

/// Wear down every worn armor piece. Broken pieces leave their slot.
pub fn damage_armor(world: &mut World, entity: Entity, amount: f32) {
    let wear = (amount / 4.0).max(1.0) as u32;
    world.resource_scope(|world, items: Mut<ItemRegistry>| {
        let Some(mut inventory) = world.get_mut::<Inventory>(entity) else {
            return;
        };
        for slot in ARMOR_SLOTS.rev() {
            let broke = match inventory.get_mut(slot) {
                Some(stack) if items.is_armor(stack) => stack.damage_item(wear, &items),
                _ => false,
            };
            if broke {
                tracing::debug!("Armor in slot {} broke", slot);
                inventory.set(slot, None);
            }
        }
    });
}

/// Wear down the held weapon if it comes from the inventory. A broken weapon
/// leaves its slot and switches off toggle actions. Returns true if it broke.
pub fn damage_held_item(world: &mut World, entity: Entity, amount: u32) -> bool {
    let HeldSource::Slot(slot) = held_source(world, entity) else {
        return false;
    };

    let broke = world.resource_scope(|world, items: Mut<ItemRegistry>| {
        let Some(mut inventory) = world.get_mut::<Inventory>(entity) else {
            return false;
        };
        let broke = inventory
            .get_mut(slot)
            .is_some_and(|stack| stack.damage_item(amount, &items));
        if broke {
            inventory.set(slot, None);
        }
        broke
    });

    if broke {
        if let Some(mut actions) = world.get_mut::<ActionRegistry>(entity) {
            actions.disable_all_toggles();
        }
    }
    broke
}

/// Start the swing animation unless one is already in its first half
pub fn swing_item(world: &mut World, entity: Entity) {
    let duration = world.resource::<Config>().villager.swing_duration;
    if let Some(mut attributes) = world.get_mut::<Attributes>(entity) {
        attributes.start_swing(duration);
    }
}
