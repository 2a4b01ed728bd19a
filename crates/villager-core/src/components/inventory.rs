//! Inventory Component
//!
//! Fixed-size slot array. Slots 36-39 hold armor (head, chest, legs, feet).

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::Range;

use crate::registry::ItemStack;

pub const INVENTORY_SIZE: usize = 40;
pub const ARMOR_SLOTS: Range<usize> = 36..40;

/// Serialized as a sparse slot -> stack map; out-of-range slots are dropped on load.
#[derive(Component, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<usize, ItemStack>", into = "BTreeMap<usize, ItemStack>")]
pub struct Inventory {
    slots: Vec<Option<ItemStack>>,
}

impl Default for Inventory {
    fn default() -> Self {
        Self {
            slots: vec![None; INVENTORY_SIZE],
        }
    }
}

impl From<BTreeMap<usize, ItemStack>> for Inventory {
    fn from(map: BTreeMap<usize, ItemStack>) -> Self {
        let mut inventory = Self::default();
        for (slot, stack) in map {
            inventory.set(slot, Some(stack));
        }
        inventory
    }
}

impl From<Inventory> for BTreeMap<usize, ItemStack> {
    fn from(inventory: Inventory) -> Self {
        inventory
            .slots
            .into_iter()
            .enumerate()
            .filter_map(|(slot, stack)| stack.map(|s| (slot, s)))
            .collect()
    }
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn size(&self) -> usize {
        self.slots.len()
    }

    pub fn get(&self, slot: usize) -> Option<&ItemStack> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, slot: usize) -> Option<&mut ItemStack> {
        self.slots.get_mut(slot).and_then(Option::as_mut)
    }

    /// Set a slot; empty stacks are stored as `None`. Out-of-range slots are ignored.
    pub fn set(&mut self, slot: usize, stack: Option<ItemStack>) {
        if let Some(entry) = self.slots.get_mut(slot) {
            *entry = stack.filter(|s| !s.is_empty());
        }
    }

    pub fn take(&mut self, slot: usize) -> Option<ItemStack> {
        self.slots.get_mut(slot).and_then(Option::take)
    }

    /// Put a stack in the first free non-armor slot, returning it back if full
    pub fn add(&mut self, stack: ItemStack) -> Result<usize, ItemStack> {
        match (0..ARMOR_SLOTS.start).find(|&i| self.slots[i].is_none()) {
            Some(slot) => {
                self.slots[slot] = Some(stack);
                Ok(slot)
            }
            None => Err(stack),
        }
    }

    pub fn first_slot_containing(&self, item: &str) -> Option<usize> {
        self.slots
            .iter()
            .position(|s| s.as_ref().is_some_and(|s| s.item == item))
    }

    /// Occupied slots with their indices
    pub fn occupied(&self) -> impl Iterator<Item = (usize, &ItemStack)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|s| (i, s)))
    }

    pub fn occupied_mut(&mut self) -> impl Iterator<Item = (usize, &mut ItemStack)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter_map(|(i, s)| s.as_mut().map(|s| (i, s)))
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_skips_armor_slots() {
        let mut inventory = Inventory::new();
        for i in 0..ARMOR_SLOTS.start {
            inventory.set(i, Some(ItemStack::new("wheat", 1)));
        }
        let rejected = inventory.add(ItemStack::single("bread"));
        assert!(rejected.is_err());
        assert!(inventory.get(36).is_none());
    }

    #[test]
    fn test_set_ignores_out_of_range_and_empty() {
        let mut inventory = Inventory::new();
        inventory.set(99, Some(ItemStack::single("bread")));
        inventory.set(2, Some(ItemStack::new("bread", 0)));
        assert!(inventory.is_empty());
        assert_eq!(inventory.size(), INVENTORY_SIZE);
    }

    #[test]
    fn test_sparse_serialization() {
        let mut inventory = Inventory::new();
        inventory.set(37, Some(ItemStack::single("iron_chestplate")));

        let json = serde_json::to_value(&inventory).unwrap();
        assert_eq!(json.as_object().unwrap().len(), 1);
        assert_eq!(json["37"]["item"], "iron_chestplate");

        let restored: Inventory = serde_json::from_value(json).unwrap();
        assert_eq!(restored, inventory);
    }
}
