//! Combat Action
//!
//! Swings at the current attack target on a cooldown and picks the weapon the
//! villager draws from its inventory.

use serde::{Deserialize, Serialize};

use super::{ActionContext, ActionHook};
use crate::components::{Inventory, ARMOR_SLOTS};
use crate::registry::{ItemKind, ItemRegistry, ItemStack};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombatMethod {
    #[default]
    Passive,
    Melee,
    Ranged,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatAction {
    method: CombatMethod,
    /// Method to restore when a player marriage ends
    method_before_marriage: Option<CombatMethod>,
    cooldown: u32,
    swings: u64,
}

impl CombatAction {
    pub fn with_method(method: CombatMethod) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    pub fn method(&self) -> CombatMethod {
        self.method
    }

    pub fn set_method(&mut self, method: CombatMethod) {
        self.method = method;
    }

    pub fn swings(&self) -> u64 {
        self.swings
    }

    pub fn tick(&mut self, ctx: &mut ActionContext) {
        if self.method == CombatMethod::Passive || ctx.attributes.attack_target().is_none() {
            self.cooldown = 0;
            return;
        }

        if self.cooldown > 0 {
            self.cooldown -= 1;
            return;
        }

        ctx.attributes.start_swing(ctx.config.villager.swing_duration);
        self.swings += 1;
        self.cooldown = ctx.config.combat.attack_cooldown;
    }

    /// Player spouses defend their partner even if they were passive before
    pub fn on_hook(&mut self, hook: ActionHook) {
        match hook {
            ActionHook::MarriedToPlayer if self.method == CombatMethod::Passive => {
                self.method_before_marriage = Some(self.method);
                self.method = CombatMethod::Melee;
            }
            ActionHook::MarriageEnded => {
                if let Some(method) = self.method_before_marriage.take() {
                    self.method = method;
                }
            }
            _ => {}
        }
    }

    /// Inventory slot of the weapon to draw: the hardest hitting one, ranged
    /// weapons first for archers. Earlier slots win ties.
    pub fn weapon_slot(&self, inventory: &Inventory, items: &ItemRegistry) -> Option<usize> {
        let prefer_ranged = self.method == CombatMethod::Ranged;
        let mut best: Option<(usize, bool, f32)> = None;

        for (slot, stack) in inventory.occupied() {
            if ARMOR_SLOTS.contains(&slot) {
                continue;
            }
            let Some(ItemKind::Weapon { attack_damage, ranged }) =
                items.get(&stack.item).map(|info| info.kind)
            else {
                continue;
            };

            let better = match best {
                None => true,
                Some((_, best_ranged, best_damage)) => {
                    let rank = (prefer_ranged && ranged, attack_damage);
                    let best_rank = (prefer_ranged && best_ranged, best_damage);
                    rank > best_rank
                }
            };
            if better {
                best = Some((slot, ranged, attack_damage));
            }
        }

        best.map(|(slot, _, _)| slot)
    }

    pub fn held_item<'a>(&self, inventory: &'a Inventory, items: &ItemRegistry) -> Option<&'a ItemStack> {
        self.weapon_slot(inventory, items)
            .and_then(|slot| inventory.get(slot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Attributes;
    use crate::config::Config;
    use crate::registry::items::{BOW, IRON_SWORD};
    use villager_events::PartyId;

    #[test]
    fn test_swings_on_cooldown() {
        let mut config = Config::default();
        config.combat.attack_cooldown = 2;
        let inventory = Inventory::default();
        let items = ItemRegistry::standard();
        let mut attrs = Attributes::default();
        attrs.set_attack_target(Some(PartyId::new_v4()));

        let mut combat = CombatAction::with_method(CombatMethod::Melee);
        let mut ctx = ActionContext {
            tick: 0,
            is_night: false,
            attributes: &mut attrs,
            inventory: &inventory,
            items: &items,
            config: &config,
            events: Vec::new(),
        };
        for _ in 0..4 {
            combat.tick(&mut ctx);
        }
        assert_eq!(combat.swings(), 2);
        assert!(ctx.attributes.is_swinging());
    }

    #[test]
    fn test_passive_never_swings() {
        let config = Config::default();
        let inventory = Inventory::default();
        let items = ItemRegistry::standard();
        let mut attrs = Attributes::default();
        attrs.set_attack_target(Some(PartyId::new_v4()));

        let mut combat = CombatAction::default();
        let mut ctx = ActionContext {
            tick: 0,
            is_night: false,
            attributes: &mut attrs,
            inventory: &inventory,
            items: &items,
            config: &config,
            events: Vec::new(),
        };
        combat.tick(&mut ctx);
        assert_eq!(combat.swings(), 0);
    }

    #[test]
    fn test_player_marriage_toggles_method() {
        let mut combat = CombatAction::default();
        combat.on_hook(ActionHook::MarriedToPlayer);
        assert_eq!(combat.method(), CombatMethod::Melee);
        combat.on_hook(ActionHook::MarriageEnded);
        assert_eq!(combat.method(), CombatMethod::Passive);

        let mut guard = CombatAction::with_method(CombatMethod::Ranged);
        guard.on_hook(ActionHook::MarriedToPlayer);
        guard.on_hook(ActionHook::MarriageEnded);
        assert_eq!(guard.method(), CombatMethod::Ranged);
    }

    #[test]
    fn test_weapon_choice() {
        let items = ItemRegistry::standard();
        let mut inventory = Inventory::default();
        inventory.set(0, Some(ItemStack::single("bread")));
        inventory.set(1, Some(ItemStack::single(BOW)));
        inventory.set(2, Some(ItemStack::single(IRON_SWORD)));
        inventory.set(37, Some(ItemStack::single("diamond_sword")));

        let melee = CombatAction::with_method(CombatMethod::Melee);
        assert_eq!(melee.weapon_slot(&inventory, &items), Some(2));

        let ranged = CombatAction::with_method(CombatMethod::Ranged);
        assert_eq!(ranged.held_item(&inventory, &items).map(|s| s.item.as_str()), Some(BOW));

        assert_eq!(melee.weapon_slot(&Inventory::default(), &items), None);
    }
}
