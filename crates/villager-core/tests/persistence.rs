//! Persistence tests
//!
//! Save/load through JSON text, and the stale-marriage repair that runs when
//! a villager comes back into the world.

use bevy_ecs::prelude::*;
use villager_core::actions::{ActionRegistry, ChoreKind, CombatMethod};
use villager_core::components::{
    Attributes, IndexEntry, InteractionKind, Inventory, Position, RelationshipLedger,
    RelationshipState, VillagerIndex,
};
use villager_core::config::Config;
use villager_core::events::EventLog;
use villager_core::persistence::{
    load_villager, load_villagers, save_villager, unload_villager, VillagerTag,
};
use villager_core::registry::ItemStack;
use villager_core::setup::{init_world, spawn_villager, VillagerSeed};
use villager_core::systems::{end_marriage, on_death, start_marriage, villager_id, MarriageTarget};
use villager_events::{EventType, Gender, MaritalStatus, MovementState, PartyId, Profession};

fn couple(world: &mut World) -> (Entity, Entity) {
    let a = spawn_villager(world, VillagerSeed::new("Ada", Gender::Female, Profession::Guard));
    let b = spawn_villager(world, VillagerSeed::new("Bram", Gender::Male, Profession::Smith));
    start_marriage(world, a, MarriageTarget::Villager(b)).unwrap();
    (a, b)
}

#[test]
fn test_round_trip_through_json_text() {
    let mut world = init_world(Config::default(), 41);
    let (a, _) = couple(&mut world);
    let player = PartyId::new_v4();
    {
        let mut attributes = world.get_mut::<Attributes>(a).unwrap();
        attributes.set_movement_state(MovementState::Stay);
        attributes.health = 12.5;
    }
    world.get_mut::<Inventory>(a).unwrap().set(7, Some(ItemStack::new("arrow", 32)));
    *world.get_mut::<Position>(a).unwrap() = Position::new(3.0, 70.0, -8.5);
    {
        let config = world.resource::<Config>().memory.clone();
        let mut ledger = world.get_mut::<RelationshipLedger>(a).unwrap();
        ledger.record_for(player).record_interaction(InteractionKind::Gift, &config);
    }
    {
        let mut actions = world.get_mut::<ActionRegistry>(a).unwrap();
        actions.chore_mut().unwrap().start(ChoreKind::Mining);
        actions.sleep_mut().unwrap().fall_asleep();
    }

    let before = save_villager(&world, a).unwrap();
    let text = serde_json::to_string(&before).unwrap();
    unload_villager(&mut world, a).unwrap();

    let tag: VillagerTag = serde_json::from_str(&text).unwrap();
    let loaded = load_villager(&mut world, &tag).unwrap();

    assert_eq!(save_villager(&world, loaded).unwrap(), before);
    let attributes = world.get::<Attributes>(loaded).unwrap();
    assert_eq!(attributes.movement_state, MovementState::Stay);
    assert_eq!(attributes.health, 12.5);
    assert_eq!(world.get::<Position>(loaded).unwrap().z, -8.5);
    assert_eq!(world.get::<RelationshipLedger>(loaded).unwrap().get(player).unwrap().hearts, 8);

    let actions = world.get::<ActionRegistry>(loaded).unwrap();
    assert!(actions.is_sleeping());
    assert_eq!(actions.chore().unwrap().chore(), Some(ChoreKind::Mining));
    assert_eq!(actions.combat().unwrap().method(), CombatMethod::Melee);
    assert!(world.get::<RelationshipState>(loaded).unwrap().is_married());
}

#[test]
fn test_missing_behaviors_section_keeps_profession_setup() {
    let mut world = init_world(Config::default(), 42);
    let a = spawn_villager(&mut world, VillagerSeed::new("Ada", Gender::Female, Profession::Archer));
    let mut tag = unload_villager(&mut world, a).unwrap();
    tag.remove("behaviors");
    tag.remove("memories");

    let loaded = load_villager(&mut world, &tag).unwrap();
    let actions = world.get::<ActionRegistry>(loaded).unwrap();
    assert_eq!(actions.combat().unwrap().method(), CombatMethod::Ranged);
    assert_eq!(actions.mood().unwrap().mood_level(), 0.0);
    assert!(world.get::<RelationshipLedger>(loaded).unwrap().is_empty());
}

#[test]
fn test_spouse_died_while_unloaded() {
    let mut world = init_world(Config::default(), 43);
    let (a, b) = couple(&mut world);
    let b_id = villager_id(&world, b).unwrap();

    let tag = unload_villager(&mut world, b).unwrap();
    on_death(&mut world, a, "lost at sea").unwrap();
    assert_eq!(world.resource::<VillagerIndex>().get(b_id), Some(IndexEntry::Unloaded));

    let b = load_villager(&mut world, &tag).unwrap();
    assert!(!world.get::<RelationshipState>(b).unwrap().is_married());
    let marriage_events = world
        .resource::<EventLog>()
        .of_type(EventType::Marriage)
        .filter(|e| e.villager == b_id)
        .count();
    // married, ended, repaired
    assert_eq!(marriage_events, 3);
}

#[test]
fn test_unloaded_partner_keeps_marriage() {
    let mut world = init_world(Config::default(), 44);
    let (a, b) = couple(&mut world);
    let a_id = villager_id(&world, a).unwrap();

    let tag = unload_villager(&mut world, b).unwrap();
    assert!(world.get::<RelationshipState>(a).unwrap().is_married());

    let b = load_villager(&mut world, &tag).unwrap();
    assert_eq!(
        world.get::<RelationshipState>(b).unwrap().marital_status(),
        MaritalStatus::MarriedToVillager(a_id)
    );
    assert!(world.get::<RelationshipState>(a).unwrap().is_married());
}

#[test]
fn test_loading_repairs_stale_claimants() {
    let mut world = init_world(Config::default(), 45);
    let (a, b) = couple(&mut world);

    // b leaves the marriage on its own and is unloaded; a still claims b
    end_marriage(&mut world, b).unwrap();
    let tag = unload_villager(&mut world, b).unwrap();
    assert!(world.get::<RelationshipState>(a).unwrap().is_married());

    load_villager(&mut world, &tag).unwrap();
    assert!(!world.get::<RelationshipState>(a).unwrap().is_married());
}

#[test]
fn test_partner_that_moved_on_is_repaired_on_load() {
    let mut world = init_world(Config::default(), 46);
    let (a, b) = couple(&mut world);

    let tag = unload_villager(&mut world, a).unwrap();
    end_marriage(&mut world, b).unwrap();

    let a = load_villager(&mut world, &tag).unwrap();
    assert!(!world.get::<RelationshipState>(a).unwrap().is_married());
}

#[test]
fn test_restart_resets_marriage_to_missing_partner() {
    let mut world = init_world(Config::default(), 47);
    let (a, b) = couple(&mut world);
    let a_id = villager_id(&world, a).unwrap();
    let b_tag = unload_villager(&mut world, b).unwrap();

    let mut restarted = init_world(Config::default(), 47);
    let entities = load_villagers(&mut restarted, [&b_tag]).unwrap();

    let state = restarted.get::<RelationshipState>(entities[0]).unwrap();
    assert!(!state.is_married());
    assert_ne!(state.marital_status(), MaritalStatus::MarriedToVillager(a_id));
}

#[test]
fn test_restart_keeps_marriage_when_both_load() {
    let mut world = init_world(Config::default(), 48);
    let (a, b) = couple(&mut world);
    let a_id = villager_id(&world, a).unwrap();
    let b_id = villager_id(&world, b).unwrap();
    let b_tag = unload_villager(&mut world, b).unwrap();
    let a_tag = unload_villager(&mut world, a).unwrap();

    let mut restarted = init_world(Config::default(), 48);
    let entities = load_villagers(&mut restarted, [&b_tag, &a_tag]).unwrap();

    assert_eq!(
        restarted.get::<RelationshipState>(entities[0]).unwrap().marital_status(),
        MaritalStatus::MarriedToVillager(a_id)
    );
    assert_eq!(
        restarted.get::<RelationshipState>(entities[1]).unwrap().marital_status(),
        MaritalStatus::MarriedToVillager(b_id)
    );
}

#[test]
fn test_restart_after_spouse_died() {
    let mut world = init_world(Config::default(), 49);
    let (a, b) = couple(&mut world);
    let b_tag = unload_villager(&mut world, b).unwrap();
    on_death(&mut world, a, "fell").unwrap();
    let a_tag = save_villager(&world, a).unwrap();

    let mut restarted = init_world(Config::default(), 49);
    let entities = load_villagers(&mut restarted, [&a_tag, &b_tag]).unwrap();

    assert_eq!(
        restarted.resource::<VillagerIndex>().get(villager_id(&world, a).unwrap()),
        Some(IndexEntry::Deceased)
    );
    assert!(!restarted.get::<RelationshipState>(entities[1]).unwrap().is_married());
}
