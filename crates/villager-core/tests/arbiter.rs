//! Behavior arbiter tests
//!
//! Sleep suspends the host scheduler, Stay holds position every tick even
//! while pursuing, and a hurt sleeper wakes within the same call.

use bevy_ecs::prelude::*;
use villager_core::actions::ActionRegistry;
use villager_core::components::{Attributes, Position};
use villager_core::config::Config;
use villager_core::host::{TaskScheduler, WorldClock};
use villager_core::setup::{init_world, spawn_villager, VillagerSeed};
use villager_core::systems::{on_damage, tick_villager, DamageOutcome, DamageSource};
use villager_events::{Gender, MovementState, PartyId, Profession};

const NIGHT: u64 = 14_000;

fn path() -> Vec<Position> {
    (1..=5).map(|x| Position::new(x as f64, 64.0, 0.0)).collect()
}

fn setup() -> (World, Entity) {
    let mut world = init_world(Config::default(), 31);
    let entity = spawn_villager(&mut world, VillagerSeed::new("Ada", Gender::Female, Profession::Farmer));
    (world, entity)
}

#[test]
fn test_sleep_suspends_scheduler() {
    let (mut world, entity) = setup();
    world.resource_mut::<WorldClock>().set_time_of_day(NIGHT);
    world.get_mut::<TaskScheduler>(entity).unwrap().set_path(path());

    for _ in 0..10 {
        tick_villager(&mut world, entity);
        world.resource_mut::<WorldClock>().advance();
    }

    assert!(world.get::<ActionRegistry>(entity).unwrap().is_sleeping());
    let scheduler = world.get::<TaskScheduler>(entity).unwrap();
    assert!(scheduler.pathing_suspended);
    assert!(!scheduler.has_path());
    assert_eq!(scheduler.ticks_delivered, 0);
    assert_eq!(scheduler.task_updates, 0);
    assert_eq!(*world.get::<Position>(entity).unwrap(), Position::default());
}

#[test]
fn test_stay_clears_path_every_tick() {
    let (mut world, entity) = setup();
    world
        .get_mut::<Attributes>(entity)
        .unwrap()
        .set_movement_state(MovementState::Stay);

    for _ in 0..3 {
        world.get_mut::<TaskScheduler>(entity).unwrap().set_path(path());
        tick_villager(&mut world, entity);
        assert!(!world.get::<TaskScheduler>(entity).unwrap().has_path());
    }

    let scheduler = world.get::<TaskScheduler>(entity).unwrap();
    assert_eq!(scheduler.task_updates, 3);
    assert_eq!(scheduler.look_updates, 3);
    assert_eq!(scheduler.ticks_delivered, 0);
    assert_eq!(*world.get::<Position>(entity).unwrap(), Position::default());
}

#[test]
fn test_move_follows_path() {
    let (mut world, entity) = setup();
    world.get_mut::<TaskScheduler>(entity).unwrap().set_path(path());

    tick_villager(&mut world, entity);
    tick_villager(&mut world, entity);

    assert_eq!(*world.get::<Position>(entity).unwrap(), Position::new(2.0, 64.0, 0.0));
    assert_eq!(world.get::<TaskScheduler>(entity).unwrap().ticks_delivered, 2);
}

#[test]
fn test_damage_wakes_sleeper_before_returning() {
    let (mut world, entity) = setup();
    world
        .get_mut::<Attributes>(entity)
        .unwrap()
        .set_movement_state(MovementState::Stay);
    world.resource_mut::<WorldClock>().set_time_of_day(NIGHT);
    tick_villager(&mut world, entity);
    assert!(world.get::<ActionRegistry>(entity).unwrap().is_sleeping());

    let attacker = PartyId::new_v4();
    let outcome = on_damage(&mut world, entity, DamageSource::new(2.0, "zombie").by(attacker)).unwrap();
    assert_eq!(outcome, DamageOutcome::Survived { health: 18.0, woke: true });

    let actions = world.get::<ActionRegistry>(entity).unwrap();
    assert!(!actions.is_sleeping());
    assert_eq!(actions.attack_response().unwrap().target(), Some(attacker));

    // still night, but the wake cooldown keeps it up; Stay still holds position
    world.get_mut::<TaskScheduler>(entity).unwrap().set_path(path());
    tick_villager(&mut world, entity);

    assert!(!world.get::<ActionRegistry>(entity).unwrap().is_sleeping());
    assert_eq!(world.get::<Attributes>(entity).unwrap().attack_target(), Some(attacker));
    let scheduler = world.get::<TaskScheduler>(entity).unwrap();
    assert!(!scheduler.pathing_suspended);
    assert!(!scheduler.has_path());
    assert_eq!(scheduler.ticks_delivered, 0);
    assert_eq!(scheduler.task_updates, 1);
    assert_eq!(*world.get::<Position>(entity).unwrap(), Position::default());
}

#[test]
fn test_pursuit_in_stay_holds_position() {
    let (mut world, entity) = setup();
    world
        .get_mut::<Attributes>(entity)
        .unwrap()
        .set_movement_state(MovementState::Stay);
    let attacker = PartyId::new_v4();
    on_damage(&mut world, entity, DamageSource::new(1.0, "arrow").by(attacker)).unwrap();

    world
        .get_mut::<TaskScheduler>(entity)
        .unwrap()
        .set_path(vec![Position::new(9.0, 0.0, 0.0)]);
    tick_villager(&mut world, entity);

    assert_eq!(world.get::<Attributes>(entity).unwrap().attack_target(), Some(attacker));
    assert_eq!(*world.get::<Position>(entity).unwrap(), Position::default());
    assert!(!world.get::<TaskScheduler>(entity).unwrap().has_path());
}

#[test]
fn test_pursuit_in_move_follows_path() {
    let (mut world, entity) = setup();
    let attacker = PartyId::new_v4();
    on_damage(&mut world, entity, DamageSource::new(1.0, "arrow").by(attacker)).unwrap();

    world.get_mut::<TaskScheduler>(entity).unwrap().set_path(path());
    tick_villager(&mut world, entity);

    assert_eq!(world.get::<Attributes>(entity).unwrap().attack_target(), Some(attacker));
    assert_eq!(*world.get::<Position>(entity).unwrap(), Position::new(1.0, 64.0, 0.0));
    assert_eq!(world.get::<TaskScheduler>(entity).unwrap().ticks_delivered, 1);
}

#[test]
fn test_deceased_villagers_are_not_ticked() {
    let (mut world, entity) = setup();
    villager_core::systems::on_death(&mut world, entity, "test").unwrap();
    tick_villager(&mut world, entity);
    assert_eq!(world.get::<Attributes>(entity).unwrap().ticks_alive, 0);
}

#[test]
fn test_sleeping_suppresses_every_movement_state() {
    for state in [MovementState::Move, MovementState::Follow, MovementState::Stay] {
        let (mut world, entity) = setup();
        world.resource_mut::<WorldClock>().set_time_of_day(NIGHT);
        world.get_mut::<Attributes>(entity).unwrap().set_movement_state(state);
        world
            .get_mut::<ActionRegistry>(entity)
            .unwrap()
            .sleep_mut()
            .unwrap()
            .fall_asleep();

        for _ in 0..5 {
            world.get_mut::<TaskScheduler>(entity).unwrap().set_path(path());
            tick_villager(&mut world, entity);
        }

        let scheduler = world.get::<TaskScheduler>(entity).unwrap();
        assert_eq!(scheduler.ticks_delivered, 0, "{:?}", state);
        assert_eq!(scheduler.task_updates, 0, "{:?}", state);
        assert!(!scheduler.has_path(), "{:?}", state);
        assert_eq!(*world.get::<Position>(entity).unwrap(), Position::default());
    }
}
