//! Marriage lifecycle tests
//!
//! Both sides of a villager marriage stay in step through start, divorce and
//! the asymmetric unilateral end.

use villager_core::actions::{ActionRegistry, CombatMethod};
use villager_core::components::{RelationshipLedger, RelationshipState};
use villager_core::config::Config;
use villager_core::error::VillagerError;
use villager_core::host::{PlayerRecord, PlayerRecords};
use villager_core::setup::{init_world, spawn_villager, VillagerSeed};
use villager_core::systems::{
    divorce, end_marriage, start_marriage, villager_id, MarriageTarget,
};
use villager_events::{Gender, MaritalStatus, PartyId, Profession, Relation};

#[test]
fn test_villager_marriage_is_symmetric() {
    let mut world = init_world(Config::default(), 11);
    let a = spawn_villager(&mut world, VillagerSeed::new("Ada", Gender::Female, Profession::Farmer));
    let b = spawn_villager(&mut world, VillagerSeed::new("Bram", Gender::Male, Profession::Smith));
    let (a_id, b_id) = (villager_id(&world, a).unwrap(), villager_id(&world, b).unwrap());

    start_marriage(&mut world, a, MarriageTarget::Villager(b)).unwrap();

    let a_state = world.get::<RelationshipState>(a).unwrap();
    let b_state = world.get::<RelationshipState>(b).unwrap();
    assert_eq!(a_state.marital_status(), MaritalStatus::MarriedToVillager(b_id));
    assert_eq!(b_state.marital_status(), MaritalStatus::MarriedToVillager(a_id));
    assert_eq!(a_state.partner_name(), "Bram");
    assert_eq!(b_state.partner_gender(), Gender::Female);

    divorce(&mut world, a).unwrap();
    assert!(!world.get::<RelationshipState>(a).unwrap().is_married());
    assert!(!world.get::<RelationshipState>(b).unwrap().is_married());
}

#[test]
fn test_end_marriage_only_resets_the_caller() {
    let mut world = init_world(Config::default(), 11);
    let a = spawn_villager(&mut world, VillagerSeed::new("Ada", Gender::Female, Profession::Farmer));
    let b = spawn_villager(&mut world, VillagerSeed::new("Bram", Gender::Male, Profession::Smith));
    let a_id = villager_id(&world, a).unwrap();

    start_marriage(&mut world, a, MarriageTarget::Villager(b)).unwrap();
    let b_id = end_marriage(&mut world, a).unwrap();

    assert_eq!(b_id, Some(villager_id(&world, b).unwrap()));
    assert!(!world.get::<RelationshipState>(a).unwrap().is_married());
    assert_eq!(
        world.get::<RelationshipState>(b).unwrap().marital_status(),
        MaritalStatus::MarriedToVillager(a_id)
    );
    assert_eq!(end_marriage(&mut world, a).unwrap(), None);
}

#[test]
fn test_player_marriage_updates_record_ledger_and_combat() {
    let mut world = init_world(Config::default(), 12);
    let a = spawn_villager(&mut world, VillagerSeed::new("Ada", Gender::Female, Profession::Librarian));
    let a_id = villager_id(&world, a).unwrap();
    let player = PartyId::new_v4();
    world
        .resource_mut::<PlayerRecords>()
        .insert(PlayerRecord::new(player, "Steve", Gender::Male));

    start_marriage(&mut world, a, MarriageTarget::Player(player)).unwrap();

    let record = world.resource::<PlayerRecords>().get(player).unwrap();
    assert_eq!(record.marital_status, MaritalStatus::MarriedToVillager(a_id));
    let ledger = world.get::<RelationshipLedger>(a).unwrap();
    assert_eq!(ledger.get(player).unwrap().relation, Relation::Spouse);
    let actions = world.get::<ActionRegistry>(a).unwrap();
    assert_eq!(actions.combat().unwrap().method(), CombatMethod::Melee);

    divorce(&mut world, a).unwrap();
    let record = world.resource::<PlayerRecords>().get(player).unwrap();
    assert_eq!(record.marital_status, MaritalStatus::Unmarried);
    let ledger = world.get::<RelationshipLedger>(a).unwrap();
    assert_ne!(ledger.get(player).unwrap().relation, Relation::Spouse);
    let actions = world.get::<ActionRegistry>(a).unwrap();
    assert_eq!(actions.combat().unwrap().method(), CombatMethod::Passive);
}

#[test]
fn test_invalid_targets_change_nothing() {
    let mut world = init_world(Config::default(), 13);
    let a = spawn_villager(&mut world, VillagerSeed::new("Ada", Gender::Female, Profession::Farmer));

    assert!(matches!(
        start_marriage(&mut world, a, MarriageTarget::Villager(a)),
        Err(VillagerError::InvalidArgument(_))
    ));
    assert!(matches!(
        start_marriage(&mut world, a, MarriageTarget::Player(PartyId::new_v4())),
        Err(VillagerError::InvalidArgument(_))
    ));
    assert!(MarriageTarget::from_parts(None, None).is_err());
    assert!(MarriageTarget::from_parts(Some(a), Some(PartyId::new_v4())).is_err());
    assert!(!world.get::<RelationshipState>(a).unwrap().is_married());
}
