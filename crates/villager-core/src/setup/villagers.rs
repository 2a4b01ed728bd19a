//! Villager Spawning
//!
//! Functions to spawn villagers with their full component set, either from an
//! explicit seed or as a randomized population.

use bevy_ecs::prelude::*;
use rand::Rng;
use uuid::Builder;
use villager_events::{Gender, PartyId, Profession, ProfessionSkinGroup};

use crate::actions::{Action, ActionRegistry, CombatAction, CombatMethod};
use crate::components::{
    Attributes, Inventory, Lifecycle, Position, RelationshipLedger, RelationshipState, Villager,
    VillagerId, VillagerIndex,
};
use crate::config::Config;
use crate::host::TaskScheduler;
use crate::registry::{ProfessionInfo, ProfessionTable};
use crate::SimRng;

const MALE_NAMES: &[&str] = &[
    "Aldous", "Bram", "Cedric", "Dunstan", "Edric", "Fenwick", "Godfrey", "Hamon", "Ivo", "Jory",
    "Kenric", "Leofric", "Milo", "Norbert", "Osric", "Piers", "Quentin", "Rowan", "Silas", "Tobin",
];

const FEMALE_NAMES: &[&str] = &[
    "Ada", "Beatrix", "Cecily", "Della", "Edith", "Freya", "Gwen", "Hilda", "Isolde", "Joan",
    "Kestrel", "Linnea", "Maud", "Nell", "Odette", "Petra", "Rosalind", "Sybil", "Tamsin", "Wren",
];

/// Everything needed to spawn one villager
#[derive(Debug, Clone)]
pub struct VillagerSeed {
    pub id: PartyId,
    pub name: String,
    pub gender: Gender,
    pub profession: Profession,
    pub position: Position,
}

impl VillagerSeed {
    pub fn new(name: impl Into<String>, gender: Gender, profession: Profession) -> Self {
        Self {
            id: PartyId::new_v4(),
            name: name.into(),
            gender,
            profession,
            position: Position::default(),
        }
    }

    pub fn at(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    pub fn with_id(mut self, id: PartyId) -> Self {
        self.id = id;
        self
    }
}

/// Guards get the sturdier health pool
pub fn max_health(config: &Config, skin_group: ProfessionSkinGroup) -> f32 {
    match skin_group {
        ProfessionSkinGroup::Guard => config.villager.guard_max_health,
        _ => config.villager.villager_max_health,
    }
}

/// Starting combat method for a profession
pub fn combat_method_for(profession: Profession, info: &ProfessionInfo) -> CombatMethod {
    match profession {
        Profession::Archer => CombatMethod::Ranged,
        Profession::Guard => CombatMethod::Melee,
        _ if info.uses_combat_weapons => CombatMethod::Melee,
        _ => CombatMethod::Passive,
    }
}

/// The standard action set with the profession's combat method
pub fn standard_actions(world: &World, profession: Profession) -> ActionRegistry {
    let info = world.resource::<ProfessionTable>().get(profession);
    let mut actions = ActionRegistry::standard();
    actions.register(Action::Combat(CombatAction::with_method(combat_method_for(
        profession, &info,
    ))));
    actions
}

/// Spawn a villager entity from loose parts and mark it loaded
pub fn insert_villager(world: &mut World, id: PartyId, parts: impl Bundle) -> Entity {
    let entity = world
        .spawn((Villager, VillagerId(id), TaskScheduler::new(), parts))
        .id();
    world.resource_mut::<VillagerIndex>().loaded(id, entity);
    entity
}

pub fn spawn_villager(world: &mut World, seed: VillagerSeed) -> Entity {
    let skin_group = world.resource::<ProfessionTable>().skin_group(seed.profession);
    let health = max_health(world.resource::<Config>(), skin_group);

    let mut attributes = Attributes::new(seed.name, seed.gender, seed.profession);
    attributes.max_health = health;
    attributes.health = health;
    let actions = standard_actions(world, seed.profession);

    let entity = insert_villager(
        world,
        seed.id,
        (
            attributes,
            RelationshipState::new(),
            RelationshipLedger::new(),
            Inventory::new(),
            seed.position,
            Lifecycle::default(),
            actions,
        ),
    );
    tracing::debug!("Spawned villager {} as {:?}", seed.id, entity);
    entity
}

fn generate_name(gender: Gender, index: usize, rng: &mut impl Rng) -> String {
    let names = match gender {
        Gender::Female => FEMALE_NAMES,
        _ => MALE_NAMES,
    };
    let name_index = (index + rng.gen_range(0..names.len())) % names.len();
    names[name_index].to_string()
}

/// Spawn `count` villagers with random names, professions and positions.
///
/// Ids are drawn from the world's [`SimRng`], so the same seed always yields
/// the same population.
pub fn spawn_population(world: &mut World, count: usize) -> Vec<Entity> {
    let radius = world.resource::<Config>().simulation.spawn_radius.max(0.0);
    let professions: Vec<Profession> = Profession::all()
        .iter()
        .copied()
        .filter(|p| *p != Profession::Child)
        .collect();

    let seeds: Vec<VillagerSeed> = {
        let mut sim_rng = world.resource_mut::<SimRng>();
        let rng = &mut sim_rng.0;
        (0..count)
            .map(|i| {
                let id = PartyId::from(Builder::from_random_bytes(rng.gen()).into_uuid());
                let gender = if rng.gen_bool(0.5) {
                    Gender::Female
                } else {
                    Gender::Male
                };
                let profession = professions[rng.gen_range(0..professions.len())];
                let position = Position::new(
                    rng.gen_range(-radius..=radius),
                    64.0,
                    rng.gen_range(-radius..=radius),
                );
                VillagerSeed::new(generate_name(gender, i, rng), gender, profession)
                    .with_id(id)
                    .at(position)
            })
            .collect()
    };

    seeds
        .into_iter()
        .map(|seed| spawn_villager(world, seed))
        .collect()
}
