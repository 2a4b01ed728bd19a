//! World Initialization
//!
//! Inserts every resource the villager systems read.

use bevy_ecs::prelude::*;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::components::VillagerIndex;
use crate::config::Config;
use crate::events::EventLog;
use crate::host::{Localizer, PlayerRecords, Sessions, WorldClock, WorldItems};
use crate::registry::{ItemRegistry, ProfessionTable};
use crate::SimRng;

/// Create a world with standard registries and an in-memory event log.
///
/// All randomness drawn by the systems comes from the seeded [`SimRng`].
pub fn init_world(config: Config, seed: u64) -> World {
    let mut world = World::new();

    world.insert_resource(WorldClock::new(&config.sleep));
    world.insert_resource(config);
    world.insert_resource(VillagerIndex::new());
    world.insert_resource(PlayerRecords::new());
    world.insert_resource(Sessions::new());
    world.insert_resource(Localizer::standard());
    world.insert_resource(ItemRegistry::standard());
    world.insert_resource(ProfessionTable::standard());
    world.insert_resource(WorldItems::new());
    world.insert_resource(EventLog::null());
    world.insert_resource(SimRng(SmallRng::seed_from_u64(seed)));

    world
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_follows_config() {
        let mut config = Config::default();
        config.sleep.day_length = 100;
        config.sleep.night_start = 50;
        config.sleep.night_end = 90;

        let mut world = init_world(config, 0);
        let mut clock = world.resource_mut::<WorldClock>();
        clock.set_time_of_day(60);
        assert!(clock.is_night());
        assert_eq!(clock.tick, 60);
    }
}
