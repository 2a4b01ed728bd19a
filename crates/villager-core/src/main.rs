//! Villager Simulation Runner
//!
//! Spawns a small village, marries two villagers, lets the days pass and
//! kills one of the couple part-way through, then reports what happened.

use bevy_ecs::prelude::*;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use villager_core::actions::ActionRegistry;
use villager_core::components::{Attributes, Lifecycle, Position, Villager, VillagerId};
use villager_core::config::{Config, DEFAULT_TUNING_PATH};
use villager_core::events::EventLog;
use villager_core::host::{PlayerRecord, PlayerRecords, Session, Sessions, WorldItems};
use villager_core::setup::{init_world, spawn_population};
use villager_core::systems::{
    advance_clock, on_damage, say, start_marriage, tick_villagers, DamageSource, MarriageTarget,
};
use villager_events::{EventType, Gender, PartyId};

/// Command line arguments for the simulation
#[derive(Parser, Debug)]
#[command(name = "villager_sim")]
#[command(about = "Headless villager simulation")]
struct Args {
    /// Random seed for reproducibility
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Number of ticks to simulate (defaults to the tuning file)
    #[arg(long)]
    ticks: Option<u64>,

    /// Number of villagers to spawn (defaults to the tuning file)
    #[arg(long)]
    villagers: Option<usize>,

    /// Tuning file
    #[arg(long, default_value = DEFAULT_TUNING_PATH)]
    tuning: PathBuf,

    /// Write events as JSONL to this file
    #[arg(long)]
    events: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = Config::load_or_default(&args.tuning);
    let ticks = args.ticks.unwrap_or(config.simulation.default_ticks);
    let count = args.villagers.unwrap_or(config.simulation.villager_count).max(2);

    println!("Villager Simulation");
    println!("===================");
    println!("Seed: {}", args.seed);
    println!("Ticks: {}", ticks);
    println!("Villagers: {}", count);
    println!();

    let mut world = init_world(config, args.seed);
    if let Some(path) = &args.events {
        match EventLog::to_file(path) {
            Ok(log) => world.insert_resource(log),
            Err(e) => tracing::warn!("Could not open event log {}: {}", path.display(), e),
        }
    }

    let villagers = spawn_population(&mut world, count);
    let player = PartyId::new_v4();
    world
        .resource_mut::<PlayerRecords>()
        .insert(PlayerRecord::new(player, "Steve", Gender::Male));
    let home = world.get::<Position>(villagers[0]).copied().unwrap_or_default();
    world
        .resource_mut::<Sessions>()
        .connect(Session::new(player, "Steve", home));

    if let Err(e) = start_marriage(&mut world, villagers[0], MarriageTarget::Villager(villagers[1])) {
        tracing::warn!("Demo marriage failed: {}", e);
    }
    if let Err(e) = say(&mut world, villagers[0], "phrase.greeting", player, &[]) {
        tracing::warn!("Greeting failed: {}", e);
    }

    let mut schedule = Schedule::default();
    schedule.add_systems((tick_villagers, advance_clock).chain());

    let fatal_tick = ticks / 2;
    for tick in 0..ticks {
        if tick == fatal_tick {
            let hit = DamageSource::new(1_000.0, "slain").by(player);
            match on_damage(&mut world, villagers[0], hit) {
                Ok(outcome) => tracing::info!("Tick {}: fatal hit outcome {:?}", tick, outcome),
                Err(e) => tracing::warn!("Tick {}: damage failed: {}", tick, e),
            }
        }
        schedule.run(&mut world);
    }

    print_summary(&mut world);

    if let Err(e) = world.resource_mut::<EventLog>().flush() {
        tracing::warn!("Could not flush event log: {}", e);
    }
}

fn print_summary(world: &mut World) {
    println!();
    println!("Summary");
    println!("-------");

    let mut query = world.query_filtered::<(&VillagerId, &Attributes, &Lifecycle, &ActionRegistry), With<Villager>>();
    let mut rows: Vec<_> = query
        .iter(world)
        .map(|(id, attributes, life, actions)| {
            let mood = actions.mood().map(|m| m.mood_level()).unwrap_or(0.0);
            (id.0, attributes.name.clone(), attributes.profession, life.deceased, mood)
        })
        .collect();
    rows.sort_by_key(|row| row.0);
    for (id, name, profession, deceased, mood) in rows {
        let status = if deceased { "dead" } else { "alive" };
        println!("  {} {} the {} ({}, mood {:.1})", id, name, profession, status, mood);
    }

    println!("  Items on the ground: {}", world.resource::<WorldItems>().items.len());
    let log = world.resource::<EventLog>();
    for event_type in EventType::all() {
        println!("  {:?} events: {}", event_type, log.of_type(*event_type).count());
    }
}
