//! Relationship Ledger
//!
//! What a villager remembers about every party it has met. Records are
//! created on first access and never removed for the lifetime of the villager.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use villager_events::{PartyId, Relation};

use crate::config::MemoryConfig;

/// Kinds of interaction a party can have with a villager
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    Greeting,
    Chat,
    Joke,
    Gift,
}

impl InteractionKind {
    /// Hearts gained by a fresh (unfatigued) interaction
    pub fn base_hearts(self) -> i32 {
        match self {
            InteractionKind::Greeting => 1,
            InteractionKind::Chat => 3,
            InteractionKind::Joke => 4,
            InteractionKind::Gift => 8,
        }
    }
}

/// Memory of one party
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryRecord {
    pub party_id: PartyId,
    pub party_name: String,
    pub relation: Relation,
    pub hearts: i32,
    /// Total interactions ever recorded
    pub interaction_count: u64,
    /// Ticks this record has been resident in the ledger
    pub ticks_known: u64,
    /// Repeated interactions wear thin; decays over time
    pub interaction_fatigue: u32,
    pub greeting_cooldown: u32,
    pub last_updated_tick: u64,
}

impl Default for MemoryRecord {
    fn default() -> Self {
        Self::new(PartyId::default())
    }
}

impl MemoryRecord {
    pub fn new(party_id: PartyId) -> Self {
        Self {
            party_id,
            party_name: String::new(),
            relation: Relation::Stranger,
            hearts: 0,
            interaction_count: 0,
            ticks_known: 0,
            interaction_fatigue: 0,
            greeting_cooldown: 0,
            last_updated_tick: 0,
        }
    }

    /// Advance this record by one simulation step
    pub fn tick(&mut self, now: u64, config: &MemoryConfig) {
        self.ticks_known += 1;
        self.greeting_cooldown = self.greeting_cooldown.saturating_sub(1);

        if config.fatigue_decay_interval > 0
            && self.ticks_known % config.fatigue_decay_interval == 0
        {
            self.interaction_fatigue = self.interaction_fatigue.saturating_sub(1);
        }

        self.last_updated_tick = now;
    }

    /// Record an interaction and return the hearts it was worth
    pub fn record_interaction(&mut self, kind: InteractionKind, config: &MemoryConfig) -> i32 {
        let delta = kind.base_hearts() - self.interaction_fatigue as i32;
        self.hearts += delta;
        self.interaction_count += 1;
        self.interaction_fatigue = (self.interaction_fatigue + 1).min(config.max_fatigue);

        if kind == InteractionKind::Greeting {
            self.greeting_cooldown = config.greeting_cooldown;
        }

        self.reclassify(config);
        delta
    }

    pub fn can_greet(&self) -> bool {
        self.greeting_cooldown == 0
    }

    /// Heart-based classification; family relations are kept as set
    fn reclassify(&mut self, config: &MemoryConfig) {
        if self.relation.is_family() {
            return;
        }
        self.relation = if self.hearts >= config.friend_hearts {
            Relation::Friend
        } else if self.hearts >= config.acquaintance_hearts {
            Relation::Acquaintance
        } else {
            Relation::Stranger
        };
    }

    /// Drop a family relation back to the heart-based one
    pub fn clear_family_relation(&mut self, config: &MemoryConfig) {
        if self.relation.is_family() {
            self.relation = Relation::Stranger;
            self.reclassify(config);
        }
    }
}

/// Insertion-ordered map from party id to memory record
#[derive(Component, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<MemoryRecord>", into = "Vec<MemoryRecord>")]
pub struct RelationshipLedger {
    records: Vec<MemoryRecord>,
    index: HashMap<PartyId, usize>,
}

impl From<Vec<MemoryRecord>> for RelationshipLedger {
    fn from(records: Vec<MemoryRecord>) -> Self {
        let mut ledger = Self::default();
        for record in records {
            // first occurrence wins if a save contains duplicates
            if !ledger.index.contains_key(&record.party_id) {
                ledger.index.insert(record.party_id, ledger.records.len());
                ledger.records.push(record);
            }
        }
        ledger
    }
}

impl From<RelationshipLedger> for Vec<MemoryRecord> {
    fn from(ledger: RelationshipLedger) -> Self {
        ledger.records
    }
}

impl RelationshipLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record for a party, created with defaults on first access
    pub fn record_for(&mut self, party: PartyId) -> &mut MemoryRecord {
        let idx = match self.index.get(&party) {
            Some(&idx) => idx,
            None => {
                let idx = self.records.len();
                self.records.push(MemoryRecord::new(party));
                self.index.insert(party, idx);
                idx
            }
        };
        &mut self.records[idx]
    }

    pub fn get(&self, party: PartyId) -> Option<&MemoryRecord> {
        self.index.get(&party).map(|&idx| &self.records[idx])
    }

    pub fn contains(&self, party: PartyId) -> bool {
        self.index.contains_key(&party)
    }

    /// Advance every record once, in insertion order
    pub fn tick(&mut self, now: u64, config: &MemoryConfig) {
        for record in &mut self.records {
            record.tick(now, config);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &MemoryRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
