//! Event Log
//!
//! Append-only record of what happened to villagers. Events are kept in
//! memory for inspection and optionally streamed to a JSONL file.

use bevy_ecs::prelude::*;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;
use villager_events::{EventKind, EventType, PartyId, VillagerEvent};

#[derive(Resource)]
pub struct EventLog {
    writer: Option<BufWriter<File>>,
    events: Vec<VillagerEvent>,
    next_event_id: u64,
}

impl Default for EventLog {
    fn default() -> Self {
        Self::null()
    }
}

impl EventLog {
    /// Create a log that also writes to the specified path
    pub fn to_file(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;

        Ok(Self {
            writer: Some(BufWriter::new(file)),
            events: Vec::new(),
            next_event_id: 1,
        })
    }

    /// Create an in-memory log (for testing)
    pub fn null() -> Self {
        Self {
            writer: None,
            events: Vec::new(),
            next_event_id: 1,
        }
    }

    fn next_id(&mut self) -> String {
        let id = format!("evt_{:08}", self.next_event_id);
        self.next_event_id += 1;
        id
    }

    pub fn record(&mut self, tick: u64, villager: PartyId, kind: EventKind) {
        let event = VillagerEvent {
            event_id: self.next_id(),
            tick,
            villager,
            kind,
        };

        if let Some(ref mut writer) = self.writer {
            let written = serde_json::to_string(&event)
                .map_err(std::io::Error::from)
                .and_then(|json| writeln!(writer, "{}", json));
            if let Err(e) = written {
                tracing::warn!("Failed to write event {}: {}", event.event_id, e);
            }
        }

        self.events.push(event);
    }

    pub fn events(&self) -> &[VillagerEvent] {
        &self.events
    }

    pub fn of_type(&self, event_type: EventType) -> impl Iterator<Item = &VillagerEvent> {
        self.events.iter().filter(move |e| e.event_type() == event_type)
    }

    pub fn for_villager(&self, villager: PartyId) -> impl Iterator<Item = &VillagerEvent> {
        self.events.iter().filter(move |e| e.villager == villager)
    }

    /// Take the in-memory events, leaving the file untouched
    pub fn drain(&mut self) -> Vec<VillagerEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn flush(&mut self) -> std::io::Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush()?;
        }
        Ok(())
    }
}

impl Drop for EventLog {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            tracing::warn!("Failed to flush event log: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::BufRead;

    #[test]
    fn test_event_id_generation() {
        let mut log = EventLog::null();
        let villager = PartyId::new_v4();
        log.record(1, villager, EventKind::FellAsleep);
        log.record(2, villager, EventKind::WokeUp);

        let ids: Vec<&str> = log.events().iter().map(|e| e.event_id.as_str()).collect();
        assert_eq!(ids, vec!["evt_00000001", "evt_00000002"]);
        assert_eq!(log.of_type(EventType::Sleep).count(), 2);
    }

    #[test]
    fn test_jsonl_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.jsonl");

        let villager = PartyId::new_v4();
        {
            let mut log = EventLog::to_file(&path).unwrap();
            log.record(5, villager, EventKind::Died { cause: "fall".to_string() });
            log.record(5, villager, EventKind::WokeUp);
        }

        let file = File::open(&path).unwrap();
        let lines: Vec<String> = std::io::BufReader::new(file)
            .lines()
            .map(|l| l.unwrap())
            .collect();
        assert_eq!(lines.len(), 2);

        let parsed: VillagerEvent = serde_json::from_str(&lines[0]).unwrap();
        assert_eq!(parsed.villager, villager);
        assert_eq!(parsed.event_type(), EventType::Death);
    }
}
