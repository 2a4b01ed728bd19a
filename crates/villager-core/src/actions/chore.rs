//! Chore Action
//!
//! Toggleable work assigned by a player. Broken tools and death switch it off.

use serde::{Deserialize, Serialize};

use super::ActionContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChoreKind {
    Farming,
    Woodcutting,
    Mining,
    Fishing,
    Hunting,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChoreAction {
    chore: Option<ChoreKind>,
    ticks_worked: u64,
}

impl ChoreAction {
    pub fn is_active(&self) -> bool {
        self.chore.is_some()
    }

    pub fn chore(&self) -> Option<ChoreKind> {
        self.chore
    }

    pub fn ticks_worked(&self) -> u64 {
        self.ticks_worked
    }

    pub fn start(&mut self, chore: ChoreKind) {
        if self.chore != Some(chore) {
            self.ticks_worked = 0;
        }
        self.chore = Some(chore);
    }

    pub fn disable(&mut self) {
        self.chore = None;
    }

    pub fn tick(&mut self, _ctx: &mut ActionContext) {
        if self.chore.is_some() {
            self.ticks_worked += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_switching_chore_resets_progress() {
        let mut chore = ChoreAction::default();
        chore.start(ChoreKind::Mining);
        chore.ticks_worked = 30;
        chore.start(ChoreKind::Mining);
        assert_eq!(chore.ticks_worked(), 30);
        chore.start(ChoreKind::Fishing);
        assert_eq!(chore.ticks_worked(), 0);
        chore.disable();
        assert!(!chore.is_active());
    }
}
