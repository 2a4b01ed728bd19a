//! Attack Response Action
//!
//! Turns on whoever hurt the villager. The target is published through
//! [`Attributes::set_attack_target`](crate::components::Attributes::set_attack_target)
//! so combat and sleep can see it; pursuit is abandoned after the
//! configured response window.

use serde::{Deserialize, Serialize};
use villager_events::PartyId;

use super::ActionContext;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttackResponseAction {
    target: Option<PartyId>,
    ticks_responding: u32,
}

impl AttackResponseAction {
    pub fn target(&self) -> Option<PartyId> {
        self.target
    }

    pub fn is_responding(&self) -> bool {
        self.target.is_some()
    }

    /// Begin responding to an attack. Damage without an originator is ignored.
    /// Returns true if a response started.
    pub fn start_response(&mut self, originator: Option<PartyId>) -> bool {
        match originator {
            Some(party) => {
                self.target = Some(party);
                self.ticks_responding = 0;
                true
            }
            None => false,
        }
    }

    pub fn stop(&mut self) {
        self.target = None;
        self.ticks_responding = 0;
    }

    pub fn tick(&mut self, ctx: &mut ActionContext) {
        let Some(target) = self.target else {
            return;
        };

        self.ticks_responding += 1;
        if self.ticks_responding > ctx.config.combat.response_duration {
            self.stop();
            if ctx.attributes.attack_target() == Some(target) {
                ctx.attributes.set_attack_target(None);
            }
        } else {
            ctx.attributes.set_attack_target(Some(target));
        }
    }
}
