//! Relationship State
//!
//! Marital status and family links of a villager.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use villager_events::{Gender, MaritalStatus, PartyId};

/// Marital status plus a denormalized copy of the partner's identity.
///
/// When married, `partner_name` and `partner_gender` mirror the partner's
/// record as of the last marriage transition. When unmarried both are reset.
#[derive(Component, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelationshipState {
    marital_status: MaritalStatus,
    partner_name: String,
    partner_gender: Gender,
    /// Players (or villagers) who raised this villager
    parent_ids: BTreeSet<PartyId>,
}

impl RelationshipState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn marital_status(&self) -> MaritalStatus {
        self.marital_status
    }

    pub fn partner_id(&self) -> PartyId {
        self.marital_status.partner_id()
    }

    pub fn partner_name(&self) -> &str {
        &self.partner_name
    }

    pub fn partner_gender(&self) -> Gender {
        self.partner_gender
    }

    pub fn is_married(&self) -> bool {
        self.marital_status.is_married()
    }

    pub fn is_married_to_player(&self) -> bool {
        matches!(self.marital_status, MaritalStatus::MarriedToPlayer(_))
    }

    pub fn is_married_to_villager(&self) -> bool {
        matches!(self.marital_status, MaritalStatus::MarriedToVillager(_))
    }

    /// Write every partner field in one step
    pub fn set_married(&mut self, status: MaritalStatus, partner_name: impl Into<String>, partner_gender: Gender) {
        debug_assert!(status.is_married(), "use reset_to_unmarried to clear a marriage");
        self.marital_status = status;
        self.partner_name = partner_name.into();
        self.partner_gender = partner_gender;
    }

    pub fn reset_to_unmarried(&mut self) {
        self.marital_status = MaritalStatus::Unmarried;
        self.partner_name.clear();
        self.partner_gender = Gender::Unassigned;
    }

    pub fn add_parent(&mut self, parent: PartyId) {
        if !parent.is_empty() {
            self.parent_ids.insert(parent);
        }
    }

    pub fn is_parent(&self, party: PartyId) -> bool {
        self.parent_ids.contains(&party)
    }

    pub fn parent_ids(&self) -> impl Iterator<Item = &PartyId> {
        self.parent_ids.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_clears_partner_fields() {
        let partner = PartyId::new_v4();
        let mut state = RelationshipState::new();
        state.set_married(MaritalStatus::MarriedToVillager(partner), "Bea", Gender::Female);
        assert!(state.is_married_to_villager());
        assert_eq!(state.partner_id(), partner);

        state.reset_to_unmarried();
        assert_eq!(state.marital_status(), MaritalStatus::Unmarried);
        assert_eq!(state.partner_name(), "");
        assert_eq!(state.partner_gender(), Gender::Unassigned);
    }

    #[test]
    fn test_empty_parent_ignored() {
        let mut state = RelationshipState::new();
        state.add_parent(villager_events::EMPTY_ID);
        assert_eq!(state.parent_ids().count(), 0);
    }
}
