//! House: a faction.

use std::collections::HashMap;

use bevy_ecs::component::Component;
use hexreach_contracts::HouseId;
use serde::{Deserialize, Serialize};

use crate::intel::IntelligenceDb;

/// Diplomatic standing between two houses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiplomaticState {
    Neutral,
    Hostile,
    Allied,
}

/// A diplomatic relation record, stamped with the turn it took effect.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Relation {
    pub state: DiplomaticState,
    pub effective_since_turn: u32,
}

/// Accumulated research-point investment and current level per tracked
/// tech axis.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TechTree {
    pub economic_level: u32,
    pub science_level: u32,
    /// 9 configured tech fields, by index into the config snapshot's field
    /// table (kept abstract here — `hexreach-config` owns field naming).
    pub fields: [u32; 9],
    pub accumulated_rp: HashMap<u8, f64>,
}

/// A faction. Created at game init, eliminated when the homeworld is lost
/// and all assets are gone.
#[derive(Component, Debug, Clone, Serialize, Deserialize)]
pub struct House {
    pub key: hexreach_contracts::HouseKey,
    pub name: String,
 /// Signed — debt is allowed.
    pub treasury: i64,
    pub tech: TechTree,
    pub diplomacy: HashMap<HouseId, Relation>,
    pub intel: IntelligenceDb,
    pub prestige: i64,
    pub eliminated: bool,
    /// Consecutive turns this house has ended Maintenance in debt. Reset to
    /// 0 the moment treasury is non-negative; drives the debt-warning
 /// threshold in `hexreach_economy::debit_maintenance`.
    pub consecutive_debt_turns: u32,
}

impl House {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            key: hexreach_contracts::HouseKey::new(),
            name: name.into(),
            treasury: 0,
            tech: TechTree::default(),
            diplomacy: HashMap::new(),
            intel: IntelligenceDb::default(),
            prestige: 0,
            eliminated: false,
            consecutive_debt_turns: 0,
        }
    }

    #[must_use]
    pub fn relation_with(&self, other: HouseId) -> DiplomaticState {
        self.diplomacy
            .get(&other)
            .map_or(DiplomaticState::Neutral, |r| r.state)
    }

    pub fn set_relation(&mut self, other: HouseId, state: DiplomaticState, turn: u32) {
        self.diplomacy.insert(
            other,
            Relation {
                state,
                effective_since_turn: turn,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy_ecs::entity::Entity;

    #[test]
    fn unrelated_house_defaults_to_neutral() {
        let house = House::new("Atreides");
        assert_eq!(
            house.relation_with(HouseId(Entity::from_raw(5))),
            DiplomaticState::Neutral
        );
    }

    #[test]
    fn set_relation_is_reflected_immediately() {
        let mut house = House::new("Atreides");
        let other = HouseId(Entity::from_raw(5));
        house.set_relation(other, DiplomaticState::Hostile, 12);
        assert_eq!(house.relation_with(other), DiplomaticState::Hostile);
        assert_eq!(house.diplomacy[&other].effective_since_turn, 12);
    }
}
