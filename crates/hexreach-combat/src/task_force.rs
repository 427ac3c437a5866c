//! A house's fighting contingent in a single combat.

use hexreach_contracts::{FacilityId, HouseId, SquadronId};
use hexreach_model::DiplomaticState;

/// One house's task force at a system where conflict exists. Built fresh
/// for each combat from the live `GameState`.
#[derive(Debug, Clone)]
pub struct TaskForce {
    pub house: HouseId,
 /// Insertion order matters for round ordering.
    pub squadrons: Vec<SquadronId>,
    pub facilities: Vec<FacilityId>,
    /// Base ROE 0-10, read from the fleet(s) contributing to this force.
    pub roe: u8,
    pub morale_modifier: i32,
    pub cloak: bool,
    pub defending_homeworld: bool,
    /// Espionage Level Infiltration / Cloak level, used for detection and
    /// ambush eligibility.
    pub eli: u32,
    pub clk: u32,
    /// Set once this task force has left combat (retreated, or reduced to
    /// zero combat-capable squadrons).
    pub retreated: bool,
    pub pre_detected: bool,
}

impl TaskForce {
    #[must_use]
    pub fn new(house: HouseId, roe: u8) -> Self {
        Self {
            house,
            squadrons: Vec::new(),
            facilities: Vec::new(),
            roe,
            morale_modifier: 0,
            cloak: false,
            defending_homeworld: false,
            eli: 0,
            clk: 0,
            retreated: false,
            pre_detected: false,
        }
    }

    /// Effective ROE, adjusted for morale/blockaded/homeworld defense.
    /// Defending a homeworld stiffens resolve; negative morale softens
    /// it. Clamped to the valid 0-10 range.
    #[must_use]
    pub fn effective_roe(&self) -> u8 {
        let mut roe = i32::from(self.roe) + self.morale_modifier;
        if self.defending_homeworld {
            roe += 2;
        }
        roe.clamp(0, 10) as u8
    }

    #[must_use]
    pub fn is_hostile_to(&self, other: DiplomaticState) -> bool {
        matches!(other, DiplomaticState::Hostile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy_ecs::entity::Entity;

    #[test]
    fn homeworld_defense_raises_effective_roe() {
        let mut tf = TaskForce::new(HouseId(Entity::from_raw(0)), 5);
        assert_eq!(tf.effective_roe(), 5);
        tf.defending_homeworld = true;
        assert_eq!(tf.effective_roe(), 7);
    }

    #[test]
    fn effective_roe_clamps_to_valid_range() {
        let mut tf = TaskForce::new(HouseId(Entity::from_raw(0)), 10);
        tf.defending_homeworld = true;
        assert_eq!(tf.effective_roe(), 10);
        tf.morale_modifier = -20;
        assert_eq!(tf.effective_roe(), 0);
    }
}
