//! Ship and ground-unit class tables.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipClassConfig {
    pub name: String,
    pub attack_strength: u32,
    pub defense_strength: u32,
    pub command_cost: u32,
    pub carry_limit: u32,
    pub is_spacelift: bool,
    pub is_scout: bool,
    /// Fighter-squadron hulls build in the colony's own queue rather than a
 /// facility dock.
    pub is_fighter: bool,
    pub base_cost_pp: u32,
    pub base_maintenance_pp: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShipClassTable {
    pub classes: Vec<ShipClassConfig>,
}

impl ShipClassTable {
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ShipClassConfig> {
        self.classes.iter().find(|c| c.name == name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroundUnitConfig {
    pub name: String,
    pub attack_strength: u32,
    pub defense_strength: u32,
    pub base_cost_pp: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GroundUnitTable {
    pub units: Vec<GroundUnitConfig>,
}
