//! Facility class tables.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacilityClassConfig {
    pub name: String,
    pub docks: u8,
    pub base_cost_pp: u32,
    /// Maintenance multiplier applied to `base_cost_pp` per turn, by class.
    pub maintenance_multiplier: f32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FacilityClassTable {
    pub spaceport: Option<FacilityClassConfig>,
    pub shipyard: Option<FacilityClassConfig>,
    pub drydock: Option<FacilityClassConfig>,
    pub starbase: Option<FacilityClassConfig>,
}
