//! Game setup: starting resources/tech/fleet/facilities and home-system
//! naming.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartingFleetEntry {
    pub ship_class: String,
    pub count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSetup {
    pub starting_treasury: i64,
    pub starting_pu: u32,
    pub starting_iu: u32,
    pub starting_economic_level: u32,
    pub starting_science_level: u32,
    pub starting_fleet: Vec<StartingFleetEntry>,
    pub starting_facilities: Vec<String>,
    pub home_name_pool: Vec<String>,
    pub ring_count: u32,
    /// Turn numbers on which the bi-annual tech advancement cycle runs.
    pub tech_advancement_turns: Vec<u32>,
    pub master_seed: u64,
}

impl Default for GameSetup {
    fn default() -> Self {
        Self {
            starting_treasury: 500,
            starting_pu: 10,
            starting_iu: 5,
            starting_economic_level: 1,
            starting_science_level: 1,
            starting_fleet: vec![StartingFleetEntry {
                ship_class: "Frigate".into(),
                count: 3,
            }],
            starting_facilities: vec!["Spaceport".into()],
            home_name_pool: vec!["Homeworld".into()],
            ring_count: 4,
            tech_advancement_turns: (2..=200).step_by(2).collect(),
            master_seed: 1,
        }
    }
}

impl GameSetup {
    #[must_use]
    pub fn is_tech_advancement_turn(&self, turn: u32) -> bool {
        self.tech_advancement_turns.contains(&turn)
    }
}
