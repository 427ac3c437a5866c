//! Squadron: a tactical group with a flagship and subordinates. See
//! "Squadron".

use bevy_ecs::component::Component;
use hexreach_contracts::{FleetId, ShipId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SquadronType {
    Combat,
    Intel,
    Auxiliary,
    Expansion,
    Fighter,
}

#[derive(Component, Debug, Clone, Serialize, Deserialize)]
pub struct Squadron {
    pub fleet: FleetId,
    pub squadron_type: SquadronType,
    pub flagship: ShipId,
    pub subordinates: Vec<ShipId>,
    /// Embarked fighter squadrons (by id; a fighter squadron itself).
    pub embarked_fighters: Vec<hexreach_contracts::SquadronId>,
}

impl Squadron {
    #[must_use]
    pub fn new(fleet: FleetId, squadron_type: SquadronType, flagship: ShipId) -> Self {
        Self {
            fleet,
            squadron_type,
            flagship,
            subordinates: Vec::new(),
            embarked_fighters: Vec::new(),
        }
    }

    #[must_use]
    pub fn ship_count(&self) -> usize {
        1 + self.subordinates.len()
    }

    /// Scout squadrons must be single-ship to execute spy missions.
    #[must_use]
    pub fn is_single_ship(&self) -> bool {
        self.subordinates.is_empty()
    }
}
