//! ConstructionProject: tagged build record.

use bevy_ecs::component::Component;
use hexreach_contracts::{ColonyId, FacilityId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ProjectKind {
    Ship { class_name: String },
    Building { facility: NewFacilityKind },
    IndustrialExpansion { iu_delta: u32 },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum NewFacilityKind {
    Spaceport,
    Shipyard,
    Drydock,
    Starbase,
}

/// Where a project is anchored — a facility dock (capital ships) or the
/// colony's own queue (buildings, fighters, IU — ).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum ProjectAnchor {
    Facility(FacilityId),
    Colony(ColonyId),
}

#[derive(Component, Debug, Clone, Serialize, Deserialize)]
pub struct ConstructionProject {
    pub kind: ProjectKind,
    pub owner: hexreach_contracts::HouseId,
    pub colony: ColonyId,
    pub anchor: ProjectAnchor,
    pub cost_total: u32,
    pub pp_committed: u32,
    pub turns_remaining: u32,
}

impl ConstructionProject {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.pp_committed >= self.cost_total && self.turns_remaining == 0
    }

    /// Advance the project by one maintenance tick, committing up to
    /// `available_pp` production points. Returns the amount actually
    /// spent.
    pub fn advance(&mut self, available_pp: u32) -> u32 {
        if self.turns_remaining > 0 {
            self.turns_remaining -= 1;
        }
        let remaining_cost = self.cost_total.saturating_sub(self.pp_committed);
        let spend = available_pp.min(remaining_cost);
        self.pp_committed += spend;
        spend
    }
}
