//! Colony: a planet under house ownership. 

use std::collections::VecDeque;

use bevy_ecs::component::Component;
use hexreach_contracts::{ColonyId, FacilityId, HouseId, ProjectId, SystemId};
use serde::{Deserialize, Serialize};

/// Drives productive output together with population.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlanetClass {
    Terran,
    Ocean,
    Desert,
    Tundra,
    Barren,
    GasGiantOutpost,
}

/// Ground defenses at a colony.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GroundForces {
    pub armies: u32,
    pub marines: u32,
    pub batteries: u32,
 /// 0 = no shield. At most one shield per colony ; can be
    /// rebuilt once destroyed only while `level == 0`.
    pub shield_level: u32,
}

/// A planet under house ownership at a system.
#[derive(Component, Debug, Clone, Serialize, Deserialize)]
pub struct Colony {
    pub owner: HouseId,
    pub system: SystemId,
    /// Population Units. 1 PU = a fixed soul count per config.
    pub pu: u32,
    pub resource_rating: u32,
    pub planet_class: PlanetClass,
    /// Infrastructure Units.
    pub iu: u32,
    pub tax_rate: f32,
    pub facilities: Vec<FacilityId>,
    pub ground: GroundForces,
    pub under_construction: Vec<ProjectId>,
    pub construction_queue: VecDeque<ProjectId>,
    pub repair_queue: VecDeque<FacilityId>,
    pub blockaded: bool,
    /// Unassigned squadrons waiting for fleet auto-assignment.
    pub unassigned_squadrons: Vec<hexreach_contracts::SquadronId>,
    /// Rolling 6-turn tax history for the rolling average.
    pub tax_history: VecDeque<f32>,
}

impl Colony {
    #[must_use]
    pub fn new(owner: HouseId, system: SystemId, planet_class: PlanetClass, resource_rating: u32) -> Self {
        Self {
            owner,
            system,
            pu: 1,
            resource_rating,
            planet_class,
            iu: 0,
            tax_rate: 0.25,
            facilities: Vec::new(),
            ground: GroundForces::default(),
            under_construction: Vec::new(),
            construction_queue: VecDeque::new(),
            repair_queue: VecDeque::new(),
            blockaded: false,
            unassigned_squadrons: Vec::new(),
            tax_history: VecDeque::new(),
        }
    }

    /// Silently discards every pending construction project — the
 /// behavior ("pending projects are
 /// discarded silently"). Returns the discarded ids for the caller to
    /// clean up in the project table; no event is emitted here.
    pub fn discard_projects_on_conquest(&mut self) -> Vec<ProjectId> {
        let mut discarded: Vec<ProjectId> = self.under_construction.drain(..).collect();
        discarded.extend(self.construction_queue.drain(..));
        discarded
    }

    /// Clears every pending construction project — the behavior on
 /// bombardment.
    /// Unlike conquest this is observable, so the caller emits the event
    /// with the returned count.
    pub fn clear_projects_on_bombardment(&mut self) -> u32 {
        let count = self.under_construction.len() + self.construction_queue.len();
        self.under_construction.clear();
        self.construction_queue.clear();
        count as u32
    }

    pub fn push_tax_sample(&mut self, sample: f32) {
        self.tax_history.push_back(sample);
        while self.tax_history.len() > 6 {
            self.tax_history.pop_front();
        }
    }

    #[must_use]
    pub fn rolling_tax_average(&self) -> f32 {
        if self.tax_history.is_empty() {
            return self.tax_rate;
        }
        self.tax_history.iter().sum::<f32>() / self.tax_history.len() as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy_ecs::entity::Entity;

    fn test_colony() -> Colony {
        Colony::new(
            HouseId(Entity::from_raw(0)),
            SystemId(Entity::from_raw(1)),
            PlanetClass::Terran,
            5,
        )
    }

    #[test]
    fn conquest_discards_projects_without_a_count() {
        let mut colony = test_colony();
        colony.under_construction.push(ProjectId(Entity::from_raw(2)));
        colony.construction_queue.push_back(ProjectId(Entity::from_raw(3)));
        let discarded = colony.discard_projects_on_conquest();
        assert_eq!(discarded.len(), 2);
        assert!(colony.under_construction.is_empty());
        assert!(colony.construction_queue.is_empty());
    }

    #[test]
    fn bombardment_clears_and_counts_projects() {
        let mut colony = test_colony();
        colony.under_construction.push(ProjectId(Entity::from_raw(2)));
        colony.construction_queue.push_back(ProjectId(Entity::from_raw(3)));
        colony.construction_queue.push_back(ProjectId(Entity::from_raw(4)));
        assert_eq!(colony.clear_projects_on_bombardment(), 3);
        assert!(colony.under_construction.is_empty());
        assert!(colony.construction_queue.is_empty());
    }

    #[test]
    fn rolling_tax_average_caps_at_six_samples() {
        let mut colony = test_colony();
        for i in 0..10 {
            colony.push_tax_sample(i as f32);
        }
        assert_eq!(colony.tax_history.len(), 6);
        // Last 6 of 0..10 are 4..10 -> average 6.5
        assert!((colony.rolling_tax_average() - 6.5).abs() < f32::EPSILON);
    }
}
