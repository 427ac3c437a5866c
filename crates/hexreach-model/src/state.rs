//! `GameState`: owns every entity plus the secondary indices that make
//! house-scoped and system-scoped passes O(1) instead of a full scan.

use std::collections::HashMap;

use hexreach_contracts::{
    ColonyId, FacilityId, FleetId, HouseId, ProjectId, ScoutMissionId, ShipId, SquadronId, Store,
    SystemId,
};
use hexreach_map::StarMap;

use crate::colony::Colony;
use crate::facility::Facility;
use crate::fleet::Fleet;
use crate::house::House;
use crate::project::ConstructionProject;
use crate::ship::Ship;
use crate::squadron::Squadron;

/// The root game state: the entity store, the star map, and every
/// secondary index. The turn resolver takes this by
/// `&mut` and mutates it in place through the phase sequence rather than
/// cloning it — `Store` wraps a `bevy_ecs::World`, which isn't `Clone`.
#[derive(Debug)]
pub struct GameState {
    pub turn: u32,
    pub store: Store,
    pub star_map: StarMap,
    pub houses: Vec<HouseId>,

    pub fleets_by_system: HashMap<SystemId, Vec<FleetId>>,
    pub colonies_by_system: HashMap<SystemId, ColonyId>,
    pub squadrons_by_owner: HashMap<HouseId, Vec<SquadronId>>,
    pub ships_by_owner: HashMap<HouseId, Vec<ShipId>>,
    pub facilities_by_colony: HashMap<ColonyId, Vec<FacilityId>>,
    pub colonies_by_owner: HashMap<HouseId, Vec<ColonyId>>,
    pub fleets_by_owner: HashMap<HouseId, Vec<FleetId>>,
    pub projects_by_colony: HashMap<ColonyId, Vec<ProjectId>>,
    /// Spy-scout missions in flight, keyed by the launching house. The
    /// mission component itself (travel state, path, target) is owned by
    /// `hexreach-intel`, which is free to spawn/despawn it on the store
    /// directly and reconcile this index — mirroring every other
 /// entity kind's by-owner index.
    pub scout_missions_by_owner: HashMap<HouseId, Vec<ScoutMissionId>>,
}

impl GameState {
    #[must_use]
    pub fn new(store: Store, star_map: StarMap) -> Self {
        Self {
            turn: 0,
            store,
            star_map,
            houses: Vec::new(),
            fleets_by_system: HashMap::new(),
            colonies_by_system: HashMap::new(),
            squadrons_by_owner: HashMap::new(),
            ships_by_owner: HashMap::new(),
            facilities_by_colony: HashMap::new(),
            colonies_by_owner: HashMap::new(),
            fleets_by_owner: HashMap::new(),
            projects_by_colony: HashMap::new(),
            scout_missions_by_owner: HashMap::new(),
        }
    }

    // -- House -------------------------------------------------------------

    pub fn spawn_house(&mut self, house: House) -> HouseId {
        let id = HouseId(self.store.spawn(house));
        self.houses.push(id);
        id
    }

    // -- Colony --------------------------------------------------------------

    pub fn spawn_colony(&mut self, colony: Colony) -> ColonyId {
        let system = colony.system;
        let owner = colony.owner;
        let id = ColonyId(self.store.spawn(colony));
        self.colonies_by_system.insert(system, id);
        self.colonies_by_owner.entry(owner).or_default().push(id);
        id
    }

    /// Scoped-acquisition mutation for a colony's owner: reconciles
    /// `colonies_by_owner` before returning, matching the Store pattern
 /// described in 
    pub fn with_colony_mut<R>(&mut self, id: ColonyId, f: impl FnOnce(&mut Colony) -> R) -> Option<R> {
        let before_owner = self.store.get::<Colony>(id.0)?.owner;
        let result = {
            let mut colony = self.store.get_mut::<Colony>(id.0)?;
            f(&mut colony)
        };
        let after_owner = self.store.get::<Colony>(id.0)?.owner;
        if before_owner != after_owner {
            if let Some(list) = self.colonies_by_owner.get_mut(&before_owner) {
                list.retain(|c| *c != id);
            }
            self.colonies_by_owner.entry(after_owner).or_default().push(id);
        }
        Some(result)
    }

    // -- Fleet ---------------------------------------------------------------

    pub fn spawn_fleet(&mut self, fleet: Fleet) -> FleetId {
        let system = fleet.system;
        let owner = fleet.owner;
        let id = FleetId(self.store.spawn(fleet));
        self.fleets_by_system.entry(system).or_default().push(id);
        self.fleets_by_owner.entry(owner).or_default().push(id);
        id
    }

    /// Scoped-acquisition mutation for a fleet's system (movement is the
    /// primary caller): reconciles `fleets_by_system` before returning.
    pub fn with_fleet_mut<R>(&mut self, id: FleetId, f: impl FnOnce(&mut Fleet) -> R) -> Option<R> {
        let before_system = self.store.get::<Fleet>(id.0)?.system;
        let result = {
            let mut fleet = self.store.get_mut::<Fleet>(id.0)?;
            f(&mut fleet)
        };
        let after_system = self.store.get::<Fleet>(id.0)?.system;
        if before_system != after_system {
            if let Some(list) = self.fleets_by_system.get_mut(&before_system) {
                list.retain(|fl| *fl != id);
            }
            self.fleets_by_system.entry(after_system).or_default().push(id);
        }
        Some(result)
    }

    pub fn despawn_fleet(&mut self, id: FleetId) {
        if let Some(fleet) = self.store.get::<Fleet>(id.0) {
            let system = fleet.system;
            let owner = fleet.owner;
            if let Some(list) = self.fleets_by_system.get_mut(&system) {
                list.retain(|fl| *fl != id);
            }
            if let Some(list) = self.fleets_by_owner.get_mut(&owner) {
                list.retain(|fl| *fl != id);
            }
        }
        self.store.despawn(id.0);
    }

    // -- Squadron / Ship -------------------------------------------------------

    pub fn spawn_squadron(&mut self, owner: HouseId, squadron: Squadron) -> SquadronId {
        let id = SquadronId(self.store.spawn(squadron));
        self.squadrons_by_owner.entry(owner).or_default().push(id);
        id
    }

    pub fn despawn_squadron(&mut self, owner: HouseId, id: SquadronId) {
        if let Some(list) = self.squadrons_by_owner.get_mut(&owner) {
            list.retain(|s| *s != id);
        }
        self.store.despawn(id.0);
    }

    pub fn spawn_ship(&mut self, owner: HouseId, ship: Ship) -> ShipId {
        let id = ShipId(self.store.spawn(ship));
        self.ships_by_owner.entry(owner).or_default().push(id);
        id
    }

    pub fn despawn_ship(&mut self, owner: HouseId, id: ShipId) {
        if let Some(list) = self.ships_by_owner.get_mut(&owner) {
            list.retain(|s| *s != id);
        }
        self.store.despawn(id.0);
    }

    // -- Facility / Project ---------------------------------------------------

    pub fn spawn_facility(&mut self, colony: ColonyId, facility: Facility) -> FacilityId {
        let id = FacilityId(self.store.spawn(facility));
        self.facilities_by_colony.entry(colony).or_default().push(id);
        id
    }

    pub fn despawn_facility(&mut self, colony: ColonyId, id: FacilityId) {
        if let Some(list) = self.facilities_by_colony.get_mut(&colony) {
            list.retain(|f| *f != id);
        }
        self.store.despawn(id.0);
    }

    pub fn spawn_project(&mut self, colony: ColonyId, project: ConstructionProject) -> ProjectId {
        let id = ProjectId(self.store.spawn(project));
        self.projects_by_colony.entry(colony).or_default().push(id);
        id
    }

    pub fn despawn_project(&mut self, colony: ColonyId, id: ProjectId) {
        if let Some(list) = self.projects_by_colony.get_mut(&colony) {
            list.retain(|p| *p != id);
        }
        self.store.despawn(id.0);
    }

    // -- Scout mission ---------------------------------------------------------

    /// Spawns any `bevy_ecs`-component mission payload and records it under
    /// `owner` in `scout_missions_by_owner`. Generic because the mission
    /// component type itself lives in `hexreach-intel`, which depends on
    /// this crate rather than the reverse.
    pub fn spawn_scout_mission<B: bevy_ecs::bundle::Bundle>(&mut self, owner: HouseId, mission: B) -> ScoutMissionId {
        let id = ScoutMissionId(self.store.spawn(mission));
        self.scout_missions_by_owner.entry(owner).or_default().push(id);
        id
    }

    pub fn despawn_scout_mission(&mut self, owner: HouseId, id: ScoutMissionId) {
        if let Some(list) = self.scout_missions_by_owner.get_mut(&owner) {
            list.retain(|m| *m != id);
        }
        self.store.despawn(id.0);
    }

 /// Index-integrity check: every
    /// secondary index entry must resolve back to a live entity whose
    /// primary-storage field agrees with the index key.
    #[must_use]
    pub fn check_index_integrity(&self) -> bool {
        self.fleets_by_system.iter().all(|(system, fleets)| {
            fleets.iter().all(|f| {
                self.store
                    .get::<Fleet>(f.0)
                    .is_some_and(|fleet| fleet.system == *system)
            })
        }) && self.colonies_by_owner.iter().all(|(owner, colonies)| {
            colonies.iter().all(|c| {
                self.store
                    .get::<Colony>(c.0)
                    .is_some_and(|colony| colony.owner == *owner)
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexreach_map::generate;

    fn state() -> (GameState, HouseId) {
        let mut store = Store::new();
        let star_map = generate(&mut store, 1, 1, 1);
        let mut state = GameState::new(store, star_map);
        let house = state.spawn_house(House::new("Atreides"));
        (state, house)
    }

    #[test]
    fn fleet_move_reconciles_system_index() {
        let (mut state, house) = state();
        let hub = state.star_map.hub;
        let other = state.star_map.systems[1];
        let fleet = state.spawn_fleet(Fleet::new(house, hub));
        assert!(state.fleets_by_system[&hub].contains(&fleet));

        state.with_fleet_mut(fleet, |f| f.system = other);
        assert!(!state.fleets_by_system[&hub].contains(&fleet));
        assert!(state.fleets_by_system[&other].contains(&fleet));
        assert!(state.check_index_integrity());
    }

    #[test]
    fn colony_owner_change_reconciles_owner_index() {
        let (mut state, house_a) = state();
        let house_b = state.spawn_house(House::new("Harkonnen"));
        let hub = state.star_map.hub;
        let colony = state.spawn_colony(Colony::new(
            house_a,
            hub,
            crate::colony::PlanetClass::Terran,
            5,
        ));
        assert!(state.colonies_by_owner[&house_a].contains(&colony));

        state.with_colony_mut(colony, |c| c.owner = house_b);
        assert!(!state.colonies_by_owner[&house_a].contains(&colony));
        assert!(state.colonies_by_owner[&house_b].contains(&colony));
        assert!(state.check_index_integrity());
    }

    #[test]
    fn despawn_fleet_removes_from_both_indices() {
        let (mut state, house) = state();
        let hub = state.star_map.hub;
        let fleet = state.spawn_fleet(Fleet::new(house, hub));
        state.despawn_fleet(fleet);
        assert!(!state.fleets_by_system[&hub].contains(&fleet));
        assert!(!state.store.contains(fleet.0));
    }
}
