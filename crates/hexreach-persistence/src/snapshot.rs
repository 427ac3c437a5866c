//! Captures a `GameState` into a flat, serializable snapshot and restores
//! one back into a live `GameState`, reallocating every entity through a
//! fresh `Store` and rewriting every embedded id via [`crate::remap`].

use std::collections::HashMap;

use bevy_ecs::entity::Entity;
use hexreach_contracts::{
    ColonyId, FacilityId, FleetId, HouseId, ProjectId, ScoutMissionId, ShipId, SquadronId, Store,
    SystemId,
};
use hexreach_intel::ScoutMission;
use hexreach_map::{StarMap, SystemNode};
use hexreach_model::{Colony, ConstructionProject, Facility, Fleet, GameState, House, Ship, Squadron};
use serde::{Deserialize, Serialize};

use crate::remap::{EntityTable, Remap};

/// A flat, ordering-stable capture of everything a `GameState` owns.
/// `squadrons` and `ships` carry their owning house explicitly because
/// neither `Squadron` nor `Ship` stores an owner field of its own — that
/// ownership lives only in `GameState::squadrons_by_owner` /
/// `ships_by_owner`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    pub turn: u32,
    pub master_seed: u64,
    pub star_map: StarMap,
    pub systems: Vec<(Entity, SystemNode)>,
    pub houses: Vec<(Entity, House)>,
    pub colonies: Vec<(Entity, Colony)>,
    pub fleets: Vec<(Entity, Fleet)>,
    pub squadrons: Vec<(Entity, HouseId, Squadron)>,
    pub ships: Vec<(Entity, HouseId, Ship)>,
    pub facilities: Vec<(Entity, Facility)>,
    pub projects: Vec<(Entity, ConstructionProject)>,
    pub scout_missions: Vec<(Entity, HouseId, ScoutMission)>,
}

/// Walks every index `GameState` already maintains to gather its entities.
/// `master_seed` isn't stored on `GameState` itself — the turn resolver
/// takes it as a parameter each call — so the caller supplies
/// it here and gets it back from [`restore`].
#[must_use]
pub fn capture(state: &GameState, master_seed: u64) -> GameStateSnapshot {
    let mut systems = Vec::new();
    for &id in &state.star_map.systems {
        if let Some(node) = state.store.get::<SystemNode>(id.0) {
            systems.push((id.0, node.clone()));
        }
    }

    let mut houses = Vec::new();
    for &id in &state.houses {
        if let Some(house) = state.store.get::<House>(id.0) {
            houses.push((id.0, house.clone()));
        }
    }

    let mut colonies = Vec::new();
    for ids in state.colonies_by_owner.values() {
        for &id in ids {
            if let Some(colony) = state.store.get::<Colony>(id.0) {
                colonies.push((id.0, colony.clone()));
            }
        }
    }

    let mut fleets = Vec::new();
    for ids in state.fleets_by_owner.values() {
        for &id in ids {
            if let Some(fleet) = state.store.get::<Fleet>(id.0) {
                fleets.push((id.0, fleet.clone()));
            }
        }
    }

    let mut squadrons = Vec::new();
    for (&owner, ids) in &state.squadrons_by_owner {
        for &id in ids {
            if let Some(squadron) = state.store.get::<Squadron>(id.0) {
                squadrons.push((id.0, owner, squadron.clone()));
            }
        }
    }

    let mut ships = Vec::new();
    for (&owner, ids) in &state.ships_by_owner {
        for &id in ids {
            if let Some(ship) = state.store.get::<Ship>(id.0) {
                ships.push((id.0, owner, ship.clone()));
            }
        }
    }

    let mut facilities = Vec::new();
    for ids in state.facilities_by_colony.values() {
        for &id in ids {
            if let Some(facility) = state.store.get::<Facility>(id.0) {
                facilities.push((id.0, facility.clone()));
            }
        }
    }

    let mut projects = Vec::new();
    for ids in state.projects_by_colony.values() {
        for &id in ids {
            if let Some(project) = state.store.get::<ConstructionProject>(id.0) {
                projects.push((id.0, project.clone()));
            }
        }
    }

    let mut scout_missions = Vec::new();
    for (&owner, ids) in &state.scout_missions_by_owner {
        for &id in ids {
            if let Some(mission) = state.store.get::<ScoutMission>(id.0) {
                scout_missions.push((id.0, owner, mission.clone()));
            }
        }
    }

    GameStateSnapshot {
        turn: state.turn,
        master_seed,
        star_map: state.star_map.clone(),
        systems,
        houses,
        colonies,
        fleets,
        squadrons,
        ships,
        facilities,
        projects,
        scout_missions,
    }
}

fn allocate<T>(store: &mut Store, table: &mut EntityTable, items: &[(Entity, T)]) {
    for (old, _) in items {
        let new = store.world_mut().spawn_empty().id();
        table.insert(*old, new);
    }
}

fn allocate_owned<T>(store: &mut Store, table: &mut EntityTable, items: &[(Entity, HouseId, T)]) {
    for (old, _, _) in items {
        let new = store.world_mut().spawn_empty().id();
        table.insert(*old, new);
    }
}

fn insert_all<T: Remap + bevy_ecs::component::Component>(
    store: &mut Store,
    table: &EntityTable,
    items: Vec<(Entity, T)>,
) {
    for (old, mut component) in items {
        component.remap(table);
        let new = table[&old];
        store.world_mut().entity_mut(new).insert(component);
    }
}

fn insert_all_owned<T: Remap + bevy_ecs::component::Component>(
    store: &mut Store,
    table: &EntityTable,
    items: Vec<(Entity, HouseId, T)>,
) {
    for (old, _, mut component) in items {
        component.remap(table);
        let new = table[&old];
        store.world_mut().entity_mut(new).insert(component);
    }
}

/// Rebuilds a `GameState` from `snapshot`, allocating a fresh `Store` and
/// rewriting every embedded id through a freshly-built `EntityTable`.
/// Returns the restored state alongside the master seed the caller passed
/// to [`capture`], since `GameState` doesn't carry it itself.
#[must_use]
pub fn restore(snapshot: GameStateSnapshot) -> (GameState, u64) {
    let GameStateSnapshot {
        turn,
        master_seed,
        star_map,
        systems,
        houses,
        colonies,
        fleets,
        squadrons,
        ships,
        facilities,
        projects,
        scout_missions,
    } = snapshot;

    let mut store = Store::new();
    let mut table: EntityTable = HashMap::new();

    allocate(&mut store, &mut table, &systems);
    allocate(&mut store, &mut table, &houses);
    allocate(&mut store, &mut table, &colonies);
    allocate(&mut store, &mut table, &fleets);
    allocate_owned(&mut store, &mut table, &squadrons);
    allocate_owned(&mut store, &mut table, &ships);
    allocate(&mut store, &mut table, &facilities);
    allocate(&mut store, &mut table, &projects);
    allocate_owned(&mut store, &mut table, &scout_missions);

    let system_table: HashMap<SystemId, SystemId> = systems
        .iter()
        .map(|(old, _)| (SystemId(*old), SystemId(table[old])))
        .collect();
    let mut star_map = star_map;
    star_map.remap_ids(&system_table);

    // Remember each category's new ids (in snapshot order) before the
    // components are moved into `insert_all`, so the index-rebuild pass
    // below doesn't need to re-derive them from `table` a second time.
    let house_ids: Vec<HouseId> = houses.iter().map(|(old, _)| HouseId(table[old])).collect();
    let colony_ids: Vec<ColonyId> = colonies.iter().map(|(old, _)| ColonyId(table[old])).collect();
    let fleet_ids: Vec<FleetId> = fleets.iter().map(|(old, _)| FleetId(table[old])).collect();
    let squadron_ids: Vec<(HouseId, SquadronId)> = squadrons
        .iter()
        .map(|(old, owner, _)| (remap_house_owner(&table, *owner), SquadronId(table[old])))
        .collect();
    let ship_ids: Vec<(HouseId, ShipId)> = ships
        .iter()
        .map(|(old, owner, _)| (remap_house_owner(&table, *owner), ShipId(table[old])))
        .collect();
    let facility_ids: Vec<FacilityId> = facilities.iter().map(|(old, _)| FacilityId(table[old])).collect();
    let project_ids: Vec<ProjectId> = projects.iter().map(|(old, _)| ProjectId(table[old])).collect();
    let scout_mission_ids: Vec<(HouseId, ScoutMissionId)> = scout_missions
        .iter()
        .map(|(old, owner, _)| (remap_house_owner(&table, *owner), ScoutMissionId(table[old])))
        .collect();

    insert_all(&mut store, &table, systems);
    insert_all(&mut store, &table, houses);
    insert_all(&mut store, &table, colonies);
    insert_all(&mut store, &table, fleets);
    insert_all_owned(&mut store, &table, squadrons);
    insert_all_owned(&mut store, &table, ships);
    insert_all(&mut store, &table, facilities);
    insert_all(&mut store, &table, projects);
    insert_all_owned(&mut store, &table, scout_missions);

    let mut state = GameState::new(store, star_map);
    state.turn = turn;
    state.houses = house_ids;

    for id in colony_ids {
        if let Some(colony) = state.store.get::<Colony>(id.0) {
            let system = colony.system;
            let owner = colony.owner;
            state.colonies_by_system.insert(system, id);
            state.colonies_by_owner.entry(owner).or_default().push(id);
        }
    }
    for id in fleet_ids {
        if let Some(fleet) = state.store.get::<Fleet>(id.0) {
            let system = fleet.system;
            let owner = fleet.owner;
            state.fleets_by_system.entry(system).or_default().push(id);
            state.fleets_by_owner.entry(owner).or_default().push(id);
        }
    }
    for (owner, id) in squadron_ids {
        state.squadrons_by_owner.entry(owner).or_default().push(id);
    }
    for (owner, id) in ship_ids {
        state.ships_by_owner.entry(owner).or_default().push(id);
    }
    for id in facility_ids {
        if let Some(facility) = state.store.get::<Facility>(id.0) {
            state.facilities_by_colony.entry(facility.colony).or_default().push(id);
        }
    }
    for id in project_ids {
        if let Some(project) = state.store.get::<ConstructionProject>(id.0) {
            state.projects_by_colony.entry(project.colony).or_default().push(id);
        }
    }
    for (owner, id) in scout_mission_ids {
        state.scout_missions_by_owner.entry(owner).or_default().push(id);
    }

    (state, master_seed)
}

fn remap_house_owner(table: &EntityTable, owner: HouseId) -> HouseId {
    HouseId(table.get(&owner.0).copied().unwrap_or(owner.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexreach_map::generate;
    use hexreach_model::colony::PlanetClass;

    fn populated_state() -> GameState {
        let mut store = Store::new();
        let star_map = generate(&mut store, 1, 1, 1);
        let mut state = GameState::new(store, star_map);
        let house = state.spawn_house(House::new("Atreides"));
        let hub = state.star_map.hub;
        let colony = state.spawn_colony(Colony::new(house, hub, PlanetClass::Terran, 5));
        state.with_colony_mut(colony, |c| c.pu = 10);
        state.spawn_fleet(Fleet::new(house, hub));
        state.turn = 3;
        state
    }

    #[test]
    fn capture_then_restore_round_trips_turn_and_houses() {
        let state = populated_state();
        let snapshot = capture(&state, 0xDEAD_BEEF);
        let (restored, seed) = restore(snapshot);
        assert_eq!(seed, 0xDEAD_BEEF);
        assert_eq!(restored.turn, 3);
        assert_eq!(restored.houses.len(), 1);
    }

    #[test]
    fn restore_remaps_colony_owner_and_system_to_new_entities() {
        let state = populated_state();
        let old_house = state.houses[0];
        let snapshot = capture(&state, 1);
        let (restored, _) = restore(snapshot);

        let new_house = restored.houses[0];
        assert_ne!(new_house.entity(), old_house.entity());

        let colony_ids = &restored.colonies_by_owner[&new_house];
        assert_eq!(colony_ids.len(), 1);
        let colony = restored.store.get::<Colony>(colony_ids[0].0).unwrap();
        assert_eq!(colony.owner, new_house);
        assert_eq!(colony.pu, 10);
        assert!(restored.check_index_integrity());
    }

    #[test]
    fn restore_rejects_no_leftover_references_to_old_entities() {
        let state = populated_state();
        let snapshot = capture(&state, 1);
        let (restored, _) = restore(snapshot);
        for &house in &restored.houses {
            assert!(restored.store.contains(house.0));
        }
    }
}
