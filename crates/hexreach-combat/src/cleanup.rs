//! Post-combat cleanup. Runs after the combat state machine
//! resolves, system-scoped so cost stays O(entities_in_system):
//!
//! 1. Remove ships marked `Destroyed` from fleets.
//! 2. Remove fleets left empty.
//! 3. Clear construction/repair queues on `Crippled` neorias (lost, not
//!    paused — `Facility::lose_queues_on_cripple`).
//! 4. Remove `Destroyed` neorias; cancel their projects.
//! 5. Remove `Destroyed` kastras.
//! 6. Remove `Destroyed` ground units.
//!
//! Order matters: ships before fleets; facilities independent of ships/
//! fleets.

use hexreach_contracts::{EventKind, EventLog, EventPhase, FleetId, SystemId};
use hexreach_model::{Facility, FacilityKind, Fleet, GameState, Ship, ShipCombatState, Squadron};

/// Drops destroyed ships from a squadron's roster. A squadron whose
/// flagship was destroyed promotes the first surviving subordinate to
/// flagship; a squadron with no survivors is reported empty so the caller
/// can despawn it.
fn purge_destroyed_ships(state: &mut GameState, owner: hexreach_contracts::HouseId, squadron: hexreach_contracts::SquadronId) -> bool {
    let Some(sq) = state.store.get::<Squadron>(squadron.0) else {
        return true;
    };
    let flagship_destroyed = state
        .store
        .get::<Ship>(sq.flagship.0)
        .is_none_or(|s| s.state == ShipCombatState::Destroyed);
    let mut surviving_subordinates: Vec<_> = sq
        .subordinates
        .iter()
        .copied()
        .filter(|id| {
            state
                .store
                .get::<Ship>(id.0)
                .is_some_and(|s| s.state != ShipCombatState::Destroyed)
        })
        .collect();

    let destroyed: Vec<_> = {
        let sq = state.store.get::<Squadron>(squadron.0).expect("checked above");
        let mut destroyed = Vec::new();
        if flagship_destroyed {
            destroyed.push(sq.flagship);
        }
        destroyed.extend(
            sq.subordinates
                .iter()
                .copied()
                .filter(|id| !surviving_subordinates.contains(id)),
        );
        destroyed
    };
    for ship_id in destroyed {
        state.despawn_ship(owner, ship_id);
    }

    if flagship_destroyed {
        if surviving_subordinates.is_empty() {
            return true; // nothing left — caller despawns the squadron
        }
        let new_flagship = surviving_subordinates.remove(0);
        if let Some(mut sq) = state.store.get_mut::<Squadron>(squadron.0) {
            sq.flagship = new_flagship;
            sq.subordinates = surviving_subordinates;
        }
    } else if let Some(mut sq) = state.store.get_mut::<Squadron>(squadron.0) {
        sq.subordinates = surviving_subordinates;
    }
    false
}

fn cleanup_fleet(state: &mut GameState, owner: hexreach_contracts::HouseId, fleet_id: FleetId) {
    let Some(fleet) = state.store.get::<Fleet>(fleet_id.0) else {
        return;
    };
    let squadrons = fleet.squadrons.clone();
    let mut emptied = Vec::new();
    for squadron in squadrons {
        if purge_destroyed_ships(state, owner, squadron) {
            emptied.push(squadron);
        }
    }
    if !emptied.is_empty() {
        state.with_fleet_mut(fleet_id, |f| {
            f.squadrons.retain(|s| !emptied.contains(s));
        });
        for squadron in emptied {
            state.despawn_squadron(owner, squadron);
        }
    }
}

fn cleanup_facilities(state: &mut GameState, system: SystemId, events: &mut EventLog) {
    let Some(colony_id) = state.colonies_by_system.get(&system).copied() else {
        return;
    };
    let Some(facility_ids) = state.facilities_by_colony.get(&colony_id).cloned() else {
        return;
    };
    let Some(owner) = state.store.get::<hexreach_model::Colony>(colony_id.0).map(|c| c.owner) else {
        return;
    };

    for facility_id in facility_ids {
        let Some(facility) = state.store.get::<Facility>(facility_id.0) else {
            continue;
        };
        if facility.is_crippled() {
            if let FacilityKind::Neoria(_) = facility.kind {
                let dropped = state
                    .store
                    .get_mut::<Facility>(facility_id.0)
                    .map(|mut f| f.lose_queues_on_cripple())
                    .unwrap_or_default();
                for project in &dropped {
                    state.despawn_project(colony_id, *project);
                }
                if !dropped.is_empty() {
                    events.push(
                        vec![owner],
                        Some(system),
                        Some(colony_id),
                        None,
                        EventKind::ProjectsLost {
                            count: dropped.len() as u32,
                        },
                    );
                }
            }
            continue;
        }
        if facility.is_destroyed() {
            if let FacilityKind::Neoria(n) = &facility.kind {
                let mut cancelled = n.active_constructions.clone();
                cancelled.extend(n.construction_queue.iter().copied());
                for project in &cancelled {
                    state.despawn_project(colony_id, *project);
                }
            }
            state.despawn_facility(colony_id, facility_id);
        }
    }
}

fn cleanup_ground_forces(state: &mut GameState, system: SystemId) {
    let Some(colony_id) = state.colonies_by_system.get(&system).copied() else {
        return;
    };
    state.with_colony_mut(colony_id, |colony| {
        // Ground units have no independent entity in this model (tracked
        // as plain counters on `GroundForces`); "removing destroyed ground
        // units" means zeroing whatever combat marked as lost. Combat
        // itself is responsible for decrementing `armies`/`marines`
        // counts as casualties occur, so this is a defensive floor rather
        // than an active removal.
        colony.ground.armies = colony.ground.armies.max(0);
        colony.ground.marines = colony.ground.marines.max(0);
    });
}

/// Runs the full cleanup sequence for one system. Called
/// unconditionally at the end of `resolve_combat`, even when no combat
/// actually occurred, so destroyed-but-unswept entities from a prior turn
/// never linger past a phase boundary.
pub fn cleanup_system(state: &mut GameState, system: SystemId, events: &mut EventLog) {
    let fleet_ids = state.fleets_by_system.get(&system).cloned().unwrap_or_default();
    for fleet_id in fleet_ids {
        let Some(owner) = state.store.get::<Fleet>(fleet_id.0).map(|f| f.owner) else {
            continue;
        };
        cleanup_fleet(state, owner, fleet_id);
    }
    let empty_fleets: Vec<_> = state
        .fleets_by_system
        .get(&system)
        .cloned()
        .unwrap_or_default()
        .into_iter()
        .filter(|&id| state.store.get::<Fleet>(id.0).is_some_and(Fleet::is_empty))
        .collect();
    for fleet_id in empty_fleets {
        state.despawn_fleet(fleet_id);
    }

    cleanup_facilities(state, system, events);
    cleanup_ground_forces(state, system);
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexreach_contracts::{EventPhase, Store};
    use hexreach_map::generate;
    use hexreach_model::{House, PlanetClass, ShipStats, SpecialCapability, SquadronType};

    fn ship(state: &mut GameState, owner: hexreach_contracts::HouseId, destroyed: bool) -> hexreach_contracts::ShipId {
        state.spawn_ship(
            owner,
            Ship {
                class_name: "Frigate".into(),
                tech_level: 1,
                state: if destroyed {
                    ShipCombatState::Destroyed
                } else {
                    ShipCombatState::Undamaged
                },
                stats: ShipStats {
                    attack_strength: 4,
                    defense_strength: 3,
                    command_cost: 1,
                    carry_limit: 0,
                    special: SpecialCapability::None,
                },
                cargo_pu: 0,
            },
        )
    }

    #[test]
    fn destroyed_flagship_is_purged_and_subordinate_promoted() {
        let mut store = Store::new();
        let star_map = generate(&mut store, 1, 1, 1);
        let mut state = GameState::new(store, star_map);
        let hub = state.star_map.hub;
        let house = state.spawn_house(House::new("A"));

        let flagship = ship(&mut state, house, true);
        let survivor = ship(&mut state, house, false);
        let mut sq = Squadron::new(hexreach_contracts::FleetId(hub.0), SquadronType::Combat, flagship);
        sq.subordinates.push(survivor);
        let squadron_id = state.spawn_squadron(house, sq);
        let mut fleet = Fleet::new(house, hub);
        fleet.squadrons.push(squadron_id);
        let fleet_id = state.spawn_fleet(fleet);
        state.with_fleet_mut(fleet_id, |f| f.squadrons = vec![squadron_id]);

        let mut events = EventLog::new();
        events.begin_phase(EventPhase::Conflict);
        cleanup_system(&mut state, hub, &mut events);

        assert!(!state.store.contains(flagship.0));
        assert!(state.store.contains(survivor.0));
        let updated = state.store.get::<Squadron>(squadron_id.0).unwrap();
        assert_eq!(updated.flagship, survivor);
        assert!(updated.subordinates.is_empty());
    }

    #[test]
    fn fully_destroyed_squadron_empties_and_despawns_fleet() {
        let mut store = Store::new();
        let star_map = generate(&mut store, 1, 1, 2);
        let mut state = GameState::new(store, star_map);
        let hub = state.star_map.hub;
        let house = state.spawn_house(House::new("A"));

        let flagship = ship(&mut state, house, true);
        let sq = Squadron::new(hexreach_contracts::FleetId(hub.0), SquadronType::Combat, flagship);
        let squadron_id = state.spawn_squadron(house, sq);
        let mut fleet = Fleet::new(house, hub);
        fleet.squadrons.push(squadron_id);
        let fleet_id = state.spawn_fleet(fleet);
        state.with_fleet_mut(fleet_id, |f| f.squadrons = vec![squadron_id]);

        let mut events = EventLog::new();
        events.begin_phase(EventPhase::Conflict);
        cleanup_system(&mut state, hub, &mut events);

        assert!(!state.store.contains(squadron_id.0));
        assert!(!state.store.contains(fleet_id.0));
    }

    #[test]
    fn crippled_neoria_loses_queue_and_emits_projects_lost() {
        let mut store = Store::new();
        let star_map = generate(&mut store, 1, 1, 3);
        let mut state = GameState::new(store, star_map);
        let hub = state.star_map.hub;
        let house = state.spawn_house(House::new("A"));
        let colony = state.spawn_colony(hexreach_model::Colony::new(house, hub, PlanetClass::Terran, 5));
        let project = state.spawn_project(
            colony,
            hexreach_model::ConstructionProject {
                kind: hexreach_model::ProjectKind::IndustrialExpansion { iu_delta: 1 },
                owner: house,
                colony,
                anchor: hexreach_model::ProjectAnchor::Colony(colony),
                cost_total: 10,
                pp_committed: 0,
                turns_remaining: 2,
            },
        );
        let facility = state.spawn_facility(
            colony,
            Facility {
                colony,
                kind: FacilityKind::Neoria(hexreach_model::Neoria {
                    kind: hexreach_model::NeoriaKind::Shipyard,
                    docks: 1,
                    active_constructions: vec![project],
                    construction_queue: Default::default(),
                    repairs: Default::default(),
                    state: ShipCombatState::Crippled,
                }),
            },
        );
        state.with_colony_mut(colony, |c| c.facilities.push(facility));

        let mut events = EventLog::new();
        events.begin_phase(EventPhase::Conflict);
        cleanup_system(&mut state, hub, &mut events);

        assert!(!state.store.contains(project.0));
        assert!(state.store.contains(facility.0));
        assert!(events
            .events()
            .iter()
            .any(|e| matches!(e.kind, EventKind::ProjectsLost { count: 1 })));
    }
}
