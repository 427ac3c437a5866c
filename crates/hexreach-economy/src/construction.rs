//! Construction routing and queue advancement.
//!
//! Capital ships anchor to a facility dock (spaceport/shipyard/drydock);
//! everything else — buildings, fighters, industrial expansion — anchors
//! directly to the colony. A facility's docks bound how many of its
//! anchored projects are simultaneously active; the rest wait in its FIFO
//! queue until a dock frees up.

use hexreach_config::{ConfigSnapshot, FacilityClassConfig};
use hexreach_contracts::{ColonyId, EventKind, EventLog, FacilityId, HouseId, ProjectId};
use hexreach_model::{
    BuildOrder, Colony, ConstructionProject, Facility, FacilityKind, Fleet, GameState, Kastra,
    Neoria, NeoriaKind, NewFacilityKind, ProjectAnchor, ProjectKind, Ship, ShipCombatState,
    ShipStats, SpecialCapability, Squadron, SquadronType,
};

/// Cost in production points for one unit of `kind`, used both to size a
/// `ConstructionProject` and as the `unit_cost` callback
/// `hexreach-orders::validate_build_orders` commits against the budget.
#[must_use]
pub fn project_cost(kind: &ProjectKind, config: &ConfigSnapshot) -> u32 {
    match kind {
        ProjectKind::Ship { class_name } => config.ships.get(class_name).map_or(10, |c| c.base_cost_pp),
        ProjectKind::Building { facility } => facility_cost(*facility, config),
        ProjectKind::IndustrialExpansion { iu_delta } => iu_delta.max(1) * 5,
    }
}

fn facility_cost(kind: NewFacilityKind, config: &ConfigSnapshot) -> u32 {
    facility_config(kind, config).map_or(20, |c| c.base_cost_pp)
}

fn facility_config(kind: NewFacilityKind, config: &ConfigSnapshot) -> Option<&FacilityClassConfig> {
    match kind {
        NewFacilityKind::Spaceport => config.facilities.spaceport.as_ref(),
        NewFacilityKind::Shipyard => config.facilities.shipyard.as_ref(),
        NewFacilityKind::Drydock => config.facilities.drydock.as_ref(),
        NewFacilityKind::Starbase => config.facilities.starbase.as_ref(),
    }
}

fn estimated_turns(kind: &ProjectKind) -> u32 {
    match kind {
        ProjectKind::Ship { .. } => 2,
        ProjectKind::Building { .. } => 3,
        ProjectKind::IndustrialExpansion { .. } => 1,
    }
}

fn wants_facility_dock(kind: &ProjectKind, config: &ConfigSnapshot) -> bool {
    matches!(kind, ProjectKind::Ship { class_name } if config.ships.get(class_name).is_some_and(|c| !c.is_fighter))
}

/// The first non-destroyed, non-crippled neoria at the colony with room
/// in its active-construction slots, or else the first with room in its
/// queue (every neoria has an unbounded FIFO queue, so this always finds
/// a home once any neoria exists).
fn pick_neoria(state: &GameState, colony_id: ColonyId) -> Option<FacilityId> {
    let facility_ids = state.facilities_by_colony.get(&colony_id)?;
    facility_ids
        .iter()
        .copied()
        .find(|&id| {
            state.store.get::<Facility>(id.0).is_some_and(|f| {
                matches!(f.kind, FacilityKind::Neoria(_)) && !f.is_destroyed() && !f.is_crippled()
            })
        })
}

/// Enqueues one accepted build order, spawning `quantity` independent
/// projects. Treasury debit happens in the
/// validation layer at acceptance time (`hexreach-orders::budget`); this
/// function only routes the already-accepted order into storage.
pub fn enqueue_build_order(
    state: &mut GameState,
    house: HouseId,
    order: &BuildOrder,
    config: &ConfigSnapshot,
    events: &mut EventLog,
) {
    let quantity = order.quantity.max(1);
    for _ in 0..quantity {
        let cost = project_cost(&order.kind, config);
        let anchor_facility = if wants_facility_dock(&order.kind, config) {
            pick_neoria(state, order.colony)
        } else {
            None
        };
        let anchor = anchor_facility.map_or(ProjectAnchor::Colony(order.colony), ProjectAnchor::Facility);

        let project = ConstructionProject {
            kind: order.kind.clone(),
            owner: house,
            colony: order.colony,
            anchor,
            cost_total: cost,
            pp_committed: 0,
            turns_remaining: estimated_turns(&order.kind),
        };
        let project_id = state.spawn_project(order.colony, project);

        if let Some(facility_id) = anchor_facility {
            state.store.get_mut::<Facility>(facility_id.0).map(|mut f| {
                if let FacilityKind::Neoria(n) = &mut f.kind {
                    if (n.active_constructions.len() as u8) < n.docks {
                        n.active_constructions.push(project_id);
                    } else {
                        n.construction_queue.push_back(project_id);
                    }
                }
            });
        } else {
            state.with_colony_mut(order.colony, |c| c.under_construction.push(project_id));
        }
    }

    events.push(
        vec![house],
        None,
        Some(order.colony),
        None,
        EventKind::ConstructionQueued { quantity },
    );
}

fn build_facility(kind: NewFacilityKind, config: &ConfigSnapshot, colony: ColonyId) -> Facility {
    if let NewFacilityKind::Starbase = kind {
        let docks = facility_config(kind, config).map_or(1, |c| u32::from(c.docks.max(1)));
        return Facility {
            colony,
            kind: FacilityKind::Kastra(Kastra {
                attack_strength: docks * 5,
                defense_strength: docks * 10,
                state: ShipCombatState::Undamaged,
            }),
        };
    }
    let neoria_kind = match kind {
        NewFacilityKind::Spaceport => NeoriaKind::Spaceport,
        NewFacilityKind::Shipyard => NeoriaKind::Shipyard,
        NewFacilityKind::Drydock => NeoriaKind::Drydock,
        NewFacilityKind::Starbase => unreachable!("handled above"),
    };
    let docks = facility_config(kind, config).map_or(1, |c| c.docks.max(1));
    Facility {
        colony,
        kind: FacilityKind::Neoria(Neoria {
            kind: neoria_kind,
            docks,
            active_constructions: Vec::new(),
            construction_queue: Default::default(),
            repairs: Default::default(),
            state: ShipCombatState::Undamaged,
        }),
    }
}

/// Builds a ship from its class config, spawns a single-ship squadron in
/// a freshly-created holding fleet at the colony's system, and records it
/// in the colony's unassigned list for auto-assignment.
fn commission_ship(
    state: &mut GameState,
    owner: HouseId,
    colony_id: ColonyId,
    class_name: &str,
    config: &ConfigSnapshot,
    events: &mut EventLog,
) {
    let Some(system) = state.store.get::<Colony>(colony_id.0).map(|c| c.system) else {
        return;
    };
    let cfg = config.ships.get(class_name);
    let stats = ShipStats {
        attack_strength: cfg.map_or(1, |c| c.attack_strength),
        defense_strength: cfg.map_or(1, |c| c.defense_strength),
        command_cost: cfg.map_or(1, |c| c.command_cost),
        carry_limit: cfg.map_or(0, |c| c.carry_limit),
        special: match cfg {
            Some(c) if c.is_spacelift => SpecialCapability::Transport {
                cargo_capacity: c.carry_limit,
            },
            Some(c) if c.is_scout => SpecialCapability::Scout,
            _ => SpecialCapability::None,
        },
    };
    let ship_id = state.spawn_ship(
        owner,
        Ship {
            class_name: class_name.to_string(),
            tech_level: 1,
            state: ShipCombatState::Undamaged,
            stats,
            cargo_pu: 0,
        },
    );

    let fleet_id = state.spawn_fleet(Fleet::new(owner, system));

    // Spacelift hulls ride in a fleet's `spacelift` list directly, never
 // wrapped in a squadron, so they have no "unassigned squadron" to place either.
    if matches!(stats.special, SpecialCapability::Transport { .. }) {
        state.with_fleet_mut(fleet_id, |f| f.spacelift.push(ship_id));
    } else {
        let squadron_type = if cfg.is_some_and(|c| c.is_scout) {
            SquadronType::Intel
        } else if cfg.is_some_and(|c| c.is_fighter) {
            SquadronType::Fighter
        } else {
            SquadronType::Combat
        };
        let squadron_id = state.spawn_squadron(owner, Squadron::new(fleet_id, squadron_type, ship_id));
        state.with_fleet_mut(fleet_id, |f| f.squadrons.push(squadron_id));
        state.with_colony_mut(colony_id, |c| c.unassigned_squadrons.push(squadron_id));
    }

    events.push(
        vec![owner],
        Some(system),
        Some(colony_id),
        None,
        EventKind::ShipCommissioned,
    );
}

fn complete_project(
    state: &mut GameState,
    colony_id: ColonyId,
    owner: HouseId,
    project_id: ProjectId,
    config: &ConfigSnapshot,
    events: &mut EventLog,
) {
    let Some(kind) = state.store.get::<ConstructionProject>(project_id.0).map(|p| p.kind.clone()) else {
        return;
    };
    match kind {
        ProjectKind::Ship { class_name } => commission_ship(state, owner, colony_id, &class_name, config, events),
        ProjectKind::Building { facility } => {
            let new_facility = build_facility(facility, config, colony_id);
            let facility_id = state.spawn_facility(colony_id, new_facility);
            state.with_colony_mut(colony_id, |c| c.facilities.push(facility_id));
            events.push(vec![owner], None, Some(colony_id), None, EventKind::ConstructionCompleted);
        }
        ProjectKind::IndustrialExpansion { iu_delta } => {
            state.with_colony_mut(colony_id, |c| c.iu += iu_delta);
            events.push(vec![owner], None, Some(colony_id), None, EventKind::ConstructionCompleted);
        }
    }
    state.despawn_project(colony_id, project_id);
}

/// Advances every project anchored at `colony_id` (both colony-queued and
/// facility-docked) by its share of `available_pp`, completing any that
/// reach their cost and turn count, and promoting the next queued project
/// into any dock slot that frees up.
pub fn advance_constructions(
    state: &mut GameState,
    colony_id: ColonyId,
    config: &ConfigSnapshot,
    available_pp: u32,
    events: &mut EventLog,
) {
    let Some(owner) = state.store.get::<Colony>(colony_id.0).map(|c| c.owner) else {
        return;
    };

    let mut active: Vec<ProjectId> = state
        .store
        .get::<Colony>(colony_id.0)
        .map(|c| c.under_construction.clone())
        .unwrap_or_default();
    let facility_ids = state.facilities_by_colony.get(&colony_id).cloned().unwrap_or_default();
    for &facility_id in &facility_ids {
        if let Some(facility) = state.store.get::<Facility>(facility_id.0) {
            if let FacilityKind::Neoria(n) = &facility.kind {
                active.extend(n.active_constructions.iter().copied());
            }
        }
    }
    if active.is_empty() {
        return;
    }

    let share = (available_pp / active.len() as u32).max(1);
    let mut remaining_budget = available_pp;
    let mut completed = Vec::new();
    for &project_id in &active {
        if remaining_budget == 0 {
            break;
        }
        let spend = share.min(remaining_budget);
        if let Some(mut project) = state.store.get_mut::<ConstructionProject>(project_id.0) {
            let spent = project.advance(spend);
            remaining_budget = remaining_budget.saturating_sub(spent);
            if project.is_complete() {
                completed.push(project_id);
            }
        }
    }

    for project_id in &completed {
        complete_project(state, colony_id, owner, *project_id, config, events);
    }
    state.with_colony_mut(colony_id, |c| c.under_construction.retain(|p| !completed.contains(p)));
    for &facility_id in &facility_ids {
        if let Some(mut facility) = state.store.get_mut::<Facility>(facility_id.0) {
            if let FacilityKind::Neoria(n) = &mut facility.kind {
                n.active_constructions.retain(|p| !completed.contains(p));
                while (n.active_constructions.len() as u8) < n.docks {
                    let Some(next) = n.construction_queue.pop_front() else {
                        break;
                    };
                    n.active_constructions.push(next);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexreach_contracts::{EventPhase, HouseId, Store};
    use hexreach_map::generate;
    use hexreach_model::{House, PlanetClass};

    fn setup() -> (GameState, HouseId, ColonyId) {
        let mut store = Store::new();
        let star_map = generate(&mut store, 1, 1, 1);
        let mut state = GameState::new(store, star_map);
        let hub = state.star_map.hub;
        let house = state.spawn_house(House::new("A"));
        let colony = state.spawn_colony(Colony::new(house, hub, PlanetClass::Terran, 5));
        (state, house, colony)
    }

    #[test]
    fn industrial_expansion_routes_to_colony_and_completes() {
        let (mut state, house, colony) = setup();
        let config = ConfigSnapshot::default();
        let order = BuildOrder {
            colony,
            kind: ProjectKind::IndustrialExpansion { iu_delta: 2 },
            quantity: 1,
        };
        let mut events = EventLog::new();
        events.begin_phase(EventPhase::Income);
        enqueue_build_order(&mut state, house, &order, &config, &mut events);

        let project_id = state.store.get::<Colony>(colony.0).unwrap().under_construction[0];
        let cost = state.store.get::<ConstructionProject>(project_id.0).unwrap().cost_total;

        advance_constructions(&mut state, colony, &config, cost, &mut events);
        assert_eq!(state.store.get::<Colony>(colony.0).unwrap().iu, 2);
        assert!(state.store.get::<Colony>(colony.0).unwrap().under_construction.is_empty());
    }

    #[test]
    fn capital_ship_anchors_to_an_open_neoria_dock() {
        let (mut state, house, colony) = setup();
        let mut config = ConfigSnapshot::default();
        config.ships.classes.push(hexreach_config::ShipClassConfig {
            name: "Cruiser".into(),
            attack_strength: 5,
            defense_strength: 5,
            command_cost: 2,
            carry_limit: 0,
            is_spacelift: false,
            is_scout: false,
            is_fighter: false,
            base_cost_pp: 8,
            base_maintenance_pp: 1,
        });

        let facility = state.spawn_facility(
            colony,
            Facility {
                colony,
                kind: FacilityKind::Neoria(Neoria {
                    kind: NeoriaKind::Shipyard,
                    docks: 1,
                    active_constructions: Vec::new(),
                    construction_queue: Default::default(),
                    repairs: Default::default(),
                    state: ShipCombatState::Undamaged,
                }),
            },
        );
        state.with_colony_mut(colony, |c| c.facilities.push(facility));

        let order = BuildOrder {
            colony,
            kind: ProjectKind::Ship {
                class_name: "Cruiser".into(),
            },
            quantity: 1,
        };
        let mut events = EventLog::new();
        events.begin_phase(EventPhase::Income);
        enqueue_build_order(&mut state, house, &order, &config, &mut events);

        let facility_ref = state.store.get::<Facility>(facility.0).unwrap();
        let FacilityKind::Neoria(n) = &facility_ref.kind else {
            unreachable!()
        };
        assert_eq!(n.active_constructions.len(), 1);
    }

    #[test]
    fn commissioned_ship_lands_in_unassigned_squadrons() {
        let (mut state, house, colony) = setup();
        let mut config = ConfigSnapshot::default();
        config.ships.classes.push(hexreach_config::ShipClassConfig {
            name: "Scout".into(),
            attack_strength: 1,
            defense_strength: 1,
            command_cost: 1,
            carry_limit: 0,
            is_spacelift: false,
            is_scout: true,
            is_fighter: true,
            base_cost_pp: 3,
            base_maintenance_pp: 1,
        });
        let order = BuildOrder {
            colony,
            kind: ProjectKind::Ship {
                class_name: "Scout".into(),
            },
            quantity: 1,
        };
        let mut events = EventLog::new();
        events.begin_phase(EventPhase::Income);
        enqueue_build_order(&mut state, house, &order, &config, &mut events);

        let project_id = state.store.get::<Colony>(colony.0).unwrap().under_construction[0];
        let cost = state.store.get::<ConstructionProject>(project_id.0).unwrap().cost_total;
        advance_constructions(&mut state, colony, &config, cost, &mut events);
        advance_constructions(&mut state, colony, &config, cost, &mut events);

        assert_eq!(state.store.get::<Colony>(colony.0).unwrap().unassigned_squadrons.len(), 1);
    }
}
