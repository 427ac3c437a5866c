//! The Command phase: dispatches every house's
//! already-validated orders, then lets stationary fleets absorb
//! unassigned squadrons.
//!
//! Rejections collected during pre-phase validation are turned into
//! `OrderRejected` events first, so the phase's event sequence stays
//! monotonic across both the rejection pass and the dispatch pass.

use hexreach_config::ConfigSnapshot;
use hexreach_contracts::rng::sub_rng;
use hexreach_contracts::{EventKind, EventLog, EventPhase, HouseId};
use hexreach_economy::{auto_assign_house, enqueue_build_order};
use hexreach_model::{Colony, DiplomaticState, Fleet, FleetOrder, GameState, House, PlanetClass, Squadron, SquadronType};
use hexreach_orders::ValidationOutcome;
use rand::Rng;

use crate::movement::{execute_move, run_seek_home};

const PLANET_CLASSES: [PlanetClass; 6] = [
    PlanetClass::Terran,
    PlanetClass::Ocean,
    PlanetClass::Desert,
    PlanetClass::Tundra,
    PlanetClass::Barren,
    PlanetClass::GasGiantOutpost,
];

fn dispatch_fleet_order(state: &mut GameState, events: &mut EventLog, house: HouseId, fleet_id: hexreach_contracts::FleetId, order: FleetOrder, config: &ConfigSnapshot, master_seed: u64, turn: u32) {
    match order {
        FleetOrder::Move { destination } | FleetOrder::Retreat { destination } | FleetOrder::Rally { destination } => {
            execute_move(state, events, house, fleet_id, destination);
        }
        FleetOrder::Colonize { target } => colonize(state, events, house, fleet_id, target, config, master_seed, turn),
        FleetOrder::ScoutMission { target } => start_scout_missions(state, house, fleet_id, target),
        FleetOrder::Disband => disband(state, fleet_id),
        FleetOrder::RefitAtColony { colony } => refit(state, house, fleet_id, colony),
        FleetOrder::GuardPlanet { .. }
        | FleetOrder::GuardColony { .. }
        | FleetOrder::GuardStarbase { .. }
        | FleetOrder::BlockadePlanet { .. }
        | FleetOrder::Patrol { .. }
        | FleetOrder::Hold
        | FleetOrder::DefendSystem { .. }
        | FleetOrder::Invade { .. }
        | FleetOrder::Bombard { .. }
        | FleetOrder::Escort { .. }
        | FleetOrder::InterceptRaid { .. }
        | FleetOrder::SeekHome => {
            state.with_fleet_mut(fleet_id, |f| f.command = Some(order));
        }
    }
}

/// Consumes one Expansion-type squadron (the fleet's ETAC) to found a new
/// colony at `target`. Planet class and resource rating for a previously
/// uncolonized system are rolled deterministically, since no generator
/// assigns them up front.
fn colonize(state: &mut GameState, events: &mut EventLog, house: HouseId, fleet_id: hexreach_contracts::FleetId, target: hexreach_contracts::SystemId, config: &ConfigSnapshot, master_seed: u64, turn: u32) {
    if state.colonies_by_system.contains_key(&target) {
        return;
    }
    let Some(fleet) = state.store.get::<Fleet>(fleet_id.0) else {
        return;
    };
    if fleet.system != target {
        return;
    }
    let Some(&etac) = fleet.squadrons.iter().find(|&&sq_id| {
        state
            .store
            .get::<Squadron>(sq_id.0)
            .is_some_and(|sq| sq.squadron_type == SquadronType::Expansion)
    }) else {
        return;
    };

    let mut rng = sub_rng(hexreach_contracts::rng::per_turn_seed(master_seed, turn), &format!("colonize:{target}"));
    let planet_class = PLANET_CLASSES[rng.random_range(0..PLANET_CLASSES.len())];
    let resource_rating = rng.random_range(1..=10u32);

    let colony_id = state.spawn_colony(Colony::new(house, target, planet_class, resource_rating));
    state.with_fleet_mut(fleet_id, |f| f.squadrons.retain(|&s| s != etac));
    state.despawn_squadron(house, etac);

    if let Some(mut h) = state.store.get_mut::<House>(house.0) {
        h.prestige += config.prestige.colonization;
    }
    events.push(vec![house], Some(target), Some(colony_id), Some(fleet_id), EventKind::ColonyFounded);
}

/// Launches a spy mission per Intel-type squadron in the fleet, silently
/// dropping `PreconditionFailed` for multi-ship ones.
fn start_scout_missions(state: &mut GameState, house: HouseId, fleet_id: hexreach_contracts::FleetId, target: hexreach_contracts::SystemId) {
    let Some(target_colony) = state.colonies_by_system.get(&target).copied() else {
        return;
    };
    let Some(fleet) = state.store.get::<Fleet>(fleet_id.0) else {
        return;
    };
    let intel_squadrons: Vec<_> = fleet
        .squadrons
        .iter()
        .copied()
        .filter(|&sq_id| {
            state
                .store
                .get::<Squadron>(sq_id.0)
                .is_some_and(|sq| sq.squadron_type == SquadronType::Intel)
        })
        .collect();

    for squadron in intel_squadrons {
        match hexreach_intel::start_mission(state, house, fleet_id, squadron, target_colony) {
            Ok(_) => {}
            Err(hexreach_contracts::ResolveError::PreconditionFailed(_)) => {}
            Err(_) => {}
        }
    }
}

fn disband(state: &mut GameState, fleet_id: hexreach_contracts::FleetId) {
    let Some(fleet) = state.store.get::<Fleet>(fleet_id.0) else {
        return;
    };
    let owner = fleet.owner;
    let squadrons = fleet.squadrons.clone();
    for sq_id in squadrons {
        if let Some(sq) = state.store.get::<Squadron>(sq_id.0) {
            let ship_ids: Vec<_> = std::iter::once(sq.flagship).chain(sq.subordinates.iter().copied()).collect();
            for ship_id in ship_ids {
                state.despawn_ship(owner, ship_id);
            }
        }
        state.despawn_squadron(owner, sq_id);
    }
    state.despawn_fleet(fleet_id);
}

/// Restores every Crippled ship in the fleet to Undamaged. Facility
/// repair queues track Neoria/Kastra self-repair separately (advanced in
/// the Maintenance phase); hull repair for a visiting fleet is resolved
/// here as an immediate single-turn refit, gated on an undamaged Drydock.
fn refit(state: &mut GameState, house: HouseId, fleet_id: hexreach_contracts::FleetId, colony: hexreach_contracts::ColonyId) {
    let Some(fleet) = state.store.get::<Fleet>(fleet_id.0) else {
        return;
    };
    if fleet.owner != house {
        return;
    }
    let Some(colony_data) = state.store.get::<Colony>(colony.0) else {
        return;
    };
    if colony_data.owner != house || colony_data.system != fleet.system {
        return;
    }
    let has_drydock = colony_data.facilities.iter().any(|&facility_id| {
        state.store.get::<hexreach_model::Facility>(facility_id.0).is_some_and(|f| {
            matches!(f.kind, hexreach_model::FacilityKind::Neoria(ref n) if n.kind == hexreach_model::NeoriaKind::Drydock) && !f.is_destroyed()
        })
    });
    if !has_drydock {
        return;
    }

    let ship_ids: Vec<_> = fleet
        .squadrons
        .iter()
        .filter_map(|&sq_id| state.store.get::<Squadron>(sq_id.0))
        .flat_map(|sq| std::iter::once(sq.flagship).chain(sq.subordinates.iter().copied()))
        .collect();
    for ship_id in ship_ids {
        if let Some(mut ship) = state.store.get_mut::<hexreach_model::Ship>(ship_id.0) {
            if ship.state == hexreach_model::ShipCombatState::Crippled {
                ship.state = hexreach_model::ShipCombatState::Undamaged;
            }
        }
    }
}

fn apply_diplomacy(state: &mut GameState, house: HouseId, outcome: &ValidationOutcome, turn: u32) {
    for action in &outcome.accepted_diplomacy {
        if let Some(mut h) = state.store.get_mut::<House>(house.0) {
            h.set_relation(action.target, action.proposed_state, turn);
        }
        if action.proposed_state == DiplomaticState::Hostile {
            if let Some(mut other) = state.store.get_mut::<House>(action.target.0) {
                other.set_relation(house, DiplomaticState::Hostile, turn);
            }
        }
    }
}

fn apply_population_transfers(state: &mut GameState, events: &mut EventLog, house: HouseId, outcome: &ValidationOutcome) {
    for transfer in &outcome.accepted_population_transfers {
        state.with_colony_mut(transfer.from_colony, |c| c.pu -= transfer.pu);
        state.with_colony_mut(transfer.to_colony, |c| c.pu += transfer.pu);
        events.push(
            vec![house],
            None,
            Some(transfer.to_colony),
            None,
            EventKind::PopulationTransferred { pu: transfer.pu },
        );
    }
}

fn apply_espionage(state: &mut GameState, house: HouseId, outcome: &ValidationOutcome) {
    let Some(attempt) = &outcome.accepted_espionage else {
        return;
    };
    let Some(sq) = state.store.get::<Squadron>(attempt.scout_squadron.0) else {
        return;
    };
    let fleet_id = sq.fleet;
    let _ = hexreach_intel::start_mission(state, house, fleet_id, attempt.scout_squadron, attempt.target_colony);
}


/// Runs the Command phase for every house's validated orders.
pub fn run_command_phase(state: &mut GameState, validations: &[(HouseId, ValidationOutcome)], config: &ConfigSnapshot, master_seed: u64, turn: u32, events: &mut EventLog) {
    events.begin_phase(EventPhase::Command);

    for (house, outcome) in validations {
        for rejection in &outcome.rejections {
            events.push(
                vec![*house],
                None,
                None,
                None,
                EventKind::OrderRejected {
                    reason: format!("{}: {}", rejection.order_kind, rejection.reason),
                },
            );
        }
    }

    run_seek_home(state, events);

    for (house, outcome) in validations {
        for order in &outcome.accepted_build_orders {
            enqueue_build_order(state, *house, order, config, events);
        }
        for (fleet_id, order) in outcome.accepted_fleet_orders.clone() {
            dispatch_fleet_order(state, events, *house, fleet_id, order, config, master_seed, turn);
        }
        apply_diplomacy(state, *house, outcome, turn);
        apply_population_transfers(state, events, *house, outcome);
        apply_espionage(state, *house, outcome);
    }

    hexreach_intel::advance_missions(state, config, master_seed, turn, events);

    for house in state.houses.clone() {
        auto_assign_house(state, house);
    }
}
