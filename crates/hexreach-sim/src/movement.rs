//! Fleet movement execution and automated seek-home.
//!
//! Per turn, a fleet chases its declared destination one admissible jump
//! at a time via [`hexreach_map::pathfind::shortest_path`], re-planning
//! from its new position after each jump rather than committing to a
//! whole path up front (a fleet's surroundings can change mid-turn as
//! other houses' orders execute). The first jump is always taken if the
//! lane admits the fleet's composition; further jumps chain only while
//! the fleet keeps landing in friendly-or-adjacent territory, and at most
//! one jump into hostile territory is allowed per turn.

use hexreach_contracts::{EventKind, EventLog, FleetId, HouseId, SystemId};
use hexreach_map::pathfind::{shortest_path, FleetComposition};
use hexreach_model::{Colony, DiplomaticState, Fleet, FleetOrder, GameState, House, Squadron, SquadronType};

fn composition_of(state: &GameState, fleet: &Fleet) -> FleetComposition {
    let has_escort = fleet.squadrons.iter().any(|&sq| {
        state
            .store
            .get::<Squadron>(sq.0)
            .is_some_and(|s| s.squadron_type == SquadronType::Combat)
    });
    FleetComposition {
        has_unescorted_spacelift: !fleet.spacelift.is_empty() && !has_escort,
    }
}

fn owner_at(state: &GameState, system: SystemId) -> Option<HouseId> {
    state
        .colonies_by_system
        .get(&system)
        .and_then(|&colony| state.store.get::<Colony>(colony.0))
        .map(|c| c.owner)
}

fn is_hostile_to(state: &GameState, house: HouseId, other: HouseId) -> bool {
    if house == other {
        return false;
    }
    let forward = state
        .store
        .get::<House>(house.0)
        .is_some_and(|h| h.relation_with(other) == DiplomaticState::Hostile);
    let backward = state
        .store
        .get::<House>(other.0)
        .is_some_and(|h| h.relation_with(house) == DiplomaticState::Hostile);
    forward || backward
}

fn is_hostile_system(state: &GameState, house: HouseId, system: SystemId) -> bool {
    owner_at(state, system).is_some_and(|owner| is_hostile_to(state, house, owner))
}

fn is_friendly(state: &GameState, house: HouseId, system: SystemId) -> bool {
    owner_at(state, system) == Some(house)
}

fn is_friendly_or_adjacent(state: &GameState, house: HouseId, system: SystemId) -> bool {
    is_friendly(state, house, system)
        || state
            .star_map
            .neighbors(system)
            .iter()
            .any(|&(n, _)| is_friendly(state, house, n))
}

/// Executes one fleet's movement toward `destination` for this turn.
/// Called for `FleetOrder::Move`/`Retreat`/`Rally` and for the
/// auto-generated seek-home destination.
pub fn execute_move(state: &mut GameState, events: &mut EventLog, house: HouseId, fleet_id: FleetId, destination: SystemId) {
    let Some(fleet) = state.store.get::<Fleet>(fleet_id.0) else {
        return;
    };
    if !fleet.can_move() {
        return;
    }
    let origin = fleet.system;
    if origin == destination {
        return;
    }

    let mut cur = origin;
    let mut hostile_jump_used = false;
    loop {
        if cur == destination {
            break;
        }
        let composition = composition_of(state, state.store.get::<Fleet>(fleet_id.0).unwrap());
        let Ok(path) = shortest_path(&state.star_map, cur, destination, composition) else {
            if cur == origin {
                events.push(
                    vec![house],
                    Some(origin),
                    None,
                    Some(fleet_id),
                    EventKind::FleetOrderAborted { replaced_by: "NoPath" },
                );
            }
            break;
        };
        let Some((next, lane_type)) = path.first_jump() else {
            break;
        };
        if !composition.admits(lane_type) {
            break;
        }

        let hostile = is_hostile_system(state, house, next);
        if hostile && hostile_jump_used {
            break;
        }
        cur = next;
        if hostile {
            hostile_jump_used = true;
            break;
        }
        if !is_friendly_or_adjacent(state, house, next) {
            break;
        }
    }

    if cur != origin {
        state.with_fleet_mut(fleet_id, |f| f.system = cur);
        events.push(
            vec![house],
            Some(cur),
            None,
            Some(fleet_id),
            EventKind::FleetMoved { from: origin, to: cur },
        );
    }
}

fn mission_target_system(state: &GameState, order: &FleetOrder) -> Option<SystemId> {
    match order {
        FleetOrder::GuardPlanet { system } | FleetOrder::GuardStarbase { system } => Some(*system),
        FleetOrder::Colonize { target } => Some(*target),
        FleetOrder::BlockadePlanet { colony } => state.store.get::<Colony>(colony.0).map(|c| c.system),
        FleetOrder::Patrol { route } => route.first().copied(),
        _ => None,
    }
}

/// Whether the fleet's ongoing declared mission is still sound — the
/// trigger condition for automated seek-home.
fn mission_unsound(state: &GameState, house: HouseId, order: &FleetOrder, target: SystemId) -> bool {
    match order {
        FleetOrder::Colonize { .. } => owner_at(state, target).is_some(),
        _ => is_hostile_system(state, house, target),
    }
}

/// Sends a fleet home: the nearest owned colony reachable by its
/// composition, or holds in place if none is reachable at all.
pub fn execute_seek_home(state: &mut GameState, events: &mut EventLog, house: HouseId, fleet_id: FleetId) {
    let Some(fleet) = state.store.get::<Fleet>(fleet_id.0) else {
        return;
    };
    if !fleet.can_move() {
        return;
    }
    let origin = fleet.system;
    let composition = composition_of(state, fleet);

    let mut best: Option<(u32, SystemId)> = None;
    for &colony_id in state.colonies_by_owner.get(&house).into_iter().flatten() {
        let Some(colony) = state.store.get::<Colony>(colony_id.0) else {
            continue;
        };
        if let Ok(path) = shortest_path(&state.star_map, origin, colony.system, composition) {
            let cost = path.systems.len() as u32;
            if best.is_none_or(|(best_cost, best_sys)| (cost, colony.system.0) < (best_cost, best_sys.0)) {
                best = Some((cost, colony.system));
            }
        }
    }

    let Some((_, destination)) = best else {
        events.push(
            vec![house],
            Some(origin),
            None,
            Some(fleet_id),
            EventKind::FleetSeekHome { destination: None },
        );
        return;
    };
    events.push(
        vec![house],
        Some(origin),
        None,
        Some(fleet_id),
        EventKind::FleetSeekHome {
            destination: Some(destination),
        },
    );
    execute_move(state, events, house, fleet_id, destination);
}

/// Runs at command-phase start, before any order dispatch: aborts and
/// re-routes any fleet whose previously-declared mission now targets
/// unsound territory.
pub fn run_seek_home(state: &mut GameState, events: &mut EventLog) {
    let fleet_ids: Vec<FleetId> = state.fleets_by_owner.values().flatten().copied().collect();
    for fleet_id in fleet_ids {
        let Some(fleet) = state.store.get::<Fleet>(fleet_id.0) else {
            continue;
        };
        let house = fleet.owner;
        let Some(order) = fleet.command.clone() else {
            continue;
        };
        if !order.is_seek_home_eligible() {
            continue;
        }
        let Some(target) = mission_target_system(state, &order) else {
            continue;
        };
        if !mission_unsound(state, house, &order, target) {
            continue;
        }
        events.push(
            vec![house],
            None,
            None,
            Some(fleet_id),
            EventKind::FleetOrderAborted { replaced_by: "SeekHome" },
        );
        state.with_fleet_mut(fleet_id, |f| f.command = Some(FleetOrder::SeekHome));
        execute_seek_home(state, events, house, fleet_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexreach_contracts::{EventPhase, Store};
    use hexreach_map::generate;

    fn fixture() -> (GameState, HouseId, SystemId, SystemId) {
        let mut store = Store::new();
        let star_map = generate(&mut store, 2, 1, 7);
        let mut state = GameState::new(store, star_map);
        let house = state.spawn_house(House::new("Atreides"));
        let hub = state.star_map.hub;
        let far = *state
            .star_map
            .systems
            .iter()
            .find(|&&s| s != hub)
            .expect("ring generation yields at least two systems");
        (state, house, hub, far)
    }

    #[test]
    fn fleet_with_no_path_aborts_with_event() {
        let (mut state, house, hub, _far) = fixture();
        let mut events = EventLog::new();
        events.begin_phase(EventPhase::Command);
        let fleet = state.spawn_fleet(Fleet::new(house, hub));
        let ghost = SystemId(bevy_ecs::entity::Entity::from_raw(9999));
        execute_move(&mut state, &mut events, house, fleet, ghost);
        assert_eq!(events.events().len(), 1);
        assert!(matches!(
            events.events()[0].kind,
            EventKind::FleetOrderAborted { replaced_by: "NoPath" }
        ));
    }

    #[test]
    fn seek_home_with_no_owned_colony_holds_in_place() {
        let (mut state, house, hub, _far) = fixture();
        let mut events = EventLog::new();
        events.begin_phase(EventPhase::Command);
        let fleet = state.spawn_fleet(Fleet::new(house, hub));
        execute_seek_home(&mut state, &mut events, house, fleet);
        assert!(matches!(
            events.events()[0].kind,
            EventKind::FleetSeekHome { destination: None }
        ));
        assert_eq!(state.store.get::<Fleet>(fleet.0).unwrap().system, hub);
    }

    #[test]
    fn seek_home_routes_to_nearest_owned_colony() {
        let (mut state, house, hub, far) = fixture();
        let mut events = EventLog::new();
        events.begin_phase(EventPhase::Command);
        state.spawn_colony(hexreach_model::Colony::new(house, far, hexreach_model::PlanetClass::Terran, 5));
        let fleet = state.spawn_fleet(Fleet::new(house, hub));
        execute_seek_home(&mut state, &mut events, house, fleet);
        assert!(matches!(
            events.events()[0].kind,
            EventKind::FleetSeekHome { destination: Some(_) }
        ));
    }
}
