//! The Conflict phase: per-system combat resolution,
//! blockade imposition, and bombardment/invasion against colonies —
//! dispatched from each house's already-validated fleet orders so these
//! actions are known before the first CER is rolled.

use hexreach_combat::{cer, TargetBucket};
use hexreach_config::ConfigSnapshot;
use hexreach_contracts::{rng::sub_rng, ColonyId, EventKind, EventLog, EventPhase, FleetId, HouseId, SystemId};
use hexreach_model::{Colony, DiplomaticState, Fleet, FleetOrder, GroundForces, House, Ship, Squadron, SquadronType};
use hexreach_orders::ValidationOutcome;
use rand::Rng;

use hexreach_model::GameState;

pub(crate) fn is_hostile(state: &GameState, a: HouseId, b: HouseId) -> bool {
    if a == b {
        return false;
    }
    state.store.get::<House>(a.0).is_some_and(|h| h.relation_with(b) == DiplomaticState::Hostile)
        || state.store.get::<House>(b.0).is_some_and(|h| h.relation_with(a) == DiplomaticState::Hostile)
}

/// Any active fleet belonging to `house`, present at `system`, that has at
/// least one combat-capable squadron.
fn combat_capable_fleet_at(state: &GameState, system: SystemId, house: HouseId) -> Option<FleetId> {
    state.fleets_by_system.get(&system).into_iter().flatten().copied().find(|&fleet_id| {
        state.store.get::<Fleet>(fleet_id.0).is_some_and(|f| {
            f.owner == house
                && f.can_execute_active_orders()
                && f.squadrons.iter().any(|&sq| {
                    state.store.get::<Squadron>(sq.0).is_some_and(|s| {
                        s.squadron_type == SquadronType::Combat
                            && state.store.get::<Ship>(s.flagship.0).is_some_and(Ship::is_combat_capable)
                    })
                })
        })
    })
}

fn squadron_attack_strength(state: &GameState, squadron: &Squadron) -> u32 {
    std::iter::once(squadron.flagship)
        .chain(squadron.subordinates.iter().copied())
        .filter_map(|id| state.store.get::<Ship>(id.0))
        .filter(|s| s.is_combat_capable())
        .map(|s| s.stats.attack_strength)
        .sum()
}

fn fleet_attack_strength(state: &GameState, fleet_id: FleetId) -> u32 {
    let Some(fleet) = state.store.get::<Fleet>(fleet_id.0) else {
        return 0;
    };
    fleet
        .squadrons
        .iter()
        .filter_map(|&sq| state.store.get::<Squadron>(sq.0))
        .filter(|sq| sq.squadron_type == SquadronType::Combat)
        .map(|sq| squadron_attack_strength(state, sq))
        .sum()
}

fn fleet_assault_capacity(state: &GameState, fleet_id: FleetId) -> u32 {
    let Some(fleet) = state.store.get::<Fleet>(fleet_id.0) else {
        return 0;
    };
    fleet
        .spacelift
        .iter()
        .filter_map(|&ship| state.store.get::<Ship>(ship.0))
        .filter(|s| s.is_combat_capable())
        .map(|s| s.stats.carry_limit)
        .sum()
}

fn colony_defense_strength(ground: &GroundForces) -> u32 {
    ground.batteries.max(1) + ground.shield_level * 2
}

fn colony_ground_strength(ground: &GroundForces) -> u32 {
    ground.armies + ground.marines + ground.batteries + ground.shield_level * 2
}

/// Bombards `colony`: reduces IU/PU and discards pending construction,
/// emitting a `ColonyBombarded` event.
fn try_bombard(
    state: &mut GameState,
    house: HouseId,
    fleet_id: FleetId,
    colony_id: ColonyId,
    master_seed: u64,
    turn: u32,
    events: &mut EventLog,
) {
    let Some(colony) = state.store.get::<Colony>(colony_id.0) else {
        return;
    };
    if !is_hostile(state, house, colony.owner) {
        return;
    }
    let system = colony.system;
    let Some(attacker_fleet) = combat_capable_fleet_at(state, system, house).filter(|&f| f == fleet_id) else {
        return;
    };

    let attack = fleet_attack_strength(state, attacker_fleet);
    let defense = colony_defense_strength(&colony.ground);
    let mut rng = sub_rng(
        hexreach_contracts::rng::per_turn_seed(master_seed, turn),
        &format!("bombard:{colony_id}"),
    );
    let result = cer::roll(&mut rng, cer::CerModifiers::default(), TargetBucket::Capital, attack, defense);

    let iu_lost = ((colony.iu as f32 * result.effectiveness * 0.1) as u32).min(colony.iu);
    let pu_lost = ((colony.pu as f32 * result.effectiveness * 0.05) as u32).min(colony.pu);

    let discarded = state.with_colony_mut(colony_id, |c| {
        c.iu = c.iu.saturating_sub(iu_lost);
        c.pu = c.pu.saturating_sub(pu_lost);
        c.clear_projects_on_bombardment()
    });

    events.push(
        vec![house, colony.owner],
        Some(system),
        Some(colony_id),
        Some(fleet_id),
        EventKind::ColonyBombarded { iu_lost, pu_lost },
    );
    if let Some(count) = discarded.filter(|c| *c > 0) {
        events.push(
            vec![colony.owner],
            Some(system),
            Some(colony_id),
            None,
            EventKind::ProjectsLost { count },
        );
    }
}

/// Invades `colony`: requires loaded transports at the system; on success
/// the colony's owner changes and pending projects are discarded silently
///, with no event for the discard itself.
fn try_invade(
    state: &mut GameState,
    config: &ConfigSnapshot,
    house: HouseId,
    fleet_id: FleetId,
    colony_id: ColonyId,
    master_seed: u64,
    turn: u32,
    events: &mut EventLog,
) {
    let Some(colony) = state.store.get::<Colony>(colony_id.0) else {
        return;
    };
    if !is_hostile(state, house, colony.owner) {
        return;
    }
    let system = colony.system;
    let Some(fleet) = state.store.get::<Fleet>(fleet_id.0) else {
        return;
    };
    if fleet.system != system || !fleet.can_execute_active_orders() || fleet.spacelift.is_empty() {
        return;
    }

    let assault = fleet_assault_capacity(state, fleet_id);
    let defense = colony_ground_strength(&colony.ground);
    let mut rng = sub_rng(
        hexreach_contracts::rng::per_turn_seed(master_seed, turn),
        &format!("invade:{colony_id}"),
    );
    let result = cer::roll(&mut rng, cer::CerModifiers::default(), TargetBucket::Capital, assault, defense.max(1));
    let success = result.critical || result.damage_dealt >= 1.0;

    if !success {
        events.push(
            vec![house, colony.owner],
            Some(system),
            Some(colony_id),
            Some(fleet_id),
            EventKind::InvasionRepelled,
        );
        return;
    }

    let previous_owner = colony.owner;
    let discarded = state
        .with_colony_mut(colony_id, |c| {
            c.owner = house;
            c.ground = GroundForces::default();
            c.discard_projects_on_conquest()
        })
        .unwrap_or_default();
    for project in discarded {
        state.despawn_project(colony_id, project);
    }
    state.with_fleet_mut(fleet_id, |f| f.spacelift.clear());
    if let Some(mut attacker) = state.store.get_mut::<House>(house.0) {
        attacker.prestige += config.prestige.invasion_victory;
    }

    events.push(
        vec![house, previous_owner],
        Some(system),
        Some(colony_id),
        Some(fleet_id),
        EventKind::ColonyConquered { new_owner: house },
    );
}

fn update_blockades(state: &mut GameState, events: &mut EventLog) {
    let colonies: Vec<ColonyId> = state.colonies_by_owner.values().flatten().copied().collect();
    for colony_id in colonies {
        let Some((system, owner, was_blockaded)) = state
            .store
            .get::<Colony>(colony_id.0)
            .map(|c| (c.system, c.owner, c.blockaded))
        else {
            continue;
        };
        let hostile_present = state.fleets_by_system.get(&system).into_iter().flatten().any(|&fleet_id| {
            state
                .store
                .get::<Fleet>(fleet_id.0)
                .is_some_and(|f| f.can_execute_active_orders() && is_hostile(state, f.owner, owner))
        });
        if hostile_present && !was_blockaded {
            state.with_colony_mut(colony_id, |c| c.blockaded = true);
            events.push(vec![owner], Some(system), Some(colony_id), None, EventKind::BlockadeImposed);
        }
    }
}

/// Drives the Conflict phase: resolves per-system combat, imposes fresh
/// blockades, then executes accepted bombardment/invasion orders.
pub fn run_conflict_phase(
    state: &mut GameState,
    validations: &[(HouseId, ValidationOutcome)],
    config: &ConfigSnapshot,
    master_seed: u64,
    turn: u32,
    events: &mut EventLog,
) {
    events.begin_phase(EventPhase::Conflict);

    let systems = state.star_map.systems.clone();
    for system in systems {
        hexreach_combat::resolve_combat(state, system, master_seed, turn, events);
    }

    events.begin_phase(EventPhase::Conflict);
    update_blockades(state, events);

    for (house, outcome) in validations {
        for (fleet_id, order) in &outcome.accepted_fleet_orders {
            match order {
                FleetOrder::Bombard { colony } => try_bombard(state, *house, *fleet_id, *colony, master_seed, turn, events),
                FleetOrder::Invade { colony } => try_invade(state, config, *house, *fleet_id, *colony, master_seed, turn, events),
                _ => {}
            }
        }
    }
}
