//! The combat resolution driver.
//!
//! A manual loop over `CombatPhase`, not a scheduler: each attack phase
//! runs one round of CER exchanges between every pair of hostile task
//! forces present at the system, then checks for retreats and a
//! stalemate before advancing.

use bevy_log::{debug, info};
use hexreach_contracts::{EventKind, EventLog, EventPhase, FacilityId, HouseId, SquadronId, SystemId};
use hexreach_model::{DiplomaticState, Facility, FacilityKind, GameState, ShipCombatState, Squadron};
use rand::Rng;

use crate::buckets::{self, TargetBucket};
use crate::cer::{self, CerModifiers};
use crate::cleanup;
use crate::phase::CombatPhase;
use crate::retreat;
use crate::task_force::TaskForce;

const MAX_ROUNDS: u32 = 10;

#[derive(Debug, Clone)]
pub struct CombatReport {
    pub system: SystemId,
    pub rounds: u32,
    pub surviving_houses: Vec<HouseId>,
    pub stalemate: bool,
}

#[derive(Debug, Clone, Copy)]
enum TargetRef {
    Squadron(SquadronId),
    Facility(FacilityId),
}

/// Builds one `TaskForce` per house with combat-capable assets present at
/// `system`.
fn build_task_forces(state: &GameState, system: SystemId) -> Vec<TaskForce> {
    let Some(fleet_ids) = state.fleets_by_system.get(&system) else {
        return Vec::new();
    };
    let mut by_house: std::collections::HashMap<HouseId, TaskForce> = std::collections::HashMap::new();

    for &fleet_id in fleet_ids {
        let Some(fleet) = state.store.get::<hexreach_model::Fleet>(fleet_id.0) else {
            continue;
        };
        if !fleet.can_execute_active_orders() {
            continue;
        }
        let tf = by_house
            .entry(fleet.owner)
            .or_insert_with(|| TaskForce::new(fleet.owner, fleet.roe));
        for &squadron_id in &fleet.squadrons {
            if state
                .store
                .get::<Squadron>(squadron_id.0)
                .is_some_and(|sq| squadron_has_combat_capable_ship(state, sq))
            {
                tf.squadrons.push(squadron_id);
            }
        }
    }

    for &colony_id in state.colonies_by_system.get(&system).into_iter() {
        if let Some(facility_ids) = state.facilities_by_colony.get(&colony_id) {
            for &facility_id in facility_ids {
                let Some(facility) = state.store.get::<Facility>(facility_id.0) else {
                    continue;
                };
                if facility.is_destroyed() {
                    continue;
                }
                if let FacilityKind::Kastra(_) = &facility.kind {
                    if let Some(colony) = state.store.get::<hexreach_model::Colony>(colony_id.0) {
                        let tf = by_house
                            .entry(colony.owner)
                            .or_insert_with(|| TaskForce::new(colony.owner, 5));
                        tf.facilities.push(facility_id);
                        tf.defending_homeworld = true;
                    }
                }
            }
        }
    }

    by_house.into_values().collect()
}

fn squadron_has_combat_capable_ship(state: &GameState, squadron: &Squadron) -> bool {
    let flagship_ok = state
        .store
        .get::<hexreach_model::Ship>(squadron.flagship.0)
        .is_some_and(hexreach_model::Ship::is_combat_capable);
    flagship_ok
        || squadron.subordinates.iter().any(|s| {
            state
                .store
                .get::<hexreach_model::Ship>(s.0)
                .is_some_and(hexreach_model::Ship::is_combat_capable)
        })
}

/// True if `a` and `b` are mutually hostile.
fn are_hostile(state: &GameState, a: HouseId, b: HouseId) -> bool {
    let a_view = state
        .store
        .get::<hexreach_model::House>(a.0)
        .map(|h| h.relation_with(b));
    let b_view = state
        .store
        .get::<hexreach_model::House>(b.0)
        .map(|h| h.relation_with(a));
    matches!(a_view, Some(DiplomaticState::Hostile)) || matches!(b_view, Some(DiplomaticState::Hostile))
}

fn gather_targets(state: &GameState, tf: &TaskForce) -> Vec<(TargetBucket, TargetRef)> {
    let mut out = Vec::new();
    for &squadron_id in &tf.squadrons {
        let Some(squadron) = state.store.get::<Squadron>(squadron_id.0) else {
            continue;
        };
        if !squadron_has_combat_capable_ship(state, squadron) {
            continue;
        }
        if let Some(bucket) = buckets::classify_squadron(squadron) {
            out.push((bucket, TargetRef::Squadron(squadron_id)));
        }
    }
    for &facility_id in &tf.facilities {
        if let Some(facility) = state.store.get::<Facility>(facility_id.0) {
            if !facility.is_destroyed() {
                out.push((buckets::classify_facility(facility), TargetRef::Facility(facility_id)));
            }
        }
    }
    out
}

fn strength_of_squadron(state: &GameState, squadron_id: SquadronId, attack: bool) -> u32 {
    let Some(squadron) = state.store.get::<Squadron>(squadron_id.0) else {
        return 0;
    };
    let mut ship_ids = vec![squadron.flagship];
    ship_ids.extend(squadron.subordinates.iter().copied());
    ship_ids
        .iter()
        .filter_map(|id| state.store.get::<hexreach_model::Ship>(id.0))
        .filter(|s| s.is_combat_capable())
        .map(|s| if attack { s.stats.attack_strength } else { s.stats.defense_strength })
        .sum()
}

fn apply_hit_to_target(state: &mut GameState, target: TargetRef) {
    match target {
        TargetRef::Squadron(squadron_id) => {
            let Some(squadron) = state.store.get::<Squadron>(squadron_id.0) else {
                return;
            };
            let mut candidates = vec![squadron.flagship];
            candidates.extend(squadron.subordinates.iter().copied());
            let target_ship = candidates.into_iter().find(|id| {
                state
                    .store
                    .get::<hexreach_model::Ship>(id.0)
                    .is_some_and(hexreach_model::Ship::is_combat_capable)
            });
            if let Some(ship_id) = target_ship {
                if let Some(mut ship) = state.store.get_mut::<hexreach_model::Ship>(ship_id.0) {
                    ship.apply_damage();
                }
            }
        }
        TargetRef::Facility(facility_id) => {
            if let Some(mut facility) = state.store.get_mut::<Facility>(facility_id.0) {
                match &mut facility.kind {
                    FacilityKind::Neoria(n) => {
                        n.state = if n.state == ShipCombatState::Crippled {
                            ShipCombatState::Destroyed
                        } else {
                            ShipCombatState::Crippled
                        };
                    }
                    FacilityKind::Kastra(k) => {
                        k.state = if k.state == ShipCombatState::Crippled {
                            ShipCombatState::Destroyed
                        } else {
                            ShipCombatState::Crippled
                        };
                    }
                }
            }
        }
    }
}

fn run_round(
    state: &mut GameState,
    task_forces: &mut [TaskForce],
    phase: CombatPhase,
    rng: &mut impl Rng,
    events: &mut EventLog,
    system: SystemId,
) {
    let house_order: Vec<HouseId> = task_forces.iter().map(|tf| tf.house).collect();
    for (attacker_idx, &attacker_house) in house_order.iter().enumerate() {
        if task_forces[attacker_idx].retreated {
            continue;
        }
        let attacker_squadrons = task_forces[attacker_idx].squadrons.clone();
        if attacker_squadrons.is_empty() {
            continue;
        }

        // Collect live enemy targets across every hostile task force.
        let mut enemy_targets: Vec<(usize, TargetBucket, TargetRef)> = Vec::new();
        for (idx, tf) in task_forces.iter().enumerate() {
            if idx == attacker_idx || tf.retreated {
                continue;
            }
            if !are_hostile(state, attacker_house, tf.house) {
                continue;
            }
            for (bucket, target_ref) in gather_targets(state, tf) {
                enemy_targets.push((idx, bucket, target_ref));
            }
        }
        if enemy_targets.is_empty() {
            continue;
        }
        let available_buckets: Vec<TargetBucket> = enemy_targets.iter().map(|(_, b, _)| *b).collect();
        let Some(chosen_bucket) = buckets::select_bucket(&available_buckets) else {
            continue;
        };
        let Some(&(defender_idx, _, target)) =
            enemy_targets.iter().find(|(_, b, _)| *b == chosen_bucket)
        else {
            continue;
        };

        let attacker_tf = &task_forces[attacker_idx];
        let modifiers = CerModifiers {
            scouts_present: false,
            morale: attacker_tf.morale_modifier,
            surprise: phase == CombatPhase::Intercept,
            ambush: phase == CombatPhase::Ambush && attacker_tf.pre_detected,
        };

        let attack_strength: u32 = attacker_squadrons
            .iter()
            .map(|&s| strength_of_squadron(state, s, true))
            .sum();
        let defense_strength = match target {
            TargetRef::Squadron(sq) => strength_of_squadron(state, sq, false).max(1),
            TargetRef::Facility(f) => state
                .store
                .get::<Facility>(f.0)
                .map(|facility| match &facility.kind {
                    FacilityKind::Kastra(k) => k.defense_strength,
                    FacilityKind::Neoria(_) => 1,
                })
                .unwrap_or(1),
        };

        let result = cer::roll(rng, modifiers, chosen_bucket, attack_strength.max(1), defense_strength);
        debug!(
            ?attacker_house,
            ?chosen_bucket,
            natural_roll = result.natural_roll,
            damage = result.damage_dealt,
            "combat round exchange"
        );
        if result.effectiveness > 0.0 {
            apply_hit_to_target(state, target);
        }

        let defender_house = task_forces[defender_idx].house;
        events.push(
            vec![attacker_house, defender_house],
            Some(system),
            None,
            None,
            EventKind::EnemyDetected,
        );
    }
}

fn task_force_has_combat_capable_assets(state: &GameState, tf: &TaskForce) -> bool {
    tf.squadrons.iter().any(|&s| {
        state
            .store
            .get::<Squadron>(s.0)
            .is_some_and(|sq| squadron_has_combat_capable_ship(state, sq))
    }) || tf
        .facilities
        .iter()
        .any(|&f| state.store.get::<Facility>(f.0).is_some_and(|fac| !fac.is_destroyed()))
}

/// Runs the full PreCombat -> Resolved sequence for one system, returning
/// `None` if fewer than two hostile task forces are present (no combat
/// occurs). Cleanup is always invoked before returning, even on
/// the no-combat path, so facilities/fleets left empty by prior turns are
/// swept consistently.
pub fn resolve_combat(
    state: &mut GameState,
    system: SystemId,
    master_seed: u64,
    turn: u32,
    events: &mut EventLog,
) -> Option<CombatReport> {
    events.begin_phase(EventPhase::Conflict);

    let mut task_forces = build_task_forces(state, system);
    task_forces.retain(|tf| !tf.squadrons.is_empty() || !tf.facilities.is_empty());

    let mut hostile_pairs = false;
    for i in 0..task_forces.len() {
        for j in (i + 1)..task_forces.len() {
            if are_hostile(state, task_forces[i].house, task_forces[j].house) {
                hostile_pairs = true;
            }
        }
    }
    if task_forces.len() < 2 || !hostile_pairs {
        cleanup::cleanup_system(state, system, events);
        return None;
    }

    let tag = format!("combat:{system}");
    let seed = hexreach_contracts::rng::per_turn_seed(master_seed, turn);
    let mut rng = hexreach_contracts::rng::sub_rng(seed, &tag);

    let mut phase = CombatPhase::PreCombat;
    let mut round = 0u32;
    let mut stalemate = false;

    loop {
        phase = phase.next();
        if phase == CombatPhase::Resolved {
            break;
        }
        if phase.is_attack_phase() {
            round += 1;
            run_round(state, &mut task_forces, phase, &mut rng, events, system);
            retreat::evaluate_retreats(state, &mut task_forces, &mut rng, events, system);
            task_forces.retain(|tf| !tf.retreated && task_force_has_combat_capable_assets(state, tf));

            let remaining_hostile_pairs = task_forces.iter().enumerate().any(|(i, a)| {
                task_forces
                    .iter()
                    .skip(i + 1)
                    .any(|b| are_hostile(state, a.house, b.house))
            });
            if !remaining_hostile_pairs {
                break;
            }
            if round >= MAX_ROUNDS {
                stalemate = true;
                break;
            }
        }
        if phase == CombatPhase::PostCombat {
            break;
        }
    }

    let surviving_houses: Vec<HouseId> = task_forces.iter().map(|tf| tf.house).collect();

    if stalemate {
        events.push(surviving_houses.clone(), Some(system), None, None, EventKind::CombatStalemate);
    } else {
        events.push(
            surviving_houses.clone(),
            Some(system),
            None,
            None,
            EventKind::CombatResolved {
                wins: surviving_houses.clone(),
                wants_stalemate: false,
            },
        );
    }
    info!(?system, rounds = round, stalemate, "combat resolved");

    cleanup::cleanup_system(state, system, events);

    Some(CombatReport {
        system,
        rounds: round,
        surviving_houses,
        stalemate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexreach_contracts::Store;
    use hexreach_map::generate;
    use hexreach_model::{Fleet, House, PlanetClass, Ship, ShipStats, SpecialCapability, SquadronType};

    fn make_ship(state: &mut GameState, owner: HouseId, attack: u32, defense: u32) -> hexreach_contracts::ShipId {
        state.spawn_ship(
            owner,
            Ship {
                class_name: "Frigate".into(),
                tech_level: 1,
                state: ShipCombatState::Undamaged,
                stats: ShipStats {
                    attack_strength: attack,
                    defense_strength: defense,
                    command_cost: 1,
                    carry_limit: 0,
                    special: SpecialCapability::None,
                },
                cargo_pu: 0,
            },
        )
    }

    fn setup() -> (GameState, SystemId, HouseId, HouseId) {
        let mut store = Store::new();
        let star_map = generate(&mut store, 1, 2, 5);
        let mut state = GameState::new(store, star_map);
        let hub = state.star_map.hub;
        let a = state.spawn_house(House::new("A"));
        let b = state.spawn_house(House::new("B"));
        state.with_colony_mut(
            state.spawn_colony(hexreach_model::Colony::new(a, hub, PlanetClass::Terran, 5)),
            |_| {},
        );
        if let Some(mut house) = state.store.get_mut::<House>(a.0) {
            house.set_relation(b, DiplomaticState::Hostile, 0);
        }

        let ship_a = make_ship(&mut state, a, 5, 3);
        let squadron_a = Squadron::new(hexreach_contracts::FleetId(hub.0), SquadronType::Combat, ship_a);
        let squadron_a_id = state.spawn_squadron(a, squadron_a);
        let mut fleet_a = Fleet::new(a, hub);
        fleet_a.squadrons.push(squadron_a_id);
        let fleet_a_id = state.spawn_fleet(fleet_a);
        state.with_fleet_mut(fleet_a_id, |f| f.squadrons = vec![squadron_a_id]);

        let ship_b = make_ship(&mut state, b, 4, 3);
        let squadron_b = Squadron::new(hexreach_contracts::FleetId(hub.0), SquadronType::Combat, ship_b);
        let squadron_b_id = state.spawn_squadron(b, squadron_b);
        let mut fleet_b = Fleet::new(b, hub);
        fleet_b.squadrons.push(squadron_b_id);
        state.spawn_fleet(fleet_b);

        (state, hub, a, b)
    }

    #[test]
    fn combat_resolves_with_two_hostile_task_forces() {
        let (mut state, hub, _a, _b) = setup();
        let mut events = EventLog::new();
        let report = resolve_combat(&mut state, hub, 42, 1, &mut events);
        assert!(report.is_some());
    }

    #[test]
    fn no_combat_without_a_hostile_pair() {
        let (mut state, hub, a, b) = setup();
        if let Some(mut house) = state.store.get_mut::<House>(a.0) {
            house.set_relation(b, DiplomaticState::Neutral, 0);
        }
        let mut events = EventLog::new();
        let report = resolve_combat(&mut state, hub, 42, 1, &mut events);
        assert!(report.is_none());
    }
}
