//! Round-boundary retreat evaluation.
//!
//! A task force whose effective ROE falls below its committed-strength
//! ratio pulls out at the end of a round, routed to the nearest friendly
//! or neutral system reachable from the combat system. A task force
//! reduced to zero combat-capable squadrons is removed outright — it has
//! nothing left to retreat with.

use hexreach_contracts::{EventKind, EventLog, HouseId, SystemId};
use hexreach_map::pathfind::{self, FleetComposition};
use hexreach_model::{DiplomaticState, GameState, Squadron};
use rand::Rng;

use crate::task_force::TaskForce;

/// Strength ratio below which a task force's effective ROE no longer
/// justifies staying in the fight. A task force with `effective_roe() <=
/// 3` (out of 10) breaks off once outnumbered more than 2:1 in combat-
/// capable squadron count.
fn should_retreat(tf: &TaskForce, own_squadron_count: usize, enemy_squadron_count: usize, rng: &mut impl Rng) -> bool {
    if own_squadron_count == 0 {
        return true;
    }
    let roe = tf.effective_roe();
    if roe >= 8 {
        return false; // high-ROE task forces never break voluntarily
    }
    let outnumbered = enemy_squadron_count > own_squadron_count * 2;
    if !outnumbered {
        return false;
    }
    // Lower ROE makes a break more likely even once outnumbered; roll
    // against (10 - roe) in 10.
    rng.random_range(0..10) < (10 - u32::from(roe))
}

fn squadron_is_combat_capable(state: &GameState, squadron_id: hexreach_contracts::SquadronId) -> bool {
    state
        .store
        .get::<Squadron>(squadron_id.0)
        .is_some_and(|sq| {
            let flagship_ok = state
                .store
                .get::<hexreach_model::Ship>(sq.flagship.0)
                .is_some_and(hexreach_model::Ship::is_combat_capable);
            flagship_ok
                || sq.subordinates.iter().any(|s| {
                    state
                        .store
                        .get::<hexreach_model::Ship>(s.0)
                        .is_some_and(hexreach_model::Ship::is_combat_capable)
                })
        })
}

/// Picks a retreat destination: the nearest adjacent system that is not
/// occupied by a hostile task force. Falls back to `None` (the task
/// force is simply removed from combat in place, e.g. a starbase with
/// nowhere to flee) when no such system exists.
fn pick_retreat_destination(state: &GameState, from: SystemId, house: HouseId) -> Option<SystemId> {
    state
        .star_map
        .neighbors(from)
        .iter()
        .map(|(system, _)| *system)
        .find(|&candidate| {
            state
                .fleets_by_system
                .get(&candidate)
                .is_none_or(|fleets| {
                    fleets.iter().all(|&fleet_id| {
                        state
                            .store
                            .get::<hexreach_model::Fleet>(fleet_id.0)
                            .is_none_or(|fleet| !is_hostile_house(state, house, fleet.owner))
                    })
                })
        })
}

fn is_hostile_house(state: &GameState, a: HouseId, b: HouseId) -> bool {
    if a == b {
        return false;
    }
    state
        .store
        .get::<hexreach_model::House>(a.0)
        .is_some_and(|h| matches!(h.relation_with(b), DiplomaticState::Hostile))
}

/// Evaluates every still-engaged task force for a retreat, marking
/// `retreated` on the ones that break off and relocating their fleets at
/// `system` toward a safe neighbor when one is reachable.
pub fn evaluate_retreats(
    state: &mut GameState,
    task_forces: &mut [TaskForce],
    rng: &mut impl Rng,
    events: &mut EventLog,
    system: SystemId,
) {
    let counts: Vec<usize> = task_forces
        .iter()
        .map(|tf| tf.squadrons.iter().filter(|&&s| squadron_is_combat_capable(state, s)).count())
        .collect();

    for idx in 0..task_forces.len() {
        if task_forces[idx].retreated {
            continue;
        }
        let own = counts[idx];
        let enemy_max = counts
            .iter()
            .enumerate()
            .filter(|&(j, _)| j != idx && are_hostile(state, task_forces[idx].house, task_forces[j].house))
            .map(|(_, &c)| c)
            .max()
            .unwrap_or(0);

        if should_retreat(&task_forces[idx], own, enemy_max, rng) {
            task_forces[idx].retreated = true;
            let house = task_forces[idx].house;
            let composition = FleetComposition::default();
            let destination = pick_retreat_destination(state, system, house).and_then(|dest| {
                pathfind::shortest_path(&state.star_map, system, dest, composition)
                    .ok()
                    .map(|_| dest)
            });

            if let Some(fleet_ids) = state.fleets_by_system.get(&system).cloned() {
                for fleet_id in fleet_ids {
                    let owner_matches = state
                        .store
                        .get::<hexreach_model::Fleet>(fleet_id.0)
                        .is_some_and(|f| f.owner == house);
                    if owner_matches {
                        if let Some(dest) = destination {
                            state.with_fleet_mut(fleet_id, |fleet| fleet.system = dest);
                        }
                    }
                }
            }

            events.push(
                vec![house],
                Some(system),
                None,
                None,
                EventKind::FleetSeekHome { destination },
            );
        }
    }
}

fn are_hostile(state: &GameState, a: HouseId, b: HouseId) -> bool {
    is_hostile_house(state, a, b) || is_hostile_house(state, b, a)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy_ecs::entity::Entity;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn tf(house: u32, roe: u8) -> TaskForce {
        TaskForce::new(HouseId(Entity::from_raw(house)), roe)
    }

    #[test]
    fn high_roe_task_force_never_retreats() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut force = tf(0, 9);
        assert!(!should_retreat(&force, 1, 10, &mut rng));
        force.squadrons.clear();
    }

    #[test]
    fn empty_task_force_always_retreats() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let force = tf(0, 5);
        assert!(should_retreat(&force, 0, 0, &mut rng));
    }

    #[test]
    fn unoutnumbered_low_roe_force_does_not_auto_retreat() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let force = tf(0, 2);
        assert!(!should_retreat(&force, 5, 5, &mut rng));
    }
}
