//! The Maintenance phase: upkeep debiting,
//! construction advancement, bi-annual tech upgrades, blockade clearance,
//! and victory/elimination checks.

use std::collections::HashMap;

use hexreach_config::ConfigSnapshot;
use hexreach_contracts::rng::{per_turn_seed, sub_rng};
use hexreach_contracts::{ColonyId, EventKind, EventLog, EventPhase, HouseId};
use hexreach_economy::{advance_constructions, advance_tech, compute_maintenance, debit_maintenance};
use hexreach_model::{Fleet, GameState, House};

use crate::conflict::is_hostile;

fn clear_stale_blockades(state: &mut GameState, events: &mut EventLog) {
    let colonies: Vec<ColonyId> = state.colonies_by_owner.values().flatten().copied().collect();
    for colony_id in colonies {
        let Some((system, owner, blockaded)) = state
            .store
            .get::<hexreach_model::Colony>(colony_id.0)
            .map(|c| (c.system, c.owner, c.blockaded))
        else {
            continue;
        };
        if !blockaded {
            continue;
        }
        let hostile_present = state.fleets_by_system.get(&system).into_iter().flatten().any(|&fleet_id| {
            state
                .store
                .get::<Fleet>(fleet_id.0)
                .is_some_and(|f| f.can_execute_active_orders() && is_hostile(state, f.owner, owner))
        });
        if !hostile_present {
            state.with_colony_mut(colony_id, |c| c.blockaded = false);
            events.push(vec![owner], Some(system), Some(colony_id), None, EventKind::BlockadeCleared);
        }
    }
}

/// A house is eliminated once it holds no colonies and no fleets. Every
/// surviving house shares `config.prestige.elimination_of_rival` — wars of
/// attrition rarely have one attributable killer.
fn check_eliminations(state: &mut GameState, config: &ConfigSnapshot, events: &mut EventLog) {
    let houses = state.houses.clone();
    let mut newly_eliminated = Vec::new();

    for house_id in &houses {
        let already_eliminated = state.store.get::<House>(house_id.0).is_some_and(|h| h.eliminated);
        if already_eliminated {
            continue;
        }
        let has_colonies = state.colonies_by_owner.get(house_id).is_some_and(|c| !c.is_empty());
        let has_fleets = state.fleets_by_owner.get(house_id).is_some_and(|f| !f.is_empty());
        if has_colonies || has_fleets {
            continue;
        }
        if let Some(mut house) = state.store.get_mut::<House>(house_id.0) {
            house.eliminated = true;
        }
        events.push(vec![*house_id], None, None, None, EventKind::Elimination);
        newly_eliminated.push(*house_id);
    }

    if newly_eliminated.is_empty() {
        return;
    }
    for house_id in &houses {
        if newly_eliminated.contains(house_id) {
            continue;
        }
        if let Some(mut house) = state.store.get_mut::<House>(house_id.0) {
            if !house.eliminated {
                house.prestige += config.prestige.elimination_of_rival;
            }
        }
    }
}

/// Runs the Maintenance phase: upkeep, construction, tech, blockade
/// clearance, and elimination checks, in that order.
pub fn run_maintenance_phase(state: &mut GameState, config: &ConfigSnapshot, available_pp: &HashMap<ColonyId, u32>, master_seed: u64, turn: u32, events: &mut EventLog) {
    events.begin_phase(EventPhase::Maintenance);

    for house_id in state.houses.clone() {
        let due = compute_maintenance(state, house_id, config);
        if let Some(mut house) = state.store.get_mut::<House>(house_id.0) {
            debit_maintenance(house_id, &mut house, due, events);
        }
    }

    for colony_id in state.colonies_by_owner.values().flatten().copied().collect::<Vec<_>>() {
        let pp = available_pp.get(&colony_id).copied().unwrap_or(0);
        advance_constructions(state, colony_id, config, pp, events);
    }

    for house_id in state.houses.clone() {
        let seed = per_turn_seed(master_seed, turn);
        let mut rng = sub_rng(seed, &format!("tech:{house_id}"));
        if let Some(mut house) = state.store.get_mut::<House>(house_id.0) {
            advance_tech(house_id, &mut house, config, turn, &mut rng, events);
        }
    }

    clear_stale_blockades(state, events);
    check_eliminations(state, config, events);
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexreach_contracts::Store;
    use hexreach_map::generate;
    use hexreach_model::{Colony, PlanetClass};

    #[test]
    fn house_with_no_colonies_or_fleets_is_eliminated() {
        let mut store = Store::new();
        let star_map = generate(&mut store, 1, 1, 5);
        let mut state = GameState::new(store, star_map);
        let house = state.spawn_house(House::new("Atreides"));
        let config = ConfigSnapshot::default();
        let mut events = EventLog::new();
        events.begin_phase(EventPhase::Maintenance);

        check_eliminations(&mut state, &config, &mut events);

        assert!(state.store.get::<House>(house.0).unwrap().eliminated);
        assert!(events.events().iter().any(|e| matches!(e.kind, EventKind::Elimination)));
    }

    #[test]
    fn house_with_a_colony_survives() {
        let mut store = Store::new();
        let star_map = generate(&mut store, 1, 1, 5);
        let mut state = GameState::new(store, star_map);
        let house = state.spawn_house(House::new("Atreides"));
        let hub = state.star_map.hub;
        state.spawn_colony(Colony::new(house, hub, PlanetClass::Terran, 5));
        let config = ConfigSnapshot::default();
        let mut events = EventLog::new();
        events.begin_phase(EventPhase::Maintenance);

        check_eliminations(&mut state, &config, &mut events);

        assert!(!state.store.get::<House>(house.0).unwrap().eliminated);
    }
}
