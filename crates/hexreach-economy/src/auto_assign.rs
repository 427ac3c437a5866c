//! Fleet auto-assignment at command-phase end: stationary
//! eligible fleets absorb unassigned squadrons produced by construction
//! this turn; squadrons with no eligible fleet keep the holding fleet they
//! were commissioned into.

use hexreach_contracts::ColonyId;
use hexreach_model::{Fleet, GameState};

/// Drains `colony.unassigned_squadrons`, merging each squadron into the
/// first eligible fleet at the colony's system other than the squadron's
/// current fleet. A squadron with no other eligible fleet simply stays in
/// the single-squadron holding fleet `commission_ship` created for it —
/// which already satisfies the "a new Active fleet is created" fallback.
pub fn auto_assign_colony(state: &mut GameState, colony_id: ColonyId) {
    let Some((system, unassigned)) = state
        .store
        .get::<hexreach_model::Colony>(colony_id.0)
        .map(|c| (c.system, c.unassigned_squadrons.clone()))
    else {
        return;
    };
    if unassigned.is_empty() {
        return;
    }

    for squadron_id in &unassigned {
        let Some(current_fleet) = state.store.get::<hexreach_model::Squadron>(squadron_id.0).map(|s| s.fleet) else {
            continue;
        };
        let Some(current_owner) = state.store.get::<Fleet>(current_fleet.0).map(|f| f.owner) else {
            continue;
        };

        let candidate = state
            .fleets_by_system
            .get(&system)
            .into_iter()
            .flatten()
            .copied()
            .find(|&fleet_id| {
                fleet_id != current_fleet
                    && state.store.get::<Fleet>(fleet_id.0).is_some_and(|f| {
                        f.owner == current_owner && f.eligible_for_auto_assignment()
                    })
            });

        if let Some(target_fleet) = candidate {
            state.with_fleet_mut(current_fleet, |f| f.squadrons.retain(|&s| s != *squadron_id));
            state.with_fleet_mut(target_fleet, |f| f.squadrons.push(*squadron_id));
            if let Some(mut squadron) = state.store.get_mut::<hexreach_model::Squadron>(squadron_id.0) {
                squadron.fleet = target_fleet;
            }
            if state.store.get::<Fleet>(current_fleet.0).is_some_and(Fleet::is_empty) {
                state.despawn_fleet(current_fleet);
            }
        }
    }

    state.with_colony_mut(colony_id, |c| c.unassigned_squadrons.clear());
}

/// Runs auto-assignment across every colony the house owns.
pub fn auto_assign_house(state: &mut GameState, house: hexreach_contracts::HouseId) {
    let colonies = state.colonies_by_owner.get(&house).cloned().unwrap_or_default();
    for colony_id in colonies {
        auto_assign_colony(state, colony_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexreach_contracts::Store;
    use hexreach_map::generate;
    use hexreach_model::{Colony, GameState, House, PlanetClass, Ship, ShipCombatState, ShipStats, SpecialCapability, Squadron, SquadronType};

    fn ship() -> Ship {
        Ship {
            class_name: "Scout".into(),
            tech_level: 1,
            state: ShipCombatState::Undamaged,
            stats: ShipStats {
                attack_strength: 1,
                defense_strength: 1,
                command_cost: 1,
                carry_limit: 0,
                special: SpecialCapability::None,
            },
            cargo_pu: 0,
        }
    }

    #[test]
    fn unassigned_squadron_merges_into_an_eligible_fleet() {
        let mut store = Store::new();
        let star_map = generate(&mut store, 1, 1, 1);
        let mut state = GameState::new(store, star_map);
        let hub = state.star_map.hub;
        let house = state.spawn_house(House::new("A"));
        let colony = state.spawn_colony(Colony::new(house, hub, PlanetClass::Terran, 5));

        let existing_fleet = state.spawn_fleet(Fleet::new(house, hub));
        let holding_fleet = state.spawn_fleet(Fleet::new(house, hub));
        let ship_id = state.spawn_ship(house, ship());
        let squadron_id = state.spawn_squadron(house, Squadron::new(holding_fleet, SquadronType::Combat, ship_id));
        state.with_fleet_mut(holding_fleet, |f| f.squadrons.push(squadron_id));
        state.with_colony_mut(colony, |c| c.unassigned_squadrons.push(squadron_id));

        auto_assign_colony(&mut state, colony);

        assert!(state.store.get::<Fleet>(existing_fleet.0).unwrap().squadrons.contains(&squadron_id));
        assert_eq!(state.store.get::<hexreach_model::Squadron>(squadron_id.0).unwrap().fleet, existing_fleet);
        assert!(!state.store.contains(holding_fleet.0));
        assert!(state.store.get::<Colony>(colony.0).unwrap().unassigned_squadrons.is_empty());
    }

    #[test]
    fn squadron_stays_in_its_holding_fleet_when_no_other_fleet_is_eligible() {
        let mut store = Store::new();
        let star_map = generate(&mut store, 1, 1, 1);
        let mut state = GameState::new(store, star_map);
        let hub = state.star_map.hub;
        let house = state.spawn_house(House::new("A"));
        let colony = state.spawn_colony(Colony::new(house, hub, PlanetClass::Terran, 5));

        let holding_fleet = state.spawn_fleet(Fleet::new(house, hub));
        let ship_id = state.spawn_ship(house, ship());
        let squadron_id = state.spawn_squadron(house, Squadron::new(holding_fleet, SquadronType::Combat, ship_id));
        state.with_fleet_mut(holding_fleet, |f| f.squadrons.push(squadron_id));
        state.with_colony_mut(colony, |c| c.unassigned_squadrons.push(squadron_id));

        auto_assign_colony(&mut state, colony);

        assert!(state.store.contains(holding_fleet.0));
        assert_eq!(state.store.get::<hexreach_model::Squadron>(squadron_id.0).unwrap().fleet, holding_fleet);
    }
}
