//! Spy-scout travel and detection.
//!
//! A scout executing `FleetOrder::ScoutMission` is peeled off its fleet
//! into its own `ScoutMission` entity so ordinary fleet bookkeeping
//! (auto-assignment, maintenance, combat task-force assembly) leaves it
//! alone while it travels.

use bevy_ecs::component::Component;
use bevy_log::info;
use hexreach_config::ConfigSnapshot;
use hexreach_contracts::rng::{per_turn_seed, sub_rng};
use hexreach_contracts::{ColonyId, EventKind, EventLog, FleetId, HouseId, ResolveError, ResolveResult, ScoutMissionId, SquadronId, SystemId};
use hexreach_map::pathfind::{shortest_path, FleetComposition};
use hexreach_model::house::DiplomaticState;
use hexreach_model::{Colony, Fleet, GameState, House, Squadron, SquadronType};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Travel/execution state of an in-flight spy-scout mission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoutMissionState {
    Traveling,
    OnMission,
}

/// A spy-scout mission entity.
#[derive(Component, Debug, Clone, Serialize, Deserialize)]
pub struct ScoutMission {
    pub house: HouseId,
    pub squadron: SquadronId,
    pub target_colony: ColonyId,
    pub target_system: SystemId,
    pub state: ScoutMissionState,
    pub current: SystemId,
    pub remaining_path: Vec<SystemId>,
}

/// Launches a spy-scout mission for `squadron`, currently in `fleet`,
/// toward the system holding `target_colony`. The squadron is detached
/// from `fleet` immediately; if that empties the fleet it is despawned
/// (mirrors `auto_assign`'s empty-holding-fleet cleanup).
///
/// Requires a single-ship Intel squadron. `hexreach-orders::validation`
/// already requires an Intel-type squadron to be *present* on the order,
/// per the decision that multi-ship squadrons are accepted there;
/// this is the layer that actually enforces single-ship, since a
/// multi-ship scout squadron can never productively execute the mission.
pub fn start_mission(
    state: &mut GameState,
    house: HouseId,
    fleet: FleetId,
    squadron: SquadronId,
    target_colony: ColonyId,
) -> ResolveResult<ScoutMissionId> {
    let sq = state
        .store
        .get::<Squadron>(squadron.0)
        .ok_or_else(|| ResolveError::InvalidInput("unknown squadron".into()))?;
    if sq.squadron_type != SquadronType::Intel {
        return Err(ResolveError::PreconditionFailed("squadron is not Intel-type".into()));
    }
    if !sq.is_single_ship() {
        return Err(ResolveError::PreconditionFailed(
            "multi-ship scout squadron cannot execute a spy mission".into(),
        ));
    }

    let target_system = state
        .store
        .get::<Colony>(target_colony.0)
        .ok_or_else(|| ResolveError::InvalidInput("unknown target colony".into()))?
        .system;
    let current = state
        .store
        .get::<Fleet>(fleet.0)
        .ok_or_else(|| ResolveError::InvalidInput("unknown fleet".into()))?
        .system;

    let mut remaining = shortest_path(&state.star_map, current, target_system, FleetComposition::default())?.systems;
    if !remaining.is_empty() {
        remaining.remove(0);
    }

    state.with_fleet_mut(fleet, |f| f.squadrons.retain(|&s| s != squadron));
    if state.store.get::<Fleet>(fleet.0).is_some_and(Fleet::is_empty) {
        state.despawn_fleet(fleet);
    }

    let state_tag = if remaining.is_empty() {
        ScoutMissionState::OnMission
    } else {
        ScoutMissionState::Traveling
    };
    let mission = ScoutMission {
        house,
        squadron,
        target_colony,
        target_system,
        state: state_tag,
        current,
        remaining_path: remaining,
    };
    Ok(state.spawn_scout_mission(house, mission))
}

fn defending_house_at(state: &GameState, system: SystemId, traveler: HouseId) -> Option<HouseId> {
    state
        .colonies_by_system
        .get(&system)
        .and_then(|c| state.store.get::<Colony>(c.0))
        .map(|c| c.owner)
        .filter(|&owner| owner != traveler)
}

fn intel_squadron_count(state: &GameState, system: SystemId, house: HouseId) -> u32 {
    state
        .fleets_by_system
        .get(&system)
        .into_iter()
        .flatten()
        .filter_map(|f| state.store.get::<Fleet>(f.0))
        .filter(|f| f.owner == house)
        .flat_map(|f| f.squadrons.iter())
        .filter(|&&sq| {
            state
                .store
                .get::<Squadron>(sq.0)
                .is_some_and(|s| s.squadron_type == SquadronType::Intel)
        })
        .count() as u32
}

/// The defending house's detection chance against a traveling scout at
/// `system`, built from the config base rate, the defender's Espionage
/// tech field (index 8), and the mesh-network ELI bonus from their own
/// Intel squadrons already stationed there.
fn detection_chance_at(state: &GameState, config: &ConfigSnapshot, system: SystemId, traveler: HouseId) -> f32 {
    let Some(defender) = defending_house_at(state, system, traveler) else {
        return config.espionage.base_detection_chance;
    };
 // Allied scouts do not destroy one another.
    let allied = state
        .store
        .get::<House>(defender.0)
        .is_some_and(|h| h.relation_with(traveler) == DiplomaticState::Allied);
    if allied {
        return 0.0;
    }
    let espionage_field = state
        .store
        .get::<House>(defender.0)
        .map_or(0, |h| h.tech.fields[8]);
    let mesh = config.espionage.mesh_bonus(intel_squadron_count(state, system, defender));
    (config.espionage.base_detection_chance + espionage_field as f32 * 0.01 + mesh * 0.05).clamp(0.0, 1.0)
}

fn escalate_on_detection(state: &mut GameState, system: SystemId, traveler: HouseId, turn: u32, events: &mut EventLog) {
    let Some(defender) = defending_house_at(state, system, traveler) else {
        return;
    };
    let still_neutral = state
        .store
        .get::<House>(defender.0)
        .is_some_and(|h| h.relation_with(traveler) == DiplomaticState::Neutral);
    if !still_neutral {
        return;
    }
    if let Some(mut h) = state.store.get_mut::<House>(defender.0) {
        h.set_relation(traveler, DiplomaticState::Hostile, turn);
    }
    if let Some(mut h) = state.store.get_mut::<House>(traveler.0) {
        h.set_relation(defender, DiplomaticState::Hostile, turn);
    }
    events.push(
        vec![defender],
        Some(system),
        None,
        None,
        EventKind::DiplomaticStatusChanged {
            other: traveler,
            new_state: "Hostile",
        },
    );
    events.push(
        vec![traveler],
        Some(system),
        None,
        None,
        EventKind::DiplomaticStatusChanged {
            other: defender,
            new_state: "Hostile",
        },
    );
}

fn report_and_complete(state: &mut GameState, house: HouseId, mission_id: ScoutMissionId, mission: &ScoutMission, turn: u32) {
    if let Some(colony) = state.store.get::<Colony>(mission.target_colony.0).cloned() {
        let owner_name = state
            .store
            .get::<House>(colony.owner.0)
            .map(|h| h.name.clone())
            .unwrap_or_default();
        if let Some(mut h) = state.store.get_mut::<House>(house.0) {
            h.intel.record_colony(hexreach_model::ColonyReport {
                colony: mission.target_colony,
                owner_name,
                pu_estimate: colony.pu,
                gathered_turn: turn,
                quality: hexreach_model::IntelQuality::Live,
            });
        }
    }
    state.despawn_scout_mission(house, mission_id);
}

/// Advances every in-flight scout mission one step:
/// detection roll, then either one jump closer, arrival, or — if already
/// arrived last turn — reporting and completion.
pub fn advance_missions(state: &mut GameState, config: &ConfigSnapshot, master_seed: u64, turn: u32, events: &mut EventLog) {
    let mission_ids: Vec<(HouseId, ScoutMissionId)> = state
        .scout_missions_by_owner
        .iter()
        .flat_map(|(house, ids)| ids.iter().map(move |id| (*house, *id)))
        .collect();

    for (house, mission_id) in mission_ids {
        advance_one(state, config, master_seed, turn, events, house, mission_id);
    }
}

fn advance_one(
    state: &mut GameState,
    config: &ConfigSnapshot,
    master_seed: u64,
    turn: u32,
    events: &mut EventLog,
    house: HouseId,
    mission_id: ScoutMissionId,
) {
    let Some(mission) = state.store.get::<ScoutMission>(mission_id.0).cloned() else {
        return;
    };

    if mission.state == ScoutMissionState::OnMission {
        report_and_complete(state, house, mission_id, &mission, turn);
        return;
    }

    let seed = per_turn_seed(master_seed, turn);
    let mut rng = sub_rng(seed, &format!("scout:{mission_id}"));
    let detection_chance = detection_chance_at(state, config, mission.current, house);

    let roll: f32 = rng.random();
    if roll < detection_chance {
        info!(house = %house, system = %mission.current, "scout destroyed");
        events.push(vec![house], Some(mission.current), None, None, EventKind::ScoutDestroyed);
        escalate_on_detection(state, mission.current, house, turn, events);
        state.despawn_scout_mission(house, mission_id);
        return;
    }
    if roll < detection_chance * 2.0 {
        events.push(vec![house], Some(mission.current), None, None, EventKind::ScoutDetected);
        escalate_on_detection(state, mission.current, house, turn, events);
    }

    let Some(mut m) = state.store.get_mut::<ScoutMission>(mission_id.0) else {
        return;
    };
    match m.remaining_path.first().copied() {
        Some(next) => {
            m.remaining_path.remove(0);
            m.current = next;
            if m.remaining_path.is_empty() {
                m.state = ScoutMissionState::OnMission;
            }
        }
        None => m.state = ScoutMissionState::OnMission,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexreach_contracts::Store;
    use hexreach_map::generate;
    use hexreach_model::{Colony, GameState, House, PlanetClass, Ship, ShipCombatState, ShipStats, SpecialCapability};

    fn scout_ship() -> Ship {
        Ship {
            class_name: "Scout".into(),
            tech_level: 1,
            state: ShipCombatState::Undamaged,
            stats: ShipStats {
                attack_strength: 0,
                defense_strength: 1,
                command_cost: 1,
                carry_limit: 0,
                special: SpecialCapability::Scout,
            },
            cargo_pu: 0,
        }
    }

    #[test]
    fn single_ship_intel_squadron_launches_a_traveling_mission() {
        let mut store = Store::new();
        let star_map = generate(&mut store, 2, 2, 7);
        let mut state = GameState::new(store, star_map);
        let hub = state.star_map.hub;
        let target_system = state.star_map.systems.iter().copied().find(|&s| s != hub).unwrap();

        let house = state.spawn_house(House::new("A"));
        let other = state.spawn_house(House::new("B"));
        let colony = state.spawn_colony(Colony::new(other, target_system, PlanetClass::Terran, 5));

        let fleet = state.spawn_fleet(Fleet::new(house, hub));
        let ship = state.spawn_ship(house, scout_ship());
        let squadron = state.spawn_squadron(house, Squadron::new(fleet, SquadronType::Intel, ship));
        state.with_fleet_mut(fleet, |f| f.squadrons.push(squadron));

        let mission_id = start_mission(&mut state, house, fleet, squadron, colony).unwrap();
        assert!(state.scout_missions_by_owner[&house].contains(&mission_id));
        assert!(!state.store.get::<Fleet>(fleet.0).unwrap().squadrons.contains(&squadron));
    }

    #[test]
    fn multi_ship_squadron_is_rejected() {
        let mut store = Store::new();
        let star_map = generate(&mut store, 2, 2, 7);
        let mut state = GameState::new(store, star_map);
        let hub = state.star_map.hub;
        let target_system = state.star_map.systems.iter().copied().find(|&s| s != hub).unwrap();
        let house = state.spawn_house(House::new("A"));
        let other = state.spawn_house(House::new("B"));
        let colony = state.spawn_colony(Colony::new(other, target_system, PlanetClass::Terran, 5));

        let fleet = state.spawn_fleet(Fleet::new(house, hub));
        let flagship = state.spawn_ship(house, scout_ship());
        let subordinate = state.spawn_ship(house, scout_ship());
        let mut squadron_component = Squadron::new(fleet, SquadronType::Intel, flagship);
        squadron_component.subordinates.push(subordinate);
        let squadron = state.spawn_squadron(house, squadron_component);
        state.with_fleet_mut(fleet, |f| f.squadrons.push(squadron));

        assert!(start_mission(&mut state, house, fleet, squadron, colony).is_err());
    }
}
