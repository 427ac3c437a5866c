//! Fog-of-war projection: the `IntelligenceDb` refresh pass and the
//! per-house `FogOfWarView` derived from it.

use std::collections::{HashMap, HashSet};

use hexreach_contracts::{ColonyId, FleetId, HouseId, SystemId};
use hexreach_model::{Colony, ColonyReport, Fleet, FleetReport, GameState, House, IntelQuality, SystemReport};
use serde::{Deserialize, Serialize};

/// Per-system visibility tier. Universal topology
/// awareness means every system gets an entry here — `Hidden` still names
/// the system, it just withholds everything but the lane graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SystemVisibility {
    Owned,
    Occupied,
    Scouted,
    Adjacent,
    Hidden,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisibleColony {
    pub colony: ColonyId,
    pub system: SystemId,
    pub owner_name: String,
    pub pu_estimate: u32,
    pub stale: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisibleFleet {
    pub fleet: FleetId,
    pub system: SystemId,
    pub owner_name: String,
    pub squadron_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicHouseInfo {
    pub house: HouseId,
    pub name: String,
    pub prestige: i64,
    pub eliminated: bool,
}

/// A single house's projected view of the galaxy for one turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FogOfWarView {
    pub house: HouseId,
    pub turn: u32,
    pub visibility: HashMap<SystemId, SystemVisibility>,
    pub visible_colonies: Vec<VisibleColony>,
    pub visible_fleets: Vec<VisibleFleet>,
    pub public_houses: Vec<PublicHouseInfo>,
}

/// Refreshes `house`'s `IntelligenceDb` from what is actually visible this
/// turn before projecting `FogOfWarView`. Stale-then-overwrite, per
/// `IntelligenceDb::mark_all_stale`'s own doc comment: owned/occupied
/// systems, the colonies in them, and any foreign fleets caught there are
/// (re-)recorded `Live`; everything the house previously knew about but
/// can no longer see simply stays `Stale` from the mark-all pass.
pub fn refresh_intelligence(state: &mut GameState, house: HouseId) {
    let owned: HashSet<SystemId> = state
        .colonies_by_owner
        .get(&house)
        .into_iter()
        .flatten()
        .filter_map(|c| state.store.get::<Colony>(c.0))
        .map(|c| c.system)
        .collect();
    let occupied: HashSet<SystemId> = state
        .fleets_by_owner
        .get(&house)
        .into_iter()
        .flatten()
        .filter_map(|f| state.store.get::<Fleet>(f.0))
        .filter(|f| f.can_execute_active_orders())
        .map(|f| f.system)
        .collect();
    let visible_systems: Vec<SystemId> = owned.union(&occupied).copied().collect();
    let turn = state.turn;

    struct ColonyObs {
        colony: ColonyId,
        owner_name: String,
        pu: u32,
    }
    struct FleetObs {
        fleet: FleetId,
        count: u32,
    }

    let mut colony_obs = Vec::new();
    let mut fleet_obs = Vec::new();
    for &system in &visible_systems {
        if let Some(&colony_id) = state.colonies_by_system.get(&system) {
            if let Some(colony) = state.store.get::<Colony>(colony_id.0) {
                let owner_name = state
                    .store
                    .get::<House>(colony.owner.0)
                    .map(|h| h.name.clone())
                    .unwrap_or_default();
                colony_obs.push(ColonyObs {
                    colony: colony_id,
                    owner_name,
                    pu: colony.pu,
                });
            }
        }
        if let Some(fleets) = state.fleets_by_system.get(&system) {
            for &fleet_id in fleets {
                if let Some(fleet) = state.store.get::<Fleet>(fleet_id.0) {
                    if fleet.owner != house {
                        fleet_obs.push(FleetObs {
                            fleet: fleet_id,
                            count: fleet.squadrons.len() as u32,
                        });
                    }
                }
            }
        }
    }

    let Some(mut h) = state.store.get_mut::<House>(house.0) else {
        return;
    };
    h.intel.mark_all_stale();
    for &system in &visible_systems {
        h.intel.record_system(SystemReport {
            system,
            gathered_turn: turn,
            quality: IntelQuality::Live,
        });
    }
    for obs in colony_obs {
        h.intel.record_colony(ColonyReport {
            colony: obs.colony,
            owner_name: obs.owner_name,
            pu_estimate: obs.pu,
            gathered_turn: turn,
            quality: IntelQuality::Live,
        });
    }
    for obs in fleet_obs {
        h.intel.record_fleet(FleetReport {
            fleet: obs.fleet,
            squadron_count_estimate: obs.count,
            gathered_turn: turn,
            quality: IntelQuality::Live,
        });
    }
}

/// Projects `house`'s fog-of-war view from the current `GameState`.
/// Call `refresh_intelligence` first so scouted-but-
/// no-longer-visible systems/colonies/fleets still surface with a stale
/// marker instead of vanishing outright.
#[must_use]
pub fn project_fog_of_war(state: &GameState, house: HouseId) -> FogOfWarView {
    let owned_systems: HashSet<SystemId> = state
        .colonies_by_owner
        .get(&house)
        .into_iter()
        .flatten()
        .filter_map(|c| state.store.get::<Colony>(c.0))
        .map(|c| c.system)
        .collect();
    let occupied_systems: HashSet<SystemId> = state
        .fleets_by_owner
        .get(&house)
        .into_iter()
        .flatten()
        .filter_map(|f| state.store.get::<Fleet>(f.0))
        .filter(|f| f.can_execute_active_orders())
        .map(|f| f.system)
        .collect();

    let intel = state.store.get::<House>(house.0).map(|h| &h.intel);
    let scouted_systems: HashSet<SystemId> = intel
        .map(|db| db.systems.keys().copied().collect())
        .unwrap_or_default();

    let mut adjacent_systems = HashSet::new();
    for &system in owned_systems.iter().chain(occupied_systems.iter()) {
        for &(neighbor, _) in state.star_map.neighbors(system) {
            adjacent_systems.insert(neighbor);
        }
    }

    let mut visibility = HashMap::new();
    for &system in &state.star_map.systems {
        let tier = if owned_systems.contains(&system) {
            SystemVisibility::Owned
        } else if occupied_systems.contains(&system) {
            SystemVisibility::Occupied
        } else if scouted_systems.contains(&system) {
            SystemVisibility::Scouted
        } else if adjacent_systems.contains(&system) {
            SystemVisibility::Adjacent
        } else {
            SystemVisibility::Hidden
        };
        visibility.insert(system, tier);
    }

    let visible_colonies = state
        .colonies_by_system
        .iter()
        .filter_map(|(system, colony_id)| {
            let tier = visibility.get(system).copied().unwrap_or(SystemVisibility::Hidden);
            if !matches!(
                tier,
                SystemVisibility::Owned | SystemVisibility::Occupied | SystemVisibility::Scouted
            ) {
                return None;
            }
            let colony = state.store.get::<Colony>(colony_id.0)?;
            let owner_name = state
                .store
                .get::<House>(colony.owner.0)
                .map(|h| h.name.clone())
                .unwrap_or_default();
            let (pu_estimate, stale) = if matches!(tier, SystemVisibility::Owned | SystemVisibility::Occupied) {
                (colony.pu, false)
            } else {
                intel
                    .and_then(|db| db.colonies.get(colony_id))
                    .map(|r| (r.pu_estimate, matches!(r.quality, IntelQuality::Stale)))
                    .unwrap_or((colony.pu, true))
            };
            Some(VisibleColony {
                colony: *colony_id,
                system: *system,
                owner_name,
                pu_estimate,
                stale,
            })
        })
        .collect();

    let visible_fleets = state
        .fleets_by_system
        .iter()
        .filter(|(system, _)| {
            matches!(
                visibility.get(*system),
                Some(SystemVisibility::Owned | SystemVisibility::Occupied)
            )
        })
        .flat_map(|(system, fleets)| fleets.iter().map(move |f| (*system, *f)))
        .filter_map(|(system, fleet_id)| {
            let fleet = state.store.get::<Fleet>(fleet_id.0)?;
            let owner_name = state
                .store
                .get::<House>(fleet.owner.0)
                .map(|h| h.name.clone())
                .unwrap_or_default();
            Some(VisibleFleet {
                fleet: fleet_id,
                system,
                owner_name,
                squadron_count: fleet.squadrons.len(),
            })
        })
        .collect();

    let public_houses = state
        .houses
        .iter()
        .filter_map(|&h| {
            state.store.get::<House>(h.0).map(|house| PublicHouseInfo {
                house: h,
                name: house.name.clone(),
                prestige: house.prestige,
                eliminated: house.eliminated,
            })
        })
        .collect();

    FogOfWarView {
        house,
        turn: state.turn,
        visibility,
        visible_colonies,
        visible_fleets,
        public_houses,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexreach_contracts::Store;
    use hexreach_map::generate;
    use hexreach_model::{Colony, GameState, House, PlanetClass};

    #[test]
    fn owned_system_is_always_owned_tier_and_colony_is_visible() {
        let mut store = Store::new();
        let star_map = generate(&mut store, 1, 1, 1);
        let mut state = GameState::new(store, star_map);
        let hub = state.star_map.hub;
        let house = state.spawn_house(House::new("Atreides"));
        state.spawn_colony(Colony::new(house, hub, PlanetClass::Terran, 5));

        refresh_intelligence(&mut state, house);
        let view = project_fog_of_war(&state, house);
        assert_eq!(view.visibility[&hub], SystemVisibility::Owned);
        assert_eq!(view.visible_colonies.len(), 1);
    }

    #[test]
    fn far_unscouted_system_is_hidden_not_omitted() {
        let mut store = Store::new();
        let star_map = generate(&mut store, 2, 1, 1);
        let mut state = GameState::new(store, star_map);
        let house = state.spawn_house(House::new("Atreides"));
        let view = project_fog_of_war(&state, house);
        assert_eq!(view.visibility.len(), state.star_map.systems.len());
        assert!(view.visibility.values().any(|t| *t == SystemVisibility::Hidden));
    }
}
