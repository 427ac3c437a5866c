//! `hexreach new`: generates a galaxy, seats one house per `--house` flag
//! on an outer-ring corner, founds each house's homeworld colony and
//! starting fleet from the config snapshot's [`GameSetup`], and writes
//! the opening save.
//!
//! Ship/facility commissioning here is grounded on
//! `hexreach_economy::construction::commission_ship`'s pattern (spawn a
//! ship, wrap it in a single-ship squadron inside a fresh fleet, or push
//! spacelift hulls straight onto the fleet) but runs directly against
//! `GameState` rather than through a `ConstructionProject` — there is no
//! queue to drain at game init, the house simply starts with these
//! assets already commissioned.

use std::collections::VecDeque;
use std::path::Path;

use anyhow::{bail, Context};
use bevy_log::info;
use hexreach_config::{ConfigSnapshot, GameSetup};
use hexreach_contracts::{HouseId, Store, SystemId};
use hexreach_map::{self, SystemNode};
use hexreach_model::{
    Colony, Facility, FacilityKind, Fleet, GameState, House, Kastra, Neoria, NeoriaKind,
    PlanetClass, Ship, ShipCombatState, ShipStats, Squadron, SquadronType,
};
use hexreach_persistence::{capture, FilesystemProvider, GameStateFile, StorageConfig, StorageProvider, StorageSource};

pub fn run(
    name: &str,
    houses: &[String],
    ring_count_override: Option<u32>,
    seed_override: Option<u64>,
    config_path: Option<&Path>,
    save_dir: &Path,
) -> anyhow::Result<()> {
    if houses.is_empty() {
        bail!("at least one --house is required");
    }

    let mut config = match config_path {
        Some(path) => ConfigSnapshot::load(path)?,
        None => ConfigSnapshot::default(),
    };
    if let Some(rc) = ring_count_override {
        config.setup.ring_count = rc;
    }
    if let Some(seed) = seed_override {
        config.setup.master_seed = seed;
    }

    let mut store = Store::new();
    let star_map = hexreach_map::generate(&mut store, config.setup.ring_count, houses.len(), config.setup.master_seed);
    let mut state = GameState::new(store, star_map);

    for (slot, house_name) in houses.iter().enumerate() {
        let house_id = found_house(&mut state, &config, house_name, slot);
        info!(house = %house_name, "seated house");
        let _ = house_id;
    }

    let snapshot = capture(&state, config.setup.master_seed);
    let file = GameStateFile::new(name, snapshot);
    let provider = FilesystemProvider::new(StorageConfig {
        base_dir: save_dir.to_path_buf(),
        source: StorageSource::ProjectLocal,
    });
    let path = provider.save(name, &file).context("writing opening save")?;
    println!("Wrote {}", path.display());
    for house_name in houses {
        println!("  house: {house_name}");
    }
    Ok(())
}

/// Seats one house on the corner system `generate` trimmed for slot
/// `slot`, founds its homeworld colony, starting facilities, and starting
/// fleet per `config.setup`.
fn found_house(state: &mut GameState, config: &ConfigSnapshot, name: &str, slot: usize) -> HouseId {
    let setup: &GameSetup = &config.setup;

    let mut house = House::new(name);
    house.treasury = setup.starting_treasury;
    house.tech.economic_level = setup.starting_economic_level;
    house.tech.science_level = setup.starting_science_level;
    let house_id = state.spawn_house(house);

    let home_system = home_system_for_slot(state, setup.ring_count, slot);
    hexreach_map::assign_player(&mut state.store, home_system, house_id);

    let colony_id = state.spawn_colony(Colony::new(house_id, home_system, PlanetClass::Terran, 5));
    state.with_colony_mut(colony_id, |c| {
        c.pu = setup.starting_pu;
        c.iu = setup.starting_iu;
    });

    for facility_name in &setup.starting_facilities {
        if let Some(kind) = facility_kind_for_name(facility_name, config) {
            let facility_id = state.spawn_facility(colony_id, Facility { colony: colony_id, kind });
            state.with_colony_mut(colony_id, |c| c.facilities.push(facility_id));
        }
    }

    for entry in &setup.starting_fleet {
        for _ in 0..entry.count {
            commission_starting_ship(state, house_id, colony_id, home_system, &entry.ship_class, config);
        }
    }

    house_id
}

/// Recomputes the corner system `hexreach_map::generate` seated for
/// `slot` (`generate` trims the system's lanes but does not hand the id
/// back to the caller), by matching coordinates rather than duplicating
/// the lane-trimming logic.
fn home_system_for_slot(state: &GameState, ring_count: u32, slot: usize) -> SystemId {
    let corner = hexreach_map::HexCoord::ORIGIN.ring_corner(ring_count, slot % 6);
    state
        .star_map
        .systems
        .iter()
        .copied()
        .find(|&id| state.store.get::<SystemNode>(id.0).is_some_and(|n| n.coord == corner))
        .unwrap_or(state.star_map.hub)
}

fn facility_kind_for_name(name: &str, config: &ConfigSnapshot) -> Option<FacilityKind> {
    match name {
        "Spaceport" => Some(FacilityKind::Neoria(Neoria {
            kind: NeoriaKind::Spaceport,
            docks: config.facilities.spaceport.as_ref().map_or(2, |c| c.docks),
            active_constructions: Vec::new(),
            construction_queue: VecDeque::new(),
            repairs: VecDeque::new(),
            state: ShipCombatState::Undamaged,
        })),
        "Shipyard" => Some(FacilityKind::Neoria(Neoria {
            kind: NeoriaKind::Shipyard,
            docks: config.facilities.shipyard.as_ref().map_or(3, |c| c.docks),
            active_constructions: Vec::new(),
            construction_queue: VecDeque::new(),
            repairs: VecDeque::new(),
            state: ShipCombatState::Undamaged,
        })),
        "Drydock" => Some(FacilityKind::Neoria(Neoria {
            kind: NeoriaKind::Drydock,
            docks: config.facilities.drydock.as_ref().map_or(1, |c| c.docks),
            active_constructions: Vec::new(),
            construction_queue: VecDeque::new(),
            repairs: VecDeque::new(),
            state: ShipCombatState::Undamaged,
        })),
        "Starbase" => Some(FacilityKind::Kastra(Kastra {
            attack_strength: 4,
            defense_strength: 6,
            state: ShipCombatState::Undamaged,
        })),
        _ => None,
    }
}

fn commission_starting_ship(
    state: &mut GameState,
    owner: HouseId,
    colony_id: hexreach_contracts::ColonyId,
    system: SystemId,
    class_name: &str,
    config: &ConfigSnapshot,
) {
    let cfg = config.ships.get(class_name);
    let stats = ShipStats {
        attack_strength: cfg.map_or(1, |c| c.attack_strength),
        defense_strength: cfg.map_or(1, |c| c.defense_strength),
        command_cost: cfg.map_or(1, |c| c.command_cost),
        carry_limit: cfg.map_or(0, |c| c.carry_limit),
        special: match cfg {
            Some(c) if c.is_spacelift => hexreach_model::SpecialCapability::Transport {
                cargo_capacity: c.carry_limit,
            },
            Some(c) if c.is_scout => hexreach_model::SpecialCapability::Scout,
            _ => hexreach_model::SpecialCapability::None,
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

    if matches!(stats.special, hexreach_model::SpecialCapability::Transport { .. }) {
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
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn home_system_for_slot_matches_the_ring_corner_generate_seats() {
        let mut store = Store::new();
        let star_map = hexreach_map::generate(&mut store, 3, 2, 42);
        let state = GameState::new(store, star_map);

        for slot in 0..6 {
            let found = home_system_for_slot(&state, 3, slot);
            let coord = state.store.get::<SystemNode>(found.0).unwrap().coord;
            assert_eq!(coord, hexreach_map::HexCoord::ORIGIN.ring_corner(3, slot));
        }
    }

    #[test]
    fn found_house_seeds_treasury_colony_and_starting_fleet() {
        let mut store = Store::new();
        let star_map = hexreach_map::generate(&mut store, 3, 1, 7);
        let mut state = GameState::new(store, star_map);
        let config = ConfigSnapshot::default();

        let house_id = found_house(&mut state, &config, "House Atreides", 0);

        let house = state.store.get::<House>(house_id.0).unwrap();
        assert_eq!(house.treasury, config.setup.starting_treasury);

        let colonies = state.colonies_by_owner.get(&house_id).cloned().unwrap_or_default();
        assert_eq!(colonies.len(), 1);
        let colony = state.store.get::<Colony>(colonies[0].0).unwrap();
        assert_eq!(colony.owner, house_id);
        assert_eq!(colony.pu, config.setup.starting_pu);
        assert_eq!(colony.iu, config.setup.starting_iu);
        assert_eq!(colony.facilities.len(), config.setup.starting_facilities.len());

        let starting_ship_count: u32 = config.setup.starting_fleet.iter().map(|e| e.count).sum();
        let ships = state.ships_by_owner.get(&house_id).cloned().unwrap_or_default();
        assert_eq!(ships.len(), starting_ship_count as usize);
    }

    #[test]
    fn facility_kind_for_name_covers_every_setup_default() {
        let config = ConfigSnapshot::default();
        assert!(matches!(facility_kind_for_name("Spaceport", &config), Some(FacilityKind::Neoria(_))));
        assert!(matches!(facility_kind_for_name("Starbase", &config), Some(FacilityKind::Kastra(_))));
        assert!(facility_kind_for_name("NoSuchFacility", &config).is_none());
    }
}
