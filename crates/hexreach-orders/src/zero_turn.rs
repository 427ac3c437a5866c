//! Zero-turn logistics commands.
//!
//! Nine commands execute before turn resolution, mutating state
//! atomically. Each has a location class: "same-location" commands need
//! no friendly colony (Detach, Transfer, Merge, TransferFighters);
//! "colony-required" commands do (Load/Unload cargo and fighters,
//! Reactivate — see `ZeroTurnCommand::requires_friendly_colony`).
//! Validation is layered: ownership -> location class -> command-specific.

use bevy_log::{info, warn};
use hexreach_contracts::{ColonyId, FleetId, HouseId, ShipId, SquadronId, SystemId};
use hexreach_model::{
    Colony, Fleet, FleetStatus, GameState, Ship, Squadron, SquadronType, SpecialCapability,
    ZeroTurnCommand,
};

/// What a zero-turn command produced, for the per-order tally in the
/// event log.
#[derive(Debug, Clone)]
pub enum ZeroTurnOutcome {
    Detached { new_fleet: FleetId },
    Transferred { squadron_count: usize },
    Merged,
    CargoLoaded { pu: u32 },
    CargoUnloaded { pu: u32 },
    FightersLoaded { count: usize },
    FightersUnloaded { count: usize },
    FightersTransferred { count: usize },
    Reactivated,
}

#[derive(Debug, Clone)]
pub struct ZeroTurnResult {
    pub command_kind: &'static str,
    pub outcome: Result<ZeroTurnOutcome, String>,
}

fn ok(kind: &'static str, outcome: ZeroTurnOutcome) -> ZeroTurnResult {
    info!("zero-turn command {kind} applied: {outcome:?}");
    ZeroTurnResult {
        command_kind: kind,
        outcome: Ok(outcome),
    }
}

fn err(kind: &'static str, reason: impl Into<String>) -> ZeroTurnResult {
    let reason = reason.into();
    warn!("zero-turn command {kind} rejected: {reason}");
    ZeroTurnResult {
        command_kind: kind,
        outcome: Err(reason),
    }
}

fn owned_fleet(state: &GameState, house: HouseId, fleet: FleetId) -> Result<&Fleet, String> {
    let data = state.store.get::<Fleet>(fleet.0).ok_or("unknown fleet")?;
    if data.owner != house {
        return Err("fleet not owned by this house".into());
    }
    Ok(data)
}

fn friendly_colony_at(state: &GameState, house: HouseId, system: SystemId) -> Option<ColonyId> {
    let colony = *state.colonies_by_system.get(&system)?;
    let data = state.store.get::<Colony>(colony.0)?;
    (data.owner == house).then_some(colony)
}

/// Fighter-bay capacity of a squadron's flagship, or 0 if it carries none.
fn hangar_capacity(state: &GameState, flagship: ShipId) -> u32 {
    state
        .store
        .get::<Ship>(flagship.0)
        .map_or(0, |ship| match ship.stats.special {
            SpecialCapability::Carrier { fighter_bays } => fighter_bays,
            _ => 0,
        })
}

/// Applies one house's zero-turn command against `state`, mutating it
/// immediately (these execute before turn resolution, not during it).
pub fn apply(state: &mut GameState, house: HouseId, command: ZeroTurnCommand) -> ZeroTurnResult {
    match command {
        ZeroTurnCommand::Detach { fleet, squadrons } => detach(state, house, fleet, squadrons),
        ZeroTurnCommand::Transfer {
            squadrons,
            from_fleet,
            to_fleet,
        } => transfer(state, house, squadrons, from_fleet, to_fleet),
        ZeroTurnCommand::Merge {
            from_fleet,
            into_fleet,
        } => merge(state, house, from_fleet, into_fleet),
        ZeroTurnCommand::LoadCargo { fleet, colony, pu } => load_cargo(state, house, fleet, colony, pu),
        ZeroTurnCommand::UnloadCargo { fleet, colony, pu } => {
            unload_cargo(state, house, fleet, colony, pu)
        }
        ZeroTurnCommand::LoadFighters {
            carrier_squadron,
            fighter_squadrons,
        } => load_fighters(state, house, carrier_squadron, fighter_squadrons),
        ZeroTurnCommand::UnloadFighters {
            carrier_squadron,
            fighter_squadrons,
            colony,
        } => unload_fighters(state, house, carrier_squadron, fighter_squadrons, colony),
        ZeroTurnCommand::TransferFighters {
            from_carrier,
            to_carrier,
            fighter_squadrons,
        } => transfer_fighters(state, house, from_carrier, to_carrier, fighter_squadrons),
        ZeroTurnCommand::Reactivate { fleet, colony } => reactivate(state, house, fleet, colony),
    }
}

fn detach(
    state: &mut GameState,
    house: HouseId,
    fleet: FleetId,
    squadrons: Vec<SquadronId>,
) -> ZeroTurnResult {
    const KIND: &str = "Detach";
    let Ok(source) = owned_fleet(state, house, fleet) else {
        return err(KIND, "unknown fleet or not owned by this house");
    };
    if squadrons.is_empty() {
        return err(KIND, "at least one squadron must be detached");
    }
    if !squadrons.iter().all(|s| source.squadrons.contains(s)) {
        return err(KIND, "squadron does not belong to the source fleet");
    }
    let system = source.system;

    state.with_fleet_mut(fleet, |f| {
        f.squadrons.retain(|s| !squadrons.contains(s));
    });
    let mut new_fleet = Fleet::new(house, system);
    new_fleet.squadrons = squadrons;
    let new_fleet_id = state.spawn_fleet(new_fleet);
    ok(KIND, ZeroTurnOutcome::Detached { new_fleet: new_fleet_id })
}

fn transfer(
    state: &mut GameState,
    house: HouseId,
    squadrons: Vec<SquadronId>,
    from_fleet: FleetId,
    to_fleet: FleetId,
) -> ZeroTurnResult {
    const KIND: &str = "Transfer";
    if from_fleet == to_fleet {
        return err(KIND, "source and destination fleets are the same");
    }
    let Ok(from) = owned_fleet(state, house, from_fleet) else {
        return err(KIND, "unknown source fleet or not owned by this house");
    };
    let Ok(to) = owned_fleet(state, house, to_fleet) else {
        return err(KIND, "unknown destination fleet or not owned by this house");
    };
    if from.system != to.system {
        return err(KIND, "fleets are not at the same location");
    }
    if !squadrons.iter().all(|s| from.squadrons.contains(s)) {
        return err(KIND, "squadron does not belong to the source fleet");
    }
    let count = squadrons.len();

    state.with_fleet_mut(from_fleet, |f| {
        f.squadrons.retain(|s| !squadrons.contains(s));
    });
    state.with_fleet_mut(to_fleet, |f| {
        f.squadrons.extend(squadrons.iter().copied());
    });
    for sq_id in &squadrons {
        if let Some(mut sq) = state.store.get_mut::<Squadron>(sq_id.0) {
            sq.fleet = to_fleet;
        }
    }
    ok(KIND, ZeroTurnOutcome::Transferred { squadron_count: count })
}

fn merge(
    state: &mut GameState,
    house: HouseId,
    from_fleet: FleetId,
    into_fleet: FleetId,
) -> ZeroTurnResult {
    const KIND: &str = "Merge";
    if from_fleet == into_fleet {
        return err(KIND, "cannot merge a fleet into itself");
    }
    let Ok(from) = owned_fleet(state, house, from_fleet) else {
        return err(KIND, "unknown source fleet or not owned by this house");
    };
    let Ok(into) = owned_fleet(state, house, into_fleet) else {
        return err(KIND, "unknown destination fleet or not owned by this house");
    };
    if from.system != into.system {
        return err(KIND, "fleets are not at the same location");
    }
    let squadrons = from.squadrons.clone();
    let spacelift = from.spacelift.clone();

    state.with_fleet_mut(into_fleet, |f| {
        f.squadrons.extend(squadrons.iter().copied());
        f.spacelift.extend(spacelift.iter().copied());
    });
    for sq_id in &squadrons {
        if let Some(mut sq) = state.store.get_mut::<Squadron>(sq_id.0) {
            sq.fleet = into_fleet;
        }
    }
    state.despawn_fleet(from_fleet);
    ok(KIND, ZeroTurnOutcome::Merged)
}

fn load_cargo(
    state: &mut GameState,
    house: HouseId,
    fleet: FleetId,
    colony: ColonyId,
    pu: u32,
) -> ZeroTurnResult {
    const KIND: &str = "LoadCargo";
    if pu == 0 {
        return err(KIND, "pu must be at least 1");
    }
    let Ok(fleet_data) = owned_fleet(state, house, fleet) else {
        return err(KIND, "unknown fleet or not owned by this house");
    };
    match friendly_colony_at(state, house, fleet_data.system) {
        Some(c) if c == colony => {}
        _ => return err(KIND, "fleet is not at a friendly colony"),
    }
    let Some(colony_data) = state.store.get::<Colony>(colony.0) else {
        return err(KIND, "unknown colony");
    };
    if colony_data.pu <= pu {
        return err(KIND, "loading would leave the colony with 0 PU");
    }
    let Some(&ship_id) = fleet_data
        .spacelift
        .iter()
        .find(|s| state.store.get::<Ship>(s.0).is_some_and(Ship::is_spacelift))
    else {
        return err(KIND, "fleet has no spacelift ship to carry cargo");
    };
    let Some(ship) = state.store.get::<Ship>(ship_id.0) else {
        return err(KIND, "spacelift ship vanished mid-validation");
    };
    if ship.remaining_cargo_capacity() < pu {
        return err(KIND, "spacelift ship lacks sufficient cargo capacity");
    }

    state.with_colony_mut(colony, |c| c.pu -= pu);
    if let Some(mut ship) = state.store.get_mut::<Ship>(ship_id.0) {
        ship.cargo_pu += pu;
    }
    ok(KIND, ZeroTurnOutcome::CargoLoaded { pu })
}

fn unload_cargo(
    state: &mut GameState,
    house: HouseId,
    fleet: FleetId,
    colony: ColonyId,
    pu: u32,
) -> ZeroTurnResult {
    const KIND: &str = "UnloadCargo";
    if pu == 0 {
        return err(KIND, "pu must be at least 1");
    }
    let Ok(fleet_data) = owned_fleet(state, house, fleet) else {
        return err(KIND, "unknown fleet or not owned by this house");
    };
    match friendly_colony_at(state, house, fleet_data.system) {
        Some(c) if c == colony => {}
        _ => return err(KIND, "fleet is not at a friendly colony"),
    }
    let Some(&ship_id) = fleet_data
        .spacelift
        .iter()
        .find(|s| state.store.get::<Ship>(s.0).is_some_and(|ship| ship.cargo_pu > 0))
    else {
        return err(KIND, "fleet has no spacelift ship carrying cargo");
    };
    let Some(ship) = state.store.get::<Ship>(ship_id.0) else {
        return err(KIND, "spacelift ship vanished mid-validation");
    };
    if ship.cargo_pu < pu {
        return err(KIND, "ship is not carrying that much cargo");
    }

    if let Some(mut ship) = state.store.get_mut::<Ship>(ship_id.0) {
        ship.cargo_pu -= pu;
    }
    state.with_colony_mut(colony, |c| c.pu += pu);
    ok(KIND, ZeroTurnOutcome::CargoUnloaded { pu })
}

fn load_fighters(
    state: &mut GameState,
    house: HouseId,
    carrier_squadron: SquadronId,
    fighter_squadrons: Vec<SquadronId>,
) -> ZeroTurnResult {
    const KIND: &str = "LoadFighters";
    if fighter_squadrons.is_empty() {
        return err(KIND, "at least one fighter squadron required");
    }
    let Some(carrier) = state.store.get::<Squadron>(carrier_squadron.0) else {
        return err(KIND, "unknown carrier squadron");
    };
    let Ok(fleet) = owned_fleet(state, house, carrier.fleet) else {
        return err(KIND, "carrier squadron's fleet not owned by this house");
    };
    let capacity = hangar_capacity(state, carrier.flagship);
    if capacity == 0 {
        return err(KIND, "carrier squadron's flagship has no fighter bays");
    }
    if carrier.embarked_fighters.len() + fighter_squadrons.len() > capacity as usize {
        return err(KIND, "hangar capacity exceeded");
    }
    let carrier_system = fleet.system;
    for &fighter_id in &fighter_squadrons {
        let Some(fighter) = state.store.get::<Squadron>(fighter_id.0) else {
            return err(KIND, "unknown fighter squadron");
        };
        if fighter.squadron_type != SquadronType::Fighter {
            return err(KIND, "squadron is not a Fighter-type squadron");
        }
        let Some(fighter_fleet) = state.store.get::<Fleet>(fighter.fleet.0) else {
            return err(KIND, "fighter squadron's fleet no longer exists");
        };
        if fighter_fleet.system != carrier_system {
            return err(KIND, "fighter squadron is not co-located with the carrier");
        }
    }
    let count = fighter_squadrons.len();
    if let Some(mut carrier) = state.store.get_mut::<Squadron>(carrier_squadron.0) {
        carrier.embarked_fighters.extend(fighter_squadrons.iter().copied());
    }
    ok(KIND, ZeroTurnOutcome::FightersLoaded { count })
}

fn unload_fighters(
    state: &mut GameState,
    house: HouseId,
    carrier_squadron: SquadronId,
    fighter_squadrons: Vec<SquadronId>,
    colony: ColonyId,
) -> ZeroTurnResult {
    const KIND: &str = "UnloadFighters";
    let Some(carrier) = state.store.get::<Squadron>(carrier_squadron.0) else {
        return err(KIND, "unknown carrier squadron");
    };
    let Ok(fleet) = owned_fleet(state, house, carrier.fleet) else {
        return err(KIND, "carrier squadron's fleet not owned by this house");
    };
    match friendly_colony_at(state, house, fleet.system) {
        Some(c) if c == colony => {}
        _ => return err(KIND, "carrier is not at a friendly colony"),
    }
    if !fighter_squadrons.iter().all(|f| carrier.embarked_fighters.contains(f)) {
        return err(KIND, "fighter squadron is not embarked on this carrier");
    }
    let count = fighter_squadrons.len();
    if let Some(mut carrier) = state.store.get_mut::<Squadron>(carrier_squadron.0) {
        carrier.embarked_fighters.retain(|f| !fighter_squadrons.contains(f));
    }
    ok(KIND, ZeroTurnOutcome::FightersUnloaded { count })
}

fn transfer_fighters(
    state: &mut GameState,
    house: HouseId,
    from_carrier: SquadronId,
    to_carrier: SquadronId,
    fighter_squadrons: Vec<SquadronId>,
) -> ZeroTurnResult {
    const KIND: &str = "TransferFighters";
    if from_carrier == to_carrier {
        return err(KIND, "source and destination carriers are the same");
    }
    let Some(from) = state.store.get::<Squadron>(from_carrier.0) else {
        return err(KIND, "unknown source carrier squadron");
    };
    let Ok(from_fleet) = owned_fleet(state, house, from.fleet) else {
        return err(KIND, "source carrier's fleet not owned by this house");
    };
    let Some(to) = state.store.get::<Squadron>(to_carrier.0) else {
        return err(KIND, "unknown destination carrier squadron");
    };
    let Ok(to_fleet) = owned_fleet(state, house, to.fleet) else {
        return err(KIND, "destination carrier's fleet not owned by this house");
    };
 // Carrier-to-carrier shuttle is allowed in deep space:
    // same-location is the only geometric constraint, no colony required.
    if from_fleet.system != to_fleet.system {
        return err(KIND, "carriers are not co-located");
    }
    if !fighter_squadrons.iter().all(|f| from.embarked_fighters.contains(f)) {
        return err(KIND, "fighter squadron is not embarked on the source carrier");
    }
    let destination_capacity = hangar_capacity(state, to.flagship);
    if to.embarked_fighters.len() + fighter_squadrons.len() > destination_capacity as usize {
        return err(KIND, "destination hangar capacity exceeded");
    }
    let count = fighter_squadrons.len();

    if let Some(mut from) = state.store.get_mut::<Squadron>(from_carrier.0) {
        from.embarked_fighters.retain(|f| !fighter_squadrons.contains(f));
    }
    if let Some(mut to) = state.store.get_mut::<Squadron>(to_carrier.0) {
        to.embarked_fighters.extend(fighter_squadrons.iter().copied());
    }
    ok(KIND, ZeroTurnOutcome::FightersTransferred { count })
}

fn reactivate(state: &mut GameState, house: HouseId, fleet: FleetId, colony: ColonyId) -> ZeroTurnResult {
    const KIND: &str = "Reactivate";
    let Ok(fleet_data) = owned_fleet(state, house, fleet) else {
        return err(KIND, "unknown fleet or not owned by this house");
    };
    if fleet_data.status == FleetStatus::Active {
        return err(KIND, "fleet is already Active");
    }
    match friendly_colony_at(state, house, fleet_data.system) {
        Some(c) if c == colony => {}
        _ => return err(KIND, "fleet is not at a friendly colony to refit"),
    }
    state.with_fleet_mut(fleet, |f| f.status = FleetStatus::Active);
    ok(KIND, ZeroTurnOutcome::Reactivated)
}
