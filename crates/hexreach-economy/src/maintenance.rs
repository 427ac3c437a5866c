//! Maintenance debiting: ship upkeep scaled by fleet status
//! tier, facility upkeep scaled by class, treasury may go negative with
//! morale/prestige consequences tracked via events.

use bevy_log::warn;
use hexreach_config::ConfigSnapshot;
use hexreach_contracts::{EventKind, EventLog, HouseId};
use hexreach_model::{Facility, FacilityKind, FleetStatus, GameState, House};

/// Treasury debt sustained this many consecutive turns triggers the
/// warning event.
const DEBT_WARNING_TURNS: u32 = 3;

fn status_multiplier(status: FleetStatus, tiers: &hexreach_config::economy_tables::MaintenanceTiers) -> f32 {
    match status {
        FleetStatus::Active => tiers.active_pct,
        FleetStatus::Reserve => tiers.reserve_pct,
        FleetStatus::Mothballed => tiers.mothballed_pct,
    }
}

fn facility_multiplier(facility: &Facility, config: &ConfigSnapshot) -> f32 {
    match &facility.kind {
        FacilityKind::Neoria(n) => {
            let cfg = match n.kind {
                hexreach_model::NeoriaKind::Spaceport => &config.facilities.spaceport,
                hexreach_model::NeoriaKind::Shipyard => &config.facilities.shipyard,
                hexreach_model::NeoriaKind::Drydock => &config.facilities.drydock,
            };
            cfg.as_ref().map_or(1.0, |c| c.maintenance_multiplier)
        }
        FacilityKind::Kastra(_) => config.facilities.starbase.as_ref().map_or(1.0, |c| c.maintenance_multiplier),
    }
}

/// Computes total maintenance owed by a house this turn across every ship
/// and facility it owns, without mutating anything.
#[must_use]
pub fn compute_maintenance(state: &GameState, house: HouseId, config: &ConfigSnapshot) -> i64 {
    let mut total = 0.0f64;

    for &fleet_id in state.fleets_by_owner.get(&house).into_iter().flatten() {
        let Some(fleet) = state.store.get::<hexreach_model::Fleet>(fleet_id.0) else {
            continue;
        };
        let multiplier = f64::from(status_multiplier(fleet.status, &config.maintenance));
        for &squadron_id in &fleet.squadrons {
            let Some(squadron) = state.store.get::<hexreach_model::Squadron>(squadron_id.0) else {
                continue;
            };
            for ship_id in std::iter::once(squadron.flagship).chain(squadron.subordinates.iter().copied()) {
                let Some(ship) = state.store.get::<hexreach_model::Ship>(ship_id.0) else {
                    continue;
                };
                let base = config.ships.get(&ship.class_name).map_or(0, |c| c.base_maintenance_pp);
                total += f64::from(base) * multiplier;
            }
        }
    }

    for &colony_id in state.colonies_by_owner.get(&house).into_iter().flatten() {
        for &facility_id in state.facilities_by_colony.get(&colony_id).into_iter().flatten() {
            let Some(facility) = state.store.get::<Facility>(facility_id.0) else {
                continue;
            };
            if facility.is_destroyed() {
                continue;
            }
            let multiplier = facility_multiplier(facility, config);
            total += f64::from(multiplier);
        }
    }

    total.round() as i64
}

/// Debits a house's treasury for this turn's maintenance, logging and
/// emitting a warning event once debt has persisted `DEBT_WARNING_TURNS`
/// consecutive turns. Tracks the streak on the house itself so callers
/// don't need to carry a counter across turns by hand.
pub fn debit_maintenance(house_id: HouseId, house: &mut House, due: i64, events: &mut EventLog) {
    house.treasury -= due;
    if house.treasury < 0 {
        house.consecutive_debt_turns += 1;
    } else {
        house.consecutive_debt_turns = 0;
    }
    if house.treasury < 0 && house.consecutive_debt_turns >= DEBT_WARNING_TURNS {
        warn!(house = %house.name, treasury = house.treasury, "sustained treasury debt");
        events.push(
            vec![house_id],
            None,
            None,
            None,
            EventKind::TreasuryDebtWarning { treasury: house.treasury },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexreach_contracts::{EventPhase, Store};
    use hexreach_config::ShipClassConfig;
    use hexreach_map::generate;
    use hexreach_model::{Fleet, Ship, ShipCombatState, ShipStats, SpecialCapability, Squadron, SquadronType};

    #[test]
    fn mothballed_fleets_pay_zero_maintenance() {
        let mut store = Store::new();
        let star_map = generate(&mut store, 1, 1, 1);
        let mut state = GameState::new(store, star_map);
        let hub = state.star_map.hub;
        let house = state.spawn_house(House::new("A"));
        let mut config = ConfigSnapshot::default();
        config.ships.classes.push(ShipClassConfig {
            name: "Frigate".into(),
            attack_strength: 1,
            defense_strength: 1,
            command_cost: 1,
            carry_limit: 0,
            is_spacelift: false,
            is_scout: false,
            is_fighter: false,
            base_cost_pp: 5,
            base_maintenance_pp: 2,
        });

        let fleet_id = state.spawn_fleet(Fleet::new(house, hub));
        state.with_fleet_mut(fleet_id, |f| f.status = FleetStatus::Mothballed);
        let ship_id = state.spawn_ship(
            house,
            Ship {
                class_name: "Frigate".into(),
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
            },
        );
        let squadron_id = state.spawn_squadron(house, Squadron::new(fleet_id, SquadronType::Combat, ship_id));
        state.with_fleet_mut(fleet_id, |f| f.squadrons.push(squadron_id));

        assert_eq!(compute_maintenance(&state, house, &config), 0);
    }

    #[test]
    fn sustained_debt_emits_warning_event() {
        let mut house = House::new("A");
        house.treasury = -10;
        house.consecutive_debt_turns = DEBT_WARNING_TURNS - 1;
        let mut events = EventLog::new();
        events.begin_phase(EventPhase::Maintenance);
        debit_maintenance(HouseId(bevy_ecs::entity::Entity::from_raw(0)), &mut house, 5, &mut events);
        assert_eq!(events.events().len(), 1);
    }

    #[test]
    fn positive_treasury_resets_the_debt_streak() {
        let mut house = House::new("A");
        house.consecutive_debt_turns = 5;
        house.treasury = 100;
        let mut events = EventLog::new();
        events.begin_phase(EventPhase::Maintenance);
        debit_maintenance(HouseId(bevy_ecs::entity::Entity::from_raw(0)), &mut house, 5, &mut events);
        assert_eq!(house.consecutive_debt_turns, 0);
        assert!(events.events().is_empty());
    }
}
