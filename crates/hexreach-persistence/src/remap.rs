//! Entity-id translation for save/load round-trips.
//!
//! `GameState` addresses every entity through a `bevy_ecs::Entity`-backed
//! typed id. A reload rebuilds the `Store`'s `World`
//! from scratch, which allocates fresh `Entity` handles — so every id a
//! component embeds (an owner, a target system, a fleet's squadron list)
//! has to be rewritten from the ids recorded in the save file to the ones
//! the new `World` just handed out. This mirrors the scene-entity-mapper
//! pattern `bevy_ecs` itself uses for `DynamicScene` deserialization
//! (`MapEntities`/`EntityMapper`), written by hand here since this
//! workspace doesn't carry `bevy_scene`.

use std::collections::HashMap;

use bevy_ecs::entity::Entity;
use hexreach_contracts::{ColonyId, FacilityId, FleetId, HouseId, ProjectId, ScoutMissionId, ShipId, SquadronId, SystemId};
use hexreach_model::intel::IntelligenceDb;
use hexreach_model::{Colony, Facility, FacilityKind, Fleet, FleetOrder, House, Ship, Squadron, StandingOrder};

/// Maps an old (saved) entity to the one it was reallocated to on load.
/// Ids with no entry (shouldn't happen for a well-formed save) pass
/// through unchanged rather than panicking — a stale reference is a
/// save-file bug, not a reason to abort the whole load.
pub type EntityTable = HashMap<Entity, Entity>;

fn fix(table: &EntityTable, e: Entity) -> Entity {
    table.get(&e).copied().unwrap_or(e)
}

macro_rules! remap_fn {
    ($fn_name:ident, $ty:ty) => {
        pub fn $fn_name(table: &EntityTable, id: $ty) -> $ty {
            <$ty>::from(fix(table, id.entity()))
        }
    };
}

remap_fn!(remap_house, HouseId);
remap_fn!(remap_system, SystemId);
remap_fn!(remap_colony, ColonyId);
remap_fn!(remap_fleet, FleetId);
remap_fn!(remap_squadron, SquadronId);
remap_fn!(remap_ship, ShipId);
remap_fn!(remap_facility, FacilityId);
remap_fn!(remap_project, ProjectId);
remap_fn!(remap_scout_mission, ScoutMissionId);

/// Rewrites every id a component embeds, in place, using `table`.
pub trait Remap {
    fn remap(&mut self, table: &EntityTable);
}

impl Remap for House {
    fn remap(&mut self, table: &EntityTable) {
        self.diplomacy = self
            .diplomacy
            .drain()
            .map(|(other, relation)| (remap_house(table, other), relation))
            .collect();
        self.intel.remap(table);
    }
}

impl Remap for IntelligenceDb {
    fn remap(&mut self, table: &EntityTable) {
        self.colonies = self
            .colonies
            .drain()
            .map(|(colony, mut report)| {
                report.colony = remap_colony(table, report.colony);
                (remap_colony(table, colony), report)
            })
            .collect();
        self.systems = self
            .systems
            .drain()
            .map(|(system, mut report)| {
                report.system = remap_system(table, report.system);
                (remap_system(table, system), report)
            })
            .collect();
        self.fleets = self
            .fleets
            .drain()
            .map(|(fleet, mut report)| {
                report.fleet = remap_fleet(table, report.fleet);
                (remap_fleet(table, fleet), report)
            })
            .collect();
    }
}

impl Remap for Colony {
    fn remap(&mut self, table: &EntityTable) {
        self.owner = remap_house(table, self.owner);
        self.system = remap_system(table, self.system);
        self.facilities = self.facilities.iter().map(|&f| remap_facility(table, f)).collect();
        self.under_construction = self.under_construction.iter().map(|&p| remap_project(table, p)).collect();
        self.construction_queue = self.construction_queue.iter().map(|&p| remap_project(table, p)).collect();
        self.repair_queue = self.repair_queue.iter().map(|&f| remap_facility(table, f)).collect();
        self.unassigned_squadrons = self.unassigned_squadrons.iter().map(|&s| remap_squadron(table, s)).collect();
    }
}

impl Remap for Fleet {
    fn remap(&mut self, table: &EntityTable) {
        self.owner = remap_house(table, self.owner);
        self.system = remap_system(table, self.system);
        self.squadrons = self.squadrons.iter().map(|&s| remap_squadron(table, s)).collect();
        self.spacelift = self.spacelift.iter().map(|&s| remap_ship(table, s)).collect();
        if let Some(order) = &mut self.command {
            order.remap(table);
        }
        if let Some(standing) = &mut self.standing_order {
            standing.remap(table);
        }
    }
}

impl Remap for FleetOrder {
    fn remap(&mut self, table: &EntityTable) {
        match self {
            Self::Move { destination } | Self::Rally { destination } | Self::Retreat { destination } => {
                *destination = remap_system(table, *destination);
            }
            Self::Colonize { target } | Self::ScoutMission { target } => *target = remap_system(table, *target),
            Self::GuardPlanet { system } | Self::GuardStarbase { system } | Self::DefendSystem { system } | Self::InterceptRaid { system } => {
                *system = remap_system(table, *system);
            }
            Self::GuardColony { colony } | Self::BlockadePlanet { colony } | Self::Invade { colony } | Self::Bombard { colony } | Self::RefitAtColony { colony } => {
                *colony = remap_colony(table, *colony);
            }
            Self::Patrol { route } => *route = route.iter().map(|&s| remap_system(table, s)).collect(),
            Self::Escort { escorted } => *escorted = remap_fleet(table, *escorted),
            Self::Hold | Self::Disband | Self::SeekHome => {}
        }
    }
}

impl Remap for StandingOrder {
    fn remap(&mut self, table: &EntityTable) {
        match self {
            Self::PatrolRoute { waypoints } => *waypoints = waypoints.iter().map(|&s| remap_system(table, s)).collect(),
            Self::DefendSystem { system } => *system = remap_system(table, *system),
            Self::AutoColonize { target } => *target = remap_system(table, *target),
            Self::GuardColony { colony } => *colony = remap_colony(table, *colony),
            Self::Hold => {}
        }
    }
}

impl Remap for Squadron {
    fn remap(&mut self, table: &EntityTable) {
        self.fleet = remap_fleet(table, self.fleet);
        self.flagship = remap_ship(table, self.flagship);
        self.subordinates = self.subordinates.iter().map(|&s| remap_ship(table, s)).collect();
        self.embarked_fighters = self.embarked_fighters.iter().map(|&s| remap_squadron(table, s)).collect();
    }
}

impl Remap for Facility {
    fn remap(&mut self, table: &EntityTable) {
        self.colony = remap_colony(table, self.colony);
        match &mut self.kind {
            FacilityKind::Neoria(n) => {
                n.active_constructions = n.active_constructions.iter().map(|&p| remap_project(table, p)).collect();
                n.construction_queue = n.construction_queue.iter().map(|&p| remap_project(table, p)).collect();
                n.repairs = n.repairs.iter().map(|&p| remap_project(table, p)).collect();
            }
            FacilityKind::Kastra(_) => {}
        }
    }
}

impl Remap for hexreach_model::ConstructionProject {
    fn remap(&mut self, table: &EntityTable) {
        self.owner = remap_house(table, self.owner);
        self.colony = remap_colony(table, self.colony);
        self.anchor = match self.anchor {
            hexreach_model::ProjectAnchor::Facility(f) => hexreach_model::ProjectAnchor::Facility(remap_facility(table, f)),
            hexreach_model::ProjectAnchor::Colony(c) => hexreach_model::ProjectAnchor::Colony(remap_colony(table, c)),
        };
    }
}

impl Remap for hexreach_intel::ScoutMission {
    fn remap(&mut self, table: &EntityTable) {
        self.house = remap_house(table, self.house);
        self.squadron = remap_squadron(table, self.squadron);
        self.target_colony = remap_colony(table, self.target_colony);
        self.target_system = remap_system(table, self.target_system);
        self.current = remap_system(table, self.current);
        self.remaining_path = self.remaining_path.iter().map(|&s| remap_system(table, s)).collect();
    }
}

/// Ships carry no embedded ids of their own — ownership and the fleet
/// they belong to are tracked externally (`GameState::ships_by_owner`,
/// `Squadron::subordinates`/`flagship`).
impl Remap for Ship {
    fn remap(&mut self, _table: &EntityTable) {}
}

impl Remap for hexreach_map::SystemNode {
    fn remap(&mut self, table: &EntityTable) {
        self.assigned_player = self.assigned_player.map(|h| remap_house(table, h));
    }
}
