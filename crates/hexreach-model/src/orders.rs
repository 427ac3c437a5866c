//! Order/CommandPacket types (C3) and StandingOrder. 
//!
//! 19 fleet-order kinds and 9 zero-turn-command kinds are modeled as
//! exhaustively-matched tagged variants, never as trait objects — determinism requires
//! that every variant be handled explicitly.

use hexreach_contracts::{ColonyId, FleetId, HouseId, ShipId, SquadronId, SystemId};
use serde::{Deserialize, Serialize};

use crate::house::DiplomaticState;

// ---------------------------------------------------------------------------
// Fleet orders (19 kinds)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum FleetOrder {
    Move { destination: SystemId },
    Colonize { target: SystemId },
    GuardPlanet { system: SystemId },
    GuardColony { colony: ColonyId },
    GuardStarbase { system: SystemId },
    BlockadePlanet { colony: ColonyId },
    Patrol { route: Vec<SystemId> },
    Hold,
    DefendSystem { system: SystemId },
    Invade { colony: ColonyId },
    Bombard { colony: ColonyId },
    ScoutMission { target: SystemId },
    Rally { destination: SystemId },
    Escort { escorted: FleetId },
    InterceptRaid { system: SystemId },
    Retreat { destination: SystemId },
    Disband,
    RefitAtColony { colony: ColonyId },
    SeekHome,
}

impl FleetOrder {
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Move { .. } => "Move",
            Self::Colonize { .. } => "Colonize",
            Self::GuardPlanet { .. } => "GuardPlanet",
            Self::GuardColony { .. } => "GuardColony",
            Self::GuardStarbase { .. } => "GuardStarbase",
            Self::BlockadePlanet { .. } => "BlockadePlanet",
            Self::Patrol { .. } => "Patrol",
            Self::Hold => "Hold",
            Self::DefendSystem { .. } => "DefendSystem",
            Self::Invade { .. } => "Invade",
            Self::Bombard { .. } => "Bombard",
            Self::ScoutMission { .. } => "ScoutMission",
            Self::Rally { .. } => "Rally",
            Self::Escort { .. } => "Escort",
            Self::InterceptRaid { .. } => "InterceptRaid",
            Self::Retreat { .. } => "Retreat",
            Self::Disband => "Disband",
            Self::RefitAtColony { .. } => "RefitAtColony",
            Self::SeekHome => "SeekHome",
        }
    }

    /// True for missions whose target is a specific system/colony that can
 /// become unsound if ownership changes.
    #[must_use]
    pub fn is_seek_home_eligible(&self) -> bool {
        matches!(
            self,
            Self::Colonize { .. }
                | Self::GuardPlanet { .. }
                | Self::GuardStarbase { .. }
                | Self::BlockadePlanet { .. }
                | Self::Patrol { .. }
        )
    }
}

// ---------------------------------------------------------------------------
// Standing orders
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StandingOrder {
    PatrolRoute { waypoints: Vec<SystemId> },
    DefendSystem { system: SystemId },
    AutoColonize { target: SystemId },
    GuardColony { colony: ColonyId },
    Hold,
}

#[derive(Debug, Clone)]
pub struct StandingOrderState {
    pub order: StandingOrder,
    pub suspended: bool,
    pub last_executed_turn: Option<u32>,
}

// ---------------------------------------------------------------------------
// Zero-turn logistics commands (9 kinds)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ZeroTurnCommand {
    Detach {
        fleet: FleetId,
        squadrons: Vec<SquadronId>,
    },
    Transfer {
        squadrons: Vec<SquadronId>,
        from_fleet: FleetId,
        to_fleet: FleetId,
    },
    Merge {
        from_fleet: FleetId,
        into_fleet: FleetId,
    },
    LoadCargo {
        fleet: FleetId,
        colony: ColonyId,
        pu: u32,
    },
    UnloadCargo {
        fleet: FleetId,
        colony: ColonyId,
        pu: u32,
    },
    LoadFighters {
        carrier_squadron: SquadronId,
        fighter_squadrons: Vec<SquadronId>,
    },
    UnloadFighters {
        carrier_squadron: SquadronId,
        fighter_squadrons: Vec<SquadronId>,
        colony: ColonyId,
    },
    TransferFighters {
        from_carrier: SquadronId,
        to_carrier: SquadronId,
        fighter_squadrons: Vec<SquadronId>,
    },
    Reactivate {
        fleet: FleetId,
        colony: ColonyId,
    },
}

impl ZeroTurnCommand {
    /// "Same-location" commands need no friendly colony at the fleet's
 /// system; "Colony-required" commands do.
    #[must_use]
    pub fn requires_friendly_colony(&self) -> bool {
        matches!(
            self,
            Self::LoadCargo { .. }
                | Self::UnloadCargo { .. }
                | Self::LoadFighters { .. }
                | Self::UnloadFighters { .. }
                | Self::Reactivate { .. }
        )
    }
}

// ---------------------------------------------------------------------------
// Build / research / diplomacy / population / espionage / investment
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildOrder {
    pub colony: ColonyId,
    pub kind: crate::project::ProjectKind,
    /// Resolved as "enqueue `n` independent projects".
    pub quantity: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchAllocation {
    /// Production points committed to research this turn.
    pub pp: i64,
    /// Index into the config's tech-field table (0..9), or `None` to bank
    /// into the general pool.
    pub field: Option<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiplomaticAction {
    pub target: HouseId,
    pub proposed_state: DiplomaticState,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopulationTransfer {
    pub from_colony: ColonyId,
    pub to_colony: ColonyId,
    pub pu: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EspionageAttempt {
    pub scout_squadron: SquadronId,
    pub target_colony: ColonyId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EbpCipInvestment {
    /// Economic Breakthrough Program investment, in PP.
    pub ebp: i64,
    /// Capital Improvement Program investment, in PP.
    pub cip: i64,
}

/// Per-house, per-turn order packet.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderPacket {
    pub house: Option<HouseId>,
    pub turn: u32,
    pub build_orders: Vec<BuildOrder>,
    pub fleet_orders: Vec<(FleetId, FleetOrder)>,
    pub research_allocation: Option<ResearchAllocation>,
    pub diplomatic_actions: Vec<DiplomaticAction>,
    pub population_transfers: Vec<PopulationTransfer>,
    pub zero_turn_commands: Vec<ZeroTurnCommand>,
    pub espionage_attempt: Option<EspionageAttempt>,
    pub investment: Option<EbpCipInvestment>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seek_home_eligibility_matches_spec_list() {
        assert!(FleetOrder::Patrol { route: vec![] }.is_seek_home_eligible());
        assert!(!FleetOrder::Hold.is_seek_home_eligible());
        assert!(!FleetOrder::Escort {
            escorted: FleetId(bevy_ecs::entity::Entity::PLACEHOLDER)
        }
        .is_seek_home_eligible());
    }

    #[test]
    fn colony_required_zero_turn_commands_are_flagged() {
        let cmd = ZeroTurnCommand::Reactivate {
            fleet: FleetId(bevy_ecs::entity::Entity::PLACEHOLDER),
            colony: ColonyId(bevy_ecs::entity::Entity::PLACEHOLDER),
        };
        assert!(cmd.requires_friendly_colony());
        let cmd = ZeroTurnCommand::Merge {
            from_fleet: FleetId(bevy_ecs::entity::Entity::PLACEHOLDER),
            into_fleet: FleetId(bevy_ecs::entity::Entity::PLACEHOLDER),
        };
        assert!(!cmd.requires_friendly_colony());
    }
}
