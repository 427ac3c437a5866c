//! The data model (C3): houses, colonies, fleets, squadrons, ships,
//! facilities, construction projects, orders, and the `GameState` store
//! that owns them all.

pub mod colony;
pub mod facility;
pub mod fleet;
pub mod house;
pub mod intel;
pub mod orders;
pub mod project;
pub mod ship;
pub mod squadron;
pub mod state;

pub use colony::{Colony, GroundForces, PlanetClass};
pub use facility::{Facility, FacilityKind, Kastra, Neoria, NeoriaKind};
pub use fleet::{Fleet, FleetStatus};
pub use house::{DiplomaticState, House, Relation, TechTree};
pub use intel::{ColonyReport, FleetReport, IntelQuality, IntelligenceDb, SystemReport};
pub use orders::{
    BuildOrder, DiplomaticAction, EbpCipInvestment, EspionageAttempt, FleetOrder, OrderPacket,
    PopulationTransfer, ResearchAllocation, StandingOrder, StandingOrderState, ZeroTurnCommand,
};
pub use project::{ConstructionProject, NewFacilityKind, ProjectAnchor, ProjectKind};
pub use ship::{Ship, ShipCombatState, ShipStats, SpecialCapability};
pub use squadron::{Squadron, SquadronType};
pub use state::GameState;
