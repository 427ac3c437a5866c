//! Shared contracts: typed handles, the entity store core, the error
//! taxonomy, and the event log. Every other `hexreach-*` crate depends on
//! this one; it depends on nothing in the workspace.

pub mod error;
pub mod events;
pub mod ids;
pub mod rng;
pub mod store;

pub use error::ResolveError;
pub use events::{EventKind, EventLog, EventPhase, GameEvent};
pub use ids::{
    ColonyId, FacilityId, FleetId, HouseId, HouseKey, JumpLaneId, ProjectId, ScoutMissionId,
    ShipId, SquadronId, SystemId,
};
pub use store::Store;

/// Result alias used throughout the core for fallible per-order operations.
pub type ResolveResult<T> = Result<T, ResolveError>;
