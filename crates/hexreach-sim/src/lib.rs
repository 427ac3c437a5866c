//! The turn resolver (C6, C8, C12): validates every house's orders, then
//! drives the Conflict -> Income -> Command -> Maintenance phase
//! sequence, producing the turn's event log.

pub mod command;
pub mod conflict;
pub mod income;
pub mod maintenance;
pub mod movement;
pub mod turn;
pub mod validate;

pub use turn::resolve_turn;
pub use validate::validate_house_orders;
