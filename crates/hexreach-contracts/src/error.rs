//! Resolver error taxonomy.
//!
//! Hand-rolled, matching the `PersistenceError` style used in
//! `hexreach-persistence` (manual `Display` + `From` impls, no
//! `thiserror`/`anyhow` inside the core crates).

use crate::ids::SystemId;

/// Errors surfaced by the resolver and its subsystems.
///
/// `CombatStalemate` and `Elimination` are intentionally absent —
/// they are outcome flags/events, not errors. `InvariantViolation` is the
/// only fatal variant: callers must abort resolution for that turn and
/// keep the prior `GameState`, never convert it into a per-order
/// rejection event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// Malformed order structure or an unknown house/fleet/colony reference.
    InvalidInput(String),
    /// Ownership mismatch, wrong fleet status, missing capability, over
    /// capacity, or insufficient budget.
    PreconditionFailed(String),
    /// The pathfinder found no admissible path for the fleet's composition.
    NoPath { from: SystemId, to: SystemId },
    /// Internal bug class: a handle resolves to a missing entity, or an
    /// index disagrees with primary storage. Fatal for the turn.
    InvariantViolation(String),
}

impl std::fmt::Display for ResolveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            Self::PreconditionFailed(msg) => write!(f, "precondition failed: {msg}"),
            Self::NoPath { from, to } => write!(f, "no admissible path from {from} to {to}"),
            Self::InvariantViolation(msg) => write!(f, "invariant violation: {msg}"),
        }
    }
}

impl std::error::Error for ResolveError {}

impl ResolveError {
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::InvariantViolation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy_ecs::entity::Entity;

    #[test]
    fn only_invariant_violation_is_fatal() {
        assert!(!ResolveError::InvalidInput("x".into()).is_fatal());
        assert!(!ResolveError::PreconditionFailed("x".into()).is_fatal());
        assert!(
            !ResolveError::NoPath {
                from: SystemId(Entity::from_raw(0)),
                to: SystemId(Entity::from_raw(1)),
            }
            .is_fatal()
        );
        assert!(ResolveError::InvariantViolation("x".into()).is_fatal());
    }
}
