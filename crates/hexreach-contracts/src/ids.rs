//! Typed entity handles.
//!
//! Every in-game entity (house, system, colony, fleet, squadron, ship,
//! facility, construction project, scout mission) is addressed through a
//! newtype wrapping a `bevy_ecs::Entity` so call sites can never mix handle
//! kinds — the type checker rejects passing a `FleetId` where a `ColonyId`
//! is expected. No heap pointer graph is ever exposed.

use bevy_ecs::entity::Entity;
use serde::{Deserialize, Serialize};

/// Declares a typed id newtype around `bevy_ecs::Entity`.
macro_rules! typed_id {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub Entity);

        impl $name {
            #[must_use]
            pub fn entity(self) -> Entity {
                self.0
            }
        }

        impl From<Entity> for $name {
            fn from(e: Entity) -> Self {
                Self(e)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}({:?})", stringify!($name), self.0)
            }
        }
    };
}

typed_id!(HouseId);
typed_id!(SystemId);
typed_id!(JumpLaneId);
typed_id!(ColonyId);
typed_id!(FleetId);
typed_id!(SquadronId);
typed_id!(ShipId);
typed_id!(FacilityId);
typed_id!(ProjectId);
typed_id!(ScoutMissionId);

/// A globally stable identifier for a house, independent of the entity
/// store's generation counter. Used for the public-key-identity stand-in
/// (House) and anywhere an id must stay meaningful across a save/reload
/// that rebuilds the `World` with fresh `Entity` allocations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HouseKey(pub uuid::Uuid);

impl HouseKey {
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for HouseKey {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_ids_do_not_implicitly_convert_between_kinds() {
        let e = Entity::from_raw(0);
        let fleet = FleetId(e);
        let colony = ColonyId(e);
        // Same underlying Entity, but distinct types — this compiles only
        // because we compare the wrapped Entity explicitly.
        assert_eq!(fleet.entity(), colony.entity());
    }

    #[test]
    fn house_key_is_random_and_stable_across_clone() {
        let a = HouseKey::new();
        let b = a;
        assert_eq!(a, b);
        let c = HouseKey::new();
        assert_ne!(a, c);
    }
}
