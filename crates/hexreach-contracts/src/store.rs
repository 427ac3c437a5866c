//! The entity store.
//!
//! `Store` wraps a `bevy_ecs::World` used as a typed component arena: each
//! entity kind (house/system/colony/fleet/squadron/ship/facility/project)
//! is a `bevy_ecs` component attached to an `Entity`, addressed through the
//! typed newtypes in `crate::ids`. No heap pointer graph is ever exposed —
//! every cross-entity reference (fleet↔squadron↔ship↔colony) is a typed id
//! resolved back through this store.
//!
//! `Store` itself only understands `World` mechanics (spawn / get / get_mut
//! / despawn). Domain-specific secondary indices (by-owner, by-system,
//! by-colony) and the `with_mut` scoped-acquisition reconciliation that
//! keeps them live are built on top of it in `hexreach-model`, the crate
//! that actually knows which fields on which component are "the owner" or
//! "the location" — `Store` has no opinion on that, by design, since it is
//! shared by every downstream crate.

use bevy_ecs::bundle::Bundle;
use bevy_ecs::component::Component;
use bevy_ecs::entity::Entity;
use bevy_ecs::world::World;

/// Thin wrapper over `bevy_ecs::World` providing the spawn/get/despawn
/// primitives the rest of the workspace builds its domain store on top of.
#[derive(Debug, Default)]
pub struct Store {
    world: World,
}

impl Store {
    #[must_use]
    pub fn new() -> Self {
        Self {
            world: World::new(),
        }
    }

    pub fn spawn<B: Bundle>(&mut self, bundle: B) -> Entity {
        self.world.spawn(bundle).id()
    }

    #[must_use]
    pub fn get<T: Component>(&self, entity: Entity) -> Option<&T> {
        self.world.get::<T>(entity)
    }

    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> Option<bevy_ecs::world::Mut<'_, T>> {
        self.world.get_mut::<T>(entity)
    }

    /// Despawn an entity and every component attached to it. Returns
    /// `false` if the entity was already gone (callers treat that as a
    /// no-op, not an `InvariantViolation` — a double-despawn inside a
    /// single cleanup pass is benign).
    pub fn despawn(&mut self, entity: Entity) -> bool {
        self.world.despawn(entity)
    }

    #[must_use]
    pub fn contains(&self, entity: Entity) -> bool {
        self.world.get_entity(entity).is_ok()
    }

    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy_ecs::component::Component;

    #[derive(Component, Debug, PartialEq)]
    struct Marker(u32);

    #[test]
    fn spawn_get_despawn_round_trips() {
        let mut store = Store::new();
        let e = store.spawn(Marker(7));
        assert_eq!(store.get::<Marker>(e), Some(&Marker(7)));
        assert!(store.despawn(e));
        assert!(!store.contains(e));
        assert!(!store.despawn(e));
    }

    #[test]
    fn get_mut_allows_in_place_mutation() {
        let mut store = Store::new();
        let e = store.spawn(Marker(1));
        if let Some(mut m) = store.get_mut::<Marker>(e) {
            m.0 = 99;
        }
        assert_eq!(store.get::<Marker>(e), Some(&Marker(99)));
    }
}
