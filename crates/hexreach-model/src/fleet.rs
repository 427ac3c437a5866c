//! Fleet: a mobile unit owned by a house at a system. 

use bevy_ecs::component::Component;
use hexreach_contracts::{HouseId, ShipId, SquadronId, SystemId};
use serde::{Deserialize, Serialize};

use crate::orders::{FleetOrder, StandingOrder};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FleetStatus {
    Active,
    /// Cannot move, cannot participate in combat.
    Reserve,
    /// Cannot move; must be screened during combat; pays 0% maintenance.
    Mothballed,
}

/// A mobile composite unit owned by a house at a system.
#[derive(Component, Debug, Clone, Serialize, Deserialize)]
pub struct Fleet {
    pub owner: HouseId,
    pub system: SystemId,
    pub status: FleetStatus,
    pub squadrons: Vec<SquadronId>,
    pub spacelift: Vec<ShipId>,
    pub command: Option<FleetOrder>,
    pub standing_order: Option<StandingOrder>,
 /// 0-10.
    pub roe: u8,
    pub auto_balance: bool,
}

impl Fleet {
    #[must_use]
    pub fn new(owner: HouseId, system: SystemId) -> Self {
        Self {
            owner,
            system,
            status: FleetStatus::Active,
            squadrons: Vec::new(),
            spacelift: Vec::new(),
            command: None,
            standing_order: None,
            roe: 5,
            auto_balance: false,
        }
    }

    #[must_use]
    pub fn can_move(&self) -> bool {
        matches!(self.status, FleetStatus::Active)
    }

    #[must_use]
    pub fn can_execute_active_orders(&self) -> bool {
        matches!(self.status, FleetStatus::Active)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.squadrons.is_empty() && self.spacelift.is_empty()
    }

    /// Whether this fleet is stationary and eligible to absorb unassigned
 /// squadrons at command-phase end: `Active`, not
    /// executing `PatrolRoute`/`AutoColonize` standing orders.
    #[must_use]
    pub fn eligible_for_auto_assignment(&self) -> bool {
        if self.status != FleetStatus::Active {
            return false;
        }
        match &self.standing_order {
            Some(StandingOrder::PatrolRoute { .. } | StandingOrder::AutoColonize { .. }) => false,
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy_ecs::entity::Entity;

    fn fleet() -> Fleet {
        Fleet::new(HouseId(Entity::from_raw(0)), SystemId(Entity::from_raw(1)))
    }

    #[test]
    fn reserve_and_mothballed_cannot_move() {
        let mut f = fleet();
        f.status = FleetStatus::Reserve;
        assert!(!f.can_move());
        f.status = FleetStatus::Mothballed;
        assert!(!f.can_move());
    }

    #[test]
    fn patrol_route_excludes_auto_assignment() {
        let mut f = fleet();
        assert!(f.eligible_for_auto_assignment());
        f.standing_order = Some(StandingOrder::PatrolRoute { waypoints: vec![] });
        assert!(!f.eligible_for_auto_assignment());
    }

    #[test]
    fn defend_system_allows_auto_assignment() {
        let mut f = fleet();
        f.standing_order = Some(StandingOrder::DefendSystem {
            system: SystemId(Entity::from_raw(1)),
        });
        assert!(f.eligible_for_auto_assignment());
    }
}
