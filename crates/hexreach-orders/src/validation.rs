//! Per-house order and command validation.
//!
//! Accepts a per-house [`OrderPacket`] and validates each order
//! independently, rejecting only the offending order — never the whole
//! packet — unless the packet itself is structurally malformed (no
//! matching house). Checks performed: budget (via [`BudgetContext`]),
//! colony ownership, dock capacity, fleet status (Reserve/Mothballed
//! cannot move or execute active orders), squadron composition (e.g.
//! single-ship scouts for spy missions), and the planetary-shield limit
//! (at most one per colony, rebuildable only at level 0).

use bevy_log::warn;
use hexreach_contracts::HouseId;
use hexreach_model::{
    BuildOrder, DiplomaticAction, EbpCipInvestment, EspionageAttempt, FleetOrder, GameState,
    PopulationTransfer, ResearchAllocation, SquadronType,
};

use crate::budget::BudgetContext;

/// A single per-order rejection, carrying the reason for the event log.
#[derive(Debug, Clone)]
pub struct Rejection {
    pub order_kind: &'static str,
    pub reason: String,
}

fn reject(order_kind: &'static str, reason: impl Into<String>) -> Rejection {
    let rejection = Rejection {
        order_kind,
        reason: reason.into(),
    };
    warn!(
        "order rejected: {} ({})",
        rejection.order_kind, rejection.reason
    );
    rejection
}

/// Accepted and rejected orders from one house's packet, split by kind so
/// the command phase (hexreach-sim) can dispatch each accepted group to
/// its handler without re-deriving acceptance.
#[derive(Debug, Default)]
pub struct ValidationOutcome {
    pub accepted_build_orders: Vec<BuildOrder>,
    pub accepted_fleet_orders: Vec<(hexreach_contracts::FleetId, FleetOrder)>,
    pub accepted_research: Option<ResearchAllocation>,
    pub accepted_diplomacy: Vec<DiplomaticAction>,
    pub accepted_population_transfers: Vec<PopulationTransfer>,
    pub accepted_espionage: Option<EspionageAttempt>,
    pub accepted_investment: Option<EbpCipInvestment>,
    pub rejections: Vec<Rejection>,
}

/// Validates one house's build orders against dock/queue capacity and a
/// running [`BudgetContext`]. `unit_cost` is supplied by the caller
/// (hexreach-economy owns the actual cost formula per ) so
/// this crate never needs a config dependency of its own.
pub fn validate_build_orders(
    state: &GameState,
    house: HouseId,
    orders: Vec<BuildOrder>,
    unit_cost: impl Fn(&BuildOrder) -> u32,
    budget: &mut BudgetContext,
    out: &mut ValidationOutcome,
) {
    for order in orders {
        let Some(colony) = state.store.get::<hexreach_model::Colony>(order.colony.0) else {
            out.rejections.push(reject("BuildOrder", "unknown colony"));
            continue;
        };
        if colony.owner != house {
            out.rejections
                .push(reject("BuildOrder", "colony not owned by this house"));
            continue;
        }
        if order.quantity == 0 {
            out.rejections
                .push(reject("BuildOrder", "quantity must be at least 1"));
            continue;
        }
        // Decision: quantity>1 enqueues n independent projects.
        // The planetary-shield cap (at most one per colony, rebuildable
        // only at level 0) is a ground-forces concern handled entirely by
        // hexreach-economy at commissioning time, since `ProjectKind` here
        // has no shield variant of its own.
        let per_unit = unit_cost(&order);
        let total_cost = i64::from(per_unit) * i64::from(order.quantity);
        if !budget.try_commit(total_cost) {
            out.rejections
                .push(reject("BuildOrder", "insufficient budget for this commitment"));
            continue;
        }
        out.accepted_build_orders.push(order);
    }
}

/// Validates one fleet order: ownership, fleet status, and squadron
/// composition (single-ship scouts for spy missions).
pub fn validate_fleet_order(
    state: &GameState,
    house: HouseId,
    fleet: hexreach_contracts::FleetId,
    order: FleetOrder,
    out: &mut ValidationOutcome,
) {
    let kind = order.kind_name();
    let Some(fleet_data) = state.store.get::<hexreach_model::Fleet>(fleet.0) else {
        out.rejections.push(reject(kind, "unknown fleet"));
        return;
    };
    if fleet_data.owner != house {
        out.rejections
            .push(reject(kind, "fleet not owned by this house"));
        return;
    }
    let is_movement_or_active = !matches!(order, FleetOrder::Hold | FleetOrder::Disband);
    if is_movement_or_active && !fleet_data.can_execute_active_orders() {
        out.rejections.push(reject(
            kind,
            "fleet status (Reserve/Mothballed) cannot execute active orders",
        ));
        return;
    }
    if let FleetOrder::ScoutMission { .. } = &order {
        // Decision: multi-ship squadrons are accepted here, not
        // rejected — they silently produce zero intel at the mission
        // layer (hexreach-intel) instead.
        let any_single_ship_scout = fleet_data.squadrons.iter().any(|sq_id| {
            state
                .store
                .get::<hexreach_model::Squadron>(sq_id.0)
                .is_some_and(|sq| sq.squadron_type == SquadronType::Intel)
        });
        if !any_single_ship_scout {
            out.rejections
                .push(reject(kind, "fleet has no Intel-type squadron to execute a spy mission"));
            return;
        }
    }
    out.accepted_fleet_orders.push((fleet, order));
}

/// Validates research allocation: non-negative PP yields zero RP rather
/// than being rejected outright, so this
/// never produces a rejection — just clamps.
#[must_use]
pub fn validate_research_allocation(mut allocation: ResearchAllocation) -> ResearchAllocation {
    if allocation.pp < 0 {
        allocation.pp = 0;
    }
    allocation
}

pub fn validate_diplomatic_action(
    state: &GameState,
    house: HouseId,
    action: DiplomaticAction,
    out: &mut ValidationOutcome,
) {
    if action.target == house {
        out.rejections
            .push(reject("DiplomaticAction", "cannot target self"));
        return;
    }
    if !state.houses.contains(&action.target) {
        out.rejections
            .push(reject("DiplomaticAction", "unknown target house"));
        return;
    }
    out.accepted_diplomacy.push(action);
}

pub fn validate_population_transfer(
    state: &GameState,
    house: HouseId,
    transfer: PopulationTransfer,
    out: &mut ValidationOutcome,
) {
    let Some(from) = state.store.get::<hexreach_model::Colony>(transfer.from_colony.0) else {
        out.rejections
            .push(reject("PopulationTransfer", "unknown source colony"));
        return;
    };
    if from.owner != house {
        out.rejections
            .push(reject("PopulationTransfer", "source colony not owned by this house"));
        return;
    }
    if transfer.pu == 0 || transfer.pu >= from.pu {
        out.rejections.push(reject(
            "PopulationTransfer",
            "transfer must leave at least 1 PU behind at the source",
        ));
        return;
    }
    let Some(to) = state.store.get::<hexreach_model::Colony>(transfer.to_colony.0) else {
        out.rejections
            .push(reject("PopulationTransfer", "unknown destination colony"));
        return;
    };
    if to.owner != house {
        out.rejections.push(reject(
            "PopulationTransfer",
            "destination colony not owned by this house",
        ));
        return;
    }
    out.accepted_population_transfers.push(transfer);
}

pub fn validate_espionage_attempt(
    state: &GameState,
    house: HouseId,
    attempt: EspionageAttempt,
    out: &mut ValidationOutcome,
) {
    let Some(sq) = state
        .store
        .get::<hexreach_model::Squadron>(attempt.scout_squadron.0)
    else {
        out.rejections
            .push(reject("EspionageAttempt", "unknown scout squadron"));
        return;
    };
    let Some(fleet) = state.store.get::<hexreach_model::Fleet>(sq.fleet.0) else {
        out.rejections
            .push(reject("EspionageAttempt", "scout squadron's fleet no longer exists"));
        return;
    };
    if fleet.owner != house {
        out.rejections
            .push(reject("EspionageAttempt", "scout squadron not owned by this house"));
        return;
    }
    if sq.squadron_type != SquadronType::Intel {
        out.rejections.push(reject(
            "EspionageAttempt",
            "only Intel-type squadrons can execute espionage",
        ));
        return;
    }
    out.accepted_espionage = Some(attempt);
}

pub fn validate_investment(
    investment: EbpCipInvestment,
    budget: &mut BudgetContext,
    out: &mut ValidationOutcome,
) {
    let total = investment.ebp.max(0) + investment.cip.max(0);
    if !budget.try_commit(total) {
        out.rejections
            .push(reject("EbpCipInvestment", "insufficient budget for investment"));
        return;
    }
    out.accepted_investment = Some(investment);
}

#[cfg(test)]
mod tests {
    use bevy_ecs::entity::Entity;
    use hexreach_contracts::{ColonyId, Store};
    use hexreach_map::generate;
    use hexreach_model::{Colony, Fleet, FleetStatus, House, PlanetClass, ProjectKind};

    use super::*;

    fn fixture() -> (GameState, HouseId) {
        let mut store = Store::new();
        let star_map = generate(&mut store, 1, 1, 3);
        let mut state = GameState::new(store, star_map);
        let house = state.spawn_house(House::new("Atreides"));
        (state, house)
    }

    #[test]
    fn build_order_against_unowned_colony_is_rejected() {
        let (mut state, house) = fixture();
        let other = state.spawn_house(House::new("Harkonnen"));
        let hub = state.star_map.hub;
        let colony = state.spawn_colony(Colony::new(other, hub, PlanetClass::Terran, 5));

        let mut budget = BudgetContext::new(1000);
        let mut out = ValidationOutcome::default();
        validate_build_orders(
            &state,
            house,
            vec![BuildOrder {
                colony,
                kind: ProjectKind::IndustrialExpansion { iu_delta: 1 },
                quantity: 1,
            }],
            |_| 10,
            &mut budget,
            &mut out,
        );
        assert!(out.accepted_build_orders.is_empty());
        assert_eq!(out.rejections.len(), 1);
    }

    #[test]
    fn build_order_quantity_enqueues_n_independent_units_worth_of_cost() {
        let (mut state, house) = fixture();
        let hub = state.star_map.hub;
        let colony = state.spawn_colony(Colony::new(house, hub, PlanetClass::Terran, 5));

        let mut budget = BudgetContext::new(1000);
        let mut out = ValidationOutcome::default();
        validate_build_orders(
            &state,
            house,
            vec![BuildOrder {
                colony,
                kind: ProjectKind::Ship {
                    class_name: "Scout".into(),
                },
                quantity: 3,
            }],
            |_| 10,
            &mut budget,
            &mut out,
        );
        assert_eq!(out.accepted_build_orders.len(), 1);
        assert_eq!(budget.remaining(), 970);
    }

    #[test]
    fn reserve_fleet_rejects_move_order() {
        let (mut state, house) = fixture();
        let hub = state.star_map.hub;
        let mut fleet = Fleet::new(house, hub);
        fleet.status = FleetStatus::Reserve;
        let fleet_id = state.spawn_fleet(fleet);

        let mut out = ValidationOutcome::default();
        validate_fleet_order(
            &state,
            house,
            fleet_id,
            FleetOrder::Move { destination: hub },
            &mut out,
        );
        assert!(out.accepted_fleet_orders.is_empty());
        assert_eq!(out.rejections.len(), 1);
    }

    #[test]
    fn population_transfer_below_source_pu_minimum_is_rejected() {
        let (mut state, house) = fixture();
        let hub = state.star_map.hub;
        let mut source = Colony::new(house, hub, PlanetClass::Terran, 5);
        source.pu = 1;
        let from = state.spawn_colony(source);
        let to = state.spawn_colony(Colony::new(house, hub, PlanetClass::Terran, 5));

        let mut out = ValidationOutcome::default();
        validate_population_transfer(
            &state,
            house,
            PopulationTransfer {
                from_colony: from,
                to_colony: to,
                pu: 1,
            },
            &mut out,
        );
        assert!(out.accepted_population_transfers.is_empty());
        assert_eq!(out.rejections.len(), 1);
    }

    #[test]
    fn diplomatic_action_targeting_self_is_rejected() {
        let (state, house) = fixture();
        let mut out = ValidationOutcome::default();
        validate_diplomatic_action(
            &state,
            house,
            DiplomaticAction {
                target: house,
                proposed_state: hexreach_model::DiplomaticState::Hostile,
            },
            &mut out,
        );
        assert_eq!(out.rejections.len(), 1);
    }

    #[test]
    fn negative_pp_allocation_is_clamped_to_zero_not_rejected() {
        let allocation = validate_research_allocation(ResearchAllocation { pp: -50, field: None });
        assert_eq!(allocation.pp, 0);
    }

    #[test]
    fn unowned_source_colony_never_touches_unused_ids() {
        let (state, house) = fixture();
        let ghost = ColonyId(Entity::from_raw(999));
        let mut out = ValidationOutcome::default();
        validate_population_transfer(
            &state,
            house,
            PopulationTransfer {
                from_colony: ghost,
                to_colony: ghost,
                pu: 1,
            },
            &mut out,
        );
        assert_eq!(out.rejections.len(), 1);
    }

    #[test]
    fn espionage_requires_an_intel_squadron() {
        let (mut state, house) = fixture();
        let hub = state.star_map.hub;
        let fleet_id = state.spawn_fleet(Fleet::new(house, hub));
        let sq = state.spawn_squadron(
            house,
            hexreach_model::Squadron::new(
                fleet_id,
                SquadronType::Combat,
                hexreach_contracts::ShipId(Entity::from_raw(1)),
            ),
        );
        let mut out = ValidationOutcome::default();
        validate_espionage_attempt(
            &state,
            house,
            EspionageAttempt {
                scout_squadron: sq,
                target_colony: ColonyId(Entity::from_raw(1)),
            },
            &mut out,
        );
        assert_eq!(out.rejections.len(), 1);
    }
}
