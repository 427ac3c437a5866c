//! Per-house order validation, run once before the phase sequence starts.
//! Rejections are recorded now but only
//! turned into events once the Command phase begins, so the per-phase
//! event sequence stays monotonic.

use hexreach_config::ConfigSnapshot;
use hexreach_contracts::HouseId;
use hexreach_economy::project_cost;
use hexreach_model::{GameState, House, OrderPacket};
use hexreach_orders::validation::{
    validate_build_orders, validate_diplomatic_action, validate_espionage_attempt, validate_fleet_order,
    validate_investment, validate_population_transfer, validate_research_allocation,
};
use hexreach_orders::{BudgetContext, ValidationOutcome};

/// Validates every order in one house's packet against a single
/// [`BudgetContext`] seeded from its current treasury, so concurrent
/// build orders and investment in the same packet cannot double-spend.
#[must_use]
pub fn validate_house_orders(state: &GameState, config: &ConfigSnapshot, house: HouseId, packet: &OrderPacket) -> ValidationOutcome {
    let mut out = ValidationOutcome::default();
    let treasury = state.store.get::<House>(house.0).map_or(0, |h| h.treasury);
    let mut budget = BudgetContext::new(treasury);

    validate_build_orders(
        state,
        house,
        packet.build_orders.clone(),
        |order| project_cost(&order.kind, config),
        &mut budget,
        &mut out,
    );

    for &(fleet, ref order) in &packet.fleet_orders {
        validate_fleet_order(state, house, fleet, order.clone(), &mut out);
    }

    if let Some(allocation) = packet.research_allocation.clone() {
        out.accepted_research = Some(validate_research_allocation(allocation));
    }

    for action in packet.diplomatic_actions.clone() {
        validate_diplomatic_action(state, house, action, &mut out);
    }

    for transfer in packet.population_transfers.clone() {
        validate_population_transfer(state, house, transfer, &mut out);
    }

    if let Some(attempt) = packet.espionage_attempt.clone() {
        validate_espionage_attempt(state, house, attempt, &mut out);
    }

    if let Some(investment) = packet.investment.clone() {
        validate_investment(investment, &mut budget, &mut out);
    }

    out
}
