//! The Income phase: per-colony production, tax
//! credit, population growth, and research/investment conversion from
//! each house's already-validated allocation.

use std::collections::HashMap;

use hexreach_config::ConfigSnapshot;
use hexreach_contracts::{ColonyId, EventLog, EventPhase, HouseId};
use hexreach_economy::{accumulate_investment, accumulate_research, available_production_points, gross_production, population_growth, tax_income};
use hexreach_model::{Colony, Facility, FacilityKind, GameState, House};
use hexreach_orders::ValidationOutcome;

/// Runs one Income phase pass, crediting tax to every house's treasury and
/// banking research/investment into its tech tree. Returns the physical
/// production points each colony has left for construction this turn, for
/// the Maintenance phase's `advance_constructions` call.
pub fn run_income_phase(state: &mut GameState, validations: &[(HouseId, ValidationOutcome)], config: &ConfigSnapshot, events: &mut EventLog) -> HashMap<ColonyId, u32> {
    events.begin_phase(EventPhase::Income);
    let mut available_pp = HashMap::new();

    for house_id in state.houses.clone() {
        let economic_level = state.store.get::<House>(house_id.0).map_or(0, |h| h.tech.economic_level);
        let colonies = state.colonies_by_owner.get(&house_id).cloned().unwrap_or_default();
        let mut treasury_gain = 0i64;
        let mut gross_total = 0.0f64;

        for colony_id in colonies {
            let Some(colony) = state.store.get::<Colony>(colony_id.0) else {
                continue;
            };
            let tax_rate = colony.tax_rate;
            let starbase_present = state.facilities_by_colony.get(&colony_id).into_iter().flatten().any(|&facility_id| {
                state
                    .store
                    .get::<Facility>(facility_id.0)
                    .is_some_and(|f| matches!(f.kind, FacilityKind::Kastra(_)) && !f.is_destroyed())
            });

            state.with_colony_mut(colony_id, |c| c.push_tax_sample(tax_rate));
            let Some(colony) = state.store.get::<Colony>(colony_id.0) else {
                continue;
            };
            let gross = gross_production(colony, config, economic_level, 1.0);
            let tax = tax_income(colony, gross);
            let pp = available_production_points(gross, colony);
            let growth = population_growth(colony, config, starbase_present);

            treasury_gain += tax;
            gross_total += gross;
            available_pp.insert(colony_id, pp);
            state.with_colony_mut(colony_id, |c| c.pu += growth);
        }

        if let Some(mut house) = state.store.get_mut::<House>(house_id.0) {
            house.treasury += treasury_gain;
        }

        let Some((_, outcome)) = validations.iter().find(|(h, _)| *h == house_id) else {
            continue;
        };
        let Some(mut house) = state.store.get_mut::<House>(house_id.0) else {
            continue;
        };
        if let Some(allocation) = &outcome.accepted_research {
            accumulate_research(&mut house, allocation.field, allocation.pp, gross_total, config);
        }
        if let Some(investment) = &outcome.accepted_investment {
            accumulate_investment(&mut house, investment.ebp, investment.cip, gross_total, config);
        }
    }

    available_pp
}
