//! Research point accumulation.
//!
//! Reserved accumulator keys beyond the 9 configured tech fields (indices
//! `0..9`): `EL_POOL` banks Economic Level progress, fed by ordinary
//! unassigned research allocation and EBP investment; `SL_POOL` banks
//! Science Level progress, fed by CIP investment. This is the resolution
//! to the EBP/CIP Open Question recorded in DESIGN.md.

use hexreach_config::ConfigSnapshot;
use hexreach_model::House;

pub const EL_POOL: u8 = 9;
pub const SL_POOL: u8 = 10;

/// Converts committed production points into research points at the
/// house's current science-level cost tier and banks them against
/// `field` (`None` routes into the Economic Level pool, matching the
/// general-pool semantics of an unallocated research order).
pub fn accumulate_research(house: &mut House, field: Option<u8>, committed_pp: i64, gross_output: f64, config: &ConfigSnapshot) {
    if committed_pp <= 0 {
        return;
    }
    let cost_per_point = config.research_cost.cost_per_point(house.tech.science_level, gross_output);
    let rp_gained = committed_pp as f64 / cost_per_point.max(f64::EPSILON);
    let key = field.unwrap_or(EL_POOL);
    *house.tech.accumulated_rp.entry(key).or_insert(0.0) += rp_gained;
}

/// EBP investment banks straight into the Economic Level pool; CIP
/// investment banks into the Science Level pool (see module doc).
pub fn accumulate_investment(house: &mut House, ebp: i64, cip: i64, gross_output: f64, config: &ConfigSnapshot) {
    accumulate_research(house, Some(EL_POOL), ebp, gross_output, config);
    accumulate_research(house, Some(SL_POOL), cip, gross_output, config);
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexreach_config::economy_tables::{ResearchCostTable, ResearchCostTier};

    fn config() -> ConfigSnapshot {
        let mut config = ConfigSnapshot::default();
        config.research_cost = ResearchCostTable {
            tiers: vec![ResearchCostTier {
                science_level: 0,
                base_cost_per_point: 2.0,
            }],
            max_economic_level: 10,
            max_science_level: 10,
            max_field_level: 10,
        };
        config
    }

    #[test]
    fn committed_pp_converts_to_rp_at_the_cost_tier() {
        let config = config();
        let mut house = House::new("A");
        accumulate_research(&mut house, Some(3), 100, 1.0, &config);
        // cost_per_point = 2.0 * ln(1.0).max(1.0) = 2.0
        assert!((house.tech.accumulated_rp[&3] - 50.0).abs() < 1e-6);
    }

    #[test]
    fn unassigned_field_banks_into_economic_level_pool() {
        let config = config();
        let mut house = House::new("A");
        accumulate_research(&mut house, None, 20, 1.0, &config);
        assert!(house.tech.accumulated_rp.contains_key(&EL_POOL));
    }

    #[test]
    fn ebp_and_cip_route_to_separate_pools() {
        let config = config();
        let mut house = House::new("A");
        accumulate_investment(&mut house, 40, 10, 1.0, &config);
        assert!(house.tech.accumulated_rp[&EL_POOL] > 0.0);
        assert!(house.tech.accumulated_rp[&SL_POOL] > 0.0);
    }
}
