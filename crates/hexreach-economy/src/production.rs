//! Production, tax, and population growth.
//!
//! `raw_index(planetClass, resourceRating) × population × IU-scaling ×
//! tax_rate_modifier × EL-modifier (capped +50% at EL10) × morale_modifier
//! × (1 − blockade_penalty)`.

use hexreach_config::ConfigSnapshot;
use hexreach_model::{Colony, PlanetClass};

/// Canonical class name used to key into the config's planet-class table.
/// Kept here rather than on `PlanetClass` itself so `hexreach-model` does
/// not need to know about config string keys.
#[must_use]
pub fn planet_class_name(class: PlanetClass) -> &'static str {
    match class {
        PlanetClass::Terran => "Terran",
        PlanetClass::Ocean => "Ocean",
        PlanetClass::Desert => "Desert",
        PlanetClass::Tundra => "Tundra",
        PlanetClass::Barren => "Barren",
        PlanetClass::GasGiantOutpost => "GasGiantOutpost",
    }
}

/// Infrastructure scales output — every 10 IU adds 10% to the base index,
/// uncapped (IU itself is capped by construction cost, not here).
#[must_use]
pub fn iu_scaling(iu: u32) -> f64 {
    1.0 + f64::from(iu) * 0.01
}

/// Higher tax rates divert output from production toward treasury income
///: production falls linearly as tax
/// rises, bottoming out at half output under full taxation.
#[must_use]
pub fn tax_rate_modifier(tax_rate: f32) -> f64 {
    1.0 - f64::from(tax_rate.clamp(0.0, 1.0)) * 0.5
}

/// Economic Level modifier, capped at +50% once EL reaches 10.
#[must_use]
pub fn economic_level_modifier(economic_level: u32) -> f64 {
    (1.0 + f64::from(economic_level.min(10)) * 0.05).min(1.5)
}

#[must_use]
pub fn blockade_penalty(blockaded: bool) -> f64 {
    if blockaded {
        0.4
    } else {
        0.0
    }
}

/// Gross production points generated by a colony this turn, before any
/// is committed to research or construction.
#[must_use]
pub fn gross_production(colony: &Colony, config: &ConfigSnapshot, economic_level: u32, morale_modifier: f64) -> f64 {
    let raw = config
        .planet_classes
        .raw_index(planet_class_name(colony.planet_class), colony.resource_rating);
    raw * f64::from(colony.pu)
        * iu_scaling(colony.iu)
        * tax_rate_modifier(colony.tax_rate)
        * economic_level_modifier(economic_level)
        * morale_modifier
        * (1.0 - blockade_penalty(colony.blockaded))
}

/// Treasury income this turn: the tax-rate share of gross production,
/// smoothed by the colony's rolling 6-turn average so a one-turn tax-rate
/// spike doesn't whipsaw income.
#[must_use]
pub fn tax_income(colony: &Colony, gross: f64) -> i64 {
    let averaged_rate = f64::from(colony.rolling_tax_average());
    (gross * averaged_rate).round() as i64
}

/// Production points left over for construction/research after tax is
/// set aside.
#[must_use]
pub fn available_production_points(gross: f64, colony: &Colony) -> u32 {
    let averaged_rate = f64::from(colony.rolling_tax_average());
    (gross * (1.0 - averaged_rate)).max(0.0).round() as u32
}

/// Natural population growth plus a flat starbase bonus, scaled by the
/// tax-rate growth tier, capped at 20x the colony's resource rating.
#[must_use]
pub fn population_growth(colony: &Colony, config: &ConfigSnapshot, starbase_present: bool) -> u32 {
    const BASE_GROWTH_RATE: f64 = 0.02;
    const STARBASE_BONUS_RATE: f64 = 0.01;

    let cap = colony.resource_rating.saturating_mul(20).max(1);
    if colony.pu >= cap {
        return 0;
    }

    let multiplier = f64::from(config.tax_growth.growth_multiplier_for(colony.tax_rate));
    let bonus_rate = if starbase_present { STARBASE_BONUS_RATE } else { 0.0 };
    let grown = (f64::from(colony.pu) * (BASE_GROWTH_RATE * multiplier + bonus_rate)).floor() as u32;
    grown.min(cap - colony.pu)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexreach_contracts::{HouseId, SystemId};
    use hexreach_config::economy_tables::{PlanetClassEntry, PlanetClassTable};

    fn colony() -> Colony {
        let mut c = Colony::new(
            HouseId(bevy_ecs::entity::Entity::from_raw(0)),
            SystemId(bevy_ecs::entity::Entity::from_raw(1)),
            PlanetClass::Terran,
            4,
        );
        c.pu = 10;
        c.iu = 10;
        c
    }

    #[test]
    fn economic_level_caps_at_fifty_percent() {
        assert!((economic_level_modifier(10) - 1.5).abs() < 1e-9);
        assert!((economic_level_modifier(20) - 1.5).abs() < 1e-9);
        assert!(economic_level_modifier(5) < 1.5);
    }

    #[test]
    fn blockade_reduces_gross_production() {
        let mut config = ConfigSnapshot::default();
        config.planet_classes = PlanetClassTable {
            entries: vec![PlanetClassEntry {
                class_name: "Terran".into(),
                base_index: 1.0,
            }],
        };
        let mut c = colony();
        let unblocked = gross_production(&c, &config, 1, 1.0);
        c.blockaded = true;
        let blocked = gross_production(&c, &config, 1, 1.0);
        assert!(blocked < unblocked);
    }

    #[test]
    fn population_growth_stops_at_cap() {
        let config = ConfigSnapshot::default();
        let mut c = colony();
        c.resource_rating = 1;
        c.pu = 20; // already at cap (resource_rating * 20)
        assert_eq!(population_growth(&c, &config, false), 0);
    }

    #[test]
    fn starbase_presence_increases_growth() {
        let config = ConfigSnapshot::default();
        let c = colony();
        let without = population_growth(&c, &config, false);
        let with = population_growth(&c, &config, true);
        assert!(with >= without);
    }
}
