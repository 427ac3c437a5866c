//! Declarative config snapshot: ship/facility/ground-unit
//! stats, planet-class and resource tables, research cost tables,
//! prestige sources, espionage thresholds, tax/growth tiers, and game
//! setup. Loaded once at game init via [`ConfigSnapshot::load`] and held
//! immutably thereafter (typically behind an `Arc`).

pub mod economy_tables;
pub mod error;
pub mod facilities;
pub mod game_setup;
pub mod ships;
pub mod snapshot;

pub use economy_tables::{
    EspionageConfig, MaintenanceTiers, PlanetClassEntry, PlanetClassTable, PrestigeSources,
    ResearchCostTable, ResearchCostTier, TaxGrowthTable, TaxTier,
};
pub use error::ConfigError;
pub use facilities::{FacilityClassConfig, FacilityClassTable};
pub use game_setup::{GameSetup, StartingFleetEntry};
pub use ships::{GroundUnitConfig, GroundUnitTable, ShipClassConfig, ShipClassTable};
pub use snapshot::ConfigSnapshot;
