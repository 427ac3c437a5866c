//! The config snapshot: loaded once at game init from declarative TOML,
//! held immutably for the game's lifetime.
//!
//! Read-with-fallback pattern (`info!`/`warn!` via `bevy_log`, `toml`
//! crate, missing file falls back to defaults rather than erroring), but
//! the config here is a single declarative table set provided wholesale
//! by the designer, not a layered (defaults/user/project) preference
//! merge, so there is one file layer rather than several.

use std::path::Path;

use bevy_log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::economy_tables::{
    EspionageConfig, MaintenanceTiers, PlanetClassTable, PrestigeSources, ResearchCostTable,
    TaxGrowthTable,
};
use crate::error::ConfigError;
use crate::facilities::FacilityClassTable;
use crate::game_setup::GameSetup;
use crate::ships::{GroundUnitTable, ShipClassTable};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigSnapshot {
    #[serde(default)]
    pub ships: ShipClassTable,
    #[serde(default)]
    pub ground_units: GroundUnitTable,
    #[serde(default)]
    pub facilities: FacilityClassTable,
    #[serde(default)]
    pub planet_classes: PlanetClassTable,
    #[serde(default)]
    pub maintenance: MaintenanceTiers,
    #[serde(default)]
    pub tax_growth: TaxGrowthTable,
    #[serde(default)]
    pub research_cost: ResearchCostTable,
    #[serde(default)]
    pub prestige: PrestigeSources,
    #[serde(default)]
    pub espionage: EspionageConfig,
    #[serde(default)]
    pub setup: GameSetup,
}

impl ConfigSnapshot {
    /// Loads a config snapshot from a TOML file. Missing file falls back
    /// to built-in defaults with a warning.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(
                    "No config file at {}, using built-in defaults",
                    path.display()
                );
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        let snapshot: Self = toml::from_str(&contents)?;
        info!("Loaded config snapshot from {}", path.display());
        Ok(snapshot)
    }
}
