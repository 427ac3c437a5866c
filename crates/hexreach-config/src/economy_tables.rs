//! Production, tax, growth, research, prestige, and espionage tables.

use serde::{Deserialize, Serialize};

/// Raw production index per planet class, scaled further by resource
/// rating.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanetClassEntry {
    pub class_name: String,
    pub base_index: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanetClassTable {
    pub entries: Vec<PlanetClassEntry>,
}

impl PlanetClassTable {
    #[must_use]
    pub fn raw_index(&self, class_name: &str, resource_rating: u32) -> f64 {
        let base = self
            .entries
            .iter()
            .find(|e| e.class_name == class_name)
            .map_or(1.0, |e| e.base_index);
        base * f64::from(resource_rating).max(1.0)
    }
}

/// Maintenance tier multipliers by fleet status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaintenanceTiers {
    pub active_pct: f32,
    pub reserve_pct: f32,
    pub mothballed_pct: f32,
}

impl Default for MaintenanceTiers {
    fn default() -> Self {
        Self {
            active_pct: 1.0,
            reserve_pct: 0.5,
            mothballed_pct: 0.0,
        }
    }
}

/// Tax-rate tiers driving population growth multiplier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxTier {
    pub max_tax_rate: f32,
    pub growth_multiplier: f32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaxGrowthTable {
    pub tiers: Vec<TaxTier>,
}

impl TaxGrowthTable {
    #[must_use]
    pub fn growth_multiplier_for(&self, tax_rate: f32) -> f32 {
        self.tiers
            .iter()
            .filter(|t| tax_rate <= t.max_tax_rate)
            .min_by(|a, b| a.max_tax_rate.total_cmp(&b.max_tax_rate))
            .map_or(1.0, |t| t.growth_multiplier)
    }
}

/// Research point cost-per-point formula inputs, tiered by Science Level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchCostTier {
    pub science_level: u32,
    pub base_cost_per_point: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResearchCostTable {
    pub tiers: Vec<ResearchCostTier>,
 /// Per-level cost caps for EL/SL/tech-field advancement.
    pub max_economic_level: u32,
    pub max_science_level: u32,
    pub max_field_level: u32,
}

impl ResearchCostTable {
    /// Cost per RP at the given science level, scaled by a logarithmic
 /// term of the house's gross output.
    #[must_use]
    pub fn cost_per_point(&self, science_level: u32, gross_output: f64) -> f64 {
        let base = self
            .tiers
            .iter()
            .filter(|t| t.science_level <= science_level)
            .max_by_key(|t| t.science_level)
            .map_or(1.0, |t| t.base_cost_per_point);
        base * (gross_output.max(1.0)).ln().max(1.0)
    }
}

/// Prestige point sources — flat awards keyed by event kind name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PrestigeSources {
    pub colonization: i64,
    pub invasion_victory: i64,
    pub tech_breakthrough_minor: i64,
    pub tech_breakthrough_major: i64,
    pub tech_breakthrough_revolutionary: i64,
    pub elimination_of_rival: i64,
}

/// Espionage costs and detection thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EspionageConfig {
    pub mission_cost_pp: u32,
    /// Base detection chance (0.0-1.0) per traveling step.
    pub base_detection_chance: f32,
    /// ELI/CIC mesh-network bonus tiers: (min scout count, chance bonus).
    pub mesh_bonus_tiers: Vec<(u32, f32)>,
}

impl Default for EspionageConfig {
    fn default() -> Self {
        Self {
            mission_cost_pp: 5,
            base_detection_chance: 0.1,
            mesh_bonus_tiers: vec![(2, 1.0), (4, 2.0), (6, 3.0)],
        }
    }
}

impl EspionageConfig {
    /// The mesh-network ELI bonus for `scout_count` allied scouts sharing a
 /// location. The
    /// highest tier whose threshold `scout_count` meets applies.
    #[must_use]
    pub fn mesh_bonus(&self, scout_count: u32) -> f32 {
        self.mesh_bonus_tiers
            .iter()
            .filter(|(min, _)| scout_count >= *min)
            .max_by_key(|(min, _)| *min)
            .map_or(0.0, |(_, bonus)| *bonus)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn planet_class_raw_index_scales_with_resource_rating() {
        let table = PlanetClassTable {
            entries: vec![PlanetClassEntry {
                class_name: "Terran".into(),
                base_index: 2.0,
            }],
        };
        assert!((table.raw_index("Terran", 3) - 6.0).abs() < 1e-9);
        // Unknown classes fall back to base_index 1.0, rating floored at 1.
        assert!((table.raw_index("Unknown", 0) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn tax_growth_picks_the_tightest_satisfied_tier() {
        let table = TaxGrowthTable {
            tiers: vec![
                TaxTier {
                    max_tax_rate: 0.2,
                    growth_multiplier: 1.5,
                },
                TaxTier {
                    max_tax_rate: 0.5,
                    growth_multiplier: 1.0,
                },
            ],
        };
        assert!((table.growth_multiplier_for(0.1) - 1.5).abs() < 1e-6);
        assert!((table.growth_multiplier_for(0.4) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn mesh_bonus_picks_the_highest_satisfied_tier() {
        let config = EspionageConfig::default();
        assert!((config.mesh_bonus(1) - 0.0).abs() < 1e-6);
        assert!((config.mesh_bonus(3) - 1.0).abs() < 1e-6);
        assert!((config.mesh_bonus(5) - 2.0).abs() < 1e-6);
        assert!((config.mesh_bonus(9) - 3.0).abs() < 1e-6);
    }
}
