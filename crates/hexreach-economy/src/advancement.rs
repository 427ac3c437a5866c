//! Bi-annual tech advancement and breakthroughs.

use bevy_log::info;
use hexreach_config::ConfigSnapshot;
use hexreach_contracts::{EventKind, EventLog, HouseId};
use hexreach_model::House;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::research::{EL_POOL, SL_POOL};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakthroughTier {
    Minor,
    Moderate,
    Major,
    Revolutionary,
}

impl BreakthroughTier {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Minor => "Minor",
            Self::Moderate => "Moderate",
            Self::Major => "Major",
            Self::Revolutionary => "Revolutionary",
        }
    }

    #[must_use]
    fn prestige(self, sources: &hexreach_config::economy_tables::PrestigeSources) -> i64 {
        match self {
            Self::Minor | Self::Moderate => sources.tech_breakthrough_minor,
            Self::Major => sources.tech_breakthrough_major,
            Self::Revolutionary => sources.tech_breakthrough_revolutionary,
        }
    }

    /// Chance this tier fires on a successful advancement, capped at 15%
 /// combined. Rarer tiers get a
    /// proportionally smaller slice of that ceiling.
    fn roll_threshold(self) -> f64 {
        match self {
            Self::Minor => 0.095,
            Self::Moderate => 0.038,
            Self::Major => 0.013,
            Self::Revolutionary => 0.004,
        }
    }
}

const TIERS: [BreakthroughTier; 4] = [
    BreakthroughTier::Revolutionary,
    BreakthroughTier::Major,
    BreakthroughTier::Moderate,
    BreakthroughTier::Minor,
];

/// Monotonic, capped per-level cost for EL, SL, and tech-field advancement.
fn next_level_cost(current_level: u32, max_level: u32) -> Option<f64> {
    if current_level >= max_level {
        return None;
    }
    Some(10.0 + f64::from(current_level) * 6.0)
}

fn try_spend(pool: &mut f64, cost: f64) -> bool {
    if *pool >= cost {
        *pool -= cost;
        true
    } else {
        false
    }
}

/// Rolls for a breakthrough once a level has actually advanced, from
/// rarest to most common so a single roll claims at most one tier.
fn roll_breakthrough(rng: &mut ChaCha8Rng) -> Option<BreakthroughTier> {
    let roll: f64 = rng.random();
    let mut floor = 0.0;
    for tier in TIERS {
        let ceiling = floor + tier.roll_threshold();
        if roll < ceiling {
            return Some(tier);
        }
        floor = ceiling;
    }
    None
}

fn emit_breakthrough(
    house_id: HouseId,
    house: &mut House,
    tier: BreakthroughTier,
    config: &ConfigSnapshot,
    events: &mut EventLog,
) {
    house.prestige += tier.prestige(&config.prestige);
    events.push(
        vec![house_id],
        None,
        None,
        None,
        EventKind::ResearchBreakthrough { tier: tier.label() },
    );
}

/// Runs one bi-annual advancement pass for a house: Economic Level,
/// Science Level, and each of the 9 tech fields independently check
/// whether their accumulated RP clears the next level's cost and advance
/// by exactly one level if so. No-ops outside a
/// designated advancement turn.
pub fn advance_tech(
    house_id: HouseId,
    house: &mut House,
    config: &ConfigSnapshot,
    turn: u32,
    rng: &mut ChaCha8Rng,
    events: &mut EventLog,
) {
    if !config.setup.is_tech_advancement_turn(turn) {
        return;
    }

    if let Some(cost) = next_level_cost(house.tech.economic_level, config.research_cost.max_economic_level) {
        let pool = house.tech.accumulated_rp.entry(EL_POOL).or_insert(0.0);
        if try_spend(pool, cost) {
            house.tech.economic_level += 1;
            info!(house = %house.name, level = house.tech.economic_level, "economic level advanced");
            events.push(vec![house_id], None, None, None, EventKind::TechAdvanced {
                field: "EconomicLevel",
                new_level: house.tech.economic_level,
            });
            if let Some(tier) = roll_breakthrough(rng) {
                emit_breakthrough(house_id, house, tier, config, events);
            }
        }
    }

    if let Some(cost) = next_level_cost(house.tech.science_level, config.research_cost.max_science_level) {
        let pool = house.tech.accumulated_rp.entry(SL_POOL).or_insert(0.0);
        if try_spend(pool, cost) {
            house.tech.science_level += 1;
            info!(house = %house.name, level = house.tech.science_level, "science level advanced");
            events.push(vec![house_id], None, None, None, EventKind::TechAdvanced {
                field: "ScienceLevel",
                new_level: house.tech.science_level,
            });
            if let Some(tier) = roll_breakthrough(rng) {
                emit_breakthrough(house_id, house, tier, config, events);
            }
        }
    }

    for field_index in 0u8..9 {
        let current = house.tech.fields[field_index as usize];
        let Some(cost) = next_level_cost(current, config.research_cost.max_field_level) else {
            continue;
        };
        let pool = house.tech.accumulated_rp.entry(field_index).or_insert(0.0);
        if try_spend(pool, cost) {
            house.tech.fields[field_index as usize] += 1;
            events.push(vec![house_id], None, None, None, EventKind::TechAdvanced {
                field: field_name(field_index),
                new_level: house.tech.fields[field_index as usize],
            });
            if let Some(tier) = roll_breakthrough(rng) {
                emit_breakthrough(house_id, house, tier, config, events);
            }
        }
    }
}

fn field_name(index: u8) -> &'static str {
    const NAMES: [&str; 9] = [
        "Weapons",
        "Defenses",
        "Propulsion",
        "Logistics",
        "Detection",
        "Construction",
        "Terraforming",
        "Command",
        "Espionage",
    ];
    NAMES.get(index as usize).copied().unwrap_or("Unknown")
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexreach_contracts::EventPhase;
    use rand::SeedableRng;

    fn config() -> ConfigSnapshot {
        let mut c = ConfigSnapshot::default();
        c.research_cost.max_economic_level = 10;
        c.research_cost.max_science_level = 10;
        c.research_cost.max_field_level = 10;
        c.setup.tech_advancement_turns = vec![10];
        c
    }

    #[test]
    fn advancement_is_a_no_op_outside_designated_turns() {
        let config = config();
        let mut house = House::new("A");
        house.tech.accumulated_rp.insert(EL_POOL, 1000.0);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut events = EventLog::new();
        events.begin_phase(EventPhase::Maintenance);
        advance_tech(HouseId(bevy_ecs::entity::Entity::from_raw(0)), &mut house, &config, 11, &mut rng, &mut events);
        assert_eq!(house.tech.economic_level, 0);
    }

    #[test]
    fn sufficient_banked_rp_advances_economic_level_by_exactly_one() {
        let config = config();
        let mut house = House::new("A");
        house.tech.accumulated_rp.insert(EL_POOL, 1000.0);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut events = EventLog::new();
        events.begin_phase(EventPhase::Maintenance);
        advance_tech(HouseId(bevy_ecs::entity::Entity::from_raw(0)), &mut house, &config, 10, &mut rng, &mut events);
        assert_eq!(house.tech.economic_level, 1);
    }

    #[test]
    fn insufficient_rp_leaves_level_unchanged() {
        let config = config();
        let mut house = House::new("A");
        house.tech.accumulated_rp.insert(EL_POOL, 1.0);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut events = EventLog::new();
        events.begin_phase(EventPhase::Maintenance);
        advance_tech(HouseId(bevy_ecs::entity::Entity::from_raw(0)), &mut house, &config, 10, &mut rng, &mut events);
        assert_eq!(house.tech.economic_level, 0);
        assert!((house.tech.accumulated_rp[&EL_POOL] - 1.0).abs() < 1e-9);
    }
}
