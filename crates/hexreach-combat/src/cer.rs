//! Combat Effectiveness Roll (CER). 7 and GLOSSARY.
//!
//! A natural 1d20 plus situational modifiers (scouts present, morale,
//! surprise, ambush) yields a final roll, which is bucketed into an
//! effectiveness multiplier. A natural 20 is always a critical hit,
//! carrying a bucket-specific bonus and satisfying the "destruction
//! protection" rule.

use rand::Rng;

use crate::buckets::TargetBucket;

/// The situational inputs to one CER roll.
#[derive(Debug, Clone, Copy, Default)]
pub struct CerModifiers {
    pub scouts_present: bool,
    /// Signed morale adjustment, added directly to the roll.
    pub morale: i32,
    pub surprise: bool,
    pub ambush: bool,
}

impl CerModifiers {
    #[must_use]
    pub fn total(self) -> i32 {
        let mut total = self.morale;
        if self.scouts_present {
            total += 2;
        }
        if self.surprise {
            total += 3;
        }
        if self.ambush {
            total += 4;
        }
        total
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CerResult {
    pub natural_roll: u32,
    pub final_roll: i32,
    pub critical: bool,
    pub effectiveness: f32,
    pub damage_dealt: f32,
}

/// Effectiveness multiplier bucketed from the final roll. A roll below 5
/// is a clean miss; 20+ (natural 20, pre-modifier) is always a critical,
/// regardless of how modifiers would otherwise bucket it.
#[must_use]
fn effectiveness_for(final_roll: i32, critical: bool, bucket: TargetBucket) -> f32 {
    if critical {
        // Bucket-specific crit bonus: Capital/Starbase targets are the
        // hardest to one-shot, so their crit multiplier is the smallest.
        return match bucket {
            TargetBucket::Raider => 3.0,
            TargetBucket::Capital | TargetBucket::Starbase => 2.0,
            TargetBucket::Escort => 2.5,
            TargetBucket::Fighter => 3.5,
        };
    }
    match final_roll {
        i32::MIN..=4 => 0.0,
        5..=9 => 0.5,
        10..=14 => 1.0,
        15..=19 => 1.5,
        _ => 1.75,
    }
}

/// Rolls one CER attack. `attack_strength` and `defense_strength` are the
/// attacker's and defender's class-derived stats; `damage_dealt` scales
/// the effectiveness multiplier by the attacker/defender strength ratio.
pub fn roll(
    rng: &mut impl Rng,
    modifiers: CerModifiers,
    bucket: TargetBucket,
    attack_strength: u32,
    defense_strength: u32,
) -> CerResult {
    let natural_roll = rng.random_range(1..=20);
    let critical = natural_roll == 20;
    let final_roll = natural_roll as i32 + modifiers.total();
    let effectiveness = effectiveness_for(final_roll, critical, bucket);
    let ratio = f32::from(attack_strength as u16) / f32::from(defense_strength.max(1) as u16);
    CerResult {
        natural_roll,
        final_roll,
        critical,
        effectiveness,
        damage_dealt: effectiveness * ratio,
    }
}
