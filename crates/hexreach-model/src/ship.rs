//! Ship: an instance with class-derived stats. 

use bevy_ecs::component::Component;
use serde::{Deserialize, Serialize};

/// Two-state damage model with a terminal `Destroyed` state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShipCombatState {
    Undamaged,
    Crippled,
    Destroyed,
}

/// Special capability tags a ship class may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpecialCapability {
    None,
    Carrier { fighter_bays: u32 },
    Transport { cargo_capacity: u32 },
    Scout,
}

/// Class-derived stats, read from the config snapshot at commissioning
/// time and cached on the ship so combat doesn't need config lookups
/// mid-resolution.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ShipStats {
    pub attack_strength: u32,
    pub defense_strength: u32,
    pub command_cost: u32,
    pub carry_limit: u32,
    pub special: SpecialCapability,
}

#[derive(Component, Debug, Clone, Serialize, Deserialize)]
pub struct Ship {
    pub class_name: String,
    pub tech_level: u32,
    pub state: ShipCombatState,
    pub stats: ShipStats,
 /// Population units currently embarked — only meaningful for `SpecialCapability::Transport`.
    pub cargo_pu: u32,
}

impl Ship {
    #[must_use]
    pub fn is_combat_capable(&self) -> bool {
        !matches!(self.state, ShipCombatState::Destroyed)
    }

    #[must_use]
    pub fn is_spacelift(&self) -> bool {
        matches!(self.stats.special, SpecialCapability::Transport { .. })
    }

    #[must_use]
    pub fn cargo_capacity(&self) -> u32 {
        match self.stats.special {
            SpecialCapability::Transport { cargo_capacity } => cargo_capacity,
            _ => 0,
        }
    }

    #[must_use]
    pub fn remaining_cargo_capacity(&self) -> u32 {
        self.cargo_capacity().saturating_sub(self.cargo_pu)
    }

    /// Applies damage, enforcing the two-state transition and the
 /// "destruction protection" rule: a ship cannot jump
    /// straight from `Undamaged` to `Destroyed` in a single attack, critical
    /// or not — only a hit against an already-`Crippled` ship destroys it.
    pub fn apply_damage(&mut self) {
        self.state = match self.state {
            ShipCombatState::Destroyed => ShipCombatState::Destroyed,
            ShipCombatState::Crippled => ShipCombatState::Destroyed,
            ShipCombatState::Undamaged => ShipCombatState::Crippled,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ship() -> Ship {
        Ship {
            class_name: "Frigate".into(),
            tech_level: 1,
            state: ShipCombatState::Undamaged,
            stats: ShipStats {
                attack_strength: 4,
                defense_strength: 3,
                command_cost: 1,
                carry_limit: 0,
                special: SpecialCapability::None,
            },
            cargo_pu: 0,
        }
    }

    #[test]
    fn transport_cargo_capacity_tracks_loaded_pu() {
        let mut s = ship();
        s.stats.special = SpecialCapability::Transport { cargo_capacity: 5 };
        assert!(s.is_spacelift());
        assert_eq!(s.remaining_cargo_capacity(), 5);
        s.cargo_pu = 3;
        assert_eq!(s.remaining_cargo_capacity(), 2);
    }

    #[test]
    fn undamaged_never_skips_straight_to_destroyed() {
        let mut s = ship();
        s.apply_damage();
        assert_eq!(s.state, ShipCombatState::Crippled);
        s.state = ShipCombatState::Undamaged;
        s.apply_damage();
        assert_eq!(s.state, ShipCombatState::Crippled);
    }

    #[test]
    fn crippled_always_advances_to_destroyed() {
        let mut s = ship();
        s.state = ShipCombatState::Crippled;
        s.apply_damage();
        assert_eq!(s.state, ShipCombatState::Destroyed);
    }
}
