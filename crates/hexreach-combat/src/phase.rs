//! The combat state machine's phase enum.
//!
//! Driven manually by `engine::resolve_combat`'s local loop rather than a
//! scheduler — there is no `App`/`bevy_state` state-transition system
//! running between turns.

use serde::{Deserialize, Serialize};

/// States: `PreCombat` -> `Ambush` -> `Intercept` -> `MainEngagement` ->
/// `PostCombat`, with a terminal `Resolved`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombatPhase {
    PreCombat,
    Ambush,
    Intercept,
    MainEngagement,
    PostCombat,
    Resolved,
}

impl CombatPhase {
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::PreCombat => Self::Ambush,
            Self::Ambush => Self::Intercept,
            Self::Intercept => Self::MainEngagement,
            Self::MainEngagement => Self::PostCombat,
            Self::PostCombat | Self::Resolved => Self::Resolved,
        }
    }

    /// Whether attacks are rolled during this phase. `PreCombat` only
    /// establishes detection/ambush eligibility; `PostCombat` is cleanup.
    #[must_use]
    pub fn is_attack_phase(self) -> bool {
        matches!(self, Self::Ambush | Self::Intercept | Self::MainEngagement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_sequence_runs_precombat_to_resolved() {
        let mut phase = CombatPhase::PreCombat;
        let expected = [
            CombatPhase::Ambush,
            CombatPhase::Intercept,
            CombatPhase::MainEngagement,
            CombatPhase::PostCombat,
            CombatPhase::Resolved,
        ];
        for want in expected {
            phase = phase.next();
            assert_eq!(phase, want);
        }
        assert_eq!(phase.next(), CombatPhase::Resolved);
    }
}
