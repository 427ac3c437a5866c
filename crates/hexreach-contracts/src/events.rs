//! Typed per-turn events.
//!
//! Every event carries its kind, the affected house(s), optional
//! system/colony/fleet references, and a payload. Payloads are plain data
//! ("human-unreadable" data — formatting is a downstream concern owned
//! by the TUI, not this crate).

use serde::{Deserialize, Serialize};

use crate::ids::{ColonyId, FleetId, HouseId, SystemId};

/// The phase that produced an event, used to order the per-turn log:
/// ordered by phase, then by the order of their causing operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventPhase {
    Conflict,
    Income,
    Command,
    Maintenance,
}

/// One event produced during turn resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameEvent {
    pub phase: EventPhase,
    /// Monotonic sequence number within the phase, assigned in causing-
    /// operation order. Used as the final tiebreaker for determinism.
    pub sequence: u32,
    pub houses: Vec<HouseId>,
    pub system: Option<SystemId>,
    pub colony: Option<ColonyId>,
    pub fleet: Option<FleetId>,
    pub kind: EventKind,
}

/// The taxonomy of events the resolver can emit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EventKind {
    OrderRejected { reason: String },
    FleetMoved { from: SystemId, to: SystemId },
    FleetOrderAborted { replaced_by: &'static str },
    FleetSeekHome { destination: Option<SystemId> },
    ConstructionQueued { quantity: u32 },
    ConstructionCompleted,
    ShipCommissioned,
    ColonyFounded,
    ProjectsLost { count: u32 },
    ColonyBombarded { iu_lost: u32, pu_lost: u32 },
    ColonyConquered { new_owner: HouseId },
    InvasionRepelled,
    BlockadeImposed,
    BlockadeCleared,
    CombatResolved { wins: Vec<HouseId>, wants_stalemate: bool },
    CombatStalemate,
    ScoutDetected,
    ScoutDestroyed,
    EnemyDetected,
    DiplomaticStatusChanged { other: HouseId, new_state: &'static str },
    ResearchBreakthrough { tier: &'static str },
    TechAdvanced { field: &'static str, new_level: u32 },
    Elimination,
    TreasuryDebtWarning { treasury: i64 },
    PopulationTransferred { pu: u32 },
}

/// Accumulates events during a turn and hands out phase-scoped sequence
/// numbers, matching the ordering contract without requiring every
/// subsystem to thread a counter by hand.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<GameEvent>,
    next_sequence: u32,
    current_phase: Option<EventPhase>,
}

impl EventLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter a new phase. Resets the per-phase sequence counter.
    pub fn begin_phase(&mut self, phase: EventPhase) {
        self.current_phase = Some(phase);
        self.next_sequence = 0;
    }

    /// Record an event in the currently active phase.
    ///
    /// # Panics
    /// Panics if called before `begin_phase` — a bug in the resolver, not
    /// a recoverable runtime condition.
    pub fn push(
        &mut self,
        houses: Vec<HouseId>,
        system: Option<SystemId>,
        colony: Option<ColonyId>,
        fleet: Option<FleetId>,
        kind: EventKind,
    ) {
        let phase = self
            .current_phase
            .expect("push called before begin_phase");
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.events.push(GameEvent {
            phase,
            sequence,
            houses,
            system,
            colony,
            fleet,
            kind,
        });
    }

    #[must_use]
    pub fn into_events(self) -> Vec<GameEvent> {
        self.events
    }

    #[must_use]
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Project the log for a single house's eyes, per the per-house
    /// filtering. Fog-of-war gating (what is *visible*) is layered on top
    /// by `hexreach-intel`; this keeps only events that name the house as
    /// a participant, which is the floor every house is always owed.
    #[must_use]
    pub fn for_house(&self, house: HouseId) -> Vec<&GameEvent> {
        self.events
            .iter()
            .filter(|e| e.houses.contains(&house))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy_ecs::entity::Entity;

    fn house(n: u32) -> HouseId {
        HouseId(Entity::from_raw(n))
    }

    #[test]
    fn sequence_numbers_reset_per_phase_and_increment_within_it() {
        let mut log = EventLog::new();
        log.begin_phase(EventPhase::Conflict);
        log.push(vec![house(0)], None, None, None, EventKind::BlockadeImposed);
        log.push(vec![house(0)], None, None, None, EventKind::BlockadeCleared);
        log.begin_phase(EventPhase::Income);
        log.push(vec![house(0)], None, None, None, EventKind::Elimination);

        let events = log.into_events();
        assert_eq!(events[0].sequence, 0);
        assert_eq!(events[1].sequence, 1);
        assert_eq!(events[2].sequence, 0);
        assert_eq!(events[2].phase, EventPhase::Income);
    }

    #[test]
    fn for_house_filters_to_participants_only() {
        let mut log = EventLog::new();
        log.begin_phase(EventPhase::Maintenance);
        log.push(vec![house(1)], None, None, None, EventKind::Elimination);
        log.push(vec![house(2)], None, None, None, EventKind::Elimination);

        assert_eq!(log.for_house(house(1)).len(), 1);
        assert_eq!(log.for_house(house(3)).len(), 0);
    }
}
