//! Facility: colony-anchored structures. 
//!
//! Two dynasties: Neorias (production — spaceport/shipyard/drydock) and
//! Kastras (defensive — starbases).

use std::collections::VecDeque;

use bevy_ecs::component::Component;
use hexreach_contracts::{ColonyId, ProjectId};
use serde::{Deserialize, Serialize};

use crate::ship::ShipCombatState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NeoriaKind {
    Spaceport,
    Shipyard,
    Drydock,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Neoria {
    pub kind: NeoriaKind,
    /// Number of simultaneous active construction slots.
    pub docks: u8,
    pub active_constructions: Vec<ProjectId>,
    pub construction_queue: VecDeque<ProjectId>,
    pub repairs: VecDeque<ProjectId>,
    pub state: ShipCombatState,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Kastra {
    pub attack_strength: u32,
    pub defense_strength: u32,
    pub state: ShipCombatState,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum FacilityKind {
    Neoria(Neoria),
    Kastra(Kastra),
}

#[derive(Component, Debug, Clone, Serialize, Deserialize)]
pub struct Facility {
    pub colony: ColonyId,
    pub kind: FacilityKind,
}

impl Facility {
    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        match &self.kind {
            FacilityKind::Neoria(n) => matches!(n.state, ShipCombatState::Destroyed),
            FacilityKind::Kastra(k) => matches!(k.state, ShipCombatState::Destroyed),
        }
    }

    #[must_use]
    pub fn is_crippled(&self) -> bool {
        match &self.kind {
            FacilityKind::Neoria(n) => matches!(n.state, ShipCombatState::Crippled),
            FacilityKind::Kastra(k) => matches!(k.state, ShipCombatState::Crippled),
        }
    }

    /// Open slot count = docks minus currently active constructions.
    #[must_use]
    pub fn open_dock_slots(&self) -> u8 {
        match &self.kind {
            FacilityKind::Neoria(n) => n.docks.saturating_sub(n.active_constructions.len() as u8),
            FacilityKind::Kastra(_) => 0,
        }
    }

 /// Cripple loses queued/active construction and repairs. Returns the dropped project ids
    /// for the caller to cancel in the project table.
    pub fn lose_queues_on_cripple(&mut self) -> Vec<ProjectId> {
        match &mut self.kind {
            FacilityKind::Neoria(n) => {
                let mut dropped: Vec<ProjectId> = n.active_constructions.drain(..).collect();
                dropped.extend(n.construction_queue.drain(..));
                n.repairs.clear();
                dropped
            }
            FacilityKind::Kastra(_) => Vec::new(),
        }
    }
}
