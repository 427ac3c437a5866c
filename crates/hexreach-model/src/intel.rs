//! IntelligenceDB: per-house cached reports.

use std::collections::HashMap;

use hexreach_contracts::{ColonyId, FleetId, SystemId};
use serde::{Deserialize, Serialize};

/// How fresh/reliable a cached report is. Scouted reports degrade over
/// time (staleness is computed from `gathered_turn` by the consumer, not
/// stored here).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum IntelQuality {
    /// Gathered this turn by a live scout or owned/occupied presence.
    Live,
    /// Gathered on a previous turn; may be out of date.
    Stale,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColonyReport {
    pub colony: ColonyId,
    pub owner_name: String,
    pub pu_estimate: u32,
    pub gathered_turn: u32,
    pub quality: IntelQuality,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemReport {
    pub system: SystemId,
    pub gathered_turn: u32,
    pub quality: IntelQuality,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FleetReport {
    pub fleet: FleetId,
    pub squadron_count_estimate: u32,
    pub gathered_turn: u32,
    pub quality: IntelQuality,
}

/// A house's cached knowledge of the galaxy, built from fog-of-war
/// projection (`hexreach-intel`) and persisted between turns.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IntelligenceDb {
    pub colonies: HashMap<ColonyId, ColonyReport>,
    pub systems: HashMap<SystemId, SystemReport>,
    pub fleets: HashMap<FleetId, FleetReport>,
}

impl IntelligenceDb {
    pub fn record_colony(&mut self, report: ColonyReport) {
        self.colonies.insert(report.colony, report);
    }

    pub fn record_system(&mut self, report: SystemReport) {
        self.systems.insert(report.system, report);
    }

    pub fn record_fleet(&mut self, report: FleetReport) {
        self.fleets.insert(report.fleet, report);
    }

    /// Marks every cached report as stale. Called at the start of fog
    /// projection before fresh `Live` reports overwrite what's still
    /// currently visible.
    pub fn mark_all_stale(&mut self) {
        for r in self.colonies.values_mut() {
            r.quality = IntelQuality::Stale;
        }
        for r in self.systems.values_mut() {
            r.quality = IntelQuality::Stale;
        }
        for r in self.fleets.values_mut() {
            r.quality = IntelQuality::Stale;
        }
    }
}
