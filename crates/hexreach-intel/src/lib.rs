//! Fog-of-war projection and spy-scout travel/detection (C11, ).

pub mod fog;
pub mod mission;

pub use fog::{project_fog_of_war, refresh_intelligence, FogOfWarView, PublicHouseInfo, SystemVisibility, VisibleColony, VisibleFleet};
pub use mission::{advance_missions, start_mission, ScoutMission, ScoutMissionState};
