//! Per-system combat resolution: task force assembly, the
//! ambush/intercept/main-engagement phase machine, target bucket
//! selection, the Combat Effectiveness Roll, retreat evaluation, and
//! post-combat cleanup.

pub mod buckets;
pub mod cer;
pub mod cleanup;
pub mod engine;
pub mod phase;
pub mod retreat;
pub mod task_force;

pub use buckets::{classify_facility, classify_squadron, select_bucket, TargetBucket};
pub use cer::{roll, CerModifiers, CerResult};
pub use cleanup::cleanup_system;
pub use engine::{resolve_combat, CombatReport};
pub use phase::CombatPhase;
pub use retreat::evaluate_retreats;
pub use task_force::TaskForce;
