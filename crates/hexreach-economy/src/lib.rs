//! Production, construction, maintenance, auto-assignment, and
//! research/tech advancement.

pub mod advancement;
pub mod auto_assign;
pub mod construction;
pub mod maintenance;
pub mod production;
pub mod research;

pub use advancement::{advance_tech, BreakthroughTier};
pub use auto_assign::{auto_assign_colony, auto_assign_house};
pub use construction::{advance_constructions, enqueue_build_order, project_cost};
pub use maintenance::{compute_maintenance, debit_maintenance};
pub use production::{available_production_points, gross_production, population_growth, tax_income};
pub use research::{accumulate_investment, accumulate_research};
