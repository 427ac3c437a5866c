//! Star map generation and composition-aware pathfinding (C2).

pub mod coords;
pub mod galaxy;
pub mod pathfind;

pub use coords::HexCoord;
pub use galaxy::{assign_player, generate, JumpLane, LaneType, StarMap, SystemNode};
pub use pathfind::{shortest_path, FleetComposition, Path};
