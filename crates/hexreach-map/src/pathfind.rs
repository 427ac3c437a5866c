//! Composition-aware shortest-path search over the jump-lane graph. See
//! 

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use hexreach_contracts::{ResolveError, SystemId};

use crate::galaxy::{LaneType, StarMap};

/// The fleet-composition facts the pathfinder needs to decide lane
/// admissibility. `hexreach-model` builds this from the actual fleet.
#[derive(Debug, Clone, Copy, Default)]
pub struct FleetComposition {
    /// True if the fleet carries any spacelift (unescorted transport-class)
 /// ships. Restricted lanes block these per 
    pub has_unescorted_spacelift: bool,
}

impl FleetComposition {
    #[must_use]
    pub fn admits(self, lane_type: LaneType) -> bool {
        match lane_type {
            LaneType::Major | LaneType::Minor => true,
            LaneType::Restricted => !self.has_unescorted_spacelift,
        }
    }
}

/// Edge weight by lane type — Major lanes are the fastest / most favored
/// route, Restricted the least (when admissible at all).
fn lane_cost(lane_type: LaneType) -> u32 {
    match lane_type {
        LaneType::Major => 1,
        LaneType::Minor => 2,
        LaneType::Restricted => 3,
    }
}

#[derive(Debug, PartialEq, Eq)]
struct Visit {
    cost: u32,
    system: SystemId,
}

impl Ord for Visit {
    fn cmp(&self, other: &Self) -> Ordering {
        // Min-heap via reversed ordering on cost; break ties on the raw
        // Entity bits so iteration order is deterministic for equal costs.
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.system.0.cmp(&self.system.0))
    }
}

impl PartialOrd for Visit {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A computed path: full system sequence, and per-jump lane type traversed
/// (used by movement execution to validate admissibility jump-by-jump).
#[derive(Debug, Clone)]
pub struct Path {
    pub systems: Vec<SystemId>,
    pub lane_types: Vec<LaneType>,
}

impl Path {
    #[must_use]
    pub fn first_jump(&self) -> Option<(SystemId, LaneType)> {
        self.systems.get(1).copied().zip(self.lane_types.first().copied())
    }
}

/// Dijkstra shortest path admissible for `composition`, weighted by lane
/// type. Returns `ResolveError::NoPath` when no admissible
/// route connects `from` to `to`.
pub fn shortest_path(
    map: &StarMap,
    from: SystemId,
    to: SystemId,
    composition: FleetComposition,
) -> Result<Path, ResolveError> {
    if from == to {
        return Ok(Path {
            systems: vec![from],
            lane_types: Vec::new(),
        });
    }

    let mut dist: HashMap<SystemId, u32> = HashMap::new();
    let mut prev: HashMap<SystemId, (SystemId, LaneType)> = HashMap::new();
    let mut heap = BinaryHeap::new();

    dist.insert(from, 0);
    heap.push(Visit {
        cost: 0,
        system: from,
    });

    while let Some(Visit { cost, system }) = heap.pop() {
        if system == to {
            break;
        }
        if cost > *dist.get(&system).unwrap_or(&u32::MAX) {
            continue;
        }
        for &(next, lane_type) in map.neighbors(system) {
            if !composition.admits(lane_type) {
                continue;
            }
            let next_cost = cost + lane_cost(lane_type);
            if next_cost < *dist.get(&next).unwrap_or(&u32::MAX) {
                dist.insert(next, next_cost);
                prev.insert(next, (system, lane_type));
                heap.push(Visit {
                    cost: next_cost,
                    system: next,
                });
            }
        }
    }

    if !dist.contains_key(&to) {
        return Err(ResolveError::NoPath { from, to });
    }

    let mut systems = vec![to];
    let mut lane_types = Vec::new();
    let mut cursor = to;
    while cursor != from {
        let (p, lane_type) = prev[&cursor];
        systems.push(p);
        lane_types.push(lane_type);
        cursor = p;
    }
    systems.reverse();
    lane_types.reverse();

    Ok(Path {
        systems,
        lane_types,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexreach_contracts::Store;

    #[test]
    fn path_from_system_to_itself_is_trivial() {
        let mut store = Store::new();
        let map = crate::galaxy::generate(&mut store, 2, 1, 5);
        let path = shortest_path(&map, map.hub, map.hub, FleetComposition::default()).unwrap();
        assert_eq!(path.systems, vec![map.hub]);
        assert!(path.lane_types.is_empty());
    }

    #[test]
    fn path_exists_between_hub_and_every_system() {
        let mut store = Store::new();
        let map = crate::galaxy::generate(&mut store, 2, 2, 11);
        for &system in &map.systems {
            let path = shortest_path(&map, map.hub, system, FleetComposition::default());
            assert!(path.is_ok(), "no path from hub to {system:?}");
        }
    }

    #[test]
    fn restricted_lanes_block_unescorted_spacelift() {
        let mut store = Store::new();
        let map = crate::galaxy::generate(&mut store, 3, 2, 123);
        let composition = FleetComposition {
            has_unescorted_spacelift: true,
        };
        // Every admissible path must avoid Restricted lanes entirely.
        if let Some(&far) = map.systems.last() {
            if let Ok(path) = shortest_path(&map, map.hub, far, composition) {
                assert!(!path.lane_types.contains(&LaneType::Restricted));
            }
        }
    }
}
