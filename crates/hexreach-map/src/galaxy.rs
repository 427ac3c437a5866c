//! The star map: systems, the jump-lane graph, and deterministic
//! generation.

use std::collections::{HashMap, HashSet, VecDeque};

use bevy_ecs::component::Component;
use hexreach_contracts::{HouseId, Store, SystemId};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::coords::HexCoord;

/// Jump-lane classification. Restricted lanes impose fleet-composition
/// restrictions (non-escorted spacelift ships cannot traverse — enforced
/// by `hexreach-map::pathfind`, not here).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LaneType {
    Major,
    Minor,
    Restricted,
}

/// Component attached to every system entity.
#[derive(Component, Debug, Clone, Serialize, Deserialize)]
pub struct SystemNode {
    pub coord: HexCoord,
    pub ring: u32,
    pub assigned_player: Option<HouseId>,
}

/// A directed jump-lane record. The adjacency index mirrors every lane
/// bidirectionally, so callers never need to check both directions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct JumpLane {
    pub from: SystemId,
    pub to: SystemId,
    pub lane_type: LaneType,
}

/// The generated galaxy: systems plus the jump-lane graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StarMap {
    pub hub: SystemId,
    pub systems: Vec<SystemId>,
    adjacency: HashMap<SystemId, Vec<(SystemId, LaneType)>>,
}

impl StarMap {
    #[must_use]
    pub fn neighbors(&self, system: SystemId) -> &[(SystemId, LaneType)] {
        self.adjacency
            .get(&system)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    #[must_use]
    pub fn degree(&self, system: SystemId) -> usize {
        self.neighbors(system).len()
    }

    #[must_use]
    pub fn lane_between(&self, a: SystemId, b: SystemId) -> Option<LaneType> {
        self.neighbors(a)
            .iter()
            .find(|(n, _)| *n == b)
            .map(|(_, t)| *t)
    }

    /// BFS reachability check from the hub — every system must be
 /// reachable. A failure here is a generator bug, not bad input.
    #[must_use]
    pub fn all_reachable_from_hub(&self) -> bool {
        let mut seen = HashSet::new();
        let mut queue = VecDeque::from([self.hub]);
        seen.insert(self.hub);
        while let Some(cur) = queue.pop_front() {
            for (next, _) in self.neighbors(cur) {
                if seen.insert(*next) {
                    queue.push_back(*next);
                }
            }
        }
        seen.len() == self.systems.len()
    }

    /// Rewrites every `SystemId` this map holds through `table`, mapping
    /// old entity handles to the ones a save/load round-trip allocated.
    /// `adjacency` is private, so this is the one way a caller outside
    /// this module can fix up a deserialized `StarMap`.
    pub fn remap_ids(&mut self, table: &HashMap<SystemId, SystemId>) {
        let fix = |id: SystemId| table.get(&id).copied().unwrap_or(id);
        self.hub = fix(self.hub);
        self.systems = self.systems.iter().map(|&s| fix(s)).collect();
        self.adjacency = self
            .adjacency
            .drain()
            .map(|(k, v)| (fix(k), v.into_iter().map(|(n, t)| (fix(n), t)).collect()))
            .collect();
    }

    fn add_lane(&mut self, a: SystemId, b: SystemId, lane_type: LaneType) {
        self.adjacency.entry(a).or_default().push((b, lane_type));
        self.adjacency.entry(b).or_default().push((a, lane_type));
    }

    /// Removes every lane between `system` and its current neighbors
    /// except the ones in `keep`, preserving at least one `Major` lane
    /// among the kept set. Used when trimming a player's outer-ring
 /// corner system down to exactly 3 lanes.
    fn trim_to(&mut self, system: SystemId, keep: &HashSet<SystemId>) {
        let current = self.adjacency.remove(&system).unwrap_or_default();
        let mut kept: Vec<(SystemId, LaneType)> =
            current.iter().copied().filter(|(n, _)| keep.contains(n)).collect();
        if !kept.iter().any(|(_, t)| *t == LaneType::Major) {
            if let Some(first) = kept.first_mut() {
                first.1 = LaneType::Major;
            }
        }
        for (other, _) in &current {
            if !keep.contains(other) {
                if let Some(list) = self.adjacency.get_mut(other) {
                    list.retain(|(n, _)| *n != system);
                }
            }
        }
        self.adjacency.insert(system, kept);
    }
}

/// Generates a galaxy with `ring_count` rings around a central hub
/// (`1 + 3*n*(n+1)` systems total), assigns the hub exactly 6 `Major`
/// lanes, and seats `player_count` houses on outer-ring corner systems
/// (which naturally have degree 3 within a filled hex disk — 2 same-ring
/// neighbors plus 1 inward neighbor), trimmed/boosted so each ends up with
/// exactly 3 lanes including at least one `Major`.
///
/// # Panics
/// Panics (an `InvariantViolation`-class bug, not bad input) if the
/// generated graph leaves a system unreachable from the hub.
pub fn generate(store: &mut Store, ring_count: u32, player_count: usize, seed: u64) -> StarMap {
    let mut rng = ChaCha8Rng::seed_from_u64(seed ^ 0x4845_5831); // tag: "HEX1" lanes stream

    let mut coord_to_id: HashMap<HexCoord, SystemId> = HashMap::new();
    let mut systems = Vec::new();

    let hub_coord = HexCoord::ORIGIN;
    let hub = SystemId(store.spawn(SystemNode {
        coord: hub_coord,
        ring: 0,
        assigned_player: None,
    }));
    coord_to_id.insert(hub_coord, hub);
    systems.push(hub);

    for ring in 1..=ring_count {
        for coord in hub_coord.ring(ring) {
            let id = SystemId(store.spawn(SystemNode {
                coord,
                ring,
                assigned_player: None,
            }));
            coord_to_id.insert(coord, id);
            systems.push(id);
        }
    }

    let mut map = StarMap {
        hub,
        systems: systems.clone(),
        adjacency: HashMap::new(),
    };

    // Lane construction: every adjacent pair within the generated disk
    // gets exactly one lane, each direction visited once via a
    // canonical-order check to avoid double-adding.
    for &id in &systems {
        let node = store.get::<SystemNode>(id.0).expect("just spawned");
        let coord = node.coord;
        for neighbor_coord in coord.neighbors() {
            let Some(&neighbor_id) = coord_to_id.get(&neighbor_coord) else {
                continue;
            };
            if map.lane_between(id, neighbor_id).is_some() {
                continue; // already added from the other side
            }
            let lane_type = if id == hub || neighbor_id == hub {
                LaneType::Major
            } else {
                match rng.random_range(0..100) {
                    0..=19 => LaneType::Major,
                    20..=79 => LaneType::Minor,
                    _ => LaneType::Restricted,
                }
            };
            map.add_lane(id, neighbor_id, lane_type);
        }
    }

    seat_players(store, &mut map, &coord_to_id, ring_count, player_count);

    assert!(
        map.all_reachable_from_hub(),
        "star map generator produced an unreachable system — generator bug"
    );

    map
}

fn seat_players(
    store: &mut Store,
    map: &mut StarMap,
    coord_to_id: &HashMap<HexCoord, SystemId>,
    ring_count: u32,
    player_count: usize,
) {
    if ring_count == 0 || player_count == 0 {
        return;
    }
    for slot in 0..player_count {
        let direction = slot % 6;
        let corner = HexCoord::ORIGIN.ring_corner(ring_count, direction);
        let Some(&system) = coord_to_id.get(&corner) else {
            continue;
        };
        let keep: HashSet<SystemId> = map
            .neighbors(system)
            .iter()
            .map(|(n, _)| *n)
            .take(3)
            .collect();
        map.trim_to(system, &keep);

        if let Some(mut node) = store.get_mut::<SystemNode>(system.0) {
            // assigned_player is a HouseId placeholder until hexreach-model
            // creates the actual House entity at game init; callers set
            // the real HouseId afterwards via `assign_player`.
            node.assigned_player = None;
        }
    }
}

/// Assigns a house to a system already seated as a player slot by
/// `generate` (or any other system, for scenario setup in tests).
pub fn assign_player(store: &mut Store, system: SystemId, house: HouseId) {
    if let Some(mut node) = store.get_mut::<SystemNode>(system.0) {
        node.assigned_player = Some(house);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_count_matches_closed_form() {
        let mut store = Store::new();
        let n = 3u32;
        let map = generate(&mut store, n, 2, 1);
        let expected = 1 + 3 * n * (n + 1);
        assert_eq!(map.systems.len(), expected as usize);
    }

    #[test]
    fn hub_has_exactly_six_major_lanes() {
        let mut store = Store::new();
        let map = generate(&mut store, 2, 2, 42);
        let hub_lanes = map.neighbors(map.hub);
        assert_eq!(hub_lanes.len(), 6);
        assert!(hub_lanes.iter().all(|(_, t)| *t == LaneType::Major));
    }

    #[test]
    fn all_systems_reachable_from_hub() {
        let mut store = Store::new();
        let map = generate(&mut store, 4, 3, 7);
        assert!(map.all_reachable_from_hub());
    }

    #[test]
    fn player_corners_have_exactly_three_lanes_including_a_major() {
        let mut store = Store::new();
        let map = generate(&mut store, 3, 6, 99);
        for dir in 0..6 {
            let corner = HexCoord::ORIGIN.ring_corner(3, dir);
            // seat_players only trims systems that exist at that corner.
            if let Some(&id) = map.systems.iter().find(|s| {
                store.get::<SystemNode>(s.0).map(|n| n.coord) == Some(corner)
            }) {
                assert_eq!(map.degree(id), 3);
                assert!(map.neighbors(id).iter().any(|(_, t)| *t == LaneType::Major));
            }
        }
    }
}
