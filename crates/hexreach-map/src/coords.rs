//! Axial hex coordinates wrapping `hexx::Hex` behind a newtype — callers
//! never touch `hexx::Hex` directly.

use hexx::Hex;
use serde::{Deserialize, Serialize};

/// Axial hex coordinate for a system in the star map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HexCoord {
    pub q: i32,
    pub r: i32,
}

impl HexCoord {
    #[must_use]
    pub fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    #[must_use]
    pub const ORIGIN: Self = Self { q: 0, r: 0 };

    #[must_use]
    pub fn to_hex(self) -> Hex {
        Hex::new(self.q, self.r)
    }

    #[must_use]
    pub fn from_hex(hex: Hex) -> Self {
        Self {
            q: hex.x(),
            r: hex.y(),
        }
    }

    /// The 6 axial unit directions, in a fixed consistent order. Used both
    /// for neighbor enumeration and for placing outer-ring corners — the
    /// same ordering `neighbors()` walks so corner math stays self-
    /// consistent without depending on `hexx`'s internal ring walk order.
    const DIRECTIONS: [(i32, i32); 6] = [(1, 0), (1, -1), (0, -1), (-1, 0), (-1, 1), (0, 1)];

    #[must_use]
    pub fn neighbors(self) -> [Self; 6] {
        Self::DIRECTIONS.map(|(dq, dr)| Self::new(self.q + dq, self.r + dr))
    }

    /// All hex coordinates at exactly `radius` distance from `self`.
    #[must_use]
    pub fn ring(self, radius: u32) -> Vec<Self> {
        self.to_hex().ring(radius).map(Self::from_hex).collect()
    }

    /// All hex coordinates within `radius` distance (inclusive of `self`).
    #[must_use]
    pub fn range(self, radius: u32) -> Vec<Self> {
        self.to_hex().range(radius).map(Self::from_hex).collect()
    }

    /// One of the 6 corner positions of the ring at `radius` from `self`,
    /// identified by direction index `0..6`.
    #[must_use]
    pub fn ring_corner(self, radius: u32, direction: usize) -> Self {
        let (dq, dr) = Self::DIRECTIONS[direction % 6];
        Self::new(self.q + dq * radius as i32, self.r + dr * radius as i32)
    }

    /// Axial hex distance, computed directly (doesn't round-trip through
    /// `hexx` so it stays stable regardless of that crate's own distance
    /// method naming across versions).
    #[must_use]
    pub fn distance(self, other: Self) -> u32 {
        let dq = self.q - other.q;
        let dr = self.r - other.r;
        ((dq.abs() + dr.abs() + (dq + dr).abs()) / 2) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_corner_is_exactly_radius_away() {
        let origin = HexCoord::ORIGIN;
        for dir in 0..6 {
            let corner = origin.ring_corner(3, dir);
            assert_eq!(origin.distance(corner), 3);
        }
    }

    #[test]
    fn neighbors_are_all_distance_one() {
        let origin = HexCoord::ORIGIN;
        for n in origin.neighbors() {
            assert_eq!(origin.distance(n), 1);
        }
    }

    #[test]
    fn ring_matches_neighbor_count_at_radius_one() {
        let origin = HexCoord::ORIGIN;
        assert_eq!(origin.ring(1).len(), 6);
    }
}
