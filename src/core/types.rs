//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for agents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(pub Uuid);

impl AgentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for AgentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // First block is plenty for log lines
        let s = self.0.simple().to_string();
        write!(f, "agent-{}", &s[..8])
    }
}

/// Identifier for world objects (structures, sites, nodes, hostiles)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub u32);

/// Zone identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ZoneId(pub u32);

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "zone-{}", self.0)
    }
}

/// Simulation step counter
pub type Step = u64;

/// One of the eight compass directions a single-tile move can take
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Top,
    TopRight,
    Right,
    BottomRight,
    Bottom,
    BottomLeft,
    Left,
    TopLeft,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::Top,
        Direction::TopRight,
        Direction::Right,
        Direction::BottomRight,
        Direction::Bottom,
        Direction::BottomLeft,
        Direction::Left,
        Direction::TopLeft,
    ];

    /// Tile delta (y grows downward)
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Top => (0, -1),
            Direction::TopRight => (1, -1),
            Direction::Right => (1, 0),
            Direction::BottomRight => (1, 1),
            Direction::Bottom => (0, 1),
            Direction::BottomLeft => (-1, 1),
            Direction::Left => (-1, 0),
            Direction::TopLeft => (-1, -1),
        }
    }

    pub fn from_delta(dx: i32, dy: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.delta() == (dx, dy))
    }
}

/// A tile position within a zone
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Tile {
    pub x: i32,
    pub y: i32,
}

impl Tile {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Chebyshev distance; diagonal steps cost the same as straight ones
    pub fn range_to(&self, other: Tile) -> u32 {
        (self.x - other.x).unsigned_abs().max((self.y - other.y).unsigned_abs())
    }

    pub fn is_adjacent(&self, other: Tile) -> bool {
        self.range_to(other) == 1
    }

    pub fn offset(&self, direction: Direction) -> Tile {
        let (dx, dy) = direction.delta();
        Tile::new(self.x + dx, self.y + dy)
    }

    /// Direction of a single step to an adjacent tile
    pub fn direction_to(&self, other: Tile) -> Option<Direction> {
        Direction::from_delta(other.x - self.x, other.y - self.y)
    }

    pub fn neighbors(&self) -> impl Iterator<Item = Tile> + '_ {
        Direction::ALL.into_iter().map(move |d| self.offset(d))
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_is_chebyshev() {
        let a = Tile::new(5, 5);
        assert_eq!(a.range_to(Tile::new(6, 6)), 1);
        assert_eq!(a.range_to(Tile::new(8, 6)), 3);
        assert_eq!(a.range_to(a), 0);
    }

    #[test]
    fn test_adjacency_excludes_self() {
        let a = Tile::new(5, 5);
        assert!(a.is_adjacent(Tile::new(4, 4)));
        assert!(!a.is_adjacent(a));
        assert!(!a.is_adjacent(Tile::new(7, 5)));
    }

    #[test]
    fn test_direction_round_trip_through_offset() {
        let origin = Tile::new(10, 10);
        for dir in Direction::ALL {
            let next = origin.offset(dir);
            assert_eq!(origin.direction_to(next), Some(dir));
        }
        assert_eq!(origin.direction_to(Tile::new(12, 10)), None);
    }

    #[test]
    fn test_agent_id_display_is_short() {
        let id = AgentId::new();
        let shown = id.to_string();
        assert!(shown.starts_with("agent-"));
        assert_eq!(shown.len(), "agent-".len() + 8);
    }
}
