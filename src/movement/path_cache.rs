//! Per-agent cached path that survives between steps

use serde::{Deserialize, Serialize};

use crate::core::types::Tile;

/// The `(target, range)` pair a cached path was computed for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PathFingerprint {
    pub target: Tile,
    pub range: u32,
}

/// Movement state persisted on each agent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MovementState {
    /// Remaining steps, excluding the tile the agent stands on
    pub cached_path: Vec<Tile>,
    pub fingerprint: Option<PathFingerprint>,
}

impl MovementState {
    /// Next step of the cached path, if it is still usable from `position`
    ///
    /// The cache is unusable when it was computed for a different approach or
    /// when its first step is no longer adjacent (the agent was displaced).
    pub fn usable_step(&self, position: Tile, fingerprint: PathFingerprint) -> Option<Tile> {
        if self.fingerprint != Some(fingerprint) {
            return None;
        }
        self.cached_path
            .first()
            .copied()
            .filter(|step| position.is_adjacent(*step))
    }

    pub fn store(&mut self, fingerprint: PathFingerprint, path: Vec<Tile>) {
        self.fingerprint = Some(fingerprint);
        self.cached_path = path;
    }

    /// Drop the first step after the agent has moved onto it
    pub fn advance(&mut self) {
        if !self.cached_path.is_empty() {
            self.cached_path.remove(0);
        }
    }

    pub fn clear(&mut self) {
        self.cached_path.clear();
        self.fingerprint = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fp(x: i32, y: i32, range: u32) -> PathFingerprint {
        PathFingerprint {
            target: Tile::new(x, y),
            range,
        }
    }

    #[test]
    fn test_usable_when_fingerprint_matches_and_adjacent() {
        let mut state = MovementState::default();
        state.store(fp(9, 5, 1), vec![Tile::new(6, 5), Tile::new(7, 5)]);
        assert_eq!(state.usable_step(Tile::new(5, 5), fp(9, 5, 1)), Some(Tile::new(6, 5)));
    }

    #[test]
    fn test_unusable_after_target_or_range_change() {
        let mut state = MovementState::default();
        state.store(fp(9, 5, 1), vec![Tile::new(6, 5)]);
        assert_eq!(state.usable_step(Tile::new(5, 5), fp(9, 6, 1)), None);
        assert_eq!(state.usable_step(Tile::new(5, 5), fp(9, 5, 3)), None);
    }

    #[test]
    fn test_unusable_after_displacement() {
        let mut state = MovementState::default();
        state.store(fp(9, 5, 1), vec![Tile::new(6, 5)]);
        assert_eq!(state.usable_step(Tile::new(5, 8), fp(9, 5, 1)), None);
    }

    #[test]
    fn test_advance_consumes_steps() {
        let mut state = MovementState::default();
        state.store(fp(9, 5, 1), vec![Tile::new(6, 5), Tile::new(7, 5)]);
        state.advance();
        assert_eq!(state.usable_step(Tile::new(6, 5), fp(9, 5, 1)), Some(Tile::new(7, 5)));
        state.advance();
        state.advance();
        assert!(state.cached_path.is_empty());
    }
}
