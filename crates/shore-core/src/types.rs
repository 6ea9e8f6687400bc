//! Core type definitions for the simulation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Upper bound of the gene value.
pub const MAX_GENE: i32 = 100;

/// Default side length of the square world grid.
pub const DEFAULT_SIDE: i32 = 16;

/// Number of offspring a creature leaves behind when it lands.
pub const OFFSPRING_PER_SURVIVOR: usize = 3;

/// 2D cell position in the world
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Clamp both axes into `[0, side - 1]`
    pub fn clamped(&self, side: i32) -> Self {
        let max = (side - 1).max(0);
        Self {
            x: self.x.clamp(0, max),
            y: self.y.clamp(0, max),
        }
    }

    pub fn within(&self, side: i32) -> bool {
        (0..side).contains(&self.x) && (0..side).contains(&self.y)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Terrain of a single cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Terrain {
    Land,
    Water,
}

impl Terrain {
    pub fn is_land(&self) -> bool {
        matches!(self, Terrain::Land)
    }
}

impl From<bool> for Terrain {
    fn from(land: bool) -> Self {
        if land {
            Terrain::Land
        } else {
            Terrain::Water
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_clamp() {
        assert_eq!(Position::new(-1, 3).clamped(4), Position::new(0, 3));
        assert_eq!(Position::new(4, 7).clamped(4), Position::new(3, 3));
        assert_eq!(Position::new(2, 2).clamped(4), Position::new(2, 2));
    }

    #[test]
    fn test_position_ordering() {
        // Buckets are enumerated by x first, then y
        let mut positions = vec![Position::new(1, 0), Position::new(0, 5), Position::new(0, 1)];
        positions.sort();
        assert_eq!(
            positions,
            vec![Position::new(0, 1), Position::new(0, 5), Position::new(1, 0)]
        );
    }

    #[test]
    fn test_within() {
        assert!(Position::new(0, 0).within(1));
        assert!(!Position::new(1, 0).within(1));
        assert!(!Position::new(0, -1).within(4));
    }

    #[test]
    fn test_terrain_from_bool() {
        assert_eq!(Terrain::from(true), Terrain::Land);
        assert!(!Terrain::from(false).is_land());
    }
}
