//! Square land/water grid for the world.

use crate::random::RandomSource;
use serde::{Deserialize, Serialize};
use shore_core::{Error, Position, Result, Terrain, WorldConfig};

/// Immutable terrain map. `true` cells are land.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    side: i32,
    cells: Vec<bool>,
}

impl Grid {
    /// Build a grid from row-major cells
    pub fn from_cells(side: i32, cells: Vec<bool>) -> Result<Self> {
        if side <= 0 {
            return Err(Error::Config(format!("grid side must be positive, got {}", side)));
        }
        let expected = (side as usize) * (side as usize);
        if cells.len() != expected {
            return Err(Error::Config(format!(
                "grid of side {} needs {} cells, got {}",
                side,
                expected,
                cells.len()
            )));
        }
        Ok(Self { side, cells })
    }

    /// Parse rows of `#` (land) and `~` or `.` (water), top row first
    pub fn from_rows(rows: &[&str]) -> Result<Self> {
        let side = rows.len() as i32;
        let mut cells = Vec::with_capacity(rows.len() * rows.len());

        for (y, row) in rows.iter().enumerate() {
            if row.chars().count() != rows.len() {
                return Err(Error::Config(format!(
                    "row {} has {} cells, expected {}",
                    y,
                    row.chars().count(),
                    rows.len()
                )));
            }
            for c in row.chars() {
                match c {
                    '#' => cells.push(true),
                    '~' | '.' => cells.push(false),
                    other => {
                        return Err(Error::Config(format!(
                            "unknown terrain glyph {:?} in row {}",
                            other, y
                        )))
                    }
                }
            }
        }

        Self::from_cells(side, cells)
    }

    /// Generate random terrain from configuration. The centre cell is
    /// always land so the seed creature starts alive.
    pub fn generate<R: RandomSource>(config: &WorldConfig, rng: &mut R) -> Result<Self> {
        if config.side <= 0 {
            return Err(Error::Config(format!(
                "grid side must be positive, got {}",
                config.side
            )));
        }
        if !(0.0..=1.0).contains(&config.land_probability) {
            return Err(Error::Config(format!(
                "land probability must be within [0, 1], got {}",
                config.land_probability
            )));
        }

        let size = (config.side as usize) * (config.side as usize);
        let cells = (0..size)
            .map(|_| rng.chance(config.land_probability))
            .collect();

        let mut grid = Self::from_cells(config.side, cells)?;
        let centre = grid.centre();
        let index = grid.index(centre);
        grid.cells[index] = true;
        Ok(grid)
    }

    pub fn side(&self) -> i32 {
        self.side
    }

    pub fn centre(&self) -> Position {
        Position::new(self.side / 2, self.side / 2)
    }

    /// Terrain at a position. Out-of-range positions are clamped onto the grid.
    pub fn terrain(&self, pos: Position) -> Terrain {
        Terrain::from(self.is_land(pos))
    }

    pub fn is_land(&self, pos: Position) -> bool {
        self.cells[self.index(pos.clamped(self.side))]
    }

    /// The 3x3 window around `pos`, self included, clamped to the grid.
    /// Edge cells repeat in the window.
    pub fn neighbourhood(&self, pos: Position) -> [Position; 9] {
        let mut window = [pos; 9];
        let mut i = 0;
        for dx in -1..=1 {
            for dy in -1..=1 {
                window[i] = pos.offset(dx, dy).clamped(self.side);
                i += 1;
            }
        }
        window
    }

    pub fn land_count(&self) -> usize {
        self.cells.iter().filter(|&&land| land).count()
    }

    /// Iterator over all positions, row by row
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.cells.len()).map(move |i| self.index_to_pos(i))
    }

    fn index(&self, pos: Position) -> usize {
        cell_index(self.side, pos)
    }

    fn index_to_pos(&self, index: usize) -> Position {
        cell_position(self.side, index)
    }
}

/// Row-major index of an on-grid position, computed in `usize`
fn cell_index(side: i32, pos: Position) -> usize {
    pos.y as usize * side as usize + pos.x as usize
}

fn cell_position(side: i32, index: usize) -> Position {
    let side = side as usize;
    Position::new((index % side) as i32, (index / side) as i32)
}
