//! Creature value type.

use serde::{Deserialize, Serialize};
use shore_core::{Position, MAX_GENE};
use std::fmt;

/// A creature on the grid.
///
/// Ordered by gene, then position, so gene-ordered buckets can hold it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Creature {
    gene: i32,
    position: Position,
}

impl Creature {
    /// Create a creature with its gene clamped to `[0, MAX_GENE]`
    pub fn new(gene: i32, position: Position) -> Self {
        Self::with_bound(gene, position, MAX_GENE)
    }

    /// Create a creature with its gene clamped to `[0, max_gene]`
    pub fn with_bound(gene: i32, position: Position, max_gene: i32) -> Self {
        Self {
            gene: gene.clamp(0, max_gene.max(0)),
            position,
        }
    }

    pub fn gene(&self) -> i32 {
        self.gene
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn move_to(&mut self, position: Position) {
        self.position = position;
    }

    /// A child on the same cell with `gene + drift`, clamped to `[0, max_gene]`
    pub fn offspring(&self, drift: i32, max_gene: i32) -> Self {
        Self::with_bound(self.gene.saturating_add(drift), self.position, max_gene)
    }
}

impl fmt::Display for Creature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.gene, self.position)
    }
}
