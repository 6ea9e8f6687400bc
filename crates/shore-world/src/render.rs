//! Read-only views handed to renderers.

use crate::generation::CreaturePartition;
use crate::grid::Grid;
use crate::history::GenerationHistory;
use crate::simulation::Phase;
use shore_core::Result;

/// Borrowed view of the simulation between phases.
///
/// Holding a snapshot borrows the simulation, so no generation can be
/// swapped in while a renderer reads it.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub grid: &'a Grid,
    pub land: &'a GenerationHistory,
    pub water: &'a GenerationHistory,
    pub tick: u64,
    pub phase: Phase,
    pub max_gene: i32,
}

impl<'a> Snapshot<'a> {
    /// The living generation
    pub fn current_land(&self) -> Option<&'a CreaturePartition> {
        self.land.current()
    }

    /// The drowned cohort, present only between animate and the death sweep
    pub fn current_water(&self) -> Option<&'a CreaturePartition> {
        self.water.current()
    }

    pub fn population(&self) -> usize {
        self.current_land().map_or(0, |g| g.len())
    }

    pub fn is_land(&self, pos: shore_core::Position) -> bool {
        self.grid.is_land(pos)
    }
}

/// Consumer of snapshots, invoked after each phase
pub trait Renderer {
    fn render(&mut self, view: &Snapshot<'_>) -> Result<()>;
}
