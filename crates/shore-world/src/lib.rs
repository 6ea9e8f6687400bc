//! World simulation engine.
//!
//! Creatures wander a fixed land/water grid. Every tick the current land
//! generation is advanced into a fresh land generation (offspring of the
//! creatures that landed) and a fresh water generation (the drowned), and a
//! delayed death sweep discards the drowned and checks for extinction.

pub mod creature;
pub mod generation;
pub mod grid;
pub mod history;
pub mod random;
pub mod render;
pub mod simulation;
pub mod stats;

#[cfg(test)]
mod testing;

pub use creature::Creature;
pub use generation::{creature_partition, CreaturePartition, Generation, Pipeline, TickReport};
pub use grid::Grid;
pub use history::GenerationHistory;
pub use random::{RandomSource, RngSource};
pub use render::{Renderer, Snapshot};
pub use simulation::{Outcome, Phase, Simulation};
pub use stats::{PopulationStats, RunSummary};

pub use shore_partition::{Bucket, KeyedPartition};
