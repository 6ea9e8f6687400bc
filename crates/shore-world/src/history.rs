//! Bounded FIFO of generations.

use crate::generation::CreaturePartition;
use shore_core::{Error, Result};
use std::collections::VecDeque;

/// Generations oldest first, holding at most `depth` entries.
///
/// Entries are whole partitions that are swapped in once fully built and
/// never mutated afterwards, so a reader of `current()` never observes a
/// generation under construction.
#[derive(Debug, Clone)]
pub struct GenerationHistory {
    entries: VecDeque<CreaturePartition>,
    depth: usize,
}

impl GenerationHistory {
    /// Fails with `Error::Config` when `depth` is zero
    pub fn new(depth: usize) -> Result<Self> {
        if depth == 0 {
            return Err(Error::Config(
                "generation history depth must be positive".to_string(),
            ));
        }
        Ok(Self {
            entries: VecDeque::with_capacity(depth + 1),
            depth,
        })
    }

    /// Append a generation, then evict the oldest entries beyond `depth`.
    /// Returns how many generations were evicted.
    pub fn push(&mut self, generation: CreaturePartition) -> usize {
        self.entries.push_back(generation);
        let mut evicted = 0;
        while self.entries.len() > self.depth {
            self.entries.pop_front();
            evicted += 1;
        }
        evicted
    }

    /// Newest generation
    pub fn current(&self) -> Option<&CreaturePartition> {
        self.entries.back()
    }

    pub fn oldest(&self) -> Option<&CreaturePartition> {
        self.entries.front()
    }

    /// Generations oldest first
    pub fn iter(&self) -> impl Iterator<Item = &CreaturePartition> + '_ {
        self.entries.iter()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.depth
    }
}
