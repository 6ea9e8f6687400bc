//! Population statistics and run summaries.

use crate::generation::CreaturePartition;
use serde::{Deserialize, Serialize};

/// Snapshot statistics of one generation
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PopulationStats {
    pub population: usize,
    pub occupied_cells: usize,
    pub min_gene: Option<i32>,
    pub max_gene: Option<i32>,
    pub mean_gene: f64,
}

impl PopulationStats {
    pub fn of(generation: &CreaturePartition) -> Self {
        let mut stats = Self {
            population: generation.len(),
            occupied_cells: generation.bucket_count(),
            ..Default::default()
        };

        let mut total: i64 = 0;
        for creature in generation.values() {
            let gene = creature.gene();
            total += gene as i64;
            stats.min_gene = Some(stats.min_gene.map_or(gene, |m| m.min(gene)));
            stats.max_gene = Some(stats.max_gene.map_or(gene, |m| m.max(gene)));
        }

        if stats.population > 0 {
            stats.mean_gene = total as f64 / stats.population as f64;
        }
        stats
    }
}

/// Totals for a whole run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub ticks: u64,
    pub final_population: usize,
    pub peak_population: usize,
    pub total_born: u64,
    pub total_drowned: u64,
    pub extinct: bool,
    pub final_stats: PopulationStats,
}
