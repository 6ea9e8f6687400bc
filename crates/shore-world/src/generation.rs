//! Per-tick generation pipeline.
//!
//! One call to [`Pipeline::advance`] reads the current land generation and
//! builds two new partitions: the offspring of every creature that ends its
//! move on land, and every creature that ends its move on water. The input
//! partition is never mutated.

use crate::creature::Creature;
use crate::grid::Grid;
use crate::random::RandomSource;
use serde::{Deserialize, Serialize};
use shore_core::{Error, Position, Result, SimConfig, Terrain};
use shore_partition::KeyedPartition;
use tracing::trace;

/// Creatures bucketed by grid cell, in insertion order within a cell
pub type CreaturePartition = KeyedPartition<Creature, Position>;

/// An empty partition keyed by creature position
pub fn creature_partition() -> CreaturePartition {
    KeyedPartition::new(|creature: &Creature| creature.position())
}

/// Counts gathered while advancing one generation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickReport {
    /// Creatures in the generation that was read
    pub parents: usize,
    /// Parents that ended on land
    pub survivors: usize,
    /// Parents that ended on water
    pub drowned: usize,
    /// Offspring inserted into the next land generation
    pub born: usize,
}

/// The two partitions produced by one tick
#[derive(Debug)]
pub struct Generation {
    pub land: CreaturePartition,
    pub water: CreaturePartition,
    pub report: TickReport,
}

#[derive(Debug, Clone)]
pub struct Pipeline {
    max_gene: i32,
    offspring_per_survivor: usize,
    max_population: Option<usize>,
}

impl Pipeline {
    /// Fails with `Error::Config` unless `max_gene` and
    /// `offspring_per_survivor` are both positive.
    pub fn new(max_gene: i32, offspring_per_survivor: usize) -> Result<Self> {
        if max_gene <= 0 {
            return Err(Error::Config(format!(
                "max gene must be positive, got {}",
                max_gene
            )));
        }
        if offspring_per_survivor == 0 {
            return Err(Error::Config(
                "offspring per survivor must be positive".to_string(),
            ));
        }
        Ok(Self {
            max_gene,
            offspring_per_survivor,
            max_population: None,
        })
    }

    pub fn from_config(config: &SimConfig) -> Result<Self> {
        Ok(
            Self::new(config.genetics.max_gene, config.genetics.offspring_per_survivor)?
                .with_max_population(config.limits.max_population),
        )
    }

    /// Refuse to build land generations larger than `limit`
    pub fn with_max_population(mut self, limit: Option<usize>) -> Self {
        self.max_population = limit;
        self
    }

    pub fn max_gene(&self) -> i32 {
        self.max_gene
    }

    /// Advance `current` by one tick.
    ///
    /// Fails with `ResourceExhausted` when the land generation would exceed
    /// the population cap; nothing is returned in that case.
    pub fn advance<R: RandomSource>(
        &self,
        grid: &Grid,
        current: &CreaturePartition,
        rng: &mut R,
    ) -> Result<Generation> {
        let mut land = creature_partition();
        let mut water = creature_partition();
        let mut report = TickReport {
            parents: current.len(),
            ..Default::default()
        };

        for (_, parent) in current.iter() {
            let mut creature = *parent;
            self.relocate(grid, &mut creature, rng);

            if grid.is_land(creature.position()) {
                if let Some(limit) = self.max_population {
                    if land.len() + self.offspring_per_survivor > limit {
                        return Err(Error::ResourceExhausted(format!(
                            "next generation would exceed {} creatures",
                            limit
                        )));
                    }
                }

                for _ in 0..self.offspring_per_survivor {
                    land.insert(creature.offspring(rng.drift(), self.max_gene));
                }
                report.survivors += 1;
                report.born += self.offspring_per_survivor;
            } else {
                water.insert(creature);
                report.drowned += 1;
            }
        }

        trace!(
            parents = report.parents,
            survivors = report.survivors,
            drowned = report.drowned,
            born = report.born,
            "Generation advanced"
        );

        Ok(Generation { land, water, report })
    }

    /// Terrain the creature will try to move onto. Higher genes favour land.
    pub fn choose_target<R: RandomSource>(&self, creature: &Creature, rng: &mut R) -> Terrain {
        if rng.roll(self.max_gene) > creature.gene() {
            Terrain::Water
        } else {
            Terrain::Land
        }
    }

    /// Move the creature to a neighbouring cell of its chosen terrain
    pub fn relocate<R: RandomSource>(
        &self,
        grid: &Grid,
        creature: &mut Creature,
        rng: &mut R,
    ) -> Position {
        let target = self.choose_target(creature, rng);
        let pos = choose_neighbour(grid, creature.position(), target, rng);
        creature.move_to(pos);
        pos
    }
}

/// Pick a cell of `target` terrain uniformly from the clamped 3x3 window
/// around `pos`, or stay at `pos` when there is none.
pub fn choose_neighbour<R: RandomSource>(
    grid: &Grid,
    pos: Position,
    target: Terrain,
    rng: &mut R,
) -> Position {
    let mut candidates = [pos; 9];
    let mut count = 0;
    for cell in grid.neighbourhood(pos) {
        if grid.terrain(cell) == target {
            candidates[count] = cell;
            count += 1;
        }
    }

    if count == 0 {
        pos
    } else {
        candidates[rng.pick(count)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::RngSource;
    use crate::testing::Scripted;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn island() -> Grid {
        Grid::from_rows(&["~~~~", "~~~~", "~~#~", "~~~~"]).unwrap()
    }

    fn ocean() -> Grid {
        Grid::from_rows(&["~~~~", "~~~~", "~~~~", "~~~~"]).unwrap()
    }

    fn default_pipeline() -> Pipeline {
        Pipeline::new(shore_core::MAX_GENE, shore_core::OFFSPRING_PER_SURVIVOR).unwrap()
    }

    fn seeded(creatures: &[Creature]) -> CreaturePartition {
        let mut partition = creature_partition();
        partition.extend(creatures.iter().copied());
        partition
    }

    #[test]
    fn test_lander_leaves_three_offspring() {
        let grid = island();
        let current = seeded(&[Creature::new(50, Position::new(2, 2))]);
        let mut rng = Scripted::new(&[10], &[0], &[-1, 0, 1]);

        let next = default_pipeline().advance(&grid, &current, &mut rng).unwrap();

        assert_eq!(next.land.len(), 3);
        assert!(next.water.is_empty());
        assert_eq!(next.land.keys().copied().collect::<Vec<_>>(), vec![Position::new(2, 2)]);
        let genes: Vec<i32> = next.land.values().map(|c| c.gene()).collect();
        assert_eq!(genes, vec![49, 50, 51]);
        assert_eq!(
            next.report,
            TickReport {
                parents: 1,
                survivors: 1,
                drowned: 0,
                born: 3
            }
        );
        assert!(rng.exhausted());

        // The generation that was read is untouched
        assert_eq!(current.len(), 1);
    }

    #[test]
    fn test_high_roll_sends_creature_to_water() {
        let grid = island();
        let current = seeded(&[Creature::new(50, Position::new(2, 2))]);
        // Eight water cells around (2, 2); index 0 is (1, 1)
        let mut rng = Scripted::new(&[51], &[0], &[]);

        let next = default_pipeline().advance(&grid, &current, &mut rng).unwrap();

        assert!(next.land.is_empty());
        assert_eq!(next.water.len(), 1);
        let drowned = next.water.values().next().unwrap();
        assert_eq!(drowned.position(), Position::new(1, 1));
        assert_eq!(drowned.gene(), 50);
    }

    #[test]
    fn test_drowned_cohort_is_not_reproduced() {
        let grid = ocean();
        let creatures = [
            Creature::new(10, Position::new(0, 0)),
            Creature::new(20, Position::new(1, 3)),
            Creature::new(0, Position::new(3, 1)),
        ];
        let current = seeded(&creatures);
        // Enumeration order is (0,0), (1,3), (3,1). The first two aim for
        // water and pick the centre of their window; the last aims for land,
        // finds none and stays without consuming a pick.
        let mut rng = Scripted::new(&[90, 90, 0], &[4, 4], &[]);

        let next = default_pipeline().advance(&grid, &current, &mut rng).unwrap();

        assert!(next.land.is_empty());
        assert_eq!(next.water.len(), 3);
        let positions: Vec<Position> = next.water.keys().copied().collect();
        assert_eq!(
            positions,
            vec![Position::new(0, 0), Position::new(1, 3), Position::new(3, 1)]
        );
        let genes: Vec<i32> = next.water.values().map(|c| c.gene()).collect();
        assert_eq!(genes, vec![10, 20, 0]);
        assert!(rng.exhausted());
    }

    #[test]
    fn test_choose_target_threshold() {
        let pipeline = default_pipeline();
        let creature = Creature::new(40, Position::new(0, 0));

        let mut rng = Scripted::new(&[40, 41], &[], &[]);
        assert_eq!(pipeline.choose_target(&creature, &mut rng), Terrain::Land);
        assert_eq!(pipeline.choose_target(&creature, &mut rng), Terrain::Water);
    }

    #[test]
    fn test_choose_neighbour_without_match_stays() {
        let grid = ocean();
        let mut rng = Scripted::default();
        let pos = choose_neighbour(&grid, Position::new(2, 1), Terrain::Land, &mut rng);
        assert_eq!(pos, Position::new(2, 1));
    }

    #[test]
    fn test_choose_neighbour_counts_clamped_duplicates() {
        // Only the corner is land; it appears four times in its own window
        let grid = Grid::from_rows(&["#~~", "~~~", "~~~"]).unwrap();
        let mut rng = Scripted::new(&[], &[3], &[]);
        let pos = choose_neighbour(&grid, Position::new(0, 0), Terrain::Land, &mut rng);
        assert_eq!(pos, Position::new(0, 0));
    }

    #[test]
    fn test_population_cap() {
        let grid = island();
        let current = seeded(&[
            Creature::new(100, Position::new(2, 2)),
            Creature::new(100, Position::new(2, 2)),
        ]);
        let mut rng = RngSource::new(ChaCha8Rng::seed_from_u64(5));

        let pipeline = default_pipeline().with_max_population(Some(4));
        let err = pipeline.advance(&grid, &current, &mut rng).unwrap_err();
        assert!(matches!(err, Error::ResourceExhausted(_)));

        let pipeline = default_pipeline().with_max_population(Some(6));
        let next = pipeline.advance(&grid, &current, &mut rng).unwrap();
        assert_eq!(next.land.len(), 6);
    }

    #[test]
    fn test_offspring_count_is_configurable() {
        let grid = island();
        let current = seeded(&[Creature::new(100, Position::new(2, 2))]);
        let mut rng = Scripted::new(&[0], &[0], &[0, 0, 0, 0, 0]);

        let next = Pipeline::new(100, 5).unwrap().advance(&grid, &current, &mut rng).unwrap();
        assert_eq!(next.land.len(), 5);
        assert_eq!(next.report.born, 5);
    }

    #[test]
    fn test_pipeline_rejects_bad_bounds() {
        assert!(matches!(Pipeline::new(0, 3), Err(Error::Config(_))));
        assert!(matches!(Pipeline::new(-1, 3), Err(Error::Config(_))));
        assert!(matches!(Pipeline::new(100, 0), Err(Error::Config(_))));

        let mut config = SimConfig::default();
        config.genetics.max_gene = -5;
        assert!(matches!(Pipeline::from_config(&config), Err(Error::Config(_))));
    }

    proptest::proptest! {
        #[test]
        fn prop_classification_matches_terrain(seed in 0u64..500, genes in proptest::collection::vec(0..=100i32, 1..20)) {
            let mut rng = RngSource::new(ChaCha8Rng::seed_from_u64(seed));
            let grid = Grid::generate(&shore_core::WorldConfig { side: 6, land_probability: 0.5 }, &mut rng).unwrap();
            let current = seeded(
                &genes
                    .iter()
                    .enumerate()
                    .map(|(i, g)| Creature::new(*g, Position::new(i as i32 % 6, i as i32 / 6)))
                    .collect::<Vec<_>>(),
            );

            let next = default_pipeline().advance(&grid, &current, &mut rng).unwrap();

            proptest::prop_assert_eq!(next.land.len(), next.report.survivors * 3);
            proptest::prop_assert_eq!(next.water.len(), next.report.drowned);
            proptest::prop_assert_eq!(next.report.survivors + next.report.drowned, current.len());

            for (pos, creature) in next.land.iter() {
                proptest::prop_assert!(grid.is_land(*pos));
                proptest::prop_assert!((0..=100).contains(&creature.gene()));
            }
            for (pos, _) in next.water.iter() {
                proptest::prop_assert!(!grid.is_land(*pos));
            }
        }
    }
}
