//! Simulation state machine driving the two phases of a tick.

use crate::creature::Creature;
use crate::generation::{creature_partition, Pipeline, TickReport};
use crate::grid::Grid;
use crate::history::GenerationHistory;
use crate::random::{RandomSource, RngSource};
use crate::render::{Renderer, Snapshot};
use crate::stats::{PopulationStats, RunSummary};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use shore_core::{Error, Result, SimConfig};
use tracing::{debug, info, instrument};

/// Where the simulation is within a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Ready to animate
    Idle,
    /// Next generation built; the drowned cohort awaits the death sweep
    Animated,
    /// The land generation emptied. Terminal.
    Extinct,
}

/// Result of a death sweep
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Extinct,
}

pub struct Simulation<R = RngSource<ChaCha8Rng>> {
    grid: Grid,
    land: GenerationHistory,
    water: GenerationHistory,
    pipeline: Pipeline,
    rng: R,
    config: SimConfig,
    phase: Phase,
    tick: u64,
    peak_population: usize,
    total_born: u64,
    total_drowned: u64,
}

impl Simulation {
    /// Build a random world and seed one creature at its centre
    pub fn new(config: SimConfig) -> Result<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let mut rng = RngSource::new(rng);
        let grid = Grid::generate(&config.world, &mut rng)?;
        Self::with_parts(config, grid, rng)
    }
}

impl<R: RandomSource> Simulation<R> {
    /// Use an existing grid and random source; seeds one creature at the centre
    pub fn with_parts(config: SimConfig, grid: Grid, rng: R) -> Result<Self> {
        let seed = Creature::with_bound(
            config.genetics.initial_gene,
            grid.centre(),
            config.genetics.max_gene,
        );
        Self::with_population(config, grid, rng, [seed])
    }

    /// Use an existing grid, random source and initial population
    pub fn with_population<I>(config: SimConfig, grid: Grid, rng: R, creatures: I) -> Result<Self>
    where
        I: IntoIterator<Item = Creature>,
    {
        config.validate()?;
        if grid.side() != config.world.side {
            return Err(Error::Config(format!(
                "grid side {} does not match configured side {}",
                grid.side(),
                config.world.side
            )));
        }
        let pipeline = Pipeline::from_config(&config)?;

        let max_gene = config.genetics.max_gene;
        let mut initial = creature_partition();
        for creature in creatures {
            if !creature.position().within(grid.side()) {
                return Err(Error::Config(format!(
                    "creature at {} is outside a grid of side {}",
                    creature.position(),
                    grid.side()
                )));
            }
            if !(0..=max_gene).contains(&creature.gene()) {
                return Err(Error::Config(format!(
                    "creature gene {} outside [0, {}]",
                    creature.gene(),
                    max_gene
                )));
            }
            initial.insert(creature);
        }

        let mut land = GenerationHistory::new(config.history.land_depth)?;
        land.push(initial);
        let water = GenerationHistory::new(config.history.land_depth)?;

        info!(
            side = grid.side(),
            land_cells = grid.land_count(),
            population = land.current().map_or(0, |g| g.len()),
            "World populated"
        );

        let peak_population = land.current().map_or(0, |g| g.len());
        Ok(Self {
            pipeline,
            grid,
            land,
            water,
            rng,
            config,
            phase: Phase::Idle,
            tick: 0,
            peak_population,
            total_born: 0,
            total_drowned: 0,
        })
    }

    /// Animate phase: advance the living generation and push the results
    /// onto the land and water histories.
    pub fn animate(&mut self) -> Result<TickReport> {
        match self.phase {
            Phase::Idle => {}
            Phase::Animated => {
                return Err(Error::InvalidState(
                    "animate called before the death sweep".to_string(),
                ))
            }
            Phase::Extinct => {
                return Err(Error::InvalidState("simulation is extinct".to_string()))
            }
        }

        let current = self
            .land
            .current()
            .ok_or_else(|| Error::InvalidState("land history is empty".to_string()))?;
        let next = self.pipeline.advance(&self.grid, current, &mut self.rng)?;

        let report = next.report;
        self.land.push(next.land);
        self.water.push(next.water);

        self.tick += 1;
        self.total_born += report.born as u64;
        self.total_drowned += report.drowned as u64;
        self.peak_population = self.peak_population.max(self.population());
        self.phase = Phase::Animated;

        debug!(
            tick = self.tick,
            parents = report.parents,
            survivors = report.survivors,
            drowned = report.drowned,
            born = report.born,
            "Animate phase complete"
        );

        Ok(report)
    }

    /// Death sweep: discard the drowned cohort and check for extinction
    pub fn delete_dead(&mut self) -> Result<Outcome> {
        if self.phase != Phase::Animated {
            return Err(Error::InvalidState(format!(
                "death sweep requires the animated phase, currently {:?}",
                self.phase
            )));
        }

        self.water.clear();

        if self.population() == 0 {
            self.phase = Phase::Extinct;
            info!(event = "extinction", tick = self.tick, "☠️ Population extinct");
            return Ok(Outcome::Extinct);
        }

        self.phase = Phase::Idle;
        if self.tick % 100 == 0 {
            self.emit_population_metrics();
        }
        Ok(Outcome::Continue)
    }

    /// Both phases back to back
    pub fn step(&mut self) -> Result<Outcome> {
        self.animate()?;
        self.delete_dead()
    }

    /// Run headless until extinction or `max_ticks`
    pub fn run(&mut self) -> Result<RunSummary> {
        self.run_with(&mut NoopRenderer)
    }

    /// Run headless, rendering after every phase
    #[instrument(skip(self, renderer), fields(max_ticks = ?self.config.limits.max_ticks))]
    pub fn run_with<V: Renderer>(&mut self, renderer: &mut V) -> Result<RunSummary> {
        info!("Starting simulation");

        while self.phase != Phase::Extinct && !self.reached_tick_limit() {
            self.animate()?;
            renderer.render(&self.snapshot())?;
            self.delete_dead()?;
            renderer.render(&self.snapshot())?;
        }

        let summary = self.summary();
        self.emit_run_summary(&summary);
        Ok(summary)
    }

    pub fn reached_tick_limit(&self) -> bool {
        self.config
            .limits
            .max_ticks
            .map_or(false, |limit| self.tick >= limit)
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            grid: &self.grid,
            land: &self.land,
            water: &self.water,
            tick: self.tick,
            phase: self.phase,
            max_gene: self.config.genetics.max_gene,
        }
    }

    /// Size of the living generation
    pub fn population(&self) -> usize {
        self.land.current().map_or(0, |g| g.len())
    }

    pub fn stats(&self) -> PopulationStats {
        self.land
            .current()
            .map(PopulationStats::of)
            .unwrap_or_default()
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            ticks: self.tick,
            final_population: self.population(),
            peak_population: self.peak_population,
            total_born: self.total_born,
            total_drowned: self.total_drowned,
            extinct: self.phase == Phase::Extinct,
            final_stats: self.stats(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn land_history(&self) -> &GenerationHistory {
        &self.land
    }

    pub fn water_history(&self) -> &GenerationHistory {
        &self.water
    }

    fn emit_population_metrics(&self) {
        let stats = self.stats();
        info!(
            event = "population_metrics",
            tick = self.tick,
            population = stats.population,
            occupied_cells = stats.occupied_cells,
            min_gene = ?stats.min_gene,
            max_gene = ?stats.max_gene,
            mean_gene = format!("{:.2}", stats.mean_gene),
            peak_population = self.peak_population,
            "Population metrics snapshot"
        );
    }

    fn emit_run_summary(&self, summary: &RunSummary) {
        info!(
            event = "run_summary",
            ticks = summary.ticks,
            final_population = summary.final_population,
            peak_population = summary.peak_population,
            total_born = summary.total_born,
            total_drowned = summary.total_drowned,
            extinct = summary.extinct,
            "🏁 Run complete"
        );
    }
}

struct NoopRenderer;

impl Renderer for NoopRenderer {
    fn render(&mut self, _view: &Snapshot<'_>) -> Result<()> {
        Ok(())
    }
}
