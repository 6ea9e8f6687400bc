//! Configuration types for the simulation.

use crate::error::{Error, Result};
use crate::types::{DEFAULT_SIDE, MAX_GENE, OFFSPRING_PER_SURVIVOR};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// World configuration parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Side length of the square grid
    pub side: i32,
    /// Probability that a generated cell is land (0.0 to 1.0)
    pub land_probability: f64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            side: DEFAULT_SIDE,
            land_probability: 0.5,
        }
    }
}

/// Gene bounds and reproduction parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneticsConfig {
    /// Gene of the seed creature
    pub initial_gene: i32,
    /// Inclusive upper bound of every gene
    pub max_gene: i32,
    /// Offspring produced by a creature that lands
    pub offspring_per_survivor: usize,
}

impl Default for GeneticsConfig {
    fn default() -> Self {
        Self {
            initial_gene: MAX_GENE / 2,
            max_gene: MAX_GENE,
            offspring_per_survivor: OFFSPRING_PER_SURVIVOR,
        }
    }
}

/// Delays between the two scheduled phases of a tick
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Delay before each animate phase (milliseconds)
    pub tick_delay_ms: u64,
    /// Delay between animate and the death sweep (milliseconds)
    pub sweep_delay_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            tick_delay_ms: 100,
            sweep_delay_ms: 100,
        }
    }
}

/// Generation history bounds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Number of land generations retained
    pub land_depth: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { land_depth: 1 }
    }
}

/// Optional run limits
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Stop after this many ticks (runs until extinction when unset)
    pub max_ticks: Option<u64>,
    /// Refuse to build a land generation larger than this
    pub max_population: Option<usize>,
}

/// Full simulation configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Random seed; seeded from OS entropy when unset
    pub seed: Option<u64>,
    pub world: WorldConfig,
    pub genetics: GeneticsConfig,
    pub timing: TimingConfig,
    pub history: HistoryConfig,
    pub limits: LimitsConfig,
}

impl SimConfig {
    /// Reject malformed values. Nothing is clamped.
    pub fn validate(&self) -> Result<()> {
        if self.world.side <= 0 {
            return Err(Error::Config(format!(
                "grid side must be positive, got {}",
                self.world.side
            )));
        }
        if !(0.0..=1.0).contains(&self.world.land_probability) {
            return Err(Error::Config(format!(
                "land probability must be within [0, 1], got {}",
                self.world.land_probability
            )));
        }
        if self.genetics.max_gene <= 0 {
            return Err(Error::Config(format!(
                "max gene must be positive, got {}",
                self.genetics.max_gene
            )));
        }
        if !(0..=self.genetics.max_gene).contains(&self.genetics.initial_gene) {
            return Err(Error::Config(format!(
                "initial gene {} outside [0, {}]",
                self.genetics.initial_gene, self.genetics.max_gene
            )));
        }
        if self.genetics.offspring_per_survivor == 0 {
            return Err(Error::Config(
                "offspring per survivor must be positive".to_string(),
            ));
        }
        if self.timing.tick_delay_ms == 0 || self.timing.sweep_delay_ms == 0 {
            return Err(Error::Config(format!(
                "delays must be positive, got tick={}ms sweep={}ms",
                self.timing.tick_delay_ms, self.timing.sweep_delay_ms
            )));
        }
        if self.history.land_depth == 0 {
            return Err(Error::Config(
                "land history depth must be positive".to_string(),
            ));
        }
        if self.limits.max_population == Some(0) {
            return Err(Error::Config(
                "max population must be positive when set".to_string(),
            ));
        }
        Ok(())
    }

    /// Parse a JSON document and validate it
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }
}
