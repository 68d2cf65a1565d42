//! # Simulation Configuration
//!
//! All parameters of a simulation run. The binary always runs with [`SimConfig::default`], which
//! holds the fixed constants of the simulator:
//!
//! | Parameter | Field | Default |
//! |-----------|-------|---------|
//! | Perturbation probability per pass | `perturbation_probability` | 1/10 |
//! | Cost of a perturbed link | `cost_range` | `1..=10` |
//! | Delay between passes | `delay_unit` x `0..=max_delay_units` | 0 to 2 seconds |
//! | Passes per agent | `max_passes` | 100 |
//! | RNG seed | `seed` | entropy |
//!
//! Tests usually start from [`SimConfig::fast_local`], which disables perturbation, delays and
//! the stdout report.

use crate::netsim::{Cost, UNREACHABLE};
use std::ops::RangeInclusive;
use std::time::Duration;
use thiserror::Error;

/// Configuration of a simulation run
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    /// Probability (0.0 - 1.0) that an agent perturbs a random link after a pass
    pub perturbation_probability: f64,
    /// Range of the new cost of a perturbed link
    pub cost_range: RangeInclusive<Cost>,
    /// Length of one delay unit
    pub delay_unit: Duration,
    /// An agent sleeps a uniformly chosen number of units in `0..=max_delay_units` after a pass
    pub max_delay_units: u32,
    /// Maximum number of passes of a single agent. `None` lets agents run until convergence.
    pub max_passes: Option<usize>,
    /// Seed of the random generators. Agent `n` is seeded with `seed + n`.
    pub seed: Option<u64>,
    /// Print the matrix and router events to stdout
    pub report: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            perturbation_probability: 0.1,
            cost_range: 1..=10,
            delay_unit: Duration::from_secs(1),
            max_delay_units: 2,
            max_passes: Some(100),
            seed: None,
            report: true,
        }
    }
}

impl SimConfig {
    /// Configuration without perturbation, delays or output.
    pub fn fast_local() -> Self {
        Self {
            perturbation_probability: 0.0,
            delay_unit: Duration::from_millis(0),
            max_delay_units: 0,
            report: false,
            ..Self::default()
        }
    }

    /// Fix the seed of the random generators
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Change the pass cap of every agent
    pub fn with_max_passes(mut self, max_passes: Option<usize>) -> Self {
        self.max_passes = max_passes;
        self
    }

    /// Change the perturbation probability
    pub fn with_perturbation_probability(mut self, probability: f64) -> Self {
        self.perturbation_probability = probability;
        self
    }

    /// Change the delay between two passes
    pub fn with_delay(mut self, delay_unit: Duration, max_delay_units: u32) -> Self {
        self.delay_unit = delay_unit;
        self.max_delay_units = max_delay_units;
        self
    }

    /// Check that the configuration can be used for a simulation
    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = self.perturbation_probability;
        if !(0.0..=1.0).contains(&p) {
            return Err(ConfigError::InvalidProbability(p));
        }
        let (low, high) = (*self.cost_range.start(), *self.cost_range.end());
        if low == 0 || low > high || high >= UNREACHABLE {
            return Err(ConfigError::InvalidCostRange(low, high));
        }
        Ok(())
    }
}

/// Errors of an invalid configuration
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The probability is not within 0.0 and 1.0
    #[error("Perturbation probability {0} is not within [0, 1]")]
    InvalidProbability(f64),
    /// The cost range is empty, contains 0, or reaches the unreachable sentinel
    #[error("Invalid link cost range [{0}, {1}]")]
    InvalidCostRange(Cost, Cost),
}
