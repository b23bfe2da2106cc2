//! Genetic-search configuration and data types (spec §3, §4.4).

use serde::{Deserialize, Serialize};

use super::rule::{Lattice, Rule};

/// A seed genome: a set of live-cell coordinates inside a `seed_window`
/// square. Duplicate coordinates are permitted — they collapse to a single
/// live cell when embedded (spec §3, §9 open question: not deduplicated).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genome {
    /// Opaque unique id, used only so collaborators can dedupe log lines.
    /// Plays no part in fitness, equality, or selection (spec §9).
    pub id: String,
    /// Live cell coordinates, `0 <= x, y < seed_window`.
    pub cells: Vec<(u16, u16)>,
}

impl Genome {
    pub fn new(id: impl Into<String>, cells: Vec<(u16, u16)>) -> Self {
        Self {
            id: id.into(),
            cells,
        }
    }
}

/// Configuration for a genetic-algorithm search run (spec §3 `GAConfig`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GaConfig {
    pub population_size: usize,
    pub mutation_rate: f32,
    pub elite_count: usize,
    pub max_generations: u64,
    pub grid_size: usize,
    pub lattice: Lattice,
    pub rule: Rule,
    pub toroidal: bool,
    pub border_penalty: f32,
}

impl GaConfig {
    pub fn validate(&self) -> Result<(), GaConfigError> {
        if self.population_size < 2 {
            return Err(GaConfigError::PopulationTooSmall);
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(GaConfigError::MutationRateOutOfRange);
        }
        if self.elite_count < 1 || self.elite_count > self.population_size {
            return Err(GaConfigError::EliteCountOutOfRange);
        }
        if self.max_generations == 0 {
            return Err(GaConfigError::InvalidMaxGenerations);
        }
        if self.border_penalty < 0.0 {
            return Err(GaConfigError::InvalidBorderPenalty);
        }
        Ok(())
    }
}

/// Per-run options layered on top of a reusable `GaConfig` (spec §3).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GaOptions {
    /// Number of GA generations to run.
    pub iterations: u32,
    /// Edge length of the centred sub-grid genomes live in.
    pub seed_window: usize,
}

impl GaOptions {
    pub fn validate(&self, config: &GaConfig) -> Result<(), GaConfigError> {
        if self.seed_window == 0 {
            return Err(GaConfigError::InvalidSeedWindow);
        }
        if config.grid_size < self.seed_window {
            return Err(GaConfigError::GridSmallerThanSeedWindow);
        }
        Ok(())
    }
}

/// `GaConfig`/`GaOptions` validation errors.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum GaConfigError {
    #[error("population_size must be at least 2")]
    PopulationTooSmall,
    #[error("mutation_rate must be in [0, 1]")]
    MutationRateOutOfRange,
    #[error("elite_count must be in [1, population_size]")]
    EliteCountOutOfRange,
    #[error("max_generations must be a positive integer")]
    InvalidMaxGenerations,
    #[error("border_penalty must be non-negative")]
    InvalidBorderPenalty,
    #[error("seed_window must be a positive integer")]
    InvalidSeedWindow,
    #[error("grid_size must be >= seed_window")]
    GridSmallerThanSeedWindow,
}

/// Progress emitted at most once per GA generation (spec §4.4, §5).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionProgress {
    pub generation: u32,
    pub best_fitness: f32,
    pub population: usize,
    pub best_genome: Genome,
}

/// Final result of a completed (non-cancelled) GA run (spec §4.4).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionResult {
    pub best_genome: Genome,
    pub best_fitness: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> GaConfig {
        GaConfig {
            population_size: 8,
            mutation_rate: 0.2,
            elite_count: 2,
            max_generations: 50,
            grid_size: 20,
            lattice: Lattice::Square,
            rule: Rule::default_for(Lattice::Square),
            toroidal: false,
            border_penalty: 10.0,
        }
    }

    #[test]
    fn valid_config_passes() {
        assert!(base_config().validate().is_ok());
        let options = GaOptions {
            iterations: 4,
            seed_window: 5,
        };
        assert!(options.validate(&base_config()).is_ok());
    }

    #[test]
    fn elite_count_bounds_enforced() {
        let mut config = base_config();
        config.elite_count = 0;
        assert_eq!(config.validate(), Err(GaConfigError::EliteCountOutOfRange));

        config.elite_count = config.population_size + 1;
        assert_eq!(config.validate(), Err(GaConfigError::EliteCountOutOfRange));
    }

    #[test]
    fn grid_smaller_than_seed_window_rejected() {
        let config = base_config();
        let options = GaOptions {
            iterations: 1,
            seed_window: config.grid_size + 1,
        };
        assert_eq!(
            options.validate(&config),
            Err(GaConfigError::GridSmallerThanSeedWindow)
        );
    }
}
