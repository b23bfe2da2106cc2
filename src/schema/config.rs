//! Configuration types for the simulation engine.

use serde::{Deserialize, Serialize};

use super::rule::{Lattice, Rule};

/// Top-level simulation configuration (spec §3 `SimulationConfig`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Lattice topology.
    pub lattice: Lattice,
    /// Grid width in cells.
    pub width: usize,
    /// Grid height in cells.
    pub height: usize,
    /// Birth/survival rule.
    pub rule: Rule,
    /// Whether the grid wraps at its edges.
    pub toroidal: bool,
    /// The period beyond which a repeated state is classified `Steady`
    /// instead of `Periodic`.
    pub max_period: u32,
}

impl SimulationConfig {
    /// Total number of cells.
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.width * self.height
    }

    /// Validate configuration parameters per spec §3.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 {
            return Err(ConfigError::InvalidDimensions { field: "width" });
        }
        if self.height == 0 {
            return Err(ConfigError::InvalidDimensions { field: "height" });
        }
        if self.max_period == 0 {
            return Err(ConfigError::InvalidMaxPeriod);
        }
        Ok(())
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            lattice: Lattice::Square,
            width: 64,
            height: 64,
            rule: Rule::default_for(Lattice::Square),
            toroidal: false,
            max_period: 50,
        }
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{field} must be non-zero")]
    InvalidDimensions { field: &'static str },
    #[error("max_period must be a positive integer")]
    InvalidMaxPeriod,
}
