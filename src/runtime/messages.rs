//! Control-message contract crossing the worker boundary (spec §6).

use serde::{Deserialize, Serialize};

use crate::schema::{GaConfig, GaOptions, SimulationConfig};

/// Messages a collaborator sends to a simulation worker.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SimulationCommand {
    Init {
        config: SimulationConfig,
        seed: Option<Vec<u8>>,
    },
    Step,
    Run { speed: u32 },
    Pause,
    Randomize { density: f64 },
    Load { cells: Vec<u8> },
    Benchmark { duration_ms: u64 },
    Terminate,
}

/// Messages a simulation worker sends back to its collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SimulationResponse {
    Ready,
    Frame(crate::schema::SimulationFrame),
    Benchmark { generations_per_second: f64 },
}

/// Messages a collaborator sends to a GA worker.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EvolutionCommand {
    Run {
        config: GaConfig,
        options: GaOptions,
    },
    Cancel,
}

/// Messages a GA worker sends back to its collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EvolutionResponse {
    Progress(crate::schema::EvolutionProgress),
    Result(crate::schema::EvolutionResult),
}
