//! Per-step statistics and frames carried across the worker boundary.

use serde::{Deserialize, Serialize};

/// Why a simulation run terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "lowercase")]
pub enum TerminationReason {
    /// `population == 0`.
    Extinction,
    /// A previously seen state recurred within `max_period` generations.
    Periodic { period: u32 },
    /// A previously seen state recurred but beyond `max_period` generations.
    Steady,
}

/// Summary statistics for a single generation (spec §3 `SimulationStats`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationStats {
    pub generation: u64,
    pub population: u64,
    pub hash: u32,
    pub terminated: bool,
    pub reason: Option<TerminationReason>,
}

/// A simulation frame: stats plus an owned, disjoint copy of the cell
/// buffer after the step that produced it.
///
/// `cells` is always a fresh `Vec`, never a view into the engine's internal
/// buffers, so a frame can be handed to another thread or collaborator
/// without aliasing (spec §3, §5 resource policy).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationFrame {
    pub stats: SimulationStats,
    pub cells: Vec<u8>,
}
