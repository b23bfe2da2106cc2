//! Runtime module — the concurrency/transport seam (spec §5/§6). The only
//! place in this crate that spawns threads or crosses a serialization
//! boundary; `compute` itself is synchronous and single-threaded.

mod evolution_worker;
mod messages;
mod simulation_worker;

pub use evolution_worker::EvolutionWorker;
pub use messages::{EvolutionCommand, EvolutionResponse, SimulationCommand, SimulationResponse};
pub use simulation_worker::SimulationWorker;
