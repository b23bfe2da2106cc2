//! A cellular-automaton simulation kernel and genetic search for
//! discovering long-lived seed patterns ("methuselahs").
//!
//! # Architecture
//!
//! The crate is split into three layers:
//!
//! - `schema`: configuration, rule, and wire data types (no computation).
//! - `compute`: the deterministic kernel — neighbor counting, Zobrist
//!   hashing and cycle detection, the simulation engine, and the genetic
//!   search that drives it.
//! - `runtime`: the concurrency/transport seam — threaded workers that
//!   expose `compute` over a control-message contract.
//!
//! # Example
//!
//! ```rust,no_run
//! use autoverse_ca::compute::SimulationState;
//! use autoverse_ca::schema::SimulationConfig;
//!
//! let config = SimulationConfig::default();
//! let mut state = SimulationState::new(config, None).unwrap();
//! let frame = state.step();
//! println!("population after one step: {}", frame.stats.population);
//! ```

pub mod compute;
pub mod runtime;
pub mod schema;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use compute::SimulationState;
pub use schema::{Rule, SimulationConfig, SimulationFrame, SimulationStats};
