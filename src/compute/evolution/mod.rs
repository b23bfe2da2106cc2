//! Genetic search over seed genomes (spec §4.4, C4).
//!
//! Three pieces, grounded on the teacher's `genome`/`fitness`/`search`
//! trio: [`genome_ops`] generates and recombines genomes, [`fitness`]
//! scores one by running it through the simulation engine, and [`search`]
//! drives the generational loop.

mod fitness;
mod genome_ops;
mod search;

pub use fitness::evaluate_genome;
pub use genome_ops::GenomeRng;
pub use search::{Candidate, EvolutionEngine, ProgressCallback};
