//! Genome embedding and fitness evaluation (spec §4.4).

use crate::compute::SimulationState;
use crate::schema::{GaConfig, Genome, SimulationConfig};

/// `GaConfig.max_period` is fixed at 50 for fitness evaluation regardless
/// of what a caller's own simulation runs use (spec §4.4).
const FITNESS_MAX_PERIOD: u32 = 50;

/// Embed `genome` into a fresh `grid_size`-square buffer, centred inside a
/// `seed_window`-square window. Coordinates landing outside the grid are
/// silently dropped (spec §4.4).
fn embed(genome: &Genome, grid_size: usize, seed_window: usize) -> Vec<u8> {
    let mut cells = vec![0u8; grid_size * grid_size];
    let offset = (grid_size.saturating_sub(seed_window)) / 2;
    for &(x, y) in &genome.cells {
        let gx = offset + x as usize;
        let gy = offset + y as usize;
        if gx < grid_size && gy < grid_size {
            cells[gy * grid_size + gx] = 1;
        }
    }
    cells
}

/// Run a genome to termination (or `max_generations`), scoring it by
/// generations survived with a border-escape penalty (spec §4.4). Grounded
/// on the teacher's `FitnessEvaluator::evaluate` run-then-score shape, but
/// scoring survival rather than a weighted metric sum.
pub fn evaluate_genome(genome: &Genome, config: &GaConfig, seed_window: usize) -> f32 {
    let sim_config = SimulationConfig {
        lattice: config.lattice,
        width: config.grid_size,
        height: config.grid_size,
        rule: config.rule.clone(),
        toroidal: config.toroidal,
        max_period: FITNESS_MAX_PERIOD,
    };

    let cells = embed(genome, config.grid_size, seed_window);
    let mut init = move |buf: &mut [u8]| buf.copy_from_slice(&cells);
    let mut state = SimulationState::new(sim_config, Some(&mut init))
        .expect("GaConfig-derived SimulationConfig must be valid");

    let mut best = 0u64;
    let mut border_at: Option<u64> = None;

    for _ in 0..config.max_generations {
        if state.terminated() {
            break;
        }
        state.step();
        best = state.generation();

        if !config.toroidal && border_at.is_none() && state.touches_border() {
            border_at = Some(state.generation());
        }

        if state.terminated() {
            break;
        }
    }

    let mut fitness = best as f32;
    if !config.toroidal {
        if let Some(border_gen) = border_at {
            let penalty = (config.border_penalty - border_gen as f32 / 20.0).max(0.0);
            fitness -= penalty;
        }
    }

    fitness.max(0.0)
}
