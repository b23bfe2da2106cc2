//! Simulation engine: owns the cell buffers and advances generations
//! (spec §4.3).

use rand::Rng;

use super::hash::{HashTracker, ZobristTable};
use super::neighborhood::count_neighbors;
use crate::schema::{SimulationConfig, SimulationFrame, SimulationStats, TerminationReason};

/// Owns the double-buffered cell grid, the Zobrist table, and the cycle
/// tracker for one simulation run. Mirrors the teacher's
/// `CpuPropagator`/`SimulationState` split: buffers are allocated once at
/// construction and never reallocated (spec §3, §9).
pub struct SimulationState {
    config: SimulationConfig,
    current: Vec<u8>,
    scratch: Vec<u8>,
    table: ZobristTable,
    tracker: HashTracker,
    generation: u64,
    terminated: bool,
    termination: Option<TerminationReason>,
}

impl SimulationState {
    /// Validate `config` and allocate a fresh, all-dead state. `initializer`
    /// runs exactly once over the `current` buffer if given; any non-zero
    /// byte it writes is treated as a live cell (spec §4.3).
    pub fn new(
        config: SimulationConfig,
        initializer: Option<&mut dyn FnMut(&mut [u8])>,
    ) -> Result<Self, crate::schema::ConfigError> {
        config.validate()?;
        let cell_count = config.cell_count();
        let mut current = vec![0u8; cell_count];
        if let Some(init) = initializer {
            init(&mut current);
        }
        let scratch = vec![0u8; cell_count];
        let table = ZobristTable::new(cell_count);
        let tracker = HashTracker::new(config.max_period);

        Ok(Self {
            config,
            current,
            scratch,
            table,
            tracker,
            generation: 0,
            terminated: false,
            termination: None,
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn terminated(&self) -> bool {
        self.terminated
    }

    pub fn termination(&self) -> Option<TerminationReason> {
        self.termination
    }

    /// The live cell buffer for the current generation.
    pub fn cells(&self) -> &[u8] {
        &self.current
    }

    pub fn population(&self) -> u64 {
        self.current.iter().map(|&c| c as u64).sum()
    }

    /// Has any live cell touched an edge row/column? Meaningless (and
    /// skipped by callers) on toroidal grids (spec §4.4).
    pub fn touches_border(&self) -> bool {
        let width = self.config.width;
        let height = self.config.height;
        for y in 0..height {
            for x in 0..width {
                if self.current[y * width + x] == 0 {
                    continue;
                }
                if x == 0 || y == 0 || x == width - 1 || y == height - 1 {
                    return true;
                }
            }
        }
        false
    }

    /// Flip the live bit at `(x, y)` on the current buffer. Does not step.
    pub fn toggle(&mut self, x: usize, y: usize) {
        let idx = y * self.config.width + x;
        self.current[idx] = 1 - self.current[idx];
    }

    /// Independently draw each cell live with probability `density`. Resets
    /// generation/tracker/termination as a fresh run (spec §4.3).
    pub fn randomize(&mut self, density: f64, rng: &mut impl Rng) {
        for cell in self.current.iter_mut() {
            *cell = if rng.gen::<f64>() < density { 1 } else { 0 };
        }
        self.scratch.iter_mut().for_each(|c| *c = 0);
        self.reset_run_state();
    }

    /// Zero the current buffer, copy up to `min(seed.len, cell_count)`
    /// bytes in, and reset generation/tracker/termination (spec §4.3).
    pub fn apply_seed(&mut self, seed: &[u8]) {
        self.current.iter_mut().for_each(|c| *c = 0);
        let n = seed.len().min(self.current.len());
        self.current[..n].copy_from_slice(&seed[..n]);
        self.reset_run_state();
    }

    fn reset_run_state(&mut self) {
        self.generation = 0;
        self.tracker = HashTracker::new(self.config.max_period);
        self.terminated = false;
        self.termination = None;
    }

    /// Advance one generation per the §4.3 step algorithm. Once terminated,
    /// further calls are no-ops that return the same frame again, never
    /// regressing `generation` (spec §4.3 step 5, §7).
    pub fn step(&mut self) -> SimulationFrame {
        if self.terminated {
            return self.current_frame();
        }

        let width = self.config.width;
        let height = self.config.height;
        let lattice = self.config.lattice;
        let toroidal = self.config.toroidal;

        let mut population = 0u64;
        for y in 0..height {
            for x in 0..width {
                let n = count_neighbors(&self.current, width, height, x, y, lattice, toroidal);
                let idx = y * width + x;
                let alive = self.current[idx] == 1;
                let next = if alive {
                    self.config.rule.survives(n)
                } else {
                    self.config.rule.births(n)
                };
                self.scratch[idx] = next as u8;
                population += next as u64;
            }
        }

        let hash = self.table.hash_cells(&self.scratch);
        let next_generation = self.generation + 1;

        let reason = if population == 0 {
            Some(TerminationReason::Extinction)
        } else if self.tracker.has(hash) {
            let period = self
                .tracker
                .period(hash, next_generation)
                .expect("has() implies period() is Some");
            if period <= self.config.max_period {
                Some(TerminationReason::Periodic { period })
            } else {
                Some(TerminationReason::Steady)
            }
        } else {
            None
        };

        self.tracker.add(hash, next_generation);
        std::mem::swap(&mut self.current, &mut self.scratch);
        self.generation = next_generation;

        if let Some(reason) = reason {
            self.terminated = true;
            self.termination = Some(reason);
        }

        SimulationFrame {
            stats: SimulationStats {
                generation: self.generation,
                population,
                hash,
                terminated: self.terminated,
                reason: self.termination,
            },
            cells: self.current.clone(),
        }
    }

    /// Step `steps` times, or until termination, collecting every frame.
    /// Not part of the literal spec contract — a direct generalization of
    /// the teacher's `run`/`step` pairing used by the CLI and the fitness
    /// evaluator.
    pub fn run(&mut self, steps: u64) -> Vec<SimulationFrame> {
        let mut frames = Vec::with_capacity(steps as usize);
        for _ in 0..steps {
            let was_terminated = self.terminated;
            let frame = self.step();
            frames.push(frame);
            if was_terminated {
                break;
            }
        }
        frames
    }

    fn current_frame(&self) -> SimulationFrame {
        SimulationFrame {
            stats: SimulationStats {
                generation: self.generation,
                population: self.population(),
                hash: self.table.hash_cells(&self.current),
                terminated: self.terminated,
                reason: self.termination,
            },
            cells: self.current.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Lattice, Rule};

    fn config(lattice: Lattice, width: usize, height: usize, toroidal: bool) -> SimulationConfig {
        SimulationConfig {
            lattice,
            width,
            height,
            rule: Rule::default_for(lattice),
            toroidal,
            max_period: 50,
        }
    }

    fn seeded(cfg: SimulationConfig, live: &[(usize, usize)]) -> SimulationState {
        let width = cfg.width;
        let live = live.to_vec();
        let mut init = move |cells: &mut [u8]| {
            for &(x, y) in &live {
                cells[y * width + x] = 1;
            }
        };
        SimulationState::new(cfg, Some(&mut init)).unwrap()
    }

    #[test]
    fn blinker_oscillates_with_period_two() {
        let cfg = config(Lattice::Square, 5, 5, false);
        let mut state = seeded(cfg, &[(1, 2), (2, 2), (3, 2)]);

        let frame1 = state.step();
        assert!(frame1.cells[1 * 5 + 2] == 1);
        assert!(frame1.cells[2 * 5 + 2] == 1);
        assert!(frame1.cells[3 * 5 + 2] == 1);

        let frame2 = state.step();
        assert_eq!(
            frame2.stats.reason,
            Some(TerminationReason::Periodic { period: 2 })
        );
        assert!(state.terminated());
    }

    #[test]
    fn block_is_a_still_life_with_period_one() {
        let cfg = config(Lattice::Square, 4, 4, false);
        let mut state = seeded(cfg, &[(1, 1), (2, 1), (1, 2), (2, 2)]);

        let frame = state.step();
        assert_eq!(
            frame.stats.reason,
            Some(TerminationReason::Periodic { period: 1 })
        );
    }

    #[test]
    fn single_cell_goes_extinct() {
        let cfg = config(Lattice::Square, 3, 3, false);
        let mut state = seeded(cfg, &[(1, 1)]);

        let frame = state.step();
        assert_eq!(frame.stats.population, 0);
        assert_eq!(frame.stats.reason, Some(TerminationReason::Extinction));
        assert!(state.terminated());
    }

    #[test]
    fn frozen_engine_never_regresses_generation() {
        let cfg = config(Lattice::Square, 3, 3, false);
        let mut state = seeded(cfg, &[(1, 1)]);
        state.step();
        let gen_at_termination = state.generation();
        let frame = state.step();
        assert_eq!(frame.stats.generation, gen_at_termination);
        assert_eq!(state.generation(), gen_at_termination);
    }

    #[test]
    fn population_never_exceeds_cell_count() {
        let cfg = config(Lattice::Square, 6, 6, true);
        let mut rng = rand::rngs::mock::StepRng::new(u64::MAX / 3, 1);
        let mut state = SimulationState::new(cfg, None).unwrap();
        state.randomize(0.5, &mut rng);
        for _ in 0..10 {
            if state.terminated() {
                break;
            }
            let frame = state.step();
            assert!(frame.stats.population <= 36);
        }
    }

    #[test]
    fn apply_seed_then_step_is_idempotent_across_calls() {
        let cfg = config(Lattice::Square, 5, 5, false);
        let mut state = SimulationState::new(cfg, None).unwrap();
        let mut seed = vec![0u8; 25];
        seed[2 * 5 + 1] = 1;
        seed[2 * 5 + 2] = 1;
        seed[2 * 5 + 3] = 1;

        state.apply_seed(&seed);
        let frame_a = state.step();

        state.apply_seed(&seed);
        let frame_b = state.step();

        assert_eq!(frame_a.cells, frame_b.cells);
        assert_eq!(frame_a.stats, frame_b.stats);
    }
}
