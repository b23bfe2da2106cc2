//! The genetic-algorithm loop: population, selection, elitism, progress,
//! and cancellation (spec §4.4, §5).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[cfg(not(target_arch = "wasm32"))]
use rayon::prelude::*;

use log::debug;

use crate::schema::{EvolutionProgress, EvolutionResult, GaConfig, GaOptions, Genome};

use super::fitness::evaluate_genome;
use super::genome_ops::GenomeRng;

/// A scored population member.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub genome: Genome,
    pub fitness: f32,
}

/// Callback invoked at most once per GA generation, mirroring the
/// teacher's `ProgressCallback`.
pub type ProgressCallback<'a> = dyn FnMut(&EvolutionProgress) + 'a;

/// Runs the genetic-algorithm search described in spec §4.4, grounded on
/// the teacher's `EvolutionEngine` (population vec, elitism carryover,
/// parallel evaluation split by target).
pub struct EvolutionEngine {
    config: GaConfig,
    options: GaOptions,
    rng: GenomeRng,
    population: Vec<Candidate>,
    next_id: u64,
    best_ever: Option<Genome>,
    best_ever_fitness: f32,
    cancelled: Arc<AtomicBool>,
}

impl EvolutionEngine {
    pub fn new(config: GaConfig, options: GaOptions, seed: u64) -> Self {
        Self {
            config,
            options,
            rng: GenomeRng::new(seed),
            population: Vec::new(),
            next_id: 0,
            best_ever: None,
            best_ever_fitness: f32::NEG_INFINITY,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// A cloneable handle a collaborator can flip to request cancellation
    /// (spec §5), polled once per GA generation.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }

    fn fresh_id(&mut self) -> String {
        let id = self.next_id;
        self.next_id += 1;
        format!("genome-{id}")
    }

    fn initialize(&mut self) {
        self.population = (0..self.config.population_size)
            .map(|_| {
                let id = self.fresh_id();
                let genome = self.rng.random_genome(id, self.options.seed_window);
                Candidate {
                    genome,
                    fitness: 0.0,
                }
            })
            .collect();
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn evaluate_population(&mut self) {
        let config = &self.config;
        let seed_window = self.options.seed_window;
        self.population.par_iter_mut().for_each(|candidate| {
            candidate.fitness = evaluate_genome(&candidate.genome, config, seed_window);
        });
    }

    #[cfg(target_arch = "wasm32")]
    fn evaluate_population(&mut self) {
        let config = &self.config;
        let seed_window = self.options.seed_window;
        for candidate in &mut self.population {
            candidate.fitness = evaluate_genome(&candidate.genome, config, seed_window);
        }
    }

    fn progress(&self, generation: u32) -> EvolutionProgress {
        let best = self
            .best_ever
            .clone()
            .unwrap_or_else(|| Genome::new("none", Vec::new()));
        EvolutionProgress {
            generation,
            best_fitness: self.best_ever_fitness.max(0.0),
            population: self.population.len(),
            best_genome: best,
        }
    }

    /// Run for `options.iterations` generations, or until cancelled,
    /// invoking `on_progress` at most once per generation (spec §4.4,
    /// §5). Returns `None` if cancellation occurred before the final
    /// generation completed — per spec §5, no `result` is emitted for a
    /// cancelled run.
    pub fn run(&mut self, mut on_progress: impl FnMut(&EvolutionProgress)) -> Option<EvolutionResult> {
        self.initialize();

        for generation in 0..self.options.iterations {
            self.evaluate_population();

            self.population
                .sort_by(|a, b| b.fitness.partial_cmp(&a.fitness).unwrap());

            let top = &self.population[0];
            if top.fitness > self.best_ever_fitness {
                self.best_ever_fitness = top.fitness;
                self.best_ever = Some(top.genome.clone());
            }

            debug!(
                "ga generation {generation}: best_fitness={:.2}",
                self.best_ever_fitness
            );
            on_progress(&self.progress(generation));

            if self.cancelled.load(Ordering::Relaxed) {
                return None;
            }

            self.advance_generation();
        }

        self.best_ever.clone().map(|genome| EvolutionResult {
            best_genome: genome,
            best_fitness: self.best_ever_fitness,
        })
    }

    fn advance_generation(&mut self) {
        let elites: Vec<Candidate> = self
            .population
            .iter()
            .take(self.config.elite_count)
            .cloned()
            .collect();

        let mut next_gen = elites.clone();
        while next_gen.len() < self.config.population_size {
            let parent_a = &elites[self.rng.next_seed() as usize % elites.len()].genome;
            let parent_b = &elites[self.rng.next_seed() as usize % elites.len()].genome;
            let id = self.fresh_id();
            let mut child = self.rng.crossover(id, parent_a, parent_b);
            self.rng
                .mutate(&mut child, self.config.mutation_rate, self.options.seed_window);
            next_gen.push(Candidate {
                genome: child,
                fitness: 0.0,
            });
        }

        self.population = next_gen;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Lattice, Rule};

    fn toy_config() -> (GaConfig, GaOptions) {
        (
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
            },
            GaOptions {
                iterations: 4,
                seed_window: 5,
            },
        )
    }

    #[test]
    fn run_produces_a_result_when_not_cancelled() {
        let (config, options) = toy_config();
        let mut engine = EvolutionEngine::new(config, options, 42);
        let result = engine.run(|_| {});
        assert!(result.is_some());
    }

    #[test]
    fn best_fitness_is_monotone_across_progress_events() {
        let (config, options) = toy_config();
        let mut engine = EvolutionEngine::new(config, options, 7);
        let mut seen = Vec::new();
        engine.run(|progress| seen.push(progress.best_fitness));

        for window in seen.windows(2) {
            assert!(window[1] >= window[0]);
        }
    }

    #[test]
    fn cancelling_before_the_final_generation_yields_no_result() {
        let (config, options) = toy_config();
        let mut engine = EvolutionEngine::new(config, options, 3);
        let cancel = engine.cancel_handle();
        cancel.store(true, Ordering::Relaxed);

        let result = engine.run(|_| {});
        assert!(result.is_none());
    }

    #[test]
    fn population_size_is_stable_across_generations() {
        let (config, options) = toy_config();
        let population_size = config.population_size;
        let mut engine = EvolutionEngine::new(config, options, 9);
        engine.run(|progress| {
            assert_eq!(progress.population, population_size);
        });
    }
}
