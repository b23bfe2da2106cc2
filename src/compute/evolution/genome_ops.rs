//! Genome generation, mutation, and crossover (spec §4.4).

use rand::prelude::*;

use crate::schema::Genome;

/// Thin wrapper over a seeded `StdRng`, one method per genetic operator —
/// mirrors the teacher's `GenomeRng`.
pub struct GenomeRng {
    rng: StdRng,
}

impl GenomeRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn random() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// A set of `max(8, floor(seed_window^2 * 0.1))` distinct coordinates
    /// sampled without replacement from `[0, seed_window)^2` (spec §4.4).
    pub fn random_genome(&mut self, id: impl Into<String>, seed_window: usize) -> Genome {
        let target = (seed_window * seed_window) as f64 * 0.1;
        let count = (target.floor() as usize).max(8).min(seed_window * seed_window);

        let mut coords: Vec<(u16, u16)> = (0..seed_window as u16)
            .flat_map(|x| (0..seed_window as u16).map(move |y| (x, y)))
            .collect();
        coords.shuffle(&mut self.rng);
        coords.truncate(count);

        Genome::new(id, coords)
    }

    /// Point/insertion/deletion mutation per spec §4.4: each existing cell
    /// may be jittered by ±1 in both axes; a fresh coordinate may be
    /// appended; and (if more than one cell remains) a cell may be removed.
    /// Each of the three events is independently gated at `mutation_rate`.
    pub fn mutate(&mut self, genome: &mut Genome, mutation_rate: f32, seed_window: usize) {
        for cell in genome.cells.iter_mut() {
            if self.rng.gen::<f32>() < mutation_rate {
                let dx: i32 = if self.rng.gen_bool(0.5) { 1 } else { -1 };
                let dy: i32 = if self.rng.gen_bool(0.5) { 1 } else { -1 };
                let max = seed_window as i32 - 1;
                let nx = (cell.0 as i32 + dx).clamp(0, max) as u16;
                let ny = (cell.1 as i32 + dy).clamp(0, max) as u16;
                *cell = (nx, ny);
            }
        }

        if self.rng.gen::<f32>() < mutation_rate {
            let x = self.rng.gen_range(0..seed_window as u16);
            let y = self.rng.gen_range(0..seed_window as u16);
            genome.cells.push((x, y));
        }

        if self.rng.gen::<f32>() < mutation_rate && genome.cells.len() > 1 {
            let idx = self.rng.gen_range(0..genome.cells.len());
            genome.cells.remove(idx);
        }
    }

    /// Index-based crossover (spec §4.4): child length `max(|a|, |b|)`,
    /// taking `a[i % |a|]` on even `i`, else `b[i % |b|]`.
    pub fn crossover(&mut self, id: impl Into<String>, a: &Genome, b: &Genome) -> Genome {
        let len = a.cells.len().max(b.cells.len());
        let mut cells = Vec::with_capacity(len);
        for i in 0..len {
            let cell = if i % 2 == 0 {
                a.cells[i % a.cells.len()]
            } else {
                b.cells[i % b.cells.len()]
            };
            cells.push(cell);
        }
        Genome::new(id, cells)
    }

    pub fn next_seed(&mut self) -> u64 {
        self.rng.gen()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_genome_respects_minimum_and_window() {
        let mut rng = GenomeRng::new(1);
        let genome = rng.random_genome("g0", 20);
        assert!(genome.cells.len() >= 8);
        for &(x, y) in &genome.cells {
            assert!((x as usize) < 20);
            assert!((y as usize) < 20);
        }
    }

    #[test]
    fn random_genome_coordinates_are_distinct() {
        let mut rng = GenomeRng::new(2);
        let genome = rng.random_genome("g0", 20);
        let mut seen = std::collections::HashSet::new();
        for cell in &genome.cells {
            assert!(seen.insert(*cell), "duplicate coordinate in fresh genome");
        }
    }

    #[test]
    fn crossover_child_length_is_max_of_parents() {
        let mut rng = GenomeRng::new(3);
        let a = Genome::new("a", vec![(0, 0), (1, 1)]);
        let b = Genome::new("b", vec![(2, 2), (3, 3), (4, 4), (5, 5)]);
        let child = rng.crossover("child", &a, &b);
        assert_eq!(child.cells.len(), 4);
        assert_eq!(child.cells[0], a.cells[0]);
        assert_eq!(child.cells[1], b.cells[1]);
    }

    #[test]
    fn mutation_keeps_coordinates_within_window() {
        let mut rng = GenomeRng::new(4);
        let mut genome = Genome::new("g", vec![(0, 0), (19, 19)]);
        for _ in 0..50 {
            rng.mutate(&mut genome, 1.0, 20);
        }
        for &(x, y) in &genome.cells {
            assert!((x as usize) < 20);
            assert!((y as usize) < 20);
        }
    }

    #[test]
    fn mutation_never_empties_a_genome() {
        let mut rng = GenomeRng::new(5);
        let mut genome = Genome::new("g", vec![(1, 1)]);
        for _ in 0..50 {
            rng.mutate(&mut genome, 1.0, 20);
        }
        assert!(!genome.cells.is_empty());
    }
}
