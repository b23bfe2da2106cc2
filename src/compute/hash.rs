//! Zobrist hashing and cycle/period detection (spec §4.2).

use std::collections::HashMap;

/// Deterministic PRNG used only to seed the Zobrist table (mulberry32,
/// fixed seed 1337 — spec §3, §9: part of the wire contract, never changes).
struct Mulberry32 {
    state: u32,
}

impl Mulberry32 {
    fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(0x6D2B79F5);
        let mut z = self.state;
        z = (z ^ (z >> 15)).wrapping_mul(z | 1);
        z ^= z.wrapping_add((z ^ (z >> 7)).wrapping_mul(z | 61));
        z ^ (z >> 14)
    }
}

/// Per-cell random values used to incrementally hash grid state. Built once
/// for a given cell count with the fixed seed, so equal-sized grids always
/// hash the same live-cell set to the same value (spec §4.2).
pub struct ZobristTable {
    values: Vec<u32>,
}

impl ZobristTable {
    pub const SEED: u32 = 1337;

    pub fn new(cell_count: usize) -> Self {
        let mut rng = Mulberry32::new(Self::SEED);
        let values = (0..cell_count).map(|_| rng.next_u32()).collect();
        Self { values }
    }

    /// The table entry for cell `idx` — XOR this in/out to flip its
    /// contribution to the running hash.
    #[inline]
    pub fn value(&self, idx: usize) -> u32 {
        self.values[idx]
    }

    /// Hash a full cell buffer from scratch by XOR-folding the values of
    /// every live cell.
    pub fn hash_cells(&self, cells: &[u8]) -> u32 {
        cells
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c != 0)
            .fold(0u32, |acc, (idx, _)| acc ^ self.values[idx])
    }
}

/// Maps a generation's hash to the generation at which it was first
/// observed, bounded by a soft cap of `2 * max_period` entries (spec §3,
/// §4.2). On overflow, entries with the smallest hash keys are evicted —
/// a cheap age approximation, not a true LRU (spec §9).
pub struct HashTracker {
    max_period: u32,
    seen: HashMap<u32, u64>,
}

impl HashTracker {
    pub fn new(max_period: u32) -> Self {
        Self {
            max_period,
            seen: HashMap::new(),
        }
    }

    /// Has this hash been observed before?
    pub fn has(&self, hash: u32) -> bool {
        self.seen.contains_key(&hash)
    }

    /// The period since `hash` was first observed, relative to
    /// `current_generation`, or `None` if never seen.
    pub fn period(&self, hash: u32, current_generation: u64) -> Option<u32> {
        self.seen
            .get(&hash)
            .map(|&first_seen| (current_generation - first_seen) as u32)
    }

    /// Record `hash` as observed at `generation`, trimming the soft-capped
    /// history if it grows past `2 * max_period` entries (spec §4.2, §9:
    /// bound is inclusive of the just-inserted hash).
    pub fn add(&mut self, hash: u32, generation: u64) {
        self.seen.entry(hash).or_insert(generation);

        let cap = 2 * self.max_period as usize;
        if self.seen.len() > cap {
            let mut keys: Vec<u32> = self.seen.keys().copied().collect();
            keys.sort_unstable();
            let excess = self.seen.len() - cap;
            for key in keys.into_iter().take(excess) {
                self.seen.remove(&key);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashing_is_deterministic_across_instances() {
        let a = ZobristTable::new(16);
        let b = ZobristTable::new(16);
        let mut cells = vec![0u8; 16];
        cells[3] = 1;
        cells[9] = 1;
        assert_eq!(a.hash_cells(&cells), b.hash_cells(&cells));
    }

    #[test]
    fn flipping_a_cell_toggles_the_hash_by_its_value() {
        let table = ZobristTable::new(8);
        let mut cells = vec![0u8; 8];
        let h0 = table.hash_cells(&cells);
        cells[2] = 1;
        let h1 = table.hash_cells(&cells);
        assert_eq!(h0 ^ table.value(2), h1);
    }

    #[test]
    fn empty_grid_hashes_to_zero() {
        let table = ZobristTable::new(10);
        let cells = vec![0u8; 10];
        assert_eq!(table.hash_cells(&cells), 0);
    }

    #[test]
    fn tracker_detects_a_period_two_oscillation() {
        let mut tracker = HashTracker::new(50);
        assert!(!tracker.has(1));
        tracker.add(1, 0);
        tracker.add(2, 1);
        assert!(tracker.has(1));
        assert_eq!(tracker.period(1, 2), Some(2));
    }

    #[test]
    fn period_is_none_for_unseen_hash() {
        let tracker = HashTracker::new(50);
        assert_eq!(tracker.period(42, 5), None);
    }

    #[test]
    fn add_keeps_first_observed_generation() {
        let mut tracker = HashTracker::new(50);
        tracker.add(7, 3);
        tracker.add(7, 9); // re-observing must not overwrite the original
        assert_eq!(tracker.period(7, 9), Some(6));
    }

    #[test]
    fn tracker_is_soft_capped_at_twice_max_period() {
        let max_period = 4;
        let mut tracker = HashTracker::new(max_period);
        for h in 0..20u32 {
            tracker.add(h, h as u64);
        }
        assert_eq!(tracker.seen.len(), 2 * max_period as usize);
    }
}
