//! Randomness capability and placement helpers
//!
//! Every random draw in the simulation goes through a `RandomSource` passed
//! in by the caller. Seed an `Lcg` for reproducible runs; hand in
//! `rand::rng()` (or any other `rand::RngCore`) for host entropy.

use std::collections::HashSet;

use glam::IVec2;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use super::geometry::Point;
use crate::consts::{BOARD_HEIGHT, BOARD_WIDTH, EMPTY_CELL_RANDOM_TRIES};

/// Set of cells that placement must avoid
pub type Occupied = HashSet<Point>;

/// Source of uniform floats in `[0, 1)`
pub trait RandomSource {
    fn next_f64(&mut self) -> f64;
}

impl<R: RngCore> RandomSource for R {
    fn next_f64(&mut self) -> f64 {
        self.random::<f64>()
    }
}

const LCG_MODULUS: u64 = 2_147_483_647;
const LCG_MULTIPLIER: u64 = 16_807;

/// Park-Miller minimal standard generator
///
/// Small, serializable, and reproducible from a single integer seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lcg {
    state: u64,
}

impl Lcg {
    pub fn new(seed: u64) -> Self {
        let mut state = seed % LCG_MODULUS;
        if state == 0 {
            state = LCG_MODULUS - 1;
        }
        Self { state }
    }

    pub fn state(&self) -> u64 {
        self.state
    }
}

impl RandomSource for Lcg {
    fn next_f64(&mut self) -> f64 {
        // state stays in [1, MODULUS - 1], so the result is in [0, 1)
        self.state = (self.state * LCG_MULTIPLIER) % LCG_MODULUS;
        (self.state - 1) as f64 / (LCG_MODULUS - 1) as f64
    }
}

/// Uniform integer in `[min, max]` inclusive
pub fn random_int(min: i32, max: i32, rng: &mut dyn RandomSource) -> i32 {
    let span = f64::from(max - min + 1);
    (rng.next_f64() * span).floor() as i32 + min
}

pub fn chance(probability: f64, rng: &mut dyn RandomSource) -> bool {
    rng.next_f64() < probability
}

/// Pick a label proportionally to its weight
///
/// Returns `None` only for an empty table. The last label absorbs any
/// floating point shortfall of the roll.
pub fn pick_weighted<T: Copy>(weighted: &[(T, u32)], rng: &mut dyn RandomSource) -> Option<T> {
    let total: u32 = weighted.iter().map(|(_, w)| *w).sum();
    let roll = rng.next_f64() * f64::from(total);
    let mut cursor = 0.0;

    for (label, weight) in weighted {
        cursor += f64::from(*weight);
        if roll <= cursor {
            return Some(*label);
        }
    }
    weighted.last().map(|(label, _)| *label)
}

/// Find a free board cell
///
/// Tries uniform random candidates first, then scans the board row-major.
/// `None` means the board has no free cell at all.
pub fn random_empty_cell(occupied: &Occupied, rng: &mut dyn RandomSource) -> Option<Point> {
    let capacity = (BOARD_WIDTH * BOARD_HEIGHT) as usize;
    if occupied.len() >= capacity {
        return None;
    }

    for _ in 0..EMPTY_CELL_RANDOM_TRIES {
        let x = random_int(0, BOARD_WIDTH - 1, rng);
        let y = random_int(0, BOARD_HEIGHT - 1, rng);
        let candidate = IVec2::new(x, y);
        if !occupied.contains(&candidate) {
            return Some(candidate);
        }
    }

    log::warn!(
        "No free cell after {} random tries, scanning board",
        EMPTY_CELL_RANDOM_TRIES
    );
    (0..BOARD_HEIGHT)
        .flat_map(|y| (0..BOARD_WIDTH).map(move |x| IVec2::new(x, y)))
        .find(|cell| !occupied.contains(cell))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    /// Replays a fixed list of draws
    struct Scripted(Vec<f64>, usize);

    impl RandomSource for Scripted {
        fn next_f64(&mut self) -> f64 {
            let value = self.0[self.1 % self.0.len()];
            self.1 += 1;
            value
        }
    }

    #[test]
    fn test_lcg_is_reproducible() {
        let mut a = Lcg::new(42);
        let mut b = Lcg::new(42);
        for _ in 0..100 {
            assert_eq!(a.next_f64().to_bits(), b.next_f64().to_bits());
        }
    }

    #[test]
    fn test_lcg_known_sequence() {
        // 16807^1 and 16807^2 from seed 1
        let mut rng = Lcg::new(1);
        assert_eq!(rng.next_f64(), 16_806.0 / 2_147_483_646.0);
        assert_eq!(rng.state(), 16_807);
        rng.next_f64();
        assert_eq!(rng.state(), 282_475_249);
    }

    #[test]
    fn test_lcg_zero_seed_is_remapped() {
        assert_eq!(Lcg::new(0).state(), LCG_MODULUS - 1);
        assert_eq!(Lcg::new(LCG_MODULUS).state(), LCG_MODULUS - 1);
    }

    #[test]
    fn test_lcg_range() {
        let mut rng = Lcg::new(7);
        for _ in 0..10_000 {
            let v = rng.next_f64();
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn test_rand_rngs_are_sources() {
        let mut pcg = Pcg32::seed_from_u64(9);
        let v = pcg.next_f64();
        assert!((0.0..1.0).contains(&v));

        let mut host = rand::rng();
        let v = random_int(3, 5, &mut host);
        assert!((3..=5).contains(&v));
    }

    #[test]
    fn test_random_int_bounds() {
        let mut low = Scripted(vec![0.0], 0);
        assert_eq!(random_int(2, 9, &mut low), 2);
        let mut high = Scripted(vec![0.999_999], 0);
        assert_eq!(random_int(2, 9, &mut high), 9);
    }

    #[test]
    fn test_chance_is_strict() {
        let mut rng = Scripted(vec![0.08], 0);
        assert!(!chance(0.08, &mut rng));
        let mut rng = Scripted(vec![0.07], 0);
        assert!(chance(0.08, &mut rng));
    }

    #[test]
    fn test_pick_weighted_cumulative() {
        let table = [('a', 1), ('b', 2), ('c', 1)];
        // total 4: a covers [0,1], b (1,3], c (3,4]
        assert_eq!(pick_weighted(&table, &mut Scripted(vec![0.0], 0)), Some('a'));
        assert_eq!(pick_weighted(&table, &mut Scripted(vec![0.25], 0)), Some('a'));
        assert_eq!(pick_weighted(&table, &mut Scripted(vec![0.5], 0)), Some('b'));
        assert_eq!(pick_weighted(&table, &mut Scripted(vec![0.9], 0)), Some('c'));
        let empty: [(char, u32); 0] = [];
        assert_eq!(pick_weighted(&empty, &mut Scripted(vec![0.5], 0)), None);
    }

    #[test]
    fn test_random_empty_cell_avoids_occupied() {
        let mut rng = Lcg::new(3);
        let occupied: Occupied = (0..BOARD_WIDTH).map(|x| IVec2::new(x, 0)).collect();
        for _ in 0..50 {
            let cell = random_empty_cell(&occupied, &mut rng).unwrap();
            assert!(!occupied.contains(&cell));
        }
    }

    #[test]
    fn test_random_empty_cell_falls_back_to_scan() {
        // Every random draw lands on (0, 0), which is taken
        let mut rng = Scripted(vec![0.0], 0);
        let occupied: Occupied = [IVec2::new(0, 0)].into_iter().collect();
        assert_eq!(random_empty_cell(&occupied, &mut rng), Some(IVec2::new(1, 0)));
    }

    #[test]
    fn test_random_empty_cell_full_board() {
        let mut rng = Lcg::new(3);
        let occupied: Occupied = (0..BOARD_HEIGHT)
            .flat_map(|y| (0..BOARD_WIDTH).map(move |x| IVec2::new(x, y)))
            .collect();
        assert_eq!(random_empty_cell(&occupied, &mut rng), None);
    }
}
