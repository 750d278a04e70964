//! Random node heights.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Draws node heights from a geometric distribution capped at `max_level`.
///
/// With probability `p`, P(height = k) = p^(k-1) * (1 - p) for k below the
/// cap; whatever mass is left lands on `max_level` itself.
pub(crate) struct LevelGenerator {
    rng: StdRng,
    max_level: usize,
    probability: f64,
}

impl LevelGenerator {
    /// `probability` must lie in (0, 1); `Options::validate` checks this.
    pub fn new(max_level: usize, probability: f64, seed: Option<u64>) -> LevelGenerator {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        LevelGenerator {
            rng,
            max_level,
            probability,
        }
    }

    pub fn next_level(&mut self) -> usize {
        let mut level = 1;
        while level < self.max_level && self.rng.gen_bool(self.probability) {
            level += 1;
        }
        level
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_level_always_one() {
        let mut levels = LevelGenerator::new(1, 0.5, Some(7));
        for _ in 0..1_000 {
            assert_eq!(levels.next_level(), 1);
        }
    }

    #[test]
    fn never_exceeds_max_level() {
        let mut levels = LevelGenerator::new(4, 0.9, Some(7));
        let mut hit_cap = false;
        for _ in 0..10_000 {
            let level = levels.next_level();
            assert!((1..=4).contains(&level));
            hit_cap |= level == 4;
        }
        assert!(hit_cap, "p=0.9 should reach the cap");
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = LevelGenerator::new(12, 0.5, Some(1234));
        let mut b = LevelGenerator::new(12, 0.5, Some(1234));
        let xs: Vec<usize> = (0..500).map(|_| a.next_level()).collect();
        let ys: Vec<usize> = (0..500).map(|_| b.next_level()).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn roughly_geometric() {
        let mut levels = LevelGenerator::new(16, 0.5, Some(99));
        let samples = 100_000;
        let mut counts = [0usize; 17];
        for _ in 0..samples {
            counts[levels.next_level()] += 1;
        }
        // P(1) = 1/2, P(2) = 1/4, P(3) = 1/8; allow generous slack.
        let frac = |k: usize| counts[k] as f64 / samples as f64;
        assert!((frac(1) - 0.5).abs() < 0.02, "P(1) = {}", frac(1));
        assert!((frac(2) - 0.25).abs() < 0.02, "P(2) = {}", frac(2));
        assert!((frac(3) - 0.125).abs() < 0.02, "P(3) = {}", frac(3));
    }
}
