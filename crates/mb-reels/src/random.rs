//! Random source for target indices, rotations and scores

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Uniform draws in `0..bound`. Every draw the machine makes goes through here.
pub trait RandomSource: Send {
    /// Uniform value in `0..bound`; `0` when `bound == 0`
    fn next_below(&mut self, bound: usize) -> usize;
}

/// ChaCha-backed source, seedable for reproducible sessions
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: ChaCha8Rng,
}

impl SeededRandom {
    /// Seeded from the OS
    pub fn from_os() -> Self {
        Self {
            rng: ChaCha8Rng::from_os_rng(),
        }
    }

    /// Reproducible sequence
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl Default for SeededRandom {
    fn default() -> Self {
        Self::from_os()
    }
}

impl RandomSource for SeededRandom {
    fn next_below(&mut self, bound: usize) -> usize {
        if bound == 0 {
            return 0;
        }
        self.rng.random_range(0..bound)
    }
}

/// Replays a fixed list of values (each reduced modulo the bound), cycling
#[derive(Debug, Clone)]
pub struct SequenceRandom {
    values: Vec<usize>,
    cursor: usize,
}

impl SequenceRandom {
    pub fn new(values: impl Into<Vec<usize>>) -> Self {
        Self {
            values: values.into(),
            cursor: 0,
        }
    }
}

impl RandomSource for SequenceRandom {
    fn next_below(&mut self, bound: usize) -> usize {
        if bound == 0 || self.values.is_empty() {
            return 0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value % bound
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_is_reproducible() {
        let mut a = SeededRandom::seeded(42);
        let mut b = SeededRandom::seeded(42);
        for _ in 0..32 {
            assert_eq!(a.next_below(1000), b.next_below(1000));
        }
    }

    #[test]
    fn test_bounds() {
        let mut rng = SeededRandom::seeded(7);
        for bound in 1..50 {
            for _ in 0..20 {
                assert!(rng.next_below(bound) < bound);
            }
        }
        assert_eq!(rng.next_below(0), 0);
    }

    #[test]
    fn test_sequence_cycles_and_wraps() {
        let mut rng = SequenceRandom::new(vec![3, 9]);
        assert_eq!(rng.next_below(8), 3);
        assert_eq!(rng.next_below(8), 1);
        assert_eq!(rng.next_below(8), 3);
    }
}
